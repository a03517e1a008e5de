//! Bulk transaction processor
//!
//! Each processor runs its entries in input order against one staging
//! overlay. The first failing entry aborts the batch; its error is wrapped
//! with the entry index and the overlay is left for the caller to drop.
//! Later entries see the writes of earlier ones, so a batch may start and
//! then exit a strategy for the same account.

use chainchat_core_types::Principal;
use serde::{Deserialize, Serialize};

use crate::apply::apply;
use crate::commands::{parse_admin_action, parse_command, Action, AdminAction};
use crate::errors::{EngineError, Result};
use crate::model::{BulkCommandsResult, ManageResult, RiskTier, RiskUpdateResult, StrategyId};
use crate::ops::{strategy_ops, StagedAccounts};

/// Largest self-service command batch
pub const MAX_COMMAND_BATCH: usize = 5;
/// Largest administrative or risk-update batch
pub const MAX_ADMIN_BATCH: usize = 10;

/// One self-service command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub command: String,
    #[serde(default)]
    pub amount: u64,
}

impl CommandEntry {
    pub fn new(command: impl Into<String>, amount: u64) -> Self {
        Self {
            command: command.into(),
            amount,
        }
    }
}

/// One administrative directive against a target account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDirective {
    pub user: Principal,
    /// `start`, `stop` or `emergency-stop`
    pub action: String,
    /// Only read for `start`
    #[serde(default)]
    pub strategy_id: u64,
    /// Only read for `start`
    #[serde(default)]
    pub amount: u64,
}

/// One risk-tier change for a target account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskUpdate {
    pub user: Principal,
    pub risk_level: u64,
}

/// Check a batch length against `1..=max`
///
/// # Errors
///
/// Returns `EmptyBatch` or `BatchTooLarge`.
pub fn check_batch_size(len: usize, max: usize) -> Result<()> {
    if len == 0 {
        return Err(EngineError::EmptyBatch);
    }
    if len > max {
        return Err(EngineError::BatchTooLarge { len, max });
    }
    Ok(())
}

/// Run a caller's commands against their own account
///
/// # Errors
///
/// Returns the batch size error, or the first entry error wrapped in
/// `BatchEntryFailed`.
pub fn execute_commands(
    staged: &mut StagedAccounts<'_>,
    caller: &Principal,
    entries: &[CommandEntry],
    height: u64,
) -> Result<BulkCommandsResult> {
    check_batch_size(entries.len(), MAX_COMMAND_BATCH)?;

    let results = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_command(&entry.command)
                .and_then(|action| apply(staged, caller, action, entry.amount, height))
                .map_err(|e| e.at_entry(index))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BulkCommandsResult {
        total_commands: results.len() as u64,
        results,
    })
}

/// Run administrative directives, each against its own target account
///
/// # Errors
///
/// Returns the batch size error, or the first entry error wrapped in
/// `BatchEntryFailed`.
pub fn manage_strategies(
    staged: &mut StagedAccounts<'_>,
    directives: &[StrategyDirective],
    height: u64,
) -> Result<Vec<ManageResult>> {
    check_batch_size(directives.len(), MAX_ADMIN_BATCH)?;

    directives
        .iter()
        .enumerate()
        .map(|(index, directive)| {
            manage_one(staged, directive, height).map_err(|e| e.at_entry(index))
        })
        .collect()
}

fn manage_one(
    staged: &mut StagedAccounts<'_>,
    directive: &StrategyDirective,
    height: u64,
) -> Result<ManageResult> {
    match parse_admin_action(&directive.action)? {
        AdminAction::Start => {
            let strategy = StrategyId::from_id(directive.strategy_id)?;
            apply(
                staged,
                &directive.user,
                Action::StartStrategy(strategy),
                directive.amount,
                height,
            )
            .map(ManageResult::Action)
        }
        AdminAction::Stop => {
            apply(staged, &directive.user, Action::ExitAll, 0, height).map(ManageResult::Action)
        }
        AdminAction::EmergencyStop => {
            let ok = strategy_ops::emergency_stop(staged, &directive.user)?;
            Ok(ManageResult::EmergencyStopped { ok })
        }
    }
}

/// Set risk tiers for target accounts, reporting each ceiling
///
/// Authorization is the caller's job and must have run for every entry
/// before this is called.
///
/// # Errors
///
/// Returns the batch size error, or the first entry error wrapped in
/// `BatchEntryFailed`.
pub fn update_risk_settings(
    staged: &mut StagedAccounts<'_>,
    updates: &[RiskUpdate],
    height: u64,
) -> Result<Vec<RiskUpdateResult>> {
    check_batch_size(updates.len(), MAX_ADMIN_BATCH)?;

    updates
        .iter()
        .enumerate()
        .map(|(index, update)| -> Result<RiskUpdateResult> {
            let tier = RiskTier::from_level(update.risk_level).map_err(|e| e.at_entry(index))?;
            strategy_ops::set_risk(staged, &update.user, tier);
            Ok(RiskUpdateResult {
                risk_level: tier,
                max_allocation: tier.max_allocation(),
                timestamp: height,
            })
        })
        .collect()
}
