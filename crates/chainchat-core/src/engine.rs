//! Strategy engine facade
//!
//! `StrategyEngine` owns the control state and the account store and exposes
//! the host-facing entry points. Every mutating entry point:
//!
//! - logs one `start` event and one `end` or `end_error` event
//! - runs the pause gate, then its privilege checks, before staging anything
//! - applies into a fresh staging overlay and commits only on success
//!
//! Calls run one at a time (`&mut self`); there are no locks and no I/O.

use std::time::Instant;

use chainchat_core_types::{Principal, RequestContext};

use crate::access::{
    ensure_admin, ensure_running, EngineState, RiskUpdatePolicy, SelfOrAdminRiskPolicy,
};
use crate::apply::apply;
use crate::bulk::{
    self, check_batch_size, CommandEntry, RiskUpdate, StrategyDirective, MAX_ADMIN_BATCH,
};
use crate::commands::parse_command;
use crate::config::EngineConfig;
use crate::digest::compute_state_digest;
use crate::errors::{EngineError, ExError, Result};
use crate::model::{
    AccountState, ActionResult, BulkCommandsResult, ManageResult, RiskTier, RiskUpdateResult,
};
use crate::ops::{AccountStore, StagedAccounts};
use crate::rules::invariants::check_staged;
use crate::{log_op_end, log_op_error, log_op_start};

pub const OP_EXECUTE_COMMAND: &str = "execute_command";
pub const OP_BULK_EXECUTE_COMMANDS: &str = "bulk_execute_commands";
pub const OP_BULK_MANAGE_STRATEGIES: &str = "bulk_manage_strategies";
pub const OP_BULK_UPDATE_RISK_SETTINGS: &str = "bulk_update_risk_settings";
pub const OP_PAUSE_ENGINE: &str = "pause_engine";
pub const OP_RESUME_ENGINE: &str = "resume_engine";

/// Host-supplied context of one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Identity issuing the call
    pub caller: Principal,
    /// Execution height, echoed as `timestamp` in results
    pub height: u64,
    /// Optional correlation; never affects state
    pub context: Option<RequestContext>,
}

impl Invocation {
    pub fn new(caller: impl Into<Principal>, height: u64) -> Self {
        Self {
            caller: caller.into(),
            height,
            context: None,
        }
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn request_id(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.request_id.as_str())
    }

    /// Flatten an engine error, attaching operation and correlation context
    pub fn ex_error(&self, op: &str, err: EngineError) -> ExError {
        let mut ex = ExError::from(err).with_op(op);
        if let Some(context) = &self.context {
            ex = ex.with_request_id(context.request_id.clone());
            if let Some(trace_id) = &context.trace_id {
                ex = ex.with_trace_id(trace_id.clone());
            }
        }
        ex
    }
}

/// Strategy command execution engine
#[derive(Debug)]
pub struct StrategyEngine {
    state: EngineState,
    accounts: AccountStore,
    risk_policy: Box<dyn RiskUpdatePolicy>,
}

impl StrategyEngine {
    /// Create an unpaused engine with no accounts and the default risk policy
    pub fn new(admin: impl Into<Principal>) -> Self {
        Self {
            state: EngineState::new(admin.into()),
            accounts: AccountStore::new(),
            risk_policy: Box::new(SelfOrAdminRiskPolicy),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut engine = Self::new(config.admin.clone());
        engine.state.paused = config.paused;
        engine.risk_policy = config.risk_update_policy.build();
        engine
    }

    /// Replace the risk-update authorization policy
    pub fn with_risk_policy(mut self, policy: impl RiskUpdatePolicy + 'static) -> Self {
        self.risk_policy = Box::new(policy);
        self
    }

    // ===== Mutating entry points =====

    /// Execute one command literal against the caller's account
    ///
    /// # Errors
    ///
    /// `Unauthorized` while paused, `InvalidCommand` for an unknown literal,
    /// otherwise the error of the action itself.
    pub fn execute_command(
        &mut self,
        inv: &Invocation,
        command: &str,
        amount: u64,
    ) -> Result<ActionResult> {
        log_op_start!(
            OP_EXECUTE_COMMAND,
            caller = %inv.caller,
            height = inv.height,
            request_id = inv.request_id()
        );
        let start = Instant::now();

        let result = self
            .execute_command_impl(inv, command, amount)
            .map_err(|e| {
                log_op_error!(
                    OP_EXECUTE_COMMAND,
                    inv.ex_error(OP_EXECUTE_COMMAND, e.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    caller = %inv.caller,
                    request_id = inv.request_id()
                );
                e
            })?;

        log_op_end!(
            OP_EXECUTE_COMMAND,
            duration_ms = start.elapsed().as_millis() as u64,
            caller = %inv.caller,
            request_id = inv.request_id()
        );
        Ok(result)
    }

    fn execute_command_impl(
        &mut self,
        inv: &Invocation,
        command: &str,
        amount: u64,
    ) -> Result<ActionResult> {
        ensure_running(&self.state)?;
        let action = parse_command(command)?;
        run_staged(&mut self.accounts, |staged| {
            apply(staged, &inv.caller, action, amount, inv.height)
        })
    }

    /// Execute 1 to 5 commands against the caller's account, atomically
    ///
    /// # Errors
    ///
    /// `Unauthorized` while paused, `InvalidCommand` for a bad batch size,
    /// otherwise the first failing entry's error wrapped with its index.
    pub fn bulk_execute_commands(
        &mut self,
        inv: &Invocation,
        entries: &[CommandEntry],
    ) -> Result<BulkCommandsResult> {
        log_op_start!(
            OP_BULK_EXECUTE_COMMANDS,
            caller = %inv.caller,
            height = inv.height,
            entries = entries.len() as u64,
            request_id = inv.request_id()
        );
        let start = Instant::now();

        let result = self
            .bulk_execute_commands_impl(inv, entries)
            .map_err(|e| {
                log_op_error!(
                    OP_BULK_EXECUTE_COMMANDS,
                    inv.ex_error(OP_BULK_EXECUTE_COMMANDS, e.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    caller = %inv.caller,
                    request_id = inv.request_id()
                );
                e
            })?;

        log_op_end!(
            OP_BULK_EXECUTE_COMMANDS,
            duration_ms = start.elapsed().as_millis() as u64,
            caller = %inv.caller,
            entries = result.total_commands,
            request_id = inv.request_id()
        );
        Ok(result)
    }

    fn bulk_execute_commands_impl(
        &mut self,
        inv: &Invocation,
        entries: &[CommandEntry],
    ) -> Result<BulkCommandsResult> {
        ensure_running(&self.state)?;
        run_staged(&mut self.accounts, |staged| {
            bulk::execute_commands(staged, &inv.caller, entries, inv.height)
        })
    }

    /// Apply 1 to 10 administrative directives, atomically
    ///
    /// # Errors
    ///
    /// `Unauthorized` while paused or for any non-admin caller (whatever the
    /// batch holds), `InvalidCommand` for a bad batch size, otherwise the
    /// first failing entry's error wrapped with its index.
    pub fn bulk_manage_strategies(
        &mut self,
        inv: &Invocation,
        directives: &[StrategyDirective],
    ) -> Result<Vec<ManageResult>> {
        log_op_start!(
            OP_BULK_MANAGE_STRATEGIES,
            caller = %inv.caller,
            height = inv.height,
            entries = directives.len() as u64,
            request_id = inv.request_id()
        );
        let start = Instant::now();

        let result = self
            .bulk_manage_strategies_impl(inv, directives)
            .map_err(|e| {
                log_op_error!(
                    OP_BULK_MANAGE_STRATEGIES,
                    inv.ex_error(OP_BULK_MANAGE_STRATEGIES, e.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    caller = %inv.caller,
                    request_id = inv.request_id()
                );
                e
            })?;

        log_op_end!(
            OP_BULK_MANAGE_STRATEGIES,
            duration_ms = start.elapsed().as_millis() as u64,
            caller = %inv.caller,
            entries = result.len() as u64,
            request_id = inv.request_id()
        );
        Ok(result)
    }

    fn bulk_manage_strategies_impl(
        &mut self,
        inv: &Invocation,
        directives: &[StrategyDirective],
    ) -> Result<Vec<ManageResult>> {
        ensure_running(&self.state)?;
        ensure_admin(&self.state, &inv.caller)?;
        run_staged(&mut self.accounts, |staged| {
            bulk::manage_strategies(staged, directives, inv.height)
        })
    }

    /// Set risk tiers for 1 to 10 accounts, atomically
    ///
    /// Every target is authorized by the configured `RiskUpdatePolicy` before
    /// any entry is applied.
    ///
    /// # Errors
    ///
    /// `Unauthorized` while paused or when the policy rejects the caller or a
    /// target, `InvalidCommand` for a bad batch size or unknown risk level.
    pub fn bulk_update_risk_settings(
        &mut self,
        inv: &Invocation,
        updates: &[RiskUpdate],
    ) -> Result<Vec<RiskUpdateResult>> {
        log_op_start!(
            OP_BULK_UPDATE_RISK_SETTINGS,
            caller = %inv.caller,
            height = inv.height,
            entries = updates.len() as u64,
            request_id = inv.request_id()
        );
        let start = Instant::now();

        let result = self
            .bulk_update_risk_settings_impl(inv, updates)
            .map_err(|e| {
                log_op_error!(
                    OP_BULK_UPDATE_RISK_SETTINGS,
                    inv.ex_error(OP_BULK_UPDATE_RISK_SETTINGS, e.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    caller = %inv.caller,
                    request_id = inv.request_id()
                );
                e
            })?;

        log_op_end!(
            OP_BULK_UPDATE_RISK_SETTINGS,
            duration_ms = start.elapsed().as_millis() as u64,
            caller = %inv.caller,
            entries = result.len() as u64,
            request_id = inv.request_id()
        );
        Ok(result)
    }

    fn bulk_update_risk_settings_impl(
        &mut self,
        inv: &Invocation,
        updates: &[RiskUpdate],
    ) -> Result<Vec<RiskUpdateResult>> {
        ensure_running(&self.state)?;
        self.risk_policy.authorize_caller(&self.state, &inv.caller)?;
        check_batch_size(updates.len(), MAX_ADMIN_BATCH)?;
        for (index, update) in updates.iter().enumerate() {
            self.risk_policy
                .authorize_target(&self.state, &inv.caller, &update.user)
                .map_err(|e| e.at_entry(index))?;
        }

        run_staged(&mut self.accounts, |staged| {
            bulk::update_risk_settings(staged, updates, inv.height)
        })
    }

    /// Pause the engine (admin only)
    ///
    /// Not blocked by the pause gate; pausing a paused engine succeeds.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for any non-admin caller.
    pub fn pause_engine(&mut self, inv: &Invocation) -> Result<bool> {
        self.set_paused(OP_PAUSE_ENGINE, inv, true)
    }

    /// Resume a paused engine (admin only)
    ///
    /// # Errors
    ///
    /// `Unauthorized` for any non-admin caller.
    pub fn resume_engine(&mut self, inv: &Invocation) -> Result<bool> {
        self.set_paused(OP_RESUME_ENGINE, inv, false)
    }

    fn set_paused(&mut self, op: &'static str, inv: &Invocation, paused: bool) -> Result<bool> {
        log_op_start!(
            op,
            caller = %inv.caller,
            height = inv.height,
            request_id = inv.request_id()
        );
        let start = Instant::now();

        ensure_admin(&self.state, &inv.caller).map_err(|e| {
            log_op_error!(
                op,
                inv.ex_error(op, e.clone()),
                duration_ms = start.elapsed().as_millis() as u64,
                caller = %inv.caller,
                request_id = inv.request_id()
            );
            e
        })?;
        self.state.paused = paused;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            caller = %inv.caller,
            paused = paused,
            request_id = inv.request_id()
        );
        Ok(true)
    }

    // ===== Queries =====

    /// Snapshot of a principal's record; `None` if it was never written
    pub fn get_user_strategy(&self, principal: &Principal) -> Option<AccountState> {
        self.accounts.get(principal).cloned()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn admin(&self) -> &Principal {
        &self.state.admin
    }

    pub fn risk_policy_name(&self) -> &'static str {
        self.risk_policy.name()
    }

    /// Allocation ceiling for a numeric risk level
    ///
    /// # Errors
    ///
    /// `InvalidCommand` for a level outside 1..=3.
    pub fn max_allocation(&self, risk_level: u64) -> Result<u64> {
        RiskTier::from_level(risk_level).map(RiskTier::max_allocation)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Hex SHA-256 of the full engine state
    ///
    /// # Errors
    ///
    /// `Serialization` if the state cannot be encoded.
    pub fn state_digest(&self) -> Result<String> {
        compute_state_digest(&self.state, &self.accounts)
    }
}

/// Run `f` in a fresh overlay, committing only if it and the invariant
/// checks succeed
fn run_staged<T>(
    store: &mut AccountStore,
    f: impl FnOnce(&mut StagedAccounts<'_>) -> Result<T>,
) -> Result<T> {
    let mut staged = StagedAccounts::new(store);
    let output = f(&mut staged)?;
    check_staged(&staged)?;
    let changes = staged.into_changes();
    store.commit(changes);
    Ok(output)
}
