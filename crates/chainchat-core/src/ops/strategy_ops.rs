use chainchat_core_types::Principal;

use super::staging::StagedAccounts;
use crate::errors::{EngineError, Result};
use crate::model::{RiskTier, StrategyId};
use crate::rules::invariants::{check_account, check_within_allocation};

/// Start a strategy for a principal, locking `amount`
///
/// Preconditions are checked against the current view before anything is
/// written, so a rejected start never creates a record.
///
/// # Errors
/// * `StrategyActive` - If the account already runs a strategy
/// * `ZeroAmount` - If `amount` is zero
/// * `AllocationExceeded` - If a risk tier is set and `amount` is above its ceiling
pub fn start_strategy(
    staged: &mut StagedAccounts<'_>,
    principal: &Principal,
    strategy: StrategyId,
    amount: u64,
) -> Result<()> {
    if let Some(current) = staged.get(principal) {
        if let Some(active) = current.active_strategy {
            return Err(EngineError::StrategyActive {
                principal: principal.clone(),
                active,
            });
        }
    }

    if amount == 0 {
        return Err(EngineError::ZeroAmount {
            principal: principal.clone(),
        });
    }

    if let Some(tier) = staged.get(principal).and_then(|a| a.risk_tier) {
        let ceiling = tier.max_allocation();
        if amount > ceiling {
            return Err(EngineError::AllocationExceeded {
                principal: principal.clone(),
                tier,
                amount,
                ceiling,
            });
        }
    }

    let account = staged.get_or_create_mut(principal);
    account.active_strategy = Some(strategy);
    account.locked_amount = amount;
    account.is_active = true;

    check_account(principal, account)?;
    check_within_allocation(principal, account)
}

/// Select a risk tier for a principal
///
/// No active-strategy precondition: the tier can be changed at any time and
/// only bounds future starts.
pub fn set_risk(staged: &mut StagedAccounts<'_>, principal: &Principal, tier: RiskTier) {
    staged.get_or_create_mut(principal).risk_tier = Some(tier);
}

/// Exit the principal's strategy, returning the released amount
///
/// # Errors
/// * `StrategyNotFound` - If no strategy is active for the account
pub fn exit_all(staged: &mut StagedAccounts<'_>, principal: &Principal) -> Result<u64> {
    let account = staged
        .get_existing_mut(principal)
        .filter(|a| a.is_active)
        .ok_or_else(|| EngineError::StrategyNotFound {
            principal: principal.clone(),
        })?;

    let returned = account.release();
    check_account(principal, account)?;
    Ok(returned)
}

/// Forcibly clear the principal's strategy and locked amount
///
/// Succeeds whatever the prior state. Principals without a record are left
/// without one.
pub fn emergency_stop(staged: &mut StagedAccounts<'_>, principal: &Principal) -> Result<bool> {
    if let Some(account) = staged.get_existing_mut(principal) {
        account.release();
        check_account(principal, account)?;
    }
    Ok(true)
}
