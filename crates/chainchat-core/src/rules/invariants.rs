//! Post-transition invariant checks
//!
//! Operations establish these properties through their preconditions. The
//! checks here re-verify the written record so a broken transition surfaces
//! as a typed `InvariantViolation` instead of being committed.

use chainchat_core_types::Principal;

use crate::errors::{EngineError, Result};
use crate::model::AccountState;
use crate::ops::StagedAccounts;

pub const ONE_ACTIVE_STRATEGY: &str = "OneActiveStrategy";
pub const LOCKED_IFF_ACTIVE: &str = "LockedIffActive";
pub const WITHIN_ALLOCATION: &str = "WithinAllocation";

/// Check a single account record
///
/// # Errors
///
/// Returns `InvariantViolation` naming the first property that fails.
pub fn check_account(principal: &Principal, account: &AccountState) -> Result<()> {
    let violation = |invariant| EngineError::InvariantViolation {
        principal: principal.clone(),
        invariant,
    };

    if account.is_active != account.active_strategy.is_some() {
        return Err(violation(ONE_ACTIVE_STRATEGY));
    }

    if (account.locked_amount > 0) != account.is_active {
        return Err(violation(LOCKED_IFF_ACTIVE));
    }

    Ok(())
}

/// Check a freshly started account against its tier ceiling
///
/// Only meaningful right after a start: lowering the tier later is allowed
/// and does not retroactively invalidate the running strategy.
pub fn check_within_allocation(principal: &Principal, account: &AccountState) -> Result<()> {
    match account.allocation_ceiling() {
        Some(ceiling) if account.locked_amount > ceiling => Err(EngineError::InvariantViolation {
            principal: principal.clone(),
            invariant: WITHIN_ALLOCATION,
        }),
        _ => Ok(()),
    }
}

/// Check every record touched by the current call
pub fn check_staged(staged: &StagedAccounts<'_>) -> Result<()> {
    staged
        .touched()
        .try_for_each(|(principal, account)| check_account(principal, account))
}
