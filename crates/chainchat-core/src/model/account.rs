use serde::{Deserialize, Serialize};

use super::catalog::{RiskTier, StrategyId};

/// Per-principal strategy record
///
/// Created lazily on the first successful write for a principal and never
/// removed: after an exit or stop the record persists with `is_active = false`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    /// Currently running strategy, if any
    pub active_strategy: Option<StrategyId>,

    /// Funds held by the engine on the account's behalf
    pub locked_amount: u64,

    /// Selected risk tier; unset until the account issues a risk command
    pub risk_tier: Option<RiskTier>,

    /// True exactly when `active_strategy` is set
    pub is_active: bool,
}

impl AccountState {
    /// Allocation ceiling from the selected tier, if one is set
    pub fn allocation_ceiling(&self) -> Option<u64> {
        self.risk_tier.map(RiskTier::max_allocation)
    }

    /// Release everything held for the account, returning the released amount
    pub(crate) fn release(&mut self) -> u64 {
        let released = self.locked_amount;
        self.active_strategy = None;
        self.locked_amount = 0;
        self.is_active = false;
        released
    }
}
