use std::collections::BTreeMap;

use chainchat_core_types::Principal;

use crate::model::AccountState;

/// In-memory account state store
///
/// The single source of truth for per-principal strategy records. Keyed by
/// an ordered map so iteration (and therefore the state digest) is
/// deterministic. Not thread-safe: the engine runs one call at a time and
/// owns the store exclusively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountStore {
    pub(crate) accounts: BTreeMap<Principal, AccountState>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Get the record for a principal, if it was ever written
    pub fn get(&self, principal: &Principal) -> Option<&AccountState> {
        self.accounts.get(principal)
    }

    /// Number of principals with a record
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate records in principal order
    pub fn iter(&self) -> impl Iterator<Item = (&Principal, &AccountState)> {
        self.accounts.iter()
    }

    /// Insert or replace a record
    ///
    /// Used when committing a staging overlay and by test helpers.
    pub fn insert(&mut self, principal: Principal, account: AccountState) {
        self.accounts.insert(principal, account);
    }

    /// Count of accounts currently running a strategy
    pub fn active_count(&self) -> usize {
        self.accounts.values().filter(|a| a.is_active).count()
    }

    /// Sum of funds currently locked across all accounts
    pub fn total_locked(&self) -> u128 {
        self.accounts
            .values()
            .map(|a| u128::from(a.locked_amount))
            .sum()
    }
}
