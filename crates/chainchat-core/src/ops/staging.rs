//! Copy-on-write staging overlay
//!
//! Every mutating call writes into a `StagedAccounts` layered over the
//! committed `AccountStore`. Reads see staged records first, then committed
//! ones. Only when the whole call succeeds are the staged records written
//! back with `AccountStore::commit`; on failure the overlay is simply dropped,
//! which is what makes batches all-or-nothing.

use std::collections::BTreeMap;

use chainchat_core_types::Principal;

use super::store::AccountStore;
use crate::model::AccountState;

/// Pending account writes for one call
#[derive(Debug)]
pub struct StagedAccounts<'a> {
    base: &'a AccountStore,
    dirty: BTreeMap<Principal, AccountState>,
}

/// Account records produced by a successful call, ready to commit
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StagedChanges(BTreeMap<Principal, AccountState>);

impl<'a> StagedAccounts<'a> {
    pub fn new(base: &'a AccountStore) -> Self {
        Self {
            base,
            dirty: BTreeMap::new(),
        }
    }

    /// Current view of a principal's record
    pub fn get(&self, principal: &Principal) -> Option<&AccountState> {
        self.dirty
            .get(principal)
            .or_else(|| self.base.get(principal))
    }

    /// Mutable record for a principal, created on first write
    pub fn get_or_create_mut(&mut self, principal: &Principal) -> &mut AccountState {
        let base = self.base;
        self.dirty
            .entry(principal.clone())
            .or_insert_with(|| base.get(principal).cloned().unwrap_or_default())
    }

    /// Mutable record for a principal, only if one already exists
    pub fn get_existing_mut(&mut self, principal: &Principal) -> Option<&mut AccountState> {
        if self.get(principal).is_none() {
            return None;
        }
        Some(self.get_or_create_mut(principal))
    }

    /// Principals touched so far, in order
    pub fn touched(&self) -> impl Iterator<Item = (&Principal, &AccountState)> {
        self.dirty.iter()
    }

    /// Finish staging, releasing the borrow on the committed store
    pub fn into_changes(self) -> StagedChanges {
        StagedChanges(self.dirty)
    }
}

impl AccountStore {
    /// Write back every staged record
    pub fn commit(&mut self, changes: StagedChanges) {
        self.accounts.extend(changes.0);
    }
}
