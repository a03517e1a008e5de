//! Deterministic state digest
//!
//! A hex SHA-256 over the canonical JSON of the engine control state and the
//! account map. Accounts are keyed by an ordered map, so equal states always
//! serialize identically.
//!
//! Used for replay checks and to prove a failed call left state untouched:
//!
//! ```text
//! digest(before) == digest(after)   for every call that returned Err
//! ```

use std::collections::BTreeMap;

use chainchat_core_types::Principal;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::access::EngineState;
use crate::errors::Result;
use crate::model::AccountState;
use crate::ops::AccountStore;

#[derive(Serialize)]
struct DigestInput<'a> {
    engine: &'a EngineState,
    accounts: &'a BTreeMap<Principal, AccountState>,
}

/// Compute the digest of an engine state and its accounts
///
/// # Errors
///
/// Returns `Serialization` if JSON serialization fails.
pub fn compute_state_digest(engine: &EngineState, store: &AccountStore) -> Result<String> {
    let canonical = serde_json::to_string(&DigestInput {
        engine,
        accounts: &store.accounts,
    })?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
