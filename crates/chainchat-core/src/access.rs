//! Access and pause control
//!
//! Privilege checks run before anything is staged and short-circuit with no
//! side effects. Risk-update authorization is pluggable through the
//! `RiskUpdatePolicy` trait, injected into the engine the same way a host
//! would inject any other deployment rule.

use chainchat_core_types::Principal;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Engine-wide control state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// The single privileged identity, fixed at initialization
    pub admin: Principal,
    /// When set, every mutating entry point except pause/resume is rejected
    pub paused: bool,
}

impl EngineState {
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            paused: false,
        }
    }

    pub fn is_admin(&self, caller: &Principal) -> bool {
        &self.admin == caller
    }
}

/// Reject non-admin callers
///
/// # Errors
///
/// Returns `NotAdmin` unless `caller` is the configured admin.
pub fn ensure_admin(state: &EngineState, caller: &Principal) -> Result<()> {
    if state.is_admin(caller) {
        Ok(())
    } else {
        Err(EngineError::NotAdmin {
            caller: caller.clone(),
        })
    }
}

/// Reject calls while the engine is paused
///
/// # Errors
///
/// Returns `EnginePaused` while `paused` is set.
pub fn ensure_running(state: &EngineState) -> Result<()> {
    if state.paused {
        Err(EngineError::EnginePaused)
    } else {
        Ok(())
    }
}

/// Policy deciding who may change whose risk tier
///
/// `authorize_caller` runs once per call before the batch is inspected.
/// `authorize_target` runs for every entry before any entry is applied, so a
/// rejected batch never stages a write.
pub trait RiskUpdatePolicy: std::fmt::Debug + Send + Sync {
    /// Check the caller independently of the batch content
    ///
    /// # Errors
    ///
    /// Returns an `Unauthorized`-kind error if the caller may not update risk
    /// settings at all.
    fn authorize_caller(&self, _state: &EngineState, _caller: &Principal) -> Result<()> {
        Ok(())
    }

    /// Check one target account
    ///
    /// # Errors
    ///
    /// Returns an `Unauthorized`-kind error if `caller` may not update `target`.
    fn authorize_target(
        &self,
        state: &EngineState,
        caller: &Principal,
        target: &Principal,
    ) -> Result<()>;

    /// Stable name, as used in configuration
    fn name(&self) -> &'static str;
}

/// Admin may update any account; everyone else only their own
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfOrAdminRiskPolicy;

impl RiskUpdatePolicy for SelfOrAdminRiskPolicy {
    fn authorize_target(
        &self,
        state: &EngineState,
        caller: &Principal,
        target: &Principal,
    ) -> Result<()> {
        if state.is_admin(caller) || caller == target {
            Ok(())
        } else {
            Err(EngineError::ForeignRiskTarget {
                caller: caller.clone(),
                target: target.clone(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "self-or-admin"
    }
}

/// Only the admin may update risk settings
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOnlyRiskPolicy;

impl RiskUpdatePolicy for AdminOnlyRiskPolicy {
    fn authorize_caller(&self, state: &EngineState, caller: &Principal) -> Result<()> {
        ensure_admin(state, caller)
    }

    fn authorize_target(
        &self,
        state: &EngineState,
        caller: &Principal,
        _target: &Principal,
    ) -> Result<()> {
        ensure_admin(state, caller)
    }

    fn name(&self) -> &'static str {
        "admin-only"
    }
}
