//! ChainChat core - strategy command execution engine
//!
//! A deterministic, single-threaded ledger-state engine. Principals drive a
//! fixed vocabulary of commands (start a strategy, set a risk tier, exit all
//! positions) against their own account; the administrator can apply the
//! same actions across many accounts in one batch. Every mutating entry
//! point is all-or-nothing.
//!
//! - `commands`: literal command grammar
//! - `model`: catalog, account records, result shapes
//! - `ops`: account store, staging overlay, per-account transitions
//! - `apply` / `bulk`: single-command executor and batch processors
//! - `access`: admin gate, pause gate, risk-update policies
//! - `engine`: host-facing facade with logging

pub mod access;
pub mod apply;
pub mod bulk;
pub mod commands;
pub mod config;
pub mod digest;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;

// Re-export commonly used types
pub use access::{AdminOnlyRiskPolicy, EngineState, RiskUpdatePolicy, SelfOrAdminRiskPolicy};
pub use bulk::{CommandEntry, RiskUpdate, StrategyDirective};
pub use commands::{Action, AdminAction};
pub use config::EngineConfig;
pub use engine::{Invocation, StrategyEngine};
pub use errors::{EngineError, ExError, ExErrorKind, Result};
pub use model::{AccountState, ActionResult, RiskTier, StrategyId};
