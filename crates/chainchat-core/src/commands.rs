//! Command grammar
//!
//! The engine accepts a closed vocabulary of literal command strings. Parsing
//! is an exact, case-sensitive table lookup: no trimming, no normalization and
//! no fuzzy matching. Anything richer (natural language, aliases) must be
//! translated into one of these literals before it reaches the engine.

use crate::errors::{EngineError, Result};
use crate::model::{RiskTier, StrategyId};

/// Typed action produced from a command literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Lock the accompanying amount into the given strategy
    StartStrategy(StrategyId),
    /// Select a risk tier; the amount is ignored
    SetRisk(RiskTier),
    /// Release all locked funds; the amount is ignored
    ExitAll,
}

/// Self-service command literals and the actions they map to
pub const COMMAND_TABLE: [(&str, Action); 6] = [
    ("start safe strategy", Action::StartStrategy(StrategyId::Safe)),
    ("start growth strategy", Action::StartStrategy(StrategyId::Growth)),
    ("set risk low", Action::SetRisk(RiskTier::Low)),
    ("set risk medium", Action::SetRisk(RiskTier::Medium)),
    ("set risk high", Action::SetRisk(RiskTier::High)),
    ("exit all positions", Action::ExitAll),
];

/// Parse a self-service command literal
///
/// # Errors
///
/// Returns `UnknownCommand` for any string not in the table.
pub fn parse_command(command: &str) -> Result<Action> {
    COMMAND_TABLE
        .iter()
        .find(|(literal, _)| *literal == command)
        .map(|(_, action)| *action)
        .ok_or_else(|| EngineError::UnknownCommand {
            command: command.to_string(),
        })
}

/// Administrative directive verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// Start a strategy for the target account
    Start,
    /// Exit the target account's strategy, returning its locked funds
    Stop,
    /// Forcibly clear the target account's strategy, whatever its state
    EmergencyStop,
}

impl AdminAction {
    /// Directive verb as it appears on the wire
    pub fn literal(self) -> &'static str {
        match self {
            AdminAction::Start => "start",
            AdminAction::Stop => "stop",
            AdminAction::EmergencyStop => "emergency-stop",
        }
    }
}

/// Parse an administrative directive verb
///
/// # Errors
///
/// Returns `UnknownAdminAction` for anything other than `start`, `stop` or
/// `emergency-stop`.
pub fn parse_admin_action(action: &str) -> Result<AdminAction> {
    match action {
        "start" => Ok(AdminAction::Start),
        "stop" => Ok(AdminAction::Stop),
        "emergency-stop" => Ok(AdminAction::EmergencyStop),
        other => Err(EngineError::UnknownAdminAction {
            action: other.to_string(),
        }),
    }
}
