//! Typed results returned by the engine entry points
//!
//! Field names serialize in the camelCase form hosts and UIs read
//! (`strategyId`, `amountReturned`, ...).

use serde::{Deserialize, Serialize};

use super::catalog::{RiskTier, StrategyId};

/// Result of one executed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResult {
    /// A strategy was started
    #[serde(rename_all = "camelCase")]
    StrategyStarted {
        strategy_id: StrategyId,
        timestamp: u64,
    },

    /// Risk tier set via the risk-update path (reports the ceiling)
    #[serde(rename_all = "camelCase")]
    RiskUpdated {
        risk_level: RiskTier,
        max_allocation: u64,
        timestamp: u64,
    },

    /// Risk tier set via the general command path
    #[serde(rename_all = "camelCase")]
    RiskSet { risk_level: RiskTier, timestamp: u64 },

    /// Positions exited and locked funds released
    #[serde(rename_all = "camelCase")]
    PositionsExited { amount_returned: u64, timestamp: u64 },
}

/// Result of a self-service batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCommandsResult {
    pub total_commands: u64,
    pub results: Vec<ActionResult>,
}

/// Result of one administrative directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManageResult {
    /// `start` or `stop`, reported like the equivalent self-service action
    Action(ActionResult),
    /// `emergency-stop`, reported as a wrapped success flag
    EmergencyStopped { ok: bool },
}

/// Result of one risk-update entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskUpdateResult {
    pub risk_level: RiskTier,
    pub max_allocation: u64,
    pub timestamp: u64,
}

impl From<RiskUpdateResult> for ActionResult {
    fn from(r: RiskUpdateResult) -> Self {
        ActionResult::RiskUpdated {
            risk_level: r.risk_level,
            max_allocation: r.max_allocation,
            timestamp: r.timestamp,
        }
    }
}
