//! Strategy and risk catalog
//!
//! Static reference data: the enumerated strategies an account can run and
//! the risk tiers with their allocation ceilings. Amounts are in the
//! micro-denomination unit used throughout the engine.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Ceiling for the Low tier (10,000 whole units)
pub const LOW_MAX_ALLOCATION: u64 = 10_000_000_000;
/// Ceiling for the Medium tier (25,000 whole units)
pub const MEDIUM_MAX_ALLOCATION: u64 = 25_000_000_000;
/// Ceiling for the High tier (50,000 whole units)
pub const HIGH_MAX_ALLOCATION: u64 = 50_000_000_000;

/// Enumerated strategy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum StrategyId {
    Safe,
    Growth,
}

impl StrategyId {
    pub const ALL: [StrategyId; 2] = [StrategyId::Safe, StrategyId::Growth];

    /// Numeric identifier used on the wire
    pub fn id(self) -> u64 {
        match self {
            StrategyId::Safe => 1,
            StrategyId::Growth => 2,
        }
    }

    /// Resolve a numeric identifier
    ///
    /// # Errors
    ///
    /// Returns `UnknownStrategy` for anything other than 1 or 2.
    pub fn from_id(id: u64) -> Result<Self> {
        match id {
            1 => Ok(StrategyId::Safe),
            2 => Ok(StrategyId::Growth),
            other => Err(EngineError::UnknownStrategy { strategy_id: other }),
        }
    }
}

impl From<StrategyId> for u64 {
    fn from(id: StrategyId) -> Self {
        id.id()
    }
}

impl TryFrom<u64> for StrategyId {
    type Error = EngineError;

    fn try_from(id: u64) -> Result<Self> {
        StrategyId::from_id(id)
    }
}

/// Risk tier with an associated allocation ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Numeric level used on the wire
    pub fn level(self) -> u64 {
        match self {
            RiskTier::Low => 1,
            RiskTier::Medium => 2,
            RiskTier::High => 3,
        }
    }

    /// Maximum amount an account in this tier may lock
    pub fn max_allocation(self) -> u64 {
        match self {
            RiskTier::Low => LOW_MAX_ALLOCATION,
            RiskTier::Medium => MEDIUM_MAX_ALLOCATION,
            RiskTier::High => HIGH_MAX_ALLOCATION,
        }
    }

    /// Resolve a numeric level
    ///
    /// # Errors
    ///
    /// Returns `UnknownRiskLevel` for anything outside 1..=3.
    pub fn from_level(level: u64) -> Result<Self> {
        match level {
            1 => Ok(RiskTier::Low),
            2 => Ok(RiskTier::Medium),
            3 => Ok(RiskTier::High),
            other => Err(EngineError::UnknownRiskLevel { risk_level: other }),
        }
    }
}

impl From<RiskTier> for u64 {
    fn from(tier: RiskTier) -> Self {
        tier.level()
    }
}

impl TryFrom<u64> for RiskTier {
    type Error = EngineError;

    fn try_from(level: u64) -> Result<Self> {
        RiskTier::from_level(level)
    }
}
