//! Shared helpers for engine integration tests

#![allow(dead_code)]

use chainchat_core::{CommandEntry, Invocation, RiskUpdate, StrategyDirective, StrategyEngine};
use chainchat_core_types::Principal;

pub const ADMIN: &str = "deployer";
pub const HEIGHT: u64 = 42;

/// Fresh engine administered by `ADMIN`
pub fn new_engine() -> StrategyEngine {
    StrategyEngine::new(ADMIN)
}

/// Invocation at the shared test height
pub fn inv(caller: &str) -> Invocation {
    Invocation::new(caller, HEIGHT)
}

pub fn admin() -> Invocation {
    inv(ADMIN)
}

pub fn wallet(n: usize) -> String {
    format!("wallet_{}", n)
}

pub fn principal(name: &str) -> Principal {
    Principal::from(name)
}

pub fn cmd(command: &str, amount: u64) -> CommandEntry {
    CommandEntry::new(command, amount)
}

pub fn directive(user: &str, action: &str, strategy_id: u64, amount: u64) -> StrategyDirective {
    StrategyDirective {
        user: Principal::from(user),
        action: action.to_string(),
        strategy_id,
        amount,
    }
}

pub fn risk(user: &str, risk_level: u64) -> RiskUpdate {
    RiskUpdate {
        user: Principal::from(user),
        risk_level,
    }
}

/// Start a strategy for `caller` through the self-service path
pub fn start(engine: &mut StrategyEngine, caller: &str, command: &str, amount: u64) {
    engine
        .execute_command(&inv(caller), command, amount)
        .unwrap();
}
