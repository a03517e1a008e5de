//! Replay command
//!
//! Usage: chainchat replay <SCRIPT> [--config <FILE>] [--admin <PRINCIPAL>]
//!
//! The script is a JSON array of steps:
//!
//! ```json
//! [
//!   {"caller": "wallet_1", "height": 1,
//!    "call": {"type": "execute_command", "command": "start safe strategy", "amount": 5000000}},
//!   {"caller": "deployer", "height": 2, "call": {"type": "pause_engine"}}
//! ]
//! ```
//!
//! Each step prints one JSON line, `{"ok": ...}` or `{"err": {...}}`. A final
//! summary line carries the state digest, the number of accounts running a
//! strategy and the total locked amount. Rejected calls are normal outcomes
//! and do not change the exit status.

use std::path::PathBuf;

use chainchat_core::engine::{
    OP_BULK_EXECUTE_COMMANDS, OP_BULK_MANAGE_STRATEGIES, OP_BULK_UPDATE_RISK_SETTINGS,
    OP_EXECUTE_COMMAND, OP_PAUSE_ENGINE, OP_RESUME_ENGINE,
};
use chainchat_core::logging_facility::{self, Profile};
use chainchat_core::{
    CommandEntry, EngineConfig, EngineError, ExError, Invocation, RiskUpdate, StrategyDirective,
    StrategyEngine,
};
use chainchat_core_types::{Principal, RequestContext, RequestId};
use clap::Args;
use serde::{Deserialize, Serialize};

const DEFAULT_ADMIN: &str = "deployer";

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Path to the JSON script
    pub script: PathBuf,

    /// Engine configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Administrator principal; overrides the configured one
    #[arg(long)]
    pub admin: Option<String>,
}

/// One scripted invocation
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub caller: Principal,
    pub height: u64,
    #[serde(default)]
    pub request_id: Option<String>,
    pub call: Call,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Call {
    ExecuteCommand {
        command: String,
        #[serde(default)]
        amount: u64,
    },
    BulkExecuteCommands {
        entries: Vec<CommandEntry>,
    },
    BulkManageStrategies {
        directives: Vec<StrategyDirective>,
    },
    BulkUpdateRiskSettings {
        updates: Vec<RiskUpdate>,
    },
    PauseEngine,
    ResumeEngine,
    GetUserStrategy {
        principal: Principal,
    },
}

/// Printed result of one step
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok(serde_json::Value),
    Err(ErrorBody),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u32,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<usize>,
}

/// Final line of a replay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub digest: String,
    pub active_accounts: usize,
    pub total_locked: u128,
}

impl Summary {
    /// Summarize the engine's current state
    ///
    /// # Errors
    ///
    /// `Serialization` if the state cannot be digested.
    pub fn of(engine: &StrategyEngine) -> chainchat_core::Result<Self> {
        Ok(Self {
            digest: engine.state_digest()?,
            active_accounts: engine.accounts().active_count(),
            total_locked: engine.accounts().total_locked(),
        })
    }
}

impl From<ExError> for ErrorBody {
    fn from(ex: ExError) -> Self {
        Self {
            code: ex.status(),
            kind: ex.code(),
            message: ex.message().to_string(),
            entry: ex.entry_index(),
        }
    }
}

pub fn execute(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::new(Principal::from(DEFAULT_ADMIN)),
    };
    if let Some(admin) = args.admin {
        config.admin = Principal::from(admin);
    }
    logging_facility::init(if args.config.is_some() {
        config.log_profile
    } else {
        Profile::Test
    });

    let source = std::fs::read_to_string(&args.script)
        .map_err(|e| format!("Could not read script {}: {}", args.script.display(), e))?;
    let steps: Vec<Step> = serde_json::from_str(&source).map_err(EngineError::from)?;

    let mut engine = StrategyEngine::from_config(&config);
    for step in &steps {
        let outcome = run_step(&mut engine, step)?;
        println!("{}", serde_json::to_string(&outcome)?);
    }

    println!("{}", serde_json::to_string(&Summary::of(&engine)?)?);
    Ok(())
}

/// Run one step, turning engine rejections into an `Err` outcome
///
/// # Errors
///
/// Only fails if a successful result cannot be encoded.
pub fn run_step(
    engine: &mut StrategyEngine,
    step: &Step,
) -> Result<Outcome, serde_json::Error> {
    let mut inv = Invocation::new(step.caller.clone(), step.height);
    if let Some(request_id) = &step.request_id {
        inv = inv.with_context(RequestContext::with_request_id(RequestId::from_string(
            request_id.clone(),
        )));
    }

    let (op, result) = match &step.call {
        Call::ExecuteCommand { command, amount } => (
            OP_EXECUTE_COMMAND,
            encode(engine.execute_command(&inv, command, *amount)),
        ),
        Call::BulkExecuteCommands { entries } => (
            OP_BULK_EXECUTE_COMMANDS,
            encode(engine.bulk_execute_commands(&inv, entries)),
        ),
        Call::BulkManageStrategies { directives } => (
            OP_BULK_MANAGE_STRATEGIES,
            encode(engine.bulk_manage_strategies(&inv, directives)),
        ),
        Call::BulkUpdateRiskSettings { updates } => (
            OP_BULK_UPDATE_RISK_SETTINGS,
            encode(engine.bulk_update_risk_settings(&inv, updates)),
        ),
        Call::PauseEngine => (OP_PAUSE_ENGINE, encode(engine.pause_engine(&inv))),
        Call::ResumeEngine => (OP_RESUME_ENGINE, encode(engine.resume_engine(&inv))),
        Call::GetUserStrategy { principal } => (
            "get_user_strategy",
            encode(Ok(engine.get_user_strategy(principal))),
        ),
    };

    Ok(match result? {
        Ok(value) => Outcome::Ok(value),
        Err(err) => Outcome::Err(inv.ex_error(op, err).into()),
    })
}

fn encode<T: Serialize>(
    result: chainchat_core::Result<T>,
) -> Result<chainchat_core::Result<serde_json::Value>, serde_json::Error> {
    match result {
        Ok(value) => serde_json::to_value(value).map(Ok),
        Err(err) => Ok(Err(err)),
    }
}
