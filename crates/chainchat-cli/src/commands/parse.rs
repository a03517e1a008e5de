//! Parse command
//!
//! Usage: chainchat parse "<command>"

use chainchat_core::commands::{parse_command, Action};
use chainchat_core::ExError;
use clap::Args;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Command literal, matched exactly
    pub command: String,
}

pub fn execute(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let action = parse_command(&args.command)
        .map_err(|e| ExError::from(e).with_op("parse_command"))?;
    println!("{}", describe(action));
    Ok(())
}

fn describe(action: Action) -> String {
    match action {
        Action::StartStrategy(id) => format!("start strategy {:?} (strategyId {})", id, id.id()),
        Action::SetRisk(tier) => format!(
            "set risk {:?} (riskLevel {}, maxAllocation {})",
            tier,
            tier.level(),
            tier.max_allocation()
        ),
        Action::ExitAll => "exit all positions".to_string(),
    }
}
