pub mod account;
pub mod catalog;
pub mod results;

pub use account::AccountState;
pub use catalog::{RiskTier, StrategyId};
pub use results::{ActionResult, BulkCommandsResult, ManageResult, RiskUpdateResult};
