pub mod staging;
pub mod store;
pub mod strategy_ops;

pub use staging::StagedAccounts;
pub use store::AccountStore;
