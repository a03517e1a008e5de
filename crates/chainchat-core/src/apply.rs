//! Single-command executor
//!
//! `apply()` runs one typed `Action` for one principal against a staging
//! overlay and returns the shaped result the host reports back.
//!
//! ## Atomicity Contract
//!
//! - Writes only ever land in the overlay. Callers commit the overlay when the
//!   whole call succeeds and drop it otherwise.
//! - Preconditions are checked before the first write, so a failed action
//!   leaves the overlay as it found it.
//! - No panics: invalid input returns typed errors.
//!
//! ## Example
//!
//! ```
//! use chainchat_core::apply::apply;
//! use chainchat_core::commands::parse_command;
//! use chainchat_core::ops::{AccountStore, StagedAccounts};
//! use chainchat_core_types::Principal;
//!
//! let mut store = AccountStore::new();
//! let alice = Principal::from("alice");
//!
//! let mut staged = StagedAccounts::new(&store);
//! let action = parse_command("start safe strategy").unwrap();
//! apply(&mut staged, &alice, action, 5_000_000, 12).unwrap();
//!
//! let changes = staged.into_changes();
//! store.commit(changes);
//! assert!(store.get(&alice).unwrap().is_active);
//! ```

use chainchat_core_types::Principal;

use crate::commands::Action;
use crate::errors::Result;
use crate::model::ActionResult;
use crate::ops::{strategy_ops, StagedAccounts};

/// Apply one action to a principal's account
///
/// # Arguments
///
/// * `staged` - Overlay the action writes into
/// * `principal` - Account the action targets
/// * `action` - Parsed action
/// * `amount` - Funds to lock for a start; ignored otherwise
/// * `height` - Execution height, echoed as `timestamp`
///
/// # Errors
///
/// Returns `StrategyActive`, `ZeroAmount` or `AllocationExceeded` for a
/// rejected start and `StrategyNotFound` for an exit with nothing running.
pub fn apply(
    staged: &mut StagedAccounts<'_>,
    principal: &Principal,
    action: Action,
    amount: u64,
    height: u64,
) -> Result<ActionResult> {
    match action {
        Action::StartStrategy(strategy_id) => {
            strategy_ops::start_strategy(staged, principal, strategy_id, amount)?;
            Ok(ActionResult::StrategyStarted {
                strategy_id,
                timestamp: height,
            })
        }

        Action::SetRisk(risk_level) => {
            strategy_ops::set_risk(staged, principal, risk_level);
            Ok(ActionResult::RiskSet {
                risk_level,
                timestamp: height,
            })
        }

        Action::ExitAll => {
            let amount_returned = strategy_ops::exit_all(staged, principal)?;
            Ok(ActionResult::PositionsExited {
                amount_returned,
                timestamp: height,
            })
        }
    }
}
