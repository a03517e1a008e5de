//! Property tests over random call sequences
//!
//! After every call, successful or not:
//! - `is_active` iff `locked_amount > 0` iff a strategy is set, for every account
//! - a failed call leaves the state digest unchanged

mod common;

use chainchat_core::commands::COMMAND_TABLE;
use chainchat_core::{CommandEntry, StrategyEngine};
use common::*;
use proptest::prelude::*;

const CALLERS: [&str; 4] = ["deployer", "wallet_1", "wallet_2", "wallet_3"];

#[derive(Debug, Clone)]
enum Call {
    Execute { caller: usize, command: String, amount: u64 },
    Bulk { caller: usize, entries: Vec<(String, u64)> },
    Manage { caller: usize, entries: Vec<(usize, String, u64, u64)> },
    Risk { caller: usize, entries: Vec<(usize, u64)> },
    Pause { caller: usize },
    Resume { caller: usize },
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (0..COMMAND_TABLE.len()).prop_map(|i| COMMAND_TABLE[i].0.to_string()),
        1 => Just("invalid command".to_string()),
    ]
}

fn amount_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0u64),
        1u64..1_000_000,
        Just(10_000_000_000u64),
        Just(10_000_000_001u64),
        Just(60_000_000_000u64),
    ]
}

fn admin_action_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("start".to_string()),
        Just("stop".to_string()),
        Just("emergency-stop".to_string()),
        Just("halt".to_string()),
    ]
}

fn call_strategy() -> impl Strategy<Value = Call> {
    let caller = 0..CALLERS.len();
    prop_oneof![
        4 => (caller.clone(), command_strategy(), amount_strategy())
            .prop_map(|(caller, command, amount)| Call::Execute { caller, command, amount }),
        2 => (caller.clone(), prop::collection::vec((command_strategy(), amount_strategy()), 0..7))
            .prop_map(|(caller, entries)| Call::Bulk { caller, entries }),
        2 => (
            caller.clone(),
            prop::collection::vec((1..CALLERS.len(), admin_action_strategy(), 0u64..4, amount_strategy()), 0..12)
        )
            .prop_map(|(caller, entries)| Call::Manage { caller, entries }),
        2 => (caller.clone(), prop::collection::vec((1..CALLERS.len(), 0u64..5), 0..12))
            .prop_map(|(caller, entries)| Call::Risk { caller, entries }),
        1 => caller.clone().prop_map(|caller| Call::Pause { caller }),
        1 => caller.prop_map(|caller| Call::Resume { caller }),
    ]
}

fn run(engine: &mut StrategyEngine, call: &Call) -> bool {
    match call {
        Call::Execute { caller, command, amount } => engine
            .execute_command(&inv(CALLERS[*caller]), command, *amount)
            .is_ok(),
        Call::Bulk { caller, entries } => {
            let entries: Vec<CommandEntry> = entries.iter().map(|(c, a)| cmd(c, *a)).collect();
            engine
                .bulk_execute_commands(&inv(CALLERS[*caller]), &entries)
                .is_ok()
        }
        Call::Manage { caller, entries } => {
            let directives: Vec<_> = entries
                .iter()
                .map(|(user, action, id, amount)| directive(CALLERS[*user], action, *id, *amount))
                .collect();
            engine
                .bulk_manage_strategies(&inv(CALLERS[*caller]), &directives)
                .is_ok()
        }
        Call::Risk { caller, entries } => {
            let updates: Vec<_> = entries
                .iter()
                .map(|(user, level)| risk(CALLERS[*user], *level))
                .collect();
            engine
                .bulk_update_risk_settings(&inv(CALLERS[*caller]), &updates)
                .is_ok()
        }
        Call::Pause { caller } => engine.pause_engine(&inv(CALLERS[*caller])).is_ok(),
        Call::Resume { caller } => engine.resume_engine(&inv(CALLERS[*caller])).is_ok(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn pbt_account_invariants_hold(calls in prop::collection::vec(call_strategy(), 0..40)) {
        let mut engine = new_engine();

        for call in &calls {
            let before = engine.state_digest().unwrap();
            let ok = run(&mut engine, call);

            if !ok {
                prop_assert_eq!(engine.state_digest().unwrap(), before, "failed call mutated state: {:?}", call);
            }

            for (principal, account) in engine.accounts().iter() {
                prop_assert_eq!(account.is_active, account.active_strategy.is_some(), "{}", principal);
                prop_assert_eq!(account.locked_amount > 0, account.is_active, "{}", principal);
            }
        }
    }

    #[test]
    fn pbt_start_bounded_by_tier(level in 1u64..=3, amount in 1u64..100_000_000_000) {
        let mut engine = new_engine();
        engine
            .bulk_update_risk_settings(&admin(), &[risk("wallet_1", level)])
            .unwrap();
        let ceiling = engine.max_allocation(level).unwrap();

        let result = engine.execute_command(&inv("wallet_1"), "start safe strategy", amount);
        if amount > ceiling {
            prop_assert_eq!(result.unwrap_err().status(), 406);
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn pbt_admin_start_bounded_by_target_tier(level in 1u64..=3, amount in 1u64..100_000_000_000) {
        let mut engine = new_engine();
        engine
            .bulk_update_risk_settings(&admin(), &[risk("wallet_2", level)])
            .unwrap();
        let ceiling = engine.max_allocation(level).unwrap();

        let result = engine.bulk_manage_strategies(
            &admin(),
            &[directive("wallet_2", "start", 2, amount)],
        );
        if amount > ceiling {
            let err = result.unwrap_err();
            prop_assert_eq!(err.status(), 406);
            prop_assert!(!engine.get_user_strategy(&principal("wallet_2")).unwrap().is_active);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(
                engine.get_user_strategy(&principal("wallet_2")).unwrap().locked_amount,
                amount
            );
        }
    }
}
