use chainchat_core::errors::{EngineError, ExError, ExErrorKind};
use chainchat_core::{RiskTier, StrategyId};
use chainchat_core_types::Principal;

#[test]
fn test_kind_code_status_mapping() {
    let kinds = vec![
        (ExErrorKind::Unauthorized, "ERR_UNAUTHORIZED", 401),
        (ExErrorKind::InvalidCommand, "ERR_INVALID_COMMAND", 402),
        (ExErrorKind::InvalidAmount, "ERR_INVALID_AMOUNT", 403),
        (ExErrorKind::StrategyNotFound, "ERR_STRATEGY_NOT_FOUND", 404),
        (ExErrorKind::StrategyActive, "ERR_STRATEGY_ACTIVE", 405),
        (ExErrorKind::AllocationExceeded, "ERR_ALLOCATION_EXCEEDED", 406),
        (ExErrorKind::InvariantViolation, "ERR_INVARIANT_VIOLATION", 500),
    ];

    for (kind, code, status) in kinds {
        assert_eq!(kind.code(), code);
        assert_eq!(kind.status(), status);
    }
}

#[test]
fn test_access_errors_are_unauthorized() {
    let errors = [
        EngineError::NotAdmin {
            caller: Principal::from("wallet_1"),
        },
        EngineError::EnginePaused,
        EngineError::ForeignRiskTarget {
            caller: Principal::from("wallet_1"),
            target: Principal::from("wallet_2"),
        },
    ];
    for err in errors {
        assert_eq!(err.kind(), ExErrorKind::Unauthorized);
    }
}

#[test]
fn test_grammar_errors_are_invalid_command() {
    let errors = [
        EngineError::UnknownCommand {
            command: "x".to_string(),
        },
        EngineError::UnknownAdminAction {
            action: "x".to_string(),
        },
        EngineError::UnknownStrategy { strategy_id: 7 },
        EngineError::UnknownRiskLevel { risk_level: 7 },
        EngineError::EmptyBatch,
        EngineError::BatchTooLarge { len: 11, max: 10 },
    ];
    for err in errors {
        assert_eq!(err.status(), 402, "{}", err);
    }
}

#[test]
fn test_allocation_error_structured_fields() {
    let err = EngineError::AllocationExceeded {
        principal: Principal::from("wallet_1"),
        tier: RiskTier::Low,
        amount: 10_000_000_001,
        ceiling: 10_000_000_000,
    };

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::AllocationExceeded);
    assert_eq!(ex.principal().map(Principal::as_str), Some("wallet_1"));
    assert!(ex.message().contains("10000000000"));
    assert_eq!(ex.entry_index(), None);
}

#[test]
fn test_nested_batch_error_keeps_innermost_kind() {
    let err = EngineError::StrategyActive {
        principal: Principal::from("wallet_1"),
        active: StrategyId::Safe,
    };
    let wrapped = EngineError::BatchEntryFailed {
        index: 4,
        source: Box::new(err.clone()),
    };

    assert_eq!(wrapped.status(), 405);
    assert_eq!(wrapped.root(), &err);

    let ex: ExError = wrapped.into();
    assert_eq!(ex.entry_index(), Some(4));
    assert_eq!(ex.principal().map(Principal::as_str), Some("wallet_1"));
    assert!(ex.to_string().starts_with("[405] ERR_STRATEGY_ACTIVE"));
}

#[test]
fn test_serialization_errors_convert() {
    let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
    let err: EngineError = json_err.into();
    assert_eq!(err.kind(), ExErrorKind::Serialization);
    assert_eq!(err.status(), 500);
}
