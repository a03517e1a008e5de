use chainchat_core_types::{Principal, RequestId, TraceId};
use thiserror::Error;

use crate::model::{RiskTier, StrategyId};

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind carries two stable identifiers: a string code for logs and
/// programmatic matching, and the numeric status code hosts report back to
/// callers (401, 402, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    /// Caller lacks the required privilege, or the engine is paused
    Unauthorized,
    /// Unparseable command, bad batch size, unknown literal or out-of-range id
    InvalidCommand,
    /// Start requested with a zero amount
    InvalidAmount,
    /// Exit or stop requested with no active strategy
    StrategyNotFound,
    /// Start requested while a strategy is already active
    StrategyActive,
    /// Start amount exceeds the account's risk-tier ceiling
    AllocationExceeded,

    // Internal
    InvariantViolation,
    Serialization,
    Config,
    Internal,
}

impl ExErrorKind {
    /// Get the stable string code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Unauthorized => "ERR_UNAUTHORIZED",
            ExErrorKind::InvalidCommand => "ERR_INVALID_COMMAND",
            ExErrorKind::InvalidAmount => "ERR_INVALID_AMOUNT",
            ExErrorKind::StrategyNotFound => "ERR_STRATEGY_NOT_FOUND",
            ExErrorKind::StrategyActive => "ERR_STRATEGY_ACTIVE",
            ExErrorKind::AllocationExceeded => "ERR_ALLOCATION_EXCEEDED",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Get the numeric status code reported to callers
    pub fn status(&self) -> u32 {
        match self {
            ExErrorKind::Unauthorized => 401,
            ExErrorKind::InvalidCommand => 402,
            ExErrorKind::InvalidAmount => 403,
            ExErrorKind::StrategyNotFound => 404,
            ExErrorKind::StrategyActive => 405,
            ExErrorKind::AllocationExceeded => 406,
            ExErrorKind::InvariantViolation
            | ExErrorKind::Serialization
            | ExErrorKind::Config
            | ExErrorKind::Internal => 500,
        }
    }
}

/// Canonical structured error type
///
/// Flattened view of an `EngineError` with classification fields for hosts
/// and enough context (operation, principal, batch entry) for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    principal: Option<Principal>,
    entry_index: Option<usize>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            principal: None,
            entry_index: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the principal the failure concerns
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Add the zero-based index of the failing batch entry
    pub fn with_entry_index(mut self, index: usize) -> Self {
        self.entry_index = Some(index);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable string code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the numeric status code
    pub fn status(&self) -> u32 {
        self.kind.status()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn entry_index(&self) -> Option<usize> {
        self.entry_index
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status(), self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(principal) = &self.principal {
            write!(f, " (principal: {})", principal)?;
        }
        if let Some(index) = self.entry_index {
            write!(f, " (entry: {})", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== Access Errors =====
    #[error("Caller {caller} is not the engine administrator")]
    NotAdmin { caller: Principal },

    #[error("Engine is paused")]
    EnginePaused,

    #[error("Caller {caller} may not update risk settings of {target}")]
    ForeignRiskTarget { caller: Principal, target: Principal },

    // ===== Grammar Errors =====
    #[error("Unrecognized command: {command:?}")]
    UnknownCommand { command: String },

    #[error("Unrecognized strategy action: {action:?}")]
    UnknownAdminAction { action: String },

    #[error("Unknown strategy id: {strategy_id}")]
    UnknownStrategy { strategy_id: u64 },

    #[error("Unknown risk level: {risk_level}")]
    UnknownRiskLevel { risk_level: u64 },

    #[error("Batch is empty")]
    EmptyBatch,

    #[error("Batch has {len} entries, at most {max} allowed")]
    BatchTooLarge { len: usize, max: usize },

    // ===== Account State Errors =====
    #[error("Cannot start a strategy for {principal} with a zero amount")]
    ZeroAmount { principal: Principal },

    #[error("No active strategy for {principal}")]
    StrategyNotFound { principal: Principal },

    #[error("Strategy {active:?} is already active for {principal}")]
    StrategyActive {
        principal: Principal,
        active: StrategyId,
    },

    #[error("Amount {amount} exceeds {tier:?} allocation ceiling {ceiling} for {principal}")]
    AllocationExceeded {
        principal: Principal,
        tier: RiskTier,
        amount: u64,
        ceiling: u64,
    },

    #[error("Invariant {invariant} violated for {principal}")]
    InvariantViolation {
        principal: Principal,
        invariant: &'static str,
    },

    // ===== Batch Errors =====
    #[error("Batch entry {index} failed: {source}")]
    BatchEntryFailed {
        index: usize,
        source: Box<EngineError>,
    },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl EngineError {
    /// Classify this error
    ///
    /// Batch failures report the kind of the entry that failed, so a caller
    /// sees the same code whether a command ran alone or inside a batch.
    pub fn kind(&self) -> ExErrorKind {
        match self {
            EngineError::NotAdmin { .. }
            | EngineError::EnginePaused
            | EngineError::ForeignRiskTarget { .. } => ExErrorKind::Unauthorized,

            EngineError::UnknownCommand { .. }
            | EngineError::UnknownAdminAction { .. }
            | EngineError::UnknownStrategy { .. }
            | EngineError::UnknownRiskLevel { .. }
            | EngineError::EmptyBatch
            | EngineError::BatchTooLarge { .. } => ExErrorKind::InvalidCommand,

            EngineError::ZeroAmount { .. } => ExErrorKind::InvalidAmount,
            EngineError::StrategyNotFound { .. } => ExErrorKind::StrategyNotFound,
            EngineError::StrategyActive { .. } => ExErrorKind::StrategyActive,
            EngineError::AllocationExceeded { .. } => ExErrorKind::AllocationExceeded,
            EngineError::InvariantViolation { .. } => ExErrorKind::InvariantViolation,

            EngineError::BatchEntryFailed { source, .. } => source.kind(),

            EngineError::Serialization { .. } => ExErrorKind::Serialization,
            EngineError::Config { .. } => ExErrorKind::Config,
        }
    }

    /// Numeric status code of this error (401, 402, ...)
    pub fn status(&self) -> u32 {
        self.kind().status()
    }

    /// The error of the failing entry, unwrapping batch context
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::BatchEntryFailed { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn at_entry(self, index: usize) -> Self {
        EngineError::BatchEntryFailed {
            index,
            source: Box::new(self),
        }
    }
}

impl From<EngineError> for ExError {
    fn from(err: EngineError) -> Self {
        let kind = err.kind();
        match err {
            EngineError::NotAdmin { caller } => ExError::new(kind)
                .with_principal(caller)
                .with_message("Caller is not the engine administrator"),

            EngineError::EnginePaused => ExError::new(kind).with_message("Engine is paused"),

            EngineError::ForeignRiskTarget { caller, target } => ExError::new(kind)
                .with_principal(caller)
                .with_message(format!("May not update risk settings of {}", target)),

            EngineError::UnknownCommand { command } => {
                ExError::new(kind).with_message(format!("Unrecognized command: {:?}", command))
            }

            EngineError::UnknownAdminAction { action } => ExError::new(kind)
                .with_message(format!("Unrecognized strategy action: {:?}", action)),

            EngineError::UnknownStrategy { strategy_id } => {
                ExError::new(kind).with_message(format!("Unknown strategy id: {}", strategy_id))
            }

            EngineError::UnknownRiskLevel { risk_level } => {
                ExError::new(kind).with_message(format!("Unknown risk level: {}", risk_level))
            }

            EngineError::EmptyBatch => ExError::new(kind).with_message("Batch is empty"),

            EngineError::BatchTooLarge { len, max } => ExError::new(kind)
                .with_message(format!("Batch has {} entries, at most {} allowed", len, max)),

            EngineError::ZeroAmount { principal } => ExError::new(kind)
                .with_principal(principal)
                .with_message("Cannot start a strategy with a zero amount"),

            EngineError::StrategyNotFound { principal } => ExError::new(kind)
                .with_principal(principal)
                .with_message("No active strategy"),

            EngineError::StrategyActive { principal, active } => ExError::new(kind)
                .with_principal(principal)
                .with_message(format!("Strategy {:?} is already active", active)),

            EngineError::AllocationExceeded {
                principal,
                tier,
                amount,
                ceiling,
            } => ExError::new(kind).with_principal(principal).with_message(format!(
                "Amount {} exceeds {:?} allocation ceiling {}",
                amount, tier, ceiling
            )),

            EngineError::InvariantViolation {
                principal,
                invariant,
            } => ExError::new(kind)
                .with_principal(principal)
                .with_message(format!("Invariant {} violated", invariant)),

            EngineError::BatchEntryFailed { index, source } => {
                let inner: ExError = (*source).into();
                let message = format!("Batch entry {} failed: {}", index, inner.message());
                inner.with_entry_index(index).with_message(message)
            }

            EngineError::Serialization { message } => ExError::new(kind).with_message(message),

            EngineError::Config { message } => ExError::new(kind).with_message(message),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::Config {
            message: err.to_string(),
        }
    }
}
