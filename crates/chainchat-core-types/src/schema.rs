//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the error facility and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Invocation context
pub const FIELD_CALLER: &str = "caller";
pub const FIELD_HEIGHT: &str = "height";

// Batch sizes
pub const FIELD_ENTRIES: &str = "entries";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_STATUS: &str = "err_status";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
