//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Operation macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) that
//!   every engine entry point uses to emit exactly one start event and one
//!   end or end_error event
//! - In-memory capture layer for assertions in tests
//!
//! # Usage
//!
//! ```rust
//! use chainchat_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
