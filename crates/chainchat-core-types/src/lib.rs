//! Core types shared across the ChainChat engine facilities
//!
//! This crate provides foundational types used by the engine, its error
//! facility and its logging facility:
//!
//! - **Identity**: `Principal`, the account identifier supplied by the host
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod principal;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use principal::Principal;
