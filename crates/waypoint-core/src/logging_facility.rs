//! Structured logging facility for Waypoint
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions on emitted events
//!
//! # Usage
//!
//! ```rust
//! use waypoint_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! # Ownership
//!
//! The public reconciliation entry points own the `start`/`end`/`end_error`
//! lifecycle events. Per-level decisions inside the walk are emitted at
//! `debug`/`trace` level only.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
