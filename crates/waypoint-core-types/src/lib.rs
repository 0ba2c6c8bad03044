//! Core types shared across Waypoint facilities
//!
//! This crate provides foundational types used by both the error facility
//! and the logging facility of `waypoint-core`:
//!
//! - **Correlation types**: TransitionId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::TransitionId;
