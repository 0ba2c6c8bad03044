//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the engine, and tests that assert on captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_TRANSITION_ID: &str = "transition_id";

// Reconciliation context
pub const FIELD_TARGET: &str = "target";
pub const FIELD_MODE: &str = "mode";
pub const FIELD_CHAIN_LEN: &str = "chain_len";
pub const FIELD_INVALIDATE_INDEX: &str = "invalidate_index";
pub const FIELD_ROUTE: &str = "route";
pub const FIELD_INDEX: &str = "index";
pub const FIELD_ADOPTED: &str = "adopted";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
