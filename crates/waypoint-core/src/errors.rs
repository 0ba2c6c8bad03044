use thiserror::Error;
use waypoint_core_types::TransitionId;

/// Result type alias using WaypointError
pub type Result<T> = std::result::Result<T, WaypointError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the navigation
/// controller, tests, tooling) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Intent contract violations
    InsufficientParameters,
    TooManyContextObjects,
    InvalidInput,

    // Registry
    NotFound,

    // Configuration
    InvalidConfig,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InsufficientParameters => "ERR_INSUFFICIENT_PARAMETERS",
            ExErrorKind::TooManyContextObjects => "ERR_TOO_MANY_CONTEXT_OBJECTS",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Structured counterpart of [`WaypointError`]: classification fields for
/// programmatic handling plus the context needed to correlate the failure
/// with the transition that raised it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    route: Option<String>,
    transition_id: Option<TransitionId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            route: None,
            transition_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the route name the error is about
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Add transition correlation id
    pub fn with_transition_id(mut self, transition_id: TransitionId) -> Self {
        self.transition_id = Some(transition_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the route name, if any
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Get the transition id, if any
    pub fn transition_id(&self) -> Option<&TransitionId> {
        self.transition_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(route) = &self.route {
            write!(f, " (route: {})", route)?;
        }
        if let Some(transition_id) = &self.transition_id {
            write!(f, " (transition_id: {})", transition_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for reconciliation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaypointError {
    // ===== Intent contract violations =====
    /// A dynamic segment has neither a supplied primitive nor a reusable old value
    #[error("You didn't provide enough string/numeric parameters to satisfy all of the dynamic segments for route {route_name}")]
    InsufficientParameters { route_name: String },

    /// Context values remain after every dynamic segment was satisfied
    #[error("More context objects were passed than there are dynamic segments for the route: {target_route}")]
    TooManyContextObjects { target_route: String },

    /// Transition arguments are malformed (e.g. query params not in trailing position)
    #[error("Invalid transition arguments: {reason}")]
    InvalidArguments { reason: String },

    // ===== Registry =====
    /// The registry has no route with this name
    #[error("There is no route named {route_name}")]
    UnknownRoute { route_name: String },

    /// The registry returned an empty chain for this name
    #[error("Route {route_name} resolved to an empty handler chain")]
    EmptyRouteChain { route_name: String },

    // ===== Configuration =====
    /// Engine configuration could not be parsed
    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Conversion from WaypointError to ExError
impl From<WaypointError> for ExError {
    fn from(err: WaypointError) -> Self {
        match err {
            WaypointError::InsufficientParameters { route_name } => {
                ExError::new(ExErrorKind::InsufficientParameters)
                    .with_route(route_name)
                    .with_message("Not enough parameters for dynamic segments")
            }

            WaypointError::TooManyContextObjects { target_route } => {
                ExError::new(ExErrorKind::TooManyContextObjects)
                    .with_route(target_route)
                    .with_message("More context objects than dynamic segments")
            }

            WaypointError::InvalidArguments { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!("Invalid transition arguments: {}", reason)),

            WaypointError::UnknownRoute { route_name } => ExError::new(ExErrorKind::NotFound)
                .with_route(route_name)
                .with_op("handlers_for")
                .with_message("Route not found"),

            WaypointError::EmptyRouteChain { route_name } => ExError::new(ExErrorKind::Internal)
                .with_route(route_name)
                .with_op("handlers_for")
                .with_message("Registry returned an empty handler chain"),

            WaypointError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_message(format!("Invalid engine configuration: {}", reason)),
        }
    }
}

/// Conversion from toml deserialization errors to WaypointError
impl From<toml::de::Error> for WaypointError {
    fn from(err: toml::de::Error) -> Self {
        WaypointError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (
                ExErrorKind::InsufficientParameters,
                "ERR_INSUFFICIENT_PARAMETERS",
            ),
            (
                ExErrorKind::TooManyContextObjects,
                "ERR_TOO_MANY_CONTEXT_OBJECTS",
            ),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_code_and_route() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("handlers_for")
            .with_route("posts.show")
            .with_message("Route not found");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_NOT_FOUND]"));
        assert!(rendered.contains("handlers_for"));
        assert!(rendered.contains("(route: posts.show)"));
    }

    #[test]
    fn test_transition_id_none_by_default() {
        let err = ExError::new(ExErrorKind::Internal);
        assert!(err.transition_id().is_none());
        assert!(err.route().is_none());
    }
}
