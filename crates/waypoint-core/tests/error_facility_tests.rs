#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::blog_routes;
use waypoint_core::errors::{ExError, ExErrorKind, WaypointError};
use waypoint_core::{reconcile, EngineConfig, NamedTransitionIntent, TransitionState};

#[test]
fn test_insufficient_parameters_verifiable_by_kind() {
    let err = WaypointError::InsufficientParameters {
        route_name: "post".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InsufficientParameters);
    assert_eq!(ex_err.code(), "ERR_INSUFFICIENT_PARAMETERS");
    assert_eq!(ex_err.route(), Some("post"));
}

#[test]
fn test_too_many_contexts_distinct_from_insufficient() {
    let err = WaypointError::TooManyContextObjects {
        target_route: "post".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::TooManyContextObjects);
    assert_ne!(ex_err.kind(), ExErrorKind::InsufficientParameters);
    assert_eq!(ex_err.route(), Some("post"));
}

#[test]
fn test_unknown_route_maps_to_not_found() {
    let err = WaypointError::UnknownRoute {
        route_name: "nowhere".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.op(), Some("handlers_for"));
}

#[test]
fn test_invalid_arguments_structured_fields() {
    let err = WaypointError::InvalidArguments {
        reason: "query params must be the last argument".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(ex_err.code(), "ERR_INVALID_INPUT");
    assert!(ex_err.message().contains("last argument"));
}

#[test]
fn test_config_error_maps_to_invalid_config() {
    let err = EngineConfig::from_toml_str("stale_fallback = 3").unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidConfig);
    assert_eq!(ex_err.code(), "ERR_INVALID_CONFIG");
}

#[test]
fn test_error_report_correlates_with_intent() {
    let routes = blog_routes();
    let intent = NamedTransitionIntent::new("post");

    let err = reconcile(&routes, &intent, &TransitionState::new(), false).unwrap_err();
    let report = intent.error_report(err);

    assert_eq!(report.kind(), ExErrorKind::InsufficientParameters);
    assert_eq!(report.op(), Some("reconcile"));
    assert_eq!(report.transition_id(), Some(&intent.transition_id));
    assert!(report
        .to_string()
        .contains(&format!("(transition_id: {})", intent.transition_id)));
}

#[test]
fn test_error_kind_code_mapping() {
    // Each kind has a stable, unique code
    let kinds = vec![
        (
            ExErrorKind::InsufficientParameters,
            "ERR_INSUFFICIENT_PARAMETERS",
        ),
        (
            ExErrorKind::TooManyContextObjects,
            "ERR_TOO_MANY_CONTEXT_OBJECTS",
        ),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
