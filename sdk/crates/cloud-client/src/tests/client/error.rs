use crate::ClientError;

#[test]
fn test_api_error_exposes_status() {
    let err = ClientError::api_error(404, "NOT_FOUND".into(), "User not found".into());

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("NOT_FOUND"));
    assert!(err.to_string().contains("User not found"));
}

#[test]
fn test_server_errors_are_transient() {
    assert!(ClientError::api_error(503, "UNAVAILABLE".into(), "down".into()).is_transient());
    assert!(ClientError::api_error(429, "RATE_LIMITED".into(), "slow down".into()).is_transient());
}

#[test]
fn test_client_errors_are_not_transient() {
    assert!(!ClientError::api_error(400, "BAD_REQUEST".into(), "nope".into()).is_transient());
}

#[test]
fn test_json_error_converts_and_has_no_status() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: ClientError = json_err.into();

    assert!(matches!(err, ClientError::Json { .. }));
    assert_eq!(err.status(), None);
    assert!(!err.is_transient());
}
