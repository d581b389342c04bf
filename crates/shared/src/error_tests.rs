use super::*;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::NotFound("test".into()).status_code(), 404);
    assert_eq!(AppError::Validation("test".into()).status_code(), 400);
    assert_eq!(AppError::BusinessRule("test".into()).status_code(), 422);
    assert_eq!(AppError::Conflict("test".into()).status_code(), 409);
    assert_eq!(AppError::Database("test".into()).status_code(), 500);
    assert_eq!(AppError::ExternalService("test".into()).status_code(), 502);
    assert_eq!(AppError::Internal("test".into()).status_code(), 500);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::Validation("test".into()).error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(
        AppError::BusinessRule("test".into()).error_code(),
        "BUSINESS_RULE_VIOLATION"
    );
    assert_eq!(AppError::Conflict("test".into()).error_code(), "CONFLICT");
    assert_eq!(
        AppError::Database("test".into()).error_code(),
        "DATABASE_ERROR"
    );
    assert_eq!(
        AppError::ExternalService("test".into()).error_code(),
        "EXTERNAL_SERVICE_ERROR"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_retryable() {
    assert!(AppError::Conflict("test".into()).is_retryable());
    assert!(AppError::Database("test".into()).is_retryable());
    assert!(AppError::ExternalService("test".into()).is_retryable());
    assert!(!AppError::Validation("test".into()).is_retryable());
    assert!(!AppError::NotFound("test".into()).is_retryable());
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::Validation("customer is required".into()).to_string(),
        "Validation error: customer is required"
    );
    assert_eq!(
        AppError::Conflict("msg".into()).to_string(),
        "Conflict: msg"
    );
    assert_eq!(
        AppError::ExternalService("msg".into()).to_string(),
        "External service error: msg"
    );
}
