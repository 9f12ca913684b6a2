//! Shared-secret check for mutating and generation endpoints.

use crate::error_handler::AppError;

/// Compares the provided token against the configured secret.
///
/// A blank configured secret is a server misconfiguration (500), never an
/// open door. Mismatches return the fixed 403 message.
pub fn require_service_token(expected: &str, provided: &str) -> Result<(), AppError> {
    let expected = expected.trim();
    if expected.is_empty() {
        return Err(AppError::Config(
            "service token is not configured on the server side".into(),
        ));
    }
    if provided.trim() != expected {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_token_passes() {
        assert!(require_service_token("s3cret", "s3cret").is_ok());
        assert!(require_service_token("s3cret", "  s3cret  ").is_ok());
    }

    #[test]
    fn mismatch_is_forbidden() {
        let err = require_service_token("s3cret", "wrong").unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn empty_provided_token_is_forbidden() {
        let err = require_service_token("s3cret", "").unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn unconfigured_secret_is_a_server_error() {
        let err = require_service_token("   ", "anything").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
