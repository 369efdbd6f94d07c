use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Generic message returned for any collaborator fault. Upstream error text
/// never reaches the caller.
pub const INTERNAL_ERROR: &str = "Internal error";

/// Error attached to a single field of a request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.to_string(),
            value: None,
        }
    }
}

/// Failed outcome of an operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    #[serde(skip)]
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl Failure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }
}

/// Uniform outcome of every operation that crosses a collaborator boundary.
///
/// Success and failure are told apart by `status` alone: a result is
/// successful iff its status lies in `[200, 300)`. Constructors keep the
/// variant consistent with that rule, but callers must still branch on
/// [`ServiceResult::is_success`] rather than on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult<T> {
    Success { status: u16, data: T },
    Failure(Failure),
}

/// Returns true when `status` is in the 2xx range
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

impl<T> ServiceResult<T> {
    /// Success with status 200
    pub fn ok(data: T) -> Self {
        Self::Success { status: 200, data }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(status, message))
    }

    pub fn invalid(status: u16, message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self::Failure(Failure {
            status,
            message: message.into(),
            errors: Some(errors),
        })
    }

    /// Failure 500 with the generic, non-leaking message
    pub fn internal_error() -> Self {
        Self::failure(500, INTERNAL_ERROR)
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } => *status,
            Self::Failure(failure) => failure.status,
        }
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status())
    }

    /// Splits the result into data or failure, classifying by status only.
    ///
    /// A `Success` variant whose status is outside 2xx is reported as a
    /// failure with the generic internal message.
    pub fn into_result(self) -> Result<T, Failure> {
        let success = self.is_success();
        match self {
            Self::Success { data, .. } if success => Ok(data),
            Self::Success { status, .. } => Err(Failure::new(status, INTERNAL_ERROR)),
            Self::Failure(failure) => Err(failure),
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (status_code(self.status), Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ServiceResult<T> {
    fn into_response(self) -> Response {
        let status = status_code(self.status());
        match self.into_result() {
            Ok(data) => (status, Json(data)).into_response(),
            Err(failure) => failure.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_for_200() {
        let result: ServiceResult<()> = ServiceResult::ok(());
        assert!(result.is_success());
    }

    #[test]
    fn test_is_success_within_2xx() {
        let result = ServiceResult::Success {
            status: 250,
            data: (),
        };
        assert!(result.is_success());
    }

    #[test]
    fn test_is_not_success_below_200() {
        let result = ServiceResult::Success {
            status: 100,
            data: (),
        };
        assert!(!result.is_success());
    }

    #[test]
    fn test_is_not_success_at_300() {
        let result = ServiceResult::Success {
            status: 300,
            data: (),
        };
        assert!(!result.is_success());
    }

    #[test]
    fn test_is_not_success_above_300() {
        let result = ServiceResult::Success {
            status: 401,
            data: (),
        };
        assert!(!result.is_success());
    }

    #[test]
    fn test_into_result_uses_status_not_variant() {
        let result = ServiceResult::Success {
            status: 404,
            data: "payload",
        };
        let failure = result.into_result().unwrap_err();
        assert_eq!(failure.status, 404);
        assert_eq!(failure.message, INTERNAL_ERROR);
    }

    #[test]
    fn test_internal_error() {
        let result: ServiceResult<()> = ServiceResult::internal_error();
        assert_eq!(result.status(), 500);
        assert_eq!(result, ServiceResult::failure(500, "Internal error"));
    }

    #[test]
    fn test_failure_serialization_skips_status() {
        let failure = Failure::new(400, "Bad request");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Bad request" }));
    }

    #[test]
    fn test_failure_serialization_with_field_errors() {
        let result: ServiceResult<()> = ServiceResult::invalid(
            400,
            "Invalid request",
            vec![FieldError::new("Score", "Score is required.")],
        );
        let failure = result.into_result().unwrap_err();
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Invalid request",
                "errors": [{ "field": "Score", "message": "Score is required." }]
            })
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ServiceResult::<()>::failure(400, "nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ServiceResult::ok(1).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
