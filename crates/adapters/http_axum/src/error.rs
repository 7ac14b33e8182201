//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use cadence_domain::error::CadenceError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`CadenceError`] and malformed request bodies to an HTTP response
/// with the appropriate status code.
pub enum ApiError {
    Domain(CadenceError),
    MalformedBody(JsonRejection),
}

impl From<CadenceError> for ApiError {
    fn from(err: CadenceError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::MalformedBody(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(CadenceError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(CadenceError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(CadenceError::Unavailable) => {
                tracing::error!("scheduler is not running");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "scheduler is not running".to_string(),
                )
            }
            Self::MalformedBody(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use cadence_domain::error::{NotFoundError, ValidationError};

    use super::*;

    #[test]
    fn should_map_domain_errors_to_status_codes() {
        let cases = [
            (CadenceError::from(ValidationError::NoSteps), StatusCode::BAD_REQUEST),
            (CadenceError::from(NotFoundError::new("x")), StatusCode::NOT_FOUND),
            (CadenceError::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
