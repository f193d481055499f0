//! Error handling middleware - RFC 7807 compliant responses.

use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};

use cookbook_core::DomainError;
use cookbook_core::error::NON_FIELD_ERRORS;
use cookbook_shared::ErrorResponse;

use crate::observability::current_request_id;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A single required field is missing.
    pub fn required(field: &str) -> Self {
        Self::invalid(field, "This field is required.")
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), vec![message.into()]);
        Self::Validation(errors)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => {
                ErrorResponse::bad_request("Invalid input.").with_errors(errors.clone())
            }
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(
                "You do not have permission to perform this action.",
            ),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        let error = match current_request_id() {
            Some(id) => error.with_request_id(id),
            None => error,
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("No {entity_type} matches the given query."))
            }
            DomainError::Validation(errors) => AppError::Validation(errors.into_inner()),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => {
                AppError::Unauthorized("Invalid token.".to_string())
            }
            DomainError::Forbidden { .. } => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Error handler for malformed JSON bodies.
pub fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid(NON_FIELD_ERRORS, err.to_string()).into()
}

/// Error handler for malformed query strings.
pub fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Error handler for path segments that do not parse (ids are UUIDs).
pub fn path_error(_err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Not found.".to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use uuid::Uuid;

    async fn body_json(err: AppError) -> serde_json::Value {
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_rt::test]
    async fn test_validation_errors_are_field_keyed() {
        let err = AppError::from(DomainError::invalid("title", "This field may not be blank."));

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = body_json(err).await;
        assert_eq!(body["errors"]["title"][0], "This field may not be blank.");
    }

    #[test]
    fn test_domain_error_status_codes() {
        let id = Uuid::now_v7();
        let cases = [
            (
                DomainError::NotFound {
                    entity_type: "recipe",
                    id,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Forbidden {
                    entity_type: "feed item",
                    id,
                },
                StatusCode::FORBIDDEN,
            ),
            (DomainError::Duplicate("taken".into()), StatusCode::CONFLICT),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                DomainError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (domain, status) in cases {
            assert_eq!(AppError::from(domain).status_code(), status);
        }
    }

    #[actix_rt::test]
    async fn test_internal_details_are_not_leaked() {
        let body = body_json(AppError::Internal("connection refused".into())).await;

        assert_eq!(body["status"], 500);
        assert!(!body.to_string().contains("connection refused"));
    }
}
