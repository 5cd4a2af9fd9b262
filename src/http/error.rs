//! Error taxonomy and response mapping for the submission API.
//!
//! # Responsibilities
//! - Convert every pipeline failure into a status code + JSON envelope
//! - Record the outcome metric for each rejection class
//! - Log operator faults (mail configuration, transport trouble) with
//!   full diagnostics while the caller only sees generic text
//!
//! # Design Decisions
//! - All errors are handled here; nothing propagates as an unhandled fault
//! - Credential material is never echoed, only its length class

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::mail::{MailConfigError, MailError};
use crate::observability::metrics;
use crate::submission::ValidationError;

/// JSON envelope carried by every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// A request that did not make it through the pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body could not be parsed: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("submission quota exhausted")]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => {
                metrics::record_submission("bad_request");
                tracing::debug!(detail = %detail, "Rejected malformed request body");
                reply(StatusCode::BAD_REQUEST, "Request body could not be parsed.")
            }
            ApiError::Validation(err) => {
                metrics::record_submission("invalid");
                tracing::debug!(error = %err, "Rejected invalid submission");
                reply(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::RateLimited { retry_after } => {
                metrics::record_rate_limited();
                let minutes = retry_after.as_secs().div_ceil(60).max(1);
                let mut response = reply(
                    StatusCode::TOO_MANY_REQUESTS,
                    format!("Too many submissions. Please try again in {minutes} minute(s)."),
                );
                if let Ok(value) = header::HeaderValue::from_str(&retry_after.as_secs().to_string())
                {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            ApiError::Mail(MailError::Config(err)) => {
                metrics::record_submission("config_error");
                tracing::error!(error = %err, "Mail configuration problem");
                reply(StatusCode::INTERNAL_SERVER_ERROR, config_message(&err))
            }
            ApiError::Mail(err) => {
                metrics::record_submission("mail_error");
                tracing::error!(error = %err, "Mail dispatch failed");
                reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not send your request right now. Please try again later.",
                )
            }
            ApiError::MethodNotAllowed => reply(
                StatusCode::METHOD_NOT_ALLOWED,
                "Only POST is accepted on this endpoint.",
            ),
        }
    }
}

/// Client-facing text for configuration faults. Points the operator at
/// the problem class without echoing any secret material.
fn config_message(err: &MailConfigError) -> String {
    match err {
        MailConfigError::BadCredentialLength(_) => {
            "Mail service is misconfigured: expected a 16-character app password.".to_string()
        }
        _ => "Mail service is not configured. Please contact the site operator.".to_string(),
    }
}

fn reply(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::rejected(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{Field, ValidationError};

    #[test]
    fn maps_each_error_class_to_its_status() {
        assert_eq!(
            ApiError::BadRequest("oops".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(ValidationError::Missing(Field::Name))
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::RateLimited {
                retry_after: Duration::from_secs(90)
            }
            .into_response()
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Mail(MailError::Send("relay down".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn rate_limited_responses_carry_a_retry_after_header() {
        let response = ApiError::RateLimited {
            retry_after: Duration::from_secs(240),
        }
        .into_response();
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "240"
        );
    }

    #[test]
    fn credential_guard_hints_the_format_without_the_length_observed() {
        let message = config_message(&MailConfigError::BadCredentialLength(7));
        assert!(message.contains("16-character"));
        assert!(!message.contains('7'));
    }
}
