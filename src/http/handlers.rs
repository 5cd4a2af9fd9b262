//! Request handlers for the submission API.
//!
//! # Responsibilities
//! - Accept JSON and form-encoded consultation payloads
//! - Identify the client for rate limiting (forwarded header or peer)
//! - Drive the pipeline: validate → rate limit → dispatch → respond
//! - Report liveness and mail credential presence on /health

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequest, Request, State};
use axum::http::{header, HeaderMap};
use axum::{Form, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::http::error::{ApiError, ApiResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::Decision;
use crate::submission::{validate, RawSubmission};

/// Consultation payload, decoded from whichever encoding the form used.
pub struct SubmissionBody(pub RawSubmission);

impl<S> FromRequest<S> for SubmissionBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(raw) = Form::<RawSubmission>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            Ok(Self(raw))
        } else {
            let Json(raw) = Json::<RawSubmission>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            Ok(Self(raw))
        }
    }
}

/// POST /api/consultation
///
/// Validation runs before the rate limit check, so malformed payloads
/// never consume quota. An archive failure is logged and never surfaced.
pub async fn submit_consultation(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    SubmissionBody(raw): SubmissionBody,
) -> Result<Json<ApiResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let client = client_id(&headers, peer);

    let submission = validate(&raw)?;

    if let Decision::Limited { retry_after } = state.limiter.check(&client) {
        tracing::warn!(
            request_id = %request_id,
            client = %client,
            retry_after_secs = retry_after.as_secs(),
            "Submission rate limited"
        );
        return Err(ApiError::RateLimited { retry_after });
    }

    state.mailer.send(&submission).await?;

    if let Some(archive) = &state.archive {
        if let Err(e) = archive.append(&submission).await {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to archive submission");
        }
    }

    metrics::record_submission("accepted");
    tracing::info!(
        request_id = %request_id,
        client = %client,
        email = %submission.email,
        "Consultation request relayed"
    );
    Ok(Json(ApiResponse::accepted()))
}

/// Any non-POST method on the consultation endpoint.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Liveness and mail configuration status. No side effects.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub mail_configured: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        mail_configured: state.mail_configured,
    })
}

/// Rate limit key for a request: the first forwarded address when the
/// service sits behind a proxy, the socket peer otherwise.
fn client_id(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}
