use super::state::AppState;
use crate::conversion::{ConversionRequest, ConversionResult, FailureKind, Quality};
use crate::validator::Validation;
use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ConvertRequestBody {
    /// URL as typed by the user
    pub url: String,

    /// Bitrate in kbps (128, 192 or 320); server default when absent
    pub quality: Option<Quality>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::EmptyInput | FailureKind::MalformedUrl => StatusCode::BAD_REQUEST,
        FailureKind::Unavailable => StatusCode::NOT_FOUND,
        FailureKind::AgeRestricted | FailureKind::RegionRestricted | FailureKind::Forbidden => {
            StatusCode::FORBIDDEN
        }
        FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FailureKind::Network => StatusCode::BAD_GATEWAY,
        FailureKind::OutputMissing | FailureKind::Unclassified => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `attachment` with an ASCII fallback name and the exact UTF-8 name (RFC 6266).
fn content_disposition(file_name: &str) -> HeaderValue {
    let ascii: String = file_name
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(file_name)
    );

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/convert
/// Validate, probe and convert one URL
pub async fn convert(
    State(state): State<AppState>,
    Json(body): Json<ConvertRequestBody>,
) -> impl IntoResponse {
    let request = ConversionRequest::new(body.url, body.quality.unwrap_or(state.default_quality));

    let result = state.converter.convert(&request).await;
    let status = match &result {
        ConversionResult::Success(_) => StatusCode::OK,
        ConversionResult::Failure(failure) => status_for(failure.kind),
    };

    (status, Json(result)).into_response()
}

/// GET /api/validate?url=...
/// Check a URL without touching the network
pub async fn validate_url(Query(params): Query<ValidateParams>) -> impl IntoResponse {
    (StatusCode::OK, Json(Validation::of(&params.url)))
}

/// GET /downloads/:request_id
/// Stream the staged MP3 back to the browser
pub async fn download(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    request: Request,
) -> impl IntoResponse {
    let staged = match state.converter.staging().locate(request_id).await {
        Ok(Some(staged)) => staged,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("No converted file for request {}", request_id),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to look up request {}: {:#}", request_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to read staged file".to_string(),
                }),
            )
                .into_response();
        }
    };

    info!(
        "Serving {} ({} bytes) for request {}",
        staged.file_name, staged.size_bytes, request_id
    );

    // ServeFile streams from disk and answers Range requests
    let response = match ServeFile::new(&staged.path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let mut response = response.map(Body::new);
    if response.status().is_success() {
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert(
            header::CONTENT_DISPOSITION,
            content_disposition(&staged.file_name),
        );
    }
    response.into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii_name() {
        let value = content_disposition("Never Gonna Give You Up.mp3");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"Never Gonna Give You Up.mp3\"; filename*=UTF-8''Never%20Gonna%20Give%20You%20Up.mp3"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        let value = content_disposition("Café.mp3");
        let text = value.to_str().unwrap();
        assert!(text.contains("filename=\"Caf_.mp3\""));
        assert!(text.contains("filename*=UTF-8''Caf%C3%A9.mp3"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(FailureKind::MalformedUrl), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(FailureKind::Unavailable), StatusCode::NOT_FOUND);
        assert_eq!(status_for(FailureKind::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_for(FailureKind::Network), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(FailureKind::OutputMissing),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
