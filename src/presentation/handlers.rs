// HTTP request handlers
use crate::application::readings_source::SourceError;
use crate::application::zone_service::{ServiceError, WindowRequest};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub hours: Option<String>,
}

impl RangeQuery {
    fn into_request(self) -> WindowRequest {
        WindowRequest {
            start: self.desde.filter(|s| !s.trim().is_empty()),
            end: self.hasta.filter(|s| !s.trim().is_empty()),
            // Unparseable hours fall through to the default window.
            lookback: self
                .hours
                .and_then(|h| h.trim().parse::<i64>().ok())
                .and_then(TimeDelta::try_hours),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List cameras and their zones
pub async fn list_cameras(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);
    match state.zone_service.list_cameras(bearer_token(&headers)).await {
        Ok(cameras) => respond(StatusCode::OK, &cameras, compress).await,
        Err(e) => error_response(&e, compress).await,
    }
}

/// Normalized summaries for every zone of a camera, computed on demand
pub async fn camera_zones(
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let Ok(camera_id) = id.parse::<i64>() else {
        return bad_camera_id(&id, compress).await;
    };

    let request = query.into_request();
    match state
        .zone_service
        .camera_summary(camera_id, &request, bearer_token(&headers))
        .await
    {
        Ok(summary) => respond(StatusCode::OK, &summary, compress).await,
        Err(e) => error_response(&e, compress).await,
    }
}

/// Most recent polled summary for a camera
pub async fn live_camera(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let Ok(camera_id) = id.parse::<i64>() else {
        return bad_camera_id(&id, compress).await;
    };

    match state.summary_cache.get(camera_id).await {
        Some(summary) => respond(StatusCode::OK, &summary, compress).await,
        None => {
            let body = ErrorBody {
                error: format!("no polled data for camera {}", camera_id),
            };
            respond(StatusCode::NOT_FOUND, &body, compress).await
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, compress: bool) -> Response {
    match json_response(status, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn bad_camera_id(id: &str, compress: bool) -> Response {
    let body = ErrorBody {
        error: format!("invalid camera id: {}", id),
    };
    respond(StatusCode::BAD_REQUEST, &body, compress).await
}

async fn error_response(err: &ServiceError, compress: bool) -> Response {
    let status = match err {
        ServiceError::Source(SourceError::Auth(_)) => StatusCode::UNAUTHORIZED,
        ServiceError::Source(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!("request failed ({}): {}", status, err);
    let body = ErrorBody {
        error: err.to_string(),
    };
    respond(status, &body, compress).await
}
