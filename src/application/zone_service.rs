// Zone service - use case for building camera/zone summaries
use crate::application::clock::Clock;
use crate::application::readings_source::{ReadingsSource, SourceError};
use crate::application::session_store::{SessionStore, AUTH_TOKEN_KEY};
use crate::domain::error::PipelineError;
use crate::domain::reading::Camera;
use crate::domain::settings::PipelineSettings;
use crate::domain::summary::{build_camera_summary, CameraSummary};
use crate::domain::window::{normalize_window, DisplayWindow};
use chrono::TimeDelta;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// What a caller asked for; resolved by the range normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub lookback: Option<TimeDelta>,
}

impl WindowRequest {
    pub fn trailing_hours(hours: i64) -> Self {
        Self {
            lookback: TimeDelta::try_hours(hours),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct ZoneService {
    source: Arc<dyn ReadingsSource>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    settings: PipelineSettings,
}

impl ZoneService {
    pub fn new(
        source: Arc<dyn ReadingsSource>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            sessions,
            clock,
            settings,
        }
    }

    pub async fn list_cameras(&self, token: Option<&str>) -> Result<Vec<Camera>, ServiceError> {
        let stored = self.stored_token(token);
        let result = self
            .source
            .list_cameras(token.or(stored.as_deref()))
            .await;
        self.forget_rejected_token(result, token.is_none() && stored.is_some())
            .map_err(ServiceError::from)
    }

    pub fn resolve_window(&self, request: &WindowRequest) -> DisplayWindow {
        normalize_window(
            request.start.as_deref(),
            request.end.as_deref(),
            request.lookback,
            self.clock.now(),
            self.settings.default_lookback(),
        )
    }

    /// Fetch one camera's zones and run every zone through the pipeline.
    pub async fn camera_summary(
        &self,
        camera_id: i64,
        request: &WindowRequest,
        token: Option<&str>,
    ) -> Result<CameraSummary, ServiceError> {
        let window = self.resolve_window(request);
        let stored = self.stored_token(token);

        tracing::debug!(
            camera_id,
            start = %window.start(),
            end = %window.end(),
            "fetching zone readings"
        );

        let result = self
            .source
            .fetch_zones(camera_id, &window, token.or(stored.as_deref()))
            .await;
        let zones = self.forget_rejected_token(result, token.is_none() && stored.is_some())?;

        let summary =
            build_camera_summary(camera_id, zones, &window, &self.settings, self.clock.now())?;
        tracing::debug!(
            camera_id,
            zones = summary.zones.len(),
            has_data = summary.has_data,
            "built camera summary"
        );
        Ok(summary)
    }

    fn stored_token(&self, explicit: Option<&str>) -> Option<String> {
        match explicit {
            Some(_) => None,
            None => self.sessions.get(AUTH_TOKEN_KEY),
        }
    }

    /// A stored token the backend rejects has expired; drop it so later
    /// calls stop sending it.
    fn forget_rejected_token<T>(
        &self,
        result: Result<T, SourceError>,
        used_stored: bool,
    ) -> Result<T, SourceError> {
        if let Err(SourceError::Auth(message)) = &result {
            if used_stored {
                tracing::warn!("stored session token rejected, clearing it: {}", message);
                self.sessions.remove(AUTH_TOKEN_KEY);
            }
        }
        result
    }
}
