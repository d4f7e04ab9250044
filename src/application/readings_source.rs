// Data source trait for sensor readings
use crate::domain::reading::{Camera, Zone};
use crate::domain::window::DisplayWindow;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("backend error (status {status}): {message}")]
    Server { status: u16, message: String },
}

#[async_trait]
pub trait ReadingsSource: Send + Sync {
    /// List every camera with the zone ids it reports
    async fn list_cameras(&self, token: Option<&str>) -> Result<Vec<Camera>, SourceError>;

    /// Fetch the raw readings of every zone of a camera within the window
    async fn fetch_zones(
        &self,
        camera_id: i64,
        window: &DisplayWindow,
        token: Option<&str>,
    ) -> Result<Vec<Zone>, SourceError>;
}
