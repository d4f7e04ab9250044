// Sensor backend HTTP client implementing the readings source
use crate::application::readings_source::{ReadingsSource, SourceError};
use crate::domain::reading::{Camera, Reading, Zone};
use crate::domain::window::DisplayWindow;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SensorApiSource {
    base_url: String,
    client: reqwest::Client,
}

/// `/cameras/:id/status` has been served both wrapped and as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusPayload {
    Wrapped {
        #[serde(default)]
        zonas: Option<Vec<ZonePayload>>,
    },
    Bare(Vec<ZonePayload>),
}

impl StatusPayload {
    fn into_zones(self) -> Vec<ZonePayload> {
        match self {
            StatusPayload::Wrapped { zonas } => zonas.unwrap_or_default(),
            StatusPayload::Bare(zones) => zones,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ZonePayload {
    zone_id: i64,
    #[serde(default)]
    readings: Option<Vec<ReadingPayload>>,
}

#[derive(Debug, Deserialize)]
struct ReadingPayload {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    temperature: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CameraPayload {
    camera_id: i64,
    #[serde(default)]
    zones: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl SensorApiSource {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_status_url(&self, camera_id: i64, window: &DisplayWindow) -> String {
        let desde = window.start().to_rfc3339_opts(SecondsFormat::Secs, true);
        let hasta = window.end().to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            "{}/cameras/{}/status?desde={}&hasta={}",
            self.base_url,
            camera_id,
            urlencoding::encode(&desde),
            urlencoding::encode(&hasta)
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T, SourceError> {
        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::Auth(message),
                _ => SourceError::Server {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                SourceError::Server {
                    status: status.as_u16(),
                    message: format!("malformed payload: {}", e),
                }
            } else {
                SourceError::Network(e.to_string())
            }
        })
    }
}

#[async_trait]
impl ReadingsSource for SensorApiSource {
    async fn list_cameras(&self, token: Option<&str>) -> Result<Vec<Camera>, SourceError> {
        let url = format!("{}/cameras", self.base_url);
        // The backend answers `null` when it knows no cameras.
        let cameras: Option<Vec<CameraPayload>> = self.get_json(&url, token).await?;

        Ok(cameras
            .unwrap_or_default()
            .into_iter()
            .map(|c| Camera {
                camera_id: c.camera_id,
                zones: c.zones.unwrap_or_default(),
            })
            .collect())
    }

    async fn fetch_zones(
        &self,
        camera_id: i64,
        window: &DisplayWindow,
        token: Option<&str>,
    ) -> Result<Vec<Zone>, SourceError> {
        let url = self.build_status_url(camera_id, window);
        tracing::debug!("Fetching camera status: {}", url);

        let payload: StatusPayload = self.get_json(&url, token).await?;
        Ok(payload.into_zones().into_iter().map(to_zone).collect())
    }
}

fn to_zone(payload: ZonePayload) -> Zone {
    let raw = payload.readings.unwrap_or_default();
    let total = raw.len();
    let readings: Vec<Reading> = raw.into_iter().filter_map(to_reading).collect();

    if readings.len() < total {
        tracing::debug!(
            zone_id = payload.zone_id,
            dropped = total - readings.len(),
            "dropped readings with unparseable timestamps"
        );
    }
    Zone::new(payload.zone_id, readings)
}

fn to_reading(payload: ReadingPayload) -> Option<Reading> {
    let timestamp = DateTime::parse_from_rfc3339(payload.timestamp.as_deref()?.trim())
        .ok()?
        .with_timezone(&Utc);
    // Unreadable temperatures are kept as empty readings for the sanitizer.
    Some(match lenient_number(&payload.temperature) {
        Some(temperature) => Reading::new(timestamp, temperature),
        None => Reading::gap(timestamp),
    })
}

/// Numbers pass through, numeric strings are parsed, anything else is `None`
/// and left for the sanitizer to drop.
fn lenient_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
