use crate::domain::settings::PipelineSettings;
use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "config/zone-telemetry";
pub const ENV_PREFIX: &str = "ZONE_TELEMETRY";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub pipeline: PipelineSettings,
    pub poller: PollerSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollerSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub cameras: Vec<i64>,
    pub lookback_hours: i64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 15,
            cameras: Vec::new(),
            lookback_hours: 24,
        }
    }
}

/// Load `config/zone-telemetry.{toml,json,...}` if present, then apply
/// `ZONE_TELEMETRY__SECTION__KEY` environment overrides.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config
        .pipeline
        .validate()
        .context("invalid pipeline configuration")?;
    if app_config.poller.interval_secs == 0 {
        anyhow::bail!("poller.interval_secs must be positive");
    }
    Ok(app_config)
}
