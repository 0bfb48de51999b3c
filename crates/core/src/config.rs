use serde::Deserialize;

use crate::error::SimResult;
use crate::types::AppealType;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ABTEST_SIM__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Defaults and guards applied when resolving a caller's request.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_visitors")]
    pub default_visitors: u64,
    #[serde(default = "default_max_visitors")]
    pub max_visitors: u64,
    #[serde(default = "default_traffic_split")]
    pub default_traffic_split_percent: f64,
}

/// Conversion-rate model parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_rate")]
    pub base_conversion_rate: f64,
    #[serde(default = "default_price_coefficient")]
    pub price_coefficient: f64,
    #[serde(default = "default_convenience_coefficient")]
    pub convenience_coefficient: f64,
    #[serde(default = "default_urgency_coefficient")]
    pub urgency_coefficient: f64,
    #[serde(default = "default_speed_coefficient")]
    pub speed_coefficient: f64,
}

impl ModelConfig {
    pub fn coefficient(&self, appeal: AppealType) -> f64 {
        match appeal {
            AppealType::Price => self.price_coefficient,
            AppealType::Convenience => self.convenience_coefficient,
            AppealType::Urgency => self.urgency_coefficient,
            AppealType::Speed => self.speed_coefficient,
        }
    }
}

// Default functions
fn default_node_id() -> String {
    "sim-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_visitors() -> u64 {
    10_000
}
fn default_max_visitors() -> u64 {
    10_000_000
}
fn default_traffic_split() -> f64 {
    50.0
}
fn default_base_rate() -> f64 {
    0.025
}
fn default_price_coefficient() -> f64 {
    0.015
}
fn default_convenience_coefficient() -> f64 {
    0.010
}
fn default_urgency_coefficient() -> f64 {
    0.012
}
fn default_speed_coefficient() -> f64 {
    0.008
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_visitors: default_visitors(),
            max_visitors: default_max_visitors(),
            default_traffic_split_percent: default_traffic_split(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_conversion_rate: default_base_rate(),
            price_coefficient: default_price_coefficient(),
            convenience_coefficient: default_convenience_coefficient(),
            urgency_coefficient: default_urgency_coefficient(),
            speed_coefficient: default_speed_coefficient(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            simulation: SimulationConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file, overlaid by environment variables.
    /// A named file must exist and parse.
    pub fn load_from(path: Option<&str>) -> SimResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("ABTEST_SIM")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
