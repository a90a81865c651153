use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::trace;

use crate::{
    data_size::parse_data_size,
    error::ConfigError,
    metrics::{Metric, Unit},
    monitors::threshold::{MetricMode, Thresholds},
};

/// Configuration file as written by the user.
///
/// Turned into a [`ReporterConfig`] by [`Config::validate`] before any cycle runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub receiver: ReceiverConfig,

    /// Host name reported to the receiver, defaults to the local host name
    pub hostname: Option<String>,

    #[serde(default = "default_true")]
    pub performance_data: bool,

    /// Report every process group instead of only the root group
    #[serde(default = "default_true")]
    pub report_all_groups: bool,

    /// Seconds between two reporting cycles
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Seconds before an HTTP request to the receiver or status source is abandoned
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    pub status_source: Option<StatusSourceConfig>,

    #[serde(default)]
    pub metrics: BTreeMap<Metric, MetricConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverConfig {
    pub url: String,
    pub token: String,
}

/// Endpoint serving the process-group status tree as JSON
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSourceConfig {
    pub url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricConfig {
    #[serde(default)]
    pub mode: Mode,
    pub warning: Option<ThresholdValue>,
    pub critical: Option<ThresholdValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Disabled,
    Reporting,
    Alerting,
}

/// A threshold is either a plain number or a string such as `"100"` or `"10 MB"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    Number(u64),
    Text(String),
}

impl ThresholdValue {
    fn resolve(&self, metric: Metric, threshold: &'static str) -> Result<u64, ConfigError> {
        match (self, metric.unit()) {
            (ThresholdValue::Number(value), _) => Ok(*value),
            (ThresholdValue::Text(text), Unit::Count) => {
                text.trim().parse().map_err(|_| ConfigError::InvalidCount {
                    metric: metric.key(),
                    threshold,
                    value: text.clone(),
                })
            }
            (ThresholdValue::Text(text), Unit::DataSize) => parse_data_size(text),
        }
    }
}

/// Validated, immutable configuration for the reporting cycles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub receiver_url: String,
    pub token: String,
    pub hostname: Option<String>,
    pub include_performance_data: bool,
    pub report_all_groups: bool,
    pub interval: Duration,
    pub timeout: Duration,
    pub status_source: Option<StatusSourceConfig>,
    modes: BTreeMap<Metric, MetricMode>,
}

impl ReporterConfig {
    pub fn new(receiver_url: impl ToString, token: impl ToString) -> Self {
        Self {
            receiver_url: receiver_url.to_string(),
            token: token.to_string(),
            hostname: None,
            include_performance_data: true,
            report_all_groups: true,
            interval: Duration::from_secs(default_interval()),
            timeout: Duration::from_secs(default_timeout()),
            status_source: None,
            modes: BTreeMap::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl ToString) -> Self {
        self.hostname = Some(hostname.to_string());
        self
    }

    pub fn with_mode(mut self, metric: Metric, mode: MetricMode) -> Self {
        self.modes.insert(metric, mode);
        self
    }

    pub fn mode(&self, metric: Metric) -> MetricMode {
        self.modes.get(&metric).copied().unwrap_or_default()
    }

    /// Metrics that produce a check result, in submission order
    pub fn enabled_metrics(&self) -> impl Iterator<Item = (Metric, MetricMode)> + '_ {
        Metric::ALL
            .into_iter()
            .map(|metric| (metric, self.mode(metric)))
            .filter(|(_, mode)| mode.is_enabled())
    }
}

impl Config {
    pub fn validate(self) -> Result<ReporterConfig, ConfigError> {
        if self.receiver.url.trim().is_empty() {
            return Err(ConfigError::MissingReceiverUrl);
        }

        if self.receiver.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        if let Some(hostname) = &self.hostname
            && hostname.trim().is_empty()
        {
            return Err(ConfigError::EmptyHostname);
        }

        let mut modes = BTreeMap::new();
        for (metric, config) in &self.metrics {
            modes.insert(*metric, config.resolve(*metric)?);
        }

        Ok(ReporterConfig {
            receiver_url: self.receiver.url,
            token: self.receiver.token,
            hostname: self.hostname,
            include_performance_data: self.performance_data,
            report_all_groups: self.report_all_groups,
            interval: Duration::from_secs(self.interval),
            timeout: Duration::from_secs(self.timeout),
            status_source: self.status_source,
            modes,
        })
    }
}

impl MetricConfig {
    fn resolve(&self, metric: Metric) -> Result<MetricMode, ConfigError> {
        match self.mode {
            Mode::Disabled => Ok(MetricMode::Disabled),
            Mode::Reporting => Ok(MetricMode::Reporting),
            Mode::Alerting => {
                let required = |value: &Option<ThresholdValue>, threshold: &'static str| {
                    value
                        .as_ref()
                        .ok_or(ConfigError::MissingThreshold {
                            metric: metric.key(),
                            threshold,
                        })?
                        .resolve(metric, threshold)
                };

                Ok(MetricMode::Alerting(Thresholds {
                    warning: required(&self.warning, "warning")?,
                    critical: required(&self.critical, "critical")?,
                }))
            }
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    60
}

fn default_timeout() -> u64 {
    30
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
