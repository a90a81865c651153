use std::fmt;

/// Check state as understood by the receiver (0 = OK, 1 = WARNING, 2 = CRITICAL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
}

impl Severity {
    /// Severity of `value` under `mode`, `None` for disabled metrics.
    ///
    /// The critical threshold is checked first; reaching a threshold counts as breaching it.
    pub fn evaluate(value: u64, mode: &MetricMode) -> Option<Severity> {
        match mode {
            MetricMode::Disabled => None,
            MetricMode::Reporting => Some(Severity::Ok),
            MetricMode::Alerting(Thresholds { warning, critical }) => {
                if value >= *critical {
                    return Some(Severity::Critical);
                }

                if value >= *warning {
                    return Some(Severity::Warning);
                }

                Some(Severity::Ok)
            }
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short word used in the plugin output line
    pub fn word(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: u64,
    pub critical: u64,
}

/// How a single metric is handled in a reporting cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricMode {
    /// Not reported at all
    #[default]
    Disabled,

    /// Reported with its live value, always OK
    Reporting,

    /// Reported and compared against warning/critical thresholds
    Alerting(Thresholds),
}

impl MetricMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, MetricMode::Disabled)
    }
}

/// Result of evaluating one sampled value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub severity: Severity,

    /// `"<LABEL> <OK|WARN|CRIT> - <value> <comment>"`
    pub message: String,

    /// `"<perf key>=<raw value>"`
    pub performance: String,
}

impl Verdict {
    /// Evaluate `value` and build the output line and performance token.
    ///
    /// `display` replaces the raw value in the message only (e.g. `"12.4 MB"`),
    /// thresholds and the performance token always use the raw value.
    /// Returns `None` when the metric is disabled.
    pub fn evaluate(
        label: &str,
        comment: &str,
        value: u64,
        display: Option<&str>,
        perf_key: &str,
        mode: &MetricMode,
    ) -> Option<Verdict> {
        let severity = Severity::evaluate(value, mode)?;

        let message = match display {
            Some(display) => format!("{label} {severity} - {display} {comment}"),
            None => format!("{label} {severity} - {value} {comment}"),
        };

        Some(Verdict {
            severity,
            message,
            performance: format!("{perf_key}={value}"),
        })
    }

    /// Plugin output as submitted, optionally followed by the performance data
    pub fn output(&self, include_performance_data: bool) -> String {
        if include_performance_data {
            format!("{} | {}", self.message, self.performance)
        } else {
            self.message.clone()
        }
    }
}
