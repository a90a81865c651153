//! Catalogue of the reportable process-group metrics

use serde::{Deserialize, Serialize};

use crate::{ProcessGroupStatus, data_size::format_data_size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Count,
    DataSize,
}

/// One reportable metric, in the order the check results are submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ActiveThreadCount,
    FlowfilesQueued,
    BytesQueued,
    BytesIn,
    BytesOut,
    FlowfilesIn,
    FlowfilesOut,
    BytesRead,
    BytesWritten,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::ActiveThreadCount,
        Metric::FlowfilesQueued,
        Metric::BytesQueued,
        Metric::BytesIn,
        Metric::BytesOut,
        Metric::FlowfilesIn,
        Metric::FlowfilesOut,
        Metric::BytesRead,
        Metric::BytesWritten,
    ];

    /// Key used in the configuration file
    pub fn key(self) -> &'static str {
        match self {
            Metric::ActiveThreadCount => "active_thread_count",
            Metric::FlowfilesQueued => "flowfiles_queued",
            Metric::BytesQueued => "bytes_queued",
            Metric::BytesIn => "bytes_in",
            Metric::BytesOut => "bytes_out",
            Metric::FlowfilesIn => "flowfiles_in",
            Metric::FlowfilesOut => "flowfiles_out",
            Metric::BytesRead => "bytes_read",
            Metric::BytesWritten => "bytes_written",
        }
    }

    /// Upper-case label leading the output line
    pub fn label(self) -> &'static str {
        match self {
            Metric::ActiveThreadCount => "ACTIVE THREAD COUNT",
            Metric::FlowfilesQueued => "FLOWFILES QUEUED",
            Metric::BytesQueued => "BYTES QUEUED",
            Metric::BytesIn => "BYTES IN",
            Metric::BytesOut => "BYTES OUT",
            Metric::FlowfilesIn => "FLOWFILES IN",
            Metric::FlowfilesOut => "FLOWFILES OUT",
            Metric::BytesRead => "BYTES READ",
            Metric::BytesWritten => "BYTES WRITTEN",
        }
    }

    /// Text following the value in the output line
    pub fn comment(self) -> &'static str {
        match self {
            Metric::ActiveThreadCount => "active threads",
            Metric::FlowfilesQueued => "flowfiles queued",
            Metric::BytesQueued => "queued",
            Metric::BytesIn => "in",
            Metric::BytesOut => "out",
            Metric::FlowfilesIn => "flowfiles in",
            Metric::FlowfilesOut => "flowfiles out",
            Metric::BytesRead => "data read",
            Metric::BytesWritten => "data written",
        }
    }

    pub fn perf_key(self) -> &'static str {
        match self {
            Metric::ActiveThreadCount => "active_thread_count",
            Metric::FlowfilesQueued => "flowfiles_queued",
            Metric::BytesQueued => "bytes_queued",
            Metric::BytesIn => "bytes_in",
            Metric::BytesOut => "bytes_out",
            Metric::FlowfilesIn => "flowfiles_in",
            Metric::FlowfilesOut => "flowfiles_out",
            Metric::BytesRead => "data_read",
            Metric::BytesWritten => "data_written",
        }
    }

    /// Service title, appended to the group name to form the service name
    pub fn title(self) -> &'static str {
        match self {
            Metric::ActiveThreadCount => "NiFi Active Thread Count",
            Metric::FlowfilesQueued => "NiFi Flowfiles Queued",
            Metric::BytesQueued => "NiFi Data Queued",
            Metric::BytesIn => "NiFi Data In",
            Metric::BytesOut => "NiFi Data Out",
            Metric::FlowfilesIn => "NiFi Flowfiles In",
            Metric::FlowfilesOut => "NiFi Flowfiles Out",
            Metric::BytesRead => "NiFi Data Read",
            Metric::BytesWritten => "NiFi Data Written",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Metric::ActiveThreadCount
            | Metric::FlowfilesQueued
            | Metric::FlowfilesIn
            | Metric::FlowfilesOut => Unit::Count,
            Metric::BytesQueued
            | Metric::BytesIn
            | Metric::BytesOut
            | Metric::BytesRead
            | Metric::BytesWritten => Unit::DataSize,
        }
    }

    /// Live value of this metric for `group`
    pub fn sample(self, group: &ProcessGroupStatus) -> u64 {
        match self {
            Metric::ActiveThreadCount => group.active_thread_count,
            Metric::FlowfilesQueued => group.queued_count,
            Metric::BytesQueued => group.queued_content_size,
            Metric::BytesIn => group.bytes_received,
            Metric::BytesOut => group.bytes_sent,
            Metric::FlowfilesIn => group.flow_files_received,
            Metric::FlowfilesOut => group.flow_files_sent,
            Metric::BytesRead => group.bytes_read,
            Metric::BytesWritten => group.bytes_written,
        }
    }

    /// Human readable form of `value` for the output line, if it differs from the raw number
    pub fn display_value(self, value: u64) -> Option<String> {
        match self.unit() {
            Unit::Count => None,
            Unit::DataSize => Some(format_data_size(value)),
        }
    }

    /// `"<group name> - <title>"`
    pub fn service_name(self, group_name: &str) -> String {
        format!("{group_name} - {}", self.title())
    }
}
