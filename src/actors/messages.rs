//! Message types for actor communication

use tokio::sync::oneshot;

use crate::walker::CycleReport;

/// Commands that can be sent to a ReporterActor
#[derive(Debug)]
pub enum ReporterCommand {
    /// Run a reporting cycle immediately (bypassing the interval timer)
    ///
    /// Fails only if the status tree could not be fetched; per-group
    /// submission failures are part of the returned report.
    ReportNow {
        respond_to: oneshot::Sender<anyhow::Result<CycleReport>>,
    },

    /// Update the reporting interval
    UpdateInterval { interval_secs: u64 },

    /// Gracefully shut down the reporter
    ///
    /// A cycle in flight is finished first.
    Shutdown,
}
