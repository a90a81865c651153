//! ReporterActor - runs a reporting cycle at the configured interval

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::ReporterConfig,
    nrdp::ReceiverClient,
    source::StatusSource,
    walker::{CycleReport, MetricWalker},
};

use super::messages::ReporterCommand;

pub struct ReporterActor {
    config: ReporterConfig,

    /// HTTP client for the receiver (reused across cycles)
    client: ReceiverClient,

    source: Box<dyn StatusSource>,

    command_rx: mpsc::Receiver<ReporterCommand>,

    interval_duration: Duration,
}

impl ReporterActor {
    pub fn new(
        config: ReporterConfig,
        client: ReceiverClient,
        source: Box<dyn StatusSource>,
        command_rx: mpsc::Receiver<ReporterCommand>,
    ) -> Self {
        let interval_duration = config.interval;

        Self {
            config,
            client,
            source,
            command_rx,
            interval_duration,
        }
    }

    fn ticker(&self) -> tokio::time::Interval {
        let mut ticker = interval_at(
            Instant::now() + self.interval_duration,
            self.interval_duration,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Run until a Shutdown command is received or the command channel is closed
    #[instrument(skip(self), fields(receiver = %self.config.receiver_url))]
    pub async fn run(mut self) {
        debug!("starting reporter actor");

        let mut ticker = self.ticker();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.report().await {
                        error!("reporting cycle skipped: {:#}", e);
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        ReporterCommand::ReportNow { respond_to } => {
                            debug!("received ReportNow command");
                            let result = self.report().await;
                            let _ = respond_to.send(result);
                        }

                        ReporterCommand::UpdateInterval { interval_secs: 0 } => {
                            warn!("ignoring interval of 0s");
                        }

                        ReporterCommand::UpdateInterval { interval_secs } => {
                            debug!("updating interval to {interval_secs}s");
                            self.interval_duration = Duration::from_secs(interval_secs);
                            ticker = self.ticker();
                        }

                        ReporterCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("reporter actor stopped");
    }

    async fn report(&self) -> Result<CycleReport> {
        let root = self
            .source
            .fetch()
            .await
            .context("failed to fetch process group status")?;

        let report = MetricWalker::new(&self.config, &self.client)
            .run(&root, self.config.report_all_groups)
            .await;

        info!(
            "reporting cycle started at {} finished: {} group(s) submitted, {} failed",
            report.started_at.to_rfc3339(),
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    }
}

/// Handle for controlling a ReporterActor
#[derive(Clone)]
pub struct ReporterHandle {
    sender: mpsc::Sender<ReporterCommand>,
}

impl ReporterHandle {
    /// Spawn the actor as a tokio task
    pub fn spawn(config: ReporterConfig, source: impl StatusSource + 'static) -> Result<Self> {
        let client = ReceiverClient::with_timeout(config.timeout)
            .context("failed to build receiver client")?;
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = ReporterActor::new(config, client, Box::new(source), cmd_rx);
        tokio::spawn(actor.run());

        Ok(Self { sender: cmd_tx })
    }

    /// Run a cycle now and wait for its report
    pub async fn report_now(&self) -> Result<CycleReport> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ReporterCommand::ReportNow { respond_to: tx })
            .await
            .context("failed to send ReportNow command")?;

        rx.await.context("failed to receive response")?
    }

    pub async fn update_interval(&self, interval_secs: u64) -> Result<()> {
        self.sender
            .send(ReporterCommand::UpdateInterval { interval_secs })
            .await
            .context("failed to send UpdateInterval command")?;
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(ReporterCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}
