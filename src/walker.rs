//! One reporting cycle over the process-group tree
//!
//! ```text
//! root ─┬─ group A ─── group A1        pre-order: root, A, A1, B
//!       └─ group B
//!
//! per group: enabled metrics → Verdict → CheckResultBatch → encode → submit
//! ```
//!
//! Every visited group is submitted on its own. A failing group is logged and
//! does not stop the remaining groups. The walker is not meant to be run
//! concurrently with itself; the reporter actor runs one cycle at a time.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    ProcessGroupStatus,
    config::ReporterConfig,
    error::GroupError,
    monitors::threshold::Verdict,
    nrdp::{CheckResultBatch, ReceiverClient, SubmissionOutcome},
    util::resolve_hostname,
};

/// What happened to one group's check results
#[derive(Debug)]
pub struct GroupReport {
    pub group: String,
    pub check_results: usize,
    pub result: Result<SubmissionOutcome, GroupError>,
}

impl GroupReport {
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(outcome) if outcome.is_success())
    }
}

#[derive(Debug)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub groups: Vec<GroupReport>,
}

impl CycleReport {
    pub fn succeeded(&self) -> usize {
        self.groups.iter().filter(|group| group.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.groups.len() - self.succeeded()
    }
}

pub struct MetricWalker<'a> {
    config: &'a ReporterConfig,
    client: &'a ReceiverClient,
}

impl<'a> MetricWalker<'a> {
    pub fn new(config: &'a ReporterConfig, client: &'a ReceiverClient) -> Self {
        Self { config, client }
    }

    /// Report `root`, and with `recurse` every descendant group as well.
    #[instrument(skip_all, fields(receiver = %self.config.receiver_url))]
    pub async fn run(&self, root: &ProcessGroupStatus, recurse: bool) -> CycleReport {
        let host_name = resolve_hostname(self.config.hostname.as_deref()).map_err(|e| {
            warn!("failed to resolve local host name: {e}");
            e.to_string()
        });

        self.run_with_host(root, recurse, host_name).await
    }

    /// Like [`MetricWalker::run`], with the host name already resolved.
    ///
    /// A resolution failure fails every visited group without submitting anything.
    pub async fn run_with_host(
        &self,
        root: &ProcessGroupStatus,
        recurse: bool,
        host_name: Result<String, String>,
    ) -> CycleReport {
        let started_at = Utc::now();

        let groups: Vec<_> = if recurse {
            root.iter().collect()
        } else {
            vec![root]
        };
        debug!("reporting {} process group(s)", groups.len());

        let mut reports = Vec::with_capacity(groups.len());
        for group in groups {
            reports.push(self.report_group(group, &host_name).await);
        }

        CycleReport {
            started_at,
            groups: reports,
        }
    }

    /// Evaluate every enabled metric of `group`, in declaration order.
    pub fn build_batch(&self, group: &ProcessGroupStatus, host_name: &str) -> CheckResultBatch {
        let mut batch = CheckResultBatch::new();

        for (metric, mode) in self.config.enabled_metrics() {
            let value = metric.sample(group);
            let display = metric.display_value(value);

            let Some(verdict) = Verdict::evaluate(
                metric.label(),
                metric.comment(),
                value,
                display.as_deref(),
                metric.perf_key(),
                &mode,
            ) else {
                continue;
            };

            batch.append(
                metric.service_name(&group.name),
                host_name,
                verdict,
                self.config.include_performance_data,
            );
        }

        batch
    }

    async fn report_group(
        &self,
        group: &ProcessGroupStatus,
        host_name: &Result<String, String>,
    ) -> GroupReport {
        let name = &group.name;
        let url = &self.config.receiver_url;

        let (check_results, result) = match self.submit_group(group, host_name).await {
            Ok((count, outcome)) => (count, Ok(outcome)),
            Err(e) => (0, Err(e)),
        };

        match &result {
            Ok(SubmissionOutcome::Success) => {
                info!("{name}: posted {check_results} check result(s) to {url}")
            }
            Ok(SubmissionOutcome::ReceiverRejected { message }) => {
                error!("{name}: {url} rejected check results: {message}")
            }
            Ok(SubmissionOutcome::TransportError(e)) => {
                error!("{name}: error submitting check results to {url}: {e}")
            }
            Err(e) => error!("{name}: check results not submitted: {e}"),
        }

        GroupReport {
            group: name.clone(),
            check_results,
            result,
        }
    }

    async fn submit_group(
        &self,
        group: &ProcessGroupStatus,
        host_name: &Result<String, String>,
    ) -> Result<(usize, SubmissionOutcome), GroupError> {
        let host_name = host_name
            .as_ref()
            .map_err(|e| GroupError::Hostname(e.clone()))?;

        let batch = self.build_batch(group, host_name);
        let payload = batch.encode()?;

        let outcome = self
            .client
            .submit(&self.config.receiver_url, &self.config.token, &payload)
            .await;

        Ok((batch.len(), outcome))
    }
}
