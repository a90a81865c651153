pub mod actors;
pub mod config;
pub mod data_size;
pub mod error;
pub mod metrics;
pub mod monitors;
pub mod nrdp;
pub mod source;
pub mod util;
pub mod walker;

use serde::Deserialize;

/// Status snapshot of one process group, including all of its child groups.
///
/// The counters for transfers and disk I/O cover the last sampling window of
/// the data-flow engine (five minutes for NiFi).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessGroupStatus {
    pub name: String,
    pub active_thread_count: u64,
    pub queued_count: u64,
    pub queued_content_size: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub flow_files_received: u64,
    pub flow_files_sent: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub process_group_status: Vec<ProcessGroupStatus>,
}

impl ProcessGroupStatus {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: ProcessGroupStatus) -> Self {
        self.process_group_status.push(child);
        self
    }

    /// Pre-order traversal: the group itself, then every child subtree in order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a ProcessGroupStatus>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ProcessGroupStatus;

    fn next(&mut self) -> Option<Self::Item> {
        let group = self.stack.pop()?;
        self.stack.extend(group.process_group_status.iter().rev());
        Some(group)
    }
}
