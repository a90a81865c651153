//! NRDP (Nagios Remote Data Processor) passive check submission
//!
//! ## Wire format
//!
//! ```text
//! POST <receiver url>
//! Content-Type: application/x-www-form-urlencoded;charset=UTF-8
//!
//! token=<token>&cmd=submitcheck&XMLDATA=<checkresults document>
//! ```
//!
//! The receiver answers with `<result><status>N</status><message>..</message></result>`,
//! where a status of `0` means the check results were accepted.

pub mod client;
pub mod payload;

pub use client::{ReceiverClient, SubmissionOutcome};
pub use payload::{CheckResult, CheckResultBatch};
