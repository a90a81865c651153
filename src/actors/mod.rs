//! Actor driving the periodic reporting cycles
//!
//! ```text
//! Timer tick ─┐
//!             ├─→ fetch status tree → MetricWalker → one NRDP submission per group
//! ReportNow ──┘
//! ```
//!
//! The actor owns the only task that runs cycles, so cycles never overlap.

pub mod messages;
pub mod reporter;
