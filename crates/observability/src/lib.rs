//! Tracing, logging, error tracking (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Error-tracking collaborator (log + optional Bugsnag forwarding).
pub mod report;

pub use tracing::LogFormat;
pub use report::{
    BugsnagConfig, BugsnagReporter, ErrorReport, ErrorReporter, RecordingReporter, TracingReporter,
};
