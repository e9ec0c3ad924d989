//! Structured invocation logging.
//!
//! Every line carries the invocation id and worker name so the lines of one
//! rendition request can be followed across the pipeline stages.

use acw_models::WorkerKind;
use tracing::{error, info, warn, Span};
use uuid::Uuid;

use crate::pipeline::Stage;

/// Logger bound to one invocation.
#[derive(Debug, Clone)]
pub struct InvocationLogger {
    invocation_id: String,
    worker: WorkerKind,
}

impl InvocationLogger {
    /// Create a logger with a fresh invocation id.
    pub fn new(worker: WorkerKind) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), worker)
    }

    /// Create a logger for a known invocation id.
    pub fn with_id(invocation_id: impl Into<String>, worker: WorkerKind) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            worker,
        }
    }

    /// Log the start of an invocation.
    pub fn log_start(&self, message: &str) {
        info!(
            invocation_id = %self.invocation_id,
            worker = %self.worker,
            "Invocation started: {}", message
        );
    }

    /// Log the transition into a pipeline stage.
    pub fn log_stage(&self, stage: &Stage) {
        info!(
            invocation_id = %self.invocation_id,
            worker = %self.worker,
            stage = %stage,
            "Entering stage"
        );
    }

    /// Log a progress update inside a stage.
    pub fn log_progress(&self, message: &str) {
        info!(
            invocation_id = %self.invocation_id,
            worker = %self.worker,
            "{}", message
        );
    }

    /// Log a failure that does not fail the invocation.
    pub fn log_warning(&self, message: &str) {
        warn!(
            invocation_id = %self.invocation_id,
            worker = %self.worker,
            "Invocation warning: {}", message
        );
    }

    /// Log the error an invocation ends with.
    pub fn log_error(&self, message: &str) {
        error!(
            invocation_id = %self.invocation_id,
            worker = %self.worker,
            "Invocation failed: {}", message
        );
    }

    /// Log the successful end of an invocation.
    pub fn log_completion(&self, message: &str) {
        info!(
            invocation_id = %self.invocation_id,
            worker = %self.worker,
            "Invocation completed: {}", message
        );
    }

    /// Get the invocation id.
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// Get the worker kind.
    pub fn worker(&self) -> WorkerKind {
        self.worker
    }

    /// Span wrapping the whole invocation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "invocation",
            invocation_id = %self.invocation_id,
            worker = %self.worker
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_generates_ids() {
        let a = InvocationLogger::new(WorkerKind::Metadata);
        let b = InvocationLogger::new(WorkerKind::Metadata);
        assert_ne!(a.invocation_id(), b.invocation_id());
        assert!(Uuid::parse_str(a.invocation_id()).is_ok());
    }

    #[test]
    fn test_logger_with_id() {
        let logger = InvocationLogger::with_id("inv-1", WorkerKind::CcaiColor);
        assert_eq!(logger.invocation_id(), "inv-1");
        assert_eq!(logger.worker(), WorkerKind::CcaiColor);

        logger.log_start("test");
        logger.log_stage(&Stage::Resolving);
        logger.log_warning("staged object left behind");
        logger.log_completion("done");
        let _span = logger.create_span();
    }
}
