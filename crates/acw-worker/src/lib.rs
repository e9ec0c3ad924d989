//! Asset compute rendition workers.
//!
//! This crate provides:
//! - The shared single-call rendition pipeline
//! - Instruction and credential resolution
//! - Response normalization and XMP/JSON/binary output writing
//! - One worker per vendor integration and the invocation executor

pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod instructions;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod workers;
pub mod xmp;

pub use config::{TestMode, WorkerConfig};
pub use error::{ErrorEnvelope, ErrorKind, WorkerError, WorkerResult};
pub use executor::{InvocationRequest, RenditionExecutor};
pub use logging::InvocationLogger;
pub use output::Artifact;
pub use pipeline::{run, Invocation, Outcome, RenditionWorker, Stage};
pub use xmp::{XmpDocument, XmpValue};
