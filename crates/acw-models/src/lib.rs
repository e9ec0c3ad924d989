//! Shared data models for asset compute rendition workers.
//!
//! This crate provides Serde-serializable types for:
//! - Invocation inputs (source asset, rendition descriptor, parameters)
//! - Worker kinds and their enumerated options
//! - Normalized result records (colors, entities, categories)

pub mod animal;
pub mod asset;
pub mod params;
pub mod pdf;
pub mod records;
pub mod worker_kind;

// Re-export common types
pub use animal::{Animal, AnimalParseError};
pub use asset::{Instructions, Rendition, RenditionTarget, SourceAsset};
pub use params::{ImsAuth, InvocationParams, MetricsSink};
pub use pdf::{ExportFormat, PdfOperation, PdfOptionParseError};
pub use records::{sort_by_score, Category, Color, Entity, EntityType, Scored};
pub use worker_kind::{WorkerKind, WorkerKindParseError};
