//! Worker kind definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available rendition workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerKind {
    /// Azure Computer Vision image tagging (raw JSON output)
    AzureTagging,
    /// Sensei color histogram extraction (XMP output)
    CcaiColor,
    /// Sensei named-entity extraction from PDFs (XMP output)
    CcaiEntities,
    /// PDF Services operations (JSON or binary output)
    PdfServices,
    /// Photoshop actions applied to an image (binary output)
    PhotoshopActions,
    /// Local file metadata, no vendor call (XMP output)
    Metadata,
    /// Download a picture of the requested animal
    AnimalPictures,
}

impl WorkerKind {
    pub const ALL: &'static [WorkerKind] = &[
        WorkerKind::AzureTagging,
        WorkerKind::CcaiColor,
        WorkerKind::CcaiEntities,
        WorkerKind::PdfServices,
        WorkerKind::PhotoshopActions,
        WorkerKind::Metadata,
        WorkerKind::AnimalPictures,
    ];

    /// Name as used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerKind::AzureTagging => "azure-tagging",
            WorkerKind::CcaiColor => "ccai-color",
            WorkerKind::CcaiEntities => "ccai-entities",
            WorkerKind::PdfServices => "pdf-services",
            WorkerKind::PhotoshopActions => "photoshop-actions",
            WorkerKind::Metadata => "metadata",
            WorkerKind::AnimalPictures => "animal-pictures",
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkerKind {
    type Err = WorkerKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        WorkerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| WorkerKindParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown worker kind: {0}")]
pub struct WorkerKindParseError(String);
