//! PDF Services operations and export formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operation requested through the `operation` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PdfOperation {
    /// Read document properties (JSON output)
    #[default]
    #[serde(rename = "pdfProperties")]
    Properties,
    /// Convert a document into a PDF
    #[serde(rename = "createPDF")]
    Create,
    /// Export a PDF into another format
    #[serde(rename = "exportPDF")]
    Export,
    /// Reduce the size of a PDF
    #[serde(rename = "compressPDF")]
    Compress,
}

impl PdfOperation {
    pub const ALL: &'static [PdfOperation] = &[
        PdfOperation::Properties,
        PdfOperation::Create,
        PdfOperation::Export,
        PdfOperation::Compress,
    ];

    /// Instruction value and URL path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfOperation::Properties => "pdfProperties",
            PdfOperation::Create => "createPDF",
            PdfOperation::Export => "exportPDF",
            PdfOperation::Compress => "compressPDF",
        }
    }

    /// Whether the service answers with a JSON document rather than a file.
    pub fn returns_json(&self) -> bool {
        matches!(self, PdfOperation::Properties)
    }
}

impl fmt::Display for PdfOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PdfOperation {
    type Err = PdfOptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PdfOperation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| PdfOptionParseError::Operation(s.to_string()))
    }
}

/// Target format of an `exportPDF` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Doc,
    #[default]
    Docx,
    Pptx,
    Rtf,
    Xlsx,
    Jpeg,
    Png,
}

impl ExportFormat {
    pub const ALL: &'static [ExportFormat] = &[
        ExportFormat::Doc,
        ExportFormat::Docx,
        ExportFormat::Pptx,
        ExportFormat::Rtf,
        ExportFormat::Xlsx,
        ExportFormat::Jpeg,
        ExportFormat::Png,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Doc => "doc",
            ExportFormat::Docx => "docx",
            ExportFormat::Pptx => "pptx",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PdfOptionParseError;

    /// Case-insensitive; `jpg` is accepted as an alias of `jpeg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if lower == "jpg" {
            return Ok(ExportFormat::Jpeg);
        }
        ExportFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| PdfOptionParseError::Format(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum PdfOptionParseError {
    #[error("PDF Operation not supported: {0}")]
    Operation(String),

    #[error("PDF export format not supported: {0}")]
    Format(String),
}
