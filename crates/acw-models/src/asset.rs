//! Source asset and rendition descriptors supplied by the hosting runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Free-form per-request options attached to a rendition.
pub type Instructions = serde_json::Map<String, serde_json::Value>;

/// Reference to the input content of one invocation.
///
/// Either `path` (downloaded by the runtime) or `url` (presigned, passed
/// through to vendors that fetch remote content) is set, sometimes both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAsset {
    /// Local file path of the downloaded source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Remote URL of the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Display name of the asset
    #[serde(default)]
    pub name: String,
}

impl SourceAsset {
    /// Local path, if the runtime downloaded the source.
    pub fn local_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remote URL, ignoring empty strings.
    pub fn remote_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// File extension of the source including the leading dot, e.g. `.png`.
    ///
    /// Empty when the source has no local path or no extension.
    pub fn extension(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    }
}

/// Rendition target, a single URL or a list of URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenditionTarget {
    One(String),
    Many(Vec<String>),
}

impl RenditionTarget {
    /// First target URL.
    pub fn first(&self) -> Option<&str> {
        match self {
            RenditionTarget::One(url) => Some(url.as_str()),
            RenditionTarget::Many(urls) => urls.first().map(String::as_str),
        }
    }
}

/// Output descriptor for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    /// Local destination of the produced artifact
    pub path: PathBuf,
    /// Per-request options
    #[serde(default)]
    pub instructions: Instructions,
    /// Upload target managed by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<RenditionTarget>,
    /// Requested output format hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmt: Option<String>,
}

impl Rendition {
    /// Create a rendition writing to `path` with no instructions.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            instructions: Instructions::new(),
            target: None,
            fmt: None,
        }
    }

    /// Builder-style helper to set one instruction.
    pub fn with_instruction(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.instructions.insert(key.to_string(), value.into());
        self
    }

    /// First target URL, if the runtime supplied one.
    pub fn target_url(&self) -> Option<&str> {
        self.target.as_ref().and_then(RenditionTarget::first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_extension() {
        let source = SourceAsset {
            path: Some(PathBuf::from("/in/photo.png")),
            ..Default::default()
        };
        assert_eq!(source.extension(), ".png");

        let no_path = SourceAsset::default();
        assert_eq!(no_path.extension(), "");
    }

    #[test]
    fn test_remote_url_ignores_empty() {
        let source = SourceAsset {
            url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(source.remote_url(), None);
    }

    #[test]
    fn test_rendition_target_forms() {
        let one: Rendition =
            serde_json::from_str(r#"{"path":"out.jpg","target":"https://a/1"}"#).unwrap();
        assert_eq!(one.target_url(), Some("https://a/1"));

        let many: Rendition =
            serde_json::from_str(r#"{"path":"out.jpg","target":["https://a/1","https://a/2"]}"#)
                .unwrap();
        assert_eq!(many.target_url(), Some("https://a/1"));
        assert!(many.instructions.is_empty());
    }
}
