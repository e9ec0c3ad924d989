//! Instruction resolution into typed per-worker options.
//!
//! Instructions arrive as a loose JSON object. Absent, `null` and empty string
//! values all mean "use the default".

use std::str::FromStr;

use acw_models::{Animal, ExportFormat, Instructions, PdfOperation, Rendition, WorkerKind};
use serde_json::Value;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COLOR_ANALYZER_ID: &str =
    "Feature:image-color-histogram:Service-e952f4acd7c2425199b476a2eb459635";
pub const DEFAULT_ENTITY_ANALYZER_ID: &str =
    "Feature:cintel-ner:Service-7a87cb57461345c280b62470920bcdc5";
pub const DEFAULT_METADATA_ANIMAL: Animal = Animal::Bear;

/// Typed option record resolved for one worker kind.
pub trait WorkerOptions: Sized + Send + Sync {
    const KIND: WorkerKind;

    fn resolve(rendition: &Rendition, config: &WorkerConfig) -> WorkerResult<Self>;
}

/// Read a string instruction. Non-string values are rejected.
pub fn string_instruction(instructions: &Instructions, key: &str) -> WorkerResult<Option<String>> {
    match instructions.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(WorkerError::unsupported_input(format!(
            "Instruction `{}` must be a string, got {}",
            key, other
        ))),
    }
}

fn parse_animal(value: &str) -> WorkerResult<Animal> {
    Animal::from_str(value).map_err(|_| {
        WorkerError::unsupported_input(format!(
            "Invalid animal requested, must be one of: {}",
            Animal::supported_list()
        ))
    })
}

// =============================================================================
// Option records
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TaggingOptions {
    pub language: String,
}

impl WorkerOptions for TaggingOptions {
    const KIND: WorkerKind = WorkerKind::AzureTagging;

    fn resolve(rendition: &Rendition, _config: &WorkerConfig) -> WorkerResult<Self> {
        Ok(Self {
            language: string_instruction(&rendition.instructions, "language")?
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorOptions {
    pub analyzer_id: String,
    pub endpoint: String,
    /// Replacement analyzer parameters from `SENSEI_PARAMS`
    pub parameters: Option<Value>,
}

impl WorkerOptions for ColorOptions {
    const KIND: WorkerKind = WorkerKind::CcaiColor;

    fn resolve(rendition: &Rendition, config: &WorkerConfig) -> WorkerResult<Self> {
        let instructions = &rendition.instructions;
        Ok(Self {
            analyzer_id: string_instruction(instructions, "ANALYZER_ID")?
                .unwrap_or_else(|| DEFAULT_COLOR_ANALYZER_ID.to_string()),
            endpoint: string_instruction(instructions, "CCAI_ENDPOINT")?
                .unwrap_or_else(|| config.sensei_endpoint.clone()),
            parameters: sensei_params(instructions)?,
        })
    }
}

/// Parse `SENSEI_PARAMS`, given either as a JSON string or an object.
///
/// The replacement must be an object with a non-empty `data` array whose
/// first element is an object, since both encodings are rewritten later.
fn sensei_params(instructions: &Instructions) -> WorkerResult<Option<Value>> {
    let parsed = match instructions.get("SENSEI_PARAMS") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => serde_json::from_str::<Value>(s).map_err(|e| {
            WorkerError::unsupported_input(format!("SENSEI_PARAMS is not valid JSON: {}", e))
        })?,
        Some(other) => other.clone(),
    };

    let has_data = parsed
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .map(Value::is_object)
        .unwrap_or(false);
    if !parsed.is_object() || !has_data {
        return Err(WorkerError::unsupported_input(
            "SENSEI_PARAMS must be an object with a non-empty `data` array",
        ));
    }

    Ok(Some(parsed))
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityOptions {
    pub analyzer_id: String,
    pub endpoint: String,
}

impl WorkerOptions for EntityOptions {
    const KIND: WorkerKind = WorkerKind::CcaiEntities;

    fn resolve(rendition: &Rendition, config: &WorkerConfig) -> WorkerResult<Self> {
        let instructions = &rendition.instructions;
        Ok(Self {
            analyzer_id: string_instruction(instructions, "ANALYZER_ID")?
                .unwrap_or_else(|| DEFAULT_ENTITY_ANALYZER_ID.to_string()),
            endpoint: string_instruction(instructions, "CCAI_ENDPOINT")?
                .unwrap_or_else(|| config.sensei_endpoint.clone()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub operation: PdfOperation,
    /// Export target, used by `exportPDF`
    pub format: ExportFormat,
}

impl WorkerOptions for PdfOptions {
    const KIND: WorkerKind = WorkerKind::PdfServices;

    fn resolve(rendition: &Rendition, _config: &WorkerConfig) -> WorkerResult<Self> {
        let instructions = &rendition.instructions;

        let operation = match string_instruction(instructions, "operation")? {
            Some(op) => PdfOperation::from_str(&op)
                .map_err(|e| WorkerError::unsupported_input(e.to_string()))?,
            None => PdfOperation::default(),
        };

        // Only an export reads the format; other operations ignore `fmt`.
        let requested = match operation {
            PdfOperation::Export => string_instruction(instructions, "fmt")?
                .or_else(|| rendition.fmt.clone().filter(|f| !f.is_empty())),
            _ => None,
        };
        let format = match requested {
            Some(fmt) => ExportFormat::from_str(&fmt)
                .map_err(|e| WorkerError::unsupported_input(e.to_string()))?,
            None => ExportFormat::default(),
        };

        Ok(Self { operation, format })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoshopOptions {
    /// URL of the action file to apply
    pub action_url: String,
}

impl WorkerOptions for PhotoshopOptions {
    const KIND: WorkerKind = WorkerKind::PhotoshopActions;

    fn resolve(rendition: &Rendition, _config: &WorkerConfig) -> WorkerResult<Self> {
        let action_url = string_instruction(&rendition.instructions, "photoshopAction")?
            .ok_or_else(|| {
                WorkerError::unsupported_input("Instruction `photoshopAction` is required")
            })?;
        Ok(Self { action_url })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetadataOptions {
    pub animal: Animal,
}

impl WorkerOptions for MetadataOptions {
    const KIND: WorkerKind = WorkerKind::Metadata;

    fn resolve(rendition: &Rendition, _config: &WorkerConfig) -> WorkerResult<Self> {
        let animal = match string_instruction(&rendition.instructions, "animal")? {
            Some(value) => parse_animal(&value)?,
            None => DEFAULT_METADATA_ANIMAL,
        };
        Ok(Self { animal })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimalOptions {
    pub animal: Animal,
    /// Configured picture URL for `animal`
    pub url: String,
}

impl WorkerOptions for AnimalOptions {
    const KIND: WorkerKind = WorkerKind::AnimalPictures;

    fn resolve(rendition: &Rendition, config: &WorkerConfig) -> WorkerResult<Self> {
        let requested = string_instruction(&rendition.instructions, "animal")?.ok_or_else(|| {
            WorkerError::unsupported_input(format!(
                "Invalid animal requested, must be one of: {}",
                Animal::supported_list()
            ))
        })?;
        let animal = parse_animal(&requested)?;
        let url = config.animal_urls.get(animal).ok_or_else(|| {
            WorkerError::configuration(format!(
                "No picture URL configured for `{}` (ANIMAL_URL_{})",
                animal,
                animal.as_str().to_uppercase()
            ))
        })?;
        Ok(Self {
            animal,
            url: url.to_string(),
        })
    }
}
