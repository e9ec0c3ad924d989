//! Normalized result records produced from vendor responses.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Records that carry a confidence or coverage score.
pub trait Scored {
    fn score(&self) -> f64;
}

/// Sort records from highest to lowest score.
///
/// The sort is stable: records with equal scores keep their encounter order.
/// NaN scores compare as equal to everything.
pub fn sort_by_score<T: Scored>(records: &mut [T]) {
    records.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
}

// =============================================================================
// Color
// =============================================================================

/// Dominant color reported by the color histogram analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Color name
    pub name: String,
    /// Coverage fraction (0.0-1.0)
    pub percentage: f64,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Parse an analyzer value of the form `name,percentage,red,green,blue`.
    ///
    /// Returns `None` for values that do not have that shape.
    pub fn parse_feature_value(value: &str) -> Option<Self> {
        let mut parts = value.split(',').map(str::trim);
        let name = parts.next()?.to_string();
        let percentage = parts.next()?.parse().ok()?;
        let red = parts.next()?.parse().ok()?;
        let green = parts.next()?.parse().ok()?;
        let blue = parts.next()?.parse().ok()?;
        Some(Self {
            name,
            percentage,
            red,
            green,
            blue,
        })
    }

    /// Web color, e.g. `#a909fe`.
    pub fn to_web_color(&self) -> String {
        format!("#{}", hex::encode([self.red, self.green, self.blue]))
    }

    /// Coverage as a rounded whole-number percentage, e.g. `59%`.
    pub fn percentage_string(&self) -> String {
        format!("{}%", (self.percentage * 100.0).round() as i64)
    }
}

impl Scored for Color {
    fn score(&self) -> f64 {
        self.percentage
    }
}

// =============================================================================
// Entity
// =============================================================================

/// Entity category reported by the named-entity recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityType {
    Keyword,
    Organization,
    Person,
    Product,
    Location,
    GeoPolitical,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Keyword => "KEYWORD",
            EntityType::Organization => "ORG",
            EntityType::Person => "PERSON",
            EntityType::Product => "PRODUCT",
            EntityType::Location => "LOC",
            EntityType::GeoPolitical => "GPE",
            EntityType::Other(other) => other.as_str(),
        }
    }

    /// Locations and geo-political entities share the location bucket.
    pub fn is_location(&self) -> bool {
        matches!(self, EntityType::Location | EntityType::GeoPolitical)
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        match s {
            "KEYWORD" => EntityType::Keyword,
            "ORG" => EntityType::Organization,
            "PERSON" => EntityType::Person,
            "PRODUCT" => EntityType::Product,
            "LOC" => EntityType::Location,
            "GPE" => EntityType::GeoPolitical,
            other => EntityType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EntityType::from(s.as_str()))
    }
}

/// Named entity extracted from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Confidence score (0.0-1.0)
    pub score: f64,
}

impl Entity {
    /// Label used in the flat entity name list, e.g. `PERSON: Ada Lovelace`.
    pub fn display_name(&self) -> String {
        format!("{}: {}", self.entity_type, self.name)
    }
}

impl Scored for Entity {
    fn score(&self) -> f64 {
        self.score
    }
}

// =============================================================================
// Category
// =============================================================================

/// Image category reported by the image analysis service.
///
/// Fields other than `name` and `score` (e.g. `detail`) are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Scored for Category {
    fn score(&self) -> f64 {
        self.score
    }
}
