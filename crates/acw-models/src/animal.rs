//! Animals supported by the metadata and animal-pictures workers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animal {
    Cat,
    Dog,
    Elephant,
    Bear,
}

impl Animal {
    pub const ALL: &'static [Animal] = &[Animal::Cat, Animal::Dog, Animal::Elephant, Animal::Bear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Animal::Cat => "cat",
            Animal::Dog => "dog",
            Animal::Elephant => "elephant",
            Animal::Bear => "bear",
        }
    }

    /// Comma separated list of supported names, for error messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|a| format!("`{}`", a.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Animal {
    type Err = AnimalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cat" => Ok(Animal::Cat),
            "dog" => Ok(Animal::Dog),
            "elephant" => Ok(Animal::Elephant),
            "bear" => Ok(Animal::Bear),
            _ => Err(AnimalParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid animal requested: {0}")]
pub struct AnimalParseError(pub String);
