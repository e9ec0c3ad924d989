//! Response normalization into typed, score-sorted records.
//!
//! Structures that do not match yield empty lists rather than errors.

use acw_models::{sort_by_score, Category, Color, Entity, EntityType};
use acw_vendor::{CasResponse, Feature};
use serde_json::Value;
use tracing::warn;

/// Feature name of the color histogram result.
pub const COLOR_FEATURE: &str = "color";
/// Feature name holding extracted entity labels.
pub const LABELS_FEATURE: &str = "labels";

/// Colors from every `color` feature, highest coverage first.
pub fn parse_colors(response: &CasResponse) -> Vec<Color> {
    let mut colors: Vec<Color> = response
        .features_named(COLOR_FEATURE)
        .flat_map(|feature| feature.feature_value.children())
        .filter_map(|leaf| {
            let raw = leaf.feature_value.as_str()?;
            let color = Color::parse_feature_value(raw);
            if color.is_none() {
                warn!("Skipping malformed color value: {}", raw);
            }
            color
        })
        .collect();

    sort_by_score(&mut colors);
    colors
}

/// Entities labelled under `content_id` in the first feature set, highest
/// score first.
pub fn parse_entities(response: &CasResponse, content_id: &str) -> Vec<Entity> {
    let Some(features) = response.feature_sets().next() else {
        return Vec::new();
    };

    let mut entities: Vec<Entity> = features
        .iter()
        .filter(|f| f.feature_name == content_id)
        .flat_map(|f| f.feature_value.children())
        .filter(|f| f.feature_name == LABELS_FEATURE)
        .flat_map(|labels| labels.feature_value.children())
        .map(entity_from_label)
        .collect();

    sort_by_score(&mut entities);
    entities
}

fn entity_from_label(label: &Feature) -> Entity {
    let entity_type = label
        .child("type")
        .and_then(|f| f.feature_value.as_str())
        .map(EntityType::from)
        .unwrap_or_else(|| EntityType::Other(String::new()));
    let score = label
        .child("score")
        .and_then(|f| f.feature_value.as_f64())
        .unwrap_or(0.0);

    Entity {
        name: label.feature_name.clone(),
        entity_type,
        score,
    }
}

/// Image categories from an analyze response, highest score first.
///
/// Entries that are not categories are skipped.
pub fn categories(response: &Value) -> Vec<Category> {
    let raw = match response.get("categories") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(raw)) => raw,
        Some(other) => {
            warn!("Ignoring non-list categories in analyze response: {}", other);
            return Vec::new();
        }
    };

    let mut categories: Vec<Category> = raw
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(category) => Some(category),
            Err(e) => {
                warn!("Skipping unexpected category {}: {}", entry, e);
                None
            }
        })
        .collect();
    sort_by_score(&mut categories);
    categories
}
