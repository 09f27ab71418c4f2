use log::debug;

use crate::collections::add_recipe_to_collections;
use crate::model::{ImportResult, IngredientInput, NewRecipe, RecipeRecord};
use crate::service::RecipeService;
use crate::time::parse_optional_time;

const NOTE_RULE: &str = "\n\n---\n\n";
const NOTE_GAP: &str = "\n\n";

/// Import a single recipe and attach it to its collections.
///
/// Only a failure to save the recipe itself makes the result a failure.
/// Collection problems are reported per collection in the result, and
/// nothing is rolled back.
pub async fn import_recipe(service: &dyn RecipeService, record: &RecipeRecord) -> ImportResult {
    let recipe = build_new_recipe(record, chrono::Utc::now().timestamp());

    let recipe_id = match service.create_recipe(&recipe).await {
        Ok(id) => id,
        Err(e) => {
            return ImportResult::Failed {
                error: e.to_string(),
            }
        }
    };
    debug!("Saved '{}' as {}", record.name, recipe_id);

    let collections = match record.collections.as_deref() {
        Some(names) if !names.is_empty() => {
            add_recipe_to_collections(service, &recipe_id, names).await
        }
        _ => Vec::new(),
    };

    ImportResult::Imported {
        recipe_id,
        collections,
    }
}

/// Map a queue record onto the service's creation schema
pub fn build_new_recipe(record: &RecipeRecord, timestamp: i64) -> NewRecipe {
    NewRecipe {
        name: record.name.clone(),
        note: build_note(
            record.description.as_deref(),
            record.notes.as_deref(),
            record.source.as_deref(),
        ),
        preparation_steps: record.steps.clone(),
        ingredients: record
            .ingredients
            .iter()
            .map(|line| IngredientInput {
                raw_ingredient: line.clone(),
            })
            .collect(),
        source_name: present(record.source.as_deref()).map(str::to_string),
        source_url: String::new(),
        servings: record
            .servings
            .as_ref()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty()),
        prep_time: parse_optional_time(record.prep_time.as_deref()),
        cook_time: parse_optional_time(record.cook_time.as_deref()),
        creation_timestamp: timestamp,
        timestamp,
    }
}

/// Combine description, notes and source into a single note.
///
/// Description and notes are separated by a horizontal rule; the source
/// line follows after a blank line. Returns `None` if all parts are empty.
pub fn build_note(
    description: Option<&str>,
    notes: Option<&str>,
    source: Option<&str>,
) -> Option<String> {
    let mut note = String::new();

    if let Some(description) = present(description) {
        note.push_str(description);
    }
    if let Some(notes) = present(notes) {
        if !note.is_empty() {
            note.push_str(NOTE_RULE);
        }
        note.push_str(notes);
    }
    if let Some(source) = present(source) {
        if !note.is_empty() {
            note.push_str(NOTE_GAP);
        }
        note.push_str("Source: ");
        note.push_str(source);
    }

    (!note.is_empty()).then_some(note)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
