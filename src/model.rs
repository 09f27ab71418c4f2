use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A recipe as it appears in the pending queue file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<Servings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,
}

/// Servings may be written either as free text ("4-6") or as a number
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Servings {
    Text(String),
    Count(serde_json::Number),
}

impl fmt::Display for Servings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Servings::Text(text) => f.write_str(text),
            Servings::Count(count) => write!(f, "{}", count),
        }
    }
}

/// Opaque identifier assigned by the recipe service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recipe collection living on the recipe service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Collection {
    pub identifier: String,
    pub name: String,
}

/// Recipe payload in the service's creation schema
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub preparation_steps: Vec<String>,
    pub ingredients: Vec<IngredientInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Always sent empty; source text goes into the note instead
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u64>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u64>,
    pub creation_timestamp: i64,
    pub timestamp: i64,
}

/// Ingredient line passed through unparsed
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    pub raw_ingredient: String,
}

/// Outcome of attaching a recipe to one collection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionResult {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CollectionResult {
    pub fn added(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// A saved recipe that could not be added to one of its collections
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionFailure {
    pub recipe: String,
    pub collection: String,
    pub error: String,
}

/// Result of importing a single recipe
#[derive(Debug, Clone, PartialEq)]
pub enum ImportResult {
    /// The recipe was saved remotely; collection results are reported separately
    Imported {
        recipe_id: RecipeId,
        collections: Vec<CollectionResult>,
    },
    /// The recipe could not be saved
    Failed { error: String },
}

impl ImportResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportResult::Imported { .. })
    }
}

/// Entry in the errors archive: the offending record plus the reason
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FailedRecord {
    pub recipe: Value,
    pub error: String,
}
