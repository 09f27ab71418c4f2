use serde_json::Value;

/// Outcome of checking a raw record for the fields an import needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that a raw recipe value has a name, ingredients and steps.
///
/// Every violation adds one message; the caller decides what to do with an
/// invalid record.
pub fn validate_recipe(recipe: &Value) -> Validation {
    let mut errors = Vec::new();

    let has_name = recipe
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        errors.push(r#"Missing or invalid "name" field"#.to_string());
    }

    if !is_non_empty_array(recipe.get("ingredients")) {
        errors.push(r#"Missing or invalid "ingredients" field (must be non-empty array)"#.to_string());
    }

    if !is_non_empty_array(recipe.get("steps")) {
        errors.push(r#"Missing or invalid "steps" field (must be non-empty array)"#.to_string());
    }

    Validation { errors }
}

fn is_non_empty_array(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_record_is_valid() {
        let recipe = json!({
            "name": "Toast",
            "ingredients": ["1 slice bread"],
            "steps": ["Toast the bread"]
        });

        let validation = validate_recipe(&recipe);
        assert!(validation.is_valid());
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_missing_steps() {
        let recipe = json!({
            "name": "Toast",
            "ingredients": ["1 slice bread"]
        });

        let validation = validate_recipe(&recipe);
        assert!(!validation.is_valid());
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].contains("steps"));
    }

    #[test]
    fn test_missing_name_and_ingredients() {
        let recipe = json!({ "steps": ["Toast the bread"] });

        let validation = validate_recipe(&recipe);
        assert_eq!(validation.errors.len(), 2);
        assert!(validation.errors[0].contains("name"));
        assert!(validation.errors[1].contains("ingredients"));
    }

    #[test]
    fn test_blank_name_and_empty_arrays() {
        let recipe = json!({
            "name": "   ",
            "ingredients": [],
            "steps": []
        });

        assert_eq!(validate_recipe(&recipe).errors.len(), 3);
    }

    #[test]
    fn test_wrong_types() {
        let recipe = json!({
            "name": 42,
            "ingredients": "flour, water",
            "steps": ["Mix"]
        });

        let validation = validate_recipe(&recipe);
        assert_eq!(validation.errors.len(), 2);
    }

    #[test]
    fn test_non_object_record() {
        assert_eq!(validate_recipe(&json!("just a string")).errors.len(), 3);
        assert_eq!(validate_recipe(&Value::Null).errors.len(), 3);
    }
}
