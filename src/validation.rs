//! Pure authoring checks for recipe payloads. Persistence happens in the
//! write path; everything here is a transform or a field-labeled rejection.

use crate::error::ApiError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MIN_AMOUNT: i32 = 1;
pub const MAX_AMOUNT: i32 = 5000;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 1440;

/// One (ingredient id, amount) entry as submitted by the client. The amount
/// is a JSON integer; non-numeric input fails deserialization outright
/// rather than being coerced.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientEntry {
    pub id: Uuid,
    pub amount: i32,
}

/// Trims whitespace and capitalizes: first character uppercased, the rest
/// lowercased.
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn validate_name(normalized: &str) -> Result<(), ApiError> {
    if normalized.is_empty() {
        return Err(ApiError::field("name", "Name cannot be empty"));
    }
    Ok(())
}

pub fn validate_tags(tag_ids: &[Uuid]) -> Result<(), ApiError> {
    if tag_ids.is_empty() {
        return Err(ApiError::field("tags", "At least one tag is required"));
    }
    let mut seen = HashSet::new();
    for id in tag_ids {
        if !seen.insert(id) {
            return Err(ApiError::field("tags", "Tags must not repeat"));
        }
    }
    Ok(())
}

pub fn validate_ingredients(entries: &[IngredientEntry]) -> Result<(), ApiError> {
    if entries.is_empty() {
        return Err(ApiError::field(
            "ingredients",
            "At least one ingredient is required",
        ));
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(ApiError::field(
                "ingredients",
                "Ingredients must not repeat",
            ));
        }
        if entry.amount < MIN_AMOUNT {
            return Err(ApiError::field(
                "amount",
                "Ingredient amount must be greater than 0",
            ));
        }
        if entry.amount > MAX_AMOUNT {
            return Err(ApiError::field(
                "amount",
                format!("Ingredient amount must not exceed {}", MAX_AMOUNT),
            ));
        }
    }
    Ok(())
}

pub fn validate_cooking_time(minutes: i32) -> Result<(), ApiError> {
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&minutes) {
        return Err(ApiError::field(
            "cooking_time",
            format!(
                "Cooking time must be between {} and {} minutes",
                MIN_COOKING_TIME, MAX_COOKING_TIME
            ),
        ));
    }
    Ok(())
}

/// The (name, author) collision is reported on both fields, matching the
/// shape clients already rely on.
pub fn duplicate_recipe_error() -> ApiError {
    let message = "A recipe with this name by this author already exists";
    let mut fields = BTreeMap::new();
    fields.insert("name", message.to_string());
    fields.insert("author", message.to_string());
    ApiError::Validation(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(fields) => fields.keys().copied().collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn normalize_trims_and_capitalizes() {
        assert_eq!(normalize_name("  pasta carbonara "), "Pasta carbonara");
        assert_eq!(normalize_name("BORSCHT"), "Borscht");
        assert_eq!(normalize_name("x"), "X");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn empty_name_rejected() {
        let err = validate_name("").unwrap_err();
        assert_eq!(field_of(err), vec!["name"]);
        assert!(validate_name("Pasta").is_ok());
    }

    #[test]
    fn empty_tag_list_rejected() {
        let err = validate_tags(&[]).unwrap_err();
        assert_eq!(field_of(err), vec!["tags"]);
    }

    #[test]
    fn duplicate_tags_rejected() {
        let id = Uuid::new_v4();
        let err = validate_tags(&[id, Uuid::new_v4(), id]).unwrap_err();
        assert_eq!(field_of(err), vec!["tags"]);
    }

    #[test]
    fn distinct_tags_accepted() {
        assert!(validate_tags(&[Uuid::new_v4(), Uuid::new_v4()]).is_ok());
    }

    #[test]
    fn empty_ingredient_list_rejected() {
        let err = validate_ingredients(&[]).unwrap_err();
        assert_eq!(field_of(err), vec!["ingredients"]);
    }

    #[test]
    fn duplicate_ingredient_ids_rejected() {
        let id = Uuid::new_v4();
        let entries = vec![
            IngredientEntry { id, amount: 5 },
            IngredientEntry { id, amount: 10 },
        ];
        let err = validate_ingredients(&entries).unwrap_err();
        assert_eq!(field_of(err), vec!["ingredients"]);
    }

    #[test]
    fn non_positive_amount_rejected() {
        for amount in [0, -1, -5000] {
            let entries = vec![IngredientEntry {
                id: Uuid::new_v4(),
                amount,
            }];
            let err = validate_ingredients(&entries).unwrap_err();
            assert_eq!(field_of(err), vec!["amount"], "amount = {}", amount);
        }
    }

    #[test]
    fn oversized_amount_rejected() {
        let entries = vec![IngredientEntry {
            id: Uuid::new_v4(),
            amount: MAX_AMOUNT + 1,
        }];
        let err = validate_ingredients(&entries).unwrap_err();
        assert_eq!(field_of(err), vec!["amount"]);
    }

    #[test]
    fn boundary_amounts_accepted() {
        let entries = vec![
            IngredientEntry {
                id: Uuid::new_v4(),
                amount: MIN_AMOUNT,
            },
            IngredientEntry {
                id: Uuid::new_v4(),
                amount: MAX_AMOUNT,
            },
        ];
        assert!(validate_ingredients(&entries).is_ok());
    }

    #[test]
    fn cooking_time_bounds() {
        assert!(validate_cooking_time(1).is_ok());
        assert!(validate_cooking_time(1440).is_ok());
        for minutes in [0, -10, 1441] {
            let err = validate_cooking_time(minutes).unwrap_err();
            assert_eq!(field_of(err), vec!["cooking_time"]);
        }
    }

    #[test]
    fn duplicate_recipe_error_labels_both_fields() {
        let mut fields = field_of(duplicate_recipe_error());
        fields.sort();
        assert_eq!(fields, vec!["author", "name"]);
    }
}
