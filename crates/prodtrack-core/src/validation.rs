//! # Validation Module
//!
//! Input validation utilities for ProdTrack.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (serde)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Enum spellings (units, categories, outcomes)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  └── Non-negative, finite quantities                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE batch_number / product code                                │
//! │  └── Foreign key production → product                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::quality::ValueRange;
use crate::types::{ProductionIngredient, QualityResult, RecipeInput};
use crate::{MAX_CODE_LEN, MAX_NAME_LEN, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, length-limited text field and returns it trimmed.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates an optional free-text field (notes, reasons).
pub fn validate_optional_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// Validates a business code (product code or batch number).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens, underscores, dots and slashes only
///
/// ```rust
/// use prodtrack_core::validation::validate_code;
///
/// assert!(validate_code("batchNumber", "L001").is_ok());
/// assert!(validate_code("batchNumber", "").is_err());
/// assert!(validate_code("code", "A 123").is_err());
/// ```
pub fn validate_code(field: &str, code: &str) -> ValidationResult<String> {
    let code = validate_required(field, code, MAX_CODE_LEN)?;

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, '-', '_', '.' and '/'".to_string(),
        });
    }

    Ok(code)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity or duration: finite and not negative.
///
/// ```rust
/// use prodtrack_core::validation::validate_quantity;
///
/// assert!(validate_quantity("finalQuantity", 98.5).is_ok());
/// assert!(validate_quantity("finalQuantity", 0.0).is_ok());
/// assert!(validate_quantity("finalQuantity", -1.0).is_err());
/// ```
pub fn validate_quantity(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a recipe submitted by an administrator.
pub fn validate_recipe(recipe: &RecipeInput) -> ValidationResult<()> {
    let mut names = HashSet::new();
    for (i, ingredient) in recipe.ingredients.iter().enumerate() {
        let name = validate_required(
            &format!("ingredients[{i}].name"),
            &ingredient.name,
            MAX_NAME_LEN,
        )?;
        validate_quantity(&format!("ingredients[{i}].quantity"), ingredient.quantity)?;
        validate_optional_text(&format!("ingredients[{i}].notes"), &ingredient.notes)?;
        if !names.insert(name.to_lowercase()) {
            return Err(ValidationError::Duplicate {
                field: "ingredients.name".to_string(),
                value: name,
            });
        }
    }

    for (i, step) in recipe.steps.iter().enumerate() {
        validate_required(&format!("steps[{i}].title"), &step.title, MAX_NAME_LEN)?;
        validate_optional_text(&format!("steps[{i}].instructions"), &step.instructions)?;
    }

    let mut checks = HashSet::new();
    for (i, check) in recipe.quality_checks.iter().enumerate() {
        let name = validate_required(
            &format!("qualityChecks[{i}].name"),
            &check.name,
            MAX_NAME_LEN,
        )?;
        if let Some(range) = ValueRange::parse(&check.expected_value) {
            range.validate(&format!("qualityChecks[{i}].expectedValue"))?;
        }
        if !checks.insert(name.to_lowercase()) {
            return Err(ValidationError::Duplicate {
                field: "qualityChecks.name".to_string(),
                value: name,
            });
        }
    }

    Ok(())
}

/// Validates a full ingredient list submitted for a batch.
pub fn validate_production_ingredients(items: &[ProductionIngredient]) -> ValidationResult<()> {
    for (i, item) in items.iter().enumerate() {
        validate_required(&format!("ingredients[{i}].name"), &item.name, MAX_NAME_LEN)?;
        validate_quantity(&format!("ingredients[{i}].requiredQuantity"), item.required_quantity)?;
        if let Some(actual) = item.actual_quantity {
            validate_quantity(&format!("ingredients[{i}].actualQuantity"), actual)?;
        }
    }
    Ok(())
}

/// Validates a full quality-result list submitted for a batch.
pub fn validate_quality_results(items: &[QualityResult]) -> ValidationResult<()> {
    for (i, item) in items.iter().enumerate() {
        validate_required(
            &format!("qualityResults[{i}].checkName"),
            &item.check_name,
            MAX_NAME_LEN,
        )?;
        validate_optional_text(&format!("qualityResults[{i}].actualValue"), &item.actual_value)?;
        validate_optional_text(&format!("qualityResults[{i}].notes"), &item.notes)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QualityCheck, QualityCheckType, QualityOutcome, RecipeIngredient, Unit};

    fn ingredient(name: &str, quantity: f64) -> RecipeIngredient {
        RecipeIngredient {
            name: name.to_string(),
            quantity,
            unit: Unit::Kg,
            notes: String::new(),
        }
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("code", "A123").is_ok());
        assert!(validate_code("code", "LOT-2026/10.01").is_ok());
        assert_eq!(validate_code("code", "  L001 ").unwrap(), "L001");

        assert!(validate_code("code", "").is_err());
        assert!(validate_code("code", "   ").is_err());
        assert!(validate_code("code", "has space").is_err());
        assert!(validate_code("code", &"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("q", 0.0).is_ok());
        assert!(validate_quantity("q", 12.25).is_ok());
        assert!(validate_quantity("q", -0.1).is_err());
        assert!(validate_quantity("q", f64::NAN).is_err());
        assert!(validate_quantity("q", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_recipe() {
        let mut recipe = RecipeInput {
            ingredients: vec![ingredient("Flour", 10.0), ingredient("Water", 6.0)],
            steps: vec![],
            quality_checks: vec![QualityCheck {
                name: "Weight".to_string(),
                check_type: QualityCheckType::Physical,
                expected_value: "95-105".to_string(),
            }],
        };
        assert!(validate_recipe(&recipe).is_ok());

        recipe.ingredients.push(ingredient("flour", 1.0));
        assert!(matches!(
            validate_recipe(&recipe),
            Err(ValidationError::Duplicate { .. })
        ));

        recipe.ingredients.pop();
        recipe.quality_checks[0].expected_value = "105-95".to_string();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_production_ingredients() {
        let mut items = vec![ProductionIngredient {
            name: "Flour".to_string(),
            required_quantity: 10.0,
            actual_quantity: Some(9.8),
            unit: Unit::Kg,
        }];
        assert!(validate_production_ingredients(&items).is_ok());

        items[0].actual_quantity = Some(-1.0);
        assert!(validate_production_ingredients(&items).is_err());
    }

    #[test]
    fn test_validate_quality_results() {
        let items = vec![QualityResult {
            check_name: " ".to_string(),
            expected_value: String::new(),
            actual_value: String::new(),
            result: QualityOutcome::NonTeste,
            notes: String::new(),
        }];
        assert!(validate_quality_results(&items).is_err());
    }
}
