//! # Product Catalog
//!
//! Building and updating products and their versioned recipes.
//!
//! ## Recipe Versioning
//! ```text
//! new_product()            → recipe.version = 1
//! apply_product_update()
//!   ├── recipe: Some(..)   → recipe.version += 1, lastUpdated = now
//!   └── recipe: None       → version untouched
//! ```
//!
//! Batches already started keep the version they snapshotted.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::{NewProduct, Product, ProductStatus, ProductUpdate, Recipe, RecipeInput};
use crate::validation::{validate_code, validate_recipe, validate_required};
use crate::MAX_NAME_LEN;

fn versioned(input: RecipeInput, version: i64, now: DateTime<Utc>) -> Recipe {
    let mut steps = input.steps;
    steps.sort_by_key(|s| s.order);
    Recipe {
        version,
        last_updated: now,
        ingredients: input.ingredients,
        steps,
        quality_checks: input.quality_checks,
    }
}

fn validate_category(category: &str) -> CoreResult<String> {
    let category = category.trim();
    if category.is_empty() {
        return Ok(String::new());
    }
    Ok(validate_required("category", category, MAX_NAME_LEN)?)
}

/// Validates a creation payload and builds an active product at recipe version 1.
pub fn new_product(input: NewProduct, now: DateTime<Utc>) -> CoreResult<Product> {
    let code = validate_code("code", &input.code)?;
    let name = validate_required("name", &input.name, MAX_NAME_LEN)?;
    let category = validate_category(&input.category)?;
    validate_recipe(&input.recipe)?;

    Ok(Product {
        id: Uuid::new_v4().to_string(),
        code,
        name,
        category,
        status: ProductStatus::Active,
        recipe: versioned(input.recipe, 1, now),
        created_at: now,
        updated_at: now,
    })
}

/// Applies a partial update. Nothing is changed when validation fails.
pub fn apply_product_update(
    product: &mut Product,
    update: ProductUpdate,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let name = update
        .name
        .map(|n| validate_required("name", &n, MAX_NAME_LEN))
        .transpose()?;
    let category = update
        .category
        .map(|c| validate_category(&c))
        .transpose()?;
    if let Some(ref recipe) = update.recipe {
        validate_recipe(recipe)?;
    }

    if let Some(name) = name {
        product.name = name;
    }
    if let Some(category) = category {
        product.category = category;
    }
    if let Some(status) = update.status {
        product.status = status;
    }
    if let Some(recipe) = update.recipe {
        product.recipe = versioned(recipe, product.recipe.version + 1, now);
    }
    product.updated_at = now;
    Ok(())
}
