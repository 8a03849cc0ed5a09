//! # Product Repository
//!
//! Database operations for products.
//!
//! The recipe (ingredients, steps, quality checks, version) is one JSON
//! document in the `recipe` column: it is always read and replaced whole.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{from_json, to_json, with_duplicate_value};
use prodtrack_core::{Product, ProductStatus};

const SELECT_PRODUCT: &str = r#"
    SELECT id, code, name, category, status, recipe, created_at, updated_at
    FROM products
"#;

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    code: String,
    name: String,
    category: String,
    status: ProductStatus,
    recipe: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            id: row.id,
            code: row.code,
            name: row.name,
            category: row.category,
            status: row.status,
            recipe: from_json(&row.recipe)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.get_by_code("A123").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        debug!(product_id = %id, "Fetching product");
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its business code (what operators scan).
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        debug!(%code, "Fetching product by code");
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE code = ?"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Lists products ordered by code, optionally filtered by status.
    pub async fn list(&self, status: Option<ProductStatus>) -> DbResult<Vec<Product>> {
        debug!(?status, "Listing products");

        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{SELECT_PRODUCT} WHERE status = ? ORDER BY code"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} ORDER BY code"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::Duplicate)` - code already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, code, name, category, status, recipe, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.status)
        .bind(to_json(&product.recipe)?)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| with_duplicate_value(e, &product.code))?;

        Ok(())
    }

    /// Writes back every mutable field of a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, version = product.recipe.version, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?,
                category = ?,
                status = ?,
                recipe = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.status)
        .bind(to_json(&product.recipe)?)
        .bind(product.updated_at)
        .bind(&product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use prodtrack_core::catalog::new_product;
    use prodtrack_core::{NewProduct, RecipeIngredient, RecipeInput, Unit};

    fn sample(code: &str) -> Product {
        new_product(
            NewProduct {
                code: code.to_string(),
                name: format!("Product {code}"),
                category: "bakery".to_string(),
                recipe: RecipeInput {
                    ingredients: vec![RecipeIngredient {
                        name: "Flour".to_string(),
                        quantity: 50.0,
                        unit: Unit::Kg,
                        notes: String::new(),
                    }],
                    ..Default::default()
                },
            },
            Utc::now(),
        )
        .unwrap()
    }

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = repo().await;
        let product = sample("A123");
        repo.insert(&product).await.unwrap();

        let by_id = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(by_id.code, "A123");
        assert_eq!(by_id.recipe.ingredients.len(), 1);
        assert_eq!(by_id.recipe.version, 1);

        let by_code = repo.get_by_code("A123").await.unwrap().unwrap();
        assert_eq!(by_code.id, product.id);

        assert!(repo.get_by_code("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let repo = repo().await;
        repo.insert(&sample("A123")).await.unwrap();

        let err = repo.insert(&sample("A123")).await.unwrap_err();
        match err {
            DbError::Duplicate { value, .. } => assert_eq!(value, "A123"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_and_list_by_status() {
        let repo = repo().await;
        let mut a = sample("A123");
        let b = sample("B200");
        repo.insert(&a).await.unwrap();
        repo.insert(&b).await.unwrap();

        a.status = ProductStatus::Inactive;
        a.recipe.version = 2;
        repo.update(&a).await.unwrap();

        let active = repo.list(Some(ProductStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].code, "B200");

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "A123");
        assert_eq!(all[0].recipe.version, 2);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = repo().await;
        let err = repo.update(&sample("GHOST")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
