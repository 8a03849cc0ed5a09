//! Product catalog service.

use chrono::Utc;
use prodtrack_core::catalog::{apply_product_update, new_product};
use prodtrack_core::{CoreError, NewProduct, Product, ProductStatus, ProductUpdate};
use prodtrack_db::Database;
use tracing::info;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, ApiError> {
        let product = new_product(input, Utc::now())?;

        let repo = self.db.products();
        if repo.get_by_code(&product.code).await?.is_some() {
            return Err(CoreError::DuplicateProductCode(product.code).into());
        }
        repo.insert(&product).await?;

        info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    pub async fn get(&self, id: &str) -> Result<Product, ApiError> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Product, ApiError> {
        self.db
            .products()
            .get_by_code(code.trim())
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()).into())
    }

    pub async fn list(&self, status: Option<ProductStatus>) -> Result<Vec<Product>, ApiError> {
        Ok(self.db.products().list(status).await?)
    }

    pub async fn update(&self, id: &str, update: ProductUpdate) -> Result<Product, ApiError> {
        let mut product = self.get(id).await?;
        let previous_version = product.recipe.version;

        apply_product_update(&mut product, update, Utc::now())?;
        self.db.products().update(&product).await?;

        if product.recipe.version != previous_version {
            info!(
                product_id = %product.id,
                code = %product.code,
                version = product.recipe.version,
                "Recipe replaced"
            );
        }
        Ok(product)
    }

    /// Soft delete: batches keep referencing the product.
    pub async fn deactivate(&self, id: &str) -> Result<Product, ApiError> {
        let product = self
            .update(
                id,
                ProductUpdate {
                    status: Some(ProductStatus::Inactive),
                    ..Default::default()
                },
            )
            .await?;
        info!(product_id = %product.id, code = %product.code, "Product deactivated");
        Ok(product)
    }
}
