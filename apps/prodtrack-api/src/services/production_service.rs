//! Production batch lifecycle service.

use chrono::{DateTime, Utc};
use prodtrack_core::lifecycle::start_production;
use prodtrack_core::validation::validate_code;
use prodtrack_core::{
    CompletionInput, CoreError, CoreResult, PauseCategory, PauseRecord, Production,
    ProductionIngredient, ProductionStatus, QualityResult,
};
use prodtrack_db::Database;
use tracing::info;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ProductionService {
    db: Database,
}

impl ProductionService {
    pub fn new(db: Database) -> Self {
        ProductionService { db }
    }

    /// Starts a batch from the product scanned by the operator.
    ///
    /// ## Order of checks
    /// 1. Input shape (codes, operator)
    /// 2. Product exists → else NotFound, nothing created
    /// 3. Batch number unused (any product) → else Conflict
    /// 4. Product active, snapshot recipe, insert
    pub async fn start(
        &self,
        product_code: &str,
        batch_number: &str,
        operator: &str,
    ) -> Result<Production, ApiError> {
        let product_code = validate_code("productCode", product_code).map_err(CoreError::from)?;
        let batch_number = validate_code("batchNumber", batch_number).map_err(CoreError::from)?;

        let product = self
            .db
            .products()
            .get_by_code(&product_code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_code.clone()))?;

        let productions = self.db.productions();
        if productions
            .get_by_batch_number(&batch_number)
            .await?
            .is_some()
        {
            return Err(CoreError::DuplicateBatchNumber(batch_number).into());
        }

        let production = start_production(&product, &batch_number, operator, Utc::now())?;
        // The UNIQUE index still catches a race between the check and the insert
        productions.insert(&production).await?;

        info!(
            production_id = %production.id,
            batch_number = %production.batch_number,
            product_code = %production.product_code,
            recipe_version = production.recipe_version,
            "Production started"
        );
        Ok(production)
    }

    pub async fn get(&self, id: &str) -> Result<Production, ApiError> {
        self.db
            .productions()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductionNotFound(id.to_string()).into())
    }

    pub async fn list(
        &self,
        status: Option<ProductionStatus>,
    ) -> Result<Vec<Production>, ApiError> {
        Ok(self.db.productions().list(status).await?)
    }

    /// Load → mutate → revision-checked save.
    async fn mutate<T, F>(&self, id: &str, op: F) -> Result<(Production, T), ApiError>
    where
        F: FnOnce(&mut Production, DateTime<Utc>) -> CoreResult<T>,
    {
        let mut production = self.get(id).await?;
        let output = op(&mut production, Utc::now())?;
        self.db.productions().save(&mut production).await?;
        Ok((production, output))
    }

    pub async fn update_ingredients(
        &self,
        id: &str,
        ingredients: Vec<ProductionIngredient>,
    ) -> Result<Production, ApiError> {
        let (production, ()) = self
            .mutate(id, |p, now| p.replace_ingredients(ingredients, now))
            .await?;
        Ok(production)
    }

    pub async fn update_quality_results(
        &self,
        id: &str,
        results: Vec<QualityResult>,
    ) -> Result<Production, ApiError> {
        let (production, ()) = self
            .mutate(id, |p, now| p.replace_quality_results(results, now))
            .await?;
        Ok(production)
    }

    pub async fn start_pause(
        &self,
        id: &str,
        reason: &str,
        category: PauseCategory,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<PauseRecord, ApiError> {
        let (production, pause) = self
            .mutate(id, |p, now| p.open_pause(reason, category, start_time, now))
            .await?;
        info!(production_id = %production.id, pause_id = %pause.id, ?category, "Pause started");
        Ok(pause)
    }

    pub async fn end_pause(
        &self,
        id: &str,
        pause_id: &str,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<PauseRecord, ApiError> {
        let (production, pause) = self
            .mutate(id, |p, now| p.close_pause(pause_id, end_time, now))
            .await?;
        info!(
            production_id = %production.id,
            pause_id,
            duration = pause.duration,
            pause_duration = production.pause_duration,
            "Pause ended"
        );
        Ok(pause)
    }

    pub async fn complete(&self, id: &str, input: CompletionInput) -> Result<Production, ApiError> {
        let (production, ()) = self.mutate(id, |p, now| p.complete(input, now)).await?;
        info!(
            production_id = %production.id,
            batch_number = %production.batch_number,
            final_quantity = production.final_quantity,
            net_duration = production.net_duration,
            "Production completed"
        );
        Ok(production)
    }

    pub async fn fail(&self, id: &str, reason: Option<String>) -> Result<Production, ApiError> {
        let (production, ()) = self.mutate(id, |p, now| p.fail(reason, now)).await?;
        info!(
            production_id = %production.id,
            batch_number = %production.batch_number,
            "Production failed"
        );
        Ok(production)
    }
}
