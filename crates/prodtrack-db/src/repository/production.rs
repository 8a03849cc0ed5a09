//! # Production Repository
//!
//! Database operations for production batches.
//!
//! ## Storage Layout
//! ```text
//! productions row
//! ├── scalar columns: status, dates, durations, quantities, notes
//! ├── ingredients      TEXT (JSON array)
//! ├── pause_history    TEXT (JSON array)
//! ├── quality_results  TEXT (JSON array)
//! └── revision         INTEGER (optimistic lock)
//! ```
//!
//! ## Optimistic Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(&mut production)                                                 │
//! │                                                                         │
//! │  UPDATE productions SET ..., revision = revision + 1                   │
//! │  WHERE id = ? AND revision = ?   ← revision the caller loaded          │
//! │       │                                                                 │
//! │       ├── 1 row  → production.revision += 1                            │
//! │       └── 0 rows → row missing?  NotFound                              │
//! │                    otherwise     RevisionMismatch (someone else won)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{from_json, to_json, with_duplicate_value};
use prodtrack_core::{Production, ProductionStatus};

const SELECT_PRODUCTION: &str = r#"
    SELECT
        id, batch_number, product_id, product_code, product_name, recipe_version,
        operator, status, start_date, end_date,
        ingredients, pause_history, quality_results,
        total_duration, pause_duration, final_quantity, wastage_quantity, notes,
        revision, created_at, updated_at
    FROM productions
"#;

/// Raw `productions` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductionRow {
    id: String,
    batch_number: String,
    product_id: String,
    product_code: String,
    product_name: String,
    recipe_version: i64,
    operator: String,
    status: ProductionStatus,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    ingredients: String,
    pause_history: String,
    quality_results: String,
    total_duration: Option<i64>,
    pause_duration: i64,
    final_quantity: Option<f64>,
    wastage_quantity: Option<f64>,
    notes: Option<String>,
    revision: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductionRow> for Production {
    type Error = DbError;

    fn try_from(row: ProductionRow) -> DbResult<Self> {
        let mut production = Production {
            id: row.id,
            batch_number: row.batch_number,
            product_id: row.product_id,
            product_code: row.product_code,
            product_name: row.product_name,
            recipe_version: row.recipe_version,
            operator: row.operator,
            status: row.status,
            start_date: row.start_date,
            end_date: row.end_date,
            ingredients: from_json(&row.ingredients)?,
            pause_history: from_json(&row.pause_history)?,
            quality_results: from_json(&row.quality_results)?,
            total_duration: row.total_duration,
            pause_duration: row.pause_duration,
            net_duration: None,
            final_quantity: row.final_quantity,
            wastage_quantity: row.wastage_quantity,
            notes: row.notes,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        production.refresh_net_duration();
        Ok(production)
    }
}

/// Repository for production batch documents.
#[derive(Debug, Clone)]
pub struct ProductionRepository {
    pool: SqlitePool,
}

impl ProductionRepository {
    /// Creates a new ProductionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductionRepository { pool }
    }

    /// Gets a production by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Production>> {
        debug!(production_id = %id, "Fetching production");
        let row =
            sqlx::query_as::<_, ProductionRow>(&format!("{SELECT_PRODUCTION} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Production::try_from).transpose()
    }

    /// Gets a production by its batch number (unique across all products).
    pub async fn get_by_batch_number(&self, batch_number: &str) -> DbResult<Option<Production>> {
        debug!(%batch_number, "Fetching production by batch number");
        let row = sqlx::query_as::<_, ProductionRow>(&format!(
            "{SELECT_PRODUCTION} WHERE batch_number = ?"
        ))
        .bind(batch_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Production::try_from).transpose()
    }

    /// Lists productions, newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<ProductionStatus>) -> DbResult<Vec<Production>> {
        debug!(?status, "Listing productions");

        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ProductionRow>(&format!(
                    "{SELECT_PRODUCTION} WHERE status = ? ORDER BY start_date DESC, batch_number"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductionRow>(&format!(
                    "{SELECT_PRODUCTION} ORDER BY start_date DESC, batch_number"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Production::try_from).collect()
    }

    /// Inserts a freshly started production.
    ///
    /// ## Returns
    /// * `Err(DbError::Duplicate)` - batch number already used
    /// * `Err(DbError::InvalidReference)` - product id unknown
    pub async fn insert(&self, production: &Production) -> DbResult<()> {
        debug!(
            production_id = %production.id,
            batch_number = %production.batch_number,
            "Inserting production"
        );

        sqlx::query(
            r#"
            INSERT INTO productions (
                id, batch_number, product_id, product_code, product_name, recipe_version,
                operator, status, start_date, end_date,
                ingredients, pause_history, quality_results,
                total_duration, pause_duration, final_quantity, wastage_quantity, notes,
                revision, created_at, updated_at
            ) VALUES (
                ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?, ?,
                ?, ?, ?, ?, ?,
                ?, ?, ?
            )
            "#,
        )
        .bind(&production.id)
        .bind(&production.batch_number)
        .bind(&production.product_id)
        .bind(&production.product_code)
        .bind(&production.product_name)
        .bind(production.recipe_version)
        .bind(&production.operator)
        .bind(production.status)
        .bind(production.start_date)
        .bind(production.end_date)
        .bind(to_json(&production.ingredients)?)
        .bind(to_json(&production.pause_history)?)
        .bind(to_json(&production.quality_results)?)
        .bind(production.total_duration)
        .bind(production.pause_duration)
        .bind(production.final_quantity)
        .bind(production.wastage_quantity)
        .bind(&production.notes)
        .bind(production.revision)
        .bind(production.created_at)
        .bind(production.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| with_duplicate_value(e, &production.batch_number))?;

        Ok(())
    }

    /// Writes a mutated production back, guarded by its revision.
    ///
    /// On success `production.revision` matches the stored row again.
    pub async fn save(&self, production: &mut Production) -> DbResult<()> {
        debug!(
            production_id = %production.id,
            revision = production.revision,
            status = %production.status,
            "Saving production"
        );

        let result = sqlx::query(
            r#"
            UPDATE productions SET
                status = ?,
                end_date = ?,
                ingredients = ?,
                pause_history = ?,
                quality_results = ?,
                total_duration = ?,
                pause_duration = ?,
                final_quantity = ?,
                wastage_quantity = ?,
                notes = ?,
                updated_at = ?,
                revision = revision + 1
            WHERE id = ? AND revision = ?
            "#,
        )
        .bind(production.status)
        .bind(production.end_date)
        .bind(to_json(&production.ingredients)?)
        .bind(to_json(&production.pause_history)?)
        .bind(to_json(&production.quality_results)?)
        .bind(production.total_duration)
        .bind(production.pause_duration)
        .bind(production.final_quantity)
        .bind(production.wastage_quantity)
        .bind(&production.notes)
        .bind(production.updated_at)
        .bind(&production.id)
        .bind(production.revision)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT revision FROM productions WHERE id = ?")
                    .bind(&production.id)
                    .fetch_optional(&self.pool)
                    .await?;

            return Err(match exists {
                None => DbError::not_found("Production", &production.id),
                Some(current) => {
                    warn!(
                        production_id = %production.id,
                        expected = production.revision,
                        current,
                        "Stale production write rejected"
                    );
                    DbError::RevisionMismatch {
                        entity: "Production".to_string(),
                        id: production.id.clone(),
                        expected: production.revision,
                    }
                }
            });
        }

        production.revision += 1;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
