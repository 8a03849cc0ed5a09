//! # Production Lifecycle
//!
//! The batch state machine. Every operation here is pure: it takes the
//! current document plus `now` and either mutates it or returns a
//! [`CoreError`] without touching it.
//!
//! ## Batch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Batch Lifecycle                                   │
//! │                                                                         │
//! │  1. START                                                              │
//! │     └── start_production() → Production { status: in_progress }        │
//! │         (recipe ingredients + quality checks snapshotted)              │
//! │                                                                         │
//! │  2. RECORD (any order, any number of times)                            │
//! │     └── replace_ingredients()      wholesale list replacement          │
//! │     └── replace_quality_results()  wholesale list replacement          │
//! │     └── open_pause() / close_pause()                                   │
//! │                                                                         │
//! │  3. CLOSE OUT (exactly one)                                            │
//! │     └── complete() → { status: completed }                             │
//! │     └── fail()     → { status: failed }                                │
//! │                                                                         │
//! │  After 3 the document is read-only.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Durations
//! All durations are whole seconds. `pause_duration` is the running sum of
//! closed pauses; `net_duration` is derived from `total_duration` and
//! `pause_duration` and clamped at zero.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::quality::ValueRange;
use crate::types::{
    CompletionInput, PauseCategory, PauseRecord, Product, Production, ProductionIngredient,
    ProductionStatus, QualityOutcome, QualityResult,
};
use crate::validation::{
    validate_code, validate_optional_text, validate_production_ingredients,
    validate_quality_results, validate_quantity, validate_required,
};
use crate::{MAX_NAME_LEN, MAX_TEXT_LEN, MAX_TOTAL_DURATION_SECS};

// =============================================================================
// Duration Arithmetic
// =============================================================================

/// Whole seconds between two instants, rounded half up, clamped at zero.
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use prodtrack_core::lifecycle::elapsed_seconds;
///
/// let t0 = Utc::now();
/// assert_eq!(elapsed_seconds(t0, t0 + Duration::milliseconds(90_400)), 90);
/// assert_eq!(elapsed_seconds(t0, t0 + Duration::milliseconds(1_500)), 2);
/// assert_eq!(elapsed_seconds(t0 + Duration::seconds(5), t0), 0);
/// ```
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 500) / 1000
}

// =============================================================================
// Start
// =============================================================================

/// Creates a new in-progress batch from a product's current recipe.
///
/// The batch number uniqueness check needs storage and happens in the
/// caller; this function validates input and builds the snapshot.
pub fn start_production(
    product: &Product,
    batch_number: &str,
    operator: &str,
    now: DateTime<Utc>,
) -> CoreResult<Production> {
    let batch_number = validate_code("batchNumber", batch_number)?;
    let operator = validate_required("operator", operator, MAX_NAME_LEN)?;

    if !product.is_active() {
        return Err(CoreError::ProductInactive(product.code.clone()));
    }

    let ingredients = product
        .recipe
        .ingredients
        .iter()
        .map(|i| ProductionIngredient {
            name: i.name.clone(),
            required_quantity: i.quantity,
            actual_quantity: None,
            unit: i.unit,
        })
        .collect();

    let quality_results = product
        .recipe
        .quality_checks
        .iter()
        .map(|c| QualityResult {
            check_name: c.name.clone(),
            expected_value: c.expected_value.clone(),
            actual_value: String::new(),
            result: QualityOutcome::NonTeste,
            notes: String::new(),
        })
        .collect();

    Ok(Production {
        id: Uuid::new_v4().to_string(),
        batch_number,
        product_id: product.id.clone(),
        product_code: product.code.clone(),
        product_name: product.name.clone(),
        recipe_version: product.recipe.version,
        operator,
        status: ProductionStatus::InProgress,
        start_date: now,
        end_date: None,
        ingredients,
        pause_history: Vec::new(),
        quality_results,
        total_duration: None,
        pause_duration: 0,
        net_duration: None,
        final_quantity: None,
        wastage_quantity: None,
        notes: None,
        revision: 0,
        created_at: now,
        updated_at: now,
    })
}

// =============================================================================
// Mutations
// =============================================================================

impl Production {
    /// Fails with `InvalidProductionStatus` unless the batch is in progress.
    pub fn ensure_in_progress(&self, operation: &str) -> CoreResult<()> {
        if self.status != ProductionStatus::InProgress {
            return Err(CoreError::InvalidProductionStatus {
                production_id: self.id.clone(),
                current_status: self.status,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the currently open pause, if any.
    pub fn open_pause_record(&self) -> Option<&PauseRecord> {
        self.pause_history.iter().find(|p| p.is_open())
    }

    /// Recomputes `net_duration` from the stored totals.
    ///
    /// Client-supplied timestamps can make `pause_duration` exceed
    /// `total_duration`; the result is clamped to zero.
    pub fn refresh_net_duration(&mut self) {
        self.net_duration = self
            .total_duration
            .map(|total| total.saturating_sub(self.pause_duration).max(0));
    }

    /// Replaces the whole ingredient list.
    ///
    /// The caller submits the full current set, including actuals recorded
    /// earlier; nothing is merged.
    pub fn replace_ingredients(
        &mut self,
        ingredients: Vec<ProductionIngredient>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        self.ensure_in_progress("update ingredients")?;
        validate_production_ingredients(&ingredients)?;

        self.ingredients = ingredients;
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the whole quality-result list.
    ///
    /// A measured value left as `non-testé` against a numeric range check is
    /// judged by the range. Explicit outcomes are kept as submitted.
    pub fn replace_quality_results(
        &mut self,
        mut results: Vec<QualityResult>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        self.ensure_in_progress("update quality results")?;
        validate_quality_results(&results)?;

        for result in results
            .iter_mut()
            .filter(|r| r.result == QualityOutcome::NonTeste && !r.actual_value.trim().is_empty())
        {
            if let Some(range) = ValueRange::parse(&result.expected_value) {
                result.result = range.evaluate(&result.actual_value);
            }
        }

        self.quality_results = results;
        self.updated_at = now;
        Ok(())
    }

    /// Appends an open pause and returns it.
    ///
    /// Only one pause may be open at a time.
    pub fn open_pause(
        &mut self,
        reason: &str,
        category: PauseCategory,
        start_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> CoreResult<PauseRecord> {
        self.ensure_in_progress("record a pause")?;
        validate_optional_text("reason", reason)?;

        if let Some(open) = self.open_pause_record() {
            return Err(CoreError::PauseAlreadyOpen {
                pause_id: open.id.clone(),
            });
        }

        let record = PauseRecord {
            id: Uuid::new_v4().to_string(),
            start_time: start_time.unwrap_or(now),
            end_time: None,
            duration: None,
            reason: reason.trim().to_string(),
            category,
        };

        self.pause_history.push(record.clone());
        self.updated_at = now;
        Ok(record)
    }

    /// Closes an open pause and adds its duration to `pause_duration`.
    pub fn close_pause(
        &mut self,
        pause_id: &str,
        end_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> CoreResult<PauseRecord> {
        self.ensure_in_progress("end a pause")?;

        let production_id = self.id.clone();
        let record = self
            .pause_history
            .iter_mut()
            .find(|p| p.id == pause_id)
            .ok_or_else(|| CoreError::PauseNotFound {
                production_id,
                pause_id: pause_id.to_string(),
            })?;

        if !record.is_open() {
            return Err(CoreError::PauseAlreadyClosed {
                pause_id: pause_id.to_string(),
            });
        }

        let end = end_time.unwrap_or(now);
        let duration = elapsed_seconds(record.start_time, end);
        record.end_time = Some(end);
        record.duration = Some(duration);
        let closed = record.clone();

        self.pause_duration = self.pause_duration.saturating_add(duration);
        self.refresh_net_duration();
        self.updated_at = now;

        Ok(closed)
    }

    /// Closes any pause still open at a terminal transition, ending it at `now`.
    fn close_dangling_pauses(&mut self, now: DateTime<Utc>) {
        for record in self.pause_history.iter_mut().filter(|p| p.is_open()) {
            let duration = elapsed_seconds(record.start_time, now);
            record.end_time = Some(now);
            record.duration = Some(duration);
            self.pause_duration = self.pause_duration.saturating_add(duration);
        }
    }

    // =========================================================================
    // Terminal Transitions
    // =========================================================================

    /// Completes the batch.
    ///
    /// `total_duration` comes from the caller when supplied, otherwise from
    /// the wall clock since `start_date`.
    pub fn complete(&mut self, input: CompletionInput, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_in_progress("complete")?;

        validate_quantity("finalQuantity", input.final_quantity)?;
        let wastage = input.wastage_quantity.unwrap_or(0.0);
        validate_quantity("wastageQuantity", wastage)?;
        if let Some(total) = input.total_duration {
            if total < 0 {
                return Err(ValidationError::Negative {
                    field: "totalDuration".to_string(),
                }
                .into());
            }
            if total > MAX_TOTAL_DURATION_SECS {
                return Err(ValidationError::TooLarge {
                    field: "totalDuration".to_string(),
                    max: MAX_TOTAL_DURATION_SECS,
                }
                .into());
            }
        }
        let notes = input
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(ref n) = notes {
            validate_optional_text("notes", n)?;
        }

        self.close_dangling_pauses(now);
        self.final_quantity = Some(input.final_quantity);
        self.wastage_quantity = Some(wastage);
        if notes.is_some() {
            self.notes = notes;
        }
        self.total_duration = Some(
            input
                .total_duration
                .unwrap_or_else(|| elapsed_seconds(self.start_date, now)),
        );
        self.finish(ProductionStatus::Completed, now);
        Ok(())
    }

    /// Marks the batch as failed. The duration is always wall-clock derived.
    pub fn fail(&mut self, reason: Option<String>, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_in_progress("fail")?;

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(ref r) = reason {
            if r.chars().count() > MAX_TEXT_LEN {
                return Err(ValidationError::TooLong {
                    field: "reason".to_string(),
                    max: MAX_TEXT_LEN,
                }
                .into());
            }
        }

        self.close_dangling_pauses(now);
        if reason.is_some() {
            self.notes = reason;
        }
        self.total_duration = Some(elapsed_seconds(self.start_date, now));
        self.finish(ProductionStatus::Failed, now);
        Ok(())
    }

    fn finish(&mut self, status: ProductionStatus, now: DateTime<Utc>) {
        self.status = status;
        self.end_date = Some(now);
        self.updated_at = now;
        self.refresh_net_duration();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ProductStatus, QualityCheck, QualityCheckType, Recipe, RecipeIngredient, Unit,
    };
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn product_a123() -> Product {
        let ingredient = |name: &str, quantity: f64, unit: Unit| RecipeIngredient {
            name: name.to_string(),
            quantity,
            unit,
            notes: String::new(),
        };
        Product {
            id: "prod-a123".to_string(),
            code: "A123".to_string(),
            name: "Brioche".to_string(),
            category: "bakery".to_string(),
            status: ProductStatus::Active,
            recipe: Recipe {
                version: 3,
                last_updated: t0(),
                ingredients: vec![
                    ingredient("Flour", 50.0, Unit::Kg),
                    ingredient("Butter", 12.0, Unit::Kg),
                    ingredient("Milk", 20.0, Unit::L),
                    ingredient("Yeast", 800.0, Unit::G),
                ],
                steps: vec![],
                quality_checks: vec![
                    QualityCheck {
                        name: "Weight".to_string(),
                        check_type: QualityCheckType::Physical,
                        expected_value: "95-105".to_string(),
                    },
                    QualityCheck {
                        name: "Colour".to_string(),
                        check_type: QualityCheckType::Visual,
                        expected_value: "golden".to_string(),
                    },
                ],
            },
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn started() -> Production {
        start_production(&product_a123(), "L001", "alice", t0()).unwrap()
    }

    #[test]
    fn test_start_snapshots_recipe() {
        let p = started();
        assert_eq!(p.status, ProductionStatus::InProgress);
        assert_eq!(p.batch_number, "L001");
        assert_eq!(p.product_code, "A123");
        assert_eq!(p.recipe_version, 3);
        assert_eq!(p.start_date, t0());
        assert!(p.end_date.is_none());

        assert_eq!(p.ingredients.len(), 4);
        assert!(p.ingredients.iter().all(|i| i.actual_quantity.is_none()));
        assert_eq!(p.ingredients[3].required_quantity, 800.0);
        assert_eq!(p.ingredients[3].unit, Unit::G);

        assert_eq!(p.quality_results.len(), 2);
        assert!(p
            .quality_results
            .iter()
            .all(|q| q.result == QualityOutcome::NonTeste && q.actual_value.is_empty()));
        assert_eq!(p.quality_results[0].expected_value, "95-105");
    }

    #[test]
    fn test_start_rejects_inactive_product_and_bad_input() {
        let mut product = product_a123();
        assert!(start_production(&product, "", "alice", t0()).is_err());
        assert!(start_production(&product, "L001", "  ", t0()).is_err());

        product.status = ProductStatus::Inactive;
        let err = start_production(&product, "L001", "alice", t0()).unwrap_err();
        assert!(matches!(err, CoreError::ProductInactive(_)));
    }

    #[test]
    fn test_elapsed_seconds_rounding_and_clamp() {
        assert_eq!(elapsed_seconds(t0(), t0() + Duration::seconds(90)), 90);
        assert_eq!(elapsed_seconds(t0(), t0() + Duration::milliseconds(499)), 0);
        assert_eq!(elapsed_seconds(t0(), t0() + Duration::milliseconds(500)), 1);
        assert_eq!(elapsed_seconds(t0() + Duration::seconds(30), t0()), 0);
    }

    #[test]
    fn test_pause_open_and_close() {
        let mut p = started();
        let pause = p
            .open_pause("equipment jam", PauseCategory::Equipment, Some(t0()), t0())
            .unwrap();
        assert!(pause.is_open());
        assert_eq!(p.pause_history.len(), 1);

        let closed = p
            .close_pause(&pause.id, Some(t0() + Duration::seconds(90)), t0())
            .unwrap();
        assert_eq!(closed.duration, Some(90));
        assert_eq!(p.pause_duration, 90);
        assert!(p.open_pause_record().is_none());
    }

    #[test]
    fn test_inverted_pause_timestamps_clamp_to_zero() {
        let mut p = started();
        let start = t0() + Duration::seconds(300);
        let pause = p
            .open_pause("late badge", PauseCategory::Personnel, Some(start), t0())
            .unwrap();
        let closed = p.close_pause(&pause.id, Some(t0()), t0()).unwrap();
        assert_eq!(closed.duration, Some(0));
        assert_eq!(p.pause_duration, 0);
    }

    #[test]
    fn test_pause_duration_is_sum_of_closed_pauses() {
        let mut p = started();
        let mut expected = 0;
        for (i, secs) in [30_i64, 45, 120].into_iter().enumerate() {
            let start = t0() + Duration::seconds(1000 * i as i64);
            let pause = p
                .open_pause("restock", PauseCategory::Material, Some(start), start)
                .unwrap();
            p.close_pause(&pause.id, Some(start + Duration::seconds(secs)), start)
                .unwrap();
            expected += secs;
        }
        assert_eq!(p.pause_duration, expected);
        assert_eq!(
            p.pause_history.iter().filter_map(|r| r.duration).sum::<i64>(),
            expected
        );
    }

    #[test]
    fn test_only_one_open_pause() {
        let mut p = started();
        p.open_pause("a", PauseCategory::Other, None, t0()).unwrap();
        let err = p.open_pause("b", PauseCategory::Other, None, t0()).unwrap_err();
        assert!(matches!(err, CoreError::PauseAlreadyOpen { .. }));
    }

    #[test]
    fn test_close_unknown_or_closed_pause() {
        let mut p = started();
        let err = p.close_pause("nope", None, t0()).unwrap_err();
        assert!(matches!(err, CoreError::PauseNotFound { .. }));

        let pause = p.open_pause("a", PauseCategory::Other, None, t0()).unwrap();
        p.close_pause(&pause.id, None, t0()).unwrap();
        let err = p.close_pause(&pause.id, None, t0()).unwrap_err();
        assert!(matches!(err, CoreError::PauseAlreadyClosed { .. }));
    }

    #[test]
    fn test_replace_ingredients_is_idempotent() {
        let mut p = started();
        let mut items = p.ingredients.clone();
        items[0].actual_quantity = Some(49.5);

        p.replace_ingredients(items.clone(), t0()).unwrap();
        let first = p.clone();
        p.replace_ingredients(items, t0()).unwrap();
        assert_eq!(p, first);
        assert_eq!(p.ingredients[0].actual_quantity, Some(49.5));
    }

    #[test]
    fn test_range_checks_judge_untested_measurements() {
        let mut p = started();
        let mut results = p.quality_results.clone();
        results[0].actual_value = "110".to_string();
        results[1].actual_value = "pale".to_string();
        p.replace_quality_results(results, t0()).unwrap();

        // "95-105" is a range, "golden" is free text
        assert_eq!(p.quality_results[0].result, QualityOutcome::NonConforme);
        assert_eq!(p.quality_results[1].result, QualityOutcome::NonTeste);

        let mut results = p.quality_results.clone();
        results[0].actual_value = "101".to_string();
        results[0].result = QualityOutcome::NonTeste;
        results[1].result = QualityOutcome::NonConforme;
        p.replace_quality_results(results, t0()).unwrap();
        assert_eq!(p.quality_results[0].result, QualityOutcome::Conforme);
        assert_eq!(p.quality_results[1].result, QualityOutcome::NonConforme);
    }

    #[test]
    fn test_explicit_quality_outcome_is_kept() {
        let mut p = started();
        let mut results = p.quality_results.clone();
        results[0].actual_value = "110".to_string();
        results[0].result = QualityOutcome::Conforme;
        p.replace_quality_results(results, t0()).unwrap();
        assert_eq!(p.quality_results[0].result, QualityOutcome::Conforme);
    }

    #[test]
    fn test_complete_with_wall_clock_duration() {
        let mut p = started();
        let pause = p
            .open_pause("equipment jam", PauseCategory::Equipment, Some(t0()), t0())
            .unwrap();
        p.close_pause(&pause.id, Some(t0() + Duration::seconds(90)), t0())
            .unwrap();

        let end = t0() + Duration::seconds(3600);
        p.complete(
            CompletionInput {
                final_quantity: 98.5,
                ..Default::default()
            },
            end,
        )
        .unwrap();

        assert_eq!(p.status, ProductionStatus::Completed);
        assert_eq!(p.end_date, Some(end));
        assert_eq!(p.final_quantity, Some(98.5));
        assert_eq!(p.wastage_quantity, Some(0.0));
        assert_eq!(p.total_duration, Some(3600));
        assert_eq!(p.net_duration, Some(3510));
    }

    #[test]
    fn test_complete_with_client_duration_clamps_net() {
        let mut p = started();
        let pause = p
            .open_pause("x", PauseCategory::Other, Some(t0()), t0())
            .unwrap();
        p.close_pause(&pause.id, Some(t0() + Duration::seconds(600)), t0())
            .unwrap();

        p.complete(
            CompletionInput {
                final_quantity: 10.0,
                wastage_quantity: Some(1.5),
                notes: Some("short run".to_string()),
                total_duration: Some(300),
            },
            t0() + Duration::seconds(900),
        )
        .unwrap();
        assert_eq!(p.total_duration, Some(300));
        assert_eq!(p.net_duration, Some(0));
        assert_eq!(p.notes.as_deref(), Some("short run"));
    }

    #[test]
    fn test_complete_validates_quantities() {
        let mut p = started();
        let bad = CompletionInput {
            final_quantity: -1.0,
            ..Default::default()
        };
        assert!(p.complete(bad, t0()).is_err());
        assert_eq!(p.status, ProductionStatus::InProgress);
    }

    #[test]
    fn test_complete_caps_client_duration() {
        let mut p = started();
        let huge = CompletionInput {
            final_quantity: 1.0,
            total_duration: Some(i64::MAX),
            ..Default::default()
        };
        let err = p.complete(huge, t0()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
        assert_eq!(p.status, ProductionStatus::InProgress);

        let at_cap = CompletionInput {
            final_quantity: 1.0,
            total_duration: Some(MAX_TOTAL_DURATION_SECS),
            ..Default::default()
        };
        p.complete(at_cap, t0()).unwrap();
        assert_eq!(p.total_duration, Some(MAX_TOTAL_DURATION_SECS));
    }

    #[test]
    fn test_complete_blank_notes_keep_existing() {
        let mut p = started();
        p.notes = Some("dough rested longer".to_string());
        p.complete(
            CompletionInput {
                final_quantity: 5.0,
                notes: Some("   ".to_string()),
                ..Default::default()
            },
            t0() + Duration::seconds(10),
        )
        .unwrap();
        assert_eq!(p.notes.as_deref(), Some("dough rested longer"));
    }

    #[test]
    fn test_terminal_state_rejects_everything() {
        let mut p = started();
        p.complete(
            CompletionInput {
                final_quantity: 98.5,
                ..Default::default()
            },
            t0() + Duration::seconds(60),
        )
        .unwrap();
        let snapshot = p.clone();

        let is_invalid_state =
            |r: CoreResult<()>| matches!(r, Err(CoreError::InvalidProductionStatus { .. }));

        assert!(is_invalid_state(p.replace_ingredients(vec![], t0())));
        assert!(is_invalid_state(p.replace_quality_results(vec![], t0())));
        assert!(is_invalid_state(
            p.open_pause("x", PauseCategory::Other, None, t0()).map(|_| ())
        ));
        assert!(is_invalid_state(p.close_pause("x", None, t0()).map(|_| ())));
        assert!(is_invalid_state(p.complete(
            CompletionInput {
                final_quantity: 1.0,
                ..Default::default()
            },
            t0()
        )));
        assert!(is_invalid_state(p.fail(None, t0())));
        assert_eq!(p, snapshot);
    }

    #[test]
    fn test_fail_sets_notes_and_closes_open_pause() {
        let mut p = started();
        p.notes = Some("initial".to_string());
        p.open_pause("power cut", PauseCategory::Equipment, Some(t0()), t0())
            .unwrap();

        let end = t0() + Duration::seconds(120);
        p.fail(Some("power cut".to_string()), end).unwrap();

        assert_eq!(p.status, ProductionStatus::Failed);
        assert_eq!(p.notes.as_deref(), Some("power cut"));
        assert_eq!(p.total_duration, Some(120));
        assert_eq!(p.pause_duration, 120);
        assert_eq!(p.net_duration, Some(0));
        assert!(p.open_pause_record().is_none());
    }

    #[test]
    fn test_fail_without_reason_keeps_notes() {
        let mut p = started();
        p.notes = Some("initial".to_string());
        p.fail(None, t0() + Duration::seconds(5)).unwrap();
        assert_eq!(p.notes.as_deref(), Some("initial"));
    }
}
