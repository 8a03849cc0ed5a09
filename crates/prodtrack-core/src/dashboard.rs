//! # Dashboard Aggregation
//!
//! Folds a list of productions into the admin summary. Pure: the API loads
//! the productions, this module does the arithmetic.
//!
//! ```text
//! [Production] ──► DashboardSummary
//!                   ├── counts by status
//!                   ├── output: final / wastage quantity
//!                   ├── time: avg net duration (completed), pause totals
//!                   ├── quality: non-conforme results
//!                   └── per product: batches + output
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use crate::types::{PauseCategory, Production, ProductionStatus, QualityOutcome};

/// Batch counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub in_progress: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
}

/// Closed pause time for one category, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PauseTotal {
    pub category: PauseCategory,
    pub count: u64,
    pub duration: i64,
}

/// Output of one product across all of its batches.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOutput {
    pub product_code: String,
    pub product_name: String,
    pub batches: u64,
    pub final_quantity: f64,
    pub wastage_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_batches: u64,
    pub status_counts: StatusCounts,
    pub total_final_quantity: f64,
    pub total_wastage_quantity: f64,
    /// Seconds; `None` when no batch is completed.
    pub average_net_duration: Option<i64>,
    pub total_pause_duration: i64,
    /// One entry per category, in display order.
    pub pause_totals: Vec<PauseTotal>,
    pub non_conforme_results: u64,
    /// Sorted by product code.
    pub products: Vec<ProductOutput>,
}

impl DashboardSummary {
    pub fn from_productions(productions: &[Production]) -> Self {
        let mut counts = StatusCounts::default();
        let mut total_final = 0.0;
        let mut total_wastage = 0.0;
        // Widened so that summing stored durations cannot overflow
        let mut net_sum = 0_i128;
        let mut net_count = 0_i128;
        let mut pauses: BTreeMap<PauseCategory, (u64, i128)> = BTreeMap::new();
        let mut non_conforme = 0;
        let mut products: BTreeMap<&str, ProductOutput> = BTreeMap::new();

        for p in productions {
            match p.status {
                ProductionStatus::InProgress => counts.in_progress += 1,
                ProductionStatus::Completed => counts.completed += 1,
                ProductionStatus::Failed => counts.failed += 1,
                ProductionStatus::Cancelled => counts.cancelled += 1,
            }

            let final_quantity = p.final_quantity.unwrap_or(0.0);
            let wastage = p.wastage_quantity.unwrap_or(0.0);
            total_final += final_quantity;
            total_wastage += wastage;

            if p.status == ProductionStatus::Completed {
                if let Some(net) = p.net_duration {
                    net_sum += i128::from(net);
                    net_count += 1;
                }
            }

            for record in &p.pause_history {
                if let Some(duration) = record.duration {
                    let entry = pauses.entry(record.category).or_default();
                    entry.0 += 1;
                    entry.1 += i128::from(duration);
                }
            }

            non_conforme += p
                .quality_results
                .iter()
                .filter(|q| q.result == QualityOutcome::NonConforme)
                .count() as u64;

            let output = products
                .entry(p.product_code.as_str())
                .or_insert_with(|| ProductOutput {
                    product_code: p.product_code.clone(),
                    product_name: p.product_name.clone(),
                    batches: 0,
                    final_quantity: 0.0,
                    wastage_quantity: 0.0,
                });
            output.batches += 1;
            output.final_quantity += final_quantity;
            output.wastage_quantity += wastage;
        }

        let pause_totals: Vec<PauseTotal> = PauseCategory::ALL
            .iter()
            .map(|&category| {
                let (count, duration) = pauses.get(&category).copied().unwrap_or((0, 0));
                PauseTotal {
                    category,
                    count,
                    duration: saturate(duration),
                }
            })
            .collect();
        let total_pause: i128 = pauses.values().map(|&(_, duration)| duration).sum();

        DashboardSummary {
            total_batches: productions.len() as u64,
            status_counts: counts,
            total_final_quantity: total_final,
            total_wastage_quantity: total_wastage,
            average_net_duration: (net_count > 0).then(|| saturate(net_sum / net_count)),
            total_pause_duration: saturate(total_pause),
            pause_totals,
            non_conforme_results: non_conforme,
            products: products.into_values().collect(),
        }
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
