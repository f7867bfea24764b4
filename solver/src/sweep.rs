//! Budget sweep: the optimum for every roll budget from 0 to a maximum.
//!
//! Budgets are independent, so they run in parallel with rayon `par_iter`.
//! Each budget goes through [`optimize`], which builds its own context; no memo
//! table is shared between workers.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::allocator::optimize;
use crate::damage_model::DamageModel;
use crate::error::Result;
use crate::types::{CharacterStats, Optimum, RollBudget, RollCaps};

/// One sweep result. Exactly one of `optimum` / `error` is set.
#[derive(Clone, Debug, Serialize)]
pub struct SweepRow {
    pub budget: u32,
    pub optimum: Option<Optimum>,
    pub error: Option<String>,
}

/// Optimize every budget in `0..=max_budget`, sorted by budget.
pub fn sweep_budgets<M: DamageModel + ?Sized>(
    stats: &CharacterStats,
    caps: &RollCaps,
    model: &M,
    max_budget: RollBudget,
) -> Result<Vec<SweepRow>> {
    stats.validate()?;
    let t0 = Instant::now();

    let rows: Vec<SweepRow> = (0..=max_budget.get())
        .into_par_iter()
        .map(|rolls| {
            let result = RollBudget::new(rolls).and_then(|b| optimize(stats, b, caps, model));
            match result {
                Ok(optimum) => SweepRow {
                    budget: rolls,
                    optimum: Some(optimum),
                    error: None,
                },
                Err(e) => SweepRow {
                    budget: rolls,
                    optimum: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    info!(
        budgets = rows.len(),
        elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
        "budget sweep complete"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage_model::{PlaceholderModel, StatScalingModel};

    #[test]
    fn test_sweep_is_sorted_and_complete() {
        let stats = CharacterStats::default();
        let rows = sweep_budgets(
            &stats,
            &RollCaps::none(),
            &StatScalingModel,
            RollBudget::new(10).unwrap(),
        )
        .unwrap();
        assert_eq!(rows.len(), 11);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.budget, i as u32);
            let opt = row.optimum.as_ref().unwrap();
            assert_eq!(opt.allocation.total(), row.budget);
        }
    }

    #[test]
    fn test_sweep_matches_single_calls() {
        let stats = CharacterStats {
            transformative_share: 0.5,
            elemental_mastery: 200.0,
            ..CharacterStats::default()
        };
        let caps = RollCaps::none();
        let rows = sweep_budgets(&stats, &caps, &StatScalingModel, RollBudget::new(8).unwrap())
            .unwrap();
        for row in &rows {
            let single = optimize(&stats, RollBudget::new(row.budget).unwrap(), &caps, &StatScalingModel)
                .unwrap();
            assert_eq!(row.optimum.as_ref(), Some(&single));
        }
    }

    #[test]
    fn test_sweep_reports_errors_per_row() {
        let stats = CharacterStats::default();
        let rows = sweep_budgets(
            &stats,
            &RollCaps::none(),
            &PlaceholderModel,
            RollBudget::new(2).unwrap(),
        )
        .unwrap();
        assert!(rows[0].optimum.is_some());
        assert!(rows[1].error.is_some());
        assert!(rows[2].optimum.is_some());
    }
}
