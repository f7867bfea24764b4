//! First level: split the budget between EM and everything else, plus the
//! public optimizer entry points.
//!
//! For each `i ∈ [0, total)` EM rolls the candidate value is
//!
//! ```text
//! em(i) + best(total − i, 3)
//! ```
//!
//! where `best` is the second level over ATK%, ER%, and the crit pair. The two
//! terms are added, treating transformative reaction damage as independent of
//! the attack-scaled damage. Only a strictly larger sum replaces the incumbent,
//! so ties keep the smaller EM roll count.
//!
//! Every call builds a fresh [`OptimizerContext`]; nothing is cached across calls.

use tracing::{debug, info};

use crate::category_solver::solve_categories;
use crate::constants::*;
use crate::context::OptimizerContext;
use crate::crit_split::fill_crit_table;
use crate::damage_model::{DamageModel, StatScalingModel};
use crate::error::{OptimizeError, Result};
use crate::types::{
    ArtifactAllocation, CharacterStats, EmSplit, Optimum, RollBudget, RollCaps, Stat,
};

/// Optimize a single artifact's substat rolls.
///
/// Validates the stats, allocates a fresh context sized to `budget`, fills the
/// crit table, and runs the first level. Either a complete, cap-respecting
/// allocation is returned or an error; never a partial result.
pub fn optimize<M: DamageModel + ?Sized>(
    stats: &CharacterStats,
    budget: RollBudget,
    caps: &RollCaps,
    model: &M,
) -> Result<Optimum> {
    stats.validate()?;
    info!(
        budget = budget.get(),
        model = model.name(),
        "optimizing substat rolls"
    );

    let mut ctx = OptimizerContext::new(stats, model, *caps, budget);
    fill_crit_table(&mut ctx);
    let optimum = allocate(&mut ctx)?;

    info!(
        damage = optimum.damage,
        em = optimum.allocation.elemental_mastery,
        atk = optimum.allocation.attack_percent,
        er = optimum.allocation.energy_recharge,
        cr = optimum.allocation.crit_rate,
        cd = optimum.allocation.crit_damage,
        cells = ctx.computed_category_cells(),
        "optimization complete"
    );
    Ok(optimum)
}

/// Fully upgraded 5-star artifact, stat-driven model.
pub fn optimize_default(stats: &CharacterStats, caps: &RollCaps) -> Result<Optimum> {
    optimize(stats, RollBudget::default(), caps, &StatScalingModel)
}

/// Run the first level on a context whose crit table is already filled.
pub fn allocate<M: DamageModel + ?Sized>(ctx: &mut OptimizerContext<'_, M>) -> Result<Optimum> {
    let total = ctx.budget();
    if total == 0 {
        return Ok(Optimum::baseline());
    }

    let splits = evaluate_em_splits(ctx)?;
    let mut best: Option<EmSplit> = None;
    for split in &splits {
        if best.map_or(true, |b| split.total > b.total) {
            best = Some(*split);
        }
    }
    let best = best.ok_or(OptimizeError::InfeasibleCaps { budget: total })?;
    if best.total <= BASELINE_DAMAGE {
        return Err(OptimizeError::NoBeneficialAllocation { best: best.total });
    }

    let other_rolls = total - best.em_rolls;
    let other = ctx
        .category_cell(other_rolls, CATEGORY_COUNT)?
        .ok_or(OptimizeError::UnreachableState {
            rolls: other_rolls,
            categories: CATEGORY_COUNT,
        })?;
    let allocation = ArtifactAllocation::from_parts(best.em_rolls, &other.allocation);
    allocation.check_caps(&ctx.caps)?;
    debug_assert_eq!(allocation.total(), total);

    Ok(Optimum {
        damage: best.total,
        allocation,
        splits,
    })
}

/// Evaluate every feasible EM split, in ascending EM rolls.
pub fn evaluate_em_splits<M: DamageModel + ?Sized>(
    ctx: &mut OptimizerContext<'_, M>,
) -> Result<Vec<EmSplit>> {
    let total = ctx.budget();
    let mut splits = Vec::with_capacity(total as usize);
    for em_rolls in 0..total {
        if !ctx.caps.allows(Stat::ElementalMastery, em_rolls) {
            break;
        }
        let Some(other) = solve_categories(ctx, total - em_rolls, CATEGORY_COUNT)? else {
            debug!(em_rolls, "no feasible allocation for remaining rolls");
            continue;
        };
        let em_damage = ctx.model.elemental_mastery(em_rolls, ctx.stats);
        splits.push(EmSplit {
            em_rolls,
            em_damage,
            other_damage: other.damage,
            total: em_damage + other.damage,
        });
    }
    Ok(splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage_model::PlaceholderModel;

    fn budget(n: u32) -> RollBudget {
        RollBudget::new(n).unwrap()
    }

    #[test]
    fn test_zero_budget_is_baseline() {
        let stats = CharacterStats::default();
        let opt = optimize(&stats, budget(0), &RollCaps::none(), &StatScalingModel).unwrap();
        assert_eq!(opt, Optimum::baseline());
        assert_eq!(opt.allocation.total(), 0);
    }

    #[test]
    fn test_no_beneficial_allocation() {
        // One roll: em(0) = −3 plus best(1, 3) = 3 sums to 0.
        let stats = CharacterStats::default();
        let err = optimize(&stats, budget(1), &RollCaps::none(), &PlaceholderModel).unwrap_err();
        match err {
            OptimizeError::NoBeneficialAllocation { best } => assert!(best.abs() < 1e-12),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_caps_with_no_outlet_are_infeasible() {
        let stats = CharacterStats::default();
        let caps = RollCaps::none()
            .with_cap(Stat::AttackPercent, 0)
            .with_cap(Stat::EnergyRecharge, 0)
            .with_cap(Stat::CritRate, 0)
            .with_cap(Stat::CritDamage, 0);
        let err = optimize(&stats, budget(3), &caps, &StatScalingModel).unwrap_err();
        assert!(matches!(err, OptimizeError::InfeasibleCaps { budget: 3 }));
    }

    #[test]
    fn test_invalid_stats_rejected_before_search() {
        let stats = CharacterStats {
            crit_rate: f64::NAN,
            ..CharacterStats::default()
        };
        let err = optimize(&stats, budget(5), &RollCaps::none(), &StatScalingModel).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidStats(_)));
    }

    #[test]
    fn test_splits_cover_every_em_count() {
        let stats = CharacterStats {
            transformative_share: 0.3,
            ..CharacterStats::default()
        };
        let opt = optimize(&stats, budget(6), &RollCaps::none(), &StatScalingModel).unwrap();
        let ems: Vec<u32> = opt.splits.iter().map(|s| s.em_rolls).collect();
        assert_eq!(ems, vec![0, 1, 2, 3, 4, 5]);
        let best = opt
            .splits
            .iter()
            .map(|s| s.total)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(opt.damage, best);
    }

    #[test]
    fn test_em_cap_limits_splits() {
        let stats = CharacterStats::default();
        let caps = RollCaps::none().excluding_main_stat(Stat::ElementalMastery);
        let opt = optimize(&stats, budget(5), &caps, &StatScalingModel).unwrap();
        assert_eq!(opt.splits.len(), 1);
        assert_eq!(opt.allocation.elemental_mastery, 0);
        assert_eq!(opt.allocation.total(), 5);
    }

    #[test]
    fn test_default_entry_point_uses_five_rolls() {
        let opt = optimize_default(&CharacterStats::default(), &RollCaps::none()).unwrap();
        assert_eq!(opt.allocation.total(), DEFAULT_ROLL_BUDGET);
    }
}
