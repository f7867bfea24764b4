//! Property-based tests for the three DP levels.

use proptest::prelude::*;

use artifact_optimizer::category_solver::solve_categories;
use artifact_optimizer::constants::*;
use artifact_optimizer::context::OptimizerContext;
use artifact_optimizer::crit_split::{fill_crit_table, solve_crit_split};
use artifact_optimizer::damage_model::StatScalingModel;
use artifact_optimizer::optimize;
use artifact_optimizer::types::{
    CellState, CharacterStats, Playstyle, RollBudget, RollCaps, Stat, StatCategory,
};

/// Strategy: plausible baseline stats for a level-90 character.
fn stats_strategy() -> impl Strategy<Value = CharacterStats> {
    (
        (0.0..1.5f64, 0.0..1000.0f64, 1.0..3.0f64),
        (0.01..1.0f64, 0.0..3.0f64),
        (0.0..3.0f64, 0.0..6.0f64, 0.0..1.0f64),
        prop::option::of((0.0..2.0f64, 0.0..2.0f64, 0.0..2.0f64, 0.0..2.0f64)),
    )
        .prop_map(|((atk, em, er), (cr, cd), (pps, beps, share), play)| CharacterStats {
            attack_bonus: atk,
            elemental_mastery: em,
            energy_recharge: er,
            crit_rate: cr,
            crit_damage: cd,
            particles_per_second: pps,
            burst_energy_per_second: beps,
            transformative_share: share,
            playstyle: play.map(|(na, ca, e, q)| Playstyle {
                normal_attack: na,
                charged_attack: ca,
                skill: e,
                burst: q,
            }),
            ..CharacterStats::default()
        })
}

fn solved_ctx<'a>(
    stats: &'a CharacterStats,
    caps: RollCaps,
    budget: u32,
) -> OptimizerContext<'a, StatScalingModel> {
    let mut ctx = OptimizerContext::new(
        stats,
        &StatScalingModel,
        caps,
        RollBudget::new(budget).unwrap(),
    );
    fill_crit_table(&mut ctx);
    ctx
}

proptest! {
    // 1. Every cell spends exactly its budget (zero at the base cases)
    #[test]
    fn category_allocation_sums_to_budget(stats in stats_strategy(), budget in 0..=15u32) {
        let mut ctx = solved_ctx(&stats, RollCaps::none(), budget);
        for b in 0..=budget {
            for k in 0..=CATEGORY_COUNT {
                let cell = solve_categories(&mut ctx, b, k).unwrap().unwrap();
                let expected = if k == 0 { 0 } else { b };
                prop_assert_eq!(cell.allocation.total(), expected, "b={} k={}", b, k);
                prop_assert_eq!(
                    cell.allocation.crit_split().total(),
                    cell.allocation.get(StatCategory::CritPair)
                );
                if b == 0 || k == 0 {
                    prop_assert_eq!(cell.damage, BASELINE_DAMAGE);
                }
            }
        }
    }

    // 2. Crit split legs always add up to the rolls given to the pair
    #[test]
    fn crit_split_sums_to_rolls(stats in stats_strategy(), n in 0..=25u32) {
        match solve_crit_split(&StatScalingModel, &stats, &RollCaps::none(), n) {
            CellState::Solved(cell) => prop_assert_eq!(cell.split.total(), n),
            other => prop_assert!(false, "unexpected state {:?}", other),
        }
    }

    // 3. One more roll never lowers the best product
    #[test]
    fn category_value_monotone_in_budget(stats in stats_strategy(), k in 1..=CATEGORY_COUNT) {
        let mut ctx = solved_ctx(&stats, RollCaps::none(), 15);
        let mut prev = solve_categories(&mut ctx, 0, k).unwrap().unwrap().damage;
        for b in 1..=15 {
            let cur = solve_categories(&mut ctx, b, k).unwrap().unwrap().damage;
            prop_assert!(cur >= prev - 1e-12, "b={} k={} prev={} cur={}", b, k, prev, cur);
            prev = cur;
        }
    }

    // 4. Identical inputs on fresh contexts give identical output
    #[test]
    fn optimize_is_idempotent(stats in stats_strategy(), budget in 0..=12u32) {
        let budget = RollBudget::new(budget).unwrap();
        let a = optimize(&stats, budget, &RollCaps::none(), &StatScalingModel).unwrap();
        let b = optimize(&stats, budget, &RollCaps::none(), &StatScalingModel).unwrap();
        prop_assert_eq!(a, b);
    }

    // 5. Caps are honored and the search falls back instead of failing
    #[test]
    fn attack_cap_is_honored(stats in stats_strategy(), budget in 1..=12u32, cap in 0..=3u32) {
        let caps = RollCaps::none().with_cap(Stat::AttackPercent, cap);
        let opt = optimize(&stats, RollBudget::new(budget).unwrap(), &caps, &StatScalingModel)
            .unwrap();
        prop_assert!(opt.allocation.attack_percent <= cap);
        prop_assert_eq!(opt.allocation.total(), budget);
    }

    // 6. The reported optimum is the best evaluated split and spends the budget
    #[test]
    fn optimum_dominates_splits(stats in stats_strategy(), budget in 1..=12u32) {
        let opt = optimize(&stats, RollBudget::new(budget).unwrap(), &RollCaps::none(), &StatScalingModel)
            .unwrap();
        prop_assert_eq!(opt.allocation.total(), budget);
        prop_assert!(opt.allocation.elemental_mastery < budget);
        for split in &opt.splits {
            prop_assert!(split.total <= opt.damage);
        }
    }

    // 7. Fractional or negative budgets never reach the solver
    #[test]
    fn fractional_budgets_rejected(whole in -30i64..30, frac in 0.01..0.99f64) {
        prop_assert!(RollBudget::try_from(whole as f64 + frac).is_err());
        let whole_ok = (0..=MAX_ROLL_BUDGET as i64).contains(&whole);
        prop_assert_eq!(RollBudget::try_from(whole).is_ok(), whole_ok);
    }
}
