//! Third level: best crit-rate / crit-damage split for a fixed number of rolls.
//!
//! For `n` rolls given to the crit pair, tries every `rCR ∈ [0, n)` with
//! `rCD = n − rCR` and keeps the split with the largest
//! [`DamageModel::crit_pair`] value. Only a strictly larger value replaces the
//! incumbent, so ties resolve to the smallest `rCR`.
//!
//! Each call is O(n); [`fill_crit_table`] calls it once for every `n` in
//! `0..=budget`, which is the O(budget²) bound of the whole engine.

use tracing::debug;

use crate::damage_model::DamageModel;
use crate::context::OptimizerContext;
use crate::types::{CellState, CharacterStats, CritSplit, CritSplitCell, RollCaps, Stat};

/// Solve one crit-pair budget. Zero rolls is the baseline (value 1, split 0/0).
pub fn solve_crit_split<M: DamageModel + ?Sized>(
    model: &M,
    stats: &CharacterStats,
    caps: &RollCaps,
    rolls: u32,
) -> CellState<CritSplitCell> {
    if rolls == 0 {
        return CellState::Solved(CritSplitCell::baseline());
    }

    let mut best: Option<CritSplitCell> = None;
    for crit_rate in 0..rolls {
        let crit_damage = rolls - crit_rate;
        if !caps.allows(Stat::CritRate, crit_rate) || !caps.allows(Stat::CritDamage, crit_damage) {
            continue;
        }
        let damage = model.crit_pair(crit_rate, crit_damage, stats);
        if best.map_or(true, |b| damage > b.damage) {
            best = Some(CritSplitCell {
                damage,
                split: CritSplit {
                    crit_rate,
                    crit_damage,
                },
            });
        }
    }

    match best {
        Some(cell) => CellState::Solved(cell),
        None => CellState::Infeasible,
    }
}

/// Populate the crit table of `ctx` for every roll count up to its budget.
pub fn fill_crit_table<M: DamageModel + ?Sized>(ctx: &mut OptimizerContext<'_, M>) {
    for rolls in 0..=ctx.budget() {
        let state = solve_crit_split(ctx.model, ctx.stats, &ctx.caps, rolls);
        match &state {
            CellState::Solved(cell) => debug!(
                rolls,
                damage = cell.damage,
                crit_rate = cell.split.crit_rate,
                crit_damage = cell.split.crit_damage,
                "crit split solved"
            ),
            _ => debug!(rolls, "crit split infeasible under caps"),
        }
        ctx.store_crit(rolls, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage_model::{PlaceholderModel, StatScalingModel};
    use crate::types::RollBudget;

    /// Crit factor that ignores the split entirely.
    struct FlatCrit;

    impl DamageModel for FlatCrit {
        fn name(&self) -> &'static str {
            "flat"
        }
        fn elemental_mastery(&self, _: u32, _: &CharacterStats) -> f64 {
            0.0
        }
        fn attack_percent(&self, _: u32, _: &CharacterStats) -> f64 {
            1.0
        }
        fn energy_recharge(&self, _: u32, _: &CharacterStats) -> f64 {
            1.0
        }
        fn crit_pair(&self, _: u32, _: u32, _: &CharacterStats) -> f64 {
            1.25
        }
    }

    fn solved(state: CellState<CritSplitCell>) -> CritSplitCell {
        match state {
            CellState::Solved(cell) => cell,
            other => panic!("expected solved cell, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_rolls_is_baseline() {
        let stats = CharacterStats::default();
        let cell = solved(solve_crit_split(&StatScalingModel, &stats, &RollCaps::none(), 0));
        assert_eq!(cell, CritSplitCell::baseline());
    }

    #[test]
    fn test_split_sums_to_rolls() {
        let stats = CharacterStats::default();
        for n in 0..=25 {
            let cell = solved(solve_crit_split(&StatScalingModel, &stats, &RollCaps::none(), n));
            assert_eq!(cell.split.total(), n, "n={n}");
            assert!(n == 0 || cell.split.crit_rate < n);
        }
    }

    #[test]
    fn test_ties_keep_smallest_crit_rate() {
        let stats = CharacterStats::default();
        let cell = solved(solve_crit_split(&FlatCrit, &stats, &RollCaps::none(), 6));
        assert_eq!(cell.split, CritSplit { crit_rate: 0, crit_damage: 6 });
        assert_eq!(cell.damage, 1.25);
    }

    #[test]
    fn test_placeholder_prefers_all_crit_damage() {
        let stats = CharacterStats::default();
        let cell = solved(solve_crit_split(&PlaceholderModel, &stats, &RollCaps::none(), 3));
        assert_eq!(cell.split.crit_rate, 0);
        assert_eq!(cell.damage, 1.0);
    }

    #[test]
    fn test_low_crit_rate_favors_crit_rate_rolls() {
        // 5% / 50% baseline: crit rate is the scarcer leg.
        let stats = CharacterStats::default();
        let cell = solved(solve_crit_split(&StatScalingModel, &stats, &RollCaps::none(), 4));
        assert_eq!(cell.split, CritSplit { crit_rate: 3, crit_damage: 1 });
        assert!(cell.damage > 1.0);
    }

    #[test]
    fn test_caps_restrict_split() {
        let stats = CharacterStats::default();
        let caps = RollCaps::none().with_cap(Stat::CritRate, 1);
        let cell = solved(solve_crit_split(&StatScalingModel, &stats, &caps, 4));
        assert_eq!(cell.split, CritSplit { crit_rate: 1, crit_damage: 3 });
    }

    #[test]
    fn test_caps_can_make_split_infeasible() {
        let stats = CharacterStats::default();
        let caps = RollCaps::none()
            .with_cap(Stat::CritRate, 1)
            .with_cap(Stat::CritDamage, 1);
        assert_eq!(
            solve_crit_split(&StatScalingModel, &stats, &caps, 3),
            CellState::Infeasible
        );
    }

    #[test]
    fn test_fill_crit_table_covers_budget() {
        let stats = CharacterStats::default();
        let budget = RollBudget::new(7).unwrap();
        let mut ctx = OptimizerContext::new(&stats, &StatScalingModel, RollCaps::none(), budget);
        fill_crit_table(&mut ctx);
        for n in 0..=7 {
            let cell = ctx.crit_cell(n).unwrap().unwrap();
            assert_eq!(cell.split.total(), n);
        }
        assert!(ctx.crit_cell(8).is_err());
    }
}
