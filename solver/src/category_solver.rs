//! Second level: split a roll budget across a prefix of ATK%, ER%, crit pair.
//!
//! `solve_categories(b, k)` maximizes the product of per-category factors over
//! all allocations of exactly `b` rolls to `StatCategory::ORDER[0..k]`:
//!
//! ```text
//! best(b, k) = max_{c ∈ [0, b]} best(b − c, k − 1) · factor_{k−1}(c)
//! best(0, k) = best(b, 0) = 1
//! ```
//!
//! The crit pair's factor at `c` rolls is the third level's best value, read
//! from the context's crit table, and its winning split is recorded in the
//! allocation. Only a strictly larger product replaces the incumbent, so ties
//! keep the smaller `c`.
//!
//! ## Completeness
//!
//! The first category of the prefix takes whatever is left: recursing into
//! `k − 1 = 0` is only allowed with zero rolls remaining. Every solved cell
//! therefore spends its budget exactly.
//!
//! ## Caps
//!
//! Candidates above a category's cap are skipped. A cell with no feasible
//! candidate is stored as [`CellState::Infeasible`] and skipped by its callers.

use tracing::debug;

use crate::context::OptimizerContext;
use crate::damage_model::DamageModel;
use crate::error::{OptimizeError, Result};
use crate::types::{CellState, DpCell, StatCategory};

/// Best allocation of exactly `rolls` rolls over the first `categories` categories.
///
/// Returns an owned copy of the memoized cell (`None` if the caps admit no
/// allocation). Requires the crit table to cover `rolls` when the crit pair is
/// in the prefix.
pub fn solve_categories<M: DamageModel + ?Sized>(
    ctx: &mut OptimizerContext<'_, M>,
    rolls: u32,
    categories: usize,
) -> Result<Option<DpCell>> {
    match ctx.category_state(rolls, categories) {
        Some(CellState::Solved(cell)) => return Ok(Some(cell.clone())),
        Some(CellState::Infeasible) => return Ok(None),
        Some(CellState::Pending) => {}
        None => return Err(OptimizeError::UnreachableState { rolls, categories }),
    }

    if categories == 0 || rolls == 0 {
        let cell = DpCell::baseline(categories);
        ctx.store_category(rolls, categories, CellState::Solved(cell.clone()));
        return Ok(Some(cell));
    }

    let category = StatCategory::last_of_prefix(categories);
    let cap = ctx.caps.category_cap(category);

    let mut best: Option<DpCell> = None;
    for c in 0..=rolls {
        if cap.is_some_and(|cap| c > cap) {
            break;
        }
        let remaining = rolls - c;
        if categories == 1 && remaining > 0 {
            continue;
        }
        let Some(sub) = solve_categories(ctx, remaining, categories - 1)? else {
            continue;
        };

        let (factor, allocation) = match category {
            StatCategory::AttackPercent => (
                ctx.model.attack_percent(c, ctx.stats),
                sub.allocation.extended(c),
            ),
            StatCategory::EnergyRechargePercent => (
                ctx.model.energy_recharge(c, ctx.stats),
                sub.allocation.extended(c),
            ),
            StatCategory::CritPair => {
                let Some(crit) = ctx.crit_cell(c)? else {
                    continue;
                };
                (
                    crit.damage,
                    sub.allocation.extended(c).with_crit_split(crit.split),
                )
            }
        };

        let damage = sub.damage * factor;
        if best.as_ref().map_or(true, |b| damage > b.damage) {
            best = Some(DpCell { damage, allocation });
        }
    }

    let state = match &best {
        Some(cell) => {
            debug!(
                rolls,
                categories,
                damage = cell.damage,
                allocation = ?cell.allocation.rolls(),
                "category cell solved"
            );
            CellState::Solved(cell.clone())
        }
        None => {
            debug!(rolls, categories, "category cell infeasible under caps");
            CellState::Infeasible
        }
    };
    ctx.store_category(rolls, categories, state);
    Ok(best)
}
