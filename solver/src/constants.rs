//! Roll budget limits, per-roll stat gains, and memo-table indexing.
//!
//! Maps design notation to concrete values:
//! - |categories| = [`CATEGORY_COUNT`] = 3 (ATK%, ER%, CR+CD), EM handled above them
//! - max budget = [`MAX_ROLL_BUDGET`] = 25 (5 substats × 5 rolls, 5-star artifact)
//! - DP_CELL(b, k) = [`category_cell_index`]`(b, k)` = b * CATEGORY_STRIDE + k

/// Number of categories searched by the second level: ATK%, ER%, and the crit pair.
pub const CATEGORY_COUNT: usize = 3;

/// Stride per roll count in the category memo table (prefix lengths 0..=3).
pub const CATEGORY_STRIDE: usize = CATEGORY_COUNT + 1;

/// Number of individually cappable substats (EM, ATK%, ER%, CR, CD).
pub const STAT_COUNT: usize = 5;

/// Rolls on a fully upgraded 5-star artifact.
pub const DEFAULT_ROLL_BUDGET: u32 = 5;

/// Largest budget accepted by the optimizer entry points.
pub const MAX_ROLL_BUDGET: u32 = 25;

/// Value of "no rolls spent, no improvement".
pub const BASELINE_DAMAGE: f64 = 1.0;

/// Average 5-star substat roll values (85% of the max roll tier).
pub const ATTACK_PERCENT_PER_ROLL: f64 = 0.0496;
pub const ENERGY_RECHARGE_PER_ROLL: f64 = 0.0551;
pub const ELEMENTAL_MASTERY_PER_ROLL: f64 = 19.82;
pub const CRIT_RATE_PER_ROLL: f64 = 0.0331;
pub const CRIT_DAMAGE_PER_ROLL: f64 = 0.0662;

/// Flat energy granted by one same-element particle before ER scaling.
pub const ENERGY_PER_PARTICLE: f64 = 3.0;

/// Transformative reaction bonus curve: 16·EM / (EM + 2000).
pub const TRANSFORMATIVE_EM_SCALE: f64 = 16.0;
pub const TRANSFORMATIVE_EM_OFFSET: f64 = 2000.0;

/// Human-readable substat names, in [`crate::types::Stat`] order.
pub const STAT_NAMES: [&str; STAT_COUNT] = [
    "Elemental Mastery",
    "ATK%",
    "Energy Recharge%",
    "Crit Rate",
    "Crit DMG",
];

/// Map a second-level key (rolls, prefix length) to its flat memo index.
#[inline(always)]
pub fn category_cell_index(rolls: usize, categories: usize) -> usize {
    rolls * CATEGORY_STRIDE + categories
}

/// Number of slots in a category memo table for a given budget.
#[inline(always)]
pub fn category_table_len(budget: u32) -> usize {
    (budget as usize + 1) * CATEGORY_STRIDE
}
