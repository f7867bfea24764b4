//! Per-category marginal damage functions.
//!
//! A [`DamageModel`] maps a roll count (and the character's baseline stats) to
//! one category's contribution:
//!
//! | Category | Method | Combined as |
//! |----------|--------|-------------|
//! | Elemental Mastery | [`DamageModel::elemental_mastery`] | additive (first level) |
//! | ATK% | [`DamageModel::attack_percent`] | multiplicative factor (second level) |
//! | Energy Recharge% | [`DamageModel::energy_recharge`] | multiplicative factor (second level) |
//! | Crit Rate + Crit DMG | [`DamageModel::crit_pair`] | `(1 − pCR) + pCR·pCD` (third level) |
//!
//! Every method must be non-decreasing in each roll argument: the allocator
//! enumerates candidates exhaustively and relies on "more rolls never hurts".
//! Models are swappable per character without touching the solver.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::{CharacterStats, Playstyle};

pub trait DamageModel: Send + Sync {
    /// Short identifier used in logs and API responses.
    fn name(&self) -> &'static str;

    /// Additive contribution of `rolls` EM rolls.
    fn elemental_mastery(&self, rolls: u32, stats: &CharacterStats) -> f64;

    /// Multiplicative factor of `rolls` ATK% rolls.
    fn attack_percent(&self, rolls: u32, stats: &CharacterStats) -> f64;

    /// Multiplicative factor of `rolls` ER% rolls.
    fn energy_recharge(&self, rolls: u32, stats: &CharacterStats) -> f64;

    /// Expected crit factor for a concrete crit-rate / crit-damage split.
    fn crit_pair(&self, crit_rate_rolls: u32, crit_damage_rolls: u32, stats: &CharacterStats)
        -> f64;
}

/// Linear draft formulas. They ignore the character entirely and exist to pin
/// down solver behavior with hand-checkable numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderModel;

impl DamageModel for PlaceholderModel {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn elemental_mastery(&self, rolls: u32, _stats: &CharacterStats) -> f64 {
        rolls as f64 * 2.0 - 3.0
    }

    fn attack_percent(&self, rolls: u32, _stats: &CharacterStats) -> f64 {
        rolls as f64 * 1.5
    }

    fn energy_recharge(&self, rolls: u32, _stats: &CharacterStats) -> f64 {
        rolls as f64 + 2.0
    }

    fn crit_pair(&self, crit_rate_rolls: u32, crit_damage_rolls: u32, _stats: &CharacterStats) -> f64 {
        let n = (crit_rate_rolls + crit_damage_rolls) as f64;
        if n == 0.0 {
            return BASELINE_DAMAGE;
        }
        let p_cr = crit_rate_rolls as f64 / n;
        let p_cd = crit_damage_rolls as f64 / n;
        (1.0 - p_cr) + p_cr * p_cd
    }
}

/// Formulas driven by [`CharacterStats`] and average 5-star roll values.
///
/// Multiplicative factors are normalized so that zero rolls yield exactly
/// [`BASELINE_DAMAGE`], which keeps them consistent with the solver's base cases.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatScalingModel;

impl StatScalingModel {
    /// Burst uptime fraction at a given total ER.
    fn burst_uptime(stats: &CharacterStats, energy_recharge: f64) -> f64 {
        if stats.burst_energy_per_second <= 0.0 {
            return 1.0;
        }
        let gained = energy_recharge * stats.particles_per_second * ENERGY_PER_PARTICLE;
        (gained / stats.burst_energy_per_second).min(1.0)
    }

    /// Motion-value-weighted damage per second of one rotation, ATK held fixed.
    fn rotation_dps(stats: &CharacterStats, playstyle: &Playstyle, energy_recharge: f64) -> f64 {
        let bonus = &stats.damage_bonus;
        let talents = &stats.talents;
        let normal = playstyle.normal_attack
            * talents.normal_attack
            * (1.0 + bonus.general + bonus.normal_attack);
        let charged = playstyle.charged_attack
            * talents.normal_attack
            * (1.0 + bonus.general + bonus.charged_attack);
        let skill = playstyle.skill * talents.skill * (1.0 + bonus.general + bonus.skill);
        let burst = playstyle.burst
            * talents.burst
            * (1.0 + bonus.general + bonus.burst)
            * Self::burst_uptime(stats, energy_recharge);
        normal + charged + skill + burst
    }

    /// Rotation DPS for the preferred playstyle, or the best preset if none is set.
    fn best_rotation_dps(stats: &CharacterStats, energy_recharge: f64) -> f64 {
        match &stats.playstyle {
            Some(p) => Self::rotation_dps(stats, p, energy_recharge),
            None => Playstyle::PRESETS
                .iter()
                .map(|p| Self::rotation_dps(stats, p, energy_recharge))
                .fold(0.0, f64::max),
        }
    }

    fn expected_crit(crit_rate: f64, crit_damage: f64) -> f64 {
        let p = crit_rate.min(1.0);
        (1.0 - p) + p * (1.0 + crit_damage)
    }

    fn transformative_multiplier(em: f64) -> f64 {
        1.0 + TRANSFORMATIVE_EM_SCALE * em / (em + TRANSFORMATIVE_EM_OFFSET)
    }
}

impl DamageModel for StatScalingModel {
    fn name(&self) -> &'static str {
        "stat_scaling"
    }

    fn elemental_mastery(&self, rolls: u32, stats: &CharacterStats) -> f64 {
        let em = stats.elemental_mastery;
        let boosted = em + rolls as f64 * ELEMENTAL_MASTERY_PER_ROLL;
        stats.transformative_share * Self::transformative_multiplier(boosted)
            / Self::transformative_multiplier(em)
    }

    fn attack_percent(&self, rolls: u32, stats: &CharacterStats) -> f64 {
        let base = 1.0 + stats.attack_bonus;
        (base + rolls as f64 * ATTACK_PERCENT_PER_ROLL) / base
    }

    fn energy_recharge(&self, rolls: u32, stats: &CharacterStats) -> f64 {
        let er = stats.energy_recharge;
        let base = Self::best_rotation_dps(stats, er);
        if base <= 0.0 {
            return BASELINE_DAMAGE;
        }
        Self::best_rotation_dps(stats, er + rolls as f64 * ENERGY_RECHARGE_PER_ROLL) / base
    }

    fn crit_pair(&self, crit_rate_rolls: u32, crit_damage_rolls: u32, stats: &CharacterStats) -> f64 {
        let base = Self::expected_crit(stats.crit_rate, stats.crit_damage);
        let boosted = Self::expected_crit(
            stats.crit_rate + crit_rate_rolls as f64 * CRIT_RATE_PER_ROLL,
            stats.crit_damage + crit_damage_rolls as f64 * CRIT_DAMAGE_PER_ROLL,
        );
        boosted / base
    }
}

/// Selector for the built-in models (request files, CLI, HTTP).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Placeholder,
    #[default]
    StatScaling,
}

impl ModelKind {
    pub fn build(self) -> Box<dyn DamageModel> {
        match self {
            ModelKind::Placeholder => Box::new(PlaceholderModel),
            ModelKind::StatScaling => Box::new(StatScalingModel),
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placeholder" => Ok(ModelKind::Placeholder),
            "stat_scaling" | "scaling" => Ok(ModelKind::StatScaling),
            other => Err(format!("unknown model '{other}' (expected placeholder or stat_scaling)")),
        }
    }
}
