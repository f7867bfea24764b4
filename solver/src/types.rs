//! Core data structures: stats, roll budgets and caps, allocations, and memo cells.
//!
//! The solver reads a [`CharacterStats`] and a [`RollBudget`], never mutating either.
//! Intermediate results live in [`DpCell`] / [`CritSplitCell`] entries owned by
//! [`crate::context::OptimizerContext`]; the final answer is an [`Optimum`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{OptimizeError, Result};

/// A single cappable substat line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    ElementalMastery,
    AttackPercent,
    EnergyRecharge,
    CritRate,
    CritDamage,
}

impl Stat {
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::ElementalMastery,
        Stat::AttackPercent,
        Stat::EnergyRecharge,
        Stat::CritRate,
        Stat::CritDamage,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        STAT_NAMES[self.index()]
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "em" | "elemental_mastery" => Ok(Stat::ElementalMastery),
            "atk" | "atk%" | "attack_percent" => Ok(Stat::AttackPercent),
            "er" | "er%" | "energy_recharge" => Ok(Stat::EnergyRecharge),
            "cr" | "crit_rate" => Ok(Stat::CritRate),
            "cd" | "crit_damage" => Ok(Stat::CritDamage),
            other => Err(format!("unknown stat '{other}'")),
        }
    }
}

/// Categories searched by the second level, in prefix order.
///
/// Prefix length `k` covers `ORDER[0..k]`; the recursion always assigns rolls to
/// the last category of the prefix, `ORDER[k - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    AttackPercent,
    EnergyRechargePercent,
    CritPair,
}

impl StatCategory {
    pub const ORDER: [StatCategory; CATEGORY_COUNT] = [
        StatCategory::AttackPercent,
        StatCategory::EnergyRechargePercent,
        StatCategory::CritPair,
    ];

    /// Last category of a prefix of length `k` (1..=3).
    #[inline]
    pub fn last_of_prefix(k: usize) -> StatCategory {
        debug_assert!((1..=CATEGORY_COUNT).contains(&k), "prefix {} out of range", k);
        Self::ORDER[k - 1]
    }

    pub fn position(self) -> usize {
        self as usize
    }
}

/// Total number of substat rolls available to one optimizer call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RollBudget(u32);

impl RollBudget {
    pub fn new(rolls: u32) -> Result<Self> {
        if rolls > MAX_ROLL_BUDGET {
            return Err(OptimizeError::InvalidBudget {
                value: rolls.to_string(),
                max: MAX_ROLL_BUDGET,
            });
        }
        Ok(Self(rolls))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RollBudget {
    fn default() -> Self {
        Self(DEFAULT_ROLL_BUDGET)
    }
}

impl TryFrom<i64> for RollBudget {
    type Error = OptimizeError;

    fn try_from(value: i64) -> Result<Self> {
        u32::try_from(value)
            .map_err(|_| OptimizeError::InvalidBudget {
                value: value.to_string(),
                max: MAX_ROLL_BUDGET,
            })
            .and_then(Self::new)
    }
}

impl TryFrom<f64> for RollBudget {
    type Error = OptimizeError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
            return Err(OptimizeError::InvalidBudget {
                value: value.to_string(),
                max: MAX_ROLL_BUDGET,
            });
        }
        Self::new(value as u32)
    }
}

/// Optional per-substat upper bounds on roll counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollCaps {
    pub elemental_mastery: Option<u32>,
    pub attack_percent: Option<u32>,
    pub energy_recharge: Option<u32>,
    pub crit_rate: Option<u32>,
    pub crit_damage: Option<u32>,
}

impl RollCaps {
    /// No caps at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> Option<u32> {
        match stat {
            Stat::ElementalMastery => self.elemental_mastery,
            Stat::AttackPercent => self.attack_percent,
            Stat::EnergyRecharge => self.energy_recharge,
            Stat::CritRate => self.crit_rate,
            Stat::CritDamage => self.crit_damage,
        }
    }

    pub fn with_cap(mut self, stat: Stat, cap: u32) -> Self {
        let slot = match stat {
            Stat::ElementalMastery => &mut self.elemental_mastery,
            Stat::AttackPercent => &mut self.attack_percent,
            Stat::EnergyRecharge => &mut self.energy_recharge,
            Stat::CritRate => &mut self.crit_rate,
            Stat::CritDamage => &mut self.crit_damage,
        };
        *slot = Some(slot.map_or(cap, |old| old.min(cap)));
        self
    }

    /// A substat can never duplicate the artifact's main stat.
    pub fn excluding_main_stat(self, main_stat: Stat) -> Self {
        self.with_cap(main_stat, 0)
    }

    #[inline]
    pub fn allows(&self, stat: Stat, rolls: u32) -> bool {
        self.get(stat).map_or(true, |cap| rolls <= cap)
    }

    /// Upper bound on rolls for a second-level category. The crit pair can hold
    /// at most the sum of its two legs' caps.
    pub fn category_cap(&self, category: StatCategory) -> Option<u32> {
        match category {
            StatCategory::AttackPercent => self.attack_percent,
            StatCategory::EnergyRechargePercent => self.energy_recharge,
            StatCategory::CritPair => match (self.crit_rate, self.crit_damage) {
                (Some(cr), Some(cd)) => Some(cr.saturating_add(cd)),
                _ => None,
            },
        }
    }
}

/// Motion value per second dealt by each talent kind over a rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playstyle {
    pub normal_attack: f64,
    pub charged_attack: f64,
    pub skill: f64,
    pub burst: f64,
}

impl Playstyle {
    /// Single-talent rotations tried when the character has no preferred playstyle.
    pub const PRESETS: [Playstyle; 4] = [
        Playstyle { normal_attack: 1.0, charged_attack: 0.0, skill: 0.0, burst: 0.0 },
        Playstyle { normal_attack: 0.0, charged_attack: 1.0, skill: 0.0, burst: 0.0 },
        Playstyle { normal_attack: 0.0, charged_attack: 0.0, skill: 1.0, burst: 0.0 },
        Playstyle { normal_attack: 0.0, charged_attack: 0.0, skill: 0.0, burst: 1.0 },
    ];
}

/// Damage bonus fractions (0.466 = +46.6%).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageBonus {
    pub general: f64,
    pub normal_attack: f64,
    pub charged_attack: f64,
    pub skill: f64,
    pub burst: f64,
}

/// Talent scaling multipliers. Normal and charged attacks share the attack talent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalentMultipliers {
    pub normal_attack: f64,
    pub skill: f64,
    pub burst: f64,
}

impl Default for TalentMultipliers {
    fn default() -> Self {
        Self {
            normal_attack: 1.0,
            skill: 1.0,
            burst: 1.0,
        }
    }
}

/// Baseline stats of the character before the artifact's substats are applied.
///
/// Read-only input to every damage model; the solver never mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub level: u32,
    pub base_attack: f64,
    /// Fractional ATK bonus (0.466 = +46.6%).
    pub attack_bonus: f64,
    pub elemental_mastery: f64,
    /// Total energy recharge (1.0 = 100%).
    pub energy_recharge: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub particles_per_second: f64,
    /// Energy per second needed to cast the burst on cooldown. Zero means always up.
    pub burst_energy_per_second: f64,
    /// Transformative reaction damage relative to direct damage at baseline.
    pub transformative_share: f64,
    pub damage_bonus: DamageBonus,
    pub talents: TalentMultipliers,
    /// Preferred rotation; `None` lets the model pick the best preset.
    pub playstyle: Option<Playstyle>,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            level: 90,
            base_attack: 800.0,
            attack_bonus: 0.0,
            elemental_mastery: 0.0,
            energy_recharge: 1.0,
            crit_rate: 0.05,
            crit_damage: 0.5,
            particles_per_second: 0.0,
            burst_energy_per_second: 0.0,
            transformative_share: 0.0,
            damage_bonus: DamageBonus::default(),
            talents: TalentMultipliers::default(),
            playstyle: None,
        }
    }
}

impl CharacterStats {
    /// Reject non-finite or negative numeric fields.
    pub fn validate(&self) -> Result<()> {
        let mut fields = vec![
            ("base_attack", self.base_attack),
            ("attack_bonus", self.attack_bonus),
            ("elemental_mastery", self.elemental_mastery),
            ("energy_recharge", self.energy_recharge),
            ("crit_rate", self.crit_rate),
            ("crit_damage", self.crit_damage),
            ("particles_per_second", self.particles_per_second),
            ("burst_energy_per_second", self.burst_energy_per_second),
            ("transformative_share", self.transformative_share),
            ("damage_bonus.general", self.damage_bonus.general),
            ("damage_bonus.normal_attack", self.damage_bonus.normal_attack),
            ("damage_bonus.charged_attack", self.damage_bonus.charged_attack),
            ("damage_bonus.skill", self.damage_bonus.skill),
            ("damage_bonus.burst", self.damage_bonus.burst),
            ("talents.normal_attack", self.talents.normal_attack),
            ("talents.skill", self.talents.skill),
            ("talents.burst", self.talents.burst),
        ];
        if let Some(p) = &self.playstyle {
            fields.extend([
                ("playstyle.normal_attack", p.normal_attack),
                ("playstyle.charged_attack", p.charged_attack),
                ("playstyle.skill", p.skill),
                ("playstyle.burst", p.burst),
            ]);
        }
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizeError::InvalidStats(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Rolls split between the two legs of the crit pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritSplit {
    pub crit_rate: u32,
    pub crit_damage: u32,
}

impl CritSplit {
    #[inline]
    pub fn total(self) -> u32 {
        self.crit_rate + self.crit_damage
    }
}

/// Roll counts for an ordered prefix of [`StatCategory::ORDER`].
///
/// Allocations are plain values: extending one always produces a new vector, so
/// a cell stored in the memo table is never modified through a later result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Allocation {
    rolls: Vec<u32>,
    crit_split: CritSplit,
}

impl Allocation {
    /// All-zero allocation over a prefix of length `categories`.
    pub fn zeros(categories: usize) -> Self {
        Self {
            rolls: vec![0; categories],
            crit_split: CritSplit::default(),
        }
    }

    pub fn rolls(&self) -> &[u32] {
        &self.rolls
    }

    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.rolls.iter().sum()
    }

    pub fn crit_split(&self) -> CritSplit {
        self.crit_split
    }

    /// Rolls given to `category`, zero if it lies outside the prefix.
    pub fn get(&self, category: StatCategory) -> u32 {
        self.rolls.get(category.position()).copied().unwrap_or(0)
    }

    /// Copy of `self` with one more category appended.
    pub fn extended(&self, rolls: u32) -> Self {
        let mut next = self.clone();
        next.rolls.push(rolls);
        next
    }

    pub fn with_crit_split(mut self, split: CritSplit) -> Self {
        self.crit_split = split;
        self
    }
}

/// Second-level memo entry keyed by (rolls, prefix length).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DpCell {
    pub damage: f64,
    pub allocation: Allocation,
}

impl DpCell {
    pub fn baseline(categories: usize) -> Self {
        Self {
            damage: BASELINE_DAMAGE,
            allocation: Allocation::zeros(categories),
        }
    }
}

/// Third-level memo entry keyed by rolls assigned to the crit pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CritSplitCell {
    pub damage: f64,
    pub split: CritSplit,
}

impl CritSplitCell {
    pub fn baseline() -> Self {
        Self {
            damage: BASELINE_DAMAGE,
            split: CritSplit::default(),
        }
    }
}

/// Memo slot. `Pending` is the explicit "not yet computed" marker; it is never
/// confused with a computed value, whatever that value is.
#[derive(Clone, Debug, PartialEq)]
pub enum CellState<T> {
    Pending,
    /// Computed, but no candidate respects the roll caps.
    Infeasible,
    Solved(T),
}

impl<T> CellState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, CellState::Pending)
    }
}

/// Final per-substat roll counts for one artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactAllocation {
    pub elemental_mastery: u32,
    pub attack_percent: u32,
    pub energy_recharge: u32,
    pub crit_rate: u32,
    pub crit_damage: u32,
}

impl ArtifactAllocation {
    /// Combine the EM roll count with a full three-category allocation.
    pub fn from_parts(em_rolls: u32, other: &Allocation) -> Self {
        let split = other.crit_split();
        Self {
            elemental_mastery: em_rolls,
            attack_percent: other.get(StatCategory::AttackPercent),
            energy_recharge: other.get(StatCategory::EnergyRechargePercent),
            crit_rate: split.crit_rate,
            crit_damage: split.crit_damage,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::ElementalMastery => self.elemental_mastery,
            Stat::AttackPercent => self.attack_percent,
            Stat::EnergyRecharge => self.energy_recharge,
            Stat::CritRate => self.crit_rate,
            Stat::CritDamage => self.crit_damage,
        }
    }

    pub fn total(&self) -> u32 {
        Stat::ALL.iter().map(|&s| self.get(s)).sum()
    }

    /// Fail with [`OptimizeError::CapViolation`] on the first stat over its cap.
    pub fn check_caps(&self, caps: &RollCaps) -> Result<()> {
        for stat in Stat::ALL {
            let rolls = self.get(stat);
            if let Some(cap) = caps.get(stat) {
                if rolls > cap {
                    return Err(OptimizeError::CapViolation { stat, rolls, cap });
                }
            }
        }
        Ok(())
    }
}

/// One evaluated first-level candidate: `em_rolls` into EM, the rest elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EmSplit {
    pub em_rolls: u32,
    pub em_damage: f64,
    pub other_damage: f64,
    pub total: f64,
}

/// Result of one optimizer call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Optimum {
    pub damage: f64,
    pub allocation: ArtifactAllocation,
    /// Every feasible EM split the first level evaluated, by ascending EM rolls.
    pub splits: Vec<EmSplit>,
}

impl Optimum {
    /// Zero-roll result: nothing spent, nothing gained.
    pub fn baseline() -> Self {
        Self {
            damage: BASELINE_DAMAGE,
            allocation: ArtifactAllocation::default(),
            splits: Vec::new(),
        }
    }
}
