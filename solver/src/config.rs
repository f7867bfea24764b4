//! Request files: everything one optimizer call needs, as JSON.
//!
//! ```json
//! {
//!   "stats": { "attack_bonus": 0.466, "crit_rate": 0.3, "crit_damage": 1.1 },
//!   "roll_budget": 5,
//!   "roll_caps": { "crit_rate": 2 },
//!   "main_stat": "attack_percent",
//!   "model": "stat_scaling"
//! }
//! ```
//!
//! `roll_budget` is read as a plain JSON number and validated into a
//! [`RollBudget`], so negative or fractional budgets surface as
//! [`crate::error::OptimizeError::InvalidBudget`] rather than as parse errors.

use std::path::Path;

use serde::Deserialize;

use crate::constants::DEFAULT_ROLL_BUDGET;
use crate::damage_model::ModelKind;
use crate::error::{OptimizeError, Result};
use crate::types::{CharacterStats, RollBudget, RollCaps, Stat};

#[derive(Clone, Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub stats: CharacterStats,
    #[serde(default = "default_budget")]
    pub roll_budget: f64,
    #[serde(default)]
    pub roll_caps: RollCaps,
    #[serde(default)]
    pub main_stat: Option<Stat>,
    #[serde(default)]
    pub model: ModelKind,
}

fn default_budget() -> f64 {
    DEFAULT_ROLL_BUDGET as f64
}

impl Default for OptimizeRequest {
    fn default() -> Self {
        Self {
            stats: CharacterStats::default(),
            roll_budget: default_budget(),
            roll_caps: RollCaps::none(),
            main_stat: None,
            model: ModelKind::default(),
        }
    }
}

impl OptimizeRequest {
    pub fn budget(&self) -> Result<RollBudget> {
        RollBudget::try_from(self.roll_budget)
    }

    /// Caps with the main stat excluded from substat rolls.
    pub fn effective_caps(&self) -> RollCaps {
        match self.main_stat {
            Some(stat) => self.roll_caps.excluding_main_stat(stat),
            None => self.roll_caps,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read and parse a request file.
pub fn load_request(path: impl AsRef<Path>) -> Result<OptimizeRequest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| OptimizeError::io(format!("reading {}", path.display()), e))?;
    OptimizeRequest::from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = OptimizeRequest::from_json("{}").unwrap();
        assert_eq!(req.budget().unwrap().get(), DEFAULT_ROLL_BUDGET);
        assert_eq!(req.model, ModelKind::StatScaling);
        assert_eq!(req.effective_caps(), RollCaps::none());
        assert_eq!(req.stats, CharacterStats::default());
    }

    #[test]
    fn test_full_request() {
        let req = OptimizeRequest::from_json(
            r#"{
                "stats": {"crit_rate": 0.3, "damage_bonus": {"burst": 0.2}},
                "roll_budget": 9,
                "roll_caps": {"crit_rate": 2},
                "main_stat": "crit_damage",
                "model": "placeholder"
            }"#,
        )
        .unwrap();
        assert_eq!(req.budget().unwrap().get(), 9);
        assert_eq!(req.stats.crit_rate, 0.3);
        assert_eq!(req.stats.damage_bonus.burst, 0.2);
        assert_eq!(req.model, ModelKind::Placeholder);
        let caps = req.effective_caps();
        assert_eq!(caps.get(Stat::CritRate), Some(2));
        assert_eq!(caps.get(Stat::CritDamage), Some(0));
    }

    #[test]
    fn test_bad_budgets() {
        for raw in ["-1", "2.5", "26"] {
            let req = OptimizeRequest::from_json(&format!(r#"{{"roll_budget": {raw}}}"#)).unwrap();
            assert!(
                matches!(req.budget(), Err(OptimizeError::InvalidBudget { .. })),
                "budget {raw} accepted"
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_request("/nonexistent/request.json").unwrap_err();
        assert!(matches!(err, OptimizeError::Io { .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            OptimizeRequest::from_json("{ not json"),
            Err(OptimizeError::Parse(_))
        ));
    }
}
