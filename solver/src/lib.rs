//! # Artifact Optimizer: damage-optimal substat roll allocation
//!
//! Given a character's baseline stats and a budget of substat rolls, finds the
//! split of those rolls across Elemental Mastery, ATK%, Energy Recharge%, Crit
//! Rate and Crit DMG that maximizes modeled damage.
//!
//! ## Algorithm overview
//!
//! The damage objective is not separable (crit rate and crit damage multiply,
//! EM adds), so the search is decomposed into three nested levels:
//!
//! | Level | Rust module | Description |
//! |-------|-------------|-------------|
//! | 3 | [`crit_split`] | Best CR/CD split for each `n ∈ 0..=budget` rolls given to the crit pair, brute force |
//! | 2 | [`category_solver`] | Memoized recursion over `(rolls, prefix length)` for ATK% → ER% → crit pair, product of factors |
//! | 1 | [`allocator`] | EM rolls `i` vs. the rest: `em(i) + best(total − i, 3)` |
//!
//! Level 3 fills a `budget + 1` table up front; level 2 fills a
//! `(budget + 1) × 4` table lazily; level 1 scans `budget` candidates. Each
//! table cell costs O(budget), giving O(budget²) overall.
//!
//! ## State ownership
//!
//! Both tables belong to an [`context::OptimizerContext`] created per call and
//! dropped on return. Unfilled slots are an explicit `Pending` marker, and
//! reading one is an error rather than a default value.
//!
//! ## Damage models
//!
//! Per-category marginal functions live behind the [`damage_model::DamageModel`]
//! trait. [`damage_model::StatScalingModel`] derives them from
//! [`types::CharacterStats`]; [`damage_model::PlaceholderModel`] keeps the linear
//! draft formulas for hand-checkable tests.

pub mod allocator;
pub mod category_solver;
pub mod config;
pub mod constants;
pub mod context;
pub mod crit_split;
pub mod damage_model;
pub mod env_config;
pub mod error;
pub mod server;
pub mod sweep;
pub mod types;

pub use allocator::{optimize, optimize_default};
pub use error::{OptimizeError, Result};
