//! Error types for the roll optimizer.
//!
//! - Input errors: the caller handed us something we refuse to search over.
//! - Feasibility errors: the inputs are valid but admit no useful allocation.
//! - Invariant errors: a memo table was read before it was written (a bug).

use thiserror::Error;

use crate::types::Stat;

#[derive(Debug, Error)]
pub enum OptimizeError {
    // ── Input ───────────────────────────────────────────────────────────
    #[error("invalid roll budget {value}: expected a whole number between 0 and {max}")]
    InvalidBudget { value: String, max: u32 },

    #[error("invalid character stats: {0}")]
    InvalidStats(String),

    // ── Feasibility ─────────────────────────────────────────────────────
    #[error("roll caps leave no way to spend {budget} rolls")]
    InfeasibleCaps { budget: u32 },

    #[error("no beneficial allocation found (best candidate {best:.4} does not beat baseline)")]
    NoBeneficialAllocation { best: f64 },

    #[error("{stat} received {rolls} rolls but is capped at {cap}")]
    CapViolation { stat: Stat, rolls: u32, cap: u32 },

    // ── Invariants ──────────────────────────────────────────────────────
    #[error("category table read before being computed: rolls={rolls} categories={categories}")]
    UnreachableState { rolls: u32, categories: usize },

    #[error("crit split table read before being computed: rolls={rolls}")]
    UnreachableCritState { rolls: u32 },

    // ── Request loading ─────────────────────────────────────────────────
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl OptimizeError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True when the error was caused by the request rather than by a broken invariant.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBudget { .. }
                | Self::InvalidStats(_)
                | Self::InfeasibleCaps { .. }
                | Self::NoBeneficialAllocation { .. }
                | Self::Parse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
