//! Per-call invocation context owning both memo tables.
//!
//! One [`OptimizerContext`] backs exactly one optimizer call. It is created
//! empty, filled monotonically while the three levels recurse, and dropped when
//! the call returns, so no entry can leak into a call with different stats or
//! budget.
//!
//! Table layout:
//! - crit table: `budget + 1` slots, keyed by rolls given to the crit pair
//! - category table: `(budget + 1) × 4` slots, keyed by
//!   [`category_cell_index`]`(rolls, prefix_len)`

use crate::constants::*;
use crate::damage_model::DamageModel;
use crate::error::{OptimizeError, Result};
use crate::types::{CellState, CharacterStats, CritSplitCell, DpCell, RollBudget, RollCaps};

pub struct OptimizerContext<'a, M: DamageModel + ?Sized> {
    pub stats: &'a CharacterStats,
    pub model: &'a M,
    pub caps: RollCaps,
    budget: RollBudget,
    crit_table: Vec<CellState<CritSplitCell>>,
    category_table: Vec<CellState<DpCell>>,
}

impl<'a, M: DamageModel + ?Sized> OptimizerContext<'a, M> {
    pub fn new(
        stats: &'a CharacterStats,
        model: &'a M,
        caps: RollCaps,
        budget: RollBudget,
    ) -> Self {
        Self {
            stats,
            model,
            caps,
            budget,
            crit_table: vec![CellState::Pending; budget.get() as usize + 1],
            category_table: vec![CellState::Pending; category_table_len(budget.get())],
        }
    }

    #[inline]
    pub fn budget(&self) -> u32 {
        self.budget.get()
    }

    /// Raw crit slot, `None` when `rolls` exceeds the budget.
    pub fn crit_state(&self, rolls: u32) -> Option<&CellState<CritSplitCell>> {
        self.crit_table.get(rolls as usize)
    }

    /// Computed crit split for `rolls`; `Ok(None)` means no split respects the caps.
    ///
    /// Reading a slot that was never filled is an invariant violation, not a
    /// default value.
    pub fn crit_cell(&self, rolls: u32) -> Result<Option<CritSplitCell>> {
        match self.crit_state(rolls) {
            Some(CellState::Solved(cell)) => Ok(Some(*cell)),
            Some(CellState::Infeasible) => Ok(None),
            Some(CellState::Pending) | None => Err(OptimizeError::UnreachableCritState { rolls }),
        }
    }

    pub fn store_crit(&mut self, rolls: u32, state: CellState<CritSplitCell>) {
        self.crit_table[rolls as usize] = state;
    }

    /// Raw category slot, `None` when the key lies outside the table.
    pub fn category_state(&self, rolls: u32, categories: usize) -> Option<&CellState<DpCell>> {
        if categories > CATEGORY_COUNT {
            return None;
        }
        self.category_table
            .get(category_cell_index(rolls as usize, categories))
    }

    /// Computed second-level cell; `Ok(None)` means no allocation respects the caps.
    pub fn category_cell(&self, rolls: u32, categories: usize) -> Result<Option<&DpCell>> {
        match self.category_state(rolls, categories) {
            Some(CellState::Solved(cell)) => Ok(Some(cell)),
            Some(CellState::Infeasible) => Ok(None),
            Some(CellState::Pending) | None => {
                Err(OptimizeError::UnreachableState { rolls, categories })
            }
        }
    }

    pub fn store_category(&mut self, rolls: u32, categories: usize, state: CellState<DpCell>) {
        let idx = category_cell_index(rolls as usize, categories);
        self.category_table[idx] = state;
    }

    /// Number of category cells computed so far (solved or infeasible).
    pub fn computed_category_cells(&self) -> usize {
        self.category_table.iter().filter(|c| !c.is_pending()).count()
    }
}
