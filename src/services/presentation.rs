//! Row view-models for the rendering layer
//!
//! Each row carries the display fields for one goal, its progress ratio, and
//! a `RowActions` bundle bound to the goal's ID. Actions stay correct after
//! other rows are deleted or the list is re-sorted.

use crate::error::GoalResult;
use crate::models::{Goal, GoalCategory, GoalId, Money};

use super::ordering::order_by_category;
use super::progress::{goal_progress, is_complete};
use super::session::GoalEditSession;
use super::store::GoalStore;

/// Commands bound to one goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    id: GoalId,
    step: Money,
}

impl RowActions {
    pub fn new(id: GoalId, step: Money) -> Self {
        Self { id, step }
    }

    /// The goal these actions are bound to
    pub fn goal_id(&self) -> GoalId {
        self.id
    }

    /// Amount moved by a single `fund` or `defund`
    pub fn step(&self) -> Money {
        self.step
    }

    /// Add one step to the goal
    pub fn fund(&self, store: &mut GoalStore) -> GoalResult<Goal> {
        store.fund(self.id, self.step)
    }

    /// Remove one step from the goal (clamped at zero)
    pub fn defund(&self, store: &mut GoalStore) -> GoalResult<Goal> {
        store.defund(self.id, self.step)
    }

    pub fn fund_by(&self, store: &mut GoalStore, amount: Money) -> GoalResult<Goal> {
        store.fund(self.id, amount)
    }

    pub fn defund_by(&self, store: &mut GoalStore, amount: Money) -> GoalResult<Goal> {
        store.defund(self.id, amount)
    }

    pub fn delete(&self, store: &mut GoalStore) -> GoalResult<Goal> {
        store.delete_goal(self.id)
    }

    /// Open the edit form for this goal
    pub fn open_edit(&self, session: &mut GoalEditSession, store: &GoalStore) -> GoalResult<()> {
        session.open_edit(store, self.id)
    }
}

/// Everything the rendering layer needs to draw one goal
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRow {
    pub id: GoalId,
    pub title: String,
    pub category: GoalCategory,
    pub allocated: Money,
    pub target: Money,
    pub target_date: String,
    /// Unclamped completion ratio
    pub progress: f64,
    pub complete: bool,
    pub actions: RowActions,
}

impl GoalRow {
    pub fn from_goal(goal: &Goal, step: Money) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            category: goal.category,
            allocated: goal.allocated,
            target: goal.target,
            target_date: goal.target_date.clone(),
            progress: goal_progress(goal),
            complete: is_complete(goal),
            actions: RowActions::new(goal.id, step),
        }
    }
}

/// Build display rows for the store's current contents, in category order
pub fn build_rows(store: &GoalStore, step: Money) -> Vec<GoalRow> {
    order_by_category(store.goals())
        .iter()
        .map(|goal| GoalRow::from_goal(goal, step))
        .collect()
}
