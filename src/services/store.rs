//! Goal store
//!
//! Sole owner of the goal collection. Every change to membership or amounts
//! goes through one of the commands here, which enforce the invariants
//! (non-negative allocation, non-empty titles, stable ids) and notify
//! observers after each successful mutation.

use std::fmt;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{GoalError, GoalResult};
use crate::models::goal::validate_title;
use crate::models::{Goal, GoalCategory, GoalEdit, GoalId, Money, NewGoal};

use super::events::{diff_goals, ChangeEvent, Operation, SubscriptionId};

type Observer = Box<dyn FnMut(&ChangeEvent)>;

/// In-memory collection of goals, kept in insertion order
#[derive(Default)]
pub struct GoalStore {
    goals: Vec<Goal>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for GoalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoalStore")
            .field("goals", &self.goals)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl GoalStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with the given goals, in order
    ///
    /// Seeding does not notify anyone; there are no observers yet.
    pub fn with_goals(seed: impl IntoIterator<Item = NewGoal>) -> GoalResult<Self> {
        let mut store = Self::new();
        for fields in seed {
            let goal = Goal::new(fields);
            goal.validate()
                .map_err(|e| GoalError::InvalidInput(e.to_string()))?;
            store.goals.push(goal);
        }
        Ok(store)
    }

    /// A store seeded with the three sample goals the app starts with
    pub fn demo() -> Self {
        let goals = demo_goals().into_iter().map(Goal::new).collect();
        Self {
            goals,
            ..Self::default()
        }
    }

    // === Queries ===

    /// Read-only copy of every goal, in insertion order
    pub fn snapshot(&self) -> Vec<Goal> {
        self.goals.clone()
    }

    /// Borrow the goals in insertion order
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Get a goal by ID
    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Find a goal by full UUID, short display ID, or title (case-insensitive)
    ///
    /// IDs are tried before titles, so a title that looks like an ID never
    /// shadows the goal it names. When several goals share a title the
    /// oldest one wins.
    pub fn find(&self, identifier: &str) -> Option<&Goal> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        if let Some(goal) = identifier
            .parse::<GoalId>()
            .ok()
            .and_then(|id| self.get(id))
        {
            return Some(goal);
        }

        let short = identifier.to_ascii_lowercase();
        if let Some(goal) = self.goals.iter().find(|g| {
            let display = g.id.short();
            display == short || display.strip_prefix("goal-") == Some(short.as_str())
        }) {
            return Some(goal);
        }

        self.goals
            .iter()
            .find(|g| g.title.eq_ignore_ascii_case(identifier))
    }

    // === Commands ===

    /// Add a new goal and return its freshly assigned ID
    pub fn add_goal(&mut self, fields: NewGoal) -> GoalResult<GoalId> {
        let goal = Goal::new(fields);
        if let Err(e) = goal.validate() {
            debug!(error = %e, "Rejected new goal");
            return Err(GoalError::InvalidInput(e.to_string()));
        }

        let id = goal.id;
        info!(goal_id = %id, title = %goal.title, category = %goal.category, "Added goal");
        let event = ChangeEvent::new(Operation::Create, &goal, None);
        self.goals.push(goal);
        self.notify(&event);

        Ok(id)
    }

    /// Add `amount` to a goal's allocation
    ///
    /// There is no upper bound; funding past the target is allowed.
    pub fn fund(&mut self, id: GoalId, amount: Money) -> GoalResult<Goal> {
        require_non_negative(amount, "Fund amount")?;

        self.mutate(id, Operation::Fund, |goal| {
            goal.allocated += amount;
            Ok(())
        })
    }

    /// Remove `amount` from a goal's allocation, clamping at zero
    pub fn defund(&mut self, id: GoalId, amount: Money) -> GoalResult<Goal> {
        require_non_negative(amount, "Defund amount")?;

        self.mutate(id, Operation::Defund, |goal| {
            goal.allocated = goal.allocated.saturating_sub_to_zero(amount);
            Ok(())
        })
    }

    /// Change a goal's title
    pub fn rename_goal(&mut self, id: GoalId, new_title: &str) -> GoalResult<Goal> {
        validate_title(new_title).map_err(|e| GoalError::InvalidInput(e.to_string()))?;

        self.mutate(id, Operation::Rename, |goal| {
            goal.title = new_title.trim().to_string();
            Ok(())
        })
    }

    /// Move a goal to a different category
    pub fn recategorize(&mut self, id: GoalId, new_category: GoalCategory) -> GoalResult<Goal> {
        self.mutate(id, Operation::Recategorize, |goal| {
            goal.category = new_category;
            Ok(())
        })
    }

    /// Replace every editable field of a goal in one step
    ///
    /// This is the rename, recategorize, and allocation/target reset an edit
    /// session commits on save. All fields are validated before any is
    /// applied, and observers see a single event.
    pub fn apply_edit(&mut self, id: GoalId, edit: GoalEdit) -> GoalResult<Goal> {
        validate_title(&edit.title).map_err(|e| GoalError::InvalidInput(e.to_string()))?;
        require_non_negative(edit.allocated, "Allocated amount")?;

        self.mutate(id, Operation::Edit, |goal| {
            goal.title = edit.title.trim().to_string();
            goal.allocated = edit.allocated;
            goal.target = edit.target;
            goal.target_date = edit.target_date.trim().to_string();
            goal.category = edit.category;
            Ok(())
        })
    }

    /// Remove a goal permanently
    ///
    /// Unknown IDs return `NotFound`; the collection is left unchanged.
    pub fn delete_goal(&mut self, id: GoalId) -> GoalResult<Goal> {
        let index = self.index_of(id)?;
        let goal = self.goals.remove(index);

        info!(goal_id = %id, title = %goal.title, "Deleted goal");
        let event = ChangeEvent::new(Operation::Delete, &goal, None);
        self.notify(&event);

        Ok(goal)
    }

    // === Observers ===

    /// Register an observer called after every successful mutation
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    // === Internals ===

    fn index_of(&self, id: GoalId) -> GoalResult<usize> {
        self.goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| {
                debug!(goal_id = %id, "Command targeted a missing goal");
                GoalError::goal_not_found(id.to_string())
            })
    }

    /// Apply `change` to a copy of the goal, commit it if it succeeds, and notify
    fn mutate<F>(&mut self, id: GoalId, operation: Operation, change: F) -> GoalResult<Goal>
    where
        F: FnOnce(&mut Goal) -> GoalResult<()>,
    {
        let index = self.index_of(id)?;
        let before = self.goals[index].clone();

        let mut after = before.clone();
        change(&mut after)?;
        after.updated_at = Utc::now();

        debug_assert!(!after.allocated.is_negative());
        self.goals[index] = after.clone();

        let summary = diff_goals(&before, &after);
        info!(
            goal_id = %id,
            operation = %operation,
            changes = summary.as_deref().unwrap_or("none"),
            "Updated goal"
        );
        let event = ChangeEvent::new(operation, &after, summary);
        self.notify(&event);

        Ok(after)
    }

    fn notify(&mut self, event: &ChangeEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

fn require_non_negative(amount: Money, what: &str) -> GoalResult<()> {
    if amount.is_negative() {
        debug!(amount = %amount, "Rejected negative amount");
        return Err(GoalError::InvalidInput(format!(
            "{} cannot be negative: {}",
            what, amount
        )));
    }
    Ok(())
}

/// The sample goals a fresh session starts with
pub fn demo_goals() -> Vec<NewGoal> {
    vec![
        NewGoal::new("Car", Money::from_dollars(500), GoalCategory::Goal)
            .with_allocated(Money::from_dollars(300))
            .with_target_date("Dec 2024"),
        NewGoal::new("Laptop", Money::from_dollars(500), GoalCategory::Want)
            .with_allocated(Money::from_dollars(100))
            .with_target_date("Jun 2025"),
        NewGoal::new("Emergency", Money::from_dollars(200), GoalCategory::EmergencyFund)
            .with_allocated(Money::from_dollars(150))
            .with_target_date("Ongoing"),
    ]
}
