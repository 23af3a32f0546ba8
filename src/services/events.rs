//! Change notifications emitted by the goal store
//!
//! Every successful mutation produces one `ChangeEvent`, delivered
//! synchronously to each subscribed observer before the command returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Goal, GoalId};

/// Types of mutation that produce a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Fund,
    Defund,
    Rename,
    Recategorize,
    Edit,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Fund => write!(f, "FUND"),
            Operation::Defund => write!(f, "DEFUND"),
            Operation::Rename => write!(f, "RENAME"),
            Operation::Recategorize => write!(f, "RECATEGORIZE"),
            Operation::Edit => write!(f, "EDIT"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single change to the goal collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// When the change was applied (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// ID of the affected goal
    pub goal_id: GoalId,

    /// Title of the goal after the change (before it, for deletes)
    pub goal_title: String,

    /// Human-readable summary, e.g. "allocated: $300.00 -> $400.00"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ChangeEvent {
    pub fn new(operation: Operation, goal: &Goal, summary: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            summary,
        }
    }

    /// One-line description for logs and status bars
    pub fn describe(&self) -> String {
        match &self.summary {
            Some(summary) => format!("{} {} ({})", self.operation, self.goal_title, summary),
            None => format!("{} {}", self.operation, self.goal_title),
        }
    }
}

/// Handle returned by `GoalStore::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Describe the differences between two versions of a goal
///
/// Returns `None` when nothing visible changed.
pub fn diff_goals(before: &Goal, after: &Goal) -> Option<String> {
    let mut changes = Vec::new();

    if before.title != after.title {
        changes.push(format!("title: {} -> {}", before.title, after.title));
    }
    if before.category != after.category {
        changes.push(format!("category: {} -> {}", before.category, after.category));
    }
    if before.allocated != after.allocated {
        changes.push(format!("allocated: {} -> {}", before.allocated, after.allocated));
    }
    if before.target != after.target {
        changes.push(format!("target: {} -> {}", before.target, after.target));
    }
    if before.target_date != after.target_date {
        changes.push(format!(
            "target date: {:?} -> {:?}",
            before.target_date, after.target_date
        ));
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
