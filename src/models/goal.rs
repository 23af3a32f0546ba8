//! Savings goal model
//!
//! A goal is one budget line item: money set aside toward a target amount,
//! labelled with a free-text date and one of three categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::ids::GoalId;
use super::money::Money;

/// The closed set of goal categories
///
/// Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    Goal,
    Want,
    EmergencyFund,
}

impl GoalCategory {
    /// All categories in display order
    pub fn all() -> &'static [Self] {
        &[Self::Goal, Self::Want, Self::EmergencyFund]
    }

    /// Sort rank: Goal=1, Want=2, EmergencyFund=3
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Goal => 1,
            Self::Want => 2,
            Self::EmergencyFund => 3,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Goal => "Goal",
            Self::Want => "Want",
            Self::EmergencyFund => "Emergency Fund",
        }
    }

    /// The next category, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// The previous category, wrapping around
    pub fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error for a category string outside the enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown goal category '{0}' (expected goal, want, or emergency-fund)")]
pub struct UnknownCategory(pub String);

impl FromStr for GoalCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "goal" => Ok(Self::Goal),
            "want" => Ok(Self::Want),
            "emergencyfund" | "emergency" => Ok(Self::EmergencyFund),
            _ => Err(UnknownCategory(s.trim().to_string())),
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Display title
    pub title: String,

    /// Amount currently set aside; never negative
    pub allocated: Money,

    /// Amount needed to consider the goal complete
    pub target: Money,

    /// Free-form label such as "Dec 2024"
    #[serde(default)]
    pub target_date: String,

    pub category: GoalCategory,

    /// When the goal was created
    pub created_at: DateTime<Utc>,

    /// When the goal was last modified
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Build a goal with a fresh id from caller-supplied fields
    ///
    /// The title is trimmed. Call [`Goal::validate`] before storing it.
    pub fn new(fields: NewGoal) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            title: fields.title.trim().to_string(),
            allocated: fields.allocated,
            target: fields.target,
            target_date: fields.target_date.trim().to_string(),
            category: fields.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Remaining amount to reach the target, floored at zero
    pub fn remaining(&self) -> Money {
        self.target.saturating_sub_to_zero(self.allocated)
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        validate_title(&self.title)?;

        if self.allocated.is_negative() {
            return Err(GoalValidationError::NegativeAllocation);
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Caller-supplied fields for a new goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub allocated: Money,
    pub target: Money,
    pub target_date: String,
    pub category: GoalCategory,
}

impl NewGoal {
    /// Start a new goal with nothing allocated
    pub fn new(title: impl Into<String>, target: Money, category: GoalCategory) -> Self {
        Self {
            title: title.into(),
            allocated: Money::zero(),
            target,
            target_date: String::new(),
            category,
        }
    }

    pub fn with_allocated(mut self, allocated: Money) -> Self {
        self.allocated = allocated;
        self
    }

    pub fn with_target_date(mut self, target_date: impl Into<String>) -> Self {
        self.target_date = target_date.into();
        self
    }
}

/// A full replacement of a goal's editable fields, applied atomically
pub type GoalEdit = NewGoal;

/// A title is valid when it has any non-whitespace text
pub fn validate_title(title: &str) -> Result<(), GoalValidationError> {
    if title.trim().is_empty() {
        return Err(GoalValidationError::EmptyTitle);
    }
    Ok(())
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalValidationError {
    #[error("Goal title cannot be empty")]
    EmptyTitle,

    #[error("Allocated amount cannot be negative")]
    NegativeAllocation,
}
