//! Progress and summary calculations
//!
//! `progress` maps an allocation and a target to a completion ratio.
//! A target of zero or less has no meaningful ratio, so it yields
//! [`DEGENERATE_TARGET_PROGRESS`] (0.0) instead of NaN or infinity.
//! Ratios are not clamped; an over-funded goal reports more than 1.0.

use crate::models::{Goal, Money};

/// Progress reported when the target is zero or negative
pub const DEGENERATE_TARGET_PROGRESS: f64 = 0.0;

/// Completion ratio `allocated / target`
///
/// # Examples
/// ```
/// use budget_goals::models::Money;
/// use budget_goals::services::progress::progress;
///
/// assert_eq!(progress(Money::from_dollars(150), Money::from_dollars(100)), 1.5);
/// assert_eq!(progress(Money::from_dollars(50), Money::zero()), 0.0);
/// ```
pub fn progress(allocated: Money, target: Money) -> f64 {
    if !target.is_positive() {
        return DEGENERATE_TARGET_PROGRESS;
    }
    allocated.cents() as f64 / target.cents() as f64
}

/// Completion ratio for a goal
pub fn goal_progress(goal: &Goal) -> f64 {
    progress(goal.allocated, goal.target)
}

/// Whether the allocation has reached a positive target
pub fn is_complete(goal: &Goal) -> bool {
    goal.target.is_positive() && goal.allocated >= goal.target
}

/// Totals across all goals, shown in the budget header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BudgetSummary {
    pub goal_count: usize,
    pub completed_count: usize,
    /// Sum of every allocation ("total saved")
    pub total_allocated: Money,
    pub total_target: Money,
    /// Sum of each goal's shortfall; over-funding one goal does not offset another
    pub total_remaining: Money,
}

impl BudgetSummary {
    pub fn from_goals(goals: &[Goal]) -> Self {
        goals.iter().fold(Self::default(), |mut acc, goal| {
            acc.goal_count += 1;
            if is_complete(goal) {
                acc.completed_count += 1;
            }
            acc.total_allocated += goal.allocated;
            acc.total_target += goal.target;
            acc.total_remaining += goal.remaining();
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalCategory, NewGoal};

    fn dollars(d: i64) -> Money {
        Money::from_dollars(d)
    }

    fn goal(allocated: i64, target: i64) -> Goal {
        Goal::new(
            NewGoal::new("G", dollars(target), GoalCategory::Goal).with_allocated(dollars(allocated)),
        )
    }

    #[test]
    fn test_progress_basic() {
        assert_eq!(progress(Money::zero(), dollars(100)), 0.0);
        assert_eq!(progress(dollars(50), dollars(100)), 0.5);
        assert_eq!(progress(dollars(100), dollars(100)), 1.0);
    }

    #[test]
    fn test_progress_is_not_clamped() {
        assert_eq!(progress(dollars(150), dollars(100)), 1.5);
    }

    #[test]
    fn test_progress_degenerate_target() {
        let zero = progress(dollars(50), Money::zero());
        assert_eq!(zero, DEGENERATE_TARGET_PROGRESS);
        assert!(zero.is_finite());

        let negative = progress(dollars(50), dollars(-10));
        assert_eq!(negative, DEGENERATE_TARGET_PROGRESS);
        assert!(!negative.is_nan());

        assert_eq!(progress(Money::zero(), Money::zero()), DEGENERATE_TARGET_PROGRESS);
    }

    #[test]
    fn test_goal_progress_and_completion() {
        assert_eq!(goal_progress(&goal(300, 500)), 0.6);
        assert!(!is_complete(&goal(300, 500)));
        assert!(is_complete(&goal(500, 500)));
        assert!(is_complete(&goal(700, 500)));
        assert!(!is_complete(&goal(10, 0)));
    }

    #[test]
    fn test_summary() {
        let goals = vec![goal(300, 500), goal(100, 500), goal(250, 200)];
        let summary = BudgetSummary::from_goals(&goals);

        assert_eq!(summary.goal_count, 3);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.total_allocated, dollars(650));
        assert_eq!(summary.total_target, dollars(1_200));
        // 200 + 400 + 0: the over-funded goal does not reduce the others' shortfall
        assert_eq!(summary.total_remaining, dollars(600));
    }

    #[test]
    fn test_empty_summary() {
        let summary = BudgetSummary::from_goals(&[]);
        assert_eq!(summary, BudgetSummary::default());
        assert_eq!(summary.total_remaining, Money::zero());
    }
}
