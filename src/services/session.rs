//! Goal edit session
//!
//! Holds the add/edit form for a single goal. Field edits stay in a local
//! draft until `save` commits them to the store; `cancel` throws them away.
//!
//! ```text
//! Closed --open_create--> Open(Create) --save--> Closed   (add_goal)
//! Closed --open_edit----> Open(Edit)   --save--> Closed   (apply_edit)
//! Open(_) --cancel--> Closed                               (no store change)
//! Open(_) --save with invalid draft--> Open(_)             (InvalidInput)
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{GoalError, GoalResult};
use crate::models::goal::validate_title;
use crate::models::{Goal, GoalCategory, GoalId, Money, NewGoal};

use super::store::GoalStore;

/// What saving the session will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit(GoalId),
}

/// Externally visible session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Open(SessionMode),
}

/// Editable draft fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Allocated,
    Target,
    TargetDate,
    Category,
}

impl DraftField {
    pub fn all() -> &'static [Self] {
        &[
            Self::Title,
            Self::Allocated,
            Self::Target,
            Self::TargetDate,
            Self::Category,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Allocated => "allocated",
            Self::Target => "target",
            Self::TargetDate => "date",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DraftField {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" | "name" => Ok(Self::Title),
            "allocated" | "saved" => Ok(Self::Allocated),
            "target" => Ok(Self::Target),
            "date" | "target-date" | "target_date" => Ok(Self::TargetDate),
            "category" | "type" => Ok(Self::Category),
            other => {
                let expected: Vec<&str> = Self::all().iter().map(|f| f.label()).collect();
                Err(GoalError::InvalidInput(format!(
                    "Unknown field '{}' (expected one of: {})",
                    other,
                    expected.join(", ")
                )))
            }
        }
    }
}

/// Draft copy of a goal's fields; amounts are kept as typed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub allocated_input: String,
    pub target_input: String,
    pub target_date: String,
    pub category: GoalCategory,
}

impl GoalDraft {
    fn blank() -> Self {
        Self {
            title: String::new(),
            allocated_input: "0".to_string(),
            target_input: String::new(),
            target_date: String::new(),
            category: GoalCategory::Goal,
        }
    }

    fn from_goal(goal: &Goal) -> Self {
        Self {
            title: goal.title.clone(),
            allocated_input: amount_input(goal.allocated),
            target_input: amount_input(goal.target),
            target_date: goal.target_date.clone(),
            category: goal.category,
        }
    }

    /// Parse and check every field, producing the values to commit
    pub fn validate(&self) -> GoalResult<NewGoal> {
        validate_title(&self.title).map_err(|e| GoalError::InvalidInput(e.to_string()))?;

        let allocated = if self.allocated_input.trim().is_empty() {
            Money::zero()
        } else {
            parse_amount(&self.allocated_input, "Allocated amount")?
        };
        if self.target_input.trim().is_empty() {
            return Err(GoalError::invalid("Target amount is required"));
        }
        let target = parse_amount(&self.target_input, "Target amount")?;

        Ok(NewGoal::new(self.title.trim(), target, self.category)
            .with_allocated(allocated)
            .with_target_date(self.target_date.trim()))
    }
}

fn amount_input(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.dollars().abs(), amount.cents_part())
}

fn parse_amount(input: &str, what: &str) -> GoalResult<Money> {
    let amount = Money::parse(input)
        .map_err(|e| GoalError::InvalidInput(format!("{}: {}", what, e)))?;
    if amount.is_negative() {
        return Err(GoalError::InvalidInput(format!(
            "{} cannot be negative: {}",
            what, amount
        )));
    }
    Ok(amount)
}

#[derive(Debug, Clone)]
struct OpenSession {
    mode: SessionMode,
    draft: GoalDraft,
    original: GoalDraft,
    error_message: Option<String>,
}

/// The add/edit form state machine
#[derive(Debug, Clone, Default)]
pub struct GoalEditSession {
    open: Option<OpenSession>,
}

impl GoalEditSession {
    /// Create a closed session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match &self.open {
            Some(open) => SessionState::Open(open.mode),
            None => SessionState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn mode(&self) -> Option<SessionMode> {
        self.open.as_ref().map(|o| o.mode)
    }

    pub fn draft(&self) -> Option<&GoalDraft> {
        self.open.as_ref().map(|o| &o.draft)
    }

    /// Message from the last rejected save, cleared by the next edit
    pub fn error_message(&self) -> Option<&str> {
        self.open.as_ref().and_then(|o| o.error_message.as_deref())
    }

    /// Form heading: "Add New Goal" or "Edit <original title>"
    pub fn heading(&self) -> Option<String> {
        self.open.as_ref().map(|o| match o.mode {
            SessionMode::Create => "Add New Goal".to_string(),
            SessionMode::Edit(_) => format!("Edit {}", o.original.title),
        })
    }

    /// Whether the draft differs from the values the session opened with
    pub fn is_dirty(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.draft != o.original)
    }

    /// Whether `save` would pass validation right now
    pub fn is_valid(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.draft.validate().is_ok())
    }

    // === Transitions ===

    /// Open a blank form for a new goal
    pub fn open_create(&mut self) {
        self.discard_open_draft();
        let draft = GoalDraft::blank();
        self.open = Some(OpenSession {
            mode: SessionMode::Create,
            original: draft.clone(),
            draft,
            error_message: None,
        });
    }

    /// Open a form pre-filled with an existing goal
    pub fn open_edit(&mut self, store: &GoalStore, id: GoalId) -> GoalResult<()> {
        let goal = store
            .get(id)
            .ok_or_else(|| GoalError::goal_not_found(id.to_string()))?;

        self.discard_open_draft();
        let draft = GoalDraft::from_goal(goal);
        self.open = Some(OpenSession {
            mode: SessionMode::Edit(id),
            original: draft.clone(),
            draft,
            error_message: None,
        });
        Ok(())
    }

    /// Commit the draft to the store and close the session
    ///
    /// An invalid draft is rejected with `InvalidInput` and the session stays
    /// open with its error message set. If the goal being edited has been
    /// deleted, `NotFound` is returned and the session also stays open.
    pub fn save(&mut self, store: &mut GoalStore) -> GoalResult<GoalId> {
        let open = self.open_mut()?;

        let fields = match open.draft.validate() {
            Ok(fields) => fields,
            Err(e) => {
                debug!(error = %e, "Rejected goal draft");
                open.error_message = Some(e.to_string());
                return Err(e);
            }
        };

        let result = match open.mode {
            SessionMode::Create => store.add_goal(fields),
            SessionMode::Edit(id) => store.apply_edit(id, fields).map(|goal| goal.id),
        };

        match result {
            Ok(id) => {
                info!(goal_id = %id, "Saved goal draft");
                self.open = None;
                Ok(id)
            }
            Err(e) => {
                open.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Close the session without touching the store
    ///
    /// Returns false if no session was open.
    pub fn cancel(&mut self) -> bool {
        self.open.take().is_some()
    }

    // === Draft edits ===

    pub fn set_title(&mut self, title: impl Into<String>) -> GoalResult<()> {
        let title = title.into();
        self.edit(|d| d.title = title)
    }

    pub fn set_allocated_input(&mut self, input: impl Into<String>) -> GoalResult<()> {
        let input = input.into();
        self.edit(|d| d.allocated_input = input)
    }

    pub fn set_target_input(&mut self, input: impl Into<String>) -> GoalResult<()> {
        let input = input.into();
        self.edit(|d| d.target_input = input)
    }

    pub fn set_target_date(&mut self, date: impl Into<String>) -> GoalResult<()> {
        let date = date.into();
        self.edit(|d| d.target_date = date)
    }

    pub fn set_category(&mut self, category: GoalCategory) -> GoalResult<()> {
        self.edit(|d| d.category = category)
    }

    pub fn next_category(&mut self) -> GoalResult<()> {
        self.edit(|d| d.category = d.category.next())
    }

    pub fn prev_category(&mut self) -> GoalResult<()> {
        self.edit(|d| d.category = d.category.prev())
    }

    /// Set a field from text, as typed by the user
    ///
    /// Category text outside the enumeration is rejected and the draft is
    /// left unchanged. Amount text is only checked on save.
    pub fn set_field(&mut self, field: DraftField, value: &str) -> GoalResult<()> {
        match field {
            DraftField::Title => self.set_title(value),
            DraftField::Allocated => self.set_allocated_input(value),
            DraftField::Target => self.set_target_input(value),
            DraftField::TargetDate => self.set_target_date(value),
            DraftField::Category => {
                self.open_mut()?;
                let category = value
                    .parse::<GoalCategory>()
                    .map_err(|e| GoalError::InvalidInput(e.to_string()))?;
                self.set_category(category)
            }
        }
    }

    // === Internals ===

    fn open_mut(&mut self) -> GoalResult<&mut OpenSession> {
        self.open
            .as_mut()
            .ok_or_else(|| GoalError::invalid("No goal edit session is open"))
    }

    fn edit<F: FnOnce(&mut GoalDraft)>(&mut self, change: F) -> GoalResult<()> {
        let open = self.open_mut()?;
        change(&mut open.draft);
        open.error_message = None;
        Ok(())
    }

    fn discard_open_draft(&mut self) {
        if let Some(open) = self.open.take() {
            if open.draft != open.original {
                debug!(mode = ?open.mode, "Discarding unsaved goal draft");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::demo_goals;

    fn dollars(d: i64) -> Money {
        Money::from_dollars(d)
    }

    fn seeded() -> (GoalStore, GoalId) {
        let store = GoalStore::with_goals(demo_goals()).unwrap();
        let car = store.goals()[0].id;
        (store, car)
    }

    #[test]
    fn test_starts_closed() {
        let session = GoalEditSession::new();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.draft().is_none());
        assert!(!session.is_dirty());
        assert!(!session.is_valid());
        assert!(session.heading().is_none());
    }

    #[test]
    fn test_create_and_save() {
        let mut store = GoalStore::new();
        let mut session = GoalEditSession::new();

        session.open_create();
        assert_eq!(session.state(), SessionState::Open(SessionMode::Create));
        assert_eq!(session.heading().as_deref(), Some("Add New Goal"));
        assert!(!session.is_valid());

        session.set_title("Car").unwrap();
        session.set_target_input("500").unwrap();
        session.set_target_date("Dec 2024").unwrap();
        assert!(session.is_dirty());
        assert!(session.is_valid());
        assert!(store.is_empty());

        let id = session.save(&mut store).unwrap();
        assert_eq!(session.state(), SessionState::Closed);

        let goal = store.get(id).unwrap();
        assert_eq!(goal.title, "Car");
        assert_eq!(goal.allocated, Money::zero());
        assert_eq!(goal.target, dollars(500));
        assert_eq!(goal.target_date, "Dec 2024");
        assert_eq!(goal.category, GoalCategory::Goal);
    }

    #[test]
    fn test_invalid_save_keeps_session_open() {
        let mut store = GoalStore::new();
        let mut session = GoalEditSession::new();
        session.open_create();
        session.set_target_input("500").unwrap();

        let err = session.save(&mut store).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(session.is_open());
        assert!(session.error_message().unwrap().contains("title"));
        assert!(store.is_empty());

        // Editing clears the message
        session.set_title("Bike").unwrap();
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_non_numeric_amounts_rejected() {
        let mut store = GoalStore::new();
        let mut session = GoalEditSession::new();
        session.open_create();
        session.set_title("Bike").unwrap();

        session.set_target_input("lots").unwrap();
        assert!(session.save(&mut store).unwrap_err().is_invalid_input());

        session.set_target_input("").unwrap();
        assert!(session.save(&mut store).unwrap_err().is_invalid_input());

        session.set_target_input("300").unwrap();
        session.set_allocated_input("-5").unwrap();
        assert!(session.save(&mut store).unwrap_err().is_invalid_input());

        session.set_allocated_input("12.5x").unwrap();
        assert!(session.save(&mut store).unwrap_err().is_invalid_input());

        assert!(session.is_open());
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_allocated_means_zero() {
        let mut store = GoalStore::new();
        let mut session = GoalEditSession::new();
        session.open_create();
        session.set_title("Bike").unwrap();
        session.set_target_input("300").unwrap();
        session.set_allocated_input("").unwrap();

        let id = session.save(&mut store).unwrap();
        assert_eq!(store.get(id).unwrap().allocated, Money::zero());
    }

    #[test]
    fn test_zero_target_is_allowed() {
        let mut store = GoalStore::new();
        let mut session = GoalEditSession::new();
        session.open_create();
        session.set_title("Someday").unwrap();
        session.set_target_input("0").unwrap();

        assert!(session.save(&mut store).is_ok());
    }

    #[test]
    fn test_edit_prefills_from_goal() {
        let (store, car) = seeded();
        let mut session = GoalEditSession::new();
        session.open_edit(&store, car).unwrap();

        assert_eq!(session.state(), SessionState::Open(SessionMode::Edit(car)));
        assert_eq!(session.heading().as_deref(), Some("Edit Car"));
        let draft = session.draft().unwrap();
        assert_eq!(draft.title, "Car");
        assert_eq!(draft.allocated_input, "300.00");
        assert_eq!(draft.target_input, "500.00");
        assert_eq!(draft.target_date, "Dec 2024");
        assert_eq!(draft.category, GoalCategory::Goal);
        assert!(!session.is_dirty());
        assert!(session.is_valid());
    }

    #[test]
    fn test_edit_does_not_touch_store_until_save() {
        let (mut store, car) = seeded();
        let mut session = GoalEditSession::new();
        session.open_edit(&store, car).unwrap();

        session.set_title("Truck").unwrap();
        session.set_allocated_input("50").unwrap();
        session.next_category().unwrap();
        assert_eq!(store.get(car).unwrap().title, "Car");

        let id = session.save(&mut store).unwrap();
        assert_eq!(id, car);
        let goal = store.get(car).unwrap();
        assert_eq!(goal.title, "Truck");
        assert_eq!(goal.allocated, dollars(50));
        assert_eq!(goal.category, GoalCategory::Want);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let (mut store, car) = seeded();
        let before = store.snapshot();
        let mut session = GoalEditSession::new();
        session.open_edit(&store, car).unwrap();
        session.set_title("Boat").unwrap();

        assert!(session.cancel());
        assert!(!session.cancel());
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(store.snapshot(), before);

        // Nothing to save once closed
        assert!(session.save(&mut store).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_edits_require_open_session() {
        let mut session = GoalEditSession::new();
        assert!(session.set_title("X").unwrap_err().is_invalid_input());
        assert!(session.next_category().is_err());
        assert!(session
            .set_field(DraftField::Category, "Want")
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_open_edit_unknown_goal() {
        let (store, _) = seeded();
        let mut session = GoalEditSession::new();
        let err = session.open_edit(&store, GoalId::new()).unwrap_err();
        assert!(err.is_not_found());
        assert!(!session.is_open());
    }

    #[test]
    fn test_save_after_goal_deleted() {
        let (mut store, car) = seeded();
        let mut session = GoalEditSession::new();
        session.open_edit(&store, car).unwrap();
        store.delete_goal(car).unwrap();

        let err = session.save(&mut store).unwrap_err();
        assert!(err.is_not_found());
        assert!(session.is_open());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_field_from_text() {
        let mut session = GoalEditSession::new();
        session.open_create();

        session.set_field("title".parse().unwrap(), "Trip").unwrap();
        session.set_field(DraftField::Target, "1,200").unwrap();
        session.set_field(DraftField::Category, "emergency fund").unwrap();
        assert_eq!(session.draft().unwrap().category, GoalCategory::EmergencyFund);

        let err = session.set_field(DraftField::Category, "Vacation").unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(session.draft().unwrap().category, GoalCategory::EmergencyFund);

        let fields = session.draft().unwrap().validate().unwrap();
        assert_eq!(fields.title, "Trip");
        assert_eq!(fields.target, dollars(1_200));
    }

    #[test]
    fn test_draft_field_parse() {
        assert_eq!("date".parse::<DraftField>().unwrap(), DraftField::TargetDate);
        assert_eq!("Type".parse::<DraftField>().unwrap(), DraftField::Category);

        let err = "color".parse::<DraftField>().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err
            .to_string()
            .contains("expected one of: title, allocated, target, date, category"));
    }

    #[test]
    fn test_category_cycling() {
        let mut session = GoalEditSession::new();
        session.open_create();
        session.prev_category().unwrap();
        assert_eq!(session.draft().unwrap().category, GoalCategory::EmergencyFund);
        session.next_category().unwrap();
        assert_eq!(session.draft().unwrap().category, GoalCategory::Goal);
    }

    #[test]
    fn test_reopen_replaces_draft() {
        let (store, car) = seeded();
        let mut session = GoalEditSession::new();
        session.open_create();
        session.set_title("Half typed").unwrap();

        session.open_edit(&store, car).unwrap();
        assert_eq!(session.draft().unwrap().title, "Car");
        assert!(!session.is_dirty());
    }
}
