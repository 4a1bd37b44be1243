//! Target role / industry lists on a career goal. Capped at three entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::selection::suggest::same_value;

pub const MAX_TARGETS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Role,
    Industry,
}

impl TargetKind {
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Role => "target roles",
            TargetKind::Industry => "target industries",
        }
    }
}

/// A deduplicated list of at most [`MAX_TARGETS`] non-blank entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetList(Vec<String>);

impl TargetList {
    /// Normalizes `raw` (trim, drop blanks, case-insensitive dedupe) and
    /// rejects it if more than three entries remain.
    pub fn parse(kind: TargetKind, raw: &[String]) -> Result<Self, AppError> {
        let mut list = TargetList::default();
        for value in raw {
            let value = value.trim();
            if value.is_empty() || list.contains(value) {
                continue;
            }
            if list.0.len() == MAX_TARGETS {
                return Err(too_many(kind));
            }
            list.0.push(value.to_string());
        }
        Ok(list)
    }

    /// Rebuilds from stored values without re-validating beyond the cap.
    pub fn from_stored(values: Vec<String>) -> Self {
        TargetList(values.into_iter().take(MAX_TARGETS).collect())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| same_value(v, value.trim()))
    }

    /// Appends `value`. Adding a duplicate is a no-op; adding to a full list
    /// fails and leaves the list unchanged.
    pub fn add(&mut self, kind: TargetKind, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(format!(
                "{} entries cannot be blank",
                kind.label()
            )));
        }
        if self.contains(value) {
            return Ok(());
        }
        if self.0.len() >= MAX_TARGETS {
            return Err(too_many(kind));
        }
        self.0.push(value.to_string());
        Ok(())
    }

    /// Removes `value` (case-insensitive). Returns whether anything was removed.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|v| !same_value(v, value.trim()));
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAction {
    Add,
    Remove,
}

/// A single add/remove on one of the two target lists.
#[derive(Debug, Deserialize)]
pub struct TargetEdit {
    pub kind: TargetKind,
    pub action: TargetAction,
    pub value: String,
}

/// Applies `edit` to whichever list it names. Removing an absent value is
/// `NotFound`; on any error both lists are unchanged.
pub fn apply_edit(
    roles: &mut TargetList,
    industries: &mut TargetList,
    edit: &TargetEdit,
) -> Result<(), AppError> {
    let list = match edit.kind {
        TargetKind::Role => roles,
        TargetKind::Industry => industries,
    };
    match edit.action {
        TargetAction::Add => list.add(edit.kind, &edit.value),
        TargetAction::Remove if list.remove(&edit.value) => Ok(()),
        TargetAction::Remove => Err(AppError::NotFound(format!(
            "'{}' is not one of the {}",
            edit.value.trim(),
            edit.kind.label()
        ))),
    }
}

fn too_many(kind: TargetKind) -> AppError {
    AppError::Validation(format!(
        "At most {MAX_TARGETS} {} may be selected",
        kind.label()
    ))
}

/// Full career-goal form as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CareerGoalInput {
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub target_industries: Vec<String>,
    #[serde(default)]
    pub weekly_application_goal: i32,
    #[serde(default)]
    pub weekly_networking_goal: i32,
    #[serde(default)]
    pub monthly_application_goal: i32,
    #[serde(default)]
    pub monthly_networking_goal: i32,
    pub campaign_start: Option<NaiveDate>,
    pub campaign_end: Option<NaiveDate>,
}

/// A career goal that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCareerGoal {
    pub target_roles: TargetList,
    pub target_industries: TargetList,
    pub weekly_application_goal: i32,
    pub weekly_networking_goal: i32,
    pub monthly_application_goal: i32,
    pub monthly_networking_goal: i32,
    pub campaign_start: Option<NaiveDate>,
    pub campaign_end: Option<NaiveDate>,
}

pub fn validate_goal(input: &CareerGoalInput) -> Result<ValidCareerGoal, AppError> {
    let target_roles = TargetList::parse(TargetKind::Role, &input.target_roles)?;
    let target_industries = TargetList::parse(TargetKind::Industry, &input.target_industries)?;

    for (name, value) in [
        ("weekly_application_goal", input.weekly_application_goal),
        ("weekly_networking_goal", input.weekly_networking_goal),
        ("monthly_application_goal", input.monthly_application_goal),
        ("monthly_networking_goal", input.monthly_networking_goal),
    ] {
        if value < 0 {
            return Err(AppError::Validation(format!("{name} cannot be negative")));
        }
    }

    if let (Some(start), Some(end)) = (input.campaign_start, input.campaign_end) {
        if end < start {
            return Err(AppError::Validation(
                "campaign_end must not be before campaign_start".to_string(),
            ));
        }
    }

    Ok(ValidCareerGoal {
        target_roles,
        target_industries,
        weekly_application_goal: input.weekly_application_goal,
        weekly_networking_goal: input.weekly_networking_goal,
        monthly_application_goal: input.monthly_application_goal,
        monthly_networking_goal: input.monthly_networking_goal,
        campaign_start: input.campaign_start,
        campaign_end: input.campaign_end,
    })
}
