//! Activity log model.
//!
//! # Invariants
//! - Activities are immutable once recorded.
//! - The board log is ordered newest-first.

use crate::model::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Kind of mutation recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    Created,
    Edited,
    Deleted,
    Moved,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Edited => "Edited",
            Self::Deleted => "Deleted",
            Self::Moved => "Moved",
        }
    }
}

impl Display for ActivityAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit entry describing a task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub action: ActivityAction,
    /// Human-readable text naming the affected task.
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn created(task: &Task, at: DateTime<Utc>) -> Self {
        Self::new(
            ActivityAction::Created,
            format!("Task \"{}\" created", task.title),
            at,
        )
    }

    /// Named after the title as it reads after the edit.
    pub fn edited(task: &Task, at: DateTime<Utc>) -> Self {
        Self::new(
            ActivityAction::Edited,
            format!("Task \"{}\" updated", task.title),
            at,
        )
    }

    pub fn deleted(task: &Task, at: DateTime<Utc>) -> Self {
        Self::new(
            ActivityAction::Deleted,
            format!("Task \"{}\" deleted", task.title),
            at,
        )
    }

    pub fn moved(task: &Task, to: TaskStatus, at: DateTime<Utc>) -> Self {
        Self::new(
            ActivityAction::Moved,
            format!("Task \"{}\" moved to {}", task.title, to),
            at,
        )
    }

    fn new(action: ActivityAction, details: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            action,
            details,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Activity, ActivityAction};
    use crate::model::task::{Task, TaskDraft, TaskStatus};
    use chrono::Utc;

    #[test]
    fn details_name_the_task_and_destination() {
        let now = Utc::now();
        let task = Task::from_draft(TaskDraft::new("Ship it"), now);

        let moved = Activity::moved(&task, TaskStatus::Doing, now);
        assert_eq!(moved.action, ActivityAction::Moved);
        assert_eq!(moved.details, "Task \"Ship it\" moved to doing");
        assert_eq!(
            Activity::deleted(&task, now).details,
            "Task \"Ship it\" deleted"
        );
    }

    #[test]
    fn action_serializes_as_capitalized_name() {
        let activity = Activity::created(&Task::from_draft(TaskDraft::new("A"), Utc::now()), Utc::now());
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["action"], "Created");
        assert_eq!(json["details"], "Task \"A\" created");
    }
}
