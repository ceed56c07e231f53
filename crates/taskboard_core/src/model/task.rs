//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record rendered by the board columns.
//! - Provide creation/edit input shapes and validation helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is never blank for a persisted task.
//! - `status` changes only through the board move operation.
//! - `tags` never contain empty tokens.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Stored as text so ids written by earlier board versions still load.
pub type TaskId = String;

/// Board column a task currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Work is in progress.
    Doing,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// All columns in display order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    /// Stable lowercase name used in storage and activity details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Parses a column name. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority. Missing values default to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation failures for task content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// A tag token is empty or whitespace only.
    EmptyTag,
    /// Id is empty.
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title is required"),
            Self::EmptyTag => write!(f, "task tags must not be empty"),
            Self::EmptyId => write!(f, "task id must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// JSON field names are camelCase to keep the stored shape readable by the
/// web board that shares the same storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_blank_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// The web form stores `""` for an unset date.
    #[serde(
        default,
        deserialize_with = "deserialize_blank_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

fn deserialize_blank_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

fn deserialize_blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => text
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

impl Task {
    /// Builds a new `todo` task from a draft with a generated id.
    ///
    /// Does not validate; callers run [`Task::validate`] before persisting.
    pub fn from_draft(draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self::from_draft_with_id(new_task_id(), draft, created_at)
    }

    /// Builds a new `todo` task with a caller-provided id.
    pub fn from_draft_with_id(id: TaskId, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            tags: draft.tags,
            status: TaskStatus::Todo,
            created_at,
        }
    }

    /// Checks content invariants required for persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        validate_title(&self.title)?;
        validate_tags(&self.tags)
    }

    /// Merges present patch fields into this task.
    ///
    /// `status` and `created_at` are not patchable.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    /// Draft with only a title; other fields take their defaults.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets tags from comma-separated form input.
    pub fn with_tags_csv(mut self, raw: &str) -> Self {
        self.tags = parse_tags(raw);
        self
    }
}

/// Partial update for an existing task.
///
/// `None` leaves a field untouched. For optional fields the inner `Option`
/// is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Generates a fresh task id.
pub fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Splits comma-separated input into trimmed, non-empty tag tokens.
///
/// Order is preserved and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), TaskValidationError> {
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(TaskValidationError::EmptyTag);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_tags, Priority, Task, TaskDraft, TaskPatch, TaskStatus, TaskValidationError};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_task() -> Task {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Task::from_draft_with_id(
            "task-1".to_string(),
            TaskDraft::new("Write report").with_tags_csv("docs, urgent"),
            created_at,
        )
    }

    #[test]
    fn parse_tags_trims_and_drops_empty_tokens() {
        assert_eq!(
            parse_tags(" frontend, ,urgent ,, backend "),
            vec!["frontend", "urgent", "backend"]
        );
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn from_draft_starts_in_todo_with_medium_priority() {
        let task = sample_task();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.tags, vec!["docs", "urgent"]);
    }

    #[test]
    fn validate_rejects_blank_title_and_blank_tags() {
        let mut task = sample_task();
        task.title = "   ".to_string();
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyTitle));

        let mut task = sample_task();
        task.tags.push(" ".to_string());
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyTag));
    }

    #[test]
    fn apply_patch_preserves_absent_fields() {
        let mut task = sample_task();
        let due = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        task.apply_patch(TaskPatch::default().priority(Priority::High).due_date(Some(due)));

        assert_eq!(task.title, "Write report");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.tags, vec!["docs", "urgent"]);

        task.apply_patch(TaskPatch::default().due_date(None));
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut task = sample_task();
        task.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2024-01-01");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn deserializes_minimal_record_with_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"id":"1","title":"Legacy","status":"doing","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert_eq!(task.status, TaskStatus::Doing);
    }

    #[test]
    fn blank_or_null_optional_fields_read_as_absent() {
        let task: Task = serde_json::from_str(
            r#"{"id":"1","title":"Web","description":" ","dueDate":"","status":"todo","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, None);

        let task: Task = serde_json::from_str(
            r#"{"id":"1","title":"Web","description":null,"dueDate":null,"status":"todo","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn malformed_due_date_is_still_rejected() {
        let result = serde_json::from_str::<Task>(
            r#"{"id":"1","title":"Web","dueDate":"soon","status":"todo","createdAt":"2024-01-01T00:00:00Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn status_and_priority_parse_case_insensitively() {
        assert_eq!(TaskStatus::parse(" Doing "), Some(TaskStatus::Doing));
        assert_eq!(TaskStatus::parse("blocked"), None);
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
    }
}
