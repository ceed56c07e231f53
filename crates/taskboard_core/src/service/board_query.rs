//! Column projection: filter, search and due-date ordering.
//!
//! # Invariants
//! - Projections never mutate the source collection.
//! - Relative order of the source is kept unless due-date sorting is on,
//!   and the sort is stable.
//! - Tasks without a due date sort after tasks with one.

use crate::model::task::{Priority, Task, TaskStatus};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Column query driven by the board's search and filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    /// Only tasks in this column are returned.
    pub column: TaskStatus,
    /// Case-insensitive title substring. Empty means no filter.
    pub search: Option<String>,
    /// Exact priority match.
    pub priority: Option<Priority>,
    /// Sort ascending by due date.
    pub sort_by_due_date: bool,
}

impl BoardQuery {
    pub fn for_column(column: TaskStatus) -> Self {
        Self {
            column,
            search: None,
            priority: None,
            sort_by_due_date: false,
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn sorted_by_due_date(mut self) -> Self {
        self.sort_by_due_date = true;
        self
    }
}

/// Applies `query` to `tasks` and returns the matching tasks.
pub fn filter_tasks(tasks: &[Task], query: &BoardQuery) -> Vec<Task> {
    let needle = query
        .search
        .as_deref()
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<Task> = tasks
        .iter()
        .filter(|task| task.status == query.column)
        .filter(|task| {
            needle
                .as_deref()
                .map_or(true, |needle| task.title.to_lowercase().contains(needle))
        })
        .filter(|task| query.priority.map_or(true, |priority| task.priority == priority))
        .cloned()
        .collect();

    if query.sort_by_due_date {
        matched.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date));
    }

    matched
}

/// Ascending due-date order with missing dates last and equal to each other.
pub fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}
