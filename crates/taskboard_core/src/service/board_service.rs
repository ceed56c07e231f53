//! Board use-case service.
//!
//! # Responsibility
//! - Hold the in-memory task and activity collections for one session.
//! - Apply create/edit/delete/move/reset and mirror every change to storage.
//!
//! # Invariants
//! - Task ids are unique within the collection.
//! - Every successful mutation prepends exactly one activity, except reset
//!   (clears everything) and same-column moves (no effect at all).
//! - Collections are written wholesale after each change.
//! - In-memory state stays authoritative when a storage write is dropped.

use crate::model::activity::Activity;
use crate::model::task::{
    new_task_id, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, TaskValidationError,
};
use crate::repo::kv_store::KvStore;
use crate::repo::storage_gateway::StorageGateway;
use crate::service::board_query::{filter_tasks, BoardQuery};
use chrono::Utc;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Failure surfaced by board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Target task does not exist in the collection.
    NotFound(TaskId),
    /// Task content violates model invariants.
    Validation(TaskValidationError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Board state engine over an injected storage gateway.
pub struct BoardService<S: KvStore> {
    gateway: StorageGateway<S>,
    tasks: Vec<Task>,
    activities: Vec<Activity>,
}

impl<S: KvStore> BoardService<S> {
    /// Creates an empty board. Call [`BoardService::load`] to hydrate.
    pub fn new(gateway: StorageGateway<S>) -> Self {
        Self {
            gateway,
            tasks: Vec::new(),
            activities: Vec::new(),
        }
    }

    /// Creates a board and hydrates it from storage.
    pub fn open(gateway: StorageGateway<S>) -> Self {
        let mut service = Self::new(gateway);
        service.load();
        service
    }

    /// Replaces in-memory state with what storage holds.
    pub fn load(&mut self) -> (&[Task], &[Activity]) {
        self.tasks = self.gateway.read_tasks();
        self.activities = self.gateway.read_activities();
        info!(
            "event=board_load module=board status=ok tasks={} activities={}",
            self.tasks.len(),
            self.activities.len()
        );
        (&self.tasks, &self.activities)
    }

    /// Creates a `todo` task from `draft` and records a `Created` activity.
    ///
    /// # Errors
    /// - `Validation` when the title is blank or a tag token is empty.
    pub fn create_task(&mut self, draft: TaskDraft) -> BoardResult<Task> {
        let now = Utc::now();
        let mut task = Task::from_draft(draft, now);
        while self.tasks.iter().any(|existing| existing.id == task.id) {
            task.id = new_task_id();
        }
        task.validate()?;

        self.tasks.push(task.clone());
        self.gateway.write_tasks(&self.tasks);
        self.record(Activity::created(&task, now));
        info!(
            "event=task_create module=board status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    /// Merges `patch` into the task and records an `Edited` activity.
    ///
    /// # Errors
    /// - `NotFound` when `id` is unknown.
    /// - `Validation` when the merged task is invalid; nothing changes.
    pub fn edit_task(&mut self, id: &str, patch: TaskPatch) -> BoardResult<Task> {
        let index = self.position(id)?;
        let mut updated = self.tasks[index].clone();
        updated.apply_patch(patch);
        updated.validate()?;

        self.tasks[index] = updated.clone();
        self.gateway.write_tasks(&self.tasks);
        self.record(Activity::edited(&updated, Utc::now()));
        info!("event=task_edit module=board status=ok task_id={id}");
        Ok(updated)
    }

    /// Removes the task and records a `Deleted` activity naming it.
    pub fn delete_task(&mut self, id: &str) -> BoardResult<()> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);

        self.gateway.write_tasks(&self.tasks);
        self.record(Activity::deleted(&removed, Utc::now()));
        info!("event=task_delete module=board status=ok task_id={id}");
        Ok(())
    }

    /// Moves the task to `status`.
    ///
    /// Moving to the current column changes nothing: no write, no activity.
    pub fn move_task(&mut self, id: &str, status: TaskStatus) -> BoardResult<()> {
        let index = self.position(id)?;
        let from = self.tasks[index].status;
        if from == status {
            debug!("event=task_move module=board status=noop task_id={id} column={status}");
            return Ok(());
        }

        self.tasks[index].status = status;
        self.gateway.write_tasks(&self.tasks);
        let activity = Activity::moved(&self.tasks[index], status, Utc::now());
        self.record(activity);
        info!("event=task_move module=board status=ok task_id={id} from={from} to={status}");
        Ok(())
    }

    /// Clears all tasks and activities, in memory and in storage.
    pub fn reset_board(&mut self) {
        self.tasks.clear();
        self.activities.clear();
        self.gateway.reset_board();
        info!("event=board_reset module=board status=ok");
    }

    /// Read-only column projection.
    pub fn query(&self, query: &BoardQuery) -> Vec<Task> {
        filter_tasks(&self.tasks, query)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Activity log, newest first.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn gateway(&self) -> &StorageGateway<S> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut StorageGateway<S> {
        &mut self.gateway
    }

    pub fn into_gateway(self) -> StorageGateway<S> {
        self.gateway
    }

    fn position(&self, id: &str) -> BoardResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    fn record(&mut self, activity: Activity) {
        self.activities.insert(0, activity);
        self.gateway.write_activities(&self.activities);
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardError, BoardService};
    use crate::model::task::{TaskDraft, TaskPatch, TaskStatus, TaskValidationError};
    use crate::repo::kv_store::MemoryKvStore;
    use crate::repo::storage_gateway::StorageGateway;

    fn board() -> BoardService<MemoryKvStore> {
        BoardService::open(StorageGateway::new(MemoryKvStore::new()))
    }

    #[test]
    fn create_rejects_blank_title_without_side_effects() {
        let mut board = board();
        let err = board.create_task(TaskDraft::new("   ")).unwrap_err();
        assert_eq!(err, BoardError::Validation(TaskValidationError::EmptyTitle));
        assert!(board.tasks().is_empty());
        assert!(board.activities().is_empty());
        assert!(board.gateway().store().is_empty());
    }

    #[test]
    fn edit_with_blank_title_keeps_original() {
        let mut board = board();
        let task = board.create_task(TaskDraft::new("Keep me")).unwrap();

        let err = board
            .edit_task(&task.id, TaskPatch::default().title(" "))
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        assert_eq!(board.task(&task.id).unwrap().title, "Keep me");
        assert_eq!(board.activities().len(), 1);
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let mut board = board();
        assert_eq!(
            board.move_task("nope", TaskStatus::Done),
            Err(BoardError::NotFound("nope".to_string()))
        );
        assert!(matches!(board.delete_task("nope"), Err(BoardError::NotFound(_))));
        assert!(matches!(
            board.edit_task("nope", TaskPatch::default()),
            Err(BoardError::NotFound(_))
        ));
    }

    #[test]
    fn edit_never_changes_status_or_created_at() {
        let mut board = board();
        let task = board.create_task(TaskDraft::new("Draft")).unwrap();
        board.move_task(&task.id, TaskStatus::Done).unwrap();

        let updated = board
            .edit_task(&task.id, TaskPatch::default().title("Final"))
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(board.activities()[0].details, "Task \"Final\" updated");
    }
}
