//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level board and session functions via FRB.
//! - Translate plain strings from the UI into typed core requests.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every board call reloads state from storage, so no board state is held
//!   between calls.
//! - Board calls are serialized per process; each one is a complete
//!   load-modify-write cycle.

use chrono::NaiveDate;
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use taskboard_core::db::open_db;
use taskboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, login, logout,
    parse_tags, ping as ping_inner, require_session, Activity, BoardQuery, BoardService, Priority,
    SqliteKvStore, StorageGateway, Task, TaskDraft, TaskPatch, TaskStatus,
};

const BOARD_DB_FILE_NAME: &str = "taskboard.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BOARD_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the board database file path for this process.
///
/// # FFI contract
/// - Must run before the first board call; later calls keep the first path.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_board_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = BOARD_DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        warn!("event=board_store_config module=ffi status=error error_code=path_conflict");
        return format!(
            "board store already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// Task row rendered by board columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub task_id: String,
    pub title: String,
    pub description: Option<String>,
    /// `low|medium|high`.
    pub priority: String,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    /// `todo|doing|done`.
    pub status: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// Activity log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActivityItem {
    pub action: String,
    pub details: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected task ID, when the action targets one task.
    pub task_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Column query response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQueryResponse {
    pub ok: bool,
    pub items: Vec<BoardTaskItem>,
    pub message: String,
}

/// Logs in with the demo credentials.
#[flutter_rust_bridge::frb(sync)]
pub fn board_login(email: String, password: String, remember: bool) -> BoardActionResponse {
    let result = with_gateway(|gateway| {
        login(gateway, email.trim(), password.as_str(), remember).map_err(|err| err.to_string())
    });
    match result {
        Ok(_) => BoardActionResponse::success("Logged in.", None),
        Err(err) => BoardActionResponse::failure(err),
    }
}

/// Logs out; a remembered session is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn board_logout() -> BoardActionResponse {
    match with_gateway(|gateway| Ok(logout(gateway))) {
        Ok(true) => BoardActionResponse::success("Logged out.", None),
        Ok(false) => BoardActionResponse::success("Session remembered.", None),
        Err(err) => BoardActionResponse::failure(format!("board_logout failed: {err}")),
    }
}

/// Returns the logged-in email, or `None` when the board must show login.
#[flutter_rust_bridge::frb(sync)]
pub fn board_session() -> Option<String> {
    with_gateway(|gateway| Ok(require_session(gateway).ok()))
        .ok()
        .flatten()
        .map(|session| session.email)
}

/// Creates a task in the `todo` column.
///
/// Empty `description`/`due_date` are treated as absent; `tags_csv` is
/// comma-separated.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_task(
    title: String,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    tags_csv: String,
) -> BoardActionResponse {
    let draft = match build_draft(title, description, priority, due_date, &tags_csv) {
        Ok(draft) => draft,
        Err(err) => return BoardActionResponse::failure(format!("board_create_task failed: {err}")),
    };
    match with_board(|board| board.create_task(draft).map_err(|err| err.to_string())) {
        Ok(task) => BoardActionResponse::success("Task created.", Some(task.id)),
        Err(err) => BoardActionResponse::failure(format!("board_create_task failed: {err}")),
    }
}

/// Edits a task. `None` leaves a field unchanged; an empty string clears
/// `description`, `due_date` or tags.
#[flutter_rust_bridge::frb(sync)]
pub fn board_edit_task(
    task_id: String,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    tags_csv: Option<String>,
) -> BoardActionResponse {
    let patch = match build_patch(title, description, priority, due_date, tags_csv) {
        Ok(patch) => patch,
        Err(err) => return BoardActionResponse::failure(format!("board_edit_task failed: {err}")),
    };
    match with_board(|board| {
        board
            .edit_task(task_id.as_str(), patch)
            .map_err(|err| err.to_string())
    }) {
        Ok(task) => BoardActionResponse::success("Task updated.", Some(task.id)),
        Err(err) => BoardActionResponse::failure(format!("board_edit_task failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_task(task_id: String) -> BoardActionResponse {
    match with_board(|board| {
        board
            .delete_task(task_id.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => BoardActionResponse::success("Task deleted.", Some(task_id)),
        Err(err) => BoardActionResponse::failure(format!("board_delete_task failed: {err}")),
    }
}

/// Moves a task to `status` (`todo|doing|done`); same-column drops are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn board_move_task(task_id: String, status: String) -> BoardActionResponse {
    let Some(status) = TaskStatus::parse(&status) else {
        return BoardActionResponse::failure(format!(
            "board_move_task failed: unknown column `{status}`"
        ));
    };
    match with_board(|board| {
        board
            .move_task(task_id.as_str(), status)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => BoardActionResponse::success("Task moved.", Some(task_id)),
        Err(err) => BoardActionResponse::failure(format!("board_move_task failed: {err}")),
    }
}

/// Deletes every task and activity. Session stays.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reset() -> BoardActionResponse {
    match with_board(|board| {
        board.reset_board();
        Ok(())
    }) {
        Ok(()) => BoardActionResponse::success("Board reset.", None),
        Err(err) => BoardActionResponse::failure(format!("board_reset failed: {err}")),
    }
}

/// Returns one column, filtered and optionally sorted by due date.
///
/// `priority` of `None` or `all` disables the priority filter.
#[flutter_rust_bridge::frb(sync)]
pub fn board_query(
    column: String,
    search: Option<String>,
    priority: Option<String>,
    sort_by_due_date: bool,
) -> BoardQueryResponse {
    let query = match build_query(&column, search, priority, sort_by_due_date) {
        Ok(query) => query,
        Err(err) => {
            return BoardQueryResponse {
                ok: false,
                items: Vec::new(),
                message: format!("board_query failed: {err}"),
            }
        }
    };
    match with_board(|board| Ok(board.query(&query))) {
        Ok(tasks) => {
            let items = tasks.iter().map(to_task_item).collect::<Vec<_>>();
            let message = format!("{} task(s).", items.len());
            BoardQueryResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => BoardQueryResponse {
            ok: false,
            items: Vec::new(),
            message: format!("board_query failed: {err}"),
        },
    }
}

/// Returns the activity log, newest first. Empty on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn board_activities() -> Vec<BoardActivityItem> {
    with_board(|board| Ok(board.activities().iter().map(to_activity_item).collect()))
        .unwrap_or_default()
}

fn build_draft(
    title: String,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    tags_csv: &str,
) -> Result<TaskDraft, String> {
    Ok(TaskDraft {
        title: title.trim().to_string(),
        description: non_empty(description),
        priority: match priority {
            Some(raw) => parse_priority(&raw)?,
            None => Priority::default(),
        },
        due_date: parse_due_date(due_date)?,
        tags: parse_tags(tags_csv),
    })
}

fn build_patch(
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    tags_csv: Option<String>,
) -> Result<TaskPatch, String> {
    Ok(TaskPatch {
        title: title.map(|value| value.trim().to_string()),
        description: description.map(|value| non_empty(Some(value))),
        priority: priority.map(|raw| parse_priority(&raw)).transpose()?,
        due_date: match due_date {
            Some(raw) => Some(parse_due_date(Some(raw))?),
            None => None,
        },
        tags: tags_csv.map(|raw| parse_tags(&raw)),
    })
}

fn build_query(
    column: &str,
    search: Option<String>,
    priority: Option<String>,
    sort_by_due_date: bool,
) -> Result<BoardQuery, String> {
    let column =
        TaskStatus::parse(column).ok_or_else(|| format!("unknown column `{column}`"))?;
    let mut query = BoardQuery::for_column(column);
    if let Some(term) = search {
        query = query.with_search(term);
    }
    match priority.as_deref().map(str::trim) {
        None | Some("") | Some("all") => {}
        Some(raw) => query = query.with_priority(parse_priority(raw)?),
    }
    if sort_by_due_date {
        query = query.sorted_by_due_date();
    }
    Ok(query)
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| format!("unknown priority `{raw}`"))
}

fn parse_due_date(raw: Option<String>) -> Result<Option<NaiveDate>, String> {
    match non_empty(raw) {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("invalid due date `{value}`; expected YYYY-MM-DD")),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| std::env::temp_dir().join(BOARD_DB_FILE_NAME))
        .clone()
}

fn with_gateway<T>(
    f: impl FnOnce(&mut StorageGateway<SqliteKvStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = BOARD_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(resolve_board_db_path())
        .map_err(|err| format!("board DB open failed: {err}"))?;
    let mut gateway = StorageGateway::new(SqliteKvStore::new(&conn));
    f(&mut gateway)
}

fn with_board<T>(
    f: impl FnOnce(&mut BoardService<SqliteKvStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = BOARD_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(resolve_board_db_path())
        .map_err(|err| format!("board DB open failed: {err}"))?;
    let mut board = BoardService::open(StorageGateway::new(SqliteKvStore::new(&conn)));
    f(&mut board)
}

fn to_task_item(task: &Task) -> BoardTaskItem {
    BoardTaskItem {
        task_id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority.as_str().to_string(),
        due_date: task.due_date.map(|date| date.format("%Y-%m-%d").to_string()),
        tags: task.tags.clone(),
        status: task.status.as_str().to_string(),
        created_at: task.created_at.to_rfc3339(),
    }
}

fn to_activity_item(activity: &Activity) -> BoardActivityItem {
    BoardActivityItem {
        action: activity.action.as_str().to_string(),
        details: activity.details.clone(),
        timestamp: activity.timestamp.to_rfc3339(),
    }
}
