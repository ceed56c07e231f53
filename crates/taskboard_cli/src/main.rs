//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskboard_core` linkage.
//! - Run one scripted board round-trip against volatile storage.
//! - Keep output deterministic apart from generated ids and timestamps.

use taskboard_core::{
    BoardQuery, BoardService, MemoryKvStore, StorageGateway, TaskDraft, TaskStatus,
};

fn main() {
    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    if let Err(err) = run_board_probe() {
        eprintln!("board probe failed: {err}");
        std::process::exit(1);
    }
}

fn run_board_probe() -> Result<(), taskboard_core::BoardError> {
    let mut board = BoardService::open(StorageGateway::new(MemoryKvStore::new()));

    let task = board.create_task(TaskDraft::new("Smoke probe").with_tags_csv("cli, probe"))?;
    board.move_task(&task.id, TaskStatus::Doing)?;
    for column in TaskStatus::ALL {
        let count = board.query(&BoardQuery::for_column(column)).len();
        println!("column={column} tasks={count}");
    }
    board.delete_task(&task.id)?;

    for activity in board.activities() {
        println!("activity={} details={}", activity.action, activity.details);
    }
    Ok(())
}
