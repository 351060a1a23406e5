use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::document::BoardDocument;
use crate::model::{Board, ItemPath, ScheduleField};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("item not present in stored board: {0:?}")]
    UnknownItem(ItemPath),
}

/// Receives schedule writes after they have been applied in memory.
///
/// Writes are fire-and-forget from the caller's point of view: an error is
/// logged and the in-memory board stays authoritative.
pub trait SchedulePersistence {
    fn commit_schedule(
        &mut self,
        path: &ItemPath,
        schedule: &ScheduleField,
    ) -> Result<(), StoreError>;

    /// Persist the whole board after a structural change.
    fn commit_board(&mut self, board: &Board) -> Result<(), StoreError>;
}

/// Save a board to a JSON file.
pub fn save_board(board: &Board, path: &Path) -> Result<(), StoreError> {
    write_document(&BoardDocument::from_board(board), path)
}

/// Load a board from a JSON file, normalizing schedules against `anchor`.
pub fn load_board(path: &Path, anchor: NaiveDate) -> Result<Board, StoreError> {
    let json = std::fs::read_to_string(path)?;
    let document: BoardDocument = serde_json::from_str(&json)?;
    let (board, rewritten) = document.into_board(anchor);
    if rewritten > 0 {
        tracing::warn!(path = %path.display(), rewritten, "normalized non-canonical schedules");
    }
    tracing::info!(path = %path.display(), tasks = board.task_count(), "board loaded");
    Ok(board)
}

fn write_document(document: &BoardDocument, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Persistence backed by a single JSON file. Keeps its own replica of the
/// stored document and rewrites the file on every commit.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: BoardDocument,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, board: &Board) -> Self {
        Self {
            path: path.into(),
            document: BoardDocument::from_board(board),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchedulePersistence for JsonFileStore {
    fn commit_schedule(
        &mut self,
        path: &ItemPath,
        schedule: &ScheduleField,
    ) -> Result<(), StoreError> {
        if !self.document.set_schedule(path, schedule) {
            return Err(StoreError::UnknownItem(*path));
        }
        write_document(&self.document, &self.path)
    }

    fn commit_board(&mut self, board: &Board) -> Result<(), StoreError> {
        self.document = BoardDocument::from_board(board);
        write_document(&self.document, &self.path)?;
        tracing::info!(path = %self.path.display(), "board saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn sample() -> (Board, uuid::Uuid) {
        let mut board = Board::new("Roadmap");
        let group = board.add_group("Q4");
        let task = board.add_task(group, "Launch").unwrap();
        board
            .set_schedule(&ItemPath::task(task), ScheduleField::scheduled(anchor(), 3))
            .unwrap();
        (board, task)
    }

    #[test]
    fn save_then_load_keeps_schedules() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/board.json");
        let (board, task) = sample();
        save_board(&board, &path).unwrap();

        let loaded = load_board(&path, anchor()).unwrap();
        assert_eq!(loaded.task(task), board.task(task));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn commit_schedule_rewrites_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("board.json");
        let (board, task) = sample();
        let mut store = JsonFileStore::new(&path, &board);

        store
            .commit_schedule(&ItemPath::task(task), &ScheduleField::UNSCHEDULED)
            .unwrap();
        let loaded = load_board(&path, anchor()).unwrap();
        assert_eq!(loaded.task(task).unwrap().schedule, ScheduleField::UNSCHEDULED);
    }

    #[test]
    fn commit_for_unknown_item_fails_without_writing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("board.json");
        let (board, _) = sample();
        let mut store = JsonFileStore::new(&path, &board);

        let err = store
            .commit_schedule(&ItemPath::task(uuid::Uuid::new_v4()), &ScheduleField::UNSCHEDULED)
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownItem(_)));
        assert!(!path.exists());
    }

    #[test]
    fn load_reports_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("board.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_board(&path, anchor()), Err(StoreError::Json(_))));
        assert!(matches!(
            load_board(&tmp.path().join("missing.json"), anchor()),
            Err(StoreError::Io(_))
        ));
    }
}
