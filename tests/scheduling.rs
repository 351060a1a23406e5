use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use uuid::Uuid;

use rust_schedule_board::io::{load_board, JsonFileStore, SchedulePersistence, StoreError};
use rust_schedule_board::model::{Board, ItemPath, ItemUpdate, ScheduleField};
use rust_schedule_board::session::{BoardSession, Hit};
use rust_schedule_board::timeline::duration::resolve_duration;
use rust_schedule_board::timeline::lanes::{self, LaneRange};
use rust_schedule_board::timeline::policy::TimelinePolicy;
use rust_schedule_board::timeline::{DragKind, DragOutcome, Timeline, WeekendDays};

const W: f32 = 20.0;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Anchor Monday 2026-10-12; the window starts Monday 2026-09-28.
fn policy(show_weekends: bool) -> TimelinePolicy {
    let mut p = TimelinePolicy::new(date(2026, 10, 12));
    p.past_span = 14;
    p.future_span = 60;
    p.column_width = W;
    p.row_height = 30.0;
    p.show_weekends = show_weekends;
    p
}

/// Shared log of every schedule write the session forwards.
#[derive(Default, Clone)]
struct RecordingStore {
    writes: Rc<RefCell<Vec<(ItemPath, ScheduleField)>>>,
}

impl SchedulePersistence for RecordingStore {
    fn commit_schedule(
        &mut self,
        path: &ItemPath,
        schedule: &ScheduleField,
    ) -> Result<(), StoreError> {
        self.writes.borrow_mut().push((*path, *schedule));
        Ok(())
    }

    fn commit_board(&mut self, _board: &Board) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A collaborator that is never reachable.
struct OfflineStore;

impl SchedulePersistence for OfflineStore {
    fn commit_schedule(
        &mut self,
        _path: &ItemPath,
        _schedule: &ScheduleField,
    ) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "offline")))
    }

    fn commit_board(&mut self, _board: &Board) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "offline")))
    }
}

fn board_with_task(schedule: ScheduleField) -> (Board, ItemPath) {
    let mut board = Board::new("Board");
    let group = board.add_group("Crew A");
    let task = board.add_task(group, "Job").unwrap();
    let path = ItemPath::task(task);
    board.set_schedule(&path, schedule).unwrap();
    (board, path)
}

#[test]
fn friday_span_of_two_skips_hidden_weekend() {
    let friday = date(2026, 10, 16);
    assert_eq!(resolve_duration(friday, 2, false, WeekendDays::default()), 4);

    let timeline = Timeline::new(policy(false));
    assert_eq!(timeline.resolve_duration(friday, 2), 4);
    assert_eq!(timeline.resolve_duration(friday, 2), 4);
}

#[test]
fn resize_right_onto_start_clears_schedule() {
    let stored = ScheduleField::scheduled(date(2026, 10, 12), 3);
    let (board, path) = board_with_task(stored);
    let store = RecordingStore::default();
    let mut session = BoardSession::new(board, policy(true), store.clone());

    let rows = session.rows();
    let y = rows[1].top + 4.0;
    let hit = session.hit_test(&rows, 339.0, y).unwrap();
    assert_eq!(hit.kind, DragKind::ResizeRight);

    session.pointer_down(hit, 339.0).unwrap();
    session.pointer_move(339.0 - 3.0 * W);
    assert!(session.preview().unwrap().delete_armed);

    let outcome = session.pointer_up().unwrap();
    assert!(matches!(outcome, DragOutcome::Deleted { .. }));
    assert_eq!(session.board().schedule_of(&path), Some(ScheduleField::UNSCHEDULED));
    assert_eq!(*store.writes.borrow(), vec![(path, ScheduleField::UNSCHEDULED)]);
}

#[test]
fn collapsed_parent_packs_three_ranges_into_two_lanes() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let packing = lanes::pack(&[
        LaneRange::new(a, 0, 3),
        LaneRange::new(b, 1, 4),
        LaneRange::new(c, 5, 6),
    ]);
    assert_eq!(packing.lane_count, 2);
    assert_eq!(
        [packing.lane_of(a), packing.lane_of(b), packing.lane_of(c)],
        [Some(0), Some(1), Some(0)]
    );
}

#[test]
fn create_drag_of_three_columns_commits_four_days() {
    let (board, path) = board_with_task(ScheduleField::UNSCHEDULED);
    let mut session = BoardSession::new(board, policy(true), RecordingStore::default());

    session
        .pointer_down(Hit { kind: DragKind::Create, path, column: 10 }, 205.0)
        .unwrap();
    session.pointer_move(205.0 + 3.0 * W);
    let outcome = session.pointer_up().unwrap();

    let committed = outcome.schedule();
    assert_eq!(committed.duration(), Some(4));
    assert_eq!(committed.start(), Some(date(2026, 10, 8)));
    assert_eq!(session.board().schedule_of(&path), Some(committed));
}

#[test]
fn create_drag_over_hidden_weekend_counts_calendar_days() {
    let (board, path) = board_with_task(ScheduleField::UNSCHEDULED);
    let mut session = BoardSession::new(board, policy(false), RecordingStore::default());

    // Column 8 is Thursday 2026-10-08 once weekends are hidden.
    session
        .pointer_down(Hit { kind: DragKind::Create, path, column: 8 }, 165.0)
        .unwrap();
    session.pointer_move(165.0 + 3.0 * W);
    let outcome = session.pointer_up().unwrap();

    // Thu, Fri, (Sat, Sun), Mon, Tue.
    assert_eq!(outcome.schedule(), ScheduleField::scheduled(date(2026, 10, 8), 6));
}

#[test]
fn toggling_weekends_moves_geometry_but_not_schedules() {
    let mut board = Board::new("Board");
    let group = board.add_group("Crew");
    let fields = [
        ScheduleField::scheduled(date(2026, 10, 12), 5), // Mon..Fri
        ScheduleField::scheduled(date(2026, 10, 15), 5), // Thu..Mon
        ScheduleField::scheduled(date(2026, 10, 17), 2), // Sat..Sun
    ];
    let mut paths = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let task = board.add_task(group, format!("Job {i}")).unwrap();
        let path = ItemPath::task(task);
        board.set_schedule(&path, *field).unwrap();
        paths.push(path);
    }
    let mut session = BoardSession::new(board, policy(true), RecordingStore::default());

    let geometry = |s: &BoardSession<RecordingStore>| -> Vec<(f32, f32)> {
        paths
            .iter()
            .map(|p| {
                let g = s.bar_geometry(p).unwrap();
                (g.left, g.width)
            })
            .collect()
    };

    let shown = geometry(&session);
    assert_eq!(shown, vec![(280.0, 100.0), (340.0, 100.0), (380.0, 40.0)]);

    assert!(session.set_show_weekends(false));
    let hidden = geometry(&session);
    assert_eq!(hidden, vec![(200.0, 100.0), (260.0, 60.0), (300.0, W)]);

    for (path, field) in paths.iter().zip(fields) {
        assert_eq!(session.board().schedule_of(path), Some(field));
    }

    assert!(session.set_show_weekends(true));
    assert_eq!(geometry(&session), shown);
}

#[test]
fn micro_drag_leaves_schedule_and_store_untouched() {
    // Saturday start with weekends hidden: a click must not snap it.
    let stored = ScheduleField::scheduled(date(2026, 10, 17), 3);
    let (board, path) = board_with_task(stored);
    let store = RecordingStore::default();
    let mut session = BoardSession::new(board, policy(false), store.clone());

    session
        .pointer_down(Hit { kind: DragKind::Move, path, column: 15 }, 310.0)
        .unwrap();
    session.pointer_move(313.0);
    let outcome = session.pointer_up().unwrap();

    assert!(!outcome.changed());
    assert_eq!(session.board().schedule_of(&path), Some(stored));
    assert!(store.writes.borrow().is_empty());
}

#[test]
fn offline_collaborator_does_not_block_commits() {
    let (board, path) = board_with_task(ScheduleField::UNSCHEDULED);
    let mut session = BoardSession::new(board, policy(true), OfflineStore);

    session
        .pointer_down(Hit { kind: DragKind::Create, path, column: 14 }, 285.0)
        .unwrap();
    session.pointer_move(285.0 + W);
    session.pointer_up().unwrap();
    assert_eq!(
        session.board().schedule_of(&path),
        Some(ScheduleField::scheduled(date(2026, 10, 12), 2))
    );

    session
        .update(&path, ItemUpdate::Rename("Renamed".into()))
        .unwrap();
    assert_eq!(session.board().name_of(&path), Some("Renamed"));
    assert!(session.save().is_err());
}

#[test]
fn committed_drag_reaches_the_json_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("board.json");
    let (board, path) = board_with_task(ScheduleField::scheduled(date(2026, 10, 12), 2));
    let store = JsonFileStore::new(&file, &board);
    let mut session = BoardSession::new(board, policy(true), store);

    session
        .pointer_down(Hit { kind: DragKind::Move, path, column: 14 }, 290.0)
        .unwrap();
    session.pointer_move(290.0 + 2.0 * W);
    session.pointer_up().unwrap();

    let reloaded = load_board(&file, date(2026, 10, 12)).unwrap();
    assert_eq!(
        reloaded.schedule_of(&path),
        Some(ScheduleField::scheduled(date(2026, 10, 14), 2))
    );
}

#[test]
fn legacy_offsets_load_as_dates() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("legacy.json");
    let group = Uuid::new_v4();
    let task = Uuid::new_v4();
    let json = serde_json::json!({
        "name": "Old board",
        "groups": [{ "id": group, "name": "G", "task_ids": [task] }],
        "tasks": [{
            "id": task,
            "group_id": group,
            "name": "T",
            "schedule": { "start": 4, "duration": "3" }
        }]
    });
    std::fs::write(&file, json.to_string()).unwrap();

    let board = load_board(&file, date(2026, 10, 12)).unwrap();
    assert_eq!(
        board.schedule_of(&ItemPath::task(task)),
        Some(ScheduleField::scheduled(date(2026, 10, 16), 3))
    );
}

#[test]
fn all_weekend_calendar_still_resolves_at_least_one_day() {
    let everything = WeekendDays::from_weekdays(&[
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]);
    let mut p = policy(false);
    p.weekend = everything;
    let timeline = Timeline::new(p);

    assert_eq!(timeline.visible_columns(), 0);
    let start = date(2026, 10, 12);
    let first = timeline.resolve_duration(start, 3);
    assert_eq!(first, 1);
    assert_eq!(timeline.resolve_duration(start, 3), first);
    assert_eq!(timeline.date_at_column(0), None);
}

#[test]
fn calendar_to_visual_is_monotonic_for_every_weekend_mask() {
    let masks = [
        WeekendDays::NONE,
        WeekendDays::default(),
        WeekendDays::from_weekdays(&[Weekday::Fri, Weekday::Sat]),
        WeekendDays::from_weekdays(&[Weekday::Wed]),
    ];
    for weekend in masks {
        for show in [true, false] {
            let mut p = policy(show);
            p.weekend = weekend;
            let timeline = Timeline::new(p);
            let maps = timeline.maps();
            let mut prev = 0;
            for index in 0..timeline.calendar().len() {
                let column = maps.calendar_to_visual(index as i64);
                assert!(column >= prev);
                prev = column;
                if maps.is_visible(index) {
                    assert_eq!(maps.visual_to_calendar(column as i64), Some(index));
                }
            }
        }
    }
}
