//! A board bound to a timeline: owns the item state, the current timeline
//! snapshot, the drag controller, and the persistence collaborator.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::io::{SchedulePersistence, StoreError};
use crate::model::{Board, BoardError, ItemPath, ItemUpdate, ScheduleField};
use crate::timeline::lanes::{self, LanePacking};
use crate::timeline::policy::TimelinePolicy;
use crate::timeline::{
    BarGeometry, DragController, DragKind, DragOutcome, DragPreview, GestureRejected, Timeline,
    WeekendDays,
};

/// Grab zone around each bar edge, in pixels.
pub const HANDLE_WIDTH: f32 = 7.0;
/// Lane height as a share of the row height.
pub const LANE_RATIO: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Group { id: Uuid },
    /// `lanes` is set for collapsed tasks whose subitems are stacked inline.
    Task { id: Uuid, lanes: Option<LanePacking> },
    Subitem { task: Uuid, id: Uuid },
}

/// One laid-out row of the chart, in content coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub top: f32,
    pub height: f32,
    /// Height of the band holding the row's own bar.
    pub bar_height: f32,
}

impl Row {
    pub fn path(&self) -> Option<ItemPath> {
        match self.kind {
            RowKind::Group { .. } => None,
            RowKind::Task { id, .. } => Some(ItemPath::task(id)),
            RowKind::Subitem { task, id } => Some(ItemPath::subitem(task, id)),
        }
    }

    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top && y < self.top + self.height
    }

    pub fn lane_height(&self) -> f32 {
        self.bar_height * LANE_RATIO
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub kind: DragKind,
    pub path: ItemPath,
    /// Visual column under the pointer.
    pub column: i64,
}

pub struct BoardSession<P> {
    board: Board,
    timeline: Timeline,
    drag: DragController,
    persistence: P,
}

impl<P: SchedulePersistence> BoardSession<P> {
    pub fn new(board: Board, policy: TimelinePolicy, persistence: P) -> Self {
        Self {
            board,
            timeline: Timeline::new(policy),
            drag: DragController::new(),
            persistence,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    // ── Pointer gestures ────────────────────────────────────────

    pub fn pointer_down(&mut self, hit: Hit, pointer_x: f32) -> Result<(), GestureRejected> {
        let stored = self
            .board
            .schedule_of(&hit.path)
            .ok_or(GestureRejected::UnknownItem)?;
        self.drag.pointer_down(
            hit.kind,
            hit.path,
            stored,
            pointer_x,
            Some(hit.column),
            &self.timeline,
        )
    }

    pub fn pointer_move(&mut self, pointer_x: f32) {
        self.drag.pointer_move(pointer_x, &self.timeline);
    }

    /// Release the pointer and commit the result.
    pub fn pointer_up(&mut self) -> Option<DragOutcome> {
        let outcome = self.drag.pointer_up()?;
        if outcome.changed() {
            self.commit_schedule(outcome.target(), outcome.schedule());
        }
        Some(outcome)
    }

    pub fn preview(&self) -> Option<DragPreview> {
        self.drag.preview(&self.timeline)
    }

    fn commit_schedule(&mut self, path: ItemPath, schedule: ScheduleField) {
        if let Err(e) = self.board.set_schedule(&path, schedule) {
            tracing::warn!(error = %e, "dropping schedule for vanished item");
            return;
        }
        tracing::info!(
            task = %path.task,
            subitem = ?path.subitem,
            start = ?schedule.start(),
            duration = ?schedule.duration(),
            "schedule committed"
        );
        self.write_through(&path, &schedule);
    }

    fn write_through(&mut self, path: &ItemPath, schedule: &ScheduleField) {
        if let Err(e) = self.persistence.commit_schedule(path, schedule) {
            tracing::warn!(error = %e, task = %path.task, "persisting schedule failed");
        }
    }

    fn write_board(&mut self) {
        if let Err(e) = self.persistence.commit_board(&self.board) {
            tracing::warn!(error = %e, "persisting board failed");
        }
    }

    // ── Item edits ──────────────────────────────────────────────

    /// Apply a typed field edit and persist it.
    pub fn update(&mut self, path: &ItemPath, update: ItemUpdate) -> Result<(), BoardError> {
        let schedule = match &update {
            ItemUpdate::SetSchedule(schedule) => Some(*schedule),
            _ => None,
        };
        self.board.apply(path, update)?;
        match schedule {
            Some(schedule) => self.write_through(path, &schedule),
            None => self.write_board(),
        }
        Ok(())
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> Uuid {
        let id = self.board.add_group(name);
        self.write_board();
        id
    }

    pub fn add_task(&mut self, group: Uuid, name: impl Into<String>) -> Result<Uuid, BoardError> {
        let id = self.board.add_task(group, name)?;
        self.write_board();
        Ok(id)
    }

    pub fn add_subitem(&mut self, task: Uuid, name: impl Into<String>) -> Result<Uuid, BoardError> {
        let id = self.board.add_subitem(task, name)?;
        self.write_board();
        Ok(id)
    }

    pub fn remove(&mut self, path: &ItemPath) -> Result<(), BoardError> {
        match path.subitem {
            None => self.board.remove_task(path.task).map(drop)?,
            Some(sub) => self.board.remove_subitem(path.task, sub).map(drop)?,
        }
        self.write_board();
        Ok(())
    }

    pub fn move_task(&mut self, task: Uuid, group: Uuid, index: usize) -> Result<(), BoardError> {
        self.board.move_task(task, group, index)?;
        self.write_board();
        Ok(())
    }

    pub fn toggle_collapsed(&mut self, task: Uuid) -> Result<bool, BoardError> {
        let collapsed = self.board.toggle_collapsed(task)?;
        self.write_board();
        Ok(collapsed)
    }

    /// Persist the whole board now.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.persistence.commit_board(&self.board)
    }

    /// Swap in a freshly loaded board. Any gesture in flight is dropped.
    pub fn replace_board(&mut self, board: Board) {
        self.drag = DragController::new();
        self.board = board;
    }

    // ── Policy ──────────────────────────────────────────────────

    /// Switch to a new policy. Ignored while a gesture is active so a drag
    /// never spans two snapshots. Stored schedules are never touched.
    pub fn set_policy(&mut self, policy: TimelinePolicy) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        self.timeline = self.timeline.with_policy(policy);
        true
    }

    pub fn set_show_weekends(&mut self, show: bool) -> bool {
        let mut policy = self.timeline.policy().clone();
        policy.show_weekends = show;
        self.set_policy(policy)
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) -> bool {
        let mut policy = self.timeline.policy().clone();
        policy.anchor = anchor;
        self.set_policy(policy)
    }

    pub fn set_weekend_days(&mut self, weekend: WeekendDays) -> bool {
        let mut policy = self.timeline.policy().clone();
        policy.weekend = weekend;
        self.set_policy(policy)
    }

    pub fn set_column_width(&mut self, width: f32) -> bool {
        let mut policy = self.timeline.policy().clone();
        policy.column_width = width;
        self.set_policy(policy)
    }

    pub fn zoom_in(&mut self) -> bool {
        let mut policy = self.timeline.policy().clone();
        policy.zoom_in();
        self.set_policy(policy)
    }

    pub fn zoom_out(&mut self) -> bool {
        let mut policy = self.timeline.policy().clone();
        policy.zoom_out();
        self.set_policy(policy)
    }

    // ── Layout ──────────────────────────────────────────────────

    pub fn bar_geometry(&self, path: &ItemPath) -> Option<BarGeometry> {
        let schedule = self.board.schedule_of(path)?;
        self.timeline.bar_geometry(&schedule)
    }

    /// Lanes for a task's subitems as they stack in a collapsed row.
    pub fn lane_packing(&self, task: Uuid) -> Option<LanePacking> {
        let task = self.board.task(task)?;
        let ranges = self
            .timeline
            .lane_ranges(task.subitems.iter().map(|s| (s.id, &s.schedule)));
        Some(lanes::pack(&ranges))
    }

    /// Rows in display order: each group header, its tasks, and the subitems
    /// of expanded tasks.
    pub fn rows(&self) -> Vec<Row> {
        let row_height = self.timeline.row_height();
        let mut rows = Vec::new();
        let mut top = 0.0f32;
        let mut push = |kind: RowKind, height: f32| {
            rows.push(Row {
                kind,
                top,
                height,
                bar_height: row_height,
            });
            top += height;
        };

        for group in self.board.groups() {
            push(RowKind::Group { id: group.id }, row_height);
            for task in self.board.ordered_tasks(group.id) {
                if task.collapsed && task.has_subitems() {
                    let packing = self.lane_packing(task.id).unwrap_or_default();
                    let lanes_height = packing.lane_count as f32 * row_height * LANE_RATIO;
                    push(
                        RowKind::Task {
                            id: task.id,
                            lanes: Some(packing),
                        },
                        row_height + lanes_height,
                    );
                } else {
                    push(RowKind::Task { id: task.id, lanes: None }, row_height);
                    for sub in &task.subitems {
                        push(
                            RowKind::Subitem {
                                task: task.id,
                                id: sub.id,
                            },
                            row_height,
                        );
                    }
                }
            }
        }
        rows
    }

    /// Resolve a pointer position (content coordinates) to a gesture.
    /// Edge handles win over the bar body; empty cells of unscheduled items
    /// start a create. Stacked lane bars are not draggable.
    pub fn hit_test(&self, rows: &[Row], x: f32, y: f32) -> Option<Hit> {
        let row = rows.iter().find(|r| r.contains_y(y))?;
        let path = row.path()?;
        if y >= row.top + row.bar_height {
            return None;
        }
        let column = self.timeline.column_at_x(x);
        let schedule = self.board.schedule_of(&path)?;
        let Some(bar) = self.timeline.bar_geometry(&schedule) else {
            return Some(Hit {
                kind: DragKind::Create,
                path,
                column,
            });
        };
        if bar.clipped {
            return None;
        }

        let half = HANDLE_WIDTH * 0.5;
        let kind = if (x - bar.left).abs() <= half {
            DragKind::ResizeLeft
        } else if (x - bar.right()).abs() <= half {
            DragKind::ResizeRight
        } else if x > bar.left && x < bar.right() {
            DragKind::Move
        } else {
            return None;
        };
        Some(Hit { kind, path, column })
    }
}
