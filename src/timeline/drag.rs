//! Pointer-driven create / move / resize / delete of scheduled ranges.
//!
//! A gesture is a single owned [`DragSession`]. Pointer-down creates it,
//! each pointer-move replaces it with the value returned by
//! [`DragSession::update`], and pointer-up consumes it into a
//! [`DragOutcome`]. Releasing always commits: an untouched gesture commits the
//! original schedule unchanged, a delete-armed one clears the schedule.

use crate::model::{ItemPath, Schedule, ScheduleField};

use super::Timeline;

/// Pointer travel (px) a gesture needs before it counts as a drag.
pub const MOVE_THRESHOLD_PX: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    /// Grabbed the bar body.
    Move,
    /// Grabbed the left edge handle.
    ResizeLeft,
    /// Grabbed the right edge handle.
    ResizeRight,
    /// Pressed on an empty cell of an unscheduled item.
    Create,
}

impl DragKind {
    pub fn label(self) -> &'static str {
        match self {
            DragKind::Move => "move",
            DragKind::ResizeLeft => "resize-left",
            DragKind::ResizeRight => "resize-right",
            DragKind::Create => "create",
        }
    }
}

/// Why a pointer-down did not start a gesture.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum GestureRejected {
    #[error("a drag is already in progress")]
    AlreadyDragging,
    #[error("item already has a schedule")]
    AlreadyScheduled,
    #[error("item has no schedule to drag")]
    Unscheduled,
    #[error("no visible column under the pointer")]
    NoColumn,
    #[error("item is not on the board")]
    UnknownItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub target: ItemPath,
    pub anchor_x: f32,
    /// The item's value when the gesture started.
    pub stored: ScheduleField,
    /// Range the gesture is relative to. For `Create`, a one-column range at
    /// the pressed cell.
    pub original: Schedule,
    original_start_column: usize,
    original_end_column: usize,
    pub live: Schedule,
    live_start_column: usize,
    live_end_column: usize,
    pub delete_armed: bool,
    /// Set once the pointer travelled past the threshold; never cleared.
    pub moved: bool,
}

impl DragSession {
    fn new(
        kind: DragKind,
        target: ItemPath,
        anchor_x: f32,
        stored: ScheduleField,
        original: Schedule,
        start_column: usize,
        end_column: usize,
    ) -> Self {
        let end_column = end_column.max(start_column + 1);
        Self {
            kind,
            target,
            anchor_x,
            stored,
            original,
            original_start_column: start_column,
            original_end_column: end_column,
            live: original,
            live_start_column: start_column,
            live_end_column: end_column,
            delete_armed: false,
            moved: false,
        }
    }

    /// Width of the live range in visual columns.
    pub fn live_span_columns(&self) -> usize {
        self.live_end_column - self.live_start_column
    }

    pub fn live_columns(&self) -> (usize, usize) {
        (self.live_start_column, self.live_end_column)
    }

    pub fn original_columns(&self) -> (usize, usize) {
        (self.original_start_column, self.original_end_column)
    }

    /// The session after the pointer moved to `pointer_x`.
    pub fn update(self, pointer_x: f32, timeline: &Timeline) -> DragSession {
        let dx = pointer_x - self.anchor_x;
        if !self.moved && dx.abs() <= MOVE_THRESHOLD_PX {
            return self;
        }
        let delta = (dx / timeline.column_width()).round() as i64;
        let mut next = DragSession { moved: true, ..self };
        if delta == 0 {
            next.reset_live();
            return next;
        }
        let was_armed = next.delete_armed;
        match next.kind {
            DragKind::Move => next.update_move(delta, timeline),
            DragKind::ResizeRight => next.update_resize_right(delta, timeline),
            DragKind::ResizeLeft => next.update_resize_left(delta, timeline),
            DragKind::Create => next.update_create(delta, timeline),
        }
        if next.delete_armed != was_armed {
            tracing::debug!(
                kind = next.kind.label(),
                armed = next.delete_armed,
                "delete arm changed"
            );
        }
        next
    }

    fn reset_live(&mut self) {
        self.live = self.original;
        self.live_start_column = self.original_start_column;
        self.live_end_column = self.original_end_column;
        self.delete_armed = false;
    }

    fn original_span(&self) -> usize {
        self.original_end_column - self.original_start_column
    }

    fn update_move(&mut self, delta: i64, timeline: &Timeline) {
        let requested = (self.original_start_column as i64 + delta).max(0);
        let Some(start) = timeline.date_at_column(requested) else {
            return;
        };
        let last_column = timeline.visible_columns().saturating_sub(1) as i64;
        let column = requested.min(last_column) as usize;
        let span = self.original_span();
        self.live = Schedule::new(start, timeline.resolve_duration(start, span as u32));
        self.live_start_column = column;
        self.live_end_column = column + span;
        self.delete_armed = false;
    }

    fn update_resize_right(&mut self, delta: i64, timeline: &Timeline) {
        let start_column = self.original_start_column;
        let requested = self.original_end_column as i64 + delta;
        let start = self.original.start();
        if requested <= start_column as i64 {
            self.delete_armed = true;
            self.live = Schedule::new(start, timeline.resolve_duration(start, 1));
            self.live_start_column = start_column;
            self.live_end_column = start_column + 1;
            return;
        }
        let end = requested as usize;
        let span = (end - start_column) as u32;
        self.delete_armed = false;
        self.live = Schedule::new(start, timeline.resolve_duration(start, span));
        self.live_start_column = start_column;
        self.live_end_column = end;
    }

    fn update_resize_left(&mut self, delta: i64, timeline: &Timeline) {
        let end_column = self.original_end_column;
        let requested = self.original_start_column as i64 + delta;
        let (column, armed) = if requested >= end_column as i64 {
            (end_column - 1, true)
        } else {
            (requested.max(0) as usize, false)
        };
        let Some(start) = timeline.date_at_column(column as i64) else {
            return;
        };
        let span = (end_column - column) as u32;
        self.delete_armed = armed;
        self.live = Schedule::new(start, timeline.resolve_duration(start, span));
        self.live_start_column = column;
        self.live_end_column = end_column;
    }

    fn update_create(&mut self, delta: i64, timeline: &Timeline) {
        let span = (1 + delta).max(1) as usize;
        let start = self.original.start();
        self.live = Schedule::new(start, timeline.resolve_duration(start, span as u32));
        self.live_start_column = self.original_start_column;
        self.live_end_column = self.original_start_column + span;
    }

    fn finish(self) -> DragOutcome {
        if self.delete_armed {
            return DragOutcome::Deleted {
                target: self.target,
                kind: self.kind,
                previous: self.stored,
            };
        }
        let schedule = if self.moved || self.kind == DragKind::Create {
            ScheduleField::from(self.live)
        } else {
            self.stored
        };
        DragOutcome::Committed {
            target: self.target,
            kind: self.kind,
            schedule,
            changed: schedule != self.stored,
        }
    }
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Committed {
        target: ItemPath,
        kind: DragKind,
        schedule: ScheduleField,
        /// False when the gesture rewrote the stored value with itself.
        changed: bool,
    },
    Deleted {
        target: ItemPath,
        kind: DragKind,
        previous: ScheduleField,
    },
}

impl DragOutcome {
    pub fn target(&self) -> ItemPath {
        match self {
            DragOutcome::Committed { target, .. } | DragOutcome::Deleted { target, .. } => *target,
        }
    }

    /// The value to write into the item's schedule.
    pub fn schedule(&self) -> ScheduleField {
        match self {
            DragOutcome::Committed { schedule, .. } => *schedule,
            DragOutcome::Deleted { .. } => ScheduleField::UNSCHEDULED,
        }
    }

    pub fn changed(&self) -> bool {
        match self {
            DragOutcome::Committed { changed, .. } => *changed,
            DragOutcome::Deleted { previous, .. } => previous.is_scheduled(),
        }
    }
}

/// Live geometry of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub target: ItemPath,
    pub kind: DragKind,
    pub left: f32,
    pub width: f32,
    pub live: Schedule,
    pub delete_armed: bool,
}

/// Owns the one gesture that may be in flight.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Start a gesture. `clicked_column` is the visual column under the
    /// pointer and is only consulted for [`DragKind::Create`].
    pub fn pointer_down(
        &mut self,
        kind: DragKind,
        target: ItemPath,
        stored: ScheduleField,
        pointer_x: f32,
        clicked_column: Option<i64>,
        timeline: &Timeline,
    ) -> Result<(), GestureRejected> {
        if self.session.is_some() {
            return Err(GestureRejected::AlreadyDragging);
        }

        let session = match kind {
            DragKind::Create => {
                if stored.is_scheduled() {
                    return Err(GestureRejected::AlreadyScheduled);
                }
                let column = clicked_column.ok_or(GestureRejected::NoColumn)?;
                let index = timeline
                    .maps()
                    .visual_to_calendar(column)
                    .ok_or(GestureRejected::NoColumn)?;
                let start = timeline.calendar().date_at(index as i64);
                let original = Schedule::new(start, timeline.resolve_duration(start, 1));
                let column = column as usize;
                DragSession::new(kind, target, pointer_x, stored, original, column, column + 1)
            }
            DragKind::Move | DragKind::ResizeLeft | DragKind::ResizeRight => {
                let original = stored.get().ok_or(GestureRejected::Unscheduled)?;
                let (start, end) = timeline
                    .visual_range(&stored)
                    .ok_or(GestureRejected::Unscheduled)?;
                DragSession::new(kind, target, pointer_x, stored, original, start, end)
            }
        };

        tracing::debug!(
            kind = kind.label(),
            task = %target.task,
            subitem = ?target.subitem,
            x = pointer_x,
            "drag started"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Feed a pointer position. Ignored when no gesture is active.
    pub fn pointer_move(&mut self, pointer_x: f32, timeline: &Timeline) {
        self.session = self
            .session
            .take()
            .map(|session| session.update(pointer_x, timeline));
    }

    /// Finish the gesture with whatever the last move computed.
    pub fn pointer_up(&mut self) -> Option<DragOutcome> {
        let outcome = self.session.take()?.finish();
        tracing::debug!(?outcome, "drag released");
        Some(outcome)
    }

    pub fn preview(&self, timeline: &Timeline) -> Option<DragPreview> {
        let session = self.session.as_ref()?;
        let w = timeline.column_width();
        let (start, end) = session.live_columns();
        Some(DragPreview {
            target: session.target,
            kind: session.kind,
            left: start as f32 * w,
            width: ((end - start) as f32 * w).max(w),
            live: session.live,
            delete_armed: session.delete_armed,
        })
    }
}
