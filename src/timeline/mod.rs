//! Calendar timeline: the day window, its visual column mapping, and the
//! pixel geometry the chart renders from.

pub mod calendar;
pub mod columns;
pub mod drag;
pub mod duration;
pub mod lanes;
pub mod policy;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::ScheduleField;
use calendar::{CalendarIndex, Day};
use columns::VisualIndexMaps;
use lanes::LaneRange;
use policy::TimelinePolicy;

pub use drag::{DragController, DragKind, DragOutcome, DragPreview, DragSession, GestureRejected};
pub use lanes::LanePacking;
pub use policy::WeekendDays;

/// Pixel geometry of a scheduled bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
    pub start_column: usize,
    /// Exclusive.
    pub end_column: usize,
    /// True when the whole range lies outside the generated window.
    pub clipped: bool,
}

impl BarGeometry {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// An immutable snapshot of the calendar window and its column maps.
///
/// Policy changes build a new snapshot; nothing is patched in place.
#[derive(Debug, Clone)]
pub struct Timeline {
    policy: TimelinePolicy,
    calendar: CalendarIndex,
    maps: VisualIndexMaps,
}

impl Timeline {
    pub fn new(policy: TimelinePolicy) -> Self {
        let policy = policy.sanitized();
        let calendar = CalendarIndex::generate(
            policy.anchor,
            policy.past_span,
            policy.future_span,
            policy.weekend,
        );
        let maps = VisualIndexMaps::build(calendar.days(), policy.show_weekends);
        tracing::debug!(
            anchor = %policy.anchor,
            show_weekends = policy.show_weekends,
            days = calendar.len(),
            columns = maps.visible_columns(),
            "timeline rebuilt"
        );
        Self {
            policy,
            calendar,
            maps,
        }
    }

    /// Snapshot for a new policy. Reuses the day window and maps when only
    /// pixel sizes changed.
    pub fn with_policy(&self, policy: TimelinePolicy) -> Self {
        if self.policy.needs_rebuild(&policy) {
            Self::new(policy)
        } else {
            Self {
                policy: policy.sanitized(),
                calendar: self.calendar.clone(),
                maps: self.maps.clone(),
            }
        }
    }

    pub fn policy(&self) -> &TimelinePolicy {
        &self.policy
    }

    pub fn calendar(&self) -> &CalendarIndex {
        &self.calendar
    }

    pub fn maps(&self) -> &VisualIndexMaps {
        &self.maps
    }

    pub fn column_width(&self) -> f32 {
        self.policy.column_width
    }

    pub fn row_height(&self) -> f32 {
        self.policy.row_height
    }

    pub fn show_weekends(&self) -> bool {
        self.policy.show_weekends
    }

    pub fn visible_columns(&self) -> usize {
        self.maps.visible_columns()
    }

    pub fn total_width(&self) -> f32 {
        self.visible_columns() as f32 * self.column_width()
    }

    // ── Lookups ─────────────────────────────────────────────────

    /// Visual column of a date; dates outside the window clamp.
    pub fn column_of(&self, date: NaiveDate) -> usize {
        self.maps.calendar_to_visual(self.calendar.index_of(date))
    }

    /// Date shown by a visual column, clamped to the visible range.
    pub fn date_at_column(&self, column: i64) -> Option<NaiveDate> {
        self.maps
            .calendar_index_clamped(column)
            .map(|index| self.calendar.date_at(index as i64))
    }

    /// Column under an x offset from the chart's left edge.
    pub fn column_at_x(&self, x: f32) -> i64 {
        (x / self.column_width()).floor() as i64
    }

    pub fn column_x(&self, column: usize) -> f32 {
        column as f32 * self.column_width()
    }

    /// Calendar duration covering `visible_span` columns from `start`.
    pub fn resolve_duration(&self, start: NaiveDate, visible_span: u32) -> u32 {
        duration::resolve_duration(
            start,
            visible_span,
            self.policy.show_weekends,
            self.policy.weekend,
        )
    }

    /// `(start, end)` visual columns of a schedule, end exclusive.
    pub fn visual_range(&self, field: &ScheduleField) -> Option<(usize, usize)> {
        let schedule = field.get()?;
        let start = self.column_of(schedule.start());
        let end = self.column_of(schedule.end_exclusive());
        Some((start, end))
    }

    /// Bar placement for a schedule; `None` when unscheduled.
    pub fn bar_geometry(&self, field: &ScheduleField) -> Option<BarGeometry> {
        let schedule = field.get()?;
        let (start, end) = self.visual_range(field)?;
        let w = self.column_width();
        let width = ((end.saturating_sub(start)) as f32 * w).max(w);
        let first = self.calendar.index_of(schedule.start());
        let after = self.calendar.index_of(schedule.end_exclusive());
        Some(BarGeometry {
            left: start as f32 * w,
            width,
            start_column: start,
            end_column: end.max(start + 1),
            clipped: after <= 0 || first >= self.calendar.len() as i64,
        })
    }

    /// Lane ranges for a set of items, skipping unscheduled ones.
    pub fn lane_ranges<'a>(
        &self,
        items: impl IntoIterator<Item = (Uuid, &'a ScheduleField)>,
    ) -> Vec<LaneRange> {
        items
            .into_iter()
            .filter_map(|(id, field)| {
                let (start, end) = self.visual_range(field)?;
                Some(LaneRange::new(id, start, end))
            })
            .collect()
    }

    // ── Header ──────────────────────────────────────────────────

    /// Visible days with their visual column, in order.
    pub fn header_columns(&self) -> impl Iterator<Item = (usize, &Day)> + '_ {
        (0..self.maps.visible_columns()).filter_map(move |column| {
            let index = self.maps.visual_to_calendar(column as i64)?;
            self.calendar.day(index).map(|day| (column, day))
        })
    }

    /// Column of the anchor day, if it is visible.
    pub fn today_column(&self) -> Option<usize> {
        let index = self.calendar.today_index();
        self.maps
            .is_visible(index)
            .then(|| self.maps.calendar_to_visual(index as i64))
    }

    /// Where to draw the "today" marker. A hidden today falls back to the
    /// closest visible day at most two days earlier.
    pub fn today_marker_column(&self) -> Option<usize> {
        if let Some(column) = self.today_column() {
            return Some(column);
        }
        let today = self.calendar.today_index();
        (1..=2)
            .filter_map(|back| today.checked_sub(back))
            .find(|index| self.maps.is_visible(*index))
            .map(|index| self.maps.calendar_to_visual(index as i64))
    }
}
