//! Bidirectional mapping between calendar window positions and the visual
//! columns actually rendered.
//!
//! With weekends hidden, a hidden day has no column of its own. Its forward
//! entry points at the column the next visible day will occupy, so the
//! forward map stays total and monotonic non-decreasing, and a pointer over a
//! hidden day's region resolves to an adjacent real column.

use super::calendar::Day;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisualIndexMaps {
    /// One entry per calendar day of the window.
    calendar_to_visual: Vec<usize>,
    /// One entry per visible column: the window position it shows.
    visual_to_calendar: Vec<usize>,
}

impl VisualIndexMaps {
    /// Build both maps in a single pass over `days`.
    pub fn build(days: &[Day], show_weekends: bool) -> Self {
        let mut calendar_to_visual = Vec::with_capacity(days.len());
        let mut visual_to_calendar = Vec::with_capacity(days.len());
        let mut counter = 0usize;

        for (index, day) in days.iter().enumerate() {
            calendar_to_visual.push(counter);
            if show_weekends || !day.is_weekend {
                visual_to_calendar.push(index);
                counter += 1;
            }
        }

        Self {
            calendar_to_visual,
            visual_to_calendar,
        }
    }

    /// Number of rendered columns.
    pub fn visible_columns(&self) -> usize {
        self.visual_to_calendar.len()
    }

    pub fn calendar_len(&self) -> usize {
        self.calendar_to_visual.len()
    }

    /// Visual column for a window position. Positions before the window
    /// clamp to column 0, positions past it to the end sentinel
    /// `visible_columns()`.
    pub fn calendar_to_visual(&self, index: i64) -> usize {
        if index < 0 {
            return 0;
        }
        self.calendar_to_visual
            .get(index as usize)
            .copied()
            .unwrap_or(self.visible_columns())
    }

    /// Window position shown by a visual column, if that column exists.
    pub fn visual_to_calendar(&self, column: i64) -> Option<usize> {
        if column < 0 {
            return None;
        }
        self.visual_to_calendar.get(column as usize).copied()
    }

    /// Like [`visual_to_calendar`](Self::visual_to_calendar) but clamps to the
    /// first or last visible column. `None` only when nothing is visible.
    pub fn calendar_index_clamped(&self, column: i64) -> Option<usize> {
        let last = self.visible_columns().checked_sub(1)?;
        let column = column.clamp(0, last as i64) as usize;
        Some(self.visual_to_calendar[column])
    }

    /// True when the window position owns a visual column.
    pub fn is_visible(&self, index: usize) -> bool {
        let column = self.calendar_to_visual(index as i64);
        self.visual_to_calendar.get(column) == Some(&index)
    }
}
