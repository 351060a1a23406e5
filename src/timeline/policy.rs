use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const MIN_COLUMN_WIDTH: f32 = 10.0;
pub const MAX_COLUMN_WIDTH: f32 = 100.0;
pub const DEFAULT_COLUMN_WIDTH: f32 = 28.0;
pub const MIN_ROW_HEIGHT: f32 = 20.0;
pub const MAX_ROW_HEIGHT: f32 = 80.0;
pub const DEFAULT_ROW_HEIGHT: f32 = 30.0;
pub const DEFAULT_PAST_SPAN: u32 = 60;
pub const DEFAULT_FUTURE_SPAN: u32 = 365;
/// Largest window on either side of the anchor, in days.
pub const MAX_PAST_SPAN: u32 = 3650;
pub const MAX_FUTURE_SPAN: u32 = 3650;

/// Below this column width the header switches from day numbers to week labels.
pub const COMPACT_COLUMN_WIDTH: f32 = 20.0;

const ZOOM_STEP: f32 = 1.2;

/// The set of weekdays treated as weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekendDays {
    // Indexed by `num_days_from_monday`.
    mask: [bool; 7],
}

impl WeekendDays {
    pub const NONE: WeekendDays = WeekendDays { mask: [false; 7] };

    pub fn from_weekdays(days: &[Weekday]) -> Self {
        let mut mask = [false; 7];
        for day in days {
            mask[day.num_days_from_monday() as usize] = true;
        }
        Self { mask }
    }

    pub fn weekdays(&self) -> Vec<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|d| self.contains(*d))
        .collect()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.mask[day.num_days_from_monday() as usize]
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }
}

impl Default for WeekendDays {
    fn default() -> Self {
        Self::from_weekdays(&[Weekday::Sat, Weekday::Sun])
    }
}

/// Inputs supplied by the surrounding application. A timeline snapshot is
/// computed from one policy value and never observes it changing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePolicy {
    /// The date treated as "today" when generating the window.
    pub anchor: NaiveDate,
    pub show_weekends: bool,
    pub weekend: WeekendDays,
    pub past_span: u32,
    pub future_span: u32,
    /// Pixels per visual column.
    pub column_width: f32,
    pub row_height: f32,
}

impl TimelinePolicy {
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            show_weekends: true,
            weekend: WeekendDays::default(),
            past_span: DEFAULT_PAST_SPAN,
            future_span: DEFAULT_FUTURE_SPAN,
            column_width: DEFAULT_COLUMN_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }

    /// True when switching from `self` to `other` requires regenerating the
    /// calendar and column maps (pixel sizes alone do not).
    pub fn needs_rebuild(&self, other: &TimelinePolicy) -> bool {
        self.anchor != other.anchor
            || self.show_weekends != other.show_weekends
            || self.weekend != other.weekend
            || self.past_span != other.past_span
            || self.future_span != other.future_span
    }

    /// Clamp pixel sizes and window spans into their supported ranges.
    pub fn sanitized(mut self) -> Self {
        self.column_width = clamp_column_width(self.column_width);
        self.row_height = clamp_row_height(self.row_height);
        self.past_span = self.past_span.min(MAX_PAST_SPAN);
        self.future_span = self.future_span.min(MAX_FUTURE_SPAN);
        self.anchor = clamp_anchor(self.anchor);
        self
    }

    /// Zoom in (widen columns).
    pub fn zoom_in(&mut self) {
        self.column_width = clamp_column_width(self.column_width * ZOOM_STEP);
    }

    /// Zoom out (narrow columns).
    pub fn zoom_out(&mut self) {
        self.column_width = clamp_column_width(self.column_width / ZOOM_STEP);
    }

    pub fn is_compact(&self) -> bool {
        self.column_width < COMPACT_COLUMN_WIDTH
    }
}

/// Keep the anchor far enough from the ends of the date range that the
/// widest window and its resolved durations stay representable.
pub fn clamp_anchor(anchor: NaiveDate) -> NaiveDate {
    let margin = Duration::days(2 * i64::from(MAX_PAST_SPAN + MAX_FUTURE_SPAN));
    anchor.clamp(NaiveDate::MIN + margin, NaiveDate::MAX - margin)
}

pub fn clamp_column_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
    } else {
        DEFAULT_COLUMN_WIDTH
    }
}

pub fn clamp_row_height(height: f32) -> f32 {
    if height.is_finite() {
        height.clamp(MIN_ROW_HEIGHT, MAX_ROW_HEIGHT)
    } else {
        DEFAULT_ROW_HEIGHT
    }
}
