use chrono::{Duration, NaiveDate};

/// Canonical date-key format used for schedule starts.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A concrete occupied date range: `duration` calendar days starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Schedule {
    start: NaiveDate,
    duration: u32,
}

impl Schedule {
    /// Build a schedule, flooring the duration at one day.
    pub fn new(start: NaiveDate, duration: u32) -> Self {
        Self {
            start,
            duration: duration.max(1),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// First day after the range (exclusive end). Saturates at the last
    /// representable date.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.start
            .checked_add_signed(Duration::days(i64::from(self.duration)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Last day covered by the range.
    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive().pred_opt().unwrap_or(self.start).max(self.start)
    }

    pub fn start_key(&self) -> String {
        self.start.format(DATE_KEY_FORMAT).to_string()
    }
}

/// The `(start, duration)` value owned by a task or subitem.
///
/// Either both halves are present or neither is, and a present duration is
/// always at least one day. Both rules are carried by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScheduleField(Option<Schedule>);

impl ScheduleField {
    pub const UNSCHEDULED: ScheduleField = ScheduleField(None);

    pub fn scheduled(start: NaiveDate, duration: u32) -> Self {
        Self(Some(Schedule::new(start, duration)))
    }

    pub fn get(&self) -> Option<Schedule> {
        self.0
    }

    pub fn is_scheduled(&self) -> bool {
        self.0.is_some()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.0.map(|s| s.start)
    }

    pub fn duration(&self) -> Option<u32> {
        self.0.map(|s| s.duration)
    }

    /// Nullable pair view, as stored on disk.
    pub fn to_parts(&self) -> (Option<String>, Option<u32>) {
        match self.0 {
            Some(s) => (Some(s.start_key()), Some(s.duration)),
            None => (None, None),
        }
    }
}

impl From<Schedule> for ScheduleField {
    fn from(schedule: Schedule) -> Self {
        Self(Some(schedule))
    }
}

/// Parse a canonical date-key.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).ok()
}
