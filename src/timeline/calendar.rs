use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::policy::WeekendDays;

/// One calendar day of the generated window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    /// Days from the anchor date (0 = anchor).
    pub calendar_offset: i64,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_weekend: bool,
    pub is_today: bool,
    pub is_month_start: bool,
    /// Set on the first weekday (Monday) of each week only.
    pub week_label: Option<String>,
    pub month_label: String,
}

/// A fixed window of consecutive days around an anchor date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarIndex {
    anchor: NaiveDate,
    past_span: u32,
    days: Vec<Day>,
}

impl CalendarIndex {
    /// Generate `past_span` days before the anchor, the anchor itself, and
    /// `future_span` days after it.
    pub fn generate(
        anchor: NaiveDate,
        past_span: u32,
        future_span: u32,
        weekend: WeekendDays,
    ) -> Self {
        let first = i64::from(past_span);
        let last = i64::from(future_span);
        let days = (-first..=last)
            .map(|offset| make_day(anchor, offset, weekend))
            .collect();
        Self {
            anchor,
            past_span,
            days,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.anchor - Duration::days(i64::from(self.past_span))
    }

    /// Window position of `date`. Negative or `>= len()` when outside.
    pub fn index_of(&self, date: NaiveDate) -> i64 {
        (date - self.first_date()).num_days()
    }

    /// Date at a window position; extrapolates past either end.
    pub fn date_at(&self, index: i64) -> NaiveDate {
        self.first_date() + Duration::days(index)
    }

    /// Window position of the anchor day.
    pub fn today_index(&self) -> usize {
        self.past_span as usize
    }
}

fn make_day(anchor: NaiveDate, offset: i64, weekend: WeekendDays) -> Day {
    let date = anchor + Duration::days(offset);
    let weekday = date.weekday();
    let week_label = (weekday == Weekday::Mon).then(|| week_label(date));
    Day {
        calendar_offset: offset,
        date,
        weekday,
        is_weekend: weekend.contains(weekday),
        is_today: offset == 0,
        is_month_start: date.day() == 1,
        week_label,
        month_label: date.format("%B %Y").to_string(),
    }
}

fn week_label(monday: NaiveDate) -> String {
    let friday = monday + Duration::days(4);
    format!("{} – {}", monday.format("%b %-d"), friday.format("%b %-d"))
}
