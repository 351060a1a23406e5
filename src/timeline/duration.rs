use chrono::{Duration, NaiveDate};

use super::policy::WeekendDays;

/// Upper bound on days walked while resolving a duration (about ten years).
pub const MAX_RESOLVE_DAYS: u32 = 3650;

/// Convert a span of visible columns into a calendar duration starting at
/// `start`.
///
/// Walks forward day by day, counting only days that are visible under the
/// current weekend policy, until `desired_visible_span` visible days are
/// covered. If the ceiling is hit first (every day hidden, or an absurd span),
/// the duration up to the last visible day counted is returned instead. The
/// result is never below 1.
pub fn resolve_duration(
    start: NaiveDate,
    desired_visible_span: u32,
    show_weekends: bool,
    weekend: WeekendDays,
) -> u32 {
    let wanted = desired_visible_span.max(1);
    if show_weekends {
        return wanted;
    }

    let mut visible = 0u32;
    let mut best = 1u32;
    for walked in 0..MAX_RESOLVE_DAYS {
        let Some(date) = start.checked_add_signed(Duration::days(i64::from(walked))) else {
            break;
        };
        if !weekend.is_weekend(date) {
            visible += 1;
            best = walked + 1;
            if visible == wanted {
                return best;
            }
        }
    }
    tracing::debug!(%start, wanted, visible, "duration walk hit ceiling");
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Number of visible days covered by `duration` days from `start`, floored at 1.
    fn visible_span(
        start: NaiveDate,
        duration: u32,
        show_weekends: bool,
        weekend: WeekendDays,
    ) -> u32 {
        if show_weekends {
            return duration.max(1);
        }
        let count = (0..duration.min(MAX_RESOLVE_DAYS))
            .filter(|d| !weekend.is_weekend(start + Duration::days(i64::from(*d))))
            .count() as u32;
        count.max(1)
    }

    #[test]
    fn friday_plus_two_visible_days_spans_the_weekend() {
        let friday = date(2026, 10, 16);
        assert_eq!(resolve_duration(friday, 2, false, WeekendDays::default()), 4);
    }

    #[test]
    fn weekends_shown_maps_columns_to_days() {
        let friday = date(2026, 10, 16);
        assert_eq!(resolve_duration(friday, 2, true, WeekendDays::default()), 2);
        assert_eq!(resolve_duration(friday, 4, true, WeekendDays::default()), 4);
    }

    #[test]
    fn zero_span_is_treated_as_one() {
        let monday = date(2026, 10, 12);
        assert_eq!(resolve_duration(monday, 0, false, WeekendDays::default()), 1);
        assert_eq!(resolve_duration(monday, 0, true, WeekendDays::default()), 1);
    }

    #[test]
    fn hidden_start_day_walks_to_first_visible_day() {
        let saturday = date(2026, 10, 17);
        assert_eq!(resolve_duration(saturday, 1, false, WeekendDays::default()), 3);
    }

    #[test]
    fn two_full_weeks() {
        let monday = date(2026, 10, 12);
        assert_eq!(resolve_duration(monday, 10, false, WeekendDays::default()), 12);
    }

    #[test]
    fn all_hidden_days_hit_ceiling_and_floor_at_one() {
        let everything = WeekendDays::from_weekdays(&[
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]);
        assert_eq!(resolve_duration(date(2026, 1, 1), 3, false, everything), 1);
    }

    #[test]
    fn oversized_span_returns_best_reached() {
        let monday = date(2026, 10, 12);
        let got = resolve_duration(monday, u32::MAX, false, WeekendDays::default());
        assert!(got <= MAX_RESOLVE_DAYS);
        assert!(got > MAX_RESOLVE_DAYS - 3);
        let again = resolve_duration(monday, u32::MAX, false, WeekendDays::default());
        assert_eq!(got, again);
    }

    #[test]
    fn visible_span_inverts_resolution() {
        let friday = date(2026, 10, 16);
        for span in 1..15 {
            let duration = resolve_duration(friday, span, false, WeekendDays::default());
            assert_eq!(visible_span(friday, duration, false, WeekendDays::default()), span);
        }
    }
}
