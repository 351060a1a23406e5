//! User settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::file::StoreError;
use crate::timeline::policy::{self, TimelinePolicy, WeekendDays};

const APP_NAME: &str = "RustScheduleBoard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Anchor ("today") of the calendar window. `None` follows the clock.
    pub anchor_date: Option<NaiveDate>,
    pub show_weekends: bool,
    /// Pixels per visual column.
    pub column_width: f32,
    pub row_height: f32,
    pub past_span: u32,
    pub future_span: u32,
    pub weekend_days: Vec<Weekday>,
    /// Board document location. `None` uses `board.json` in the data dir.
    pub board_file: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            anchor_date: None,
            show_weekends: true,
            column_width: policy::DEFAULT_COLUMN_WIDTH,
            row_height: policy::DEFAULT_ROW_HEIGHT,
            past_span: policy::DEFAULT_PAST_SPAN,
            future_span: policy::DEFAULT_FUTURE_SPAN,
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            board_file: None,
        }
    }
}

impl AppSettings {
    /// Default settings file location.
    pub fn default_path() -> PathBuf {
        config_dir().join("settings.json")
    }

    /// Load settings. Never fails: unreadable or malformed files fall back
    /// to defaults with a warning.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read settings");
                return Self::default();
            }
        };
        match serde_json::from_str::<AppSettings>(&text) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn sanitized(mut self) -> Self {
        self.column_width = policy::clamp_column_width(self.column_width);
        self.row_height = policy::clamp_row_height(self.row_height);
        self.past_span = self.past_span.min(policy::MAX_PAST_SPAN);
        self.future_span = self.future_span.min(policy::MAX_FUTURE_SPAN);
        self.weekend_days.sort_by_key(|d| d.num_days_from_monday());
        self.weekend_days.dedup();
        self
    }

    pub fn board_path(&self) -> PathBuf {
        self.board_file
            .clone()
            .unwrap_or_else(|| data_dir().join("board.json"))
    }

    /// Timeline policy for these settings, anchored at `today` unless an
    /// anchor date is pinned.
    pub fn policy(&self, today: NaiveDate) -> TimelinePolicy {
        TimelinePolicy {
            anchor: self.anchor_date.unwrap_or(today),
            show_weekends: self.show_weekends,
            weekend: WeekendDays::from_weekdays(&self.weekend_days),
            past_span: self.past_span,
            future_span: self.future_span,
            column_width: self.column_width,
            row_height: self.row_height,
        }
        .sanitized()
    }

    /// Copy the user-adjustable parts of a policy back into the settings.
    pub fn absorb(&mut self, policy: &TimelinePolicy, pinned_anchor: Option<NaiveDate>) {
        self.anchor_date = pinned_anchor;
        self.show_weekends = policy.show_weekends;
        self.column_width = policy.column_width;
        self.row_height = policy.row_height;
        self.weekend_days = policy.weekend.weekdays();
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

fn config_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(AppSettings::load(&tmp.path().join("nope.json")), AppSettings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert_eq!(AppSettings::load(&path), AppSettings::default());
    }

    #[test]
    fn partial_file_fills_defaults_and_clamps() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{ "show_weekends": false, "column_width": 500.0 }"#).unwrap();
        let settings = AppSettings::load(&path);
        assert!(!settings.show_weekends);
        assert_eq!(settings.column_width, policy::MAX_COLUMN_WIDTH);
        assert_eq!(settings.past_span, policy::DEFAULT_PAST_SPAN);
    }

    #[test]
    fn oversized_spans_are_clamped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{ "past_span": 4000000000, "future_span": 99999 }"#).unwrap();
        let settings = AppSettings::load(&path);
        assert_eq!(settings.past_span, policy::MAX_PAST_SPAN);
        assert_eq!(settings.future_span, policy::MAX_FUTURE_SPAN);

        let anchor = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let timeline = crate::timeline::Timeline::new(settings.policy(anchor));
        let days = (policy::MAX_PAST_SPAN + 1 + policy::MAX_FUTURE_SPAN) as usize;
        assert_eq!(timeline.calendar().len(), days);
    }

    #[test]
    fn save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg/settings.json");
        let settings = AppSettings {
            anchor_date: NaiveDate::from_ymd_opt(2026, 10, 12),
            show_weekends: false,
            weekend_days: vec![Weekday::Fri, Weekday::Sat],
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path), settings);
    }

    #[test]
    fn pinned_anchor_wins_over_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let pinned = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let settings = AppSettings {
            anchor_date: Some(pinned),
            ..Default::default()
        };
        assert_eq!(settings.policy(today).anchor, pinned);
        assert_eq!(AppSettings::default().policy(today).anchor, today);
    }
}
