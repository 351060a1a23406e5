//! On-disk shape of a board.
//!
//! Schedules are read leniently: older files stored `start` as a day offset
//! from the anchor date, and hand-edited files may contain anything. Every
//! value is normalized into a [`ScheduleField`] on the way in; whatever cannot
//! be understood becomes unscheduled.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::schedule::parse_date_key;
use crate::model::{Board, Group, ItemPath, ScheduleField, Subitem, Task};
use crate::timeline::duration::MAX_RESOLVE_DAYS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDocument {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<GroupDocument>,
    #[serde(default)]
    pub tasks: Vec<TaskDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDocument {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub task_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub schedule: RawSchedule,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub subitems: Vec<SubitemDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubitemDocument {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub schedule: RawSchedule,
}

/// A schedule as found on disk, before normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSchedule {
    #[serde(default)]
    pub start: Option<RawStart>,
    #[serde(default)]
    pub duration: Option<RawDuration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStart {
    /// `"2026-10-16"`, or a legacy offset written as a string.
    Key(String),
    /// Legacy: days from the anchor date.
    Offset(i64),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Days(i64),
    Fractional(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawStart {
    fn resolve(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self {
            RawStart::Key(key) => parse_date_key(key)
                .or_else(|| key.trim().parse::<i64>().ok().and_then(|o| offset_date(anchor, o))),
            RawStart::Offset(offset) => offset_date(anchor, *offset),
            RawStart::Other(_) => None,
        }
    }
}

impl RawDuration {
    fn days(&self) -> Option<u32> {
        match self {
            RawDuration::Days(days) => u32::try_from(*days).ok(),
            RawDuration::Fractional(days) if days.is_finite() && *days >= 0.0 => {
                Some(days.round().min(f64::from(u32::MAX)) as u32)
            }
            RawDuration::Fractional(_) => None,
            RawDuration::Text(text) => text.trim().parse::<u32>().ok(),
            RawDuration::Other(_) => None,
        }
    }
}

fn offset_date(anchor: NaiveDate, offset: i64) -> Option<NaiveDate> {
    anchor.checked_add_signed(Duration::try_days(offset)?)
}

impl RawSchedule {
    /// The canonical on-disk form of a field.
    pub fn canonical(field: &ScheduleField) -> Self {
        match field.get() {
            Some(schedule) => Self {
                start: Some(RawStart::Key(schedule.start_key())),
                duration: Some(RawDuration::Days(i64::from(schedule.duration()))),
            },
            None => Self::default(),
        }
    }

    /// Read a raw value as a schedule. An unreadable start means unscheduled;
    /// a readable start with a missing, unreadable, zero or oversized
    /// duration gets one day. A range running past the last representable
    /// date is unscheduled. Normalizing a canonical value gives the same
    /// field back.
    pub fn normalize(&self, anchor: NaiveDate) -> ScheduleField {
        let Some(start) = self.start.as_ref().and_then(|s| s.resolve(anchor)) else {
            return ScheduleField::UNSCHEDULED;
        };
        let duration = self
            .duration
            .as_ref()
            .and_then(RawDuration::days)
            .filter(|days| (1..=MAX_RESOLVE_DAYS).contains(days))
            .unwrap_or(1);
        if start
            .checked_add_signed(Duration::days(i64::from(duration)))
            .is_none()
        {
            return ScheduleField::UNSCHEDULED;
        }
        ScheduleField::scheduled(start, duration)
    }

    pub fn is_canonical(&self, anchor: NaiveDate) -> bool {
        *self == Self::canonical(&self.normalize(anchor))
    }
}

impl BoardDocument {
    pub fn from_board(board: &Board) -> Self {
        let groups = board
            .groups()
            .iter()
            .map(|g| GroupDocument {
                id: g.id,
                name: g.name.clone(),
                task_ids: g.task_ids.clone(),
            })
            .collect();
        let tasks = board
            .groups()
            .iter()
            .flat_map(|g| board.ordered_tasks(g.id))
            .map(TaskDocument::from_task)
            .collect();
        Self {
            name: board.name.clone(),
            groups,
            tasks,
        }
    }

    /// Build a board, normalizing every schedule against `anchor`. Also
    /// returns how many schedules were not in canonical form.
    pub fn into_board(self, anchor: NaiveDate) -> (Board, usize) {
        let mut rewritten = 0usize;
        let mut read = |raw: &RawSchedule| {
            if !raw.is_canonical(anchor) {
                rewritten += 1;
            }
            raw.normalize(anchor)
        };

        let groups = self
            .groups
            .into_iter()
            .map(|g| Group {
                id: g.id,
                name: g.name,
                task_ids: g.task_ids,
            })
            .collect();
        let tasks = self
            .tasks
            .into_iter()
            .map(|t| Task {
                id: t.id,
                group_id: t.group_id,
                name: t.name,
                status: t.status,
                job_type: t.job_type,
                schedule: read(&t.schedule),
                collapsed: t.collapsed,
                subitems: t
                    .subitems
                    .into_iter()
                    .map(|s| Subitem {
                        id: s.id,
                        name: s.name,
                        status: s.status,
                        schedule: read(&s.schedule),
                    })
                    .collect(),
            })
            .collect();

        (Board::from_parts(self.name, groups, tasks), rewritten)
    }

    /// Patch one item's schedule. Returns false if the item is unknown.
    pub fn set_schedule(&mut self, path: &ItemPath, schedule: &ScheduleField) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == path.task) else {
            return false;
        };
        let slot = match path.subitem {
            None => &mut task.schedule,
            Some(sub) => match task.subitems.iter_mut().find(|s| s.id == sub) {
                Some(s) => &mut s.schedule,
                None => return false,
            },
        };
        *slot = RawSchedule::canonical(schedule);
        true
    }
}

impl TaskDocument {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            group_id: task.group_id,
            name: task.name.clone(),
            status: task.status.clone(),
            job_type: task.job_type.clone(),
            schedule: RawSchedule::canonical(&task.schedule),
            collapsed: task.collapsed,
            subitems: task
                .subitems
                .iter()
                .map(|s| SubitemDocument {
                    id: s.id,
                    name: s.name.clone(),
                    status: s.status.clone(),
                    schedule: RawSchedule::canonical(&s.schedule),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::policy::TimelinePolicy;
    use crate::timeline::Timeline;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn raw(value: serde_json::Value) -> RawSchedule {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn canonical_values_pass_through() {
        let r = raw(json!({ "start": "2026-10-16", "duration": 4 }));
        assert!(r.is_canonical(anchor()));
        assert_eq!(
            r.normalize(anchor()),
            ScheduleField::scheduled(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), 4)
        );
    }

    #[test]
    fn legacy_offsets_resolve_against_anchor() {
        let expected = ScheduleField::scheduled(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(), 2);
        assert_eq!(raw(json!({ "start": 3, "duration": 2 })).normalize(anchor()), expected);
        assert_eq!(raw(json!({ "start": "3", "duration": "2" })).normalize(anchor()), expected);
        assert!(!raw(json!({ "start": 3, "duration": 2 })).is_canonical(anchor()));
    }

    #[test]
    fn garbage_start_means_unscheduled() {
        for value in [
            json!({ "start": "next tuesday", "duration": 3 }),
            json!({ "start": [1, 2], "duration": 3 }),
            json!({ "start": null, "duration": 3 }),
            json!({ "duration": 3 }),
            json!({}),
            json!({ "start": 9_223_372_036_854_775_807i64, "duration": 1 }),
        ] {
            assert_eq!(raw(value).normalize(anchor()), ScheduleField::UNSCHEDULED);
        }
    }

    #[test]
    fn bad_duration_with_good_start_becomes_one_day() {
        for duration in [json!(null), json!(0), json!(-4), json!("soon"), json!({ "d": 1 })] {
            let field = raw(json!({ "start": "2026-10-12", "duration": duration }));
            assert_eq!(field.normalize(anchor()).duration(), Some(1));
        }
        let field = raw(json!({ "start": "2026-10-12", "duration": 2.6 })).normalize(anchor());
        assert_eq!(field.duration(), Some(3));
    }

    #[test]
    fn oversized_duration_becomes_one_day() {
        for duration in [json!(4_000_000_000u64), json!("4000000000"), json!(1e12), json!(3651)] {
            let field = raw(json!({ "start": "2026-10-12", "duration": duration }));
            assert_eq!(field.normalize(anchor()), ScheduleField::scheduled(anchor(), 1));
        }
        let field = raw(json!({ "start": "2026-10-12", "duration": 3650 })).normalize(anchor());
        assert_eq!(field.duration(), Some(3650));
    }

    #[test]
    fn start_at_the_end_of_the_date_range_is_unscheduled() {
        let to_last_day = (NaiveDate::MAX - anchor()).num_days();
        let last = raw(json!({ "start": to_last_day, "duration": 1 }));
        assert_eq!(last.normalize(anchor()), ScheduleField::UNSCHEDULED);

        let almost = raw(json!({ "start": to_last_day - 1, "duration": 1 }));
        assert_eq!(almost.normalize(anchor()).duration(), Some(1));
    }

    #[test]
    fn loaded_oversized_duration_renders() {
        let doc: BoardDocument = serde_json::from_value(json!({
            "name": "B",
            "groups": [{ "id": Uuid::nil(), "name": "G", "task_ids": [Uuid::from_u128(1)] }],
            "tasks": [{
                "id": Uuid::from_u128(1),
                "group_id": Uuid::nil(),
                "name": "T",
                "schedule": { "start": "2026-10-12", "duration": 4_000_000_000u64 }
            }]
        }))
        .unwrap();
        let (board, rewritten) = doc.into_board(anchor());
        assert_eq!(rewritten, 1);
        let field = board.schedule_of(&ItemPath::task(Uuid::from_u128(1))).unwrap();
        let timeline = Timeline::new(TimelinePolicy::new(anchor()));
        let bar = timeline.bar_geometry(&field).unwrap();
        assert_eq!(bar.width, timeline.column_width());
    }

    #[test]
    fn normalization_is_idempotent() {
        for value in [
            json!({ "start": 5, "duration": "7" }),
            json!({ "start": "bogus" }),
            json!({ "start": "2026-01-31", "duration": 0 }),
        ] {
            let once = raw(value).normalize(anchor());
            let twice = RawSchedule::canonical(&once).normalize(anchor());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn unscheduled_serializes_as_nulls() {
        let canonical = RawSchedule::canonical(&ScheduleField::UNSCHEDULED);
        let value = serde_json::to_value(canonical).unwrap();
        assert_eq!(value, json!({ "start": null, "duration": null }));
    }

    #[test]
    fn document_rebuilds_board_and_counts_rewrites() {
        let mut board = Board::new("Roadmap");
        let group = board.add_group("Q4");
        let task = board.add_task(group, "Launch").unwrap();
        board.add_subitem(task, "Announce").unwrap();
        let mut doc = BoardDocument::from_board(&board);
        doc.tasks[0].subitems[0].schedule = raw(json!({ "start": 1, "duration": 2 }));

        let (rebuilt, rewritten) = doc.into_board(anchor());
        assert_eq!(rewritten, 1);
        let sub = &rebuilt.task(task).unwrap().subitems[0];
        assert_eq!(
            sub.schedule,
            ScheduleField::scheduled(NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(), 2)
        );
        assert_eq!(rebuilt.group(group).unwrap().task_ids, vec![task]);
    }

    #[test]
    fn set_schedule_patches_replica() {
        let mut board = Board::new("B");
        let group = board.add_group("G");
        let task = board.add_task(group, "T").unwrap();
        let mut doc = BoardDocument::from_board(&board);
        let field = ScheduleField::scheduled(anchor(), 5);

        assert!(doc.set_schedule(&ItemPath::task(task), &field));
        assert_eq!(doc.tasks[0].schedule, RawSchedule::canonical(&field));
        assert!(!doc.set_schedule(&ItemPath::subitem(task, Uuid::new_v4()), &field));
        assert!(!doc.set_schedule(&ItemPath::task(Uuid::new_v4()), &field));
    }
}
