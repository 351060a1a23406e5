use std::collections::HashMap;

use uuid::Uuid;

use super::item::{Group, ItemPath, Subitem, Task};
use super::schedule::ScheduleField;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("group not found: {0}")]
    GroupNotFound(Uuid),
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),
    #[error("subitem not found: {subitem} (task {task})")]
    SubitemNotFound { task: Uuid, subitem: Uuid },
    #[error("name cannot be empty")]
    EmptyName,
    #[error("subitems have no job type")]
    NoJobType,
}

/// The closed set of field edits an item accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate {
    SetStatus(Option<String>),
    SetJobType(Option<String>),
    SetSchedule(ScheduleField),
    Rename(String),
}

/// A scheduling board: tasks live in an arena keyed by id, groups hold the
/// display order as plain id lists.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub name: String,
    groups: Vec<Group>,
    tasks: HashMap<Uuid, Task>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Assemble a board from already-built parts. Tasks not referenced by
    /// their group's order list are appended to it; dangling ids are dropped.
    pub fn from_parts(name: impl Into<String>, mut groups: Vec<Group>, tasks: Vec<Task>) -> Self {
        let mut arena: HashMap<Uuid, Task> = HashMap::with_capacity(tasks.len());
        for task in tasks {
            arena.insert(task.id, task);
        }
        let mut orphans: Vec<&Task> = Vec::new();
        for group in &mut groups {
            group
                .task_ids
                .retain(|id| arena.get(id).is_some_and(|t| t.group_id == group.id));
        }
        for task in arena.values() {
            let listed = groups
                .iter()
                .any(|g| g.id == task.group_id && g.task_ids.contains(&task.id));
            if !listed {
                orphans.push(task);
            }
        }
        let mut orphan_ids: Vec<(Uuid, Uuid)> =
            orphans.iter().map(|t| (t.group_id, t.id)).collect();
        orphan_ids.sort();
        let mut dropped = Vec::new();
        for (group_id, task_id) in orphan_ids {
            match groups.iter_mut().find(|g| g.id == group_id) {
                Some(group) => group.task_ids.push(task_id),
                None => dropped.push(task_id),
            }
        }
        for id in dropped {
            tracing::warn!(task = %id, "dropping task that references a missing group");
            arena.remove(&id);
        }
        Self {
            name: name.into(),
            groups,
            tasks: arena,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: Uuid) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Tasks of a group in display order.
    pub fn ordered_tasks(&self, group: Uuid) -> impl Iterator<Item = &Task> {
        self.group(group)
            .map(|g| g.task_ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.tasks.get(id))
    }

    pub fn contains(&self, path: &ItemPath) -> bool {
        self.schedule_of(path).is_some()
    }

    pub fn schedule_of(&self, path: &ItemPath) -> Option<ScheduleField> {
        let task = self.tasks.get(&path.task)?;
        match path.subitem {
            None => Some(task.schedule),
            Some(sub) => task.subitem(sub).map(|s| s.schedule),
        }
    }

    pub fn name_of(&self, path: &ItemPath) -> Option<&str> {
        let task = self.tasks.get(&path.task)?;
        match path.subitem {
            None => Some(task.name.as_str()),
            Some(sub) => task.subitem(sub).map(|s| s.name.as_str()),
        }
    }

    // ── Typed mutations ─────────────────────────────────────────

    /// Apply one field edit to the item at `path`. The whole edit lands or
    /// nothing does.
    pub fn apply(&mut self, path: &ItemPath, update: ItemUpdate) -> Result<(), BoardError> {
        if let ItemUpdate::Rename(name) = &update {
            if name.trim().is_empty() {
                return Err(BoardError::EmptyName);
            }
        }
        let task = self
            .tasks
            .get_mut(&path.task)
            .ok_or(BoardError::TaskNotFound(path.task))?;

        match path.subitem {
            None => match update {
                ItemUpdate::SetStatus(status) => task.status = status,
                ItemUpdate::SetJobType(job_type) => task.job_type = job_type,
                ItemUpdate::SetSchedule(schedule) => task.schedule = schedule,
                ItemUpdate::Rename(name) => task.name = name.trim().to_string(),
            },
            Some(sub_id) => {
                let sub = task.subitem_mut(sub_id).ok_or(BoardError::SubitemNotFound {
                    task: path.task,
                    subitem: sub_id,
                })?;
                match update {
                    ItemUpdate::SetStatus(status) => sub.status = status,
                    ItemUpdate::SetJobType(_) => return Err(BoardError::NoJobType),
                    ItemUpdate::SetSchedule(schedule) => sub.schedule = schedule,
                    ItemUpdate::Rename(name) => sub.name = name.trim().to_string(),
                }
            }
        }
        Ok(())
    }

    pub fn set_schedule(
        &mut self,
        path: &ItemPath,
        schedule: ScheduleField,
    ) -> Result<(), BoardError> {
        self.apply(path, ItemUpdate::SetSchedule(schedule))
    }

    pub fn toggle_collapsed(&mut self, task: Uuid) -> Result<bool, BoardError> {
        let task = self.tasks.get_mut(&task).ok_or(BoardError::TaskNotFound(task))?;
        task.collapsed = !task.collapsed;
        Ok(task.collapsed)
    }

    // ── Structure ───────────────────────────────────────────────

    pub fn add_group(&mut self, name: impl Into<String>) -> Uuid {
        let group = Group::new(name);
        let id = group.id;
        self.groups.push(group);
        id
    }

    pub fn add_task(&mut self, group: Uuid, name: impl Into<String>) -> Result<Uuid, BoardError> {
        let group_ref = self
            .groups
            .iter_mut()
            .find(|g| g.id == group)
            .ok_or(BoardError::GroupNotFound(group))?;
        let task = Task::new(group, name);
        let id = task.id;
        group_ref.task_ids.push(id);
        self.tasks.insert(id, task);
        Ok(id)
    }

    pub fn add_subitem(&mut self, task: Uuid, name: impl Into<String>) -> Result<Uuid, BoardError> {
        let task = self.tasks.get_mut(&task).ok_or(BoardError::TaskNotFound(task))?;
        let sub = Subitem::new(name);
        let id = sub.id;
        task.subitems.push(sub);
        Ok(id)
    }

    /// Remove a task together with its subitems.
    pub fn remove_task(&mut self, id: Uuid) -> Result<Task, BoardError> {
        let task = self.tasks.remove(&id).ok_or(BoardError::TaskNotFound(id))?;
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == task.group_id) {
            group.task_ids.retain(|t| *t != id);
        }
        Ok(task)
    }

    pub fn remove_subitem(&mut self, task: Uuid, subitem: Uuid) -> Result<Subitem, BoardError> {
        let owner = self.tasks.get_mut(&task).ok_or(BoardError::TaskNotFound(task))?;
        let pos = owner
            .subitems
            .iter()
            .position(|s| s.id == subitem)
            .ok_or(BoardError::SubitemNotFound { task, subitem })?;
        Ok(owner.subitems.remove(pos))
    }

    /// Move a task to `index` within `group` (clamped to the group's length).
    pub fn move_task(&mut self, task: Uuid, group: Uuid, index: usize) -> Result<(), BoardError> {
        if !self.groups.iter().any(|g| g.id == group) {
            return Err(BoardError::GroupNotFound(group));
        }
        let entry = self.tasks.get_mut(&task).ok_or(BoardError::TaskNotFound(task))?;
        let from = entry.group_id;
        entry.group_id = group;

        if let Some(source) = self.groups.iter_mut().find(|g| g.id == from) {
            source.task_ids.retain(|t| *t != task);
        }
        if let Some(target) = self.groups.iter_mut().find(|g| g.id == group) {
            let at = index.min(target.task_ids.len());
            target.task_ids.insert(at, task);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn board_with_task() -> (Board, Uuid, Uuid) {
        let mut board = Board::new("Test");
        let group = board.add_group("Sprint");
        let task = board.add_task(group, "Write docs").unwrap();
        (board, group, task)
    }

    #[test]
    fn new_items_start_unscheduled() {
        let (mut board, _, task) = board_with_task();
        let sub = board.add_subitem(task, "Outline").unwrap();
        assert_eq!(board.schedule_of(&ItemPath::task(task)), Some(ScheduleField::UNSCHEDULED));
        assert_eq!(
            board.schedule_of(&ItemPath::subitem(task, sub)),
            Some(ScheduleField::UNSCHEDULED)
        );
    }

    #[test]
    fn set_schedule_on_subitem() {
        let (mut board, _, task) = board_with_task();
        let sub = board.add_subitem(task, "Outline").unwrap();
        let path = ItemPath::subitem(task, sub);
        let field = ScheduleField::scheduled(NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(), 3);
        board.set_schedule(&path, field).unwrap();
        assert_eq!(board.schedule_of(&path), Some(field));
        assert_eq!(board.task(task).unwrap().schedule, ScheduleField::UNSCHEDULED);
    }

    #[test]
    fn rename_rejects_blank_names() {
        let (mut board, _, task) = board_with_task();
        let err = board
            .apply(&ItemPath::task(task), ItemUpdate::Rename("   ".into()))
            .unwrap_err();
        assert_eq!(err, BoardError::EmptyName);
        assert_eq!(board.task(task).unwrap().name, "Write docs");
    }

    #[test]
    fn subitems_reject_job_type() {
        let (mut board, _, task) = board_with_task();
        let sub = board.add_subitem(task, "Outline").unwrap();
        let err = board
            .apply(&ItemPath::subitem(task, sub), ItemUpdate::SetJobType(Some("Design".into())))
            .unwrap_err();
        assert_eq!(err, BoardError::NoJobType);
    }

    #[test]
    fn missing_items_are_reported() {
        let (mut board, _, task) = board_with_task();
        let ghost = Uuid::new_v4();
        assert_eq!(
            board.apply(&ItemPath::task(ghost), ItemUpdate::SetStatus(None)),
            Err(BoardError::TaskNotFound(ghost))
        );
        assert_eq!(
            board.apply(&ItemPath::subitem(task, ghost), ItemUpdate::SetStatus(None)),
            Err(BoardError::SubitemNotFound { task, subitem: ghost })
        );
    }

    #[test]
    fn move_task_splices_id_lists() {
        let (mut board, first, a) = board_with_task();
        let b = board.add_task(first, "B").unwrap();
        let second = board.add_group("Backlog");
        let c = board.add_task(second, "C").unwrap();

        board.move_task(b, second, 0).unwrap();
        assert_eq!(board.group(first).unwrap().task_ids, vec![a]);
        assert_eq!(board.group(second).unwrap().task_ids, vec![b, c]);
        assert_eq!(board.task(b).unwrap().group_id, second);

        board.move_task(a, second, 99).unwrap();
        assert_eq!(board.group(second).unwrap().task_ids, vec![b, c, a]);
        assert!(board.group(first).unwrap().task_ids.is_empty());
    }

    #[test]
    fn reorder_within_group() {
        let (mut board, group, a) = board_with_task();
        let b = board.add_task(group, "B").unwrap();
        board.move_task(b, group, 0).unwrap();
        let names: Vec<_> = board.ordered_tasks(group).map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "Write docs"]);
        assert_eq!(board.group(group).unwrap().task_ids, vec![b, a]);
    }

    #[test]
    fn remove_task_drops_subitems_and_order_entry() {
        let (mut board, group, task) = board_with_task();
        board.add_subitem(task, "Outline").unwrap();
        let removed = board.remove_task(task).unwrap();
        assert_eq!(removed.subitems.len(), 1);
        assert!(board.group(group).unwrap().task_ids.is_empty());
        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn from_parts_repairs_order_lists() {
        let mut group = Group::new("G");
        let listed = Task::new(group.id, "listed");
        let unlisted = Task::new(group.id, "unlisted");
        let stray = Task::new(Uuid::new_v4(), "stray");
        group.task_ids = vec![listed.id, Uuid::new_v4()];
        let group_id = group.id;

        let tasks = vec![listed.clone(), unlisted.clone(), stray];
        let board = Board::from_parts("B", vec![group], tasks);
        assert_eq!(board.group(group_id).unwrap().task_ids, vec![listed.id, unlisted.id]);
        assert_eq!(board.task_count(), 2);
    }
}
