use uuid::Uuid;

use super::schedule::ScheduleField;

/// Addresses a schedulable item: a task, or one of its subitems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemPath {
    pub task: Uuid,
    pub subitem: Option<Uuid>,
}

impl ItemPath {
    pub fn task(task: Uuid) -> Self {
        Self { task, subitem: None }
    }

    pub fn subitem(task: Uuid, subitem: Uuid) -> Self {
        Self {
            task,
            subitem: Some(subitem),
        }
    }

    pub fn is_subitem(&self) -> bool {
        self.subitem.is_some()
    }
}

/// A named column of tasks on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    /// Display order of the group's tasks.
    pub task_ids: Vec<Uuid>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            task_ids: Vec::new(),
        }
    }
}

/// A top-level work item. Owns its subitems exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    /// Opaque status label, e.g. "working on it".
    pub status: Option<String>,
    /// Opaque job type label.
    pub job_type: Option<String>,
    pub schedule: ScheduleField,
    /// When collapsed, subitems are drawn stacked inside the task row.
    pub collapsed: bool,
    pub subitems: Vec<Subitem>,
}

impl Task {
    /// Create a new, unscheduled task.
    pub fn new(group_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            name: name.into(),
            status: None,
            job_type: None,
            schedule: ScheduleField::UNSCHEDULED,
            collapsed: false,
            subitems: Vec::new(),
        }
    }

    pub fn subitem(&self, id: Uuid) -> Option<&Subitem> {
        self.subitems.iter().find(|s| s.id == id)
    }

    pub fn subitem_mut(&mut self, id: Uuid) -> Option<&mut Subitem> {
        self.subitems.iter_mut().find(|s| s.id == id)
    }

    pub fn has_subitems(&self) -> bool {
        !self.subitems.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subitem {
    pub id: Uuid,
    pub name: String,
    pub status: Option<String>,
    pub schedule: ScheduleField,
}

impl Subitem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: None,
            schedule: ScheduleField::UNSCHEDULED,
        }
    }
}
