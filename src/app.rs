use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use rust_schedule_board::io::{self, AppSettings, JsonFileStore, StoreError};
use rust_schedule_board::model::{Board, ItemPath, ItemUpdate, ScheduleField};
use rust_schedule_board::timeline::DragOutcome;
use rust_schedule_board::BoardSession;

use crate::ui;

/// What the naming dialog will create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewItem {
    Group,
    Task(Uuid),
    Subitem(Uuid),
}

pub struct NameDialog {
    pub target: NewItem,
    pub name: String,
}

/// Main application state.
pub struct BoardApp {
    pub session: BoardSession<JsonFileStore>,
    pub settings: AppSettings,
    settings_path: PathBuf,
    pub selected: Option<ItemPath>,

    // Dialog state
    pub name_dialog: Option<NameDialog>,
    pub show_about: bool,

    pub scroll_to_today: bool,
    pub status_message: String,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl BoardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings_path = AppSettings::default_path();
        let settings = AppSettings::load(&settings_path);
        let policy = settings.policy(today());
        let board_path = settings.board_path();

        let (board, status_message) = match io::load_board(&board_path, policy.anchor) {
            Ok(board) => (board, format!("Loaded {}", board_path.display())),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                (Self::sample_board(policy.anchor), "New sample board".to_string())
            }
            Err(e) => {
                tracing::warn!(
                    path = %board_path.display(),
                    error = %e,
                    "falling back to sample board"
                );
                (Self::sample_board(policy.anchor), format!("Error loading: {}", e))
            }
        };
        let store = JsonFileStore::new(board_path, &board);

        Self {
            session: BoardSession::new(board, policy, store),
            settings,
            settings_path,
            selected: None,
            name_dialog: None,
            show_about: false,
            scroll_to_today: true,
            status_message,
        }
    }

    /// Generate a sample board for demonstration.
    fn sample_board(today: NaiveDate) -> Board {
        let mut board = Board::new("Sample Board");
        let day = |offset: i64| today + Duration::days(offset);

        let install = board.add_group("Installations");
        let service = board.add_group("Service");

        let entries = [
            (install, "Kitchen refit", Some("Working on it"), Some("Install"), Some((day(-3), 5))),
            (install, "Bathroom tiles", None, Some("Install"), Some((day(2), 4))),
            (install, "Garden office", Some("Stuck"), Some("Build"), Some((day(9), 10))),
            (service, "Boiler check", Some("Done"), Some("Service"), Some((day(-6), 1))),
            (service, "Roof survey", None, None, None),
        ];

        for (group, name, status, job, schedule) in entries {
            let Ok(task) = board.add_task(group, name) else {
                continue;
            };
            let path = ItemPath::task(task);
            let updates = [
                ItemUpdate::SetStatus(status.map(str::to_owned)),
                ItemUpdate::SetJobType(job.map(str::to_owned)),
                ItemUpdate::SetSchedule(match schedule {
                    Some((start, days)) => ScheduleField::scheduled(start, days),
                    None => ScheduleField::UNSCHEDULED,
                }),
            ];
            for update in updates {
                if let Err(e) = board.apply(&path, update) {
                    tracing::warn!(task = name, error = %e, "sample task edit rejected");
                }
            }
        }

        // Subitems for the first task, stacked when the row is collapsed.
        let first_task = board.ordered_tasks(install).next().map(|t| t.id);
        if let Some(kitchen) = first_task {
            let subitems = [("Strip out", -3, 2), ("Electrics", -2, 2), ("Worktops", 0, 2)];
            for (name, start, days) in subitems {
                let seeded = board.add_subitem(kitchen, name).and_then(|sub| {
                    board.set_schedule(
                        &ItemPath::subitem(kitchen, sub),
                        ScheduleField::scheduled(day(start), days),
                    )
                });
                if let Err(e) = seeded {
                    tracing::warn!(subitem = name, error = %e, "sample subitem not seeded");
                }
            }
        }
        board
    }

    // --- File operations ---

    pub fn save_board(&mut self) {
        match self.session.save() {
            Ok(()) => self.status_message = "Board saved".to_string(),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn reload_board(&mut self) {
        let path = self.session.persistence().path().to_path_buf();
        let anchor = self.session.timeline().policy().anchor;
        match io::load_board(&path, anchor) {
            Ok(board) => {
                *self.session.persistence_mut() = JsonFileStore::new(path, &board);
                self.session.replace_board(board);
                self.selected = None;
                self.status_message = "Board reloaded".to_string();
            }
            Err(e) => self.status_message = format!("Error loading: {}", e),
        }
    }

    fn save_settings(&mut self) {
        self.settings
            .absorb(self.session.timeline().policy(), self.settings.anchor_date);
        if let Err(e) = self.settings.save(&self.settings_path) {
            tracing::warn!(
                path = %self.settings_path.display(),
                error = %e,
                "could not save settings"
            );
        }
    }

    /// Call after a policy setter; `applied` is what the setter returned.
    pub fn policy_changed(&mut self, applied: bool) {
        if applied {
            self.save_settings();
        } else if self.session.drag().is_dragging() {
            self.status_message = "Finish the drag before changing the view".to_string();
        }
    }

    /// Pin the anchor date, or follow the clock with `None`.
    pub fn pin_anchor(&mut self, anchor: Option<NaiveDate>) {
        if !self.session.set_anchor(anchor.unwrap_or_else(today)) {
            self.policy_changed(false);
            return;
        }
        self.settings.anchor_date = anchor;
        self.save_settings();
        self.scroll_to_today = true;
    }

    // --- Item operations ---

    pub fn open_name_dialog(&mut self, target: NewItem) {
        self.name_dialog = Some(NameDialog {
            target,
            name: String::new(),
        });
    }

    pub fn create_from_dialog(&mut self) {
        let Some(dialog) = self.name_dialog.take() else {
            return;
        };
        let name = match dialog.name.trim() {
            "" => match dialog.target {
                NewItem::Group => "New Group",
                NewItem::Task(_) => "New Task",
                NewItem::Subitem(_) => "New Subitem",
            },
            name => name,
        }
        .to_string();

        let created = match dialog.target {
            NewItem::Group => {
                self.session.add_group(name.clone());
                Ok(None)
            }
            NewItem::Task(group) => self
                .session
                .add_task(group, name.clone())
                .map(|id| Some(ItemPath::task(id))),
            NewItem::Subitem(task) => self
                .session
                .add_subitem(task, name.clone())
                .map(|id| Some(ItemPath::subitem(task, id))),
        };
        match created {
            Ok(path) => {
                if path.is_some() {
                    self.selected = path;
                }
                self.status_message = format!("Added '{}'", name);
            }
            Err(e) => self.status_message = format!("Could not add: {}", e),
        }
    }

    pub fn update_item(&mut self, path: ItemPath, update: ItemUpdate) {
        if let Err(e) = self.session.update(&path, update) {
            self.status_message = format!("Edit rejected: {}", e);
        }
    }

    pub fn delete_item(&mut self, path: ItemPath) {
        let name = self.session.board().name_of(&path).unwrap_or_default().to_string();
        match self.session.remove(&path) {
            Ok(()) => {
                let lost = self
                    .selected
                    .is_some_and(|s| s.task == path.task && (path.subitem.is_none() || s == path));
                if lost {
                    self.selected = None;
                }
                self.status_message = format!("Deleted '{}'", name);
            }
            Err(e) => self.status_message = format!("Delete failed: {}", e),
        }
    }

    fn report_outcome(&mut self, outcome: DragOutcome) {
        let target = outcome.target();
        let name = self.session.board().name_of(&target).unwrap_or("item").to_string();
        self.selected = Some(target);
        self.status_message = match outcome {
            DragOutcome::Deleted { .. } => format!("Cleared schedule of '{}'", name),
            DragOutcome::Committed { changed: false, .. } => "Timeline unchanged".to_string(),
            DragOutcome::Committed { schedule, .. } => match schedule.get() {
                Some(s) => format!(
                    "Updated '{}' ({} → {}, {}d)",
                    name,
                    s.start().format("%Y-%m-%d"),
                    s.last_day().format("%Y-%m-%d"),
                    s.duration()
                ),
                None => format!("Cleared schedule of '{}'", name),
            },
        };
    }

    fn handle_table_action(&mut self, action: ui::item_table::TableAction) {
        use ui::item_table::TableAction;
        match action {
            TableAction::Select(path) => self.selected = Some(path),
            TableAction::Delete(path) => self.delete_item(path),
            TableAction::AddGroup => self.open_name_dialog(NewItem::Group),
            TableAction::AddTask(group) => self.open_name_dialog(NewItem::Task(group)),
            TableAction::AddSubitem(task) => self.open_name_dialog(NewItem::Subitem(task)),
            TableAction::ToggleCollapse(task) => {
                if let Err(e) = self.session.toggle_collapsed(task) {
                    self.status_message = e.to_string();
                }
            }
            TableAction::None => {}
        }
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_board();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let timeline = self.session.timeline();
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {} · Columns: {} · Weekends {}",
                                self.session.board().task_count(),
                                timeline.visible_columns(),
                                if timeline.show_weekends() { "shown" } else { "hidden" },
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: item editor + table
        let mut table_action = ui::item_table::TableAction::None;
        let mut edit: Option<(ItemPath, ItemUpdate)> = None;
        egui::SidePanel::left("item_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(220.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(path) = self.selected {
                    let anchor = self.session.timeline().policy().anchor;
                    if let Some(update) =
                        ui::item_editor::show_item_editor(self.session.board(), path, anchor, ui)
                    {
                        edit = Some((path, update));
                    }
                    ui.add_space(4.0);
                    ui.separator();
                }
                table_action =
                    ui::item_table::show_item_table(self.session.board(), self.selected, ui);
            });

        if let Some((path, update)) = edit {
            self.update_item(path, update);
        }
        self.handle_table_action(table_action);

        // Central panel: timeline chart
        let scroll_to = if std::mem::take(&mut self.scroll_to_today) {
            ui::timeline_chart::today_x(self.session.timeline())
        } else {
            None
        };
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                let selected = self.selected;
                ui::timeline_chart::show_timeline_chart(&mut self.session, selected, scroll_to, ui)
            })
            .inner;

        if let Some(path) = interaction.selected {
            self.selected = Some(path);
        }
        if let Some(rejected) = interaction.rejected {
            tracing::debug!(%rejected, "pointer-down ignored");
        }
        if let Some(outcome) = interaction.committed {
            self.report_outcome(outcome);
        }
        if interaction.zoomed {
            self.save_settings();
        }

        // Dialogs
        if self.name_dialog.is_some() {
            ui::dialogs::show_name_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_board_is_fully_seeded() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let board = BoardApp::sample_board(today);
        assert_eq!(board.groups().len(), 2);
        assert_eq!(board.task_count(), 5);

        let tasks: Vec<_> = board
            .groups()
            .iter()
            .flat_map(|g| board.ordered_tasks(g.id))
            .collect();
        let scheduled = tasks.iter().filter(|t| t.schedule.is_scheduled()).count();
        assert_eq!(scheduled, 4);

        let kitchen = tasks[0];
        assert_eq!(kitchen.subitems.len(), 3);
        assert!(kitchen.subitems.iter().all(|s| s.schedule.is_scheduled()));
        assert_eq!(kitchen.job_type.as_deref(), Some("Install"));
    }
}
