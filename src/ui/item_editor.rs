use chrono::NaiveDate;
use egui::{RichText, Ui};
use egui_phosphor::regular as icons;

use rust_schedule_board::model::{Board, ItemPath, ItemUpdate, ScheduleField};
use rust_schedule_board::timeline::duration::MAX_RESOLVE_DAYS;

use crate::ui::theme;

/// Render an inline editor for the selected item. Returns at most one edit.
pub fn show_item_editor(
    board: &Board,
    path: ItemPath,
    today: NaiveDate,
    ui: &mut Ui,
) -> Option<ItemUpdate> {
    let task = board.task(path.task)?;
    let (mut name, mut status, schedule, job_type) = match path.subitem {
        Some(id) => {
            let sub = task.subitem(id)?;
            (sub.name.clone(), sub.status.clone(), sub.schedule, None)
        }
        None => (
            task.name.clone(),
            task.status.clone(),
            task.schedule,
            Some(task.job_type.clone().unwrap_or_default()),
        ),
    };
    let mut update = None;

    ui.add_space(6.0);
    ui.label(
        RichText::new(if path.is_subitem() { "Edit Subitem" } else { "Edit Task" })
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        // ── Name ───────────────────────────────────────────────────────
        field_label(ui, "Name");
        let name_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut name).font(egui::FontId::proportional(12.0)),
        );
        if name_edit.changed() && !name.trim().is_empty() {
            update = Some(ItemUpdate::Rename(name.clone()));
        }

        // ── Status ─────────────────────────────────────────────────────
        field_label(ui, "Status");
        let current = status.clone().unwrap_or_else(|| "None".to_owned());
        egui::ComboBox::from_id_salt("status_combo")
            .selected_text(RichText::new(current).size(11.0))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                if ui.selectable_value(&mut status, None, "None").changed() {
                    update = Some(ItemUpdate::SetStatus(None));
                }
                for label in theme::STATUS_LABELS {
                    let value = Some((*label).to_owned());
                    if ui.selectable_value(&mut status, value.clone(), *label).changed() {
                        update = Some(ItemUpdate::SetStatus(value));
                    }
                }
            });

        // ── Job type (tasks only) ──────────────────────────────────────
        if let Some(mut job) = job_type {
            field_label(ui, "Job Type");
            let edit = ui.add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut job)
                    .hint_text("e.g. Install")
                    .font(egui::FontId::proportional(12.0)),
            );
            if edit.changed() {
                let job = job.trim();
                update = Some(ItemUpdate::SetJobType((!job.is_empty()).then(|| job.to_owned())));
            }
        }

        // ── Schedule ───────────────────────────────────────────────────
        field_label(ui, "Schedule");
        match schedule.get() {
            Some(current) => {
                let mut start = current.start();
                let mut days = current.duration();
                ui.horizontal(|ui| {
                    let picker = egui_extras::DatePickerButton::new(&mut start).id_salt("dp_start");
                    let picked = ui.add(picker);
                    let dragged = ui.add(
                        egui::DragValue::new(&mut days)
                            .range(1..=MAX_RESOLVE_DAYS)
                            .suffix(" d"),
                    );
                    if picked.changed() || dragged.changed() {
                        let field = ScheduleField::scheduled(start, days);
                        update = Some(ItemUpdate::SetSchedule(field));
                    }
                });
                ui.label(
                    RichText::new(format!(
                        "{} {} {}",
                        current.start().format("%Y-%m-%d"),
                        icons::ARROW_RIGHT,
                        current.last_day().format("%Y-%m-%d")
                    ))
                    .size(10.5)
                    .color(theme::TEXT_SECONDARY),
                );
                if ui
                    .button(format!("{}  Clear Schedule", icons::CALENDAR_X))
                    .clicked()
                {
                    update = Some(ItemUpdate::SetSchedule(ScheduleField::UNSCHEDULED));
                }
            }
            None => {
                ui.label(
                    RichText::new("Unscheduled. Drag across the chart row to set dates.")
                        .size(10.5)
                        .color(theme::TEXT_DIM),
                );
                if ui
                    .button(format!("{}  Schedule Today", icons::CALENDAR_PLUS))
                    .clicked()
                {
                    update = Some(ItemUpdate::SetSchedule(ScheduleField::scheduled(today, 1)));
                }
            }
        }
    });

    update
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}
