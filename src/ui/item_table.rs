use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;
use uuid::Uuid;

use rust_schedule_board::model::{Board, ItemPath, ScheduleField};

use crate::ui::theme;

/// Actions that the item table can request.
pub enum TableAction {
    None,
    Select(ItemPath),
    Delete(ItemPath),
    AddGroup,
    AddTask(Uuid),
    AddSubitem(Uuid),
    ToggleCollapse(Uuid),
}

/// Render the left-side board tree: groups, their tasks, and subitems.
pub fn show_item_table(board: &Board, selected: Option<ItemPath>, ui: &mut Ui) -> TableAction {
    let mut action = TableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(&board.name)
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", board.task_count()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Group", icons::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TableAction::AddGroup;
    }

    ui.add_space(6.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (gi, group) in board.groups().iter().enumerate() {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let (dot, _) =
                        ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(dot.center(), 4.0, theme::group_color(gi));
                    ui.label(RichText::new(&group.name).strong().size(13.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if icon_button(ui, icons::PLUS, "Add task").clicked() {
                            action = TableAction::AddTask(group.id);
                        }
                    });
                });

                for task in board.ordered_tasks(group.id) {
                    let path = ItemPath::task(task.id);
                    let is_selected = selected == Some(path);
                    let row = item_row(ui, 0.0, &task.name, &task.schedule, is_selected, |ui| {
                        if icon_button(ui, icons::X, "Delete task").clicked() {
                            action = TableAction::Delete(path);
                        }
                        if icon_button(ui, icons::PLUS, "Add subitem").clicked() {
                            action = TableAction::AddSubitem(task.id);
                        }
                        if task.has_subitems() {
                            let caret = if task.collapsed {
                                icons::CARET_RIGHT
                            } else {
                                icons::CARET_DOWN
                            };
                            if icon_button(ui, caret, "Stack subitems").clicked() {
                                action = TableAction::ToggleCollapse(task.id);
                            }
                        }
                    });
                    if row.clicked() {
                        action = TableAction::Select(path);
                    }

                    if task.collapsed {
                        continue;
                    }
                    for sub in &task.subitems {
                        let path = ItemPath::subitem(task.id, sub.id);
                        let is_selected = selected == Some(path);
                        let row = item_row(ui, 18.0, &sub.name, &sub.schedule, is_selected, |ui| {
                            if icon_button(ui, icons::X, "Delete subitem").clicked() {
                                action = TableAction::Delete(path);
                            }
                        });
                        if row.clicked() {
                            action = TableAction::Select(path);
                        }
                    }
                }
            }
        });

    action
}

fn icon_button(ui: &mut Ui, icon: &str, hover: &str) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(icon).size(11.0).color(theme::TEXT_DIM)).frame(false),
    )
    .on_hover_text(hover)
}

fn item_row(
    ui: &mut Ui,
    indent: f32,
    name: &str,
    schedule: &ScheduleField,
    is_selected: bool,
    buttons: impl FnOnce(&mut Ui),
) -> egui::Response {
    let frame = egui::Frame {
        fill: if is_selected {
            theme::BG_SELECTED
        } else {
            theme::BG_DARK
        },
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::symmetric(6.0, 3.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::NONE,
        shadow: egui::epaint::Shadow::NONE,
    };

    let resp = frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.add_space(indent);
            let label = ui.add(
                egui::Label::new(RichText::new(name).size(12.0))
                    .truncate()
                    .sense(egui::Sense::click()),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                buttons(ui);
                let dates = match schedule.get() {
                    Some(s) => format!("{} · {}d", s.start().format("%m/%d"), s.duration()),
                    None => "-".to_owned(),
                };
                ui.label(RichText::new(dates).size(10.0).color(theme::TEXT_SECONDARY));
            });
            label
        })
        .inner
    });
    ui.add_space(1.0);
    resp.inner
}
