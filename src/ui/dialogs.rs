use egui::{Color32, Context, RichText, Window};

use crate::app::{BoardApp, NewItem};
use crate::ui::theme;

/// Render the "new group / task / subitem" naming dialog.
pub fn show_name_dialog(app: &mut BoardApp, ctx: &Context) {
    let Some(dialog) = app.name_dialog.as_mut() else {
        return;
    };
    let title = match dialog.target {
        NewItem::Group => "Add Group",
        NewItem::Task(_) => "Add Task",
        NewItem::Subitem(_) => "Add Subitem",
    };

    let mut create = false;
    let mut cancel = false;
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            let edit = ui.add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut dialog.name).hint_text("Name..."),
            );
            edit.request_focus();
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                create = true;
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    cancel = true;
                }
            });
            ui.add_space(2.0);
        });

    if cancel || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.name_dialog = None;
    } else if create {
        app.create_from_dialog();
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut BoardApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Rust Schedule Board").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("A scheduling board with a");
                ui.label("weekend-aware calendar timeline.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
