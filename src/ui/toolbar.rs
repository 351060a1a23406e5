use chrono::Weekday;
use egui::{menu, RichText, Ui};

use crate::app::{BoardApp, NewItem};
use crate::ui::theme;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut BoardApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_board();
                ui.close_menu();
            }
            if ui.button("  Reload").clicked() {
                app.reload_board();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                let changed = app.session.zoom_in();
                app.policy_changed(changed);
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                let changed = app.session.zoom_out();
                app.policy_changed(changed);
                ui.close_menu();
            }
            ui.separator();

            let mut show = app.session.timeline().show_weekends();
            if ui.checkbox(&mut show, "Show weekends").changed() {
                let changed = app.session.set_show_weekends(show);
                app.policy_changed(changed);
            }
            ui.menu_button("  Weekend days", |ui| {
                let mut weekend = app.session.timeline().policy().weekend;
                for day in WEEKDAYS {
                    let mut on = weekend.contains(day);
                    if ui.checkbox(&mut on, day.to_string()).changed() {
                        let mut days = weekend.weekdays();
                        if on {
                            days.push(day);
                        } else {
                            days.retain(|d| *d != day);
                        }
                        weekend = rust_schedule_board::timeline::WeekendDays::from_weekdays(&days);
                        let changed = app.session.set_weekend_days(weekend);
                        app.policy_changed(changed);
                    }
                }
            });
            ui.separator();

            ui.label(RichText::new("Anchor date").small().weak());
            let mut anchor = app.session.timeline().policy().anchor;
            let picker = egui_extras::DatePickerButton::new(&mut anchor).id_salt("dp_anchor");
            let picked = ui.add(picker);
            if picked.changed() {
                app.pin_anchor(Some(anchor));
            }
            if ui.button("  Follow today").clicked() {
                app.pin_anchor(None);
                ui.close_menu();
            }
            if ui.button("  Scroll to today").clicked() {
                app.scroll_to_today = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Board  ").font(theme::font_menu()), |ui| {
            if ui.button("  Add Group...").clicked() {
                app.open_name_dialog(NewItem::Group);
                ui.close_menu();
            }
            if let Some(path) = app.selected {
                if ui.button("  Add Subitem...").clicked() {
                    app.open_name_dialog(NewItem::Subitem(path.task));
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(app.session.persistence().path().display().to_string())
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
