use std::collections::HashMap;

use chrono::Datelike;
use egui::{Color32, CursorIcon, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use rust_schedule_board::io::SchedulePersistence;
use rust_schedule_board::model::{ItemPath, Schedule};
use rust_schedule_board::session::{BoardSession, Row, RowKind};
use rust_schedule_board::timeline::{DragKind, DragOutcome, DragPreview, GestureRejected, Timeline};

use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

/// What happened in the chart this frame.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    pub committed: Option<DragOutcome>,
    pub rejected: Option<GestureRejected>,
    pub selected: Option<ItemPath>,
    /// The column width changed.
    pub zoomed: bool,
}

/// Render the timeline chart (central panel) and drive drag gestures.
pub fn show_timeline_chart<P: SchedulePersistence>(
    session: &mut BoardSession<P>,
    selected: Option<ItemPath>,
    scroll_to_x: Option<f32>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    // Ctrl+Scroll zoom
    if ui.rect_contains_pointer(ui.max_rect()) {
        let zoom = ui.input(|i| i.zoom_delta());
        if zoom > 1.0 {
            interaction.zoomed |= session.zoom_in();
        } else if zoom < 1.0 {
            interaction.zoomed |= session.zoom_out();
        }
    }

    let available = ui.available_size();
    let mut scroll = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false);
    if let Some(x) = scroll_to_x {
        scroll = scroll.horizontal_scroll_offset((x - available.x * 0.3).max(0.0));
    }

    scroll.show(ui, |ui| {
        let rows = session.rows();
        let content_height = rows.last().map(|r| r.top + r.height).unwrap_or(0.0);
        let chart_width = session.timeline().total_width().max(available.x);
        let chart_height = (HEADER_HEIGHT + content_height + 40.0).max(available.y);

        let (response, painter) = ui.allocate_painter(
            Vec2::new(chart_width, chart_height),
            Sense::click_and_drag(),
        );
        let origin = response.rect.min;
        let body = origin + Vec2::new(0.0, HEADER_HEIGHT);

        handle_pointer(session, &rows, &response, body, ui, &mut interaction);

        let session = &*session;
        let timeline = session.timeline();
        let bottom = origin.y + chart_height;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
        draw_rows(&painter, session, &rows, body, chart_width, selected, ui.clip_rect());
        draw_columns(&painter, timeline, body, bottom);
        draw_bars(&painter, session, &rows, body, selected);
        draw_header(&painter, origin, timeline, chart_width);
        draw_today_line(&painter, origin, timeline, bottom);

        if !session.drag().is_dragging() {
            show_hover(session, &rows, &response, body, ui);
        }
    });

    interaction
}

fn handle_pointer<P: SchedulePersistence>(
    session: &mut BoardSession<P>,
    rows: &[Row],
    response: &egui::Response,
    body: Pos2,
    ui: &Ui,
    interaction: &mut ChartInteraction,
) {
    let (pressed, released, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });

    if pressed && response.hovered() {
        if let Some(pos) = pos {
            let local = pos - body;
            if let Some(row) = rows.iter().find(|r| r.contains_y(local.y)) {
                interaction.selected = row.path();
            }
            if let Some(hit) = session.hit_test(rows, local.x, local.y) {
                if let Err(e) = session.pointer_down(hit, local.x) {
                    interaction.rejected = Some(e);
                }
            }
        }
    }

    let Some(kind) = session.drag().session().map(|s| s.kind) else {
        return;
    };
    ui.ctx().set_cursor_icon(cursor_for(kind));
    if let Some(pos) = pos {
        session.pointer_move(pos.x - body.x);
    }
    if released {
        interaction.committed = session.pointer_up();
    }
    ui.ctx().request_repaint();
}

fn cursor_for(kind: DragKind) -> CursorIcon {
    match kind {
        DragKind::Move => CursorIcon::Grabbing,
        DragKind::ResizeLeft | DragKind::ResizeRight => CursorIcon::ResizeHorizontal,
        DragKind::Create => CursorIcon::Crosshair,
    }
}

fn show_hover<P: SchedulePersistence>(
    session: &BoardSession<P>,
    rows: &[Row],
    response: &egui::Response,
    body: Pos2,
    ui: &Ui,
) {
    let Some(pos) = response.hover_pos() else {
        return;
    };
    let local = pos - body;
    let Some(hit) = session.hit_test(rows, local.x, local.y) else {
        return;
    };
    ui.ctx().set_cursor_icon(match hit.kind {
        DragKind::Move => CursorIcon::Grab,
        kind => cursor_for(kind),
    });
    if hit.kind == DragKind::Create {
        return;
    }
    let board = session.board();
    let schedule = board.schedule_of(&hit.path).and_then(|s| s.get());
    let (Some(name), Some(schedule)) = (board.name_of(&hit.path), schedule) else {
        return;
    };
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("bar-tip", hit.path.task, hit.path.subitem)),
        |ui| {
            ui.strong(name);
            ui.label(range_label(&schedule));
        },
    );
}

fn range_label(schedule: &Schedule) -> String {
    format!(
        "{} {} {}  ({}d)",
        schedule.start().format("%d/%m/%Y"),
        egui_phosphor::regular::ARROW_RIGHT,
        schedule.last_day().format("%d/%m/%Y"),
        schedule.duration(),
    )
}

// ── Drawing ──────────────────────────────────────────────────────────────────

fn draw_rows<P: SchedulePersistence>(
    painter: &Painter,
    session: &BoardSession<P>,
    rows: &[Row],
    body: Pos2,
    width: f32,
    selected: Option<ItemPath>,
    clip: Rect,
) {
    for (i, row) in rows.iter().enumerate() {
        let rect = Rect::from_min_size(
            Pos2::new(body.x, body.y + row.top),
            Vec2::new(width, row.height),
        );
        let fill = match row.kind {
            RowKind::Group { .. } => theme::BG_GROUP,
            _ if row.path() == selected && selected.is_some() => theme::BG_SELECTED,
            _ if i % 2 == 0 => theme::BG_PANEL,
            _ => theme::BG_DARK,
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.line_segment(
            [rect.left_bottom(), rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );

        if let RowKind::Group { id } = row.kind {
            let name = session.board().group(id).map(|g| g.name.as_str()).unwrap_or_default();
            painter.text(
                Pos2::new(clip.left().max(rect.left()) + 8.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                name,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
    }
}

/// Weekend shading and grid lines.
fn draw_columns(painter: &Painter, timeline: &Timeline, body: Pos2, bottom: f32) {
    let w = timeline.column_width();
    let compact = timeline.policy().is_compact();
    for (column, day) in timeline.header_columns() {
        let x = body.x + timeline.column_x(column);
        if day.is_weekend {
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(x, body.y), Pos2::new(x + w, bottom)),
                0.0,
                theme::WEEKEND_SHADE,
            );
        }
        if !compact || day.week_label.is_some() {
            painter.line_segment(
                [Pos2::new(x, body.y), Pos2::new(x, bottom)],
                Stroke::new(0.5, theme::GRID_LINE),
            );
        }
    }
}

fn draw_header(painter: &Painter, origin: Pos2, timeline: &Timeline, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let w = timeline.column_width();
    let compact = timeline.policy().is_compact();
    let mut month = None;
    for (column, day) in timeline.header_columns() {
        let x = origin.x + timeline.column_x(column);

        // Weekends may hide the 1st, so label the first visible day of each month.
        let key = (day.date.year(), day.date.month());
        if month != Some(key) {
            month = Some(key);
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                &day.month_label,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
            painter.line_segment(
                [Pos2::new(x, origin.y), Pos2::new(x, origin.y + HEADER_HEIGHT)],
                Stroke::new(1.0, theme::BORDER_SUBTLE),
            );
        }

        if compact {
            if let Some(label) = &day.week_label {
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 31.0),
                    egui::Align2::LEFT_CENTER,
                    label,
                    theme::font_small(),
                    theme::TEXT_SECONDARY,
                );
            }
        } else {
            let color = if day.is_weekend {
                theme::TEXT_DIM
            } else {
                theme::TEXT_SECONDARY
            };
            painter.text(
                Pos2::new(x + w * 0.5, origin.y + 28.0),
                egui::Align2::CENTER_CENTER,
                day.date.format("%d").to_string(),
                theme::font_sub(),
                color,
            );
            if w >= 24.0 {
                painter.text(
                    Pos2::new(x + w * 0.5, origin.y + 39.0),
                    egui::Align2::CENTER_CENTER,
                    day.date.format("%a").to_string(),
                    theme::font_small(),
                    theme::TEXT_DIM,
                );
            }
        }
    }
}

fn draw_today_line(painter: &Painter, origin: Pos2, timeline: &Timeline, bottom: f32) {
    let Some(column) = timeline.today_marker_column() else {
        return;
    };
    let x = origin.x + timeline.column_x(column) + timeline.column_width() * 0.5;
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_bars<P: SchedulePersistence>(
    painter: &Painter,
    session: &BoardSession<P>,
    rows: &[Row],
    body: Pos2,
    selected: Option<ItemPath>,
) {
    let board = session.board();
    let timeline = session.timeline();
    let preview = session.preview();
    let group_index: HashMap<Uuid, usize> = board
        .groups()
        .iter()
        .enumerate()
        .map(|(i, g)| (g.id, i))
        .collect();

    for row in rows {
        let Some(path) = row.path() else {
            continue;
        };
        let Some(task) = board.task(path.task) else {
            continue;
        };
        let base = theme::group_color(group_index.get(&task.group_id).copied().unwrap_or(0));
        let (name, status, schedule) = match path.subitem.and_then(|id| task.subitem(id)) {
            Some(sub) => (&sub.name, sub.status.as_deref(), sub.schedule),
            None => (&task.name, task.status.as_deref(), task.schedule),
        };
        let color = theme::status_color(status, base);
        let top = body.y + row.top;
        let inset = if path.is_subitem() {
            theme::BAR_INSET * 2.0
        } else {
            theme::BAR_INSET
        };
        let band = |left: f32, width: f32| {
            Rect::from_min_size(
                Pos2::new(body.x + left, top + inset),
                Vec2::new(width, row.bar_height - inset * 2.0),
            )
        };

        match preview.filter(|p| p.target == path) {
            Some(p) => draw_preview(painter, band(p.left, p.width), &p, name),
            None => {
                if let Some(geometry) = timeline.bar_geometry(&schedule).filter(|g| !g.clipped) {
                    let rect = band(geometry.left, geometry.width);
                    draw_bar(painter, rect, color, name, selected == Some(path));
                }
            }
        }

        if let RowKind::Task {
            lanes: Some(packing),
            ..
        } = &row.kind
        {
            let lane_h = row.lane_height();
            for sub in &task.subitems {
                let geometry = timeline.bar_geometry(&sub.schedule);
                let (Some(lane), Some(geometry)) = (packing.lane_of(sub.id), geometry) else {
                    continue;
                };
                if geometry.clipped {
                    continue;
                }
                let rect = Rect::from_min_size(
                    Pos2::new(
                        body.x + geometry.left,
                        top + row.bar_height + lane as f32 * lane_h + 1.0,
                    ),
                    Vec2::new(geometry.width, lane_h - 2.0),
                );
                let color = theme::status_color(sub.status.as_deref(), base).gamma_multiply(0.8);
                painter.rect_filled(rect, Rounding::same(2.0), color);
            }
        }
    }
}

fn draw_bar(painter: &Painter, rect: Rect, color: Color32, name: &str, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    let shadow = rect.translate(Vec2::new(1.0, 2.0));
    painter.rect_filled(shadow, rounding, Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, color);
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(rect.width(), (rect.height() * 0.45).max(4.0))),
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if is_selected {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::ACCENT),
        );
        let handle_h = rect.height() * 0.55;
        let handle_y = rect.center().y - handle_h / 2.0;
        for x in [rect.left() - 1.5, rect.right() - 2.5] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
                Rounding::same(2.0),
                theme::TEXT_ON_BAR,
            );
        }
    }

    draw_bar_label(painter, rect, name);
}

fn draw_preview(painter: &Painter, rect: Rect, preview: &DragPreview, name: &str) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    if preview.delete_armed {
        painter.rect_filled(rect, rounding, theme::DELETE_ARMED.gamma_multiply(0.6));
        painter.rect_stroke(rect, rounding, Stroke::new(1.5, theme::DELETE_ARMED));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            egui_phosphor::regular::TRASH,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        return;
    }
    painter.rect_filled(rect, rounding, theme::ACCENT.gamma_multiply(0.85));
    painter.rect_stroke(rect, rounding, Stroke::new(1.5, theme::TEXT_ON_BAR));
    let label = format!("{}  {}d", name, preview.live.duration());
    draw_bar_label(painter, rect, &label);
}

fn draw_bar_label(painter: &Painter, rect: Rect, text: &str) {
    if rect.width() <= 30.0 {
        return;
    }
    let galley = painter.layout_no_wrap(text.to_owned(), theme::font_bar(), theme::TEXT_ON_BAR);
    let text_y = rect.top() + (rect.height() - galley.size().y) / 2.0;
    painter
        .with_clip_rect(rect)
        .galley(Pos2::new(rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
}

/// X offset of the "today" marker in content coordinates.
pub fn today_x(timeline: &Timeline) -> Option<f32> {
    timeline
        .today_marker_column()
        .map(|column| timeline.column_x(column))
}
