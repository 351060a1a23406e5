use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_FIELD: Color32 = Color32::from_rgb(20, 20, 28);
pub const BG_GROUP: Color32 = Color32::from_rgb(38, 41, 54);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);
pub const WEEKEND_SHADE: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 40);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const DELETE_ARMED: Color32 = Color32::from_rgb(229, 57, 53);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HEADER_HEIGHT: f32 = 44.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 3.0; // vertical inset so bars don't touch row edges
pub const STATUS_BAR_HEIGHT: f32 = 22.0;
pub const SIDE_PANEL_WIDTH: f32 = 300.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Bar colors ───────────────────────────────────────────────────────────────

/// Group colors, cycled in board order.
const GROUP_COLORS: [Color32; 6] = [
    Color32::from_rgb(87, 155, 252),
    Color32::from_rgb(162, 93, 220),
    Color32::from_rgb(3, 127, 76),
    Color32::from_rgb(255, 100, 46),
    Color32::from_rgb(0, 134, 192),
    Color32::from_rgb(202, 182, 0),
];

/// Bar color for the group at `index`.
pub fn group_color(index: usize) -> Color32 {
    GROUP_COLORS[index % GROUP_COLORS.len()]
}

/// Bar color for a status label, falling back to the group color.
pub fn status_color(status: Option<&str>, fallback: Color32) -> Color32 {
    match status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("done") => Color32::from_rgb(0, 200, 117),
        Some("working on it") => Color32::from_rgb(253, 171, 61),
        Some("stuck") => Color32::from_rgb(226, 68, 92),
        _ => fallback,
    }
}

/// Labels offered by the status picker.
pub const STATUS_LABELS: &[&str] = &["Working on it", "Stuck", "Done"];

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.striped = false;

    let rounding = Rounding::same(4.0);
    let widgets = &mut visuals.widgets;
    for (state, fill, border) in [
        (&mut widgets.noninteractive, BG_PANEL, BORDER_SUBTLE),
        (&mut widgets.inactive, BG_GROUP, BORDER_SUBTLE),
        (&mut widgets.hovered, BG_HEADER, ACCENT),
        (&mut widgets.active, BG_HEADER, ACCENT),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.bg_stroke = Stroke::new(1.0, border);
        state.rounding = rounding;
    }
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}
