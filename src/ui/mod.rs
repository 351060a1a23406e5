pub mod dialogs;
pub mod item_editor;
pub mod item_table;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
