pub mod document;
pub mod file;
pub mod settings;

pub use file::{load_board, save_board, JsonFileStore, SchedulePersistence, StoreError};
pub use settings::AppSettings;
