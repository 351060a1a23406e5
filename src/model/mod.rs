pub mod board;
pub mod item;
pub mod schedule;

pub use board::{Board, BoardError, ItemUpdate};
pub use item::{Group, ItemPath, Subitem, Task};
pub use schedule::{Schedule, ScheduleField};
