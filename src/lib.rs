//! Scheduling board engine: a calendar timeline that can compress weekends
//! out of view, pointer gestures that edit item schedules on it, and lane
//! packing for stacked ranges.

pub mod io;
pub mod model;
pub mod session;
pub mod timeline;

pub use session::BoardSession;
