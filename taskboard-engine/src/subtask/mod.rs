//! Subtask operations

mod toggle;

pub use toggle::ToggleSubtask;
