//! Column operations

mod add;
mod list;

pub use add::AddColumns;
pub use list::ListColumns;
