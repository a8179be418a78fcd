//! Activity log operations

mod list;

pub use list::ListActivity;
