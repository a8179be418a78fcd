//! Board lifecycle operations

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::CreateBoard;
pub use delete::DeleteBoard;
pub use get::GetBoard;
pub use list::ListBoards;
pub use update::UpdateBoard;
