mod commands;
mod history;

use thiserror::Error;
use uuid::Uuid;

pub use commands::Command;
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Line {0} is not in the collection")]
    LineNotFound(Uuid),
}
