use uuid::Uuid;

use super::{CommandError, CommandResult};
use crate::element::Line;

/// Undoable changes to the line collection
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a line (stroke or shape) to the collection
    AddLine(Line),
    /// Remove every line; holds what was removed
    Clear(Vec<Line>),
}

impl Command {
    /// Execute the command against the collection
    pub fn execute(&self, lines: &mut Vec<Line>) -> CommandResult {
        match self {
            Command::AddLine(line) => {
                lines.push(line.clone());
                Ok(())
            }
            Command::Clear(_) => {
                lines.clear();
                Ok(())
            }
        }
    }

    /// Revert the command and return the command that redoes it.
    ///
    /// Undoing an add takes the line's current state out of the collection,
    /// so a shape edited after it was added comes back exactly as it was
    /// when undone.
    pub fn undo(self, lines: &mut Vec<Line>) -> Result<Command, CommandError> {
        match self {
            Command::AddLine(line) => {
                let index = find(lines, line.id)?;
                Ok(Command::AddLine(lines.remove(index)))
            }
            Command::Clear(removed) => {
                let mut restored = removed.clone();
                restored.append(lines);
                *lines = restored;
                Ok(Command::Clear(removed))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddLine(line) if line.is_shape() => "Add Shape",
            Command::AddLine(_) => "Add Stroke",
            Command::Clear(_) => "Clear",
        }
    }
}

fn find(lines: &[Line], id: Uuid) -> Result<usize, CommandError> {
    lines
        .iter()
        .rposition(|line| line.id == id)
        .ok_or(CommandError::LineNotFound(id))
}
