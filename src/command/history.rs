use super::{Command, CommandResult};
use crate::element::Line;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and add it to the history if successful
    pub fn execute(&mut self, command: Command, lines: &mut Vec<Line>) -> CommandResult {
        command.execute(lines)?;
        self.undo_stack.push(command);
        // Any new action invalidates the redo future
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last executed command. Does nothing when there is none.
    pub fn undo(&mut self, lines: &mut Vec<Line>) -> CommandResult {
        let Some(command) = self.undo_stack.pop() else {
            log::debug!("Nothing to undo");
            return Ok(());
        };
        let redo = command.undo(lines)?;
        self.redo_stack.push(redo);
        Ok(())
    }

    /// Redo the last undone command. Does nothing when there is none.
    pub fn redo(&mut self, lines: &mut Vec<Line>) -> CommandResult {
        let Some(command) = self.redo_stack.pop() else {
            log::debug!("Nothing to redo");
            return Ok(());
        };
        command.execute(lines)?;
        self.undo_stack.push(command);
        Ok(())
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Command] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Command] {
        &self.redo_stack
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LineStyle;
    use egui::pos2;

    fn stroke(x: f32) -> Line {
        Line::stroke(vec![pos2(x, 0.0), pos2(x, 10.0)], LineStyle::default())
    }

    #[test]
    fn undo_redo_restores_exact_line() {
        let mut lines = Vec::new();
        let mut history = CommandHistory::new();
        let line = stroke(1.0);
        history.execute(Command::AddLine(line.clone()), &mut lines).unwrap();

        history.undo(&mut lines).unwrap();
        assert!(lines.is_empty());
        assert!(history.can_redo());

        history.redo(&mut lines).unwrap();
        assert_eq!(lines, vec![line]);
    }

    #[test]
    fn clear_is_undoable() {
        let mut lines = Vec::new();
        let mut history = CommandHistory::new();
        history.execute(Command::AddLine(stroke(1.0)), &mut lines).unwrap();
        history.execute(Command::AddLine(stroke(2.0)), &mut lines).unwrap();
        let before = lines.clone();

        history.execute(Command::Clear(lines.clone()), &mut lines).unwrap();
        assert!(lines.is_empty());

        history.undo(&mut lines).unwrap();
        assert_eq!(lines, before);
    }
}
