// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyboard shortcuts of the measurement view.

/// Action bound to a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    /// Close the area polygon and calculate it
    FinishArea,
}

/// Map a key press to a shortcut.
///
/// Ctrl+Z / Cmd+Z undoes, Ctrl+Shift+Z and Ctrl+Y (or Cmd) redo, Enter
/// finishes an area.
pub fn shortcut(key: egui::Key, modifiers: egui::Modifiers) -> Option<Shortcut> {
    match key {
        egui::Key::Z if modifiers.command && modifiers.shift => Some(Shortcut::Redo),
        egui::Key::Z if modifiers.command => Some(Shortcut::Undo),
        egui::Key::Y if modifiers.command => Some(Shortcut::Redo),
        egui::Key::Enter if !modifiers.command => Some(Shortcut::FinishArea),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> egui::Modifiers {
        egui::Modifiers {
            ctrl: true,
            command: true,
            ..Default::default()
        }
    }

    fn command_shift() -> egui::Modifiers {
        egui::Modifiers {
            shift: true,
            ..command()
        }
    }

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(shortcut(egui::Key::Z, command()), Some(Shortcut::Undo));
        assert_eq!(shortcut(egui::Key::Z, command_shift()), Some(Shortcut::Redo));
        assert_eq!(shortcut(egui::Key::Y, command()), Some(Shortcut::Redo));
    }

    #[test]
    fn test_enter_finishes_area() {
        assert_eq!(
            shortcut(egui::Key::Enter, egui::Modifiers::default()),
            Some(Shortcut::FinishArea)
        );
    }

    #[test]
    fn test_plain_letters_are_not_shortcuts() {
        assert_eq!(shortcut(egui::Key::Z, egui::Modifiers::default()), None);
        assert_eq!(shortcut(egui::Key::Y, egui::Modifiers::default()), None);
        assert_eq!(shortcut(egui::Key::A, command()), None);
    }
}
