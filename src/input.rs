use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A keystroke as the session sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    /// Esc or ctrl+c
    Cancel,
    Other,
}

impl From<KeyEvent> for KeyInput {
    fn from(key: KeyEvent) -> Self {
        // some terminals report releases too; only presses and repeats type
        if key.kind == KeyEventKind::Release {
            return KeyInput::Other;
        }

        match key.code {
            KeyCode::Esc => KeyInput::Cancel,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyInput::Cancel
            }
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                KeyInput::Other
            }
            KeyCode::Char(c) => KeyInput::Char(c),
            KeyCode::Backspace => KeyInput::Backspace,
            _ => KeyInput::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyInput {
        KeyEvent::new(code, modifiers).into()
    }

    #[test]
    fn plain_and_shifted_chars_are_printable() {
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::NONE), KeyInput::Char('a'));
        assert_eq!(key(KeyCode::Char('T'), KeyModifiers::SHIFT), KeyInput::Char('T'));
        assert_eq!(key(KeyCode::Char(' '), KeyModifiers::NONE), KeyInput::Char(' '));
    }

    #[test]
    fn esc_and_ctrl_c_cancel() {
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), KeyInput::Cancel);
        assert_eq!(
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyInput::Cancel
        );
    }

    #[test]
    fn backspace() {
        assert_eq!(key(KeyCode::Backspace, KeyModifiers::NONE), KeyInput::Backspace);
    }

    #[test]
    fn chords_and_navigation_are_ignored() {
        assert_eq!(key(KeyCode::Char('x'), KeyModifiers::CONTROL), KeyInput::Other);
        assert_eq!(key(KeyCode::Char('b'), KeyModifiers::ALT), KeyInput::Other);
        assert_eq!(key(KeyCode::Left, KeyModifiers::NONE), KeyInput::Other);
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE), KeyInput::Other);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(KeyInput::from(release), KeyInput::Other);
    }
}
