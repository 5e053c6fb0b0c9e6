//! Terminal keys for driving the menu from a keyboard.
//!
//! | Character    | Command |
//! |--------------|---------|
//! | `w`, `k`     | Up      |
//! | `s`, `j`     | Down    |
//! | `a`, `h`     | Left    |
//! | `d`, `l`     | Right   |
//! | `e`, space   | Enter   |
//! | `q`          | Escape  |
//! | `x`          | Exit    |

use crate::input::Key;

/// A decoded terminal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Key(Key),
    Exit,
}

/// Command bound to `input`, if any. Letters are case-insensitive.
#[must_use]
pub fn command_for(input: char) -> Option<Command> {
    let key = match input.to_ascii_lowercase() {
        'w' | 'k' => Key::Up,
        's' | 'j' => Key::Down,
        'a' | 'h' => Key::Left,
        'd' | 'l' => Key::Right,
        'e' | ' ' => Key::Enter,
        'q' => Key::Escape,
        'x' => return Some(Command::Exit),
        _ => return None,
    };
    Some(Command::Key(key))
}
