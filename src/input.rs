use crate::monitor::MonitorEvent;

use crossterm::event::KeyCode;

/// The virtual keypad symbol set: the 16 hex keys plus the four monitor
/// command keys. The host translates whatever device it owns (touch cells,
/// terminal keys) into these before the core sees them.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Hex(u8),
    Left,
    Right,
    Go,
    Monitor,
}

impl Key {
    pub fn to_monitor_event(self) -> MonitorEvent {
        match self {
            Key::Hex(digit) => MonitorEvent::Digit(digit),
            Key::Left => MonitorEvent::MoveLeft,
            Key::Right => MonitorEvent::MoveRight,
            Key::Go => MonitorEvent::Commit,
            Key::Monitor => MonitorEvent::Toggle,
        }
    }

    /// Interpreter keypad code for this key while the monitor is inactive.
    pub fn keypad_code(self) -> Option<u8> {
        match self {
            Key::Hex(digit) => Some(digit),
            _ => None,
        }
    }
}

impl TryFrom<KeyCode> for Key {
    type Error = &'static str;

    fn try_from(code: KeyCode) -> Result<Self, Self::Error> {
        match code {
            KeyCode::Left => Ok(Key::Left),
            KeyCode::Right => Ok(Key::Right),
            KeyCode::Enter => Ok(Key::Go),
            KeyCode::Char('m') | KeyCode::Char('M') => Ok(Key::Monitor),
            KeyCode::Char(c) => c
                .to_digit(16)
                .map(|digit| Key::Hex(digit as u8))
                .ok_or("not a keypad key"),
            _ => Err("not a keypad key"),
        }
    }
}
