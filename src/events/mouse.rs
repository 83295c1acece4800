use serde::{Deserialize, Serialize};
use std::fmt;

/// Тип события мыши
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseEventKind {
    LeftPress,
    LeftRelease,
    RightPress,
    RightRelease,
    WheelUp,
    WheelDown,
    Move,
    Enter,
    Leave,
    #[default]
    Invalid,
}

/// Событие мыши.
///
/// Поля кнопок и координат - это снимок состояния мыши в момент события,
/// а не ссылка на него: событие остаётся осмысленным после последующих изменений.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub left_down: bool,
    pub right_down: bool,
    pub x: i32,
    pub y: i32,
}

impl MouseEvent {
    pub fn is_valid(&self) -> bool {
        self.kind != MouseEventKind::Invalid
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}, {})", self.kind, self.x, self.y)?;
        if self.left_down {
            write!(f, " L")?;
        }
        if self.right_down {
            write!(f, " R")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_event_is_invalid() {
        let event = MouseEvent::default();
        assert!(!event.is_valid());
        assert_eq!(event.position(), (0, 0));
        assert!(!event.left_down);
        assert!(!event.right_down);
    }

    #[test]
    fn test_mouse_event_display() {
        let event = MouseEvent {
            kind: MouseEventKind::Move,
            left_down: true,
            right_down: false,
            x: 10,
            y: -3,
        };
        assert_eq!(event.to_string(), "Move (10, -3) L");
    }
}
