use serde::{Deserialize, Serialize};
use std::fmt;

/// Количество представимых кодов клавиш (один байт виртуального кода)
pub const KEY_COUNT: usize = 256;

/// Виртуальный код клавиши
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub fn new(code: u8) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for KeyCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VK_0x{:02X}", self.0)
    }
}

/// Тип события клавиши
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEventKind {
    Press,
    Release,
    /// Возвращается при чтении из пустой очереди, реальным вводом не создаётся
    #[default]
    Invalid,
}

/// Событие клавиатуры
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub code: KeyCode,
}

impl KeyEvent {
    pub fn new(kind: KeyEventKind, code: KeyCode) -> Self {
        Self { kind, code }
    }

    pub fn press(code: KeyCode) -> Self {
        Self::new(KeyEventKind::Press, code)
    }

    pub fn release(code: KeyCode) -> Self {
        Self::new(KeyEventKind::Release, code)
    }

    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    pub fn is_release(&self) -> bool {
        self.kind == KeyEventKind::Release
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == KeyEventKind::Invalid
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_event_is_invalid() {
        let event = KeyEvent::default();
        assert!(event.is_invalid());
        assert!(!event.is_press());
        assert!(!event.is_release());
        assert_eq!(event.code, KeyCode(0));
    }

    #[test]
    fn test_key_event_display() {
        assert_eq!(KeyEvent::press(KeyCode::new(0x41)).to_string(), "Press VK_0x41");
        assert_eq!(KeyEvent::release(KeyCode::new(0x1B)).to_string(), "Release VK_0x1B");
    }
}
