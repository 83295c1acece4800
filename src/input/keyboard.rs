use crate::events::{KeyCode, KeyEvent, KEY_COUNT};
use crate::trace_if_enabled;

use super::buffer::{EventBuffer, DEFAULT_CAPACITY};

/// Флаги "клавиша сейчас нажата", по одному на каждый код
#[derive(Debug, Clone)]
struct KeyStates([bool; KEY_COUNT]);

impl KeyStates {
    fn get(&self, code: KeyCode) -> bool {
        self.0[code.index()]
    }

    fn set(&mut self, code: KeyCode, pressed: bool) {
        self.0[code.index()] = pressed;
    }

    fn reset(&mut self) {
        self.0 = [false; KEY_COUNT];
    }
}

impl Default for KeyStates {
    fn default() -> Self {
        Self([false; KEY_COUNT])
    }
}

/// Состояние клавиатуры окна и очереди её событий.
///
/// Методы чтения доступны приложению, методы `on_*` и `clear_state`
/// вызываются только диспетчером сообщений окна.
#[derive(Debug)]
pub struct Keyboard {
    autorepeat_enabled: bool,
    key_states: KeyStates,
    key_buffer: EventBuffer<KeyEvent>,
    char_buffer: EventBuffer<u8>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            autorepeat_enabled: false,
            key_states: KeyStates::default(),
            key_buffer: EventBuffer::new(capacity),
            char_buffer: EventBuffer::new(capacity),
        }
    }

    pub fn is_key_pressed(&self, code: impl Into<KeyCode>) -> bool {
        self.key_states.get(code.into())
    }

    /// Извлечь самое старое событие клавиши или `Invalid`, если очередь пуста
    pub fn read_key(&mut self) -> KeyEvent {
        self.key_buffer.pop().unwrap_or_default()
    }

    pub fn is_key_queue_empty(&self) -> bool {
        self.key_buffer.is_empty()
    }

    pub fn clear_key_queue(&mut self) {
        self.key_buffer.clear();
    }

    /// Извлечь самый старый символ или 0, если очередь пуста
    pub fn read_char(&mut self) -> u8 {
        self.char_buffer.pop().unwrap_or(0)
    }

    pub fn is_char_queue_empty(&self) -> bool {
        self.char_buffer.is_empty()
    }

    pub fn flush_char_queue(&mut self) {
        self.char_buffer.clear();
    }

    pub fn flush(&mut self) {
        self.clear_key_queue();
        self.flush_char_queue();
    }

    pub fn enable_autorepeat(&mut self) {
        self.autorepeat_enabled = true;
    }

    pub fn disable_autorepeat(&mut self) {
        self.autorepeat_enabled = false;
    }

    pub fn is_autorepeat_enabled(&self) -> bool {
        self.autorepeat_enabled
    }

    pub fn queued_keys(&self) -> usize {
        self.key_buffer.len()
    }

    pub fn queued_chars(&self) -> usize {
        self.char_buffer.len()
    }
}

// Мутации состояния: только для диспетчера окна
impl Keyboard {
    pub(crate) fn on_key_pressed(&mut self, code: KeyCode) {
        self.key_states.set(code, true);
        let evicted = self.key_buffer.push(KeyEvent::press(code));
        if evicted > 0 {
            trace_if_enabled!("Очередь клавиш переполнена, вытеснено {} событий", evicted);
        }
    }

    pub(crate) fn on_key_released(&mut self, code: KeyCode) {
        self.key_states.set(code, false);
        let evicted = self.key_buffer.push(KeyEvent::release(code));
        if evicted > 0 {
            trace_if_enabled!("Очередь клавиш переполнена, вытеснено {} событий", evicted);
        }
    }

    pub(crate) fn on_char(&mut self, character: u8) {
        let evicted = self.char_buffer.push(character);
        if evicted > 0 {
            trace_if_enabled!("Очередь символов переполнена, вытеснено {} символов", evicted);
        }
    }

    /// Сбросить все флаги нажатия (при потере фокуса), очереди не трогаются
    pub(crate) fn clear_state(&mut self) {
        self.key_states.reset();
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}
