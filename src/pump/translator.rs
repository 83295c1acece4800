use crate::events::{Message, Payload, MK_LBUTTON, MK_RBUTTON, WHEEL_DELTA};
use crate::mappings::{EvdevToVirtualKey, VirtualKeyToChar};
use evdev::{EventType, KeyCode, RelativeAxisCode};
use smallvec::SmallVec;
use tracing::debug;

/// Одно событие evdev даёт не больше пары сообщений
pub type Payloads = SmallVec<[Payload; 2]>;

/// Перевод клавиатурных событий evdev в сообщения окна
#[derive(Debug, Default)]
pub struct KeyTranslator {
    shift: bool,
    ctrl: bool,
    alt: bool,
    caps_lock: bool,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event_type: EventType, code: u16, value: i32) -> Payloads {
        let mut payloads = Payloads::new();
        if event_type != EventType::KEY {
            return payloads;
        }

        let key = KeyCode::new(code);
        let Some(virtual_key) = EvdevToVirtualKey::translate(key) else {
            debug!("Клавиша без виртуального кода: {:?}", key);
            return payloads;
        };

        match value {
            0 => {
                let system = self.alt || EvdevToVirtualKey::is_alt(key);
                self.update_modifiers(key, false);
                payloads.push(system_if(Payload::key_up(virtual_key), system));
            }
            1 | 2 => {
                let repeat = value == 2;
                if !repeat {
                    self.update_modifiers(key, true);
                }
                let system = self.alt || EvdevToVirtualKey::is_alt(key);
                payloads.push(system_if(Payload::key_down(virtual_key, repeat), system));

                if !self.ctrl && !self.alt {
                    if let Some(ch) = VirtualKeyToChar::translate(virtual_key, self.shift, self.caps_lock) {
                        payloads.push(Payload::char(ch));
                    }
                }
            }
            _ => debug!("Неизвестное значение события: {}", value),
        }

        payloads
    }

    fn update_modifiers(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => self.ctrl = pressed,
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => self.alt = pressed,
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => self.shift = pressed,
            KeyCode::KEY_CAPSLOCK if pressed => self.caps_lock = !self.caps_lock,
            _ => {}
        }
    }
}

fn system_if(mut payload: Payload, system: bool) -> Payload {
    if system {
        payload.message = match payload.message {
            Message::KEYDOWN => Message::SYSKEYDOWN,
            Message::KEYUP => Message::SYSKEYUP,
            other => other,
        };
    }
    payload
}

/// Перевод относительных перемещений мыши в клиентские координаты окна
#[derive(Debug)]
pub struct PointerTranslator {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    buttons: usize,
}

impl PointerTranslator {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            dx: 0,
            dy: 0,
            buttons: 0,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn translate(&mut self, event_type: EventType, code: u16, value: i32) -> Payloads {
        let mut payloads = Payloads::new();

        match event_type {
            EventType::RELATIVE => match RelativeAxisCode(code) {
                RelativeAxisCode::REL_X => self.dx += value,
                RelativeAxisCode::REL_Y => self.dy += value,
                RelativeAxisCode::REL_WHEEL => {
                    let delta = (value * WHEEL_DELTA as i32).clamp(i16::MIN as i32, i16::MAX as i32);
                    payloads.push(Payload::wheel(delta as i16, self.x, self.y, self.buttons));
                }
                _ => {}
            },
            EventType::KEY => {
                let (flag, down, up) = match KeyCode::new(code) {
                    KeyCode::BTN_LEFT => (MK_LBUTTON, Message::LBUTTONDOWN, Message::LBUTTONUP),
                    KeyCode::BTN_RIGHT => (MK_RBUTTON, Message::RBUTTONDOWN, Message::RBUTTONUP),
                    _ => return payloads,
                };
                let message = match value {
                    0 => {
                        self.buttons &= !flag;
                        up
                    }
                    1 => {
                        self.buttons |= flag;
                        down
                    }
                    _ => return payloads,
                };
                payloads.push(Payload::mouse(message, self.x, self.y, self.buttons));
            }
            EventType::SYNCHRONIZATION => {
                if self.dx != 0 || self.dy != 0 {
                    self.x = clamp_coordinate(self.x + self.dx);
                    self.y = clamp_coordinate(self.y + self.dy);
                    self.dx = 0;
                    self.dy = 0;
                    payloads.push(Payload::mouse(Message::MOUSEMOVE, self.x, self.y, self.buttons));
                }
            }
            _ => {}
        }

        payloads
    }
}

fn clamp_coordinate(value: i32) -> i32 {
    value.clamp(i16::MIN as i32, i16::MAX as i32)
}
