use crate::debug_if_enabled;
use crate::events::{KeyCode, LResult, Message, RawMessage, WindowHandle};
use crate::input::{Keyboard, Mouse, DEFAULT_CAPACITY};
use tracing::{debug, info, warn};

use super::host::{Host, Notification};

/// Экземпляр окна: владеет клавиатурой и мышью и разбирает свои сообщения
#[derive(Debug)]
pub struct Window {
    title: String,
    width: i32,
    height: i32,
    handle: Option<WindowHandle>,
    keyboard: Keyboard,
    mouse: Mouse,
}

impl Window {
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Self::with_queue_capacity(title, width, height, DEFAULT_CAPACITY)
    }

    pub fn with_queue_capacity(
        title: impl Into<String>,
        width: i32,
        height: i32,
        capacity: usize,
    ) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            handle: None,
            keyboard: Keyboard::with_capacity(capacity),
            mouse: Mouse::with_capacity(capacity),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn set_client_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    /// Дескриптор, привязанный к окну при создании
    pub fn handle(&self) -> Option<WindowHandle> {
        self.handle
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn mouse(&self) -> &Mouse {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut Mouse {
        &mut self.mouse
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub(crate) fn attach(&mut self, handle: WindowHandle) {
        self.handle = Some(handle);
    }

    /// Таблица разбора сообщений окна
    pub fn handle_message<H: Host + ?Sized>(&mut self, host: &mut H, message: &RawMessage) -> LResult {
        debug_if_enabled!("Окно '{}' получило {}", self.title, message);

        match message.message {
            Message::CLOSE => {
                info!("Окно '{}' запросило закрытие", self.title);
                host.notify(message.handle, Notification::CloseRequested);
                host.post_quit(0);
                return 0;
            }
            Message::KILLFOCUS => {
                // Отпускание клавиши могло уйти другому окну: сбрасываем всё
                debug!("Окно '{}' потеряло фокус, состояние клавиш сброшено", self.title);
                self.keyboard.clear_state();
                host.notify(message.handle, Notification::FocusLost);
            }
            Message::SIZE => {
                let (width, height) = message.size();
                self.set_client_size(width, height);
            }

            Message::KEYDOWN | Message::SYSKEYDOWN => {
                if !message.was_key_down() || self.keyboard.is_autorepeat_enabled() {
                    self.keyboard.on_key_pressed(KeyCode(message.key_code()));
                }
            }
            Message::KEYUP | Message::SYSKEYUP => {
                self.keyboard.on_key_released(KeyCode(message.key_code()));
            }
            Message::CHAR => {
                self.keyboard.on_char(message.key_code());
            }

            Message::MOUSEMOVE => self.handle_mouse_move(host, message),
            Message::LBUTTONDOWN => {
                let (x, y) = message.point();
                self.mouse.on_left_pressed(x, y);
            }
            Message::LBUTTONUP => {
                let (x, y) = message.point();
                self.mouse.on_left_released(x, y);
                self.leave_if_released_outside(host, message);
            }
            Message::RBUTTONDOWN => {
                let (x, y) = message.point();
                self.mouse.on_right_pressed(x, y);
            }
            Message::RBUTTONUP => {
                let (x, y) = message.point();
                self.mouse.on_right_released(x, y);
                self.leave_if_released_outside(host, message);
            }
            Message::MOUSEWHEEL => {
                let (x, y) = message.point();
                let delta = message.wheel_delta();
                if delta > 0 {
                    self.mouse.on_wheel_up(x, y);
                } else if delta < 0 {
                    self.mouse.on_wheel_down(x, y);
                }
            }
            _ => {}
        }

        host.default_proc(message)
    }

    fn handle_mouse_move<H: Host + ?Sized>(&mut self, host: &mut H, message: &RawMessage) {
        let (x, y) = message.point();

        if self.contains(x, y) {
            if !self.mouse.is_in_window() {
                if let Err(e) = host.set_capture(message.handle) {
                    warn!("Окно '{}': {}", self.title, e);
                }
                self.mouse.on_mouse_enter();
            }
            self.mouse.on_mouse_move(x, y);
        } else if message.any_button_held() {
            // Перетаскивание за пределы окна: захват сохраняется
            self.mouse.on_mouse_move(x, y);
        } else if self.mouse.is_in_window() {
            self.release_and_leave(host);
        }
    }

    fn leave_if_released_outside<H: Host + ?Sized>(&mut self, host: &mut H, message: &RawMessage) {
        let (x, y) = message.point();
        if !self.contains(x, y) && !self.mouse.any_button_pressed() && self.mouse.is_in_window() {
            self.release_and_leave(host);
        }
    }

    fn release_and_leave<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Err(e) = host.release_capture() {
            warn!("Окно '{}': {}", self.title, e);
        }
        self.mouse.on_mouse_leave();
    }
}
