use std::fmt;

/// Результат обработки сообщения, возвращаемый хосту
pub type LResult = isize;

/// Флаги удерживаемых кнопок в младшем слове wparam
pub const MK_LBUTTON: usize = 0x0001;
pub const MK_RBUTTON: usize = 0x0002;
pub const MK_SHIFT: usize = 0x0004;
pub const MK_CONTROL: usize = 0x0008;

/// Шаг колеса мыши за один "щелчок"
pub const WHEEL_DELTA: i16 = 120;

/// Бит 30 lparam: клавиша уже была нажата (автоповтор)
const KEY_PREVIOUS_STATE: isize = 1 << 30;
/// Бит 31 lparam: переход в отпущенное состояние
const KEY_TRANSITION: isize = i32::MIN as isize;

/// Дескриптор окна, выдаваемый хостом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HWND#{}", self.0)
    }
}

/// Идентификатор оконного сообщения хоста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message(pub u32);

impl Message {
    pub const NULL: Message = Message(0x0000);
    pub const CREATE: Message = Message(0x0001);
    pub const DESTROY: Message = Message(0x0002);
    pub const SIZE: Message = Message(0x0005);
    pub const SETFOCUS: Message = Message(0x0007);
    pub const KILLFOCUS: Message = Message(0x0008);
    pub const CLOSE: Message = Message(0x0010);
    pub const NCCREATE: Message = Message(0x0081);
    pub const NCDESTROY: Message = Message(0x0082);
    pub const KEYDOWN: Message = Message(0x0100);
    pub const KEYUP: Message = Message(0x0101);
    pub const CHAR: Message = Message(0x0102);
    pub const SYSKEYDOWN: Message = Message(0x0104);
    pub const SYSKEYUP: Message = Message(0x0105);
    pub const MOUSEMOVE: Message = Message(0x0200);
    pub const LBUTTONDOWN: Message = Message(0x0201);
    pub const LBUTTONUP: Message = Message(0x0202);
    pub const RBUTTONDOWN: Message = Message(0x0204);
    pub const RBUTTONUP: Message = Message(0x0205);
    pub const MOUSEWHEEL: Message = Message(0x020A);

    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Message::NULL => "WM_NULL",
            Message::CREATE => "WM_CREATE",
            Message::DESTROY => "WM_DESTROY",
            Message::SIZE => "WM_SIZE",
            Message::SETFOCUS => "WM_SETFOCUS",
            Message::KILLFOCUS => "WM_KILLFOCUS",
            Message::CLOSE => "WM_CLOSE",
            Message::NCCREATE => "WM_NCCREATE",
            Message::NCDESTROY => "WM_NCDESTROY",
            Message::KEYDOWN => "WM_KEYDOWN",
            Message::KEYUP => "WM_KEYUP",
            Message::CHAR => "WM_CHAR",
            Message::SYSKEYDOWN => "WM_SYSKEYDOWN",
            Message::SYSKEYUP => "WM_SYSKEYUP",
            Message::MOUSEMOVE => "WM_MOUSEMOVE",
            Message::LBUTTONDOWN => "WM_LBUTTONDOWN",
            Message::LBUTTONUP => "WM_LBUTTONUP",
            Message::RBUTTONDOWN => "WM_RBUTTONDOWN",
            Message::RBUTTONUP => "WM_RBUTTONUP",
            Message::MOUSEWHEEL => "WM_MOUSEWHEEL",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "WM_0x{:04X}", self.0),
        }
    }
}

/// Сообщение без адресата: то, что производит источник сообщений
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    pub message: Message,
    pub wparam: usize,
    pub lparam: isize,
}

impl Payload {
    pub fn new(message: Message, wparam: usize, lparam: isize) -> Self {
        Self { message, wparam, lparam }
    }

    pub fn to(self, handle: WindowHandle) -> RawMessage {
        RawMessage {
            handle,
            message: self.message,
            wparam: self.wparam,
            lparam: self.lparam,
        }
    }

    pub fn key_down(code: u8, was_down: bool) -> Self {
        let mut lparam = 1;
        if was_down {
            lparam |= KEY_PREVIOUS_STATE;
        }
        Self::new(Message::KEYDOWN, code as usize, lparam)
    }

    pub fn key_up(code: u8) -> Self {
        Self::new(
            Message::KEYUP,
            code as usize,
            1 | KEY_PREVIOUS_STATE | KEY_TRANSITION,
        )
    }

    pub fn char(ch: u8) -> Self {
        Self::new(Message::CHAR, ch as usize, 1)
    }

    pub fn mouse(message: Message, x: i32, y: i32, buttons: usize) -> Self {
        Self::new(message, buttons & 0xFFFF, make_point_lparam(x, y))
    }

    pub fn wheel(delta: i16, x: i32, y: i32, buttons: usize) -> Self {
        let wparam = ((delta as u16 as usize) << 16) | (buttons & 0xFFFF);
        Self::new(Message::MOUSEWHEEL, wparam, make_point_lparam(x, y))
    }

    pub fn size(width: i32, height: i32) -> Self {
        Self::new(Message::SIZE, 0, make_point_lparam(width, height))
    }

    pub fn close() -> Self {
        Self::new(Message::CLOSE, 0, 0)
    }

    pub fn kill_focus() -> Self {
        Self::new(Message::KILLFOCUS, 0, 0)
    }
}

/// Сообщение, адресованное конкретному окну
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub handle: WindowHandle,
    pub message: Message,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub fn new(handle: WindowHandle, message: Message, wparam: usize, lparam: isize) -> Self {
        Self { handle, message, wparam, lparam }
    }

    /// Виртуальный код клавиши из wparam
    pub fn key_code(&self) -> u8 {
        (self.wparam & 0xFF) as u8
    }

    /// Клавиша уже была нажата до этого сообщения (аппаратный автоповтор)
    pub fn was_key_down(&self) -> bool {
        self.lparam & KEY_PREVIOUS_STATE != 0
    }

    /// Координаты указателя из lparam (знаковые 16-битные слова)
    pub fn point(&self) -> (i32, i32) {
        (
            (self.lparam & 0xFFFF) as u16 as i16 as i32,
            ((self.lparam >> 16) & 0xFFFF) as u16 as i16 as i32,
        )
    }

    /// Ширина и высота клиентской области для SIZE
    pub fn size(&self) -> (i32, i32) {
        (
            (self.lparam & 0xFFFF) as i32,
            ((self.lparam >> 16) & 0xFFFF) as i32,
        )
    }

    pub fn buttons(&self) -> usize {
        self.wparam & 0xFFFF
    }

    pub fn any_button_held(&self) -> bool {
        self.buttons() & (MK_LBUTTON | MK_RBUTTON) != 0
    }

    pub fn wheel_delta(&self) -> i16 {
        ((self.wparam >> 16) & 0xFFFF) as u16 as i16
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (wparam=0x{:X}, lparam=0x{:X})",
            self.message, self.handle, self.wparam, self.lparam
        )
    }
}

pub fn make_point_lparam(x: i32, y: i32) -> isize {
    let low = (x as i16 as u16) as isize;
    let high = (y as i16 as u16) as isize;
    (high << 16) | low
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDLE: WindowHandle = WindowHandle(1);

    #[test]
    fn test_negative_coordinates_survive_packing() {
        let message = Payload::mouse(Message::MOUSEMOVE, -5, -700, MK_LBUTTON).to(HANDLE);
        assert_eq!(message.point(), (-5, -700));
        assert!(message.any_button_held());
    }

    #[test]
    fn test_key_repeat_flag() {
        assert!(!Payload::key_down(0x41, false).to(HANDLE).was_key_down());
        assert!(Payload::key_down(0x41, true).to(HANDLE).was_key_down());
        assert_eq!(Payload::key_up(0x41).to(HANDLE).key_code(), 0x41);
    }

    #[test]
    fn test_key_up_sets_transition_bit() {
        let message = Payload::key_up(0x41).to(HANDLE);
        assert!(message.was_key_down());
        assert!((message.lparam as i32) < 0);
        assert_eq!(message.lparam & 0xFFFF, 1);
    }

    #[test]
    fn test_wheel_delta_sign() {
        let up = Payload::wheel(WHEEL_DELTA, 3, 4, 0).to(HANDLE);
        let down = Payload::wheel(-WHEEL_DELTA, 3, 4, MK_RBUTTON).to(HANDLE);
        assert_eq!(up.wheel_delta(), 120);
        assert_eq!(down.wheel_delta(), -120);
        assert_eq!(down.buttons(), MK_RBUTTON);
        assert_eq!(down.point(), (3, 4));
    }

    #[test]
    fn test_message_display() {
        assert_eq!(Message::KEYDOWN.to_string(), "WM_KEYDOWN");
        assert_eq!(Message(0x1234).to_string(), "WM_0x1234");
    }
}
