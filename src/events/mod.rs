pub mod keyboard;
pub mod message;
pub mod mouse;

pub use keyboard::{KeyCode, KeyEvent, KeyEventKind, KEY_COUNT};
pub use message::{
    LResult, Message, Payload, RawMessage, WindowHandle, MK_CONTROL, MK_LBUTTON, MK_RBUTTON,
    MK_SHIFT, WHEEL_DELTA,
};
pub use mouse::{MouseEvent, MouseEventKind};
