pub mod buffer;
pub mod keyboard;
pub mod mouse;

pub use buffer::{EventBuffer, DEFAULT_CAPACITY, MAX_QUEUE_CAPACITY};
pub use keyboard::Keyboard;
pub use mouse::Mouse;
