pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod mappings;
pub mod pump;
pub mod utils;
pub mod window;

pub use config::Config;
pub use error::{InputError, Result};
pub use input::{Keyboard, Mouse};
pub use window::{Dispatcher, HeadlessHost, Host, Window, WindowClass};
