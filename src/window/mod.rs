pub mod class;
pub mod dispatcher;
pub mod host;
mod window;

pub use class::{ClassHandle, WindowClass};
pub use dispatcher::{Dispatcher, InstanceId};
pub use host::{HeadlessHost, Host, Notification};
pub use window::Window;
