mod device_source;
mod dry_run_source;
pub mod message_pump;
pub mod script_source;
pub mod translator;
mod r#trait;

pub use message_pump::{drain_input, run_pump};
pub use r#trait::{create_message_source, MessageSource};
pub use script_source::{Script, ScriptSource, ScriptStep};
pub use translator::{KeyTranslator, PointerTranslator};
