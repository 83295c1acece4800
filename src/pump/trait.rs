use crate::config::Config;
use crate::error::{InputError, Result};
use crate::events::Payload;

/// Источник сообщений для цикла обработки
#[async_trait::async_trait]
pub trait MessageSource {
    /// Следующее сообщение; `None` означает, что источник исчерпан
    async fn next_payload(&mut self) -> Option<Payload>;
}

/// Factory function to create an appropriate message source based on config and the dry_run flag
pub fn create_message_source(config: &Config, dry_run: bool) -> Result<Box<dyn MessageSource + Send>> {
    if config.source.mode == "script" {
        let path = config.source.script_path.as_ref().ok_or_else(|| {
            InputError::Internal("Режим script без пути к сценарию".to_string())
        })?;
        return Ok(Box::new(super::script_source::ScriptSource::load(path)?));
    }

    if dry_run {
        Ok(Box::new(super::dry_run_source::DryRunSource::new()))
    } else {
        Ok(Box::new(super::device_source::DeviceSource::new(config)?))
    }
}
