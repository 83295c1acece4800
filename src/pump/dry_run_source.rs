use crate::events::Payload;
use tracing::{debug, info};

use super::r#trait::MessageSource;

/// Источник без устройств: ничего не производит, ждёт Ctrl+C
pub struct DryRunSource;

impl DryRunSource {
    pub fn new() -> Self {
        info!("Dry-run режим - источник сообщений работает в режиме эмуляции");
        Self
    }
}

#[async_trait::async_trait]
impl MessageSource for DryRunSource {
    async fn next_payload(&mut self) -> Option<Payload> {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            debug!("Источник сообщений работает в dry-run режиме");
        }
    }
}
