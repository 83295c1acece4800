use crate::config::Config;
use crate::error::{InputError, Result};
use crate::events::Payload;
use crate::utils::DeviceFinder;
use evdev::{Device, EventStream, EventType};
use std::io::Error;
use std::path::Path;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::r#trait::MessageSource;
use super::translator::{KeyTranslator, Payloads, PointerTranslator};

enum Translator {
    Keyboard(KeyTranslator),
    Pointer(PointerTranslator),
}

impl Translator {
    fn translate(&mut self, event_type: EventType, code: u16, value: i32) -> Payloads {
        match self {
            Translator::Keyboard(translator) => translator.translate(event_type, code, value),
            Translator::Pointer(translator) => translator.translate(event_type, code, value),
        }
    }
}

/// Источник сообщений из реальных устройств evdev.
///
/// Каждое устройство читается в отдельной асинхронной задаче, сообщения
/// сходятся в один канал и обрабатываются циклом в порядке поступления.
/// Задачи чтения прерываются при уничтожении источника.
pub struct DeviceSource {
    receiver: UnboundedReceiver<Payload>,
    readers: Vec<JoinHandle<()>>,
}

impl DeviceSource {
    pub fn new(config: &Config) -> Result<Self> {
        info!("Инициализация DeviceSource");

        let (sender, receiver) = unbounded_channel();
        let mut readers = Vec::new();

        let keyboard_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;
        let keyboard = Self::open(&keyboard_path, config.input.grab)?;
        readers.push(Self::spawn_reader(
            keyboard,
            Translator::Keyboard(KeyTranslator::new()),
            config.input.grab,
            sender.clone(),
        )?);

        if config.pointer_enabled() {
            match DeviceFinder::find_pointer_device(&config.input.pointer_device_path) {
                Ok(pointer_path) => {
                    let pointer = Self::open(&pointer_path, config.input.grab)?;
                    let start = PointerTranslator::new(config.window.width / 2, config.window.height / 2);
                    readers.push(Self::spawn_reader(
                        pointer,
                        Translator::Pointer(start),
                        config.input.grab,
                        sender,
                    )?);
                }
                Err(e) => warn!("Мышь недоступна, работаем только с клавиатурой: {}", e),
            }
        }

        info!("DeviceSource запущен, устройств: {}", readers.len());
        Ok(Self { receiver, readers })
    }

    fn open(device_path: &Path, grab: bool) -> Result<Device> {
        let mut device = Device::open(device_path).map_err(|e| {
            InputError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());

        if grab {
            if let Err(e) = device.grab() {
                Self::log_grab_error(device_path, &e);
                return Err(InputError::Permission(format!(
                    "Не удалось захватить устройство эксклюзивно: {}",
                    e
                )));
            }
            info!("Устройство захвачено эксклюзивно");
        }

        Ok(device)
    }

    fn spawn_reader(
        device: Device,
        translator: Translator,
        grabbed: bool,
        sender: UnboundedSender<Payload>,
    ) -> Result<JoinHandle<()>> {
        let stream = device.into_event_stream()?;
        Ok(tokio::spawn(Self::read_events(stream, translator, grabbed, sender)))
    }

    async fn read_events(
        mut stream: EventStream,
        mut translator: Translator,
        grabbed: bool,
        sender: UnboundedSender<Payload>,
    ) {
        'reading: loop {
            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    break;
                }
            };

            for payload in translator.translate(event.event_type(), event.code(), event.value()) {
                if sender.send(payload).is_err() {
                    debug!("Цикл сообщений остановлен, чтение устройства прекращено");
                    break 'reading;
                }
            }
        }

        if grabbed {
            info!("Освобождение захваченного устройства");
            if let Err(e) = stream.device_mut().ungrab() {
                error!("Не удалось освободить устройство: {}", e);
            }
        }
    }

    fn log_grab_error(device_path: &Path, e: &Error) {
        warn!(
            "Не удалось захватить устройство {}: {}",
            device_path.display(),
            e
        );
        warn!("Попробуйте:");
        warn!("1. Отключить input.grab в конфигурации");
        warn!("2. Добавить пользователя в группу input: sudo usermod -a -G input $USER");
    }
}

#[async_trait::async_trait]
impl MessageSource for DeviceSource {
    async fn next_payload(&mut self) -> Option<Payload> {
        self.receiver.recv().await
    }
}

impl Drop for DeviceSource {
    fn drop(&mut self) {
        self.receiver.close();
        // Прерываем чтение, чтобы освободить дескрипторы и grab, не дожидаясь событий
        for reader in &self.readers {
            reader.abort();
        }
        debug!("DeviceSource остановлен, прервано читателей: {}", self.readers.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drop_aborts_idle_readers() {
        let (_sender, receiver) = unbounded_channel();
        let (alive, mut watcher) = unbounded_channel::<()>();
        // Читатель без событий никогда не просыпается сам
        let reader = tokio::spawn(async move {
            let _alive = alive;
            std::future::pending::<()>().await;
        });

        drop(DeviceSource {
            receiver,
            readers: vec![reader],
        });

        // Прерванная задача уничтожает свой отправитель
        assert_eq!(watcher.recv().await, None);
    }

    #[test]
    fn test_translator_dispatches_by_device() {
        let mut keyboard = Translator::Keyboard(KeyTranslator::new());
        let mut pointer = Translator::Pointer(PointerTranslator::new(0, 0));
        let key = evdev::KeyCode::KEY_A.code();

        assert_eq!(keyboard.translate(EventType::KEY, key, 1).len(), 2);
        assert!(pointer.translate(EventType::KEY, key, 1).is_empty());
    }
}
