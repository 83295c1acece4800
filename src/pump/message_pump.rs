use crate::config::Config;
use crate::error::Result;
use crate::events::{KeyEvent, KeyEventKind, Message, RawMessage, WindowHandle};
use crate::mappings::KeyNameToVirtualKey;
use crate::trace_if_enabled;
use crate::window::{Dispatcher, HeadlessHost, Window, WindowClass};
use tokio::signal;
use tracing::{debug, error, info};

use super::r#trait::MessageSource;

/// Цикл сообщений: регистрирует класс, создаёт окно и прогоняет через него
/// сообщения источника до запроса завершения, исчерпания источника или Ctrl+C.
///
/// Возвращает код завершения, переданный окном через `post_quit`, или 0.
pub async fn run_pump(config: &Config, mut source: Box<dyn MessageSource + Send>) -> Result<i32> {
    let class = WindowClass::acquire(&config.window.class_name)?;
    let mut host = HeadlessHost::new();
    let mut dispatcher = Dispatcher::new();

    let mut window = Window::with_queue_capacity(
        config.window.title.as_str(),
        config.window.width,
        config.window.height,
        config.input.queue_capacity,
    );
    if config.input.autorepeat {
        window.keyboard_mut().enable_autorepeat();
    }

    let instance = dispatcher.adopt(window);
    let creation = host.create_window(&class, instance);
    let handle = creation.handle;
    dispatcher.dispatch(&mut host, creation);

    info!("Цикл сообщений запущен для окна {}", handle);

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut processed = 0usize;
    loop {
        let payload = tokio::select! {
            payload = source.next_payload() => payload,
            result = &mut ctrl_c => {
                match result {
                    Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                    Err(e) => error!("Ошибка при ожидании сигнала завершения: {}", e),
                }
                break;
            }
        };

        let Some(payload) = payload else {
            info!("Источник сообщений исчерпан");
            break;
        };

        let message = payload.to(handle);
        trace_if_enabled!("Сообщение {}", message);
        dispatcher.dispatch(&mut host, message);
        processed += 1;

        if let Some(window) = dispatcher.window_mut(instance) {
            drain_input(window);
        }

        if host.quit_code().is_some() {
            break;
        }
    }

    destroy(&mut dispatcher, &mut host, handle);
    dispatcher.detach(instance);

    let exit_code = host.quit_code().unwrap_or(0);
    info!(
        "Цикл сообщений завершён: обработано {} сообщений, код {}",
        processed, exit_code
    );
    Ok(exit_code)
}

fn destroy(dispatcher: &mut Dispatcher, host: &mut HeadlessHost, handle: WindowHandle) {
    for message in [Message::DESTROY, Message::NCDESTROY] {
        dispatcher.dispatch(host, RawMessage::new(handle, message, 0, 0));
    }
    debug!("Окно {} уничтожено", handle);
}

/// Забрать всё накопленное окном и вывести в лог.
/// Возвращает число прочитанных событий.
pub fn drain_input(window: &mut Window) -> usize {
    let mut drained = 0;

    let keyboard = window.keyboard_mut();
    while !keyboard.is_key_queue_empty() {
        let event = keyboard.read_key();
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Release => {
                info!("Клавиатура: {}", describe_key(&event))
            }
            KeyEventKind::Invalid => {}
        }
        drained += 1;
    }
    while !keyboard.is_char_queue_empty() {
        let character = keyboard.read_char();
        info!("Символ: {:?}", character as char);
        drained += 1;
    }

    let mouse = window.mouse_mut();
    while !mouse.is_empty() {
        let event = mouse.read();
        info!("Мышь: {}", event);
        drained += 1;
    }

    drained
}

/// Событие клавиши с именем клавиши, если оно известно
fn describe_key(event: &KeyEvent) -> String {
    match KeyNameToVirtualKey::name_of(event.code.value()) {
        Some(name) => format!("{} [{}]", event, name),
        None => event.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Payload;
    use crate::events::MK_LBUTTON;
    use crate::pump::script_source::ScriptSource;

    fn test_config(class_name: &str) -> Config {
        let mut config = Config::default();
        config.window.class_name = class_name.to_string();
        config.window.width = 100;
        config.window.height = 100;
        config
    }

    #[test]
    fn test_drain_input_empties_queues() {
        let mut host = HeadlessHost::new();
        let mut window = Window::new("drain", 100, 100);
        let handle = WindowHandle(1);

        window.handle_message(&mut host, &Payload::key_down(0x41, false).to(handle));
        window.handle_message(&mut host, &Payload::char(b'a').to(handle));
        window.handle_message(&mut host, &Payload::mouse(Message::MOUSEMOVE, 5, 5, 0).to(handle));

        // Нажатие, символ, вход и перемещение
        assert_eq!(drain_input(&mut window), 4);
        assert!(window.keyboard().is_key_queue_empty());
        assert!(window.keyboard().is_char_queue_empty());
        assert!(window.mouse().is_empty());
        assert_eq!(drain_input(&mut window), 0);
    }

    #[test]
    fn test_describe_key_uses_key_name() {
        use crate::events::KeyCode;

        assert_eq!(describe_key(&KeyEvent::press(KeyCode(0x41))), "Press VK_0x41 [a]");
        assert_eq!(describe_key(&KeyEvent::release(KeyCode(0x20))), "Release VK_0x20 [space]");
        assert_eq!(describe_key(&KeyEvent::press(KeyCode(0xFF))), "Press VK_0xFF");
    }

    #[tokio::test]
    async fn test_close_sets_exit_code_and_unregisters_class() {
        let config = test_config("pump-close-class");
        let source = ScriptSource::from_payloads([
            Payload::key_down(0x41, false),
            Payload::close(),
            Payload::char(b'z'),
        ]);

        let exit_code = run_pump(&config, Box::new(source)).await.unwrap();

        assert_eq!(exit_code, 0);
        assert!(!WindowClass::is_registered("pump-close-class"));
    }

    #[tokio::test]
    async fn test_exhausted_source_ends_pump() {
        let config = test_config("pump-exhausted-class");
        let source = ScriptSource::from_payloads([
            Payload::mouse(Message::LBUTTONDOWN, 10, 10, MK_LBUTTON),
            Payload::mouse(Message::MOUSEMOVE, -5, 10, MK_LBUTTON),
            Payload::mouse(Message::LBUTTONUP, -5, 10, 0),
        ]);

        let exit_code = run_pump(&config, Box::new(source)).await.unwrap();
        assert_eq!(exit_code, 0);
    }

    #[tokio::test]
    async fn test_invalid_class_name_is_rejected() {
        let config = test_config("   ");
        let source = ScriptSource::from_payloads(Vec::<Payload>::new());

        assert!(run_pump(&config, Box::new(source)).await.is_err());
    }
}
