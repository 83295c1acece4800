use crate::debug_if_enabled;
use crate::events::{LResult, Message, RawMessage, WindowHandle};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

use super::host::Host;
use super::window::Window;

/// Идентификатор экземпляра окна, передаваемый хосту как параметр создания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn to_create_param(self) -> isize {
        self.0 as isize
    }

    pub fn from_create_param(lparam: isize) -> Option<Self> {
        u64::try_from(lparam).ok().filter(|raw| *raw != 0).map(Self)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Диспетчер сообщений: связывает дескрипторы хоста с экземплярами окон.
///
/// Пока дескриптор не связан, диспетчер находится в фазе настройки: ждёт
/// сообщение создания с идентификатором экземпляра, запоминает связь и
/// пересылает это сообщение окну. Все последующие сообщения дескриптора
/// уходят окну напрямую.
#[derive(Debug, Default)]
pub struct Dispatcher {
    instances: HashMap<InstanceId, Window>,
    bindings: HashMap<WindowHandle, InstanceId>,
    last_instance: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Принять экземпляр окна во владение.
    /// Возвращённый идентификатор передаётся хосту при создании окна.
    pub fn adopt(&mut self, window: Window) -> InstanceId {
        self.last_instance += 1;
        let id = InstanceId(self.last_instance);
        debug!("Экземпляр окна '{}' зарегистрирован как {}", window.title(), id);
        self.instances.insert(id, window);
        id
    }

    /// Забрать экземпляр обратно, разорвав все его связи
    pub fn detach(&mut self, id: InstanceId) -> Option<Window> {
        self.bindings.retain(|_, bound| *bound != id);
        self.instances.remove(&id)
    }

    pub fn window(&self, id: InstanceId) -> Option<&Window> {
        self.instances.get(&id)
    }

    pub fn window_mut(&mut self, id: InstanceId) -> Option<&mut Window> {
        self.instances.get_mut(&id)
    }

    pub fn instance_for(&self, handle: WindowHandle) -> Option<InstanceId> {
        self.bindings.get(&handle).copied()
    }

    pub fn is_bound(&self, handle: WindowHandle) -> bool {
        self.bindings.contains_key(&handle)
    }

    /// Точка входа для каждого сообщения хоста
    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, message: RawMessage) -> LResult {
        match self.bindings.get(&message.handle).copied() {
            Some(id) => self.forward(host, id, message),
            None => self.setup(host, message),
        }
    }

    fn setup<H: Host + ?Sized>(&mut self, host: &mut H, message: RawMessage) -> LResult {
        if message.message == Message::NCCREATE {
            match InstanceId::from_create_param(message.lparam) {
                Some(id) if self.instances.contains_key(&id) => {
                    self.bindings.insert(message.handle, id);
                    if let Some(window) = self.instances.get_mut(&id) {
                        window.attach(message.handle);
                    }
                    info!("Дескриптор {} связан с экземпляром {}", message.handle, id);
                    return self.forward(host, id, message);
                }
                _ => warn!(
                    "{} для {} несёт неизвестный параметр создания 0x{:X}",
                    message.message, message.handle, message.lparam
                ),
            }
        } else {
            debug_if_enabled!("{} до связывания дескриптора - обработка по умолчанию", message);
        }

        host.default_proc(&message)
    }

    fn forward<H: Host + ?Sized>(&mut self, host: &mut H, id: InstanceId, message: RawMessage) -> LResult {
        let result = match self.instances.get_mut(&id) {
            Some(window) => window.handle_message(host, &message),
            None => {
                warn!("Экземпляр {} для {} уже освобождён", id, message.handle);
                host.default_proc(&message)
            }
        };

        if message.message == Message::NCDESTROY {
            self.bindings.remove(&message.handle);
            debug!("Связь дескриптора {} с экземпляром {} разорвана", message.handle, id);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MouseEventKind, Payload};
    use crate::window::class::WindowClass;
    use crate::window::host::HeadlessHost;

    fn create(dispatcher: &mut Dispatcher, host: &mut HeadlessHost) -> (InstanceId, WindowHandle) {
        let class = WindowClass::acquire("dispatcher-test-class").unwrap();
        let id = dispatcher.adopt(Window::new("test", 64, 48));
        let first = host.create_window(&class, id);
        let result = dispatcher.dispatch(host, first);
        assert_eq!(result, 1);
        (id, first.handle)
    }

    #[test]
    fn test_first_message_binds_instance() {
        let mut dispatcher = Dispatcher::new();
        let mut host = HeadlessHost::new();

        let (id, handle) = create(&mut dispatcher, &mut host);

        assert_eq!(dispatcher.instance_for(handle), Some(id));
        assert_eq!(dispatcher.window(id).and_then(Window::handle), Some(handle));
    }

    #[test]
    fn test_messages_before_binding_pass_through() {
        let mut dispatcher = Dispatcher::new();
        let mut host = HeadlessHost::new();
        let id = dispatcher.adopt(Window::new("test", 10, 10));
        let handle = WindowHandle(42);

        dispatcher.dispatch(&mut host, Payload::key_down(0x41, false).to(handle));

        assert!(!dispatcher.is_bound(handle));
        assert_eq!(host.default_calls(), 1);
        assert!(dispatcher.window(id).unwrap().keyboard().is_key_queue_empty());
    }

    #[test]
    fn test_unknown_create_param_is_not_bound() {
        let mut dispatcher = Dispatcher::new();
        let mut host = HeadlessHost::new();
        let handle = WindowHandle(5);

        let result = dispatcher.dispatch(&mut host, RawMessage::new(handle, Message::NCCREATE, 0, 99));

        assert_eq!(result, 1);
        assert!(!dispatcher.is_bound(handle));
    }

    #[test]
    fn test_steady_state_routes_to_owner() {
        let mut dispatcher = Dispatcher::new();
        let mut host = HeadlessHost::new();
        let (first_id, first_handle) = create(&mut dispatcher, &mut host);
        let (second_id, second_handle) = create(&mut dispatcher, &mut host);

        dispatcher.dispatch(&mut host, Payload::key_down(0x41, false).to(first_handle));
        dispatcher.dispatch(
            &mut host,
            Payload::mouse(Message::MOUSEMOVE, 3, 4, 0).to(second_handle),
        );

        let first = dispatcher.window_mut(first_id).unwrap();
        assert!(first.keyboard().is_key_pressed(0x41u8));
        assert!(first.mouse().is_empty());

        let second = dispatcher.window_mut(second_id).unwrap();
        assert!(second.keyboard().is_key_queue_empty());
        assert_eq!(second.mouse_mut().read().kind, MouseEventKind::Enter);
        assert_eq!(second.mouse_mut().read().kind, MouseEventKind::Move);
    }

    #[test]
    fn test_events_keep_delivery_order() {
        let mut dispatcher = Dispatcher::new();
        let mut host = HeadlessHost::new();
        let (id, handle) = create(&mut dispatcher, &mut host);

        for code in [0x41u8, 0x42, 0x43] {
            dispatcher.dispatch(&mut host, Payload::key_down(code, false).to(handle));
            dispatcher.dispatch(&mut host, Payload::key_up(code).to(handle));
        }

        let keyboard = dispatcher.window_mut(id).unwrap().keyboard_mut();
        for code in [0x41u8, 0x42, 0x43] {
            assert_eq!(keyboard.read_key().code.value(), code);
            assert_eq!(keyboard.read_key().code.value(), code);
        }
        assert!(keyboard.read_key().is_invalid());
    }

    #[test]
    fn test_nc_destroy_unbinds_and_detach_returns_window() {
        let mut dispatcher = Dispatcher::new();
        let mut host = HeadlessHost::new();
        let (id, handle) = create(&mut dispatcher, &mut host);

        dispatcher.dispatch(&mut host, RawMessage::new(handle, Message::NCDESTROY, 0, 0));
        assert!(!dispatcher.is_bound(handle));

        let window = dispatcher.detach(id).unwrap();
        assert_eq!(window.title(), "test");
        assert!(dispatcher.window(id).is_none());
    }
}
