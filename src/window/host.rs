use crate::error::Result;
use crate::events::{LResult, Message, RawMessage, WindowHandle};
use crate::input_error;
use tracing::{debug, info};

use super::class::ClassHandle;
use super::dispatcher::InstanceId;

/// Уведомления жизненного цикла, которые окно отдаёт наружу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    CloseRequested,
    FocusLost,
}

/// Оконный слой хоста, к которому обращается диспетчер
pub trait Host {
    /// Обработчик по умолчанию для сообщений, которые окно не потребило
    fn default_proc(&mut self, message: &RawMessage) -> LResult;

    /// Запросить эксклюзивный захват указателя для окна
    fn set_capture(&mut self, handle: WindowHandle) -> Result<()>;

    fn release_capture(&mut self) -> Result<()>;

    /// Сообщить циклу сообщений, что пора завершаться
    fn post_quit(&mut self, exit_code: i32);

    fn notify(&mut self, _handle: WindowHandle, _notification: Notification) {}
}

/// Хост без настоящей оконной системы: выдаёт дескрипторы, помнит захват
/// указателя и запрос завершения.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_handle: u64,
    captured: Option<WindowHandle>,
    quit_code: Option<i32>,
    notifications: Vec<(WindowHandle, Notification)>,
    default_calls: usize,
    fail_capture: bool,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать окно зарегистрированного класса.
    /// Возвращает первое сообщение нового окна, несущее параметр создания.
    pub fn create_window(&mut self, class: &ClassHandle, instance: InstanceId) -> RawMessage {
        self.next_handle += 1;
        let handle = WindowHandle(self.next_handle);
        info!("Создано окно {} класса '{}' для экземпляра {}", handle, class.name(), instance);
        RawMessage::new(handle, Message::NCCREATE, 0, instance.to_create_param())
    }

    pub fn captured(&self) -> Option<WindowHandle> {
        self.captured
    }

    pub fn quit_code(&self) -> Option<i32> {
        self.quit_code
    }

    pub fn notifications(&self) -> &[(WindowHandle, Notification)] {
        &self.notifications
    }

    pub fn default_calls(&self) -> usize {
        self.default_calls
    }

    /// Заставить следующие запросы захвата завершаться ошибкой
    pub fn set_fail_capture(&mut self, fail: bool) {
        self.fail_capture = fail;
    }
}

impl Host for HeadlessHost {
    fn default_proc(&mut self, message: &RawMessage) -> LResult {
        self.default_calls += 1;
        match message.message {
            // Создание окна продолжается только при ненулевом ответе
            Message::NCCREATE => 1,
            _ => 0,
        }
    }

    fn set_capture(&mut self, handle: WindowHandle) -> Result<()> {
        if self.fail_capture {
            return Err(input_error!(capture, "хост отказал в захвате для {}", handle));
        }
        debug!("Указатель захвачен окном {}", handle);
        self.captured = Some(handle);
        Ok(())
    }

    fn release_capture(&mut self) -> Result<()> {
        if let Some(handle) = self.captured.take() {
            debug!("Захват указателя окном {} снят", handle);
        }
        Ok(())
    }

    fn post_quit(&mut self, exit_code: i32) {
        info!("Запрошено завершение цикла сообщений с кодом {}", exit_code);
        self.quit_code = Some(exit_code);
    }

    fn notify(&mut self, handle: WindowHandle, notification: Notification) {
        self.notifications.push((handle, notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::class::WindowClass;

    #[test]
    fn test_capture_roundtrip() {
        let mut host = HeadlessHost::new();
        let handle = WindowHandle(7);

        host.set_capture(handle).unwrap();
        assert_eq!(host.captured(), Some(handle));
        host.release_capture().unwrap();
        assert_eq!(host.captured(), None);
    }

    #[test]
    fn test_capture_failure_is_reported() {
        let mut host = HeadlessHost::new();
        host.set_fail_capture(true);

        assert!(host.set_capture(WindowHandle(1)).is_err());
        assert_eq!(host.captured(), None);
    }

    #[test]
    fn test_create_window_issues_fresh_handles() {
        let class = WindowClass::acquire("host-test-class").unwrap();
        let mut host = HeadlessHost::new();

        let first = host.create_window(&class, InstanceId::from_raw(1));
        let second = host.create_window(&class, InstanceId::from_raw(2));

        assert_eq!(first.message, Message::NCCREATE);
        assert_ne!(first.handle, second.handle);
        assert_eq!(InstanceId::from_create_param(second.lparam), Some(InstanceId::from_raw(2)));
    }
}
