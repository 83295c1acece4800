use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Ошибка регистрации класса окна: {0}")]
    ClassRegistration(String),

    #[error("Не удалось захватить указатель: {0}")]
    Capture(String),

    #[error("Неизвестная клавиша: {0}")]
    UnknownKey(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl InputError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(InputError::DeviceNotFound(msg.into()))
    }

    pub fn class_registration<T>(msg: impl Into<String>) -> Result<T> {
        Err(InputError::ClassRegistration(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, InputError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! input_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::InputError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::InputError::Permission(format!($($arg)*))
    };
    (class_registration, $($arg:tt)*) => {
        $crate::error::InputError::ClassRegistration(format!($($arg)*))
    };
    (capture, $($arg:tt)*) => {
        $crate::error::InputError::Capture(format!($($arg)*))
    };
    (unknown_key, $($arg:tt)*) => {
        $crate::error::InputError::UnknownKey(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::InputError::Internal(format!($($arg)*))
    };
}
