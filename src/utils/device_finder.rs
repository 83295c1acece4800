use crate::error::{InputError, Result};
use evdev::{Device, KeyCode, RelativeAxisCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Какое устройство ищем
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Keyboard,
    Pointer,
}

impl DeviceKind {
    fn label(&self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "клавиатурное",
            DeviceKind::Pointer => "указательное",
        }
    }

    /// Приоритет устройства по имени из /dev/input/by-id, None - не подходит
    fn by_id_priority(&self, name: &str) -> Option<u32> {
        if !name.contains("event") {
            return None;
        }
        match self {
            DeviceKind::Keyboard => {
                // Исключаем известные модели мышей
                if name.contains("mouse") || name.contains("Mouse") || name.contains("DeathAdder") {
                    return None;
                }
                if name.ends_with("event-kbd") {
                    Some(100) // Высший приоритет для -event-kbd устройств
                } else if name.contains("kbd") || name.contains("keyboard") || name.contains("Keyboard") {
                    Some(50)
                } else {
                    None
                }
            }
            DeviceKind::Pointer => {
                if name.ends_with("event-mouse") {
                    Some(100)
                } else if name.contains("mouse") || name.contains("Mouse") {
                    Some(50)
                } else {
                    None
                }
            }
        }
    }
}

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящее клавиатурное устройство
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        Self::find_device(device_path, DeviceKind::Keyboard)
    }

    /// Найти мышь или другое устройство с относительными осями
    pub fn find_pointer_device(device_path: &str) -> Result<PathBuf> {
        Self::find_device(device_path, DeviceKind::Pointer)
    }

    fn find_device(device_path: &str, kind: DeviceKind) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                InputError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Начинаем автопоиск {} устройства...", kind.label());

        // Попробуем найти устройство по ID
        if let Ok(device) = Self::find_by_id(kind) {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        // Попробуем найти устройство в /dev/input/event*
        if let Ok(device) = Self::find_by_event_devices(kind) {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        InputError::device_not_found(format!(
            "Не удалось найти подходящее {} устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
            kind.label()
        ))
    }

    fn find_by_id(kind: DeviceKind) -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return InputError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| InputError::Permission(format!("Нет доступа к /dev/input/by-id: {}", e)))?;

        let mut candidates = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();

            let Some(priority) = kind.by_id_priority(&name) else {
                continue;
            };

            if !Self::is_device_accessible(&path) {
                warn!("Устройство {:?} недоступно", path);
                continue;
            }

            // Проверяем возможности устройства через evdev
            if Self::matches_kind(&path, kind) {
                info!("Добавлено устройство: {} (приоритет: {})", name, priority);
                candidates.push((path, priority));
            } else {
                debug!("Устройство не прошло проверку: {}", name);
            }
        }

        // Сортируем по приоритету и возвращаем лучшее
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        match candidates.into_iter().next() {
            Some((path, _)) => Ok(path),
            None => InputError::device_not_found("Устройство не найдено в by-id"),
        }
    }

    fn find_by_event_devices(kind: DeviceKind) -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| InputError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut event_devices = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_event = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("event"));
            if is_event {
                event_devices.push(path);
            }
        }

        // Сортируем устройства по номеру
        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);
            if Self::is_device_accessible(&device_path) && Self::matches_kind(&device_path, kind) {
                return Ok(device_path);
            }
        }

        InputError::device_not_found("Не найдено доступное устройство среди event устройств")
    }

    fn matches_kind(device_path: &Path, kind: DeviceKind) -> bool {
        match Device::open(device_path) {
            Ok(device) => {
                let matches = match kind {
                    DeviceKind::Keyboard => Self::looks_like_keyboard(&device),
                    DeviceKind::Pointer => Self::looks_like_pointer(&device),
                };
                debug!(
                    "Устройство {:?} ({}) {:?}: {}",
                    device_path,
                    device.name().unwrap_or("Unknown"),
                    kind,
                    matches
                );
                matches
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }

    fn looks_like_keyboard(device: &Device) -> bool {
        let device_name = device.name().unwrap_or("Unknown").to_lowercase();

        // Исключаем мыши и тачпады по имени устройства
        if device_name.contains("mouse")
            || device_name.contains("deathadder")
            || device_name.contains("touchpad")
            || device_name.contains("trackpoint")
        {
            return false;
        }

        device.supported_keys().is_some_and(|keys| {
            let basic_keys = keys.contains(KeyCode::KEY_A)
                && keys.contains(KeyCode::KEY_SPACE)
                && keys.contains(KeyCode::KEY_ENTER);

            // У настоящей клавиатуры много клавиш
            basic_keys && keys.iter().count() > 20
        })
    }

    fn looks_like_pointer(device: &Device) -> bool {
        let has_axes = device.supported_relative_axes().is_some_and(|axes| {
            axes.contains(RelativeAxisCode::REL_X) && axes.contains(RelativeAxisCode::REL_Y)
        });
        let has_buttons = device
            .supported_keys()
            .is_some_and(|keys| keys.contains(KeyCode::BTN_LEFT));

        has_axes && has_buttons
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}
