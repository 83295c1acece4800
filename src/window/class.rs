use crate::error::{InputError, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};

// Процессная таблица зарегистрированных классов окон: имя -> число владельцев
static REGISTRY: Lazy<Mutex<HashMap<String, usize>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Регистрация класса окна на уровне процесса.
///
/// Класс регистрируется при первом `acquire` и снимается с регистрации,
/// когда освобождается последний `ClassHandle` с этим именем.
pub struct WindowClass;

impl WindowClass {
    pub fn acquire(name: &str) -> Result<ClassHandle> {
        let name = name.trim();
        if name.is_empty() {
            return InputError::class_registration("имя класса окна не может быть пустым");
        }

        let mut registry = REGISTRY.lock();
        let owners = registry.entry(name.to_string()).or_insert(0);
        if *owners == 0 {
            info!("Класс окна '{}' зарегистрирован", name);
        } else {
            debug!("Класс окна '{}' уже зарегистрирован, владельцев: {}", name, *owners);
        }
        *owners += 1;

        Ok(ClassHandle {
            name: name.to_string(),
        })
    }

    pub fn is_registered(name: &str) -> bool {
        REGISTRY.lock().get(name).is_some_and(|owners| *owners > 0)
    }

    fn release(name: &str) {
        let mut registry = REGISTRY.lock();
        if let Some(owners) = registry.get_mut(name) {
            *owners -= 1;
            if *owners == 0 {
                registry.remove(name);
                info!("Класс окна '{}' снят с регистрации", name);
            }
        }
    }
}

/// Владение регистрацией класса окна; освобождается в Drop
#[derive(Debug)]
pub struct ClassHandle {
    name: String,
}

impl ClassHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ClassHandle {
    fn drop(&mut self) {
        WindowClass::release(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_once_release_last() {
        let name = "class-test-refcount";
        let first = WindowClass::acquire(name).unwrap();
        let second = WindowClass::acquire(name).unwrap();
        assert!(WindowClass::is_registered(name));

        drop(first);
        assert!(WindowClass::is_registered(name));

        drop(second);
        assert!(!WindowClass::is_registered(name));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            WindowClass::acquire("   "),
            Err(InputError::ClassRegistration(_))
        ));
    }

    #[test]
    fn test_handle_reports_trimmed_name() {
        let handle = WindowClass::acquire("  class-test-trim ").unwrap();
        assert_eq!(handle.name(), "class-test-trim");
        assert!(WindowClass::is_registered("class-test-trim"));
    }
}
