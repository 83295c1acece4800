use crate::error::Result;
use crate::input_error;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::vk;

// Статическая карта имён клавиш для сценариев и конфигурации
static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Специальные клавиши
    map.insert("space", vk::SPACE);
    map.insert("enter", vk::RETURN);
    map.insert("escape", vk::ESCAPE);
    map.insert("backspace", vk::BACK);
    map.insert("tab", vk::TAB);
    map.insert("capslock", vk::CAPITAL);
    map.insert("insert", vk::INSERT);
    map.insert("delete", vk::DELETE);
    map.insert("home", vk::HOME);
    map.insert("end", vk::END);
    map.insert("pageup", vk::PRIOR);
    map.insert("pagedown", vk::NEXT);

    // Модификаторы
    map.insert("shift", vk::SHIFT);
    map.insert("ctrl", vk::CONTROL);
    map.insert("alt", vk::MENU);
    map.insert("super", vk::LWIN);

    // Стрелки
    map.insert("up", vk::UP);
    map.insert("down", vk::DOWN);
    map.insert("left", vk::LEFT);
    map.insert("right", vk::RIGHT);

    map
});

static CODE_TO_KEY_NAME: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    KEY_NAME_TO_CODE.iter().map(|(&name, &code)| (code, name)).collect()
});

/// Преобразование имён клавиш в виртуальные коды.
///
/// Буквы и цифры задаются одним символом, функциональные клавиши как `f1`..`f12`,
/// произвольный код как `0x41`.
pub struct KeyNameToVirtualKey;

impl KeyNameToVirtualKey {
    pub fn translate(key_name: &str) -> Result<u8> {
        let normalized = key_name.trim().to_lowercase();

        if let Some(code) = KEY_NAME_TO_CODE.get(normalized.as_str()) {
            return Ok(*code);
        }

        let bytes = normalized.as_bytes();
        if bytes.len() == 1 && bytes[0].is_ascii_alphanumeric() {
            return Ok(bytes[0].to_ascii_uppercase());
        }

        if let Some(number) = normalized.strip_prefix('f') {
            if let Ok(n @ 1..=12) = number.parse::<u8>() {
                return Ok(vk::F1 + n - 1);
            }
        }

        if let Some(hex) = normalized.strip_prefix("0x") {
            if let Ok(code) = u8::from_str_radix(hex, 16) {
                return Ok(code);
            }
        }

        Err(input_error!(unknown_key, "{}", key_name))
    }

    /// Получить имя клавиши по виртуальному коду
    pub fn name_of(code: u8) -> Option<String> {
        if let Some(name) = CODE_TO_KEY_NAME.get(&code) {
            return Some(name.to_string());
        }
        match code {
            b'A'..=b'Z' => Some((code.to_ascii_lowercase() as char).to_string()),
            b'0'..=b'9' => Some((code as char).to_string()),
            c if (vk::F1..vk::F1 + 12).contains(&c) => Some(format!("f{}", c - vk::F1 + 1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_key_mapping() {
        assert_eq!(KeyNameToVirtualKey::translate("a").unwrap(), 0x41);
        assert_eq!(KeyNameToVirtualKey::translate("7").unwrap(), 0x37);
        assert_eq!(KeyNameToVirtualKey::translate("space").unwrap(), vk::SPACE);
        assert_eq!(KeyNameToVirtualKey::translate("ctrl").unwrap(), vk::CONTROL);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(KeyNameToVirtualKey::translate("A").unwrap(), 0x41);
        assert_eq!(KeyNameToVirtualKey::translate("ESCAPE").unwrap(), vk::ESCAPE);
    }

    #[test]
    fn test_function_and_hex_keys() {
        assert_eq!(KeyNameToVirtualKey::translate("f5").unwrap(), 0x74);
        assert_eq!(KeyNameToVirtualKey::translate("0xff").unwrap(), 0xFF);
        assert!(KeyNameToVirtualKey::translate("f13").is_err());
    }

    #[test]
    fn test_reverse_mapping() {
        assert_eq!(KeyNameToVirtualKey::name_of(0x41).as_deref(), Some("a"));
        assert_eq!(KeyNameToVirtualKey::name_of(vk::SPACE).as_deref(), Some("space"));
        assert_eq!(KeyNameToVirtualKey::name_of(0x7B).as_deref(), Some("f12"));
        assert_eq!(KeyNameToVirtualKey::name_of(0xFF), None);
    }

    #[test]
    fn test_invalid_key() {
        assert!(KeyNameToVirtualKey::translate("invalid_key").is_err());
    }
}
