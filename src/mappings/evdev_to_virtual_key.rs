use evdev::KeyCode;

use super::vk;

/// Преобразование evdev::KeyCode в виртуальные коды клавиш окна
pub struct EvdevToVirtualKey;

impl EvdevToVirtualKey {
    /// Получить виртуальный код из evdev::KeyCode
    pub fn translate(key: KeyCode) -> Option<u8> {
        let code = match key {
            // Буквенные клавиши
            KeyCode::KEY_A => b'A',
            KeyCode::KEY_B => b'B',
            KeyCode::KEY_C => b'C',
            KeyCode::KEY_D => b'D',
            KeyCode::KEY_E => b'E',
            KeyCode::KEY_F => b'F',
            KeyCode::KEY_G => b'G',
            KeyCode::KEY_H => b'H',
            KeyCode::KEY_I => b'I',
            KeyCode::KEY_J => b'J',
            KeyCode::KEY_K => b'K',
            KeyCode::KEY_L => b'L',
            KeyCode::KEY_M => b'M',
            KeyCode::KEY_N => b'N',
            KeyCode::KEY_O => b'O',
            KeyCode::KEY_P => b'P',
            KeyCode::KEY_Q => b'Q',
            KeyCode::KEY_R => b'R',
            KeyCode::KEY_S => b'S',
            KeyCode::KEY_T => b'T',
            KeyCode::KEY_U => b'U',
            KeyCode::KEY_V => b'V',
            KeyCode::KEY_W => b'W',
            KeyCode::KEY_X => b'X',
            KeyCode::KEY_Y => b'Y',
            KeyCode::KEY_Z => b'Z',

            // Цифровые клавиши
            KeyCode::KEY_1 => b'1',
            KeyCode::KEY_2 => b'2',
            KeyCode::KEY_3 => b'3',
            KeyCode::KEY_4 => b'4',
            KeyCode::KEY_5 => b'5',
            KeyCode::KEY_6 => b'6',
            KeyCode::KEY_7 => b'7',
            KeyCode::KEY_8 => b'8',
            KeyCode::KEY_9 => b'9',
            KeyCode::KEY_0 => b'0',

            // Специальные клавиши
            KeyCode::KEY_SPACE => vk::SPACE,
            KeyCode::KEY_ENTER | KeyCode::KEY_KPENTER => vk::RETURN,
            KeyCode::KEY_ESC => vk::ESCAPE,
            KeyCode::KEY_BACKSPACE => vk::BACK,
            KeyCode::KEY_TAB => vk::TAB,
            KeyCode::KEY_CAPSLOCK => vk::CAPITAL,
            KeyCode::KEY_INSERT => vk::INSERT,
            KeyCode::KEY_DELETE => vk::DELETE,
            KeyCode::KEY_HOME => vk::HOME,
            KeyCode::KEY_END => vk::END,
            KeyCode::KEY_PAGEUP => vk::PRIOR,
            KeyCode::KEY_PAGEDOWN => vk::NEXT,

            // Стрелки
            KeyCode::KEY_UP => vk::UP,
            KeyCode::KEY_DOWN => vk::DOWN,
            KeyCode::KEY_LEFT => vk::LEFT,
            KeyCode::KEY_RIGHT => vk::RIGHT,

            // Модификаторы (окно видит обобщённые коды)
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => vk::SHIFT,
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => vk::CONTROL,
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => vk::MENU,
            KeyCode::KEY_LEFTMETA => vk::LWIN,
            KeyCode::KEY_RIGHTMETA => vk::RWIN,

            // Функциональные клавиши
            KeyCode::KEY_F1 => vk::F1,
            KeyCode::KEY_F2 => vk::F1 + 1,
            KeyCode::KEY_F3 => vk::F1 + 2,
            KeyCode::KEY_F4 => vk::F1 + 3,
            KeyCode::KEY_F5 => vk::F1 + 4,
            KeyCode::KEY_F6 => vk::F1 + 5,
            KeyCode::KEY_F7 => vk::F1 + 6,
            KeyCode::KEY_F8 => vk::F1 + 7,
            KeyCode::KEY_F9 => vk::F1 + 8,
            KeyCode::KEY_F10 => vk::F1 + 9,
            KeyCode::KEY_F11 => vk::F1 + 10,
            KeyCode::KEY_F12 => vk::F1 + 11,

            // Пунктуация
            KeyCode::KEY_MINUS => vk::OEM_MINUS,
            KeyCode::KEY_EQUAL => vk::OEM_PLUS,
            KeyCode::KEY_COMMA => vk::OEM_COMMA,
            KeyCode::KEY_DOT => vk::OEM_PERIOD,
            KeyCode::KEY_SEMICOLON => vk::OEM_1,
            KeyCode::KEY_SLASH => vk::OEM_2,
            KeyCode::KEY_GRAVE => vk::OEM_3,
            KeyCode::KEY_LEFTBRACE => vk::OEM_4,
            KeyCode::KEY_BACKSLASH => vk::OEM_5,
            KeyCode::KEY_RIGHTBRACE => vk::OEM_6,
            KeyCode::KEY_APOSTROPHE => vk::OEM_7,

            _ => return None,
        };

        Some(code)
    }

    pub fn is_alt(key: KeyCode) -> bool {
        matches!(key, KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_digits() {
        assert_eq!(EvdevToVirtualKey::translate(KeyCode::KEY_A), Some(0x41));
        assert_eq!(EvdevToVirtualKey::translate(KeyCode::KEY_0), Some(0x30));
    }

    #[test]
    fn test_modifiers_collapse_to_generic_codes() {
        assert_eq!(EvdevToVirtualKey::translate(KeyCode::KEY_LEFTSHIFT), Some(vk::SHIFT));
        assert_eq!(EvdevToVirtualKey::translate(KeyCode::KEY_RIGHTSHIFT), Some(vk::SHIFT));
        assert!(EvdevToVirtualKey::is_alt(KeyCode::KEY_RIGHTALT));
    }

    #[test]
    fn test_function_keys_are_contiguous() {
        assert_eq!(EvdevToVirtualKey::translate(KeyCode::KEY_F12), Some(0x7B));
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(EvdevToVirtualKey::translate(KeyCode::BTN_LEFT), None);
    }
}
