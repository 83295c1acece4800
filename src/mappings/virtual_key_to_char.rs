use super::vk;

/// Символ, который порождает нажатие клавиши в US-раскладке
pub struct VirtualKeyToChar;

impl VirtualKeyToChar {
    pub fn translate(code: u8, shift: bool, caps_lock: bool) -> Option<u8> {
        let ch = match code {
            b'A'..=b'Z' => {
                if shift != caps_lock {
                    code
                } else {
                    code.to_ascii_lowercase()
                }
            }
            b'0'..=b'9' if shift => b")!@#$%^&*("[(code - b'0') as usize],
            b'0'..=b'9' => code,
            vk::SPACE => b' ',
            vk::RETURN => b'\r',
            vk::TAB => b'\t',
            vk::BACK => 0x08,
            vk::ESCAPE => 0x1B,
            vk::OEM_MINUS => pick(shift, b'-', b'_'),
            vk::OEM_PLUS => pick(shift, b'=', b'+'),
            vk::OEM_COMMA => pick(shift, b',', b'<'),
            vk::OEM_PERIOD => pick(shift, b'.', b'>'),
            vk::OEM_1 => pick(shift, b';', b':'),
            vk::OEM_2 => pick(shift, b'/', b'?'),
            vk::OEM_3 => pick(shift, b'`', b'~'),
            vk::OEM_4 => pick(shift, b'[', b'{'),
            vk::OEM_5 => pick(shift, b'\\', b'|'),
            vk::OEM_6 => pick(shift, b']', b'}'),
            vk::OEM_7 => pick(shift, b'\'', b'"'),
            _ => return None,
        };
        Some(ch)
    }
}

fn pick(shift: bool, plain: u8, shifted: u8) -> u8 {
    if shift {
        shifted
    } else {
        plain
    }
}
