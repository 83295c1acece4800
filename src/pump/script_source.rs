use crate::error::{InputError, Result};
use crate::events::{Message, Payload, MK_LBUTTON, MK_RBUTTON, WHEEL_DELTA};
use crate::input_error;
use crate::mappings::KeyNameToVirtualKey;
use anyhow::Context;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use tokio::time::{sleep, Duration};
use tracing::info;

use super::r#trait::MessageSource;

/// Сценарий ввода: последовательность шагов, воспроизводимая как сообщения окна
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Пауза перед каждым шагом
    #[serde(default)]
    pub step_delay_ms: u64,
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    KeyDown {
        key: String,
        #[serde(default)]
        repeat: bool,
    },
    KeyUp {
        key: String,
    },
    Char {
        ch: char,
    },
    Text {
        text: String,
    },
    MouseMove {
        x: i32,
        y: i32,
    },
    LeftDown {
        x: i32,
        y: i32,
    },
    LeftUp {
        x: i32,
        y: i32,
    },
    RightDown {
        x: i32,
        y: i32,
    },
    RightUp {
        x: i32,
        y: i32,
    },
    Wheel {
        x: i32,
        y: i32,
        /// Положительные значения - прокрутка вверх
        notches: i16,
    },
    Resize {
        width: i32,
        height: i32,
    },
    FocusLost,
    Close,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InputError::Config(anyhow::anyhow!(
                "Файл сценария не найден: {:?}",
                path
            )));
        }
        Figment::from(Toml::file(path))
            .extract()
            .with_context(|| format!("Не удалось разобрать сценарий {:?}", path))
            .map_err(InputError::Config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Figment::from(Toml::string(source))
            .extract()
            .context("Не удалось разобрать сценарий")
            .map_err(InputError::Config)
    }

    /// Превратить шаги в сообщения, отслеживая удерживаемые кнопки мыши
    pub fn compile(&self) -> Result<VecDeque<Payload>> {
        let mut payloads = VecDeque::new();
        let mut buttons = 0usize;

        for step in &self.steps {
            match step {
                ScriptStep::KeyDown { key, repeat } => {
                    payloads.push_back(Payload::key_down(KeyNameToVirtualKey::translate(key)?, *repeat));
                }
                ScriptStep::KeyUp { key } => {
                    payloads.push_back(Payload::key_up(KeyNameToVirtualKey::translate(key)?));
                }
                ScriptStep::Char { ch } => payloads.push_back(Payload::char(char_byte(*ch)?)),
                ScriptStep::Text { text } => {
                    for ch in text.chars() {
                        payloads.push_back(Payload::char(char_byte(ch)?));
                    }
                }
                ScriptStep::MouseMove { x, y } => {
                    payloads.push_back(Payload::mouse(Message::MOUSEMOVE, *x, *y, buttons));
                }
                ScriptStep::LeftDown { x, y } => {
                    buttons |= MK_LBUTTON;
                    payloads.push_back(Payload::mouse(Message::LBUTTONDOWN, *x, *y, buttons));
                }
                ScriptStep::LeftUp { x, y } => {
                    buttons &= !MK_LBUTTON;
                    payloads.push_back(Payload::mouse(Message::LBUTTONUP, *x, *y, buttons));
                }
                ScriptStep::RightDown { x, y } => {
                    buttons |= MK_RBUTTON;
                    payloads.push_back(Payload::mouse(Message::RBUTTONDOWN, *x, *y, buttons));
                }
                ScriptStep::RightUp { x, y } => {
                    buttons &= !MK_RBUTTON;
                    payloads.push_back(Payload::mouse(Message::RBUTTONUP, *x, *y, buttons));
                }
                ScriptStep::Wheel { x, y, notches } => {
                    let delta = notches.saturating_mul(WHEEL_DELTA);
                    payloads.push_back(Payload::wheel(delta, *x, *y, buttons));
                }
                ScriptStep::Resize { width, height } => {
                    payloads.push_back(Payload::size(*width, *height));
                }
                ScriptStep::FocusLost => payloads.push_back(Payload::kill_focus()),
                ScriptStep::Close => payloads.push_back(Payload::close()),
            }
        }

        Ok(payloads)
    }
}

fn char_byte(ch: char) -> Result<u8> {
    u8::try_from(ch as u32).map_err(|_| input_error!(unknown_key, "символ '{}' вне однобайтового диапазона", ch))
}

/// Воспроизведение сценария как источника сообщений
pub struct ScriptSource {
    pending: VecDeque<Payload>,
    step_delay: Duration,
}

impl ScriptSource {
    pub fn load(path: &Path) -> Result<Self> {
        let script = Script::load(path)?;
        let source = Self::from_script(&script)?;
        info!("Сценарий {:?} загружен: {} сообщений", path, source.pending.len());
        Ok(source)
    }

    pub fn from_script(script: &Script) -> Result<Self> {
        Ok(Self {
            pending: script.compile()?,
            step_delay: Duration::from_millis(script.step_delay_ms),
        })
    }

    pub fn from_payloads(payloads: impl IntoIterator<Item = Payload>) -> Self {
        Self {
            pending: payloads.into_iter().collect(),
            step_delay: Duration::ZERO,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait::async_trait]
impl MessageSource for ScriptSource {
    async fn next_payload(&mut self) -> Option<Payload> {
        if self.pending.is_empty() {
            return None;
        }
        // Пауза до извлечения, чтобы отмена не теряла сообщение
        if !self.step_delay.is_zero() {
            sleep(self.step_delay).await;
        }
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::WindowHandle;

    const SCRIPT: &str = r#"
        step_delay_ms = 0

        [[step]]
        kind = "key_down"
        key = "a"

        [[step]]
        kind = "key_down"
        key = "a"
        repeat = true

        [[step]]
        kind = "key_up"
        key = "a"

        [[step]]
        kind = "text"
        text = "hi"

        [[step]]
        kind = "left_down"
        x = 5
        y = 5

        [[step]]
        kind = "mouse_move"
        x = -10
        y = 5

        [[step]]
        kind = "left_up"
        x = -10
        y = 5

        [[step]]
        kind = "wheel"
        x = 1
        y = 1
        notches = -2

        [[step]]
        kind = "close"
    "#;

    #[test]
    fn test_parse_and_compile() {
        let script = Script::from_toml_str(SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 9);
        assert_eq!(script.steps[8], ScriptStep::Close);

        let payloads: Vec<_> = script.compile().unwrap().into_iter().collect();
        assert_eq!(payloads.len(), 10);

        let repeat = payloads[1].to(WindowHandle(1));
        assert!(repeat.was_key_down());
        assert_eq!(payloads[3], Payload::char(b'h'));
        assert_eq!(payloads[4], Payload::char(b'i'));

        // Перемещение между нажатием и отпусканием несёт флаг левой кнопки
        let drag = payloads[6].to(WindowHandle(1));
        assert!(drag.any_button_held());
        let release = payloads[7].to(WindowHandle(1));
        assert!(!release.any_button_held());

        let wheel = payloads[8].to(WindowHandle(1));
        assert_eq!(wheel.wheel_delta(), -240);
        assert_eq!(payloads[9], Payload::close());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let script = Script::from_toml_str(
            r#"
            [[step]]
            kind = "key_down"
            key = "hyper"
            "#,
        )
        .unwrap();

        assert!(matches!(script.compile(), Err(InputError::UnknownKey(_))));
    }

    #[test]
    fn test_missing_script_file() {
        assert!(ScriptSource::load(Path::new("/non/existent/script.toml")).is_err());
    }

    #[tokio::test]
    async fn test_source_yields_in_order_then_ends() {
        let mut source = ScriptSource::from_payloads([Payload::char(b'x'), Payload::close()]);

        assert_eq!(source.next_payload().await, Some(Payload::char(b'x')));
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.next_payload().await, Some(Payload::close()));
        assert_eq!(source.next_payload().await, None);
    }
}
