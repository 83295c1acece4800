use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::input::{DEFAULT_CAPACITY, MAX_QUEUE_CAPACITY};

/// Координаты упаковываются в 16-битные слова
const MAX_CLIENT_DIMENSION: i32 = i16::MAX as i32;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub window: WindowConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Путь к клавиатуре или "auto"
    pub device_path: String,
    /// Путь к мыши, "auto" или "none"
    pub pointer_device_path: String,
    pub grab: bool,
    pub queue_capacity: usize,
    pub autorepeat: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub class_name: String,
    pub title: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub mode: String,
    #[serde(default)]
    pub script_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
                filter: "wininput=info".to_string(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
                pointer_device_path: "auto".to_string(),
                grab: false,
                queue_capacity: DEFAULT_CAPACITY,
                autorepeat: false,
            },
            window: WindowConfig {
                class_name: "wininput".to_string(),
                title: "wininput".to_string(),
                width: 800,
                height: 600,
            },
            source: SourceConfig {
                mode: "devices".to_string(),
                script_path: None,
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WININPUT_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек ввода
        if self.input.queue_capacity == 0 {
            anyhow::bail!("queue_capacity должно быть больше 0");
        }
        if self.input.queue_capacity > MAX_QUEUE_CAPACITY {
            anyhow::bail!(
                "queue_capacity не может превышать {}, получено {}",
                MAX_QUEUE_CAPACITY,
                self.input.queue_capacity
            );
        }

        // Валидация окна
        if self.window.class_name.trim().is_empty() {
            anyhow::bail!("Имя класса окна не может быть пустым");
        }

        for (name, value) in [("width", self.window.width), ("height", self.window.height)] {
            if value <= 0 || value > MAX_CLIENT_DIMENSION {
                anyhow::bail!(
                    "{} окна должно быть в диапазоне 1..={}, получено {}",
                    name,
                    MAX_CLIENT_DIMENSION,
                    value
                );
            }
        }

        // Валидация источника сообщений
        match self.source.mode.as_str() {
            "devices" => {}
            "script" => {
                if self.source.script_path.is_none() {
                    anyhow::bail!("Режим script требует source.script_path");
                }
            }
            _ => anyhow::bail!("Неверный режим источника сообщений: {}", self.source.mode),
        }

        Ok(())
    }

    /// Переключиться на воспроизведение сценария
    pub fn use_script(&mut self, path: impl Into<PathBuf>) {
        self.source.mode = "script".to_string();
        self.source.script_path = Some(path.into());
    }

    pub fn pointer_enabled(&self) -> bool {
        self.input.pointer_device_path != "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.queue_capacity, 16);
        assert!(!config.input.autorepeat);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.input.queue_capacity = 0;
        assert!(config.validate().is_err());

        config.input.queue_capacity = MAX_QUEUE_CAPACITY;
        assert!(config.validate().is_ok());
        config.input.queue_capacity = MAX_QUEUE_CAPACITY + 1;
        assert!(config.validate().is_err());
        config.input.queue_capacity = usize::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.width = 40_000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.mode = "script".to_string();
        assert!(config.validate().is_err());

        config.use_script("demo.toml");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_merges_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wininput.toml",
                r#"
                    [window]
                    title = "Demo"
                    width = 320
                    height = 240

                    [input]
                    autorepeat = true
                "#,
            )?;
            jail.set_env("WININPUT_INPUT__QUEUE_CAPACITY", "32");

            let config = Config::load("wininput.toml").map_err(|e| e.to_string())?;

            assert_eq!(config.window.title, "Demo");
            assert_eq!(config.window.width, 320);
            assert_eq!(config.window.class_name, "wininput");
            assert!(config.input.autorepeat);
            assert_eq!(config.input.queue_capacity, 32);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load("absent.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.source.mode, "devices");
            assert!(config.pointer_enabled());
            Ok(())
        });
    }
}
