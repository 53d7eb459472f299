use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    value::Value,
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Системный файл конфигурации (читается первым)
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ekr_monitor.toml";

/// Имя пользовательского файла в домашней директории
pub const USER_CONFIG_NAME: &str = ".ekr_monitor.toml";

/// Количество режимов, которые поддерживает ExpressKey Remote (0..=2)
pub const MODE_COUNT: u8 = 3;

const DEFAULT_SLEEP_SECONDS: f64 = 0.1;

/// Секция режима: имя опции -> многострочный текст команд.
///
/// Значения не типизируются здесь: опция не-строкового типа пропускается
/// при построении команд, а не ломает загрузку всей конфигурации.
pub type ModeSection = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub mode_0: Option<ModeSection>,
    #[serde(default)]
    pub mode_1: Option<ModeSection>,
    #[serde(default)]
    pub mode_2: Option<ModeSection>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Пауза между циклами опроса, в секундах
    #[serde(default = "default_sleep")]
    pub sleep: f64,
}

fn default_sleep() -> f64 {
    DEFAULT_SLEEP_SECONDS
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            sleep: DEFAULT_SLEEP_SECONDS,
        }
    }
}

impl Config {
    /// Загрузить конфигурацию из стандартных путей (+ опциональный файл из CLI)
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut paths = Self::default_paths();
        if let Some(extra) = extra {
            paths.push(extra.to_path_buf());
        }
        Self::load_from(&paths)
    }

    /// Системный путь, затем пользовательский: более поздние файлы перекрывают ранние
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_NAME));
        }
        paths
    }

    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        // Отсутствующий файл даёт пустой провайдер, а не ошибку
        let figment = paths
            .iter()
            .fold(Figment::new(), |figment, path| figment.merge(Toml::file(path)))
            .merge(Env::prefixed("EKR_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", paths))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.general.sleep.is_finite() || self.general.sleep <= 0.0 {
            anyhow::bail!(
                "general.sleep должно быть положительным числом секунд, получено: {}",
                self.general.sleep
            );
        }

        Ok(())
    }

    pub fn sleep_interval(&self) -> Duration {
        Duration::from_secs_f64(self.general.sleep)
    }

    /// Секция `mode_N` для заданного режима, если она есть в конфигурации
    pub fn mode_section(&self, mode: u8) -> Option<&ModeSection> {
        match mode {
            0 => self.mode_0.as_ref(),
            1 => self.mode_1.as_ref(),
            2 => self.mode_2.as_ref(),
            _ => None,
        }
    }
}

pub fn section_name(mode: u8) -> String {
    format!("mode_{}", mode)
}
