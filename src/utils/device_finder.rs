use crate::error::{EkrError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Шаблон файлов режима относительно корня sysfs
const REMOTE_MODE_GLOB: &str = "sys/module/*wacom/drivers/*/*/wacom_remote/*/remote_mode";

/// Имя файла индикатора режима
const REMOTE_MODE_FILE: &str = "remote_mode";

/// Путь от директории remote_mode к event-узлам подсистемы input
const EVENT_NODE_GLOB: &str = "../../input/*/event*";

const DEV_INPUT_DIR: &str = "/dev/input";

/// Маркер в имени устройства, по которому опознаётся пульт
pub const PRODUCT_MARKER: &str = "Express Key Remote";

/// Поиск подключённых пультов и их event-узлов в sysfs
#[derive(Debug, Clone)]
pub struct DeviceFinder {
    sysfs_root: PathBuf,
}

impl Default for DeviceFinder {
    fn default() -> Self {
        Self::new("/")
    }
}

impl DeviceFinder {
    pub fn new(sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
        }
    }

    /// Найти файлы remote_mode всех подключённых пультов (в отсортированном порядке)
    pub fn find_mode_devices(&self) -> Result<Vec<PathBuf>> {
        let pattern = format!(
            "{}/{}",
            Pattern::escape(&self.sysfs_root.to_string_lossy()).trim_end_matches('/'),
            REMOTE_MODE_GLOB
        );

        let mut devices = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => devices.push(path),
                Err(e) => debug!("Пропускаем недоступный путь при поиске пультов: {}", e),
            }
        }

        Ok(devices)
    }

    /// Вычислить `/dev/input/eventN` для файла режима.
    ///
    /// Отсутствие event-узла считается ошибкой: без него пульт нельзя
    /// сопоставить с устройством X11.
    pub fn derive_event_path(mode_path: &Path) -> Result<PathBuf> {
        let mode_dir = match mode_path.file_name().and_then(|n| n.to_str()) {
            Some(REMOTE_MODE_FILE) => mode_path.parent(),
            _ => None,
        }
        .ok_or_else(|| {
            EkrError::DeviceNotFound(format!("{:?} не является файлом {}", mode_path, REMOTE_MODE_FILE))
        })?;

        let pattern = format!(
            "{}/{}",
            Pattern::escape(&mode_dir.to_string_lossy()),
            EVENT_NODE_GLOB
        );

        let event_node = glob::glob(&pattern)?
            .filter_map(|entry| entry.ok())
            .find_map(|path| path.file_name().map(|name| name.to_owned()));

        match event_node {
            Some(name) => Ok(Path::new(DEV_INPUT_DIR).join(name)),
            None => EkrError::device_not_found(format!(
                "Не найден event-узел для {:?} (шаблон {})",
                mode_path, pattern
            )),
        }
    }

    /// Best-effort: прочитать имя устройства через evdev для диагностики
    pub fn describe_event_node(event_path: &Path) -> Option<String> {
        match evdev::Device::open(event_path) {
            Ok(device) => {
                let name = device.name().unwrap_or("Unknown").to_string();
                debug!("Event-узел {:?}: {}", event_path, name);

                if !name.contains(PRODUCT_MARKER) {
                    warn!(
                        "Event-узел {:?} называется '{}', ожидалось имя с '{}'",
                        event_path, name, PRODUCT_MARKER
                    );
                }
                Some(name)
            }
            Err(e) => {
                debug!("Не удалось открыть {:?} через evdev: {}", event_path, e);
                None
            }
        }
    }
}
