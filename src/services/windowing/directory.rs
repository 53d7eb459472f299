use crate::error::Result;
use crate::utils::device_finder::PRODUCT_MARKER;
use std::path::Path;
use tracing::{debug, warn};

use super::r#trait::WindowingQuery;

/// Префикс id "плавающих" устройств (не привязанных к экрану)
const FLOATING_PREFIX: char = '~';

const HEADER_PREFIX: &str = "Device '";
const HEADER_SUFFIX: &str = "':";
const DEVICE_NODE_KEY: &str = "Device Node";

/// Устройство X11 со свойствами в порядке вывода xinput
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowingDevice {
    pub id: String,
    pub name: String,
    pub props: Vec<(String, String)>,
}

impl WindowingDevice {
    /// Значения всех свойств "Device Node ..." без кавычек
    pub fn device_nodes(&self) -> impl Iterator<Item = String> + '_ {
        self.props
            .iter()
            .filter(|(key, _)| key.starts_with(DEVICE_NODE_KEY))
            .map(|(_, value)| value.replace('"', ""))
    }
}

pub struct WindowingDeviceDirectory<'a> {
    query: &'a dyn WindowingQuery,
}

impl<'a> WindowingDeviceDirectory<'a> {
    pub fn new(query: &'a dyn WindowingQuery) -> Self {
        Self { query }
    }

    /// Перечислить устройства X11 (без плавающих) в порядке их id в выводе xinput
    pub fn list_devices(&self) -> Result<Vec<WindowingDevice>> {
        let ids = self.query.list_device_ids()?;
        let mut devices = Vec::new();

        for id in ids.lines().map(str::trim).filter(|id| !id.is_empty()) {
            if id.starts_with(FLOATING_PREFIX) {
                warn!("Пропускаем плавающее устройство {}", id);
                continue;
            }

            match self.query.list_device_props(id) {
                Ok(listing) => devices.push(parse_device_props(id, &listing)),
                Err(e) => warn!("Не удалось получить свойства устройства {}: {}", id, e),
            }
        }

        Ok(devices)
    }

    /// Найти id устройства X11, у которого "Device Node" совпадает с `event_path`.
    ///
    /// При нескольких совпадениях побеждает первое в порядке вывода xinput.
    pub fn resolve_windowing_id(&self, event_path: &Path) -> Option<String> {
        let devices = match self.list_devices() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Не удалось получить список устройств X11: {}", e);
                return None;
            }
        };

        let event_path = event_path.to_string_lossy();
        let found = devices
            .iter()
            .filter(|device| device.name.contains(PRODUCT_MARKER))
            .find(|device| device.device_nodes().any(|node| node == event_path))
            .map(|device| device.id.clone());

        match &found {
            Some(id) => debug!("{} соответствует устройству X11 {}", event_path, id),
            None => debug!("Для {} не найдено устройство X11", event_path),
        }
        found
    }
}

/// Разобрать вывод `xinput list-props <id>`
fn parse_device_props(id: &str, listing: &str) -> WindowingDevice {
    let mut name = String::new();
    let mut props = Vec::new();

    for line in listing.lines() {
        if !line.starts_with('\t') {
            name = line
                .strip_prefix(HEADER_PREFIX)
                .and_then(|rest| rest.strip_suffix(HEADER_SUFFIX))
                .unwrap_or_else(|| line.trim())
                .to_string();
            continue;
        }

        match line.trim().split_once('\t') {
            Some((key, value)) => props.push((key.to_string(), value.to_string())),
            None => debug!("Неожиданная строка свойств устройства {}: {:?}", id, line),
        }
    }

    WindowingDevice {
        id: id.to_string(),
        name,
        props,
    }
}
