use crate::ekr_error;
use crate::error::Result;
use std::process::Command;
use tracing::{debug, warn};

use super::r#trait::ConfigDispatch;

pub const XSETWACOM: &str = "xsetwacom";

/// Фиксированное начало каждой команды: `xsetwacom set <id>`
pub fn command_header(windowing_id: &str) -> Vec<String> {
    vec![XSETWACOM.to_string(), "set".to_string(), windowing_id.to_string()]
}

pub struct XsetwacomDispatch;

impl XsetwacomDispatch {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigDispatch for XsetwacomDispatch {
    fn execute(&self, argv: &[String]) -> Result<()> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ekr_error!(internal, "Пустая команда"))?;

        debug!("Выполняем: {}", argv.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| ekr_error!(tool_failed, "{} не запустился: {}", program, e))?;

        if !status.success() {
            warn!("Команда '{}' завершилась с {}", argv.join(" "), status);
        }

        Ok(())
    }
}
