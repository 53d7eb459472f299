use crate::ekr_error;
use crate::error::Result;
use std::process::Command;
use tracing::debug;

use super::r#trait::WindowingQuery;

const XINPUT: &str = "xinput";

pub struct XinputQuery;

impl XinputQuery {
    pub fn new() -> Self {
        Self
    }

    fn run(args: &[&str]) -> Result<String> {
        let output = Command::new(XINPUT)
            .args(args)
            .output()
            .map_err(|e| ekr_error!(tool_failed, "{} не найден: {}", XINPUT, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} {:?} вернул ошибку: {}", XINPUT, args, stderr);
            return Err(ekr_error!(tool_failed, "{} {:?}: {}", XINPUT, args, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WindowingQuery for XinputQuery {
    fn list_device_ids(&self) -> Result<String> {
        Self::run(&["list", "--id-only"])
    }

    fn list_device_props(&self, device_id: &str) -> Result<String> {
        Self::run(&["list-props", device_id])
    }
}
