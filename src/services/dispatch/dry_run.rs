use crate::error::Result;
use tracing::info;

use super::r#trait::ConfigDispatch;

pub struct DryRunDispatch;

impl DryRunDispatch {
    pub fn new() -> Self {
        info!("Dry-run режим - команды xsetwacom только логируются");
        Self
    }
}

impl ConfigDispatch for DryRunDispatch {
    fn execute(&self, argv: &[String]) -> Result<()> {
        info!("[DRY RUN] {}", argv.join(" "));
        Ok(())
    }
}
