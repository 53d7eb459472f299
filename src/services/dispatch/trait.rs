use crate::error::Result;

/// Executes fully built configuration commands (`xsetwacom set <id> ...`)
pub trait ConfigDispatch {
    /// Run one command and block until it finishes.
    ///
    /// A non-zero exit status is not an error; only failing to run the
    /// command at all is.
    fn execute(&self, argv: &[String]) -> Result<()>;
}

/// Factory function to create an appropriate dispatcher based on the dry_run flag
pub fn create_config_dispatch(dry_run: bool) -> Box<dyn ConfigDispatch> {
    if dry_run {
        Box::new(super::dry_run::DryRunDispatch::new())
    } else {
        Box::new(super::xsetwacom::XsetwacomDispatch::new())
    }
}
