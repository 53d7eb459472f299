mod dry_run;
mod r#trait;
mod xsetwacom;

pub use self::r#trait::{create_config_dispatch, ConfigDispatch};
pub use self::xsetwacom::command_header;

#[cfg(test)]
pub(crate) use self::r#trait::tests::RecordingDispatch;
