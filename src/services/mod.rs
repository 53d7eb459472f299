pub mod command_builder;
pub mod dispatch;
pub mod remote;
pub mod scheduler;
pub mod windowing;

pub use dispatch::create_config_dispatch;
pub use scheduler::Scheduler;
pub use windowing::create_windowing_query;
