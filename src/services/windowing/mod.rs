//! Windowing service: responsibility and boundaries
//!
//! This module talks to the X input layer ONLY to find out which `xinput`
//! device id belongs to a given kernel event node. It never changes device
//! configuration; that is the job of the dispatch service.

mod directory;
mod r#trait;
mod xinput;

pub use self::directory::WindowingDeviceDirectory;
pub use self::r#trait::{create_windowing_query, WindowingQuery};

#[cfg(test)]
pub(crate) use self::directory::tests::FakeWindowingQuery;
