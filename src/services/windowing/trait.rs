use crate::error::Result;

/// Source of raw `xinput`-style listings
pub trait WindowingQuery {
    /// Device ids, one per line; floating devices are prefixed with `~`
    fn list_device_ids(&self) -> Result<String>;

    /// `Device '<name>':` header followed by tab-indented `key<TAB>value` lines
    fn list_device_props(&self, device_id: &str) -> Result<String>;
}

/// Factory function for the real `xinput` backed query
pub fn create_windowing_query() -> Box<dyn WindowingQuery> {
    Box::new(super::xinput::XinputQuery::new())
}
