use crate::NodeIdSource;

/// Construction-time settings for an [`IdService`](crate::IdService).
///
/// The epoch and the bit widths of the ID layout are compile-time constants
/// and are not configurable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdConfig {
    /// Where the Snowflake node ID comes from.
    pub node: NodeIdSource,
}

impl IdConfig {
    pub const fn new(node: NodeIdSource) -> Self {
        Self { node }
    }
}
