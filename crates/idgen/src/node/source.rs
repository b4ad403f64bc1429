use core::{fmt, str::FromStr};

use crate::{
    Error, Result,
    node::{FixedNodeId, NetworkNodeId, NodeId, NodeIdProvider, RandomNodeId},
    rand::ThreadRandom,
};

/// Selects which [`NodeIdProvider`] a generator is built with.
///
/// Parses from `network`, `random`, `fixed:<id>` or a bare `<id>`.
///
/// ```
/// use idgen::NodeIdSource;
///
/// assert_eq!("network".parse::<NodeIdSource>().unwrap(), NodeIdSource::Network);
/// assert_eq!("fixed:7".parse::<NodeIdSource>().unwrap(), NodeIdSource::Fixed(7));
/// assert_eq!("7".parse::<NodeIdSource>().unwrap(), NodeIdSource::Fixed(7));
/// assert!("fixed:512".parse::<NodeIdSource>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeIdSource {
    #[default]
    Network,
    Random,
    Fixed(u16),
}

impl NodeIdSource {
    /// Resolves the node ID through the matching [`NodeIdProvider`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if a `Fixed` ID exceeds
    /// [`MAX_NODE_ID`](crate::MAX_NODE_ID). An assigned ID is never swapped
    /// for another one.
    pub fn try_resolve(&self) -> Result<NodeId> {
        match *self {
            Self::Network => Ok(NetworkNodeId::<ThreadRandom>::default().resolve()),
            Self::Random => Ok(RandomNodeId::<ThreadRandom>::default().resolve()),
            Self::Fixed(id) => Ok(FixedNodeId::new(id)?.resolve()),
        }
    }
}

impl FromStr for NodeIdSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        let invalid = || Error::InvalidNodeIdSource {
            input: s.to_string(),
        };

        let fixed = |raw: &str| -> Result<Self> {
            let id: u16 = raw.trim().parse().map_err(|_| invalid())?;
            FixedNodeId::new(id)?;
            Ok(Self::Fixed(id))
        };

        match input.to_ascii_lowercase().as_str() {
            "network" | "ip" => Ok(Self::Network),
            "random" => Ok(Self::Random),
            other => match other.strip_prefix("fixed:") {
                Some(raw) => fixed(raw),
                None if other.bytes().all(|b| b.is_ascii_digit()) && !other.is_empty() => {
                    fixed(other)
                }
                None => Err(invalid()),
            },
        }
    }
}

impl fmt::Display for NodeIdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("network"),
            Self::Random => f.write_str("random"),
            Self::Fixed(id) => write!(f, "fixed:{id}"),
        }
    }
}
