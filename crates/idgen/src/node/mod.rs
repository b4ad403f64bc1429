//! Node identity for Snowflake generators.
//!
//! Every generator packs a 9-bit node ID into its IDs, so two processes
//! sharing a node ID can collide within the same millisecond. Nothing here
//! coordinates across hosts: the network-derived ID is a best-effort
//! heuristic taken from the last two octets of a local IPv4 address, and the
//! random fallback is exactly that. Fleets larger than 512 generators, or
//! hosts whose `octet3 * 256 + octet4` agree modulo 512, accept a non-zero
//! collision probability. Deployments with an external coordinator should
//! hand its assignment to [`FixedNodeId`].

mod provider;
mod source;

pub use provider::*;
pub use source::*;

use core::fmt;
use core::net::Ipv4Addr;

use crate::{Error, Result, SnowflakeId};

/// Largest node ID representable in a [`SnowflakeId`].
pub const MAX_NODE_ID: u16 = SnowflakeId::max_node_id() as u16;

/// Where a [`NodeId`] came from. Logged at startup for diagnosis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeIdOrigin {
    /// Derived from a local, non-loopback IPv4 address.
    Network { addr: Ipv4Addr },
    /// Drawn at random, either by request or because no address was usable.
    Random,
    /// Supplied from outside the process.
    Fixed,
}

impl fmt::Display for NodeIdOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { addr } => write!(f, "network ({addr})"),
            Self::Random => f.write_str("random"),
            Self::Fixed => f.write_str("fixed"),
        }
    }
}

/// A validated node ID in `0..=511`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId {
    id: u16,
    origin: NodeIdOrigin,
}

impl NodeId {
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `id` exceeds [`MAX_NODE_ID`].
    pub fn new(id: u16, origin: NodeIdOrigin) -> Result<Self> {
        if id > MAX_NODE_ID {
            return Err(Error::InvalidNodeId {
                node_id: u64::from(id),
                max: u64::from(MAX_NODE_ID),
            });
        }
        Ok(Self { id, origin })
    }

    pub const fn get(&self) -> u16 {
        self.id
    }

    pub const fn origin(&self) -> NodeIdOrigin {
        self.origin
    }
}

impl From<NodeId> for u64 {
    fn from(node: NodeId) -> Self {
        u64::from(node.id)
    }
}

/// Folds the last two octets of `addr` into the node ID space:
/// `(octet3 * 256 + octet4) mod 512`.
pub const fn node_id_from_ipv4(addr: Ipv4Addr) -> u16 {
    let [_, _, o3, o4] = addr.octets();
    (((o3 as u16) << 8) | o4 as u16) % (MAX_NODE_ID + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_folds_last_two_octets() {
        assert_eq!(node_id_from_ipv4(Ipv4Addr::new(10, 0, 0, 1)), 1);
        assert_eq!(node_id_from_ipv4(Ipv4Addr::new(10, 0, 1, 2)), 258);
        // 3 * 256 + 4 = 772, 772 mod 512 = 260
        assert_eq!(node_id_from_ipv4(Ipv4Addr::new(192, 168, 3, 4)), 260);
        assert_eq!(node_id_from_ipv4(Ipv4Addr::new(172, 16, 255, 255)), 511);
    }

    #[test]
    fn node_id_rejects_out_of_range() {
        assert!(NodeId::new(511, NodeIdOrigin::Fixed).is_ok());
        assert_eq!(
            NodeId::new(512, NodeIdOrigin::Fixed).unwrap_err(),
            Error::InvalidNodeId {
                node_id: 512,
                max: 511
            }
        );
    }
}
