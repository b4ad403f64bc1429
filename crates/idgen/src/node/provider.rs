use core::net::{IpAddr, Ipv4Addr};

use crate::{
    Result,
    node::{MAX_NODE_ID, NodeId, NodeIdOrigin, node_id_from_ipv4},
    rand::{RandSource, ThreadRandom},
};

/// Supplies the node ID for a Snowflake generator.
///
/// Resolution never fails outward: a provider that cannot do better returns
/// a random ID rather than nothing.
pub trait NodeIdProvider {
    fn resolve(&self) -> NodeId;
}

/// A node ID assigned from outside the process, e.g. by an orchestrator or a
/// coordination service.
#[derive(Clone, Copy, Debug)]
pub struct FixedNodeId {
    id: u16,
}

impl FixedNodeId {
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidNodeId`] if `id` exceeds
    /// [`MAX_NODE_ID`].
    pub fn new(id: u16) -> Result<Self> {
        NodeId::new(id, NodeIdOrigin::Fixed)?;
        Ok(Self { id })
    }
}

impl NodeIdProvider for FixedNodeId {
    fn resolve(&self) -> NodeId {
        tracing::info!(node_id = self.id, source = "fixed", "snowflake node id resolved");
        NodeId {
            id: self.id,
            origin: NodeIdOrigin::Fixed,
        }
    }
}

/// A node ID drawn uniformly from `0..=511`.
#[derive(Clone, Debug, Default)]
pub struct RandomNodeId<R = ThreadRandom> {
    rng: R,
}

impl<R> RandomNodeId<R>
where
    R: RandSource<u64>,
{
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> NodeIdProvider for RandomNodeId<R>
where
    R: RandSource<u64>,
{
    fn resolve(&self) -> NodeId {
        // 512 divides 2^64, so the reduction is unbiased.
        let id = (self.rng.rand() % (u64::from(MAX_NODE_ID) + 1)) as u16;
        tracing::info!(node_id = id, source = "random", "snowflake node id resolved");
        NodeId {
            id,
            origin: NodeIdOrigin::Random,
        }
    }
}

/// A node ID derived from the first local, non-loopback IPv4 address, falling
/// back to [`RandomNodeId`] when there is none or the interfaces cannot be
/// listed.
#[derive(Clone, Debug, Default)]
pub struct NetworkNodeId<R = ThreadRandom> {
    fallback: RandomNodeId<R>,
}

impl<R> NetworkNodeId<R>
where
    R: RandSource<u64>,
{
    pub const fn new(rng: R) -> Self {
        Self {
            fallback: RandomNodeId::new(rng),
        }
    }

    /// Resolves from an explicit address list. [`NodeIdProvider::resolve`]
    /// feeds it the host's interface addresses.
    pub fn resolve_from(&self, addrs: impl IntoIterator<Item = IpAddr>) -> NodeId {
        match first_usable_ipv4(addrs) {
            Some(addr) => {
                let id = node_id_from_ipv4(addr);
                tracing::info!(
                    node_id = id,
                    source = "network",
                    %addr,
                    "snowflake node id resolved"
                );
                NodeId {
                    id,
                    origin: NodeIdOrigin::Network { addr },
                }
            }
            None => {
                tracing::info!("no usable ipv4 address found, falling back to a random node id");
                self.fallback.resolve()
            }
        }
    }
}

impl<R> NodeIdProvider for NetworkNodeId<R>
where
    R: RandSource<u64>,
{
    fn resolve(&self) -> NodeId {
        match if_addrs::get_if_addrs() {
            Ok(ifaces) => self.resolve_from(
                ifaces
                    .into_iter()
                    .filter(|iface| !iface.is_loopback())
                    .map(|iface| iface.ip()),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "failed to list network interfaces, falling back to a random node id");
                self.fallback.resolve()
            }
        }
    }
}

fn first_usable_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    })
}
