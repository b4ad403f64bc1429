use std::sync::OnceLock;

use uuid::Uuid;

use crate::{
    IdConfig, LockSnowflakeGenerator, NetworkNodeId, NodeId, NodeIdProvider, Result,
    SnowflakeGenerator, SystemClock, ThreadRandom, UuidV7Generator,
};

/// The process's ID facility: one Snowflake generator and one UUID v7
/// generator.
///
/// Build exactly one per process at startup and hand it to consumers by
/// reference or `Arc`. A second instance with the same node ID would issue
/// duplicate Snowflake IDs.
///
/// ```
/// use idgen::{IdConfig, IdService, NodeIdSource};
///
/// let service = IdService::new(IdConfig::new(NodeIdSource::Fixed(3))).unwrap();
/// let a = service.next_snowflake_id().unwrap();
/// let b = service.next_snowflake_id().unwrap();
/// assert!(0 < a && a < b);
/// assert_eq!(service.next_uuid_v7_dashless().len(), 32);
/// ```
pub struct IdService<S = LockSnowflakeGenerator<SystemClock>>
where
    S: SnowflakeGenerator,
{
    snowflake: S,
    uuid: UuidV7Generator<SystemClock, ThreadRandom>,
}

impl IdService {
    /// Resolves the node ID described by `config` and builds the generators.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidNodeId`] if `config` carries a fixed
    /// node ID outside `0..=511`.
    pub fn new(config: IdConfig) -> Result<Self> {
        Ok(Self::with_node(config.node.try_resolve()?))
    }

    fn with_node(node: NodeId) -> Self {
        tracing::info!(node_id = node.get(), origin = %node.origin(), "id service initialized");
        Self::with_generators(
            LockSnowflakeGenerator::new(node, SystemClock::default()),
            UuidV7Generator::default(),
        )
    }

    /// The lazily-initialized process-wide instance, built with a
    /// network-derived node ID on first use.
    ///
    /// Prefer constructing an instance with [`Self::new`] and passing it
    /// down. This exists for call sites that cannot receive one.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<IdService> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::with_node(NetworkNodeId::<ThreadRandom>::default().resolve()))
    }
}

impl<S> IdService<S>
where
    S: SnowflakeGenerator,
{
    pub fn with_generators(
        snowflake: S,
        uuid: UuidV7Generator<SystemClock, ThreadRandom>,
    ) -> Self {
        Self { snowflake, uuid }
    }

    pub fn node_id(&self) -> u64 {
        self.snowflake.node_id()
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::ClockRegression`] if the host clock stepped
    /// back past the last issued ID. Back off before retrying.
    pub fn next_snowflake_id(&self) -> Result<i64> {
        Ok(self.snowflake.try_next_id()?.to_i64())
    }

    /// The next Snowflake ID in decimal, for formats such as JSON whose
    /// consumers lose precision past 2^53.
    ///
    /// # Errors
    ///
    /// As [`Self::next_snowflake_id`].
    pub fn next_snowflake_id_string(&self) -> Result<String> {
        Ok(self.snowflake.try_next_id()?.to_string())
    }

    /// # Panics
    ///
    /// Panics if the clock overflows the UUID v7 timestamp field.
    pub fn next_uuid_v7(&self) -> Uuid {
        self.uuid.next_uuid()
    }

    /// # Panics
    ///
    /// As [`Self::next_uuid_v7`].
    pub fn next_uuid_v7_dashless(&self) -> String {
        self.uuid.next_uuid_dashless()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, NodeIdOrigin, NodeIdSource, SnowflakeId, TimeSource};
    use std::sync::Arc;
    use std::thread::scope;

    struct MockTime {
        millis: u64,
    }

    impl TimeSource<u64> for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis
        }
    }

    #[test]
    fn fixed_node_flows_into_ids() {
        let service = IdService::new(IdConfig::new(NodeIdSource::Fixed(17))).unwrap();
        assert_eq!(service.node_id(), 17);

        let id = SnowflakeId::try_from_i64(service.next_snowflake_id().unwrap()).unwrap();
        assert_eq!(id.node_id(), 17);
    }

    #[test]
    fn out_of_range_fixed_node_is_rejected() {
        for id in [512, 600] {
            let err = IdService::new(IdConfig::new(NodeIdSource::Fixed(id)))
                .err()
                .unwrap();
            assert_eq!(
                err,
                Error::InvalidNodeId {
                    node_id: u64::from(id),
                    max: 511
                }
            );
        }
    }

    #[test]
    fn decimal_string_parses_back() {
        let service = IdService::new(IdConfig::new(NodeIdSource::Fixed(1))).unwrap();
        let s = service.next_snowflake_id_string().unwrap();
        let id: SnowflakeId = s.parse().unwrap();
        assert_eq!(id.to_string(), s);
        assert!(s.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn clock_regression_surfaces() {
        let node = NodeId::new(4, NodeIdOrigin::Fixed).unwrap();
        let snowflake =
            LockSnowflakeGenerator::from_components(500, node, 0, MockTime { millis: 400 });
        let service = IdService::with_generators(snowflake, UuidV7Generator::default());
        assert_eq!(
            service.next_snowflake_id().unwrap_err(),
            Error::ClockRegression { last: 500, now: 400 }
        );
        assert_eq!(service.node_id(), 4);
    }

    #[test]
    fn uuid_forms() {
        let service = IdService::new(IdConfig::new(NodeIdSource::Random)).unwrap();
        assert_eq!(service.next_uuid_v7().get_version_num(), 7);

        let dashless = service.next_uuid_v7_dashless();
        assert_eq!(dashless.len(), 32);
        assert!(!dashless.contains('-'));
    }

    #[test]
    fn shared_instance_is_unique_across_threads() {
        let service = Arc::new(IdService::new(IdConfig::new(NodeIdSource::Fixed(9))).unwrap());
        let ids: Vec<Vec<i64>> = scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let service = Arc::clone(&service);
                    s.spawn(move || {
                        (0..5_000)
                            .map(|_| service.next_snowflake_id().unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut all: Vec<i64> = ids.into_iter().flatten().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 20_000);
    }

    #[test]
    fn global_is_initialized_once() {
        let a = IdService::global();
        let b = IdService::global();
        assert!(std::ptr::eq(a, b));
        assert!(a.next_snowflake_id().unwrap() < b.next_snowflake_id().unwrap());
    }
}
