use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::scope;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    EPOCH, Error, LockSnowflakeGenerator, NodeId, NodeIdOrigin, SnowflakeGenerator, SnowflakeId,
    SystemClock, TimeSource,
};

struct MockTime {
    millis: u64,
}

impl TimeSource<u64> for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// Returns `values` in order, one per read, then repeats the last value.
struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl MockStepTime {
    fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            index: Cell::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.index.get()
    }
}

impl TimeSource<u64> for &MockStepTime {
    fn current_millis(&self) -> u64 {
        let i = self.index.get();
        self.index.set(i + 1);
        self.values[i.min(self.values.len() - 1)]
    }
}

/// A clock tests can move in both directions.
struct SettableTime {
    millis: AtomicU64,
}

impl TimeSource<u64> for &SettableTime {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

fn node(id: u16) -> NodeId {
    NodeId::new(id, NodeIdOrigin::Fixed).unwrap()
}

fn run_generator_monotonic<G>(generator: &G, total: usize)
where
    G: SnowflakeGenerator,
{
    let mut last = generator.try_next_id().unwrap();
    for _ in 1..total {
        let id = generator.try_next_id().unwrap();
        assert!(id > last, "{id:?} is not after {last:?}");
        if id.timestamp() == last.timestamp() {
            assert_eq!(id.sequence(), last.sequence() + 1);
        } else {
            assert_eq!(id.sequence(), 0);
        }
        assert_eq!(id.node_id(), generator.node_id());
        last = id;
    }
}

#[test]
fn sequence_increments_within_same_tick() {
    let generator = LockSnowflakeGenerator::new(node(0), MockTime { millis: 42 });

    let id1 = generator.try_next_id().unwrap();
    let id2 = generator.try_next_id().unwrap();
    let id3 = generator.try_next_id().unwrap();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn sequence_resets_on_new_millisecond() {
    let time = MockStepTime::new(vec![42, 42, 43, 43]);
    let generator = LockSnowflakeGenerator::new(node(3), &time);

    let ids: Vec<_> = (0..4).map(|_| generator.try_next_id().unwrap()).collect();
    let fields: Vec<_> = ids.iter().map(|id| (id.timestamp(), id.sequence())).collect();
    assert_eq!(fields, vec![(42, 0), (42, 1), (43, 0), (43, 1)]);
    assert!(ids.iter().all(|id| id.node_id() == 3));
}

#[test]
fn exhausted_sequence_waits_for_next_millisecond() {
    // 1st read sees the exhausted tick; the wait loop then reads 42 twice
    // more before the clock advances.
    let time = MockStepTime::new(vec![42, 42, 42, 43]);
    let generator =
        LockSnowflakeGenerator::from_components(42, node(1), SnowflakeId::max_sequence(), &time);

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
    assert_eq!(id.node_id(), 1);
    assert_eq!(time.reads(), 4);
}

#[test]
fn full_tick_then_rollover() {
    let time = MockStepTime::new(vec![42; 4097].into_iter().chain([43]).collect());
    let generator = LockSnowflakeGenerator::new(node(1), &time);

    for i in 0..=SnowflakeId::max_sequence() {
        let id = generator.try_next_id().unwrap();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }

    let id = generator.try_next_id().unwrap();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn clock_regression_is_refused_and_recoverable() {
    let time = SettableTime {
        millis: AtomicU64::new(100),
    };
    let generator = LockSnowflakeGenerator::new(node(2), &time);
    let first = generator.try_next_id().unwrap();

    time.millis.store(90, Ordering::SeqCst);
    assert_eq!(
        generator.try_next_id().unwrap_err(),
        Error::ClockRegression { last: 100, now: 90 }
    );
    assert_eq!(generator.last_id(), first);

    time.millis.store(100, Ordering::SeqCst);
    let second = generator.try_next_id().unwrap();
    assert_eq!(second.timestamp(), 100);
    assert_eq!(second.sequence(), 1);
}

#[test]
fn future_state_refuses_until_wall_clock_catches_up() {
    let clock = SystemClock::default();
    let ahead = clock.current_millis() + 30;
    let generator = LockSnowflakeGenerator::from_components(ahead, node(5), 0, clock);

    assert!(matches!(
        generator.try_next_id(),
        Err(Error::ClockRegression { last, .. }) if last == ahead
    ));

    std::thread::sleep(Duration::from_millis(60));
    let id = generator.try_next_id().unwrap();
    assert!(id.timestamp() > ahead);
    assert_eq!(id.node_id(), 5);
}

#[test]
fn restored_generator_reports_the_node_it_issues() {
    let top = node(SnowflakeId::max_node_id() as u16);
    let generator = LockSnowflakeGenerator::from_components(7, top, 3, MockTime { millis: 7 });
    let id = generator.try_next_id().unwrap();
    assert_eq!(id.node_id(), SnowflakeId::max_node_id());
    assert_eq!(generator.node_id(), id.node_id());
    assert_eq!(id.sequence(), 4);
}

#[test]
fn timestamp_overflow_is_reported() {
    let generator = LockSnowflakeGenerator::new(
        node(0),
        MockTime {
            millis: SnowflakeId::max_timestamp() + 1,
        },
    );
    assert_eq!(
        generator.try_next_id().unwrap_err(),
        Error::TimestampOverflow {
            timestamp: SnowflakeId::max_timestamp() + 1,
            max: SnowflakeId::max_timestamp(),
        }
    );
}

#[test]
#[should_panic(expected = "snowflake id generation failed")]
fn next_id_aborts_on_failure() {
    let generator = LockSnowflakeGenerator::from_components(50, node(0), 0, MockTime { millis: 10 });
    generator.next_id();
}

#[test]
fn system_clock_sequence_is_strictly_increasing() {
    let generator = LockSnowflakeGenerator::new(node(1), SystemClock::default());
    run_generator_monotonic(&generator, 4096 * 16);
}

#[test]
fn system_clock_fields_track_wall_clock() {
    let generator = LockSnowflakeGenerator::new(node(511), SystemClock::default());
    let before = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;
    let id = generator.try_next_id().unwrap();
    let after = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;

    assert!(id.to_i64() > 0);
    assert!(before <= id.unix_millis() && id.unix_millis() <= after);
    assert_eq!(id.timestamp() + EPOCH.as_millis() as u64, id.unix_millis());
    assert_eq!(id.node_id(), 511);
}

#[test]
fn threaded_ids_are_unique() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 10_000;

    let generator = LockSnowflakeGenerator::new(node(0), SystemClock::default());
    let seen = Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let mut local = Vec::with_capacity(IDS_PER_THREAD);
                let mut last = None;
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.try_next_id().unwrap();
                    // Each caller also sees its own IDs in increasing order.
                    assert!(last.is_none_or(|last| id > last));
                    last = Some(id);
                    local.push(id);
                }
                seen.lock().unwrap().extend(local);
            });
        }
    });

    let total = seen.lock().unwrap().len();
    assert_eq!(total, THREADS * IDS_PER_THREAD, "expected every id to be unique");
}
