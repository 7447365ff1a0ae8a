//! Bounded-depth parallel tree reduction.
//!
//! [`tree_reduce`] maps every item of a slice and combines the results with a binary
//! operation. The slice is split in halves recursively (fan-in 2); the right half of each
//! split runs on a scoped thread while the current thread handles the left half. Recursion
//! stops when a chunk is no larger than [`TreeReduceConfig::sequential_threshold`] or at the
//! depth limit, and the chunk is then folded sequentially.
//!
//! The depth limit is [`TreeReduceConfig::max_depth`], lowered to `ceil(log2(cores))` so that
//! at most `2^depth` threads (fewer than twice the available cores) are alive at once,
//! whatever the batch size.
//!
//! Results are always combined as `combine(left, right)` in slice order, so for an
//! associative `combine` the outcome equals the sequential left fold.
//!
//! ```text
//! depth 0            [0 .. n)
//!                   /        \
//! depth 1    [0 .. n/2)    [n/2 .. n)      <- spawned
//!              ...            ...
//! depth d    sequential fold once d == max_depth or len <= threshold
//! ```

use std::{num::NonZeroUsize, panic, thread};

use serde::{Deserialize, Serialize};

/// Default maximum recursion depth of the reduction tree.
///
/// With fan-in 2 this allows up to 2^20 leaves. The effective limit is further capped by
/// the available parallelism, see [`parallel_depth`].
pub const TREE_REDUCE_DEPTH: usize = 20;

/// Default chunk size below which items are folded on a single thread.
pub const SEQUENTIAL_THRESHOLD: usize = 64;

/// Tuning of [`tree_reduce`], the `evaluation` section of the engine configuration.
///
/// Both fields default when omitted: `max_depth` to [`TREE_REDUCE_DEPTH`] and
/// `sequential_threshold` to [`SEQUENTIAL_THRESHOLD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeReduceConfig {
    /// Maximum number of halvings before a chunk is folded sequentially.
    pub max_depth: usize,
    /// Chunks of at most this many items are folded on a single thread.
    pub sequential_threshold: usize,
}

impl Default for TreeReduceConfig {
    fn default() -> Self {
        Self {
            max_depth: TREE_REDUCE_DEPTH,
            sequential_threshold: SEQUENTIAL_THRESHOLD,
        }
    }
}

impl TreeReduceConfig {
    /// A configuration that never splits.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            max_depth: 0,
            sequential_threshold: usize::MAX,
        }
    }
}

/// Depth at which the reduction tree has one leaf per available core, `ceil(log2(cores))`.
///
/// Falls back to 0 (no extra threads) when the parallelism cannot be queried.
#[must_use]
pub fn parallel_depth() -> usize {
    let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    usize::try_from(cores.next_power_of_two().trailing_zeros()).unwrap_or(0)
}

/// Maps and reduces `items`, returning `None` for an empty slice.
///
/// # Arguments
///
/// * `items` - Inputs, mapped in place and never reordered
/// * `config` - Depth limit and sequential threshold
/// * `map` - Per-item function, called exactly once per item
/// * `combine` - Associative merge, always called as `combine(left, right)`
///
/// # Examples
///
/// ```
/// use rulesift_evaluator::tree_reduce::{TreeReduceConfig, tree_reduce};
///
/// let items = (1..=1000).collect::<Vec<u64>>();
/// let config = TreeReduceConfig { max_depth: 4, sequential_threshold: 16 };
/// let sum = tree_reduce(&items, config, |x| *x, |a, b| a + b);
/// assert_eq!(sum, Some(500_500));
/// ```
pub fn tree_reduce<T, R, M, C>(
    items: &[T],
    config: TreeReduceConfig,
    map: M,
    combine: C,
) -> Option<R>
where
    T: Sync,
    R: Send,
    M: Fn(&T) -> R + Sync,
    C: Fn(R, R) -> R + Sync,
{
    let config = TreeReduceConfig {
        max_depth: config.max_depth.min(parallel_depth()),
        ..config
    };
    reduce_at(items, 0, config, &map, &combine)
}

fn reduce_at<T, R, M, C>(
    items: &[T],
    depth: usize,
    config: TreeReduceConfig,
    map: &M,
    combine: &C,
) -> Option<R>
where
    T: Sync,
    R: Send,
    M: Fn(&T) -> R + Sync,
    C: Fn(R, R) -> R + Sync,
{
    if depth >= config.max_depth || items.len() <= config.sequential_threshold.max(1) {
        return items.iter().map(map).reduce(combine);
    }

    let (left, right) = items.split_at(items.len() / 2);
    let (left, right) = thread::scope(|s| {
        let handle = s.spawn(|| reduce_at(right, depth + 1, config, map, combine));
        let left = reduce_at(left, depth + 1, config, map, combine);
        let right = handle
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        (left, right)
    });

    match (left, right) {
        (Some(left), Some(right)) => Some(combine(left, right)),
        (left, right) => left.or(right),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::atomic::{AtomicUsize, Ordering},
        thread::ThreadId,
    };

    use super::*;

    #[test]
    fn test_empty_input() {
        let items: [u32; 0] = [];
        assert_eq!(
            tree_reduce(&items, TreeReduceConfig::default(), |x| *x, |a, b| a + b),
            None
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let items = (0..500).collect::<Vec<usize>>();
        let config = TreeReduceConfig {
            max_depth: 6,
            sequential_threshold: 3,
        };
        let concatenated = tree_reduce(
            &items,
            config,
            |x| vec![*x],
            |mut a, b| {
                a.extend(b);
                a
            },
        );
        assert_eq!(concatenated, Some(items));
    }

    #[test]
    fn test_every_item_mapped_once() {
        let calls = AtomicUsize::new(0);
        let items = vec![1u64; 300];
        let config = TreeReduceConfig {
            max_depth: TREE_REDUCE_DEPTH,
            sequential_threshold: 1,
        };
        let total = tree_reduce(
            &items,
            config,
            |x| {
                calls.fetch_add(1, Ordering::Relaxed);
                *x
            },
            |a, b| a + b,
        );
        assert_eq!(total, Some(300));
        assert_eq!(calls.load(Ordering::Relaxed), 300);
    }

    #[test]
    fn test_sequential_config_stays_on_caller_thread() {
        let caller = thread::current().id();
        let items = vec![(); 100];
        let threads = tree_reduce(
            &items,
            TreeReduceConfig::sequential(),
            |()| vec![thread::current().id()],
            |mut a: Vec<ThreadId>, b| {
                a.extend(b);
                a
            },
        )
        .unwrap();
        assert!(threads.iter().all(|id| *id == caller));
    }

    #[test]
    fn test_depth_limit_bounds_splitting() {
        // depth 1 splits once, so exactly one extra thread maps items
        let caller = thread::current().id();
        let items = vec![(); 100];
        let config = TreeReduceConfig {
            max_depth: 1,
            sequential_threshold: 1,
        };
        let mut threads = tree_reduce(
            &items,
            config,
            |()| vec![thread::current().id()],
            |mut a: Vec<ThreadId>, b| {
                a.extend(b);
                a
            },
        )
        .unwrap();
        assert!(threads[..50].iter().all(|id| *id == caller));
        threads.dedup();
        let expected = if parallel_depth() >= 1 { 2 } else { 1 };
        assert_eq!(threads.len(), expected);
    }

    #[test]
    fn test_thread_count_bounded_by_parallelism() {
        let items = vec![(); 20_000];
        let config = TreeReduceConfig {
            max_depth: TREE_REDUCE_DEPTH,
            sequential_threshold: 1,
        };
        let threads = tree_reduce(
            &items,
            config,
            |()| HashSet::from([thread::current().id()]),
            |mut a: HashSet<ThreadId>, b| {
                a.extend(b);
                a
            },
        )
        .unwrap();
        assert!(threads.len() <= 1 << parallel_depth());
        let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        assert!(threads.len() < 2 * cores);
    }

    #[test]
    fn test_parallel_depth_covers_cores() {
        let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let depth = parallel_depth();
        assert!(1 << depth >= cores);
        assert!(depth == 0 || 1 << (depth - 1) < cores);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_worker_panic_propagates() {
        let items = (0..100).collect::<Vec<u32>>();
        let config = TreeReduceConfig {
            max_depth: 3,
            sequential_threshold: 1,
        };
        let _ = tree_reduce(
            &items,
            config,
            |x| {
                assert!(*x != 99, "boom");
                *x
            },
            |a, b| a + b,
        );
    }
}
