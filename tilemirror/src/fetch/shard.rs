//! Partitioning of the tile sequence across worker groups.

/// Split `items` into `shard_count` contiguous, near-equal shards.
///
/// Together the shards cover the input exactly once, in order; sizes differ
/// by at most one. When there are fewer items than shards, the tail shards
/// are empty.
///
/// # Panics
/// Panics if `shard_count` is zero.
pub fn split_into_shards<T>(items: Vec<T>, shard_count: usize) -> Vec<Vec<T>> {
	assert!(shard_count != 0, "shard_count must be greater than 0");

	let len = items.len();
	let base = len / shard_count;
	let remainder = len % shard_count;

	let mut iter = items.into_iter();
	(0..shard_count)
		.map(|index| {
			let take = base + usize::from(index < remainder);
			iter.by_ref().take(take).collect()
		})
		.collect()
}
