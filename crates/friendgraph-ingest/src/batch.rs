//! Partitioning identifier sets into bounded-size batches.
//!
//! The caller's slice is never reordered: when shuffling is requested the
//! shuffle runs on a private copy, so concurrent callers holding the same
//! data see no mutation.

use rand::seq::SliceRandom;
use rand::Rng;

use friendgraph_core::{FriendGraphError, Result};

/// Split `items` into successive chunks of `chunk_size`.
///
/// Every chunk but the last holds exactly `chunk_size` items; the last holds
/// the remainder. An empty input yields no chunks. When `randomize` is set,
/// a copy of the input is shuffled with the thread-local generator first.
pub fn partition<T: Clone>(items: &[T], chunk_size: usize, randomize: bool) -> Result<Vec<Vec<T>>> {
    partition_with_rng(items, chunk_size, randomize, &mut rand::rng())
}

/// [`partition`] with a caller-supplied generator, for reproducible shuffles.
pub fn partition_with_rng<T, R>(
    items: &[T],
    chunk_size: usize,
    randomize: bool,
    rng: &mut R,
) -> Result<Vec<Vec<T>>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if chunk_size == 0 {
        return Err(FriendGraphError::InvalidArgument(
            "chunk_size must be positive".to_string(),
        ));
    }

    let mut working = items.to_vec();
    if randomize {
        working.shuffle(rng);
    }

    Ok(working.chunks(chunk_size).map(<[T]>::to_vec).collect())
}

/// Concatenate chunks back into one sequence, in emitted order.
pub fn combine_sublists<T>(chunks: Vec<Vec<T>>) -> Vec<T> {
    chunks.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_even_split() {
        let chunks = partition(&[1, 2, 3, 4, 5, 6], 2, false).unwrap();
        assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn test_remainder_in_last_chunk() {
        let chunks = partition(&["a", "b", "c", "d", "e"], 2, false).unwrap();
        assert_eq!(chunks, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }

    #[test]
    fn test_chunk_larger_than_input() {
        let chunks = partition(&[1, 2, 3], 10, false).unwrap();
        assert_eq!(chunks, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunks = partition::<u32>(&[], 3, true).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = partition(&[1, 2, 3], 0, false).unwrap_err();
        assert!(matches!(err, FriendGraphError::InvalidArgument(_)));

        let err = partition::<u32>(&[], 0, false).unwrap_err();
        assert!(matches!(err, FriendGraphError::InvalidArgument(_)));
    }

    #[test]
    fn test_shuffle_leaves_input_untouched() {
        let original: Vec<u32> = (0..100).collect();
        let snapshot = original.clone();
        let mut rng = StdRng::seed_from_u64(42);

        let chunks = partition_with_rng(&original, 7, true, &mut rng).unwrap();

        assert_eq!(original, snapshot);
        let mut combined = combine_sublists(chunks);
        assert_ne!(combined, snapshot);
        combined.sort_unstable();
        assert_eq!(combined, snapshot);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let items: Vec<u32> = (0..50).collect();
        let a = partition_with_rng(&items, 5, true, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = partition_with_rng(&items, 5, true, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_partition_is_permutation(
            items in proptest::collection::vec(any::<u16>(), 0..200),
            chunk_size in 1usize..40,
            randomize in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let chunks = partition_with_rng(&items, chunk_size, randomize, &mut rng).unwrap();

            prop_assert_eq!(chunks.len(), items.len().div_ceil(chunk_size));
            if let Some((last, full)) = chunks.split_last() {
                prop_assert!(full.iter().all(|c| c.len() == chunk_size));
                prop_assert!(!last.is_empty() && last.len() <= chunk_size);
            }

            let mut combined = combine_sublists(chunks);
            if randomize {
                let mut expected = items.clone();
                expected.sort_unstable();
                combined.sort_unstable();
                prop_assert_eq!(combined, expected);
            } else {
                prop_assert_eq!(combined, items);
            }
        }
    }
}
