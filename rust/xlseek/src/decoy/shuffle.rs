use super::stream::ShuffleStream;
use serde::{
    Deserialize,
    Serialize,
};

/// How many residues at each end of a sequence keep their position when a
/// decoy is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoyShuffleConfig {
    pub fixed_prefix: usize,
    pub fixed_suffix: usize,
}

impl Default for DecoyShuffleConfig {
    fn default() -> Self {
        // Keep the enzymatic C-terminal residue in place.
        Self {
            fixed_prefix: 0,
            fixed_suffix: 1,
        }
    }
}

/// Shuffles `items[prefix .. len - suffix]` in place.
///
/// Each position `i` of the mutable region, except the last, is swapped with
/// a position drawn uniformly from `[i + 1, last]`. Regions shorter than two
/// elements are left untouched.
pub fn shuffle_region<T>(items: &mut [T], prefix: usize, suffix: usize, stream: &mut ShuffleStream) {
    let len = items.len();
    if prefix + suffix + 1 >= len {
        return;
    }
    let last = len - suffix - 1;
    for i in prefix..last {
        let j = stream.draw_inclusive(i + 1, last);
        items.swap(i, j);
    }
}

/// Shuffled index order for a sequence of length `len`: new position `i`
/// takes the element that was at `order[i]`.
pub fn shuffled_order(
    len: usize,
    config: &DecoyShuffleConfig,
    stream: &mut ShuffleStream,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    shuffle_region(&mut order, config.fixed_prefix, config.fixed_suffix, stream);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_positions_never_move() {
        let original: Vec<u8> = b"ABCDEFGHIJ".to_vec();
        for seed in 0..50 {
            let mut stream = ShuffleStream::from_seed(seed);
            let mut seq = original.clone();
            shuffle_region(&mut seq, 2, 3, &mut stream);
            assert_eq!(&seq[..2], &original[..2]);
            assert_eq!(&seq[7..], &original[7..]);

            let mut sorted = seq.clone();
            sorted.sort();
            assert_eq!(sorted, original);
        }
    }

    #[test]
    fn test_short_regions_untouched() {
        let mut stream = ShuffleStream::from_seed(1);
        let mut seq = b"ABC".to_vec();
        shuffle_region(&mut seq, 1, 1, &mut stream);
        assert_eq!(seq, b"ABC");
        shuffle_region(&mut seq, 2, 2, &mut stream);
        assert_eq!(seq, b"ABC");
        let mut empty: Vec<u8> = vec![];
        shuffle_region(&mut empty, 0, 1, &mut stream);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_two_element_region_always_swaps() {
        let mut stream = ShuffleStream::from_seed(9);
        let mut seq = b"ABK".to_vec();
        shuffle_region(&mut seq, 0, 1, &mut stream);
        assert_eq!(seq, b"BAK");
    }

    #[test]
    fn test_different_streams_give_different_shuffles() {
        let original = b"PEPTIDEWITHLONGMIDDLEK".to_vec();
        let mut outputs = std::collections::HashSet::new();
        for task in 0..10 {
            let mut stream = ShuffleStream::for_task(11, task);
            let mut seq = original.clone();
            shuffle_region(&mut seq, 0, 1, &mut stream);
            outputs.insert(seq);
        }
        assert!(outputs.len() > 1);
    }

    #[test]
    fn test_shuffled_order_is_permutation() {
        let mut stream = ShuffleStream::from_seed(5);
        let config = DecoyShuffleConfig::default();
        let order = shuffled_order(12, &config, &mut stream);
        assert_eq!(order[11], 11);
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
    }
}
