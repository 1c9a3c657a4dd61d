//! Membership search over pre-sorted key sequences
//!
//! Used when validating bulk imports: the existing keys are sorted once, then
//! every incoming key is looked up in that fixed list.

use serde::{Deserialize, Serialize};

/// Ranges at or below this length are finished with a linear scan
const LINEAR_SCAN_LEN: usize = 3;

/// Whether `target` occurs in `sorted[lo..hi)`.
///
/// `sorted` must be ascending over that range; unsorted input may miss a
/// present key but never reports an absent one. `hi` is clamped to the
/// slice length and an empty range (`lo >= hi`) is always `false`.
pub fn contains<K: PartialOrd>(target: &K, sorted: &[K], lo: usize, hi: usize) -> bool {
    let mut lo = lo;
    let mut hi = hi.min(sorted.len());

    while hi > lo && hi - lo > LINEAR_SCAN_LEN {
        let mid = lo + (hi - lo) / 2;
        let pivot = &sorted[mid];
        if pivot == target {
            return true;
        }
        if target < pivot {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    lo < hi && sorted[lo..hi].iter().any(|key| key == target)
}

/// An owned, sorted and deduplicated key list for repeated lookups
///
/// Serialized as a plain array; deserialization re-sorts through [`SortedKeys::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<K>",
    into = "Vec<K>",
    bound(serialize = "K: Clone + Serialize", deserialize = "K: Ord + Deserialize<'de>")
)]
pub struct SortedKeys<K> {
    keys: Vec<K>,
}

impl<K: Ord> SortedKeys<K> {
    pub fn new(mut keys: Vec<K>) -> Self {
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }

    pub fn contains(&self, key: &K) -> bool {
        contains(key, &self.keys, 0, self.keys.len())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }
}

impl<K: Ord> From<Vec<K>> for SortedKeys<K> {
    fn from(keys: Vec<K>) -> Self {
        Self::new(keys)
    }
}

impl<K> From<SortedKeys<K>> for Vec<K> {
    fn from(sorted: SortedKeys<K>) -> Self {
        sorted.keys
    }
}

impl<K: Ord> FromIterator<K> for SortedKeys<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force<K: PartialEq>(target: &K, keys: &[K], lo: usize, hi: usize) -> bool {
        keys[lo..hi].iter().any(|k| k == target)
    }

    #[test]
    fn test_random_sorted_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..300 {
            let len = rng.gen_range(0..64);
            let mut keys: Vec<i32> = (0..len).map(|_| rng.gen_range(-200..200)).collect();
            keys.sort_unstable();
            keys.dedup();

            for needle in -205..205 {
                assert_eq!(
                    contains(&needle, &keys, 0, keys.len()),
                    keys.contains(&needle),
                    "needle {} in {:?}",
                    needle,
                    keys
                );
            }
        }
    }

    #[test]
    fn test_random_subranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut keys: Vec<u32> = (0..100).map(|_| rng.gen_range(0..1000)).collect();
        keys.sort_unstable();

        for _ in 0..2000 {
            let lo = rng.gen_range(0..=keys.len());
            let hi = rng.gen_range(lo..=keys.len());
            let needle = if rng.gen_bool(0.5) && !keys.is_empty() {
                keys[rng.gen_range(0..keys.len())]
            } else {
                rng.gen_range(0..1000)
            };
            assert_eq!(contains(&needle, &keys, lo, hi), brute_force(&needle, &keys, lo, hi));
        }
    }

    #[test]
    fn test_empty_range_is_false() {
        let keys = [1, 2, 3, 4, 5, 6, 7];
        for i in 0..=keys.len() {
            for needle in 0..9 {
                assert!(!contains(&needle, &keys, i, i));
            }
        }
        assert!(!contains(&4, &keys, 5, 2));
        assert!(!contains(&1, &[] as &[i32], 0, 0));
    }

    #[test]
    fn test_small_ranges_all_permutations() {
        let values = [10, 20, 30];
        let orders: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for order in orders.iter() {
            let seq: Vec<i32> = order.iter().map(|&i| values[i]).collect();
            for len in 0..=3 {
                for needle in [5, 10, 15, 20, 25, 30, 35] {
                    assert_eq!(
                        contains(&needle, &seq, 0, len),
                        brute_force(&needle, &seq, 0, len),
                        "needle {} in {:?}[..{}]",
                        needle,
                        seq,
                        len
                    );
                }
            }
        }
    }

    #[test]
    fn test_hi_is_exclusive() {
        let keys = ["a", "b", "c", "d", "e", "f", "g", "h"];
        assert!(contains(&"g", &keys, 0, 7));
        assert!(!contains(&"h", &keys, 0, 7));
        assert!(!contains(&"a", &keys, 1, 8));
        assert!(contains(&"h", &keys, 0, 100));
    }

    #[test]
    fn test_string_keys() {
        let mut macs: Vec<String> = ["f0:12:aa:00:00:01", "00:1b:44:11:3a:b7", "a4:c1:38:9e:02:10", "00:1b:44:11:3a:b8"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        macs.sort();
        assert!(contains(&"a4:c1:38:9e:02:10".to_string(), &macs, 0, macs.len()));
        assert!(!contains(&"a4:c1:38:9e:02:11".to_string(), &macs, 0, macs.len()));
    }

    #[test]
    fn test_float_keys() {
        let keys = [-3.5, -1.0, 0.0, 0.25, 2.0, 9.75];
        assert!(contains(&0.25, &keys, 0, keys.len()));
        assert!(!contains(&0.3, &keys, 0, keys.len()));
    }

    #[test]
    fn test_sorted_keys_sorts_and_dedups() {
        let keys: SortedKeys<u64> = vec![9, 3, 3, 7, 1, 9].into_iter().collect();
        assert_eq!(keys.as_slice(), &[1, 3, 7, 9]);
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&7));
        assert!(!keys.contains(&8));
        assert!(SortedKeys::<u64>::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_unsorted_input_never_false_positive() {
        let mut rng = StdRng::seed_from_u64(0xbad5);
        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let keys: Vec<i32> = (0..len).map(|_| rng.gen_range(-50..50)).collect();
            for needle in -55..55 {
                let lo = rng.gen_range(0..=keys.len());
                let hi = rng.gen_range(lo..=keys.len());
                if contains(&needle, &keys, lo, hi) {
                    assert!(brute_force(&needle, &keys, lo, hi), "false positive {} in {:?}[{}..{}]", needle, keys, lo, hi);
                }
            }
        }
    }

    #[test]
    fn test_sorted_keys_deserialize_resorts() {
        let keys: SortedKeys<u32> = serde_json::from_str("[9,8,7,6,5,4,1,4]").unwrap();
        assert_eq!(keys.as_slice(), &[1, 4, 5, 6, 7, 8, 9]);
        assert!(keys.contains(&1));
        assert_eq!(serde_json::to_string(&keys).unwrap(), "[1,4,5,6,7,8,9]");
    }
}
