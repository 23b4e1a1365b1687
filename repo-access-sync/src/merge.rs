//! Sorted merge of two keyed collections.
//!
//! [`merge_maps`] sorts each side by key once, then walks both with a
//! two-pointer merge, yielding one [`MergeOutput`] per distinct key in
//! ascending order. Keys present on one side only come out with the other
//! side `None`.

use std::cmp::Ordering;
use std::iter::{FusedIterator, Peekable};
use std::vec;

/// One key of a merge with the value from each side, if present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput<K, L, R> {
    pub key: K,
    pub left: Option<L>,
    pub right: Option<R>,
}

/// Iterator returned by [`merge_maps`].
#[derive(Debug)]
pub struct MergeMaps<K, L, R> {
    left: Peekable<vec::IntoIter<(K, L)>>,
    right: Peekable<vec::IntoIter<(K, R)>>,
}

/// Merge `left` and `right` by key.
///
/// Both inputs are expected to have unique keys (any map iterator does).
/// Borrowing iterators work too: `merge_maps(&a, &b)` yields references.
pub fn merge_maps<K, L, R>(
    left: impl IntoIterator<Item = (K, L)>,
    right: impl IntoIterator<Item = (K, R)>,
) -> MergeMaps<K, L, R>
where
    K: Ord,
{
    MergeMaps {
        left: sorted(left).into_iter().peekable(),
        right: sorted(right).into_iter().peekable(),
    }
}

fn sorted<K: Ord, V>(entries: impl IntoIterator<Item = (K, V)>) -> Vec<(K, V)> {
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

impl<K: Ord, L, R> Iterator for MergeMaps<K, L, R> {
    type Item = MergeOutput<K, L, R>;

    fn next(&mut self) -> Option<Self::Item> {
        let ordering = match (self.left.peek(), self.right.peek()) {
            (Some((l, _)), Some((r, _))) => l.cmp(r),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => return None,
        };

        match ordering {
            Ordering::Less => {
                let (key, value) = self.left.next()?;
                Some(MergeOutput {
                    key,
                    left: Some(value),
                    right: None,
                })
            }
            Ordering::Greater => {
                let (key, value) = self.right.next()?;
                Some(MergeOutput {
                    key,
                    left: None,
                    right: Some(value),
                })
            }
            Ordering::Equal => {
                let (key, left) = self.left.next()?;
                let (_, right) = self.right.next()?;
                Some(MergeOutput {
                    key,
                    left: Some(left),
                    right: Some(right),
                })
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (left, _) = self.left.size_hint();
        let (right, _) = self.right.size_hint();
        (left.max(right), Some(left + right))
    }
}

impl<K: Ord, L, R> FusedIterator for MergeMaps<K, L, R> {}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    fn render<L: ToString, R: ToString>(out: MergeOutput<&str, L, R>) -> String {
        format!(
            "{}:{}:{}",
            out.key,
            out.left.map(|v| v.to_string()).unwrap_or_default(),
            out.right.map(|v| v.to_string()).unwrap_or_default()
        )
    }

    #[test]
    fn merges_two_maps() {
        let left: HashMap<&str, &str> = HashMap::from([
            ("team-A", "pull"),
            ("team-B", "pull"),
            ("team-D", "push"),
            ("team-E", "pull"),
        ]);
        let right: HashMap<&str, &str> = HashMap::from([
            ("team-A", "pull"),
            ("team-C", "push"),
            ("team-D", "push"),
            ("team-F", "pull"),
        ]);
        let results: Vec<String> = merge_maps(left, right).map(render).collect();
        assert_eq!(
            results,
            vec![
                "team-A:pull:pull",
                "team-B:pull:",
                "team-C::push",
                "team-D:push:push",
                "team-E:pull:",
                "team-F::pull",
            ]
        );
    }

    #[test]
    fn disjoint_keys_interleave_in_order() {
        let left = BTreeMap::from([(1, 'a'), (3, 'c'), (5, 'e')]);
        let right = BTreeMap::from([(2, "b"), (4, "d")]);
        let keys: Vec<i32> = merge_maps(left, right).map(|out| out.key).collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn identical_maps_pair_every_key() {
        let map = BTreeMap::from([("x", 1), ("y", 2)]);
        let merged: Vec<_> = merge_maps(&map, &map).collect();
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|out| out.left == out.right));
    }

    #[test]
    fn one_side_empty_flushes_the_other() {
        let left: Vec<(&str, u8)> = vec![];
        let right = vec![("b", 2u8), ("a", 1u8)];
        let merged: Vec<_> = merge_maps(left, right).collect();
        assert_eq!(
            merged,
            vec![
                MergeOutput { key: "a", left: None, right: Some(1) },
                MergeOutput { key: "b", left: None, right: Some(2) },
            ]
        );
    }

    #[test]
    fn both_empty_yields_nothing() {
        let empty: Vec<(u8, u8)> = vec![];
        assert_eq!(merge_maps(empty.clone(), empty).count(), 0);
    }

    #[test]
    fn partial_consumption_is_fine() {
        let left = BTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
        let right = BTreeMap::from([("a", 1)]);
        let mut merged = merge_maps(&left, &right);
        assert_eq!(merged.next().map(|out| *out.key), Some("a"));
        drop(merged);
    }

    #[test]
    fn every_key_emitted_exactly_once() {
        let left: BTreeMap<u32, u32> = (0..50).filter(|n| n % 2 == 0).map(|n| (n, n)).collect();
        let right: BTreeMap<u32, u32> = (0..50).filter(|n| n % 3 == 0).map(|n| (n, n)).collect();
        let merged: Vec<_> = merge_maps(&left, &right).collect();

        let keys: Vec<u32> = merged.iter().map(|out| *out.key).collect();
        let expected: Vec<u32> = (0..50).filter(|n| n % 2 == 0 || n % 3 == 0).collect();
        assert_eq!(keys, expected);
        for out in merged {
            assert_eq!(out.left.is_some(), left.contains_key(out.key));
            assert_eq!(out.right.is_some(), right.contains_key(out.key));
        }
    }
}
