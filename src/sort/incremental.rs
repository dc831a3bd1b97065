/// Incremental partial sort via quickselect
///
/// Yields the next-smallest element of a caller-owned buffer on demand,
/// fully ordering only as much of it as is consumed. Each partition's
/// boundary is remembered on a stack, so `k` calls to `next` cost
/// O(n + k log k) rather than the O(n log n) of a full sort. Three-way
/// partitioning keeps runs of duplicate keys cheap, and a median-of-medians
/// pivot takes over whenever a partition lands badly off-center, bounding
/// the worst case.
use std::cmp::Ordering;

use smallvec::SmallVec;

/// Segments at or below this length are finished with an insertion sort.
const INSERTION_CUTOFF: usize = 16;

pub struct IncrementalSorter<'a, T, F>
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering,
{
    data: &'a mut [T],
    cmp: F,
    /// Positions already in final order but not yet returned, strictly
    /// decreasing toward the top, with the buffer length as sentinel.
    stack: SmallVec<[usize; 32]>,
    /// Everything left of this index has been returned.
    extracted: usize,
    /// End of a prefix finished by insertion sort; served without work.
    sorted_until: usize,
}

impl<'a, T: Copy + Ord> IncrementalSorter<'a, T, fn(&T, &T) -> Ordering> {
    /// Sorter over the natural order of `T`.
    pub fn new(data: &'a mut [T]) -> Self {
        Self::with_comparator(data, T::cmp)
    }
}

impl<'a, T, F> IncrementalSorter<'a, T, F>
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering,
{
    pub fn with_comparator(data: &'a mut [T], cmp: F) -> Self {
        let len = data.len();
        let mut stack = SmallVec::new();
        stack.push(len);

        Self {
            data,
            cmp,
            stack,
            extracted: 0,
            sorted_until: 0,
        }
    }

    /// Number of elements not yet returned.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.extracted
    }

    /// Returns the next-smallest unreturned element, or `None` once the
    /// whole buffer has been consumed. After `k` calls the first `k` slots
    /// of the buffer hold the `k` smallest elements in order.
    pub fn next(&mut self) -> Option<T> {
        if self.extracted == self.data.len() {
            return None;
        }

        if self.extracted < self.sorted_until {
            let value = self.data[self.extracted];
            self.extracted += 1;
            return Some(value);
        }

        loop {
            let top = *self.stack.last().expect("boundary stack underflow");

            // A previously placed pivot sits right at the consumption
            // point; hand it out and retire its boundary.
            if top == self.extracted {
                self.stack.pop();
                let value = self.data[self.extracted];
                self.extracted += 1;
                return Some(value);
            }

            let len = top - self.extracted;
            if len <= INSERTION_CUTOFF {
                insertion_sort(&mut self.data[self.extracted..top], &self.cmp);
                self.sorted_until = top;
                let value = self.data[self.extracted];
                self.extracted += 1;
                return Some(value);
            }

            let (lo, hi) = (self.extracted, top);
            let pivot = self.data[lo + len / 2];
            let (mut lt, mut gt) = partition_three_way(self.data, lo, hi, pivot, &self.cmp);

            // An off-center partition (equal-run entirely outside the
            // middle 30-70% of the segment) gets one retry with a
            // median-of-medians pivot.
            let low_cut = lo + (len * 3) / 10;
            let high_cut = lo + (len * 7) / 10;
            if gt <= low_cut || lt >= high_cut {
                let pivot = median_of_medians(self.data, lo, hi, &self.cmp);
                let redone = partition_three_way(self.data, lo, hi, pivot, &self.cmp);
                lt = redone.0;
                gt = redone.1;
            }

            // Every slot holding the pivot value is final; record each as
            // a boundary (largest first, so the stack stays decreasing)
            // and keep selecting within the left segment.
            for position in (lt..gt).rev() {
                self.stack.push(position);
            }
        }
    }
}

fn insertion_sort<T: Copy, F: Fn(&T, &T) -> Ordering>(data: &mut [T], cmp: &F) {
    for i in 1..data.len() {
        let mut j = i;
        while j > 0 && cmp(&data[j - 1], &data[j]) == Ordering::Greater {
            data.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Dutch-flag partition of `data[lo..hi]` around `pivot`. Returns
/// `(lt, gt)` such that `data[lo..lt] < pivot`, `data[lt..gt] == pivot`,
/// and `data[gt..hi] > pivot`.
fn partition_three_way<T: Copy, F: Fn(&T, &T) -> Ordering>(
    data: &mut [T],
    lo: usize,
    hi: usize,
    pivot: T,
    cmp: &F,
) -> (usize, usize) {
    let mut lt = lo;
    let mut i = lo;
    let mut gt = hi;

    while i < gt {
        match cmp(&data[i], &pivot) {
            Ordering::Less => {
                data.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                data.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }

    (lt, gt)
}

/// Classic median-of-medians over `data[lo..hi]`: groups of five are
/// insertion-sorted, their medians moved to the segment front, and the
/// procedure recurses on that prefix. Reorders the segment, which is fine
/// because a partition follows immediately.
fn median_of_medians<T: Copy, F: Fn(&T, &T) -> Ordering>(
    data: &mut [T],
    lo: usize,
    hi: usize,
    cmp: &F,
) -> T {
    let len = hi - lo;
    if len <= 5 {
        insertion_sort(&mut data[lo..hi], cmp);
        return data[lo + len / 2];
    }

    let mut medians_end = lo;
    let mut group_start = lo;
    while group_start < hi {
        let group_end = (group_start + 5).min(hi);
        insertion_sort(&mut data[group_start..group_end], cmp);
        data.swap(medians_end, group_start + (group_end - group_start) / 2);
        medians_end += 1;
        group_start = group_end;
    }

    median_of_medians(data, lo, medians_end, cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::prelude::*;

    fn drain<T: Copy + Ord>(data: &mut [T]) -> Vec<T> {
        let mut sorter = IncrementalSorter::new(data);
        let mut out = Vec::new();
        while let Some(v) = sorter.next() {
            out.push(v);
        }
        out
    }

    #[test]
    fn empty_and_singleton() {
        let mut empty: [i64; 0] = [];
        assert_eq!(IncrementalSorter::new(&mut empty).next(), None);

        let mut one = [42i64];
        let mut sorter = IncrementalSorter::new(&mut one);
        assert_eq!(sorter.next(), Some(42));
        assert_eq!(sorter.next(), None);
    }

    #[test]
    fn full_consumption_equals_full_sort() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [2usize, 17, 100, 1000] {
            let mut data: Vec<i64> = (0..n).map(|_| rng.gen_range(-500..500)).collect();
            let mut expected = data.clone();
            expected.sort();

            assert_eq!(drain(&mut data), expected);
            // the buffer itself ends up fully sorted in place
            assert_eq!(data, expected);
        }
    }

    #[test]
    fn prefix_consumption_equals_sort_prefix() {
        let mut rng = StdRng::seed_from_u64(11);
        let data: Vec<i64> = (0..500).map(|_| rng.gen_range(0..100)).collect();
        let mut expected = data.clone();
        expected.sort();

        for k in [1usize, 3, 50, 499] {
            let mut buf = data.clone();
            let mut sorter = IncrementalSorter::new(&mut buf);
            let prefix: Vec<i64> = (0..k).map(|_| sorter.next().unwrap()).collect();
            assert_eq!(prefix, expected[..k]);
        }
    }

    #[test]
    fn heavy_duplicates() {
        let mut data: Vec<i64> = (0..400).map(|i| i % 3).collect();
        let mut expected = data.clone();
        expected.sort();
        assert_eq!(drain(&mut data), expected);

        let mut same = vec![9i64; 257];
        assert_eq!(drain(&mut same), vec![9i64; 257]);
    }

    #[test]
    fn off_center_pivot_falls_back_to_median_of_medians() {
        // the middle element is the maximum, so the first partition lands
        // entirely above the 70th percentile and triggers the fallback
        let mut data: Vec<i64> = (0..64).collect();
        data.swap(32, 63);
        let mut expected = data.clone();
        expected.sort();

        assert_eq!(drain(&mut data), expected);
    }

    #[test]
    fn custom_comparator_descending() {
        let mut data = vec![3i64, 1, 4, 1, 5, 9, 2, 6];
        let mut sorter = IncrementalSorter::with_comparator(&mut data, |a, b| b.cmp(a));
        let mut out = Vec::new();
        while let Some(v) = sorter.next() {
            out.push(v);
        }
        assert_eq!(out, vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn remaining_tracks_consumption() {
        let mut data = vec![5i64, 2, 8, 1];
        let mut sorter = IncrementalSorter::new(&mut data);
        assert_eq!(sorter.remaining(), 4);
        sorter.next();
        sorter.next();
        assert_eq!(sorter.remaining(), 2);
    }

    #[test]
    fn sorts_structs_by_key() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Edge {
            i: u32,
            k: u32,
            d: i64,
        }

        let mut edges = vec![
            Edge { i: 0, k: 1, d: 5 },
            Edge { i: 0, k: 2, d: 1 },
            Edge { i: 1, k: 2, d: 3 },
        ];
        let mut sorter = IncrementalSorter::with_comparator(&mut edges, |a, b| a.d.cmp(&b.d));

        assert_eq!(sorter.next().map(|e| e.d), Some(1));
        assert_eq!(sorter.next().map(|e| e.d), Some(3));
        assert_eq!(sorter.next().map(|e| e.d), Some(5));
        assert_eq!(sorter.next(), None);
    }
}
