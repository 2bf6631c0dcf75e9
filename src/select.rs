//! Order statistic selection through randomized quickselect.
//!
//! The median filter uses this to find the per-channel median of each window
//! in expected linear time instead of sorting every window.

use rand::Rng;
use std::cmp::Ordering;

/// Returns the value that would be at index `k` if `values` were sorted in ascending order.
///
/// The pivot of each round is chosen uniformly at random from the remaining range using `rng`,
/// so the expected running time is linear in `values.len()`.
/// The random choices only affect the running time, never the returned value.
///
/// `values` is reordered in place, but it still holds the same values afterwards.
///
/// # Panics
/// Panics if `k` is not less than `values.len()`.
///
/// # Examples
/// ```
/// # use cartoonette::select::select;
/// # use rand::SeedableRng;
/// # use rand_xoshiro::Xoroshiro128PlusPlus;
/// let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
/// let mut values = [9, 1, 8, 2, 7, 3];
/// assert_eq!(select(&mut values, 0, rng), 1);
/// assert_eq!(select(&mut values, 4, rng), 8);
/// ```
pub fn select<T, R>(values: &mut [T], k: usize, rng: &mut R) -> T
where
    T: Copy + PartialOrd,
    R: Rng + ?Sized,
{
    assert!(
        k < values.len(),
        "cannot select index {k} out of {} values",
        values.len()
    );

    let mut k = k;
    let mut left = 0;
    let mut right = values.len() - 1;

    while left < right {
        let pivot = partition(values, left, right, rng.gen_range(left..=right));

        // k is relative to left
        let rank = pivot - left;
        match rank.cmp(&k) {
            Ordering::Equal => return values[pivot],
            Ordering::Less => {
                k -= rank + 1;
                left = pivot + 1;
            }
            Ordering::Greater => right = pivot - 1,
        }
    }

    values[left]
}

/// Returns the median of `values` (the upper median for even lengths).
///
/// # Panics
/// Panics if `values` is empty.
pub fn median<T, R>(values: &mut [T], rng: &mut R) -> T
where
    T: Copy + PartialOrd,
    R: Rng + ?Sized,
{
    select(values, values.len() / 2, rng)
}

/// Lomuto partition of `values[left..=right]` around the value at `pivot`.
///
/// Returns the final index of the pivot value.
/// Everything before it is less than the pivot, everything after is not.
#[inline]
fn partition<T: Copy + PartialOrd>(
    values: &mut [T],
    left: usize,
    right: usize,
    pivot: usize,
) -> usize {
    let pivot_value = values[pivot];
    values.swap(pivot, right);

    let mut store = left;
    for i in left..right {
        if values[i] < pivot_value {
            values.swap(store, i);
            store += 1;
        }
    }

    values.swap(right, store);
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn random_values(rng: &mut impl Rng, len: usize, max: u8) -> Vec<u8> {
        (0..len).map(|_| rng.gen_range(0..=max)).collect()
    }

    #[test]
    fn sorted_oracle() {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(42);

        for len in [1, 2, 3, 7, 8, 81, 256] {
            // a small max forces many duplicates
            for max in [1, 16, u8::MAX] {
                let values = random_values(rng, len, max);
                let mut sorted = values.clone();
                sorted.sort_unstable();

                for k in 0..len {
                    let mut scratch = values.clone();
                    assert_eq!(select(&mut scratch, k, rng), sorted[k]);

                    scratch.sort_unstable();
                    assert_eq!(scratch, sorted);
                }
            }
        }
    }

    #[test]
    fn pivot_choice_does_not_matter() {
        let values = random_values(&mut Xoroshiro128PlusPlus::seed_from_u64(7), 81, u8::MAX);

        let expected = select(&mut values.clone(), 40, &mut Xoroshiro128PlusPlus::seed_from_u64(0));
        for seed in 1..32 {
            let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
            assert_eq!(select(&mut values.clone(), 40, rng), expected);
        }
    }

    #[test]
    fn constant_values() {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
        let mut values = [5u8; 9];
        assert_eq!(select(&mut values, 0, rng), 5);
        assert_eq!(select(&mut values, 8, rng), 5);
        assert_eq!(median(&mut values, rng), 5);
    }

    #[test]
    fn median_ignores_minority_outliers() {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
        let mut values = [10u8, 10, 255, 10, 0, 10, 10, 10, 10];
        assert_eq!(median(&mut values, rng), 10);
    }

    #[test]
    fn works_for_signed_and_float_values() {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(3);
        let mut signed = [3, -1, -7, 12, 0];
        assert_eq!(median(&mut signed, rng), 0);

        let mut floats = [0.5, -2.0, 1.5];
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(select(&mut floats, 2, rng), 1.5);
        }
    }

    #[test]
    #[should_panic(expected = "cannot select index 3 out of 3 values")]
    fn out_of_range_k() {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
        select(&mut [1, 2, 3], 3, rng);
    }
}
