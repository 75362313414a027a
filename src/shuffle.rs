//! Uniform random permutations (Fisher–Yates)

use rand::Rng;

/// Shuffle a slice in place.
///
/// Walks from the last index down to 1 and swaps each element with a
/// uniformly chosen index in `[0, i]`. Empty and single-element slices are
/// left untouched.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Return a shuffled copy of `items`; the input is never mutated.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}
