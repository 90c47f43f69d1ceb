use rand::Rng;
use rand::seq::SliceRandom;

/// Draw `min(count, catalog.len())` items without replacement.
///
/// The whole pool is Fisher-Yates shuffled and then truncated, so every
/// subset and ordering is equally likely.
pub fn sample<T: Clone, R: Rng + ?Sized>(catalog: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut pool = catalog.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
