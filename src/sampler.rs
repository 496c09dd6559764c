use rand::Rng;
use rand::seq::IndexedRandom;

/// Uniformly pick `count` items without replacement. Asking for more items than
/// exist returns all of them, in random order.
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    if items.is_empty() {
        log::info!("Nothing to sample from");
        return Vec::new();
    }

    let count = count.min(items.len());
    log::debug!("Sampling {} of {} items", count, items.len());
    items.choose_multiple(rng, count).cloned().collect()
}
