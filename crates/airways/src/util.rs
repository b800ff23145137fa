//! Small shared helpers used by both A* searches.

use std::cmp::Ordering;

/// Min-heap wrapper for `BinaryHeap` keyed by an `f64` score (lower pops
/// first). Payload ties are broken by insertion order at the call site.
#[derive(Debug, Clone, Copy)]
pub struct MinScored<T>(pub f64, pub T);

impl<T> PartialEq for MinScored<T> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}
impl<T> Eq for MinScored<T> {}

impl<T> PartialOrd for MinScored<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl<T> Ord for MinScored<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) yields the smallest score first.
        other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
    }
}
