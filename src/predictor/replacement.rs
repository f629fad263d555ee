//! Round-robin victim selection.

/// Per-set rotating pointers used to pick a way to evict.
///
/// This is *not* recency-based: hits never move the pointer.
#[derive(Clone, Debug)]
pub struct RoundRobin {
    ptr: Vec<usize>,
    assoc: usize,
}
impl RoundRobin {
    pub fn new(sets: usize, assoc: usize) -> Self {
        Self {
            ptr: vec![0; sets.max(1)],
            assoc,
        }
    }

    /// Return the way to replace in some set, and advance the pointer
    /// for that set.
    pub fn victim(&mut self, set: usize) -> usize {
        let way = self.ptr[set];
        self.ptr[set] = (way + 1) % self.assoc;
        way
    }
}
