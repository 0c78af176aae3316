//! Instance recycling
//!
//! The chain never creates ball instances itself; it asks a pool for one on
//! spawn and hands it back on eviction or removal.

use serde::{Deserialize, Serialize};

/// Source of reusable member instances
pub trait InstancePool<T> {
    /// Take an instance, or `None` when there is no capacity right now
    fn acquire(&mut self) -> Option<T>;
    /// Return an instance for reuse
    fn release(&mut self, item: T);
}

/// Stable handle of a ball instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Pool of [`BallId`]s
///
/// Released ids are reused most-recent-first. When the free list is empty a
/// fresh id is minted, unless `capacity` live instances already exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallPool {
    free: Vec<BallId>,
    /// Instances currently handed out
    live: usize,
    capacity: Option<usize>,
    /// Next id to mint
    next_id: u32,
}

impl BallPool {
    /// Unbounded pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool that never has more than `capacity` instances out at once
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn live(&self) -> usize {
        self.live
    }

    /// Instances waiting for reuse
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Total instances ever minted
    pub fn minted(&self) -> u32 {
        self.next_id
    }

    fn mint(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl InstancePool<BallId> for BallPool {
    fn acquire(&mut self) -> Option<BallId> {
        if self.capacity.is_some_and(|cap| self.live >= cap) {
            return None;
        }
        let id = match self.free.pop() {
            Some(id) => id,
            None => self.mint(),
        };
        self.live += 1;
        Some(id)
    }

    fn release(&mut self, item: BallId) {
        debug_assert!(!self.free.contains(&item), "{:?} released twice", item);
        self.live = self.live.saturating_sub(1);
        self.free.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mints_sequential_ids() {
        let mut pool = BallPool::new();
        assert_eq!(pool.acquire(), Some(BallId(0)));
        assert_eq!(pool.acquire(), Some(BallId(1)));
        assert_eq!(pool.live(), 2);
        assert_eq!(pool.minted(), 2);
    }

    #[test]
    fn test_reuses_released_ids() {
        let mut pool = BallPool::new();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 2);

        // Most recently released first
        assert_eq!(pool.acquire(), Some(b));
        assert_eq!(pool.acquire(), Some(a));
        assert_eq!(pool.minted(), 2);
    }

    #[test]
    fn test_capacity_limits_live_instances() {
        let mut pool = BallPool::with_capacity(2);
        let a = pool.acquire().unwrap();
        pool.acquire().unwrap();
        assert_eq!(pool.acquire(), None);

        pool.release(a);
        assert_eq!(pool.acquire(), Some(a));
        assert_eq!(pool.acquire(), None);
    }

    #[test]
    fn test_zero_capacity_never_acquires() {
        let mut pool = BallPool::with_capacity(0);
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.minted(), 0);
    }
}
