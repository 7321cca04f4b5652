//! Transient Buffer Pool
//!
//! A per-frame arena of host temporary buffers. A pass fills it during
//! **setup**, addresses the buffers by index during **execute**, and drains it
//! during **cleanup**.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              TransientBufferPool              │
//! │                                               │
//! │  active: [BufferId]  ←── indexed 0..len       │
//! │                                               │
//! │  allocate()  (setup,   pushes one id)         │
//! │  get(i)      (execute, read only)             │
//! │  release_all (cleanup, drains every id)       │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The arena is the authoritative record of what was acquired: the number of
//! buffers released is always the number that were allocated, even when setup
//! stopped halfway because the host refused an allocation.

use smallvec::SmallVec;

use crate::errors::Result;
use crate::host::{BufferDesc, BufferId, RenderHost};

/// Arena of temporary buffers valid for one frame.
#[derive(Debug, Default)]
pub struct TransientBufferPool {
    active: SmallVec<[BufferId; 6]>,
}

impl TransientBufferPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Setup phase ────────────────────────────────────────────────────────

    /// Acquires a temporary buffer from the host and appends it.
    ///
    /// Returns the index of the new buffer.
    pub fn allocate(&mut self, host: &mut dyn RenderHost, desc: &BufferDesc) -> Result<usize> {
        let id = host.acquire_temporary(desc)?;
        self.active.push(id);
        Ok(self.active.len() - 1)
    }

    // ── Execute phase ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<BufferId> {
        self.active.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[BufferId] {
        &self.active
    }

    // ── Cleanup phase ──────────────────────────────────────────────────────

    /// Releases every buffer in the arena, finest first.
    ///
    /// All buffers are released even if some releases fail; the first error is
    /// returned. Returns the number of buffers released otherwise.
    pub fn release_all(&mut self, host: &mut dyn RenderHost) -> Result<usize> {
        let count = self.active.len();
        let mut first_error = None;
        for id in self.active.drain(..) {
            if let Err(err) = host.release_temporary(id) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DEFAULT_COLOR_FORMAT, HeadlessHost};

    #[test]
    fn release_matches_allocation() {
        let mut host = HeadlessHost::new(64, 64);
        let mut pool = TransientBufferPool::new();

        for size in [32, 16, 8] {
            let desc = BufferDesc::color(size, size, DEFAULT_COLOR_FORMAT, "level");
            pool.allocate(&mut host, &desc).unwrap();
        }
        assert_eq!(pool.len(), 3);
        assert_eq!(host.temporary_count(), 3);

        assert_eq!(pool.release_all(&mut host).unwrap(), 3);
        assert!(pool.is_empty());
        assert_eq!(host.temporary_count(), 0);

        // Draining an empty arena releases nothing.
        assert_eq!(pool.release_all(&mut host).unwrap(), 0);
    }

    #[test]
    fn failed_allocation_keeps_earlier_buffers_tracked() {
        let mut host = HeadlessHost::new(64, 64);
        let mut pool = TransientBufferPool::new();

        pool.allocate(&mut host, &BufferDesc::color(8, 8, DEFAULT_COLOR_FORMAT, "ok"))
            .unwrap();
        assert!(
            pool.allocate(&mut host, &BufferDesc::color(0, 8, DEFAULT_COLOR_FORMAT, "bad"))
                .is_err()
        );

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.release_all(&mut host).unwrap(), 1);
        assert_eq!(host.temporary_count(), 0);
    }
}
