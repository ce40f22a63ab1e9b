//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Identifies one animation session on a controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Host-issued handle for a pending display-frame callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub i32);

/// Host-issued handle for a pending timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub i32);

/// Monotonic allocator for session ids.
/// Ids are never reused by the same allocator.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_session: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_session(&mut self) -> SessionId {
        self.next_session = self.next_session.wrapping_add(1);
        SessionId(self.next_session)
    }

    /// Most recently allocated session, or `SessionId(0)` before any.
    #[inline]
    pub fn current_session(&self) -> SessionId {
        SessionId(self.next_session)
    }
}
