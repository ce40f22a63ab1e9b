//! Frame scheduling seam.
//!
//! Hosts implement [`FrameScheduler`] on top of their display refresh
//! (`requestAnimationFrame` in the browser) and deliver the frame back to the
//! controller with the handle they issued. [`ManualFrames`] is a deterministic
//! host for headless use and tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ids::FrameHandle;

/// One callback per display refresh.
pub trait FrameScheduler {
    /// Ask the host to deliver the next display frame. The returned handle is
    /// passed back when that frame fires.
    fn request_frame(&self) -> FrameHandle;

    /// Revoke a request. Cancelling an already delivered handle is a no-op.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Current host time in milliseconds, on the same clock as frame timestamps.
    fn now(&self) -> f64;
}

#[derive(Debug, Default)]
struct ManualFramesState {
    now: f64,
    next: i32,
    pending: Vec<FrameHandle>,
    cancelled: usize,
}

/// Frame host driven by explicit [`ManualFrames::advance`] calls.
///
/// Clones share the same clock and queue.
#[derive(Clone, Debug, Default)]
pub struct ManualFrames {
    state: Rc<RefCell<ManualFramesState>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `now` ms.
    pub fn starting_at(now: f64) -> Self {
        let frames = Self::default();
        frames.state.borrow_mut().now = now;
        frames
    }

    /// Move the clock forward by `ms` and hand out every pending frame, in
    /// request order. The caller delivers them (e.g. via `tick`).
    pub fn advance(&self, ms: f64) -> Vec<FrameHandle> {
        let mut st = self.state.borrow_mut();
        st.now += ms;
        std::mem::take(&mut st.pending)
    }

    /// Pending (requested, not yet handed out) frames.
    pub fn pending(&self) -> Vec<FrameHandle> {
        self.state.borrow().pending.clone()
    }

    /// Number of requests that were revoked before delivery.
    pub fn cancelled(&self) -> usize {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&self) -> FrameHandle {
        let mut st = self.state.borrow_mut();
        st.next += 1;
        let handle = FrameHandle(st.next);
        st.pending.push(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut st = self.state.borrow_mut();
        let before = st.pending.len();
        st.pending.retain(|h| *h != handle);
        if st.pending.len() != before {
            st.cancelled += 1;
        }
    }

    fn now(&self) -> f64 {
        self.state.borrow().now
    }
}
