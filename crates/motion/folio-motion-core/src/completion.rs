//! Deferred handle resolved when an animation session completes.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct CompletionState {
    resolved: bool,
    waker: Option<Waker>,
}

/// Resolves once, when its session reaches progress 1.
///
/// A session that is superseded or cancelled leaves its completion pending
/// forever, mirroring `on_complete` never firing.
#[derive(Clone, Debug, Default)]
pub struct Completion {
    state: Rc<RefCell<CompletionState>>,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    pub(crate) fn resolve(&self) {
        let waker = {
            let mut st = self.state.borrow_mut();
            st.resolved = true;
            st.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut st = self.state.borrow_mut();
        if st.resolved {
            Poll::Ready(())
        } else {
            st.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}
