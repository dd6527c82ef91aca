//! Cancellable handles for delayed runs, click resolutions and active runs.
//!
//! Everything here is single-threaded: handles are shared with `Rc` between
//! futures polled by the same executor, never across threads.

use embassy_sync::waitqueue::MultiWakerRegistration;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::poll_fn;
use std::rc::Rc;
use std::task::Poll;

/// Most futures ever waiting on one handle at the same time. Registering more
/// wakes the existing waiters early, which is harmless: they poll again.
const MAX_WAITERS: usize = 4;

struct TaskState {
    cancelled: Cell<bool>,
    finished: Cell<bool>,
    wakers: RefCell<MultiWakerRegistration<MAX_WAITERS>>,
}

#[derive(Clone)]
pub struct TaskHandle {
    inner: Rc<TaskState>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(TaskState {
                cancelled: Cell::new(false),
                finished: Cell::new(false),
                wakers: RefCell::new(MultiWakerRegistration::new()),
            }),
        }
    }

    /// Requests cancellation. Idempotent, and a no-op once the task finished.
    pub fn cancel(&self) {
        if self.inner.finished.get() || self.inner.cancelled.get() {
            return;
        }
        self.inner.cancelled.set(true);
        self.inner.wakers.borrow_mut().wake();
    }

    pub fn finish(&self) {
        if self.inner.finished.replace(true) {
            return;
        }
        self.inner.wakers.borrow_mut().wake();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.finished.get()
    }

    pub fn ptr_eq(&self, other: &TaskHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        poll_fn(|cx| {
            if self.inner.cancelled.get() {
                Poll::Ready(())
            } else {
                self.inner.wakers.borrow_mut().register(cx.waker());
                Poll::Pending
            }
        })
        .await
    }

    /// Resolves once the task completed, failed, was cancelled or was dropped.
    pub async fn finished(&self) {
        poll_fn(|cx| {
            if self.inner.finished.get() {
                Poll::Ready(())
            } else {
                self.inner.wakers.borrow_mut().register(cx.waker());
                Poll::Pending
            }
        })
        .await
    }

    /// Marks the handle finished when the returned guard goes out of scope,
    /// whichever way the owning future ends.
    pub fn guard(&self) -> FinishGuard {
        FinishGuard {
            handle: self.clone(),
        }
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelled", &self.inner.cancelled.get())
            .field("finished", &self.inner.finished.get())
            .finish()
    }
}

#[derive(Debug)]
pub struct FinishGuard {
    handle: TaskHandle,
}

impl FinishGuard {
    pub fn handle(&self) -> &TaskHandle {
        &self.handle
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.handle.finish();
    }
}
