//! Per-action runtime state owned by the dispatcher.
//!
//! Every method borrows, mutates and releases before returning, so no borrow
//! ever lives across an `.await` of the futures sharing this store.

use crate::click::ClickTracker;
use crate::task::TaskHandle;
use crate::types::ActionEvent;
use embassy_time::{Duration, Instant};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct KeyState {
    last_call: Option<Instant>,
    /// Scheduled run waiting for `action_delay`
    delay: Option<TaskHandle>,
    /// Most recently started (or queued) run
    active_run: Option<TaskHandle>,
}

#[derive(Debug, Default)]
struct ClickState {
    tracker: ClickTracker,
    last_click: Option<Instant>,
    /// Resolution waiting for the click window to elapse
    pending: Option<TaskHandle>,
}

/// A click registered on a multi-click family
#[derive(Debug)]
pub struct Click {
    pub resolution: TaskHandle,
    pub count: u32,
    pub since_last: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct DispatchState {
    keys: RefCell<HashMap<ActionEvent, KeyState>>,
    clicks: RefCell<HashMap<ActionEvent, ClickState>>,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a call at `now` and returns the time since the previous one.
    pub fn touch(&self, key: &ActionEvent, now: Instant) -> Option<Duration> {
        let mut keys = self.keys.borrow_mut();
        let state = keys.entry(key.clone()).or_default();
        let previous = state.last_call.replace(now);
        previous.map(|previous| now.saturating_duration_since(previous))
    }

    /// Stores `handle` as the pending delayed run, cancelling the one it replaces.
    pub fn replace_delay(&self, key: &ActionEvent, handle: TaskHandle) {
        let mut keys = self.keys.borrow_mut();
        let state = keys.entry(key.clone()).or_default();
        if let Some(previous) = state.delay.replace(handle) {
            debug!("Replacing the delayed run of `{}`", key);
            previous.cancel();
        }
    }

    /// Forgets the delayed run, unless a newer one took its place.
    pub fn clear_delay(&self, key: &ActionEvent, handle: &TaskHandle) {
        let mut keys = self.keys.borrow_mut();
        if let Some(state) = keys.get_mut(key) {
            if state.delay.as_ref().is_some_and(|current| current.ptr_eq(handle)) {
                state.delay = None;
            }
        }
    }

    pub fn has_pending_delay(&self, key: &ActionEvent) -> bool {
        self.keys
            .borrow()
            .get(key)
            .is_some_and(|state| state.delay.is_some())
    }

    /// The active run, if it has not finished yet.
    pub fn active_run(&self, key: &ActionEvent) -> Option<TaskHandle> {
        self.keys
            .borrow()
            .get(key)
            .and_then(|state| state.active_run.clone())
            .filter(|run| !run.is_finished())
    }

    pub fn set_active_run(&self, key: &ActionEvent, handle: TaskHandle) {
        let mut keys = self.keys.borrow_mut();
        keys.entry(key.clone()).or_default().active_run = Some(handle);
    }

    /// Counts a click and arms a fresh resolution, cancelling the previous one.
    pub fn register_click(&self, key: &ActionEvent, now: Instant) -> Click {
        let mut clicks = self.clicks.borrow_mut();
        let state = clicks.entry(key.clone()).or_default();
        let since_last = state
            .last_click
            .replace(now)
            .map(|previous| now.saturating_duration_since(previous));
        if let Some(previous) = state.pending.take() {
            previous.cancel();
        }
        let count = state.tracker.click();
        let resolution = TaskHandle::new();
        state.pending = Some(resolution.clone());
        Click {
            resolution,
            count,
            since_last,
        }
    }

    /// Closes the current burst and returns its click count.
    pub fn resolve_clicks(&self, key: &ActionEvent, resolution: &TaskHandle) -> u32 {
        let mut clicks = self.clicks.borrow_mut();
        let Some(state) = clicks.get_mut(key) else {
            return 0;
        };
        if state.pending.as_ref().is_some_and(|pending| pending.ptr_eq(resolution)) {
            state.pending = None;
        }
        state.tracker.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_reports_elapsed_time() {
        let state = DispatchState::new();
        let key = ActionEvent::from("toggle");
        let start = Instant::now();
        assert_eq!(state.touch(&key, start), None);
        assert_eq!(
            state.touch(&key, start + Duration::from_millis(40)),
            Some(Duration::from_millis(40))
        );
    }

    #[test]
    fn test_replacing_a_delay_cancels_the_old_one() {
        let state = DispatchState::new();
        let key = ActionEvent::from("toggle");
        let first = TaskHandle::new();
        let second = TaskHandle::new();

        state.replace_delay(&key, first.clone());
        state.replace_delay(&key, second.clone());
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        state.clear_delay(&key, &first);
        assert!(state.has_pending_delay(&key));
        state.clear_delay(&key, &second);
        assert!(!state.has_pending_delay(&key));
    }

    #[test]
    fn test_finished_runs_are_not_active() {
        let state = DispatchState::new();
        let key = ActionEvent::from("toggle");
        let run = TaskHandle::new();
        state.set_active_run(&key, run.clone());
        assert!(state.active_run(&key).is_some());
        run.finish();
        assert!(state.active_run(&key).is_none());
    }

    #[test]
    fn test_clicks_keep_one_pending_resolution() {
        let state = DispatchState::new();
        let key = ActionEvent::from("toggle");
        let now = Instant::now();

        let first = state.register_click(&key, now);
        let second = state.register_click(&key, now + Duration::from_millis(10));
        assert!(first.resolution.is_cancelled());
        assert_eq!(second.count, 2);
        assert_eq!(second.since_last, Some(Duration::from_millis(10)));

        assert_eq!(state.resolve_clicks(&key, &second.resolution), 2);
        assert_eq!(state.register_click(&key, now).count, 1);
    }
}
