//! Action dispatch engine.
//!
//! Turns an incoming action key into runs of its handler list, applying the
//! previous-state gate, the delta filter, multi-click aggregation, delayed
//! execution and the concurrency mode of the action.
//!
//! The dispatcher is shared by `&self` between futures polled on one
//! executor. Each [`handle_action`](Dispatcher::handle_action) future stays
//! pending until the work it started is done, so callers that want
//! fire-and-forget behaviour run each of them as a separate task.

use crate::action_type::{ActionBackend, ActionList};
use crate::click::format_multiple_click_action;
use crate::error::DispatchError;
use crate::mapping::DispatchTable;
use crate::state::DispatchState;
use crate::task::TaskHandle;
use crate::types::{ActionEvent, EventData, IncomingAction};
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
use log::{debug, info, warn};
use std::str::FromStr;

/// What happens when an action triggers while its previous run is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    Restart,
    Queued,
    Parallel,
}

impl FromStr for Mode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Mode::Single),
            "restart" => Ok(Mode::Restart),
            "queued" => Ok(Mode::Queued),
            "parallel" => Ok(Mode::Parallel),
            other => Err(DispatchError::UnknownMode(other.to_string())),
        }
    }
}

pub struct Dispatcher<B: ActionBackend> {
    backend: B,
    table: DispatchTable,
    state: DispatchState,
}

impl<B: ActionBackend> Dispatcher<B> {
    pub fn new(backend: B, table: DispatchTable) -> Self {
        Self {
            backend,
            table,
            state: DispatchState::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub async fn handle(&self, action: &IncomingAction) -> Result<(), DispatchError> {
        self.handle_action(
            &action.key,
            action.previous_state.as_deref(),
            action.extra.as_ref(),
        )
        .await
    }

    pub async fn handle_action(
        &self,
        key: &ActionEvent,
        previous_state: Option<&str>,
        extra: Option<&EventData>,
    ) -> Result<(), DispatchError> {
        let mapped = self.table.contains(key);
        let expected_state = self
            .table
            .timings
            .get(key)
            .and_then(|timing| timing.previous_state.as_deref());
        if let Some(expected) = expected_state.filter(|_| mapped) {
            if previous_state != Some(expected) {
                debug!(
                    "`{}` not triggered because previous action was `{:?}`",
                    key, previous_state
                );
                return Ok(());
            }
        }

        let multiple_click = self.table.multiple_click_actions.contains(key);
        if mapped && !multiple_click {
            let delta = self.table.timing(key).delta;
            let elapsed = self.state.touch(key, Instant::now());
            if let Some(elapsed) = elapsed.filter(|elapsed| *elapsed <= delta) {
                debug!(
                    "`{}` ignored, last call was {} ms ago (delta {} ms)",
                    key,
                    elapsed.as_millis(),
                    delta.as_millis()
                );
                return Ok(());
            }
            self.call_action(key, extra).await
        } else if multiple_click {
            self.handle_multiple_click(key, extra).await
        } else {
            debug!("Button event triggered, but not registered: `{}`", key);
            Ok(())
        }
    }

    async fn handle_multiple_click(
        &self,
        key: &ActionEvent,
        extra: Option<&EventData>,
    ) -> Result<(), DispatchError> {
        let window = self.table.multiple_click_delay;
        let click = self.state.register_click(key, Instant::now());
        if click.since_last.is_some_and(|elapsed| elapsed > window) {
            debug!("`{}` clicked after a quiet window", key);
        }
        debug!("`{}` click #{}", key, click.count);

        // A later click took over this burst
        if let Either::First(()) = select(click.resolution.cancelled(), Timer::after(window)).await {
            return Ok(());
        }

        let count = self.state.resolve_clicks(key, &click.resolution);
        debug!("`{}` clicked `{}` time(s)", key, count);
        let click_key = format_multiple_click_action(key, count);
        if self.table.contains(&click_key) {
            self.call_action(&click_key, extra).await
        } else if count == 1 && self.table.contains(key) {
            self.call_action(key, extra).await
        } else {
            Ok(())
        }
    }

    async fn call_action(&self, key: &ActionEvent, extra: Option<&EventData>) -> Result<(), DispatchError> {
        info!("Button event triggered: `{}`", key);
        debug!("Extra: {:?}", extra);

        let delay = self.table.timing(key).delay;
        if delay.as_ticks() == 0 {
            return self.action_timer_callback(key, extra, None).await;
        }

        let handle = TaskHandle::new();
        let _guard = handle.guard();
        self.state.replace_delay(key, handle.clone());
        info!(
            "Running action(s) from `{}` in {:.3} seconds",
            key,
            delay.as_micros() as f64 / 1_000_000.0
        );
        match select(handle.cancelled(), Timer::after(delay)).await {
            Either::First(()) => {
                debug!("Delayed run of `{}` was replaced by a newer one", key);
                Ok(())
            }
            Either::Second(()) => self.action_timer_callback(key, extra, Some(&handle)).await,
        }
    }

    async fn action_timer_callback(
        &self,
        key: &ActionEvent,
        extra: Option<&EventData>,
        fired: Option<&TaskHandle>,
    ) -> Result<(), DispatchError> {
        if let Some(fired) = fired {
            self.state.clear_delay(key, fired);
        }

        let mut predecessor = None;
        if let Some(previous) = self.state.active_run(key) {
            let mode = self.table.timing(key).mode;
            match mode.parse::<Mode>()? {
                Mode::Single => {
                    warn!(
                        "There is already an action executing for `{}`. \
                         If you want a different behaviour change `mode` parameter, \
                         the default value is `single`.",
                        key
                    );
                    return Ok(());
                }
                Mode::Restart => previous.cancel(),
                Mode::Queued => predecessor = Some(previous),
                Mode::Parallel => {}
            }
        }

        let Some(actions) = self.table.actions.get(key) else {
            return Ok(());
        };

        let run = TaskHandle::new();
        let _guard = run.guard();
        self.state.set_active_run(key, run.clone());

        let execution = async {
            if let Some(predecessor) = predecessor {
                debug!("`{}` waits for its previous run", key);
                predecessor.finished().await;
            }
            self.call_action_types(actions, extra).await
        };
        match select(run.cancelled(), execution).await {
            Either::First(()) => {
                debug!("Task(s) from `{}` was/were cancelled and executed again", key);
                Ok(())
            }
            Either::Second(result) => result,
        }
    }

    async fn call_action_types(
        &self,
        actions: &ActionList,
        extra: Option<&EventData>,
    ) -> Result<(), DispatchError> {
        for action in actions {
            info!("Running `{}` now", action);
            action
                .run(&self.backend, extra)
                .await
                .map_err(DispatchError::Handler)?;
        }
        Ok(())
    }
}
