//! Click counting for multi-click action families (`toggle$1`, `toggle$2`, ...)

use crate::error::ConfigError;
use crate::types::{ActionEvent, MULTIPLE_CLICK_TOKEN};
use log::debug;
use statig::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub enum ClickInput {
    Click,
    /// The click window elapsed without another click
    Resolve,
}

#[derive(Debug, Default)]
pub struct ClickContext {
    resolved: Option<u32>,
}

#[derive(Debug, Default)]
pub struct ClickMachine;

#[state_machine(initial = "State::idle()", state(derive(Debug)))]
impl ClickMachine {
    #[state]
    fn idle(context: &mut ClickContext, event: &ClickInput) -> Response<State> {
        use Response::*;

        match event {
            ClickInput::Click => Transition(State::counting(1)),
            ClickInput::Resolve => {
                context.resolved = None;
                Handled
            }
        }
    }

    #[state]
    fn counting(clicks: &mut u32, context: &mut ClickContext, event: &ClickInput) -> Response<State> {
        use Response::*;

        match event {
            ClickInput::Click => {
                *clicks += 1;
                Handled
            }
            ClickInput::Resolve => {
                context.resolved = Some(*clicks);
                Transition(State::idle())
            }
        }
    }
}

/// Click counter of one multi-click family.
pub struct ClickTracker {
    machine: StateMachine<ClickMachine>,
    context: ClickContext,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self {
            machine: ClickMachine::default().state_machine(),
            context: ClickContext::default(),
        }
    }

    /// Registers a click and returns the count so far.
    pub fn click(&mut self) -> u32 {
        self.machine
            .handle_with_context(&ClickInput::Click, &mut self.context);
        self.count()
    }

    /// Finalises the current burst, returning its click count and resetting to zero.
    pub fn resolve(&mut self) -> u32 {
        self.machine
            .handle_with_context(&ClickInput::Resolve, &mut self.context);
        self.context.resolved.take().unwrap_or(0)
    }

    pub fn count(&self) -> u32 {
        match self.machine.state() {
            State::Counting { clicks } => *clicks,
            _ => 0,
        }
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClickTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickTracker")
            .field("count", &self.count())
            .finish()
    }
}

/// `toggle` + 2 -> `toggle$2`
pub fn format_multiple_click_action(action_key: &ActionEvent, click_count: u32) -> ActionEvent {
    ActionEvent::from(format!("{}{}{}", action_key, MULTIPLE_CLICK_TOKEN, click_count))
}

/// Collects the base keys of every multi-click family present in `keys`.
/// The base is kept as an integer when it parses as one.
pub fn get_multiple_click_actions<'a>(
    keys: impl IntoIterator<Item = &'a ActionEvent>,
) -> Result<HashSet<ActionEvent>, ConfigError> {
    let mut families = HashSet::new();
    for key in keys {
        let Some(name) = key.as_str() else {
            continue;
        };
        if !name.contains(MULTIPLE_CLICK_TOKEN) {
            continue;
        }
        let parts: Vec<&str> = name.split(MULTIPLE_CLICK_TOKEN).collect();
        if parts.len() != 2 {
            return Err(ConfigError::InvalidMultipleClickKey(key.clone()));
        }
        let base = ActionEvent::from(parts[0]);
        debug!("`{}` belongs to the multiple click family `{}`", key, base);
        families.insert(base);
    }
    Ok(families)
}
