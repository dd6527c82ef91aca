//! Builds the table the dispatcher reads: event -> handlers, plus per-event timing

use crate::action_type::{parse_actions, ActionList};
use crate::click::get_multiple_click_actions;
use crate::error::ConfigError;
use crate::system::config::{ControllerConfig, CustomActionsMapping, PerAction};
use crate::types::{
    duration_from_millis, duration_from_secs, ActionEvent, DEFAULT_ACTION_DELTA_MS,
    DEFAULT_MULTIPLE_CLICK_DELAY_MS,
};
use embassy_time::Duration;
use log::debug;
use std::collections::{HashMap, HashSet};

pub type ActionsMapping = HashMap<ActionEvent, ActionList>;

pub const DEFAULT_MODE: &str = "single";

/// Timing and gating options of one action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTiming {
    /// Minimum time between two triggers
    pub delta: Duration,
    /// Time to wait before running
    pub delay: Duration,
    /// Raw concurrency mode, parsed when a run actually collides
    pub mode: String,
    pub previous_state: Option<String>,
}

impl Default for ActionTiming {
    fn default() -> Self {
        Self {
            delta: Duration::from_millis(DEFAULT_ACTION_DELTA_MS),
            delay: Duration::from_ticks(0),
            mode: DEFAULT_MODE.to_string(),
            previous_state: None,
        }
    }
}

/// Skips `null` entries, which is how users remove a key from a default mapping.
pub fn parse_action_mapping(mapping: &CustomActionsMapping) -> Result<ActionsMapping, ConfigError> {
    let mut parsed = ActionsMapping::new();
    for (event, actions) in mapping {
        let Some(actions) = actions else {
            continue;
        };
        parsed.insert(event.clone(), parse_actions(event, actions)?);
    }
    Ok(parsed)
}

/// Keeps the keys in `include - exclude`. Listed keys missing from the
/// mapping are ignored.
pub fn filter_actions(
    mapping: ActionsMapping,
    include: &HashSet<ActionEvent>,
    exclude: &HashSet<ActionEvent>,
) -> ActionsMapping {
    mapping
        .into_iter()
        .filter(|(key, _)| include.contains(key) && !exclude.contains(key))
        .collect()
}

/// One value per key: a scalar option replaces `default` everywhere, a per-key
/// option overrides the keys it lists (listed keys are added even when they
/// are not part of `keys`).
pub fn get_mapping_per_action<'a, T: Clone>(
    keys: impl IntoIterator<Item = &'a ActionEvent>,
    custom: Option<&PerAction<T>>,
    default: T,
) -> HashMap<ActionEvent, T> {
    let default = match custom {
        Some(PerAction::All(value)) => value.clone(),
        _ => default,
    };
    let mut mapping: HashMap<ActionEvent, T> = keys
        .into_iter()
        .map(|key| (key.clone(), default.clone()))
        .collect();
    if let Some(PerAction::PerKey(overrides)) = custom {
        for (key, value) in overrides {
            mapping.insert(key.clone(), value.clone());
        }
    }
    mapping
}

#[derive(Debug, Default)]
pub struct DispatchTable {
    pub actions: ActionsMapping,
    pub timings: HashMap<ActionEvent, ActionTiming>,
    /// Base keys of every multi-click family (`toggle` for `toggle$2`)
    pub multiple_click_actions: HashSet<ActionEvent>,
    pub multiple_click_delay: Duration,
}

impl DispatchTable {
    /// `default_mapping` is the device mapping for `integration`; it is used
    /// unless the user gave a full `mapping`.
    pub fn build(
        config: &ControllerConfig,
        default_mapping: Option<CustomActionsMapping>,
        integration: &str,
    ) -> Result<Self, ConfigError> {
        if config.mapping.is_some() && config.merge_mapping.is_some() {
            return Err(ConfigError::ConflictingOptions("mapping", "merge_mapping"));
        }
        if config.actions.is_some() && config.excluded_actions.is_some() {
            return Err(ConfigError::ConflictingOptions("actions", "excluded_actions"));
        }

        let base = match &config.mapping {
            Some(mapping) => mapping.clone(),
            None => default_mapping
                .ok_or_else(|| ConfigError::UnsupportedIntegration(integration.to_string()))?,
        };
        let mut mapping = parse_action_mapping(&base)?;
        if let Some(merge) = &config.merge_mapping {
            mapping.extend(parse_action_mapping(merge)?);
        }

        let include: HashSet<ActionEvent> = match &config.actions {
            Some(actions) => actions.to_vec().into_iter().collect(),
            None => mapping.keys().cloned().collect(),
        };
        let exclude: HashSet<ActionEvent> = config
            .excluded_actions
            .as_ref()
            .map(|excluded| excluded.to_vec().into_iter().collect())
            .unwrap_or_default();
        let actions = filter_actions(mapping, &include, &exclude);

        let delta = get_mapping_per_action(
            actions.keys(),
            config.action_delta.as_ref(),
            DEFAULT_ACTION_DELTA_MS,
        );
        let delay = get_mapping_per_action(actions.keys(), config.action_delay.as_ref(), 0.0);
        let mode = get_mapping_per_action(
            actions.keys(),
            config.mode.as_ref(),
            DEFAULT_MODE.to_string(),
        );
        let previous_state = get_mapping_per_action(
            actions.keys(),
            config.previous_state.as_ref().map(|p| p.map(|s| Some(s.clone()))).as_ref(),
            None,
        );

        let keys: HashSet<&ActionEvent> = delta
            .keys()
            .chain(delay.keys())
            .chain(mode.keys())
            .chain(previous_state.keys())
            .collect();
        let mut timings = HashMap::new();
        for key in keys {
            let defaults = ActionTiming::default();
            let out_of_range = |attribute: &str, value: String| ConfigError::InvalidAction {
                event: key.clone(),
                reason: format!("`{}` of {} is out of range", attribute, value),
            };
            let key_delta = match delta.get(key) {
                Some(ms) => duration_from_millis(*ms)
                    .ok_or_else(|| out_of_range("action_delta", format!("{} ms", ms)))?,
                None => defaults.delta,
            };
            let key_delay = match delay.get(key) {
                Some(seconds) => duration_from_secs(*seconds)
                    .ok_or_else(|| out_of_range("action_delay", format!("{} s", seconds)))?,
                None => defaults.delay,
            };
            let timing = ActionTiming {
                delta: key_delta,
                delay: key_delay,
                mode: mode.get(key).cloned().unwrap_or(defaults.mode),
                previous_state: previous_state.get(key).cloned().flatten(),
            };
            timings.insert(key.clone(), timing);
        }

        let multiple_click_actions = get_multiple_click_actions(actions.keys())?;
        let click_delay_ms = config
            .multiple_click_delay
            .unwrap_or(DEFAULT_MULTIPLE_CLICK_DELAY_MS);
        let multiple_click_delay =
            duration_from_millis(click_delay_ms).ok_or_else(|| ConfigError::OutOfRange {
                attribute: "multiple_click_delay",
                value: format!("{} ms", click_delay_ms),
            })?;

        debug!(
            "Dispatch table: {} actions, {} multiple click families",
            actions.len(),
            multiple_click_actions.len()
        );

        Ok(Self {
            actions,
            timings,
            multiple_click_actions,
            multiple_click_delay,
        })
    }

    pub fn timing(&self, key: &ActionEvent) -> ActionTiming {
        self.timings.get(key).cloned().unwrap_or_default()
    }

    pub fn contains(&self, key: &ActionEvent) -> bool {
        self.actions.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_type::ActionType;
    use serde_json::json;

    fn default_mapping() -> CustomActionsMapping {
        serde_json::from_value(json!({
            "toggle": "toggle",
            "brightness_up_click": "click_brightness_up",
            "brightness_down_click": "click_brightness_down",
            "1002": "on",
        }))
        .unwrap()
    }

    fn build(config: serde_json::Value) -> Result<DispatchTable, ConfigError> {
        let config = ControllerConfig::from_value(config).unwrap();
        DispatchTable::build(&config, Some(default_mapping()), "z2m")
    }

    fn keys(table: &DispatchTable) -> HashSet<ActionEvent> {
        table.actions.keys().cloned().collect()
    }

    #[test]
    fn test_conflicting_options() {
        let err = build(json!({"mapping": {}, "merge_mapping": {}})).unwrap_err();
        assert_eq!(err, ConfigError::ConflictingOptions("mapping", "merge_mapping"));

        let err = build(json!({"actions": ["toggle"], "excluded_actions": ["toggle"]})).unwrap_err();
        assert_eq!(err, ConfigError::ConflictingOptions("actions", "excluded_actions"));
    }

    #[test]
    fn test_filter_is_include_minus_exclude_within_mapping() {
        let table = build(json!({"actions": ["toggle", 1002, "not_mapped"]})).unwrap();
        assert_eq!(
            keys(&table),
            HashSet::from([ActionEvent::from("toggle"), ActionEvent::Int(1002)])
        );

        let table = build(json!({"excluded_actions": "toggle"})).unwrap();
        assert_eq!(
            keys(&table),
            HashSet::from([
                ActionEvent::from("brightness_up_click"),
                ActionEvent::from("brightness_down_click"),
                ActionEvent::Int(1002),
            ])
        );

        let mapping = parse_action_mapping(&default_mapping()).unwrap();
        let include = HashSet::from([ActionEvent::from("toggle"), ActionEvent::Int(1002)]);
        let exclude = HashSet::from([ActionEvent::Int(1002), ActionEvent::from("x")]);
        let filtered = filter_actions(mapping, &include, &exclude);
        assert_eq!(
            filtered.keys().cloned().collect::<HashSet<_>>(),
            HashSet::from([ActionEvent::from("toggle")])
        );
    }

    #[test]
    fn test_merge_mapping_overrides_and_adds() {
        let table = build(json!({
            "merge_mapping": {
                "toggle": {"scene": "scene.evening"},
                "1002": null,
                "hold": "hold_brightness_up",
            }
        }))
        .unwrap();

        // null entries of the merge mapping leave the base entry alone
        assert!(table.contains(&ActionEvent::Int(1002)));
        assert!(table.contains(&ActionEvent::from("hold")));
        assert_eq!(
            table.actions[&ActionEvent::from("toggle")][0],
            ActionType::Scene("scene.evening".to_string())
        );
    }

    #[test]
    fn test_custom_mapping_replaces_default() {
        let table = build(json!({"mapping": {"press": "toggle"}})).unwrap();
        assert_eq!(keys(&table), HashSet::from([ActionEvent::from("press")]));
    }

    #[test]
    fn test_missing_default_mapping() {
        let config = ControllerConfig::default();
        let err = DispatchTable::build(&config, None, "lutron_caseta").unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedIntegration("lutron_caseta".to_string()));
    }

    #[test]
    fn test_oversized_durations_are_rejected() {
        let err = build(json!({"action_delay": 1e300})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAction { .. }));

        let err = build(json!({"action_delay": {"toggle": -1.0}})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidAction {
                event: ActionEvent::from("toggle"),
                reason: "`action_delay` of -1 s is out of range".to_string(),
            }
        );

        let err = build(json!({"action_delta": u64::MAX})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAction { .. }));

        let err = build(json!({"multiple_click_delay": u64::MAX})).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { attribute: "multiple_click_delay", .. }
        ));
    }

    #[test]
    fn test_per_action_options() {
        let table = build(json!({
            "action_delta": {"toggle": 1000},
            "action_delay": 1.5,
            "mode": {"1002": "restart"},
            "previous_state": {"toggle": "off"},
        }))
        .unwrap();

        let toggle = table.timing(&ActionEvent::from("toggle"));
        assert_eq!(toggle.delta, Duration::from_millis(1000));
        assert_eq!(toggle.delay, Duration::from_millis(1500));
        assert_eq!(toggle.mode, "single");
        assert_eq!(toggle.previous_state.as_deref(), Some("off"));

        let on = table.timing(&ActionEvent::Int(1002));
        assert_eq!(on.delta, Duration::from_millis(DEFAULT_ACTION_DELTA_MS));
        assert_eq!(on.mode, "restart");
        assert_eq!(on.previous_state, None);
    }

    #[test]
    fn test_per_key_override_may_name_unmapped_keys() {
        let keys = vec![ActionEvent::from("a")];
        let custom = PerAction::PerKey(
            [(ActionEvent::from("b"), 7u64)].into_iter().collect(),
        );
        let mapping = get_mapping_per_action(&keys, Some(&custom), 1);
        assert_eq!(mapping.get(&ActionEvent::from("a")), Some(&1));
        assert_eq!(mapping.get(&ActionEvent::from("b")), Some(&7));
    }

    #[test]
    fn test_multiple_click_families_and_delay() {
        let table = build(json!({
            "mapping": {"toggle$2": "on", "toggle$3": "off", "toggle": "toggle"},
            "multiple_click_delay": 250,
        }))
        .unwrap();
        assert_eq!(
            table.multiple_click_actions,
            HashSet::from([ActionEvent::from("toggle")])
        );
        assert_eq!(table.multiple_click_delay, Duration::from_millis(250));
    }
}
