//! Controller configuration as written by the user

use crate::action_type::CustomActions;
use crate::error::ConfigError;
use crate::types::ActionEvent;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// User mapping: `null` values drop the key
pub type CustomActionsMapping = BTreeMap<ActionEvent, Option<CustomActions>>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }
}

/// Option that is either one value for every action or a per-action map.
/// Keys missing from the map fall back to the option's default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PerAction<T> {
    All(T),
    PerKey(BTreeMap<ActionEvent, T>),
}

impl<T> PerAction<T> {
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> PerAction<U> {
        match self {
            PerAction::All(value) => PerAction::All(f(value)),
            PerAction::PerKey(values) => PerAction::PerKey(
                values.iter().map(|(key, value)| (key.clone(), f(value))).collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerConfig {
    pub controller: Option<OneOrMany<String>>,
    /// Either a name or an object with `name` plus integration arguments
    pub integration: Option<serde_json::Value>,
    /// Built-in device profile providing default mappings
    pub device: Option<String>,
    pub mapping: Option<CustomActionsMapping>,
    pub merge_mapping: Option<CustomActionsMapping>,
    pub actions: Option<OneOrMany<ActionEvent>>,
    pub excluded_actions: Option<OneOrMany<ActionEvent>>,
    /// Seconds
    pub action_delay: Option<PerAction<f64>>,
    /// Milliseconds
    pub action_delta: Option<PerAction<u64>>,
    pub previous_state: Option<PerAction<String>>,
    pub mode: Option<PerAction<String>>,
    /// Milliseconds
    pub multiple_click_delay: Option<u64>,
}

impl ControllerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn controller_ids(&self) -> Result<Vec<String>, ConfigError> {
        self.controller
            .as_ref()
            .map(OneOrMany::to_vec)
            .ok_or(ConfigError::MissingOption("controller"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_and_per_key_options() {
        let config = ControllerConfig::from_value(json!({
            "controller": ["sensor.a", "sensor.b"],
            "integration": "z2m",
            "action_delta": 500,
            "mode": {"toggle": "restart"},
            "previous_state": "off",
            "actions": "toggle",
            "mapping": {"toggle": "toggle", "1002": null},
        }))
        .unwrap();

        assert_eq!(config.controller_ids().unwrap(), vec!["sensor.a", "sensor.b"]);
        assert_eq!(config.action_delta, Some(PerAction::All(500)));
        assert_eq!(
            config.mode,
            Some(PerAction::PerKey(BTreeMap::from([(
                ActionEvent::from("toggle"),
                "restart".to_string()
            )])))
        );
        assert_eq!(config.previous_state, Some(PerAction::All("off".to_string())));
        assert_eq!(config.actions.unwrap().to_vec(), vec![ActionEvent::from("toggle")]);

        let mapping = config.mapping.unwrap();
        assert_eq!(mapping.get(&ActionEvent::Int(1002)), Some(&None));
        assert!(mapping.get(&ActionEvent::from("toggle")).unwrap().is_some());
    }

    #[test]
    fn test_missing_controller() {
        let config = ControllerConfig::from_json(r#"{"integration": "z2m"}"#).unwrap();
        assert_eq!(config.controller_ids(), Err(ConfigError::MissingOption("controller")));
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        assert!(matches!(
            ControllerConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
