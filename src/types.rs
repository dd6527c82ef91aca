use serde::de::{self, Deserializer, Visitor};
use embassy_time::{Duration, TICK_HZ};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Payload that came along with a controller event (MQTT JSON, HA event data...)
pub type EventData = serde_json::Map<String, serde_json::Value>;

/// Canonical identifier of a triggered input event.
///
/// Integrations emit either strings (`"toggle"`, `"button_2_press"`) or
/// integers (deCONZ `1002`). Strings holding an integer are folded into the
/// integer form so both spellings address the same action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionEvent {
    Int(i64),
    Str(String),
}

impl ActionEvent {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ActionEvent::Str(s) => Some(s),
            ActionEvent::Int(_) => None,
        }
    }
}

impl From<&str> for ActionEvent {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(number) => ActionEvent::Int(number),
            Err(_) => ActionEvent::Str(value.to_string()),
        }
    }
}

impl From<String> for ActionEvent {
    fn from(value: String) -> Self {
        match value.parse::<i64>() {
            Ok(number) => ActionEvent::Int(number),
            Err(_) => ActionEvent::Str(value),
        }
    }
}

impl From<i64> for ActionEvent {
    fn from(value: i64) -> Self {
        ActionEvent::Int(value)
    }
}

impl fmt::Display for ActionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionEvent::Int(number) => write!(f, "{}", number),
            ActionEvent::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for ActionEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionEvent::Int(number) => serializer.serialize_i64(*number),
            ActionEvent::Str(s) => serializer.serialize_str(s),
        }
    }
}

struct ActionEventVisitor;

impl<'de> Visitor<'de> for ActionEventVisitor {
    type Value = ActionEvent;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an action name or an integer event id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ActionEvent, E> {
        Ok(ActionEvent::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ActionEvent, E> {
        i64::try_from(v)
            .map(ActionEvent::Int)
            .map_err(|_| E::custom(format!("event id {} is out of range", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ActionEvent, E> {
        Ok(ActionEvent::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ActionEvent, E> {
        Ok(ActionEvent::from(v))
    }
}

impl<'de> Deserialize<'de> for ActionEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ActionEventVisitor)
    }
}

/// One event translated by an integration, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingAction {
    pub key: ActionEvent,
    pub previous_state: Option<String>,
    pub extra: Option<EventData>,
}

impl IncomingAction {
    pub fn new(key: impl Into<ActionEvent>) -> Self {
        Self {
            key: key.into(),
            previous_state: None,
            extra: None,
        }
    }

    pub fn with_previous_state(mut self, previous_state: Option<String>) -> Self {
        self.previous_state = previous_state;
        self
    }

    pub fn with_extra(mut self, extra: EventData) -> Self {
        self.extra = Some(extra);
        self
    }
}

pub const DEFAULT_ACTION_DELTA_MS: u64 = 300;
pub const DEFAULT_MULTIPLE_CLICK_DELAY_MS: u64 = 500;
pub const MULTIPLE_CLICK_TOKEN: char = '$';
/// Upper bound on the handler sequence attached to one action
pub const MAX_ACTIONS_PER_EVENT: usize = 16;

/// Longest duration accepted from configuration, in ticks. Half the tick range,
/// so a deadline of `Instant::now()` plus this still fits.
pub const MAX_CONFIG_TICKS: u64 = u64::MAX / 2;

/// Seconds from configuration as a timer duration. `None` when negative, not
/// finite or beyond `MAX_CONFIG_TICKS`.
pub fn duration_from_secs(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let ticks = (seconds * TICK_HZ as f64).round();
    (ticks <= MAX_CONFIG_TICKS as f64).then(|| Duration::from_ticks(ticks as u64))
}

/// Milliseconds from configuration as a timer duration
pub fn duration_from_millis(ms: u64) -> Option<Duration> {
    let ticks = ms.checked_mul(TICK_HZ)? / 1000;
    (ticks <= MAX_CONFIG_TICKS).then(|| Duration::from_ticks(ticks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_fold_into_integers() {
        assert_eq!(ActionEvent::from("1002"), ActionEvent::Int(1002));
        assert_eq!(ActionEvent::from("toggle"), ActionEvent::Str("toggle".to_string()));
        assert_eq!(ActionEvent::from("toggle$2").to_string(), "toggle$2");
    }

    #[test]
    fn test_deserialize_from_json_keys_and_values() {
        let keys: std::collections::BTreeMap<ActionEvent, u32> =
            serde_json::from_str(r#"{"1002": 1, "toggle": 2}"#).unwrap();
        assert_eq!(keys.get(&ActionEvent::Int(1002)), Some(&1));
        assert_eq!(keys.get(&ActionEvent::from("toggle")), Some(&2));

        let event: ActionEvent = serde_json::from_str("3002").unwrap();
        assert_eq!(event, ActionEvent::Int(3002));
    }

    #[test]
    fn test_config_durations_stay_in_timer_range() {
        assert_eq!(duration_from_secs(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(duration_from_secs(0.0), Some(Duration::from_ticks(0)));
        assert_eq!(duration_from_secs(-1.0), None);
        assert_eq!(duration_from_secs(f64::NAN), None);
        assert_eq!(duration_from_secs(1e300), None);

        assert_eq!(duration_from_millis(250), Some(Duration::from_millis(250)));
        assert_eq!(duration_from_millis(u64::MAX), None);
    }
}
