//! Raw transport events and the channel that feeds them to the dispatch tasks

use crate::types::EventData;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event as delivered by a transport, before any integration looked at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    /// MQTT message. `payload` is kept as the raw string
    Mqtt { topic: String, payload: String },
    /// Home Assistant bus event
    HaEvent { event: String, data: EventData },
    /// Home Assistant entity state (or attribute) change
    State {
        entity: String,
        #[serde(default)]
        attribute: Option<String>,
        #[serde(default)]
        old: Option<String>,
        new: String,
    },
}

impl RawEvent {
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Looks up a string or number field of an HA event's data
    pub fn data_field(&self, key: &str) -> Option<String> {
        let RawEvent::HaEvent { data, .. } = self else {
            return None;
        };
        match data.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

const EVENT_CHANNEL_SIZE: usize = 16;

pub type EventChannel = Channel<CriticalSectionRawMutex, RawEvent, EVENT_CHANNEL_SIZE>;

pub type EventSender<'a> = Sender<'a, CriticalSectionRawMutex, RawEvent, EVENT_CHANNEL_SIZE>;

pub type EventReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, RawEvent, EVENT_CHANNEL_SIZE>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_events() {
        let mqtt = RawEvent::from_json(
            r#"{"type": "mqtt", "topic": "zigbee2mqtt/remote", "payload": "{\"action\": \"toggle\"}"}"#,
        )
        .unwrap();
        assert!(matches!(mqtt, RawEvent::Mqtt { ref topic, .. } if topic == "zigbee2mqtt/remote"));

        let state = RawEvent::from_json(
            r#"{"type": "state", "entity": "sensor.remote_action", "old": "", "new": "toggle"}"#,
        )
        .unwrap();
        assert_eq!(
            state,
            RawEvent::State {
                entity: "sensor.remote_action".to_string(),
                attribute: None,
                old: Some(String::new()),
                new: "toggle".to_string(),
            }
        );

        let event = RawEvent::from_json(
            r#"{"type": "ha_event", "event": "deconz_event", "data": {"id": "remote", "event": 1002}}"#,
        )
        .unwrap();
        assert_eq!(event.data_field("id").as_deref(), Some("remote"));
        assert_eq!(event.data_field("event").as_deref(), Some("1002"));
        assert_eq!(event.data_field("missing"), None);
    }
}
