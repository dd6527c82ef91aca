//! Integrations: where a controller's events come from and how they turn
//! into action keys

use crate::devices::DeviceMappings;
use crate::error::ConfigError;
use crate::system::config::CustomActionsMapping;
use crate::system::events::RawEvent;
use crate::types::{ActionEvent, EventData, IncomingAction};
use log::{debug, warn};
use serde_json::Value;

pub const INTEGRATIONS: &[&str] = &[
    "z2m",
    "deconz",
    "zha",
    "lutron_caseta",
    "state",
    "shellyforhass",
    "b2m",
];

/// What the transport has to listen to for one controller id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription {
    MqttTopic(String),
    HaEvent {
        event: String,
        filter_key: String,
        filter_value: String,
    },
    HaState {
        entity: String,
        attribute: Option<String>,
    },
}

impl Subscription {
    pub fn matches(&self, event: &RawEvent) -> bool {
        match (self, event) {
            (Subscription::MqttTopic(expected), RawEvent::Mqtt { topic, .. }) => expected == topic,
            (
                Subscription::HaEvent {
                    event: expected,
                    filter_key,
                    filter_value,
                },
                RawEvent::HaEvent { event: name, .. },
            ) => {
                expected == name
                    && event.data_field(filter_key).as_deref() == Some(filter_value.as_str())
            }
            (
                Subscription::HaState {
                    entity: expected,
                    attribute: expected_attribute,
                },
                RawEvent::State {
                    entity, attribute, ..
                },
            ) => expected == entity && expected_attribute == attribute,
            _ => false,
        }
    }
}

/// Source of the Zigbee2MQTT events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTo {
    /// HA action sensor (deprecated)
    Ha,
    Mqtt,
    /// HA `event.*` entity
    Event,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Integration {
    Z2M {
        listen_to: ListenTo,
        topic_prefix: String,
        action_key: String,
        action_group_key: String,
        action_group: Option<Vec<Value>>,
    },
    Deconz {
        /// Field of the event data holding the key
        event_type: String,
    },
    Zha,
    LutronCaseta,
    State {
        attribute: Option<String>,
    },
    ShellyForHass,
    B2M {
        topic_prefix: String,
    },
}

/// Splits the `integration` option into its name and keyword arguments.
pub fn parse_integration_option(option: &Value) -> Result<(String, EventData), ConfigError> {
    match option {
        Value::String(name) => Ok((name.clone(), EventData::new())),
        Value::Object(params) => {
            let name = params
                .get("name")
                .and_then(Value::as_str)
                .ok_or(ConfigError::MissingIntegrationName)?;
            let mut kwargs = params.clone();
            kwargs.remove("name");
            Ok((name.to_string(), kwargs))
        }
        other => Err(ConfigError::UnsupportedAttributeType {
            attribute: "integration",
            found: value_type(other).to_string(),
        }),
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn str_kwarg(kwargs: &EventData, key: &'static str, default: &str) -> Result<String, ConfigError> {
    match kwargs.get(key) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ConfigError::UnsupportedAttributeType {
            attribute: key,
            found: value_type(other).to_string(),
        }),
    }
}

fn opt_str_kwarg(kwargs: &EventData, key: &'static str) -> Result<Option<String>, ConfigError> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => str_kwarg(kwargs, key, "").map(Some),
    }
}

impl Integration {
    pub fn from_config(option: Option<&Value>) -> Result<Self, ConfigError> {
        let option = option.ok_or(ConfigError::MissingOption("integration"))?;
        let (name, kwargs) = parse_integration_option(option)?;
        Self::new(&name, &kwargs)
    }

    pub fn new(name: &str, kwargs: &EventData) -> Result<Self, ConfigError> {
        Ok(match name {
            "z2m" => {
                let listen_to = match str_kwarg(kwargs, "listen_to", "ha")?.as_str() {
                    "ha" => ListenTo::Ha,
                    "mqtt" => ListenTo::Mqtt,
                    "event" => ListenTo::Event,
                    other => return Err(ConfigError::InvalidListenTo(other.to_string())),
                };
                let action_group = match kwargs.get("action_group") {
                    None | Some(Value::Null) => None,
                    Some(Value::Array(groups)) => Some(groups.clone()),
                    Some(group) => Some(vec![group.clone()]),
                };
                Integration::Z2M {
                    listen_to,
                    topic_prefix: str_kwarg(kwargs, "topic_prefix", "zigbee2mqtt")?,
                    action_key: str_kwarg(kwargs, "action_key", "action")?,
                    action_group_key: str_kwarg(kwargs, "action_group_key", "action_group")?,
                    action_group,
                }
            }
            "deconz" => Integration::Deconz {
                event_type: str_kwarg(kwargs, "type", "event")?,
            },
            "zha" => Integration::Zha,
            "lutron_caseta" => Integration::LutronCaseta,
            "state" => Integration::State {
                attribute: opt_str_kwarg(kwargs, "attribute")?,
            },
            "shellyforhass" => Integration::ShellyForHass,
            "b2m" => Integration::B2M {
                topic_prefix: str_kwarg(kwargs, "topic_prefix", "ble2mqtt")?,
            },
            other => {
                return Err(ConfigError::UnknownIntegration {
                    name: other.to_string(),
                    options: INTEGRATIONS.to_vec(),
                })
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Integration::Z2M { .. } => "z2m",
            Integration::Deconz { .. } => "deconz",
            Integration::Zha => "zha",
            Integration::LutronCaseta => "lutron_caseta",
            Integration::State { .. } => "state",
            Integration::ShellyForHass => "shellyforhass",
            Integration::B2M { .. } => "b2m",
        }
    }

    /// BLE2MQTT devices reuse the Zigbee2MQTT action names
    pub fn default_actions_mapping(&self, device: &impl DeviceMappings) -> Option<CustomActionsMapping> {
        let source = match self {
            Integration::B2M { .. } => "z2m",
            other => other.name(),
        };
        device.default_actions_mapping(source)
    }

    pub fn subscription(&self, controller_id: &str) -> Subscription {
        let ha_event = |event: &str, filter_key: &str| Subscription::HaEvent {
            event: event.to_string(),
            filter_key: filter_key.to_string(),
            filter_value: controller_id.to_string(),
        };
        match self {
            Integration::Z2M {
                listen_to,
                topic_prefix,
                ..
            } => match listen_to {
                ListenTo::Ha => {
                    warn!(
                        "Listening to HA sensor actions is deprecated. \
                         Use `listen_to: mqtt` or `listen_to: event` instead."
                    );
                    Subscription::HaState {
                        entity: controller_id.to_string(),
                        attribute: None,
                    }
                }
                ListenTo::Mqtt => {
                    Subscription::MqttTopic(format!("{}/{}", topic_prefix, controller_id))
                }
                ListenTo::Event => Subscription::HaState {
                    entity: format!("event.{}", controller_id),
                    attribute: Some("event_type".to_string()),
                },
            },
            Integration::Deconz { .. } => ha_event("deconz_event", "id"),
            Integration::Zha => ha_event("zha_event", "device_ieee"),
            Integration::LutronCaseta => ha_event("lutron_caseta_button_event", "serial"),
            Integration::State { attribute } => Subscription::HaState {
                entity: controller_id.to_string(),
                attribute: attribute.clone(),
            },
            Integration::ShellyForHass => ha_event("shellyforhass.click", "entity_id"),
            Integration::B2M { topic_prefix } => {
                Subscription::MqttTopic(format!("{}/{}/action", topic_prefix, controller_id))
            }
        }
    }

    /// Translates a raw event into an action, or `None` when it carries none.
    pub fn parse_event(&self, event: &RawEvent, device: &impl DeviceMappings) -> Option<IncomingAction> {
        match (self, event) {
            (Integration::Z2M { .. }, RawEvent::Mqtt { payload, .. }) => self.parse_z2m_payload(payload),
            (Integration::B2M { .. }, RawEvent::Mqtt { payload, .. }) => {
                Some(IncomingAction::new(payload.as_str()))
            }
            (
                Integration::Z2M { .. } | Integration::State { .. },
                RawEvent::State { old, new, .. },
            ) => Some(IncomingAction::new(new.as_str()).with_previous_state(old.clone())),
            (Integration::Deconz { event_type }, RawEvent::HaEvent { data, .. }) => {
                let key = action_event(data.get(event_type)?)?;
                Some(IncomingAction::new(key).with_extra(data.clone()))
            }
            (Integration::Zha, RawEvent::HaEvent { data, .. }) => {
                let action = device.zha_action(data).or_else(|| zha_default_action(data))?;
                debug!("ZHA event {:?} translated to `{}`", data, action);
                Some(IncomingAction::new(action).with_extra(data.clone()))
            }
            (Integration::LutronCaseta, RawEvent::HaEvent { data, .. }) => {
                let button = event.data_field("button_number")?;
                let action = event.data_field("action")?;
                Some(
                    IncomingAction::new(format!("button_{}_{}", button, action))
                        .with_extra(data.clone()),
                )
            }
            (Integration::ShellyForHass, RawEvent::HaEvent { data, .. }) => {
                let click_type = event.data_field("click_type")?;
                Some(IncomingAction::new(click_type).with_extra(data.clone()))
            }
            _ => {
                debug!("{} ignores {:?}", self.name(), event);
                None
            }
        }
    }

    fn parse_z2m_payload(&self, payload: &str) -> Option<IncomingAction> {
        let Integration::Z2M {
            action_key,
            action_group_key,
            action_group,
            ..
        } = self
        else {
            return None;
        };
        let payload: EventData = match serde_json::from_str(payload) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("MQTT payload is not a JSON object: {}", e);
                return None;
            }
        };
        let Some(key) = payload.get(action_key) else {
            debug!("There is no `{}` in the MQTT topic payload", action_key);
            return None;
        };
        if let (Some(group), Some(allowed)) = (payload.get(action_group_key), action_group) {
            if !allowed.contains(group) {
                debug!("Action group {} not found in action groups: {:?}", group, allowed);
                return None;
            }
        }
        let key = action_event(key)?;
        Some(IncomingAction::new(key).with_extra(payload))
    }
}

fn action_event(value: &Value) -> Option<ActionEvent> {
    serde_json::from_value(value.clone()).ok()
}

/// `command` followed by its arguments: `move_1_83`
fn zha_default_action(data: &EventData) -> Option<String> {
    let command = data.get("command")?.as_str()?;
    let args = match data.get("args") {
        Some(Value::Array(args)) => args.as_slice(),
        Some(Value::Object(args)) => match args.get("args") {
            Some(Value::Array(args)) => args.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    let mut action = command.to_string();
    for arg in args {
        action.push('_');
        match arg {
            Value::String(s) => action.push_str(s),
            other => action.push_str(&other.to_string()),
        }
    }
    Some(action)
}
