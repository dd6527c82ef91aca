//! Executable steps attached to an action

use crate::error::ConfigError;
use crate::types::{duration_from_secs, ActionEvent, EventData, MAX_ACTIONS_PER_EVENT};
use embassy_time::{Duration, Timer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// External side of every action: service calls and the predefined actions of
/// the controller type (light, media player, cover...).
pub trait ActionBackend {
    async fn call_service(&self, service: &str, data: &EventData) -> anyhow::Result<()>;

    async fn run_predefined(
        &self,
        action: &str,
        args: &[Value],
        extra: Option<&EventData>,
    ) -> anyhow::Result<()>;
}

/// One user-declared action: `"toggle"` or an object such as `{"delay": 2}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomAction {
    Name(String),
    Params(EventData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomActions {
    One(CustomAction),
    Many(Vec<CustomAction>),
}

impl CustomActions {
    pub fn into_vec(self) -> Vec<CustomAction> {
        match self {
            CustomActions::One(action) => vec![action],
            CustomActions::Many(actions) => actions,
        }
    }
}

impl From<&str> for CustomActions {
    fn from(name: &str) -> Self {
        CustomActions::One(CustomAction::Name(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionType {
    Predefined { action: String, args: Vec<Value> },
    Delay(Duration),
    Scene(String),
    Service { service: String, data: EventData },
}

pub type ActionList = heapless::Vec<ActionType, MAX_ACTIONS_PER_EVENT>;

impl ActionType {
    /// Builds a handler from its declaration. Objects are told apart by the
    /// first discriminator key they carry: `action`, `service`, `scene`, `delay`.
    pub fn parse(event: &ActionEvent, action: &CustomAction) -> Result<Self, ConfigError> {
        let params = match action {
            CustomAction::Name(name) => {
                return Ok(ActionType::Predefined {
                    action: name.clone(),
                    args: Vec::new(),
                })
            }
            CustomAction::Params(params) => params,
        };
        let invalid = |reason: String| ConfigError::InvalidAction {
            event: event.clone(),
            reason,
        };

        if let Some(name) = params.get("action") {
            let name = name
                .as_str()
                .ok_or_else(|| invalid("`action` must be a string".to_string()))?;
            let args = match params.get("args") {
                None => Vec::new(),
                Some(Value::Array(args)) => args.clone(),
                Some(other) => vec![other.clone()],
            };
            return Ok(ActionType::Predefined {
                action: name.to_string(),
                args,
            });
        }

        if let Some(service) = params.get("service") {
            let service = service
                .as_str()
                .ok_or_else(|| invalid("`service` must be a string".to_string()))?;
            let mut data = match params.get("data") {
                None => EventData::new(),
                Some(Value::Object(data)) => data.clone(),
                Some(_) => return Err(invalid("`data` must be an object".to_string())),
            };
            if let Some(entity_id) = params.get("entity_id") {
                data.insert("entity_id".to_string(), entity_id.clone());
            }
            return Ok(ActionType::Service {
                service: service.to_string(),
                data,
            });
        }

        if let Some(scene) = params.get("scene") {
            let scene = scene
                .as_str()
                .ok_or_else(|| invalid("`scene` must be a string".to_string()))?;
            return Ok(ActionType::Scene(scene.to_string()));
        }

        if let Some(delay) = params.get("delay") {
            let duration = delay.as_f64().and_then(duration_from_secs).ok_or_else(|| {
                invalid(format!("`delay` must be a positive number of seconds, not {}", delay))
            })?;
            return Ok(ActionType::Delay(duration));
        }

        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        Err(invalid(format!(
            "none of `action`, `service`, `scene` or `delay` found in {:?}",
            keys
        )))
    }

    pub async fn run<B: ActionBackend>(
        &self,
        backend: &B,
        extra: Option<&EventData>,
    ) -> anyhow::Result<()> {
        match self {
            ActionType::Predefined { action, args } => {
                backend.run_predefined(action, args, extra).await
            }
            ActionType::Delay(duration) => {
                Timer::after(*duration).await;
                Ok(())
            }
            ActionType::Scene(scene) => {
                let mut data = EventData::new();
                data.insert("entity_id".to_string(), Value::String(scene.clone()));
                backend.call_service("scene.turn_on", &data).await
            }
            ActionType::Service { service, data } => backend.call_service(service, data).await,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Predefined { action, args } if args.is_empty() => {
                write!(f, "Predefined ({})", action)
            }
            ActionType::Predefined { action, args } => {
                write!(f, "Predefined ({}, args={:?})", action, args)
            }
            ActionType::Delay(duration) => {
                write!(f, "Delay ({:.3} seconds)", duration.as_micros() as f64 / 1_000_000.0)
            }
            ActionType::Scene(scene) => write!(f, "Scene ({})", scene),
            ActionType::Service { service, .. } => write!(f, "Service ({})", service),
        }
    }
}

/// Parses a declaration that may hold one action or a list of them.
pub fn parse_actions(event: &ActionEvent, actions: &CustomActions) -> Result<ActionList, ConfigError> {
    let declared = actions.clone().into_vec();
    if declared.len() > MAX_ACTIONS_PER_EVENT {
        return Err(ConfigError::TooManyActions {
            event: event.clone(),
            count: declared.len(),
        });
    }
    let mut list = ActionList::new();
    for action in &declared {
        let parsed = ActionType::parse(event, action)?;
        // Capacity was checked above
        let _ = list.push(parsed);
    }
    Ok(list)
}
