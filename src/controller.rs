use crate::action_type::ActionBackend;
use crate::devices::DeviceProfile;
use crate::dispatcher::Dispatcher;
use crate::error::{ConfigError, DispatchError};
use crate::integration::{Integration, Subscription};
use crate::mapping::DispatchTable;
use crate::system::config::ControllerConfig;
use crate::system::events::{EventReceiver, RawEvent};
use embassy_futures::select::{select, Either};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info};

/// One configured controller: its integration, its device profile and the
/// dispatcher running its actions.
pub struct Controller<B: ActionBackend> {
    controller_ids: Vec<String>,
    integration: Integration,
    device: DeviceProfile,
    subscriptions: Vec<Subscription>,
    dispatcher: Dispatcher<B>,
}

impl<B: ActionBackend> Controller<B> {
    pub fn new(config: &ControllerConfig, backend: B) -> Result<Self, ConfigError> {
        let controller_ids = config.controller_ids()?;
        let integration = Integration::from_config(config.integration.as_ref())?;
        let device = match &config.device {
            Some(name) => DeviceProfile::by_name(name)?,
            None => DeviceProfile::Custom,
        };

        let default_mapping = integration.default_actions_mapping(&device);
        let table = DispatchTable::build(config, default_mapping, integration.name())?;

        let subscriptions = controller_ids
            .iter()
            .map(|id| integration.subscription(id))
            .collect();

        info!(
            "Controller {:?} ready: {} via {}, {} actions",
            controller_ids,
            config.device.as_deref().unwrap_or("custom"),
            integration.name(),
            table.actions.len()
        );

        Ok(Self {
            controller_ids,
            integration,
            device,
            subscriptions,
            dispatcher: Dispatcher::new(backend, table),
        })
    }

    pub fn controller_ids(&self) -> &[String] {
        &self.controller_ids
    }

    pub fn integration(&self) -> &Integration {
        &self.integration
    }

    /// What the transport has to deliver, one entry per controller id
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    /// Runs a raw transport event through the integration and the dispatcher.
    /// Events for other controllers are ignored.
    pub async fn handle_event(&self, event: &RawEvent) -> Result<(), DispatchError> {
        if !self.subscriptions.iter().any(|sub| sub.matches(event)) {
            debug!("Event not addressed to {:?}: {:?}", self.controller_ids, event);
            return Ok(());
        }
        let Some(action) = self.integration.parse_event(event, &self.device) else {
            return Ok(());
        };
        self.dispatcher.handle(&action).await
    }

    /// Receives events forever. Every event gets its own in-flight dispatch,
    /// so a stalled key never holds up the events of other keys.
    pub async fn run(&self, events: EventReceiver<'_>) {
        let mut in_flight = FuturesUnordered::new();
        loop {
            if in_flight.is_empty() {
                let event = events.receive().await;
                in_flight.push(self.dispatch(event));
                continue;
            }
            match select(events.receive(), in_flight.next()).await {
                Either::First(event) => in_flight.push(self.dispatch(event)),
                Either::Second(_) => {}
            }
        }
    }

    async fn dispatch(&self, event: RawEvent) {
        if let Err(e) = self.handle_event(&event).await {
            error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::events::EventChannel;
    use crate::types::EventData;
    use embassy_futures::block_on;
    use embassy_time::Timer;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl ActionBackend for Recorder {
        async fn call_service(&self, service: &str, data: &EventData) -> anyhow::Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("{} {}", service, Value::Object(data.clone())));
            Ok(())
        }

        async fn run_predefined(
            &self,
            action: &str,
            _args: &[Value],
            _extra: Option<&EventData>,
        ) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(action.to_string());
            if action == "stall" {
                core::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    fn controller(config: Value) -> Result<Controller<Recorder>, ConfigError> {
        let config = ControllerConfig::from_value(config).unwrap();
        Controller::new(&config, Recorder::default())
    }

    fn mqtt(topic: &str, payload: &str) -> RawEvent {
        RawEvent::Mqtt {
            topic: topic.to_string(),
            payload: payload.to_string(),
        }
    }

    #[test]
    fn test_device_defaults_drive_mqtt_events() {
        let controller = controller(json!({
            "controller": "living_room_switch",
            "integration": {"name": "z2m", "listen_to": "mqtt"},
            "device": "legrand_600083_light",
        }))
        .unwrap();
        assert_eq!(
            controller.subscriptions(),
            [Subscription::MqttTopic("zigbee2mqtt/living_room_switch".to_string())]
        );

        block_on(async {
            controller
                .handle_event(&mqtt("zigbee2mqtt/living_room_switch", r#"{"action": "brightness_move_up"}"#))
                .await
                .unwrap();
            controller
                .handle_event(&mqtt("zigbee2mqtt/kitchen_switch", r#"{"action": "toggle"}"#))
                .await
                .unwrap();
        });
        assert_eq!(
            controller.dispatcher().backend().calls.borrow().as_slice(),
            ["hold_brightness_up".to_string()]
        );
    }

    #[test]
    fn test_merge_mapping_on_top_of_device_defaults() {
        let controller = controller(json!({
            "controller": ["switch_a", "switch_b"],
            "integration": {"name": "z2m", "listen_to": "mqtt"},
            "device": "legrand_600083_light",
            "merge_mapping": {"toggle": {"scene": "scene.movie"}},
        }))
        .unwrap();
        assert_eq!(controller.subscriptions().len(), 2);

        block_on(controller.handle_event(&mqtt("zigbee2mqtt/switch_b", r#"{"action": "toggle"}"#)))
            .unwrap();
        assert_eq!(
            controller.dispatcher().backend().calls.borrow().as_slice(),
            [r#"scene.turn_on {"entity_id":"scene.movie"}"#.to_string()]
        );
    }

    #[test]
    fn test_configuration_errors_abort_construction() {
        assert_eq!(
            controller(json!({"integration": "z2m", "mapping": {}})).err(),
            Some(ConfigError::MissingOption("controller"))
        );
        assert_eq!(
            controller(json!({"controller": "x", "integration": "deconz", "device": "legrand_600083_light"}))
                .err(),
            Some(ConfigError::UnsupportedIntegration("deconz".to_string()))
        );
        assert_eq!(
            controller(json!({"controller": "x", "integration": "z2m", "device": "nope"})).err(),
            Some(ConfigError::UnknownDevice("nope".to_string()))
        );
    }

    #[test]
    fn test_deconz_integer_events_reach_string_keyed_mapping() {
        let controller = controller(json!({
            "controller": "hue_dimmer",
            "integration": "deconz",
            "mapping": {"1002": "toggle", "2002": "click_brightness_up"},
        }))
        .unwrap();
        let event = RawEvent::HaEvent {
            event: "deconz_event".to_string(),
            data: json!({"id": "hue_dimmer", "event": 2002}).as_object().cloned().unwrap(),
        };
        block_on(controller.handle_event(&event)).unwrap();
        assert_eq!(
            controller.dispatcher().backend().calls.borrow().as_slice(),
            ["click_brightness_up".to_string()]
        );
    }

    #[test]
    fn test_stalled_queued_key_does_not_block_other_keys() {
        let controller = controller(json!({
            "controller": "remote",
            "integration": {"name": "z2m", "listen_to": "mqtt"},
            "mapping": {"press_a": "stall", "press_b": "toggle"},
            "mode": "queued",
            "action_delta": 0,
        }))
        .unwrap();
        let events = EventChannel::new();
        let calls = || controller.dispatcher().backend().calls.borrow().clone();

        block_on(select(controller.run(events.receiver()), async {
            for _ in 0..40 {
                events
                    .send(mqtt("zigbee2mqtt/remote", r#"{"action": "press_a"}"#))
                    .await;
            }
            events
                .send(mqtt("zigbee2mqtt/remote", r#"{"action": "press_b"}"#))
                .await;
            for _ in 0..100 {
                if calls().contains(&"toggle".to_string()) {
                    break;
                }
                Timer::after_millis(10).await;
            }
        }));

        let calls = calls();
        assert_eq!(calls.iter().filter(|call| *call == "stall").count(), 1);
        assert!(calls.contains(&"toggle".to_string()));
    }
}
