//! Backend of the host binary: actions are logged instead of executed, with a
//! simulated brightness so click steps show where they land.

use crate::action_type::ActionBackend;
use crate::actions::light;
use crate::stepper::{MinMax, Stepper, StepperDir, StepperMode};
use crate::types::EventData;
use log::{debug, info};
use serde_json::Value;
use std::cell::{Cell, RefCell};

const MIN_BRIGHTNESS: f64 = 1.0;
const MAX_BRIGHTNESS: f64 = 255.0;
const CLICK_STEPS: f64 = 10.0;

#[derive(Debug)]
pub struct LogBackend {
    brightness: Cell<f64>,
    stepper: RefCell<Stepper>,
}

impl LogBackend {
    pub fn new() -> Self {
        Self {
            brightness: Cell::new(MIN_BRIGHTNESS),
            stepper: RefCell::new(Stepper::new(
                StepperMode::Stop,
                MinMax::new(MIN_BRIGHTNESS, MAX_BRIGHTNESS),
                CLICK_STEPS,
                true,
            )),
        }
    }

    pub fn brightness(&self) -> f64 {
        self.brightness.get()
    }

    fn click_brightness(&self, direction: StepperDir) {
        let current = self.brightness.get();
        let output = self.stepper.borrow_mut().step(current, direction);
        self.brightness.set(output.next_value);
        if output.exceeded() {
            info!("Brightness {} (limit reached)", output.next_value);
        } else {
            info!("Brightness {} -> {}", current, output.next_value);
        }
    }
}

impl Default for LogBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionBackend for LogBackend {
    async fn call_service(&self, service: &str, data: &EventData) -> anyhow::Result<()> {
        info!("Service call `{}` {}", service, Value::Object(data.clone()));
        Ok(())
    }

    async fn run_predefined(
        &self,
        action: &str,
        args: &[Value],
        extra: Option<&EventData>,
    ) -> anyhow::Result<()> {
        info!("Action `{}` args={:?}", action, args);
        if let Some(extra) = extra {
            debug!("Extra: {:?}", extra);
        }
        match action {
            light::CLICK_BRIGHTNESS_UP => self.click_brightness(StepperDir::Up),
            light::CLICK_BRIGHTNESS_DOWN => self.click_brightness(StepperDir::Down),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_clicks_walk_the_simulated_brightness() {
        let backend = LogBackend::new();
        block_on(backend.run_predefined(light::CLICK_BRIGHTNESS_UP, &[], None)).unwrap();
        assert!(backend.brightness() > MIN_BRIGHTNESS);

        for _ in 0..20 {
            block_on(backend.run_predefined(light::CLICK_BRIGHTNESS_DOWN, &[], None)).unwrap();
        }
        assert_eq!(backend.brightness(), MIN_BRIGHTNESS);

        block_on(backend.run_predefined(light::TOGGLE, &[], None)).unwrap();
        assert_eq!(backend.brightness(), MIN_BRIGHTNESS);
    }
}
