//! Numeric walkers for continuous attributes (brightness, color temperature, volume)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepperDir {
    Up,
    Down,
    Toggle,
}

impl StepperDir {
    pub fn invert(self) -> Self {
        match self {
            StepperDir::Down => StepperDir::Up,
            _ => StepperDir::Down,
        }
    }

    fn sign(self) -> f64 {
        match self {
            StepperDir::Up => 1.0,
            _ => -1.0,
        }
    }
}

/// What happens when a stepper reaches one of its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepperMode {
    Stop,
    Loop,
    Bounce,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    min: f64,
    max: f64,
    margin_dist: f64,
}

impl MinMax {
    pub const DEFAULT_MARGIN: f64 = 0.05;

    pub fn new(min: f64, max: f64) -> Self {
        Self::with_margin(min, max, Self::DEFAULT_MARGIN)
    }

    pub fn with_margin(min: f64, max: f64, margin: f64) -> Self {
        Self {
            min,
            max,
            margin_dist: (max - min) * margin,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_min(&self, value: f64) -> bool {
        self.min == value
    }

    pub fn is_max(&self, value: f64) -> bool {
        self.max == value
    }

    pub fn is_between(&self, value: f64) -> bool {
        self.min < value && value < self.max
    }

    /// Within `margin` of the lower bound, used by "snap to extreme" policies
    pub fn in_min_boundaries(&self, value: f64) -> bool {
        self.min <= value && value <= self.min + self.margin_dist
    }

    pub fn in_max_boundaries(&self, value: f64) -> bool {
        self.max - self.margin_dist <= value && value <= self.max
    }

    pub fn clip(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperOutput {
    pub next_value: f64,
    /// `None` once the walk is over (bound reached or single-shot stepper)
    pub next_direction: Option<StepperDir>,
}

impl StepperOutput {
    pub fn exceeded(&self) -> bool {
        self.next_direction.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Stop,
    Loop,
    Bounce,
    Invert,
}

#[derive(Debug, Clone)]
pub struct Stepper {
    variant: Variant,
    min_max: MinMax,
    steps: f64,
    previous_direction: StepperDir,
    relative_steps: bool,
}

impl Stepper {
    /// `steps` is the number of steps between min and max when `relative_steps`
    /// is set, otherwise the absolute increment.
    pub fn new(mode: StepperMode, min_max: MinMax, steps: f64, relative_steps: bool) -> Self {
        let variant = match mode {
            StepperMode::Stop => Variant::Stop,
            StepperMode::Loop => Variant::Loop,
            StepperMode::Bounce => Variant::Bounce,
        };
        Self {
            variant,
            min_max,
            steps,
            previous_direction: StepperDir::Down,
            relative_steps,
        }
    }

    /// Stepper that only flips the sign of its input and is always done
    pub fn invert() -> Self {
        Self {
            variant: Variant::Invert,
            min_max: MinMax::new(0.0, 0.0),
            steps: 1.0,
            previous_direction: StepperDir::Down,
            relative_steps: false,
        }
    }

    pub fn min_max(&self) -> &MinMax {
        &self.min_max
    }

    pub fn previous_direction(&self) -> StepperDir {
        self.previous_direction
    }

    fn compute_step(&self) -> f64 {
        if self.relative_steps {
            (self.min_max.max() - self.min_max.min()) / self.steps
        } else {
            self.steps
        }
    }

    /// Resolves `Toggle` into a concrete direction, remembering it for the next toggle.
    pub fn get_direction(&mut self, value: f64, direction: StepperDir) -> StepperDir {
        if direction != StepperDir::Toggle {
            return direction;
        }
        if self.variant == Variant::Stop {
            let value = self.min_max.clip(value);
            if self.min_max.in_min_boundaries(value) {
                self.previous_direction = StepperDir::Up;
                return self.previous_direction;
            }
            if self.min_max.in_max_boundaries(value) {
                self.previous_direction = StepperDir::Down;
                return self.previous_direction;
            }
        }
        self.previous_direction = self.previous_direction.invert();
        self.previous_direction
    }

    pub fn step(&mut self, value: f64, direction: StepperDir) -> StepperOutput {
        let direction = self.get_direction(value, direction);
        let min = self.min_max.min();
        let max = self.min_max.max();

        match self.variant {
            Variant::Invert => StepperOutput {
                next_value: direction.sign() * value,
                next_direction: None,
            },
            Variant::Stop => {
                let new_value = self.min_max.clip(value) + direction.sign() * self.compute_step();
                if self.min_max.is_between(new_value) {
                    StepperOutput {
                        next_value: round3(new_value),
                        next_direction: Some(direction),
                    }
                } else {
                    StepperOutput {
                        next_value: round3(self.min_max.clip(new_value)),
                        next_direction: None,
                    }
                }
            }
            Variant::Loop => {
                let new_value = self.min_max.clip(value) + direction.sign() * self.compute_step();
                let span = max - min;
                let next_value = if span > 0.0 {
                    (new_value - min).rem_euclid(span) + min
                } else {
                    min
                };
                StepperOutput {
                    next_value: round3(next_value),
                    next_direction: Some(direction),
                }
            }
            Variant::Bounce => {
                let new_value = self.min_max.clip(value) + direction.sign() * self.compute_step();
                if self.min_max.is_between(new_value) {
                    return StepperOutput {
                        next_value: round3(new_value),
                        next_direction: Some(direction),
                    };
                }
                let reflected = if new_value > max {
                    2.0 * max - new_value
                } else {
                    2.0 * min - new_value
                };
                StepperOutput {
                    next_value: round3(reflected),
                    next_direction: Some(direction.invert()),
                }
            }
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_stepper_reports_exceeded_at_max() {
        let mut stepper = Stepper::new(StepperMode::Stop, MinMax::new(0.0, 255.0), 10.0, true);
        let output = stepper.step(255.0, StepperDir::Up);
        assert!(output.exceeded());
        assert_eq!(output.next_value, 255.0);

        let output = stepper.step(300.0, StepperDir::Up);
        assert!(output.exceeded());
        assert_eq!(output.next_value, 255.0);
    }

    #[test]
    fn test_stop_stepper_relative_and_absolute_steps() {
        let mut relative = Stepper::new(StepperMode::Stop, MinMax::new(0.0, 100.0), 10.0, true);
        let output = relative.step(50.0, StepperDir::Up);
        assert_eq!(output.next_value, 60.0);
        assert_eq!(output.next_direction, Some(StepperDir::Up));

        let mut absolute = Stepper::new(StepperMode::Stop, MinMax::new(0.0, 100.0), 3.0, false);
        let output = absolute.step(50.0, StepperDir::Down);
        assert_eq!(output.next_value, 47.0);
        assert_eq!(output.next_direction, Some(StepperDir::Down));

        let output = absolute.step(2.0, StepperDir::Down);
        assert!(output.exceeded());
        assert_eq!(output.next_value, 0.0);
    }

    #[test]
    fn test_toggle_alternates_direction() {
        let mut stepper = Stepper::new(StepperMode::Stop, MinMax::new(0.0, 100.0), 10.0, true);
        let first = stepper.step(50.0, StepperDir::Toggle);
        assert_eq!(first.next_direction, Some(StepperDir::Up));
        assert_eq!(first.next_value, 60.0);

        let second = stepper.step(50.0, StepperDir::Toggle);
        assert_eq!(second.next_direction, Some(StepperDir::Down));
        assert_eq!(second.next_value, 40.0);

        let third = stepper.step(50.0, StepperDir::Toggle);
        assert_eq!(third.next_direction, Some(StepperDir::Up));
    }

    #[test]
    fn test_toggle_near_an_extreme_moves_away_from_it() {
        let mut stepper = Stepper::new(StepperMode::Stop, MinMax::new(0.0, 100.0), 10.0, true);
        assert_eq!(stepper.get_direction(99.0, StepperDir::Toggle), StepperDir::Down);
        assert_eq!(stepper.get_direction(98.0, StepperDir::Toggle), StepperDir::Down);
        assert_eq!(stepper.get_direction(1.0, StepperDir::Toggle), StepperDir::Up);
    }

    #[test]
    fn test_loop_stepper_wraps_without_exceeding() {
        let mut stepper = Stepper::new(StepperMode::Loop, MinMax::new(0.0, 360.0), 60.0, false);
        let output = stepper.step(330.0, StepperDir::Up);
        assert!(!output.exceeded());
        assert!((output.next_value - 30.0).abs() < 1e-9);

        let output = stepper.step(10.0, StepperDir::Down);
        assert!((output.next_value - 310.0).abs() < 1e-9);
        assert_eq!(output.next_direction, Some(StepperDir::Down));
    }

    #[test]
    fn test_bounce_stepper_reflects_and_inverts() {
        let mut stepper = Stepper::new(StepperMode::Bounce, MinMax::new(0.0, 100.0), 10.0, false);
        let output = stepper.step(95.0, StepperDir::Up);
        assert_eq!(output.next_value, 95.0);
        assert_eq!(output.next_direction, Some(StepperDir::Down));

        let output = stepper.step(5.0, StepperDir::Down);
        assert_eq!(output.next_value, 5.0);
        assert_eq!(output.next_direction, Some(StepperDir::Up));
    }

    #[test]
    fn test_fractional_steps_round_in_every_mode() {
        let range = MinMax::new(0.0, 1.0);
        let mut stop = Stepper::new(StepperMode::Stop, range, 3.0, true);
        assert_eq!(stop.step(0.1, StepperDir::Up).next_value, 0.433);

        let mut looping = Stepper::new(StepperMode::Loop, range, 3.0, true);
        assert_eq!(looping.step(0.9, StepperDir::Up).next_value, 0.233);

        let mut bounce = Stepper::new(StepperMode::Bounce, range, 3.0, true);
        assert_eq!(bounce.step(0.9, StepperDir::Up).next_value, 0.767);
    }

    #[test]
    fn test_invert_stepper_is_always_done() {
        let mut stepper = Stepper::invert();
        let output = stepper.step(4.0, StepperDir::Down);
        assert_eq!(output.next_value, -4.0);
        assert!(output.exceeded());
        assert_eq!(stepper.step(4.0, StepperDir::Up).next_value, 4.0);
    }

    #[test]
    fn test_margin_boundaries() {
        let min_max = MinMax::new(100.0, 200.0);
        assert!(min_max.in_min_boundaries(104.0));
        assert!(!min_max.in_min_boundaries(106.0));
        assert!(min_max.in_max_boundaries(196.0));
        assert!(!min_max.in_max_boundaries(194.0));
        assert!(min_max.is_min(100.0));
        assert!(min_max.is_max(200.0));
        assert_eq!(min_max.clip(250.0), 200.0);
    }
}
