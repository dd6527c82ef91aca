//! Legrand wireless wall controllers (600083 single, 600088 double)

use super::Layout;
use crate::actions::{light, z2m_light};
use crate::types::EventData;
use serde_json::Value;

pub const LIGHT_600083_Z2M: Layout = &[
    ("toggle", light::TOGGLE),
    ("on", light::ON),
    ("off", light::OFF),
    ("brightness_move_up", light::HOLD_BRIGHTNESS_UP),
    ("brightness_move_down", light::HOLD_BRIGHTNESS_DOWN),
    ("brightness_stop", light::RELEASE),
];

pub const LIGHT_600083_ZHA: Layout = &[
    ("1_toggle", light::TOGGLE),
    ("1_on", light::ON),
    ("1_off", light::OFF),
    ("1_move_up", light::HOLD_BRIGHTNESS_UP),
    ("1_move_down", light::HOLD_BRIGHTNESS_DOWN),
    ("1_stop", light::RELEASE),
];

pub const Z2M_LIGHT_600083_Z2M: Layout = &[
    ("toggle", z2m_light::TOGGLE),
    ("on", z2m_light::ON),
    ("off", z2m_light::OFF),
    ("brightness_move_up", z2m_light::HOLD_BRIGHTNESS_UP),
    ("brightness_move_down", z2m_light::HOLD_BRIGHTNESS_DOWN),
    ("brightness_stop", z2m_light::RELEASE),
];

pub const LIGHT_600088_Z2M: Layout = &[
    ("toggle_left", light::TOGGLE),
    ("on_left", light::ON),
    ("off_left", light::OFF),
    ("brightness_move_up_left", light::HOLD_COLOR_UP),
    ("brightness_move_down_left", light::HOLD_COLOR_DOWN),
    ("brightness_stop_left", light::RELEASE),
    ("toggle_right", light::TOGGLE_FULL_BRIGHTNESS),
    ("on_right", light::ON_FULL_BRIGHTNESS),
    ("off_right", light::ON_MIN_BRIGHTNESS),
    ("brightness_move_up_right", light::HOLD_BRIGHTNESS_UP),
    ("brightness_move_down_right", light::HOLD_BRIGHTNESS_DOWN),
    ("brightness_stop_right", light::RELEASE),
];

pub const LIGHT_600088_ZHA: Layout = &[
    ("1_toggle", light::TOGGLE),
    ("1_on", light::ON),
    ("1_off", light::OFF),
    ("1_move_up", light::HOLD_COLOR_UP),
    ("1_move_down", light::HOLD_COLOR_DOWN),
    ("1_stop", light::RELEASE),
    ("2_toggle", light::TOGGLE_FULL_BRIGHTNESS),
    ("2_on", light::ON_FULL_BRIGHTNESS),
    ("2_off", light::ON_MIN_BRIGHTNESS),
    ("2_move_up", light::HOLD_BRIGHTNESS_UP),
    ("2_move_down", light::HOLD_BRIGHTNESS_DOWN),
    ("2_stop", light::RELEASE),
];

pub const LIGHT_600088_LEFT_Z2M: Layout = &[
    ("toggle_left", light::TOGGLE),
    ("on_left", light::ON),
    ("off_left", light::OFF),
    ("brightness_move_up_left", light::HOLD_COLOR_UP),
    ("brightness_move_down_left", light::HOLD_COLOR_DOWN),
    ("brightness_stop_left", light::RELEASE),
];

pub const LIGHT_600088_LEFT_ZHA: Layout = &[
    ("1_toggle", light::TOGGLE),
    ("1_on", light::ON),
    ("1_off", light::OFF),
    ("1_move_up", light::HOLD_COLOR_UP),
    ("1_move_down", light::HOLD_COLOR_DOWN),
    ("1_stop", light::RELEASE),
];

pub const LIGHT_600088_RIGHT_Z2M: Layout = &[
    ("toggle_right", light::TOGGLE),
    ("on_right", light::ON),
    ("off_right", light::OFF),
    ("brightness_move_up_right", light::HOLD_COLOR_UP),
    ("brightness_move_down_right", light::HOLD_COLOR_DOWN),
    ("brightness_stop_right", light::RELEASE),
];

pub const LIGHT_600088_RIGHT_ZHA: Layout = &[
    ("2_toggle", light::TOGGLE),
    ("2_on", light::ON),
    ("2_off", light::OFF),
    ("2_move_up", light::HOLD_COLOR_UP),
    ("2_move_down", light::HOLD_COLOR_DOWN),
    ("2_stop", light::RELEASE),
];

pub const Z2M_LIGHT_600088_Z2M: Layout = &[
    ("toggle_left", z2m_light::TOGGLE),
    ("on_left", z2m_light::ON),
    ("off_left", z2m_light::OFF),
    ("brightness_move_up_left", z2m_light::HOLD_COLOR_TEMP_UP),
    ("brightness_move_down_left", z2m_light::HOLD_COLOR_TEMP_DOWN),
    ("brightness_stop_left", z2m_light::RELEASE),
    ("toggle_right", z2m_light::TOGGLE_FULL_BRIGHTNESS),
    ("on_right", z2m_light::ON_FULL_BRIGHTNESS),
    ("off_right", z2m_light::ON_MIN_BRIGHTNESS),
    ("brightness_move_up_right", z2m_light::HOLD_BRIGHTNESS_UP),
    ("brightness_move_down_right", z2m_light::HOLD_BRIGHTNESS_DOWN),
    ("brightness_stop_right", z2m_light::RELEASE),
];

pub const Z2M_LIGHT_600088_LEFT_Z2M: Layout = &[
    ("toggle_left", z2m_light::TOGGLE),
    ("on_left", z2m_light::ON),
    ("off_left", z2m_light::OFF),
    ("brightness_move_up_left", z2m_light::HOLD_BRIGHTNESS_UP),
    ("brightness_move_down_left", z2m_light::HOLD_BRIGHTNESS_DOWN),
    ("brightness_stop_left", z2m_light::RELEASE),
];

pub const Z2M_LIGHT_600088_RIGHT_Z2M: Layout = &[
    ("toggle_right", z2m_light::TOGGLE),
    ("on_right", z2m_light::ON),
    ("off_right", z2m_light::OFF),
    ("brightness_move_up_right", z2m_light::HOLD_BRIGHTNESS_UP),
    ("brightness_move_down_right", z2m_light::HOLD_BRIGHTNESS_DOWN),
    ("brightness_stop_right", z2m_light::RELEASE),
];

/// `<endpoint>_<command>`, with `move` split by direction: `1_move_up`
pub fn zha_action(data: &EventData) -> Option<String> {
    let endpoint = data.get("endpoint_id").and_then(Value::as_i64).unwrap_or(1);
    let command = data.get("command")?.as_str()?;
    let action = if command == "move" {
        let direction = match data.get("args")?.get(0)?.as_i64()? {
            0 => "up",
            1 => "down",
            _ => return None,
        };
        format!("{}_{}", command, direction)
    } else {
        command.to_string()
    };
    Some(format!("{}_{}", endpoint, action))
}
