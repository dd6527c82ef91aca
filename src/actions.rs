//! Names of the predefined actions each controller type understands.
//!
//! These are plain data: the dispatcher never interprets them, it hands them to
//! the [`ActionBackend`](crate::action_type::ActionBackend) as `Predefined` steps.

pub mod light {
    pub const ON: &str = "on";
    pub const OFF: &str = "off";
    pub const TOGGLE: &str = "toggle";
    pub const TOGGLE_FULL_BRIGHTNESS: &str = "toggle_full_brightness";
    pub const TOGGLE_FULL_COLOR_TEMP: &str = "toggle_full_color_temp";
    pub const TOGGLE_MIN_BRIGHTNESS: &str = "toggle_min_brightness";
    pub const TOGGLE_MIN_COLOR_TEMP: &str = "toggle_min_color_temp";
    pub const RELEASE: &str = "release";
    pub const ON_FULL_BRIGHTNESS: &str = "on_full_brightness";
    pub const ON_FULL_COLOR_TEMP: &str = "on_full_color_temp";
    pub const ON_MIN_BRIGHTNESS: &str = "on_min_brightness";
    pub const ON_MIN_COLOR_TEMP: &str = "on_min_color_temp";
    pub const SET_HALF_BRIGHTNESS: &str = "set_half_brightness";
    pub const SET_HALF_COLOR_TEMP: &str = "set_half_color_temp";
    pub const SYNC: &str = "sync";
    pub const CLICK_BRIGHTNESS_UP: &str = "click_brightness_up";
    pub const CLICK_BRIGHTNESS_DOWN: &str = "click_brightness_down";
    pub const CLICK_COLOR_UP: &str = "click_color_up";
    pub const CLICK_COLOR_DOWN: &str = "click_color_down";
    pub const CLICK_COLOR_TEMP_UP: &str = "click_colortemp_up";
    pub const CLICK_COLOR_TEMP_DOWN: &str = "click_colortemp_down";
    pub const HOLD_BRIGHTNESS_UP: &str = "hold_brightness_up";
    pub const HOLD_BRIGHTNESS_DOWN: &str = "hold_brightness_down";
    pub const HOLD_BRIGHTNESS_TOGGLE: &str = "hold_brightness_toggle";
    pub const HOLD_COLOR_UP: &str = "hold_color_up";
    pub const HOLD_COLOR_DOWN: &str = "hold_color_down";
    pub const HOLD_COLOR_TOGGLE: &str = "hold_color_toggle";
    pub const HOLD_COLOR_TEMP_UP: &str = "hold_colortemp_up";
    pub const HOLD_COLOR_TEMP_DOWN: &str = "hold_colortemp_down";
    pub const HOLD_COLOR_TEMP_TOGGLE: &str = "hold_colortemp_toggle";
    pub const XYCOLOR_FROM_CONTROLLER: &str = "xycolor_from_controller";
    pub const COLORTEMP_FROM_CONTROLLER: &str = "colortemp_from_controller";
    pub const BRIGHTNESS_FROM_CONTROLLER_LEVEL: &str = "brightness_from_controller_level";
    pub const BRIGHTNESS_FROM_CONTROLLER_ANGLE: &str = "brightness_from_controller_angle";
}

/// Subset of light actions for lights driven straight through Zigbee2MQTT
pub mod z2m_light {
    pub use super::light::{
        BRIGHTNESS_FROM_CONTROLLER_ANGLE, BRIGHTNESS_FROM_CONTROLLER_LEVEL, CLICK_BRIGHTNESS_DOWN,
        CLICK_BRIGHTNESS_UP, CLICK_COLOR_TEMP_DOWN, CLICK_COLOR_TEMP_UP,
        COLORTEMP_FROM_CONTROLLER, HOLD_BRIGHTNESS_DOWN, HOLD_BRIGHTNESS_TOGGLE,
        HOLD_BRIGHTNESS_UP, HOLD_COLOR_TEMP_DOWN, HOLD_COLOR_TEMP_TOGGLE, HOLD_COLOR_TEMP_UP, OFF,
        ON, ON_FULL_BRIGHTNESS, ON_FULL_COLOR_TEMP, ON_MIN_BRIGHTNESS, ON_MIN_COLOR_TEMP,
        RELEASE, SET_HALF_BRIGHTNESS, SET_HALF_COLOR_TEMP, TOGGLE, TOGGLE_FULL_BRIGHTNESS,
        XYCOLOR_FROM_CONTROLLER,
    };
    pub const SCENE_RECALL: &str = "scene_recall";
}

pub mod media_player {
    pub const HOLD_VOLUME_DOWN: &str = "hold_volume_down";
    pub const HOLD_VOLUME_UP: &str = "hold_volume_up";
    pub const CLICK_VOLUME_DOWN: &str = "click_volume_down";
    pub const CLICK_VOLUME_UP: &str = "click_volume_up";
    pub const VOLUME_SET: &str = "volume_set";
    pub const RELEASE: &str = "release";
    pub const PLAY: &str = "play";
    pub const PAUSE: &str = "pause";
    pub const PLAY_PAUSE: &str = "play_pause";
    pub const NEXT_TRACK: &str = "next_track";
    pub const PREVIOUS_TRACK: &str = "previous_track";
    pub const NEXT_SOURCE: &str = "next_source";
    pub const PREVIOUS_SOURCE: &str = "previous_source";
    pub const MUTE: &str = "mute";
    pub const TTS: &str = "tts";
    pub const VOLUME_FROM_CONTROLLER_ANGLE: &str = "volume_from_controller_angle";
}

pub mod switch {
    pub const ON: &str = "on";
    pub const OFF: &str = "off";
    pub const TOGGLE: &str = "toggle";
}

pub mod cover {
    pub const OPEN: &str = "open";
    pub const CLOSE: &str = "close";
    pub const STOP: &str = "stop";
    pub const TOGGLE_OPEN: &str = "toggle_open";
    pub const TOGGLE_CLOSE: &str = "toggle_close";
}
