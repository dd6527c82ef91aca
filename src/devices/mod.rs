//! Built-in device profiles: default mappings per integration

pub mod legrand;

use crate::action_type::CustomActions;
use crate::error::ConfigError;
use crate::system::config::CustomActionsMapping;
use crate::types::{ActionEvent, EventData};

/// `(event, predefined action)` pairs of one controller on one integration
pub type Layout = &'static [(&'static str, &'static str)];

/// What a device contributes to a controller besides the user config.
pub trait DeviceMappings {
    /// Default mapping for the integration called `integration`, if the
    /// device supports it.
    fn default_actions_mapping(&self, integration: &str) -> Option<CustomActionsMapping>;

    /// Device-specific translation of a ZHA event into an action name.
    fn zha_action(&self, _data: &EventData) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceProfile {
    /// No defaults: everything comes from `mapping`
    #[default]
    Custom,
    Legrand600083Light,
    Legrand600083Z2MLight,
    Legrand600088Light,
    Legrand600088LeftLight,
    Legrand600088RightLight,
    Legrand600088Z2MLight,
    Legrand600088LeftZ2MLight,
    Legrand600088RightZ2MLight,
}

impl DeviceProfile {
    pub const NAMES: &'static [&'static str] = &[
        "legrand_600083_light",
        "legrand_600083_z2m_light",
        "legrand_600088_light",
        "legrand_600088_left_light",
        "legrand_600088_right_light",
        "legrand_600088_z2m_light",
        "legrand_600088_left_z2m_light",
        "legrand_600088_right_z2m_light",
    ];

    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        Ok(match name {
            "legrand_600083_light" => Self::Legrand600083Light,
            "legrand_600083_z2m_light" => Self::Legrand600083Z2MLight,
            "legrand_600088_light" => Self::Legrand600088Light,
            "legrand_600088_left_light" => Self::Legrand600088LeftLight,
            "legrand_600088_right_light" => Self::Legrand600088RightLight,
            "legrand_600088_z2m_light" => Self::Legrand600088Z2MLight,
            "legrand_600088_left_z2m_light" => Self::Legrand600088LeftZ2MLight,
            "legrand_600088_right_z2m_light" => Self::Legrand600088RightZ2MLight,
            _ => return Err(ConfigError::UnknownDevice(name.to_string())),
        })
    }

    fn layout(&self, integration: &str) -> Option<Layout> {
        use DeviceProfile::*;

        match (self, integration) {
            (Legrand600083Light, "z2m") => Some(legrand::LIGHT_600083_Z2M),
            (Legrand600083Light, "zha") => Some(legrand::LIGHT_600083_ZHA),
            (Legrand600083Z2MLight, "z2m") => Some(legrand::Z2M_LIGHT_600083_Z2M),
            (Legrand600088Light, "z2m") => Some(legrand::LIGHT_600088_Z2M),
            (Legrand600088Light, "zha") => Some(legrand::LIGHT_600088_ZHA),
            (Legrand600088LeftLight, "z2m") => Some(legrand::LIGHT_600088_LEFT_Z2M),
            (Legrand600088LeftLight, "zha") => Some(legrand::LIGHT_600088_LEFT_ZHA),
            (Legrand600088RightLight, "z2m") => Some(legrand::LIGHT_600088_RIGHT_Z2M),
            (Legrand600088RightLight, "zha") => Some(legrand::LIGHT_600088_RIGHT_ZHA),
            (Legrand600088Z2MLight, "z2m") => Some(legrand::Z2M_LIGHT_600088_Z2M),
            (Legrand600088LeftZ2MLight, "z2m") => Some(legrand::Z2M_LIGHT_600088_LEFT_Z2M),
            (Legrand600088RightZ2MLight, "z2m") => Some(legrand::Z2M_LIGHT_600088_RIGHT_Z2M),
            _ => None,
        }
    }
}

impl DeviceMappings for DeviceProfile {
    fn default_actions_mapping(&self, integration: &str) -> Option<CustomActionsMapping> {
        self.layout(integration).map(mapping_from)
    }

    fn zha_action(&self, data: &EventData) -> Option<String> {
        match self {
            DeviceProfile::Legrand600083Light
            | DeviceProfile::Legrand600088Light
            | DeviceProfile::Legrand600088LeftLight
            | DeviceProfile::Legrand600088RightLight => legrand::zha_action(data),
            _ => None,
        }
    }
}

pub fn mapping_from(layout: Layout) -> CustomActionsMapping {
    layout
        .iter()
        .map(|(event, action)| (ActionEvent::from(*event), Some(CustomActions::from(*action))))
        .collect()
}
