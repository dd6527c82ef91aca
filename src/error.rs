use crate::types::ActionEvent;

/// Problems found while building a controller. Any of these aborts startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Two options that cannot be used together, e.g. `mapping` + `merge_mapping`
    ConflictingOptions(&'static str, &'static str),
    MissingOption(&'static str),
    UnknownIntegration { name: String, options: Vec<&'static str> },
    MissingIntegrationName,
    UnsupportedAttributeType { attribute: &'static str, found: String },
    /// The device profile has no default mapping for this integration
    UnsupportedIntegration(String),
    InvalidAction { event: ActionEvent, reason: String },
    TooManyActions { event: ActionEvent, count: usize },
    InvalidMultipleClickKey(ActionEvent),
    InvalidListenTo(String),
    UnknownDevice(String),
    /// A duration that does not fit a timer deadline
    OutOfRange { attribute: &'static str, value: String },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConflictingOptions(a, b) => {
                write!(f, "`{}` and `{}` cannot be used together", a, b)
            }
            ConfigError::MissingOption(name) => write!(f, "`{}` attribute is mandatory", name),
            ConfigError::UnknownIntegration { name, options } => write!(
                f,
                "`{}` is not an option. The options are {:?}",
                name, options
            ),
            ConfigError::MissingIntegrationName => write!(f, "'name' attribute is mandatory"),
            ConfigError::UnsupportedAttributeType { attribute, found } => write!(
                f,
                "Type {} is not supported for `{}` attribute",
                found, attribute
            ),
            ConfigError::UnsupportedIntegration(name) => write!(
                f,
                "This controller does not support {}. Use `mapping` to define the actions.",
                name
            ),
            ConfigError::InvalidAction { event, reason } => {
                write!(f, "Invalid action for `{}`: {}", event, reason)
            }
            ConfigError::TooManyActions { event, count } => write!(
                f,
                "`{}` has {} actions, at most {} are allowed",
                event,
                count,
                crate::types::MAX_ACTIONS_PER_EVENT
            ),
            ConfigError::InvalidMultipleClickKey(event) => write!(
                f,
                "`{}` has more than one `{}` token",
                event,
                crate::types::MULTIPLE_CLICK_TOKEN
            ),
            ConfigError::InvalidListenTo(value) => write!(
                f,
                "`listen_to` has to be either `ha`, `mqtt` or `event`, not `{}`. Default is `ha`.",
                value
            ),
            ConfigError::UnknownDevice(name) => write!(f, "Unknown device profile `{}`", name),
            ConfigError::OutOfRange { attribute, value } => {
                write!(f, "`{}` value {} is out of range", attribute, value)
            }
            ConfigError::Parse(msg) => write!(f, "Configuration parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Failures surfaced while an action is being triggered.
#[derive(Debug)]
pub enum DispatchError {
    /// `mode` holds something other than single/restart/queued/parallel
    UnknownMode(String),
    Handler(anyhow::Error),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::UnknownMode(mode) => write!(
                f,
                "`{}` is not a possible value for `mode` parameter. \
                 Possible values: `single`, `restart`, `queued` and `parallel`.",
                mode
            ),
            DispatchError::Handler(e) => write!(f, "Action failed: {:#}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::UnknownMode(_) => None,
            DispatchError::Handler(e) => Some(&**e),
        }
    }
}
