pub mod action_type;
pub mod actions;
pub mod backend;
pub mod click;
pub mod controller;
pub mod devices;
pub mod dispatcher;
pub mod error;
pub mod integration;
pub mod mapping;
pub mod state;
pub mod stepper;
pub mod system;
pub mod task;
pub mod types;

pub use types::*;
pub use controller::*;
