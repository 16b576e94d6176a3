//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Service layers.

pub mod ui_events;
pub mod services;
pub mod render;

pub use ui_events::UiEvent;
pub use services::{ServiceCommand, ServiceResponse};
pub use render::RenderState;
