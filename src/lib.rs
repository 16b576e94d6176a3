//! # Emergency Hub
//!
//! A terminal emergency-response front-end for a neighborhood security
//! service.
//!
//! ## Features
//! - Press-and-hold panic button with location sharing
//! - Voice-style emergency commands and quick dial
//! - GPS breadcrumb trail with shareable map links
//! - Emergency contacts and medical information, persisted locally
//! - Security companies, alerts and messages feeds
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Service Layer (Tokio runtime): location, feeds and OS intents

pub mod constants;
pub mod config;
pub mod models;
pub mod storage;
pub mod location;
pub mod geocode;
pub mod intents;
pub mod voice;
pub mod panic;
pub mod tracker;
pub mod feeds;
pub mod ui;
pub mod messages;
pub mod app;
pub mod services;

// Re-export commonly used types
pub use config::Config;
pub use models::{BreadcrumbPoint, Coordinates, EmergencyContact, MedicalInfo, ThemePreference};
pub use storage::Storage;
pub use tracker::{BreadcrumbTracker, Sampler};
pub use messages::{UiEvent, ServiceCommand, ServiceResponse, RenderState};
pub use app::{AppState, AppActor};
pub use services::{Platform, ServiceActor};
