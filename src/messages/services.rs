//! Service messages - communication between App and Service layers

use crate::geocode::LocationContext;
use crate::intents::Intent;
use crate::models::{BreadcrumbPoint, Coordinates, SecurityAlert, SecurityMessage};

/// Commands sent from App layer to Service layer
#[derive(Debug, Clone)]
pub enum ServiceCommand {
    /// Acquire the device location and look up its context
    Locate,
    /// Load the security alerts feed
    FetchAlerts,
    /// Load the security messages feed
    FetchMessages,
    /// Hand an intent to the OS
    Launch(Intent),
    /// Shutdown the service actor
    Shutdown,
}

/// Messages delivered to the App layer by services and timers
#[derive(Debug, Clone)]
pub enum ServiceResponse {
    /// Device location acquired (possibly the fallback)
    Located {
        at: Coordinates,
        /// Set when the fallback coordinate was substituted
        warning: Option<String>,
    },
    /// Context lookup for a located position finished
    ContextResolved {
        at: Coordinates,
        context: Option<LocationContext>,
    },
    AlertsLoaded(Vec<SecurityAlert>),
    MessagesLoaded(Vec<SecurityMessage>),
    /// An intent was handed to the OS
    IntentLaunched { description: String, uri: String },
    /// An intent could not be launched
    IntentFailed { description: String, error: String },
    /// A tracker sample resolved
    BreadcrumbRecorded(BreadcrumbPoint),
    /// The panic button was held for the full duration
    PanicHoldElapsed { press_id: u64 },
}
