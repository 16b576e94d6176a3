//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "Emergency Hub";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the per-user data directory under `$HOME`
pub const DATA_DIR_NAME: &str = ".emergency-hub";

/// Optional runtime configuration inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Key-value store file inside the data directory
pub const STORE_FILE: &str = "storage.json";

/// Log file inside the data directory
pub const LOG_FILE: &str = "emergency-hub.log";

// Storage keys
pub const AUTH_KEY: &str = "emergency-hub-auth";
pub const AUTH_VALUE: &str = "authenticated";
pub const THEME_KEY: &str = "emergency-app-theme";
pub const CONTACTS_KEY: &str = "emergency-contacts";
pub const MEDICAL_KEY: &str = "emergency-medical-info";

/// Demo credentials accepted by the login screen
pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// Coordinate used whenever the device location is unavailable (Mondeor)
pub const FALLBACK_LAT: f64 = -26.2785;
pub const FALLBACK_LNG: f64 = 27.9867;

/// Default label for the fallback area
pub const DEFAULT_AREA: &str = "Mondeor, Johannesburg";

/// Location string shown before any fix
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

/// Breadcrumb labels when the context lookup has no address or fails
pub const BREADCRUMB_AREA_LABEL: &str = "Mondeor area";
pub const BREADCRUMB_FAILED_LABEL: &str = "Location recorded";

/// Cadence of breadcrumb samples while tracking
pub const TRACKING_INTERVAL: Duration = Duration::from_secs(30);

/// How long the panic button must be held
pub const PANIC_HOLD: Duration = Duration::from_secs(3);

/// Upper bound for a single location read
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Simulated latency of the location-context lookup
pub const CONTEXT_LOOKUP_DELAY: Duration = Duration::from_millis(500);

/// Simulated latency of the mocked feeds
pub const ALERTS_FETCH_DELAY: Duration = Duration::from_millis(800);
pub const MESSAGES_FETCH_DELAY: Duration = Duration::from_millis(1000);

/// How long the "notifications sent" confirmation stays visible
pub const NOTIFY_CONFIRMATION: Duration = Duration::from_secs(3);

/// Waypoints included in a shared trail link
pub const SHARE_WAYPOINTS: usize = 10;

/// Emergency service numbers
pub const POLICE_NUMBER: &str = "10111";
pub const AMBULANCE_NUMBER: &str = "10177";
pub const FIRE_NUMBER: &str = "10177";
pub const GENERAL_EMERGENCY_NUMBER: &str = "112";
