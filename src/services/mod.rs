//! Service layer - stand-ins for platform APIs
//!
//! The Service actor receives location, feed and intent commands and sends
//! back responses.

pub mod actor;

pub use actor::{Platform, ServiceActor};
