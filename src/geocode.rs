//! Location context lookup
//!
//! Reverse geocoding is mocked: coordinates inside a bounding box around
//! Mondeor resolve to a full address, anything else to a coordinate label.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::{CONTEXT_LOOKUP_DELAY, DEFAULT_AREA};
use crate::models::Coordinates;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub description: String,
    pub tag: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub address: Option<Address>,
    #[serde(default)]
    pub geofences: Vec<Geofence>,
}

impl LocationContext {
    pub fn formatted_address(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|a| a.formatted_address.as_deref())
    }

    /// Human-readable location, defaulting to the home area
    pub fn display_name(&self) -> String {
        self.formatted_address().unwrap_or(DEFAULT_AREA).to_string()
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn context_for(&self, at: Coordinates) -> Result<LocationContext>;
}

/// Stand-in for a hosted location-context API
pub struct MockRadar {
    delay: Duration,
}

impl MockRadar {
    pub fn new() -> Self {
        MockRadar {
            delay: CONTEXT_LOOKUP_DELAY,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        MockRadar { delay }
    }
}

impl Default for MockRadar {
    fn default() -> Self {
        Self::new()
    }
}

fn in_mondeor(at: Coordinates) -> bool {
    at.lat > -26.29 && at.lat < -26.27 && at.lng > 27.97 && at.lng < 28.00
}

#[async_trait]
impl Geocoder for MockRadar {
    async fn context_for(&self, at: Coordinates) -> Result<LocationContext> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if in_mondeor(at) {
            return Ok(LocationContext {
                address: Some(Address {
                    formatted_address: Some(
                        "Mondeor, Johannesburg, Gauteng, South Africa".to_string(),
                    ),
                    street: Some("Main Road".to_string()),
                    city: Some("Johannesburg".to_string()),
                    state: Some("Gauteng".to_string()),
                    country: Some("South Africa".to_string()),
                    postal_code: Some("2091".to_string()),
                }),
                geofences: vec![
                    Geofence {
                        description: "Mondeor".to_string(),
                        tag: Some("neighborhood".to_string()),
                    },
                    Geofence {
                        description: "Johannesburg South".to_string(),
                        tag: Some("district".to_string()),
                    },
                ],
            });
        }

        Ok(LocationContext {
            address: Some(Address {
                formatted_address: Some(format!("Location: {:.4}, {:.4}", at.lat, at.lng)),
                city: Some("Johannesburg".to_string()),
                state: Some("Gauteng".to_string()),
                country: Some("South Africa".to_string()),
                ..Default::default()
            }),
            geofences: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inside_mondeor_box() {
        let radar = MockRadar::with_delay(Duration::ZERO);
        let ctx = radar.context_for(Coordinates::fallback()).await.unwrap();
        assert_eq!(
            ctx.formatted_address(),
            Some("Mondeor, Johannesburg, Gauteng, South Africa")
        );
        assert_eq!(ctx.geofences.len(), 2);
        assert_eq!(ctx.address.unwrap().postal_code.as_deref(), Some("2091"));
    }

    #[tokio::test]
    async fn test_outside_box_uses_coordinate_label() {
        let radar = MockRadar::with_delay(Duration::ZERO);
        let ctx = radar
            .context_for(Coordinates::new(-33.92584, 18.42322))
            .await
            .unwrap();
        assert_eq!(ctx.formatted_address(), Some("Location: -33.9258, 18.4232"));
        assert!(ctx.geofences.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_is_delayed() {
        let radar = MockRadar::new();
        let started = tokio::time::Instant::now();
        radar.context_for(Coordinates::fallback()).await.unwrap();
        assert!(started.elapsed() >= CONTEXT_LOOKUP_DELAY);
    }

    #[test]
    fn test_display_name_defaults_to_area() {
        assert_eq!(LocationContext::default().display_name(), "Mondeor, Johannesburg");
    }
}
