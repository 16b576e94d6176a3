//! Device location
//!
//! A [`LocationSource`] stands in for the platform geolocation API. Callers
//! never see a failure: [`locate_or_fallback`] substitutes the configured
//! fallback coordinate and reports why.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

use crate::config::{GpsConfig, GpsMode};
use crate::constants::LOCATION_TIMEOUT;
use crate::models::Coordinates;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("location access denied")]
    Denied,

    #[error("geolocation not supported")]
    Unsupported,

    #[error("no location fix within {0:?}")]
    Timeout(Duration),
}

impl LocationError {
    /// Warning shown next to the fallback location
    pub fn fallback_warning(&self) -> &'static str {
        match self {
            LocationError::Unsupported => {
                "Geolocation not supported - using Mondeor default location"
            }
            LocationError::Denied | LocationError::Timeout(_) => {
                "Location access denied - using Mondeor default location"
            }
        }
    }
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current(&self) -> Result<Coordinates, LocationError>;
}

/// Always reports the same position
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No geolocation capability at all
pub struct NoLocation;

#[async_trait]
impl LocationSource for NoLocation {
    async fn current(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Random walk that drifts at most `jitter` degrees per read
pub struct SimulatedGps {
    position: Mutex<Coordinates>,
    jitter: f64,
}

impl SimulatedGps {
    pub fn new(origin: Coordinates, jitter: f64) -> Self {
        SimulatedGps {
            position: Mutex::new(origin),
            jitter: jitter.abs(),
        }
    }
}

#[async_trait]
impl LocationSource for SimulatedGps {
    async fn current(&self) -> Result<Coordinates, LocationError> {
        let mut position = self
            .position
            .lock()
            .map_err(|_| LocationError::Unsupported)?;
        if self.jitter > 0.0 {
            let mut rng = rand::rng();
            position.lat += rng.random_range(-self.jitter..=self.jitter);
            position.lng += rng.random_range(-self.jitter..=self.jitter);
        }
        Ok(*position)
    }
}

/// Build the source selected in the config
pub fn source_from_config(gps: &GpsConfig) -> Arc<dyn LocationSource> {
    match gps.mode {
        GpsMode::Simulated => Arc::new(SimulatedGps::new(gps.origin, gps.jitter)),
        GpsMode::Fixed => Arc::new(FixedLocation(gps.origin)),
        GpsMode::Unavailable => Arc::new(NoLocation),
    }
}

/// Read the location, bounded by [`LOCATION_TIMEOUT`]
pub async fn locate(source: &dyn LocationSource) -> Result<Coordinates, LocationError> {
    match tokio::time::timeout(LOCATION_TIMEOUT, source.current()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout(LOCATION_TIMEOUT)),
    }
}

/// Read the location, substituting `fallback` on any failure
pub async fn locate_or_fallback(
    source: &dyn LocationSource,
    fallback: Coordinates,
) -> (Coordinates, Option<LocationError>) {
    match locate(source).await {
        Ok(at) => (at, None),
        Err(e) => {
            tracing::warn!(error = %e, "Location unavailable, using fallback");
            (fallback, Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    #[async_trait]
    impl LocationSource for Denied {
        async fn current(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Denied)
        }
    }

    struct Stuck;

    #[async_trait]
    impl LocationSource for Stuck {
        async fn current(&self) -> Result<Coordinates, LocationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Coordinates::new(0.0, 0.0))
        }
    }

    #[tokio::test]
    async fn test_denied_uses_fallback() {
        let (at, err) = locate_or_fallback(&Denied, Coordinates::fallback()).await;
        assert_eq!(at, Coordinates::fallback());
        assert_eq!(err, Some(LocationError::Denied));
    }

    #[tokio::test]
    async fn test_unsupported_warning() {
        let (_, err) = locate_or_fallback(&NoLocation, Coordinates::fallback()).await;
        assert_eq!(
            err.unwrap().fallback_warning(),
            "Geolocation not supported - using Mondeor default location"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let (at, err) = locate_or_fallback(&Stuck, Coordinates::fallback()).await;
        assert_eq!(at, Coordinates::fallback());
        assert_eq!(err, Some(LocationError::Timeout(LOCATION_TIMEOUT)));
    }

    #[tokio::test]
    async fn test_simulated_gps_stays_near_origin() {
        let origin = Coordinates::new(-26.28, 27.98);
        let gps = SimulatedGps::new(origin, 0.001);
        for _ in 0..5 {
            let at = gps.current().await.unwrap();
            assert!((at.lat - origin.lat).abs() <= 0.005 + f64::EPSILON);
            assert!((at.lng - origin.lng).abs() <= 0.005 + f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let source = source_from_config(&GpsConfig {
            mode: GpsMode::Fixed,
            origin: Coordinates::new(1.0, 2.0),
            jitter: 0.5,
        });
        assert_eq!(source.current().await.unwrap(), Coordinates::new(1.0, 2.0));
    }
}
