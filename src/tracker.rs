//! GPS breadcrumb trail
//!
//! While tracking, the device location is sampled once immediately and then
//! on a fixed cadence. Samples are produced by background tasks and delivered
//! to the App layer as [`ServiceResponse::BreadcrumbRecorded`]; the owner feeds
//! them back through [`BreadcrumbTracker::record`]. A sample that resolves after
//! tracking stopped is still recorded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::constants::{BREADCRUMB_AREA_LABEL, BREADCRUMB_FAILED_LABEL, SHARE_WAYPOINTS};
use crate::geocode::Geocoder;
use crate::location::{locate_or_fallback, LocationSource};
use crate::messages::ServiceResponse;
use crate::models::{BreadcrumbPoint, Coordinates};

/// Everything needed to take one breadcrumb sample
#[derive(Clone)]
pub struct Sampler {
    pub source: Arc<dyn LocationSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub fallback: Coordinates,
}

impl Sampler {
    /// Locate (with fallback) and label one point. Never fails.
    pub async fn sample(&self) -> BreadcrumbPoint {
        let (at, _) = locate_or_fallback(self.source.as_ref(), self.fallback).await;
        let address = match self.geocoder.context_for(at).await {
            Ok(ctx) => ctx
                .formatted_address()
                .unwrap_or(BREADCRUMB_AREA_LABEL)
                .to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Context lookup failed for breadcrumb");
                BREADCRUMB_FAILED_LABEL.to_string()
            }
        };
        tracing::debug!(lat = at.lat, lng = at.lng, %address, "Breadcrumb sampled");
        BreadcrumbPoint::new(at, Some(address))
    }
}

async fn record_sample(sampler: Sampler, events: mpsc::UnboundedSender<ServiceResponse>) {
    let point = sampler.sample().await;
    let _ = events.send(ServiceResponse::BreadcrumbRecorded(point));
}

/// Result of [`BreadcrumbTracker::share_trail`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SharedTrail {
    /// Empty when there is nothing to share
    pub maps_url: String,
    pub trail: Vec<BreadcrumbPoint>,
    pub last_location: Option<BreadcrumbPoint>,
}

/// Build a directions link through the last `max_waypoints` points, centered on the newest
pub fn trail_link(points: &[BreadcrumbPoint], max_waypoints: usize) -> String {
    let Some(last) = points.last() else {
        return String::new();
    };
    let start = points.len().saturating_sub(max_waypoints);
    let waypoints = points[start..]
        .iter()
        .map(|p| p.coordinates().to_pair())
        .collect::<Vec<_>>()
        .join("|");
    format!(
        "https://maps.google.com/maps/dir/{}/@{},{},15z",
        waypoints, last.lat, last.lng
    )
}

pub struct BreadcrumbTracker {
    trail: Vec<BreadcrumbPoint>,
    ticker: Option<JoinHandle<()>>,
    interval: Duration,
    max_waypoints: usize,
    sampler: Sampler,
    events: mpsc::UnboundedSender<ServiceResponse>,
}

impl BreadcrumbTracker {
    pub fn new(
        sampler: Sampler,
        interval: Duration,
        events: mpsc::UnboundedSender<ServiceResponse>,
    ) -> Self {
        BreadcrumbTracker {
            trail: Vec::new(),
            ticker: None,
            interval,
            max_waypoints: SHARE_WAYPOINTS,
            sampler,
            events,
        }
    }

    pub fn with_max_waypoints(mut self, max_waypoints: usize) -> Self {
        self.max_waypoints = max_waypoints.max(1);
        self
    }

    pub fn is_tracking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn trail(&self) -> &[BreadcrumbPoint] {
        &self.trail
    }

    pub fn last_point(&self) -> Option<&BreadcrumbPoint> {
        self.trail.last()
    }

    /// Sample now and every interval after. Returns false if already tracking.
    pub fn start_tracking(&mut self) -> bool {
        if self.ticker.is_some() {
            return false;
        }

        // Detached so that stopping cannot cancel the first sample
        tokio::spawn(record_sample(self.sampler.clone(), self.events.clone()));

        let sampler = self.sampler.clone();
        let events = self.events.clone();
        let period = self.interval;
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                record_sample(sampler.clone(), events.clone()).await;
            }
        }));

        tracing::info!(interval_secs = period.as_secs(), "Breadcrumb tracking started");
        true
    }

    /// Cancel the cadence; recorded points are kept
    pub fn stop_tracking(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                ticker.abort();
                tracing::info!(points = self.trail.len(), "Breadcrumb tracking stopped");
                true
            }
            None => false,
        }
    }

    /// Append a sample delivered by a background task
    pub fn record(&mut self, point: BreadcrumbPoint) {
        self.trail.push(point);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    pub fn share_trail(&self) -> SharedTrail {
        if self.trail.is_empty() {
            return SharedTrail::default();
        }
        SharedTrail {
            maps_url: trail_link(&self.trail, self.max_waypoints),
            trail: self.trail.clone(),
            last_location: self.trail.last().cloned(),
        }
    }
}

impl Drop for BreadcrumbTracker {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{LocationContext, MockRadar};
    use crate::location::{FixedLocation, NoLocation};
    use async_trait::async_trait;

    struct BrokenGeocoder;

    #[async_trait]
    impl Geocoder for BrokenGeocoder {
        async fn context_for(&self, _at: Coordinates) -> anyhow::Result<LocationContext> {
            anyhow::bail!("lookup failed")
        }
    }

    fn sampler(source: Arc<dyn LocationSource>, geocoder: Arc<dyn Geocoder>) -> Sampler {
        Sampler {
            source,
            geocoder,
            fallback: Coordinates::fallback(),
        }
    }

    fn tracker() -> (BreadcrumbTracker, mpsc::UnboundedReceiver<ServiceResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sampler = sampler(
            Arc::new(FixedLocation(Coordinates::new(-26.28, 27.98))),
            Arc::new(MockRadar::new()),
        );
        (BreadcrumbTracker::new(sampler, Duration::from_secs(30), tx), rx)
    }

    fn drain(tracker: &mut BreadcrumbTracker, rx: &mut mpsc::UnboundedReceiver<ServiceResponse>) {
        while let Ok(msg) = rx.try_recv() {
            if let ServiceResponse::BreadcrumbRecorded(point) = msg {
                tracker.record(point);
            }
        }
    }

    fn point(i: usize) -> BreadcrumbPoint {
        BreadcrumbPoint::new(Coordinates::new(i as f64, -(i as f64)), None)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_then_stop_records_one_point() {
        let (mut tracker, mut rx) = tracker();
        assert!(tracker.start_tracking());
        assert!(tracker.stop_tracking());

        tokio::time::sleep(Duration::from_secs(120)).await;
        drain(&mut tracker, &mut rx);

        assert_eq!(tracker.trail().len(), 1);
        assert!(!tracker.is_tracking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let (mut tracker, mut rx) = tracker();
        assert!(tracker.start_tracking());
        assert!(!tracker.start_tracking());

        // Immediate sample plus one tick at 30s
        tokio::time::sleep(Duration::from_secs(31)).await;
        drain(&mut tracker, &mut rx);
        assert_eq!(tracker.trail().len(), 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        drain(&mut tracker, &mut rx);
        assert_eq!(tracker.trail().len(), 3);

        tracker.stop_tracking();
        tokio::time::sleep(Duration::from_secs(300)).await;
        drain(&mut tracker, &mut rx);
        assert_eq!(tracker.trail().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_samples_carry_context_label() {
        let (mut tracker, mut rx) = tracker();
        tracker.start_tracking();
        tokio::time::sleep(Duration::from_secs(1)).await;
        drain(&mut tracker, &mut rx);
        assert_eq!(
            tracker.trail()[0].address.as_deref(),
            Some("Mondeor, Johannesburg, Gauteng, South Africa")
        );
    }

    #[tokio::test]
    async fn test_failures_fall_back_silently() {
        let sampler = sampler(Arc::new(NoLocation), Arc::new(BrokenGeocoder));
        let point = sampler.sample().await;
        assert_eq!(point.coordinates(), Coordinates::fallback());
        assert_eq!(point.address.as_deref(), Some("Location recorded"));
    }

    #[tokio::test]
    async fn test_share_empty_trail() {
        let (tracker, _rx) = tracker();
        let shared = tracker.share_trail();
        assert_eq!(shared.maps_url, "");
        assert!(shared.trail.is_empty());
        assert!(shared.last_location.is_none());
    }

    #[tokio::test]
    async fn test_share_caps_waypoints() {
        let (mut tracker, _rx) = tracker();
        for i in 0..15 {
            tracker.record(point(i));
        }
        let shared = tracker.share_trail();

        let waypoints = shared
            .maps_url
            .trim_start_matches("https://maps.google.com/maps/dir/")
            .split('/')
            .next()
            .unwrap();
        let pairs: Vec<&str> = waypoints.split('|').collect();
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0], "5,-5");
        assert_eq!(pairs[9], "14,-14");
        assert!(shared.maps_url.ends_with("/@14,-14,15z"));
        assert_eq!(shared.trail.len(), 15);
        assert_eq!(shared.last_location, Some(tracker.trail()[14].clone()));
    }

    #[tokio::test]
    async fn test_clear_keeps_tracking_state() {
        let (mut tracker, _rx) = tracker();
        tracker.record(point(1));
        tracker.clear_trail();
        assert!(tracker.trail().is_empty());
        assert!(!tracker.is_tracking());
    }
}
