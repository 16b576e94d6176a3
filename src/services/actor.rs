//! Service actor - runs location, feed and intent work in the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::constants::{ALERTS_FETCH_DELAY, MESSAGES_FETCH_DELAY};
use crate::feeds;
use crate::geocode::Geocoder;
use crate::intents::IntentLauncher;
use crate::location::{locate_or_fallback, LocationSource};
use crate::messages::{ServiceCommand, ServiceResponse};
use crate::models::Coordinates;

/// Platform capabilities the service actor works with
#[derive(Clone)]
pub struct Platform {
    pub location: Arc<dyn LocationSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub launcher: Arc<dyn IntentLauncher>,
    pub fallback: Coordinates,
}

/// Service actor that processes location, feed and intent commands
pub struct ServiceActor {
    platform: Platform,
    response_tx: mpsc::UnboundedSender<ServiceResponse>,
    active_tasks: JoinSet<()>,
}

impl ServiceActor {
    pub fn new(platform: Platform, response_tx: mpsc::UnboundedSender<ServiceResponse>) -> Self {
        ServiceActor {
            platform,
            response_tx,
            active_tasks: JoinSet::new(),
        }
    }

    /// Run the service actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ServiceCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ServiceCommand::Locate) => {
                            let platform = self.platform.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_tasks.spawn(async move {
                                let (at, error) =
                                    locate_or_fallback(platform.location.as_ref(), platform.fallback).await;
                                let warning = error.map(|e| e.fallback_warning().to_string());
                                tracing::info!(lat = at.lat, lng = at.lng, fallback = warning.is_some(), "Located device");
                                let _ = response_tx.send(ServiceResponse::Located { at, warning });

                                let context = match platform.geocoder.context_for(at).await {
                                    Ok(ctx) => Some(ctx),
                                    Err(e) => {
                                        tracing::warn!(error = %e, "Location context lookup failed");
                                        None
                                    }
                                };
                                let _ = response_tx.send(ServiceResponse::ContextResolved { at, context });
                            });
                        }

                        Some(ServiceCommand::FetchAlerts) => {
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tokio::time::sleep(ALERTS_FETCH_DELAY).await;
                                let _ = response_tx.send(ServiceResponse::AlertsLoaded(feeds::security_alerts()));
                            });
                        }

                        Some(ServiceCommand::FetchMessages) => {
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tokio::time::sleep(MESSAGES_FETCH_DELAY).await;
                                let _ = response_tx.send(ServiceResponse::MessagesLoaded(feeds::security_messages()));
                            });
                        }

                        Some(ServiceCommand::Launch(intent)) => {
                            let description = intent.describe();
                            let response = match self.platform.launcher.launch(&intent) {
                                Ok(uri) => ServiceResponse::IntentLaunched { description, uri },
                                Err(e) => {
                                    tracing::warn!(%description, error = %e, "Intent launch failed");
                                    ServiceResponse::IntentFailed { description, error: e.to_string() }
                                }
                            };
                            let _ = self.response_tx.send(response);
                        }

                        Some(ServiceCommand::Shutdown) => {
                            self.active_tasks.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_tasks.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::MockRadar;
    use crate::intents::{Intent, LogLauncher};
    use crate::location::NoLocation;
    use std::time::Duration;

    fn spawn_actor() -> (
        mpsc::UnboundedSender<ServiceCommand>,
        mpsc::UnboundedReceiver<ServiceResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let platform = Platform {
            location: Arc::new(NoLocation),
            geocoder: Arc::new(MockRadar::with_delay(Duration::ZERO)),
            launcher: Arc::new(LogLauncher),
            fallback: Coordinates::fallback(),
        };
        tokio::spawn(ServiceActor::new(platform, resp_tx).run(cmd_rx));
        (cmd_tx, resp_rx)
    }

    #[tokio::test]
    async fn test_locate_falls_back_then_resolves_context() {
        let (cmd_tx, mut resp_rx) = spawn_actor();
        cmd_tx.send(ServiceCommand::Locate).unwrap();

        match resp_rx.recv().await.unwrap() {
            ServiceResponse::Located { at, warning } => {
                assert_eq!(at, Coordinates::fallback());
                assert!(warning.unwrap().starts_with("Geolocation not supported"));
            }
            other => panic!("unexpected {:?}", other),
        }
        match resp_rx.recv().await.unwrap() {
            ServiceResponse::ContextResolved { context, .. } => {
                assert_eq!(
                    context.unwrap().display_name(),
                    "Mondeor, Johannesburg, Gauteng, South Africa"
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_launch_reports_uri() {
        let (cmd_tx, mut resp_rx) = spawn_actor();
        cmd_tx.send(ServiceCommand::Launch(Intent::dial("10111"))).unwrap();

        match resp_rx.recv().await.unwrap() {
            ServiceResponse::IntentLaunched { uri, description } => {
                assert_eq!(uri, "tel:10111");
                assert_eq!(description, "Dial 10111");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_feeds_load_after_delay() {
        let (cmd_tx, mut resp_rx) = spawn_actor();
        cmd_tx.send(ServiceCommand::FetchAlerts).unwrap();

        match resp_rx.recv().await.unwrap() {
            ServiceResponse::AlertsLoaded(alerts) => assert_eq!(alerts.len(), 4),
            other => panic!("unexpected {:?}", other),
        }
    }
}
