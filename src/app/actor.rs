//! App actor - message loop processing UI events and service responses

use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{RenderState, ServiceCommand, ServiceResponse, UiEvent};
use crate::ui::detect_system_theme;

/// Re-render cadence for time-based state such as the notify confirmation
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// App actor that processes UI events and service responses
pub struct AppActor {
    state: AppState,
    service_tx: mpsc::UnboundedSender<ServiceCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        service_tx: mpsc::UnboundedSender<ServiceCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            service_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut service_rx: mpsc::UnboundedReceiver<ServiceResponse>,
    ) {
        // Location and feeds load once per session
        self.state.send(ServiceCommand::Locate);
        self.state.send(ServiceCommand::FetchAlerts);
        self.state.send(ServiceCommand::FetchMessages);
        self.flush();

        let mut refresh = tokio::time::interval(REFRESH_INTERVAL);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.service_tx.send(ServiceCommand::Shutdown);
                        break;
                    }
                    self.flush();
                }
                Some(response) = service_rx.recv() => {
                    self.state.handle_response(response);
                    self.flush();
                }
                _ = refresh.tick() => {
                    self.render();
                }
                else => break,
            }
        }

        self.state.tracker.stop_tracking();
        tracing::info!("App actor stopped");
    }

    /// Forward queued commands, then publish a fresh render state
    fn flush(&mut self) {
        for cmd in self.state.take_commands() {
            let _ = self.service_tx.send(cmd);
        }
        self.render();
    }

    fn render(&self) {
        let _ = self
            .render_tx
            .send(self.state.to_render_state(detect_system_theme()));
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        self.state.events_handled += 1;
        self.state.status = None;

        match event {
            // Navigation
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),
            UiEvent::NextTab => self.state.switch_tab(self.state.active_tab.next()),
            UiEvent::PrevTab => self.state.switch_tab(self.state.active_tab.prev()),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),

            // Input editing
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::SubmitInput => self.state.submit_input(),
            UiEvent::CancelInput => self.state.cancel_input(),

            // Session
            UiEvent::DemoLogin => self.state.demo_login(),
            UiEvent::Logout => self.state.logout(),

            // Emergency
            UiEvent::PanicPress => self.state.panic_press(),
            UiEvent::PanicRelease => self.state.panic_release(),
            UiEvent::ToggleListening => self.state.toggle_listening(),
            UiEvent::EditTranscript => self.state.edit_transcript(),
            UiEvent::QuickDial(dial) => self.state.quick_dial(dial),
            UiEvent::CallCompany => self.state.call_company(),
            UiEvent::ResetEmergency => self.state.reset_emergency(),

            // Medical
            UiEvent::EditMedical => self.state.edit_medical(),
            UiEvent::CallMedicalContact => self.state.call_medical_contact(),

            // Contacts
            UiEvent::OpenContactForm => self.state.open_contact_form(),
            UiEvent::RemoveContact => self.state.remove_selected_contact(),
            UiEvent::CallContact => self.state.call_selected_contact(),
            UiEvent::MessageContact => self.state.message_selected_contact(),
            UiEvent::NotifyContacts => {
                self.state.notify_contacts();
            }

            // Breadcrumbs
            UiEvent::ToggleTracking => self.state.toggle_tracking(),
            UiEvent::ClearTrail => self.state.clear_trail(),
            UiEvent::ShareTrail => self.state.share_trail(),
            UiEvent::NavigateLastPoint => self.state.navigate_last_point(),

            // Alerts
            UiEvent::MarkAlertRead => self.state.mark_selected_alert_read(),
            UiEvent::MarkAllRead => self.state.mark_all_alerts_read(),

            // Popups and preferences
            UiEvent::ToggleTheme => self.state.toggle_theme(),
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geocode::MockRadar;
    use crate::location::FixedLocation;
    use crate::messages::ui_events::{key_to_ui_event, KeyContext, QuickDial};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use crate::models::Coordinates;
    use crate::storage::Storage;
    use crate::tracker::Sampler;
    use std::sync::Arc;

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        service_rx: mpsc::UnboundedReceiver<ServiceCommand>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn spawn_actor() -> Harness {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (service_tx, service_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();

        let sampler = Sampler {
            source: Arc::new(FixedLocation(Coordinates::fallback())),
            geocoder: Arc::new(MockRadar::with_delay(Duration::ZERO)),
            fallback: Coordinates::fallback(),
        };
        let state = AppState::new(Config::default(), Storage::in_memory(), sampler, resp_tx);
        let actor = AppActor::new(state, service_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));

        Harness {
            ui_tx,
            service_rx,
            render_rx,
            handle,
        }
    }

    #[tokio::test]
    async fn test_startup_requests_location_and_feeds() {
        let mut h = spawn_actor();
        assert!(matches!(h.service_rx.recv().await, Some(ServiceCommand::Locate)));
        assert!(matches!(h.service_rx.recv().await, Some(ServiceCommand::FetchAlerts)));
        assert!(matches!(h.service_rx.recv().await, Some(ServiceCommand::FetchMessages)));

        let initial = h.render_rx.recv().await.unwrap();
        assert!(!initial.authenticated);
    }

    #[tokio::test]
    async fn test_quick_dial_reaches_service_layer() {
        let mut h = spawn_actor();
        for _ in 0..3 {
            h.service_rx.recv().await.unwrap();
        }

        h.ui_tx.send(UiEvent::DemoLogin).unwrap();
        h.ui_tx.send(UiEvent::QuickDial(QuickDial::Police)).unwrap();

        match h.service_rx.recv().await {
            Some(ServiceCommand::Launch(intent)) => assert_eq!(intent.to_uri(), "tel:10111"),
            other => panic!("unexpected command {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_tap_release_cancels_panic() {
        let mut h = spawn_actor();
        for _ in 0..3 {
            h.service_rx.recv().await.unwrap();
        }
        h.ui_tx.send(UiEvent::DemoLogin).unwrap();

        // Context the UI loop still holds when the release arrives
        let before_press = KeyContext {
            authenticated: true,
            ..Default::default()
        };
        h.ui_tx.send(UiEvent::PanicPress).unwrap();
        let release = KeyEvent {
            code: KeyCode::Char('p'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let event = key_to_ui_event(release, before_press).unwrap();
        assert_eq!(event, UiEvent::PanicRelease);
        h.ui_tx.send(event).unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        h.ui_tx.send(UiEvent::Quit).unwrap();
        h.handle.await.unwrap();

        while let Ok(cmd) = h.service_rx.try_recv() {
            assert!(!matches!(cmd, ServiceCommand::Launch(_)), "alert was shared");
        }
        let mut last = None;
        while let Ok(state) = h.render_rx.try_recv() {
            last = Some(state);
        }
        let last = last.unwrap();
        assert!(!last.emergency_active);
        assert!(!last.panic_pressing);
        assert_eq!(last.events_handled, 3);
    }

    #[tokio::test]
    async fn test_quit_sends_shutdown() {
        let mut h = spawn_actor();
        for _ in 0..3 {
            h.service_rx.recv().await.unwrap();
        }

        h.ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(h.service_rx.recv().await, Some(ServiceCommand::Shutdown)));
        h.handle.await.unwrap();
    }
}
