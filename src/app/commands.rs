//! Command handlers - business logic for processing UI events and service responses

use std::time::Instant;

use crate::app::state::{ActivityKind, AppState};
use crate::constants::{DEMO_PASSWORD, DEMO_USERNAME};
use crate::feeds;
use crate::intents::{map_link, Intent};
use crate::messages::ui_events::{AppTab, ContactField, EditTarget, InputMode, QuickDial};
use crate::messages::{ServiceCommand, ServiceResponse};
use crate::models::{EmergencyContact, MedicalField, MedicalInfo, ThemePreference};
use crate::voice;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.active_tab = tab;
    }

    pub fn select_next(&mut self) {
        match self.active_tab {
            AppTab::Emergency => {
                self.selected_company = step(self.selected_company, self.companies.len(), true)
            }
            AppTab::Medical => {
                let i = MedicalField::ALL
                    .iter()
                    .position(|f| *f == self.selected_medical_field)
                    .unwrap_or(0);
                self.selected_medical_field = MedicalField::ALL[(i + 1) % MedicalField::ALL.len()];
            }
            AppTab::Contacts => {
                self.selected_contact = step(self.selected_contact, self.contacts.len(), true)
            }
            AppTab::Alerts => {
                let len = self.alerts.as_ref().map(Vec::len).unwrap_or(0);
                self.selected_alert = step(self.selected_alert, len, true);
            }
            AppTab::Track => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.active_tab {
            AppTab::Emergency => {
                self.selected_company = step(self.selected_company, self.companies.len(), false)
            }
            AppTab::Medical => {
                let len = MedicalField::ALL.len();
                let i = MedicalField::ALL
                    .iter()
                    .position(|f| *f == self.selected_medical_field)
                    .unwrap_or(0);
                self.selected_medical_field = MedicalField::ALL[(i + len - 1) % len];
            }
            AppTab::Contacts => {
                self.selected_contact = step(self.selected_contact, self.contacts.len(), false)
            }
            AppTab::Alerts => {
                let len = self.alerts.as_ref().map(Vec::len).unwrap_or(0);
                self.selected_alert = step(self.selected_alert, len, false);
            }
            AppTab::Track => {}
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self, target: EditTarget) {
        self.input_mode = InputMode::Editing;
        self.edit_target = Some(target);
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_target = None;
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(input) = self.current_input_mut() {
            input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.current_input_mut() {
            input.pop();
        }
    }

    /// Tab inside a form moves to the next field
    pub fn next_field(&mut self) {
        let next = match self.edit_target {
            Some(EditTarget::LoginUsername) => EditTarget::LoginPassword,
            Some(EditTarget::LoginPassword) => EditTarget::LoginUsername,
            Some(EditTarget::Contact(field)) => EditTarget::Contact(field.next()),
            Some(EditTarget::Medical(field)) => {
                let i = MedicalField::ALL.iter().position(|f| *f == field).unwrap_or(0);
                let next = MedicalField::ALL[(i + 1) % MedicalField::ALL.len()];
                self.selected_medical_field = next;
                EditTarget::Medical(next)
            }
            Some(EditTarget::Transcript) | None => return,
        };
        self.edit_target = Some(next);
    }

    /// Enter: submit whatever form is being edited
    pub fn submit_input(&mut self) {
        match self.edit_target {
            Some(EditTarget::LoginUsername) | Some(EditTarget::LoginPassword) => {
                self.submit_login();
            }
            Some(EditTarget::Transcript) => self.submit_transcript(),
            Some(EditTarget::Contact(_)) => self.submit_contact_form(),
            Some(EditTarget::Medical(_)) => self.save_medical_draft(),
            None => {}
        }
    }

    /// Esc: leave the current form without saving
    pub fn cancel_input(&mut self) {
        match self.edit_target {
            Some(EditTarget::LoginUsername) | Some(EditTarget::LoginPassword) => {
                self.login.error = None;
            }
            Some(EditTarget::Transcript) => self.stop_editing(),
            Some(EditTarget::Contact(_)) => self.cancel_contact_form(),
            Some(EditTarget::Medical(_)) => self.cancel_medical_draft(),
            None => self.stop_editing(),
        }
    }

    // ========================
    // Auth and theme
    // ========================

    pub fn submit_login(&mut self) {
        if self.login.username == DEMO_USERNAME && self.login.password == DEMO_PASSWORD {
            self.login_succeeded();
        } else {
            tracing::info!(username = %self.login.username, "Login rejected");
            self.login.error = Some(format!(
                "Invalid credentials. Use {}/{}",
                DEMO_USERNAME, DEMO_PASSWORD
            ));
        }
    }

    pub fn demo_login(&mut self) {
        self.login.username = DEMO_USERNAME.to_string();
        self.login.password = DEMO_PASSWORD.to_string();
        self.login.error = None;
        self.login_succeeded();
    }

    fn login_succeeded(&mut self) {
        self.authenticated = true;
        self.login = Default::default();
        self.stop_editing();
        if let Err(e) = self.storage.save_authenticated(true) {
            tracing::warn!(error = %e, "Failed to persist login");
        }
        tracing::info!("Logged in");
    }

    pub fn logout(&mut self) {
        self.panic.release();
        self.tracker.stop_tracking();
        self.voice.listening = false;
        self.authenticated = false;
        self.show_help = false;
        self.contact_form = None;
        self.medical_draft = None;
        if let Err(e) = self.storage.save_authenticated(false) {
            tracing::warn!(error = %e, "Failed to clear login");
        }
        self.start_editing(EditTarget::LoginUsername);
        tracing::info!("Logged out");
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme_preference.next());
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.theme_preference = theme;
        if let Err(e) = self.storage.save_theme(theme) {
            tracing::warn!(error = %e, "Failed to persist theme");
        }
    }

    // ========================
    // Emergency state
    // ========================

    /// Enter emergency mode; the breadcrumb trail starts if it is not running
    pub fn trigger_emergency(&mut self) {
        if !self.emergency_active {
            self.emergency_active = true;
            self.log_activity(ActivityKind::Emergency, "Emergency protocols active");
            tracing::info!(location = %self.location_string(), "Emergency triggered");
        }
        self.tracker.start_tracking();
    }

    pub fn reset_emergency(&mut self) {
        if self.emergency_active {
            self.emergency_active = false;
            self.log_activity(ActivityKind::Info, "Emergency status reset");
            tracing::info!("Emergency reset");
        }
    }

    pub fn launch(&mut self, intent: Intent) {
        self.send(ServiceCommand::Launch(intent));
    }

    pub fn quick_dial(&mut self, dial: QuickDial) {
        self.trigger_emergency();
        self.launch(Intent::dial(dial.number()));
    }

    // ========================
    // Panic button
    // ========================

    pub fn panic_press(&mut self) {
        self.panic.press(self.emergency_active);
    }

    pub fn panic_release(&mut self) {
        self.panic.release();
    }

    fn panic_hold_elapsed(&mut self, press_id: u64) {
        if !self.panic.complete(press_id) {
            return;
        }
        self.trigger_emergency();

        let message = format!("EMERGENCY ALERT - Location: {}", self.location_string());
        tracing::info!(%message, "PANIC ALERT TRIGGERED");
        self.log_activity(ActivityKind::Emergency, message.clone());

        if self.config.share_enabled {
            self.launch(Intent::Share {
                title: "EMERGENCY ALERT".to_string(),
                text: message,
                url: self.location.map(map_link),
            });
        }
    }

    // ========================
    // Voice commands
    // ========================

    pub fn toggle_listening(&mut self) {
        if !self.voice.supported {
            self.status = Some("Voice commands not supported in this terminal".to_string());
            return;
        }
        self.voice.listening = !self.voice.listening;
        if self.voice.listening {
            self.start_editing(EditTarget::Transcript);
        } else {
            self.voice.input.clear();
            if self.edit_target == Some(EditTarget::Transcript) {
                self.stop_editing();
            }
        }
    }

    pub fn edit_transcript(&mut self) {
        if self.voice.listening {
            self.start_editing(EditTarget::Transcript);
        }
    }

    fn submit_transcript(&mut self) {
        let transcript = self.voice.input.trim().to_string();
        self.voice.input.clear();
        if transcript.is_empty() {
            return;
        }
        self.voice.last_transcript = Some(transcript.clone());
        self.execute_voice_command(&transcript);
    }

    /// Match a finalized transcript against the command table
    pub fn execute_voice_command(&mut self, transcript: &str) -> bool {
        let Some(cmd) = voice::match_command(transcript) else {
            tracing::debug!(%transcript, "No voice command matched");
            return false;
        };

        self.voice.last_command = Some(cmd.service.to_string());
        self.trigger_emergency();

        let coordinates = self.location.map(|l| l.to_pair());
        tracing::info!(
            service = cmd.service,
            location = %self.location_string(),
            coordinates = ?coordinates,
            "Emergency call triggered"
        );
        self.log_activity(
            ActivityKind::Emergency,
            format!("Calling {} with your location", cmd.service),
        );
        self.launch(Intent::dial(cmd.number));
        true
    }

    // ========================
    // Security companies
    // ========================

    pub fn call_company(&mut self) {
        let Some(company) = self.companies.get(self.selected_company).cloned() else {
            return;
        };
        tracing::info!("Calling {} with location data", company.name);
        self.launch(Intent::dial(company.phone));
    }

    // ========================
    // Contacts
    // ========================

    pub fn open_contact_form(&mut self) {
        self.contact_form = Some(EmergencyContact::default());
        self.start_editing(EditTarget::Contact(ContactField::Name));
    }

    fn submit_contact_form(&mut self) {
        let Some(form) = self.contact_form.clone() else {
            return;
        };
        if self.add_contact(form) {
            self.contact_form = None;
            self.stop_editing();
        } else {
            self.status = Some("Name and phone are required".to_string());
        }
    }

    fn cancel_contact_form(&mut self) {
        self.contact_form = None;
        self.stop_editing();
    }

    /// Append a contact; rejects one without name or phone
    pub fn add_contact(&mut self, contact: EmergencyContact) -> bool {
        if !contact.is_complete() {
            return false;
        }
        self.contacts.push(contact);
        self.selected_contact = self.contacts.len() - 1;
        self.persist_contacts();
        true
    }

    pub fn remove_contact(&mut self, index: usize) -> Option<EmergencyContact> {
        if index >= self.contacts.len() {
            return None;
        }
        let removed = self.contacts.remove(index);
        if self.selected_contact >= self.contacts.len() {
            self.selected_contact = self.contacts.len().saturating_sub(1);
        }
        self.persist_contacts();
        Some(removed)
    }

    pub fn remove_selected_contact(&mut self) {
        self.remove_contact(self.selected_contact);
    }

    fn persist_contacts(&mut self) {
        if let Err(e) = self.storage.save_contacts(&self.contacts) {
            tracing::warn!(error = %e, "Failed to persist emergency contacts");
        }
    }

    pub fn call_selected_contact(&mut self) {
        if let Some(contact) = self.contacts.get(self.selected_contact).cloned() {
            self.launch(Intent::dial(contact.phone));
        }
    }

    pub fn message_selected_contact(&mut self) {
        if let Some(contact) = self.contacts.get(self.selected_contact).cloned() {
            let body = format!(
                "Emergency Alert - I need help. My location: {}",
                self.location_string()
            );
            self.launch(Intent::sms(Some(contact.phone), body));
        }
    }

    /// Send the emergency message to every contact. Returns how many were notified.
    pub fn notify_contacts(&mut self) -> usize {
        let location = self.location_string();
        let timestamp = chrono::Local::now().format("%Y/%m/%d, %H:%M:%S");
        let message = format!(
            "EMERGENCY ALERT - {}. I need help! My location: {}. Contact emergency services if you cannot reach me.",
            timestamp, location
        );

        tracing::info!(count = self.contacts.len(), "Notifying emergency contacts");
        for contact in &self.contacts {
            tracing::info!(name = %contact.name, phone = %contact.phone, %message, "Sending emergency message");
        }

        let count = self.contacts.len();
        self.log_activity(
            ActivityKind::Info,
            format!("Emergency message sent to {} contact(s)", count),
        );
        self.notified_at = Some(Instant::now());
        count
    }

    // ========================
    // Medical information
    // ========================

    pub fn edit_medical(&mut self) {
        self.medical_draft = Some(self.medical_info.clone());
        self.start_editing(EditTarget::Medical(self.selected_medical_field));
    }

    fn save_medical_draft(&mut self) {
        if let Some(draft) = self.medical_draft.take() {
            self.update_medical_info(draft);
        }
        self.stop_editing();
    }

    fn cancel_medical_draft(&mut self) {
        self.medical_draft = None;
        self.stop_editing();
    }

    pub fn update_medical_info(&mut self, info: MedicalInfo) {
        self.medical_info = info;
        if let Err(e) = self.storage.save_medical_info(&self.medical_info) {
            tracing::warn!(error = %e, "Failed to persist medical info");
        }
    }

    pub fn call_medical_contact(&mut self) {
        let number = self.medical_info.emergency_medical_contact.trim().to_string();
        if !number.is_empty() {
            self.launch(Intent::dial(number));
        }
    }

    // ========================
    // Breadcrumbs
    // ========================

    pub fn toggle_tracking(&mut self) {
        if self.tracker.is_tracking() {
            self.tracker.stop_tracking();
        } else {
            self.tracker.start_tracking();
        }
    }

    pub fn clear_trail(&mut self) {
        self.tracker.clear_trail();
    }

    pub fn share_trail(&mut self) {
        let shared = self.tracker.share_trail();
        if shared.maps_url.is_empty() {
            self.status = Some("No trail to share yet".to_string());
            return;
        }

        let text = format!("Emergency GPS Trail - Follow my location: {}", shared.maps_url);
        let intent = if self.config.share_enabled {
            Intent::Share {
                title: "Emergency GPS Trail".to_string(),
                text,
                url: Some(shared.maps_url),
            }
        } else {
            Intent::sms(None, text)
        };
        self.launch(intent);
    }

    pub fn navigate_last_point(&mut self) {
        if let Some(last) = self.tracker.last_point() {
            let url = map_link(last.coordinates());
            self.launch(Intent::Open(url));
        }
    }

    // ========================
    // Alerts
    // ========================

    pub fn mark_selected_alert_read(&mut self) {
        let selected = self.selected_alert;
        if let Some(alerts) = self.alerts.as_mut() {
            if let Some(id) = alerts.get(selected).map(|a| a.id.clone()) {
                feeds::mark_as_read(alerts, &id);
            }
        }
    }

    pub fn mark_all_alerts_read(&mut self) {
        if let Some(alerts) = self.alerts.as_mut() {
            feeds::mark_all_as_read(alerts);
        }
    }

    // ========================
    // Service responses
    // ========================

    pub fn handle_response(&mut self, response: ServiceResponse) {
        match response {
            ServiceResponse::Located { at, warning } => {
                self.location = Some(at);
                if let Some(w) = &warning {
                    self.log_activity(ActivityKind::Warning, w.clone());
                }
                self.location_warning = warning;
            }
            ServiceResponse::ContextResolved { context, .. } => {
                self.location_context = context;
            }
            ServiceResponse::AlertsLoaded(alerts) => {
                self.selected_alert = 0;
                self.alerts = Some(alerts);
            }
            ServiceResponse::MessagesLoaded(messages) => {
                self.messages = Some(messages);
            }
            ServiceResponse::IntentLaunched { description, uri } => {
                self.log_activity(ActivityKind::Intent, format!("{} ({})", description, uri));
            }
            ServiceResponse::IntentFailed { description, error } => {
                self.log_activity(ActivityKind::Warning, format!("{} failed: {}", description, error));
            }
            ServiceResponse::BreadcrumbRecorded(point) => {
                self.tracker.record(point);
            }
            ServiceResponse::PanicHoldElapsed { press_id } => {
                self.panic_hold_elapsed(press_id);
            }
        }
    }
}

/// Move a list selection by one, wrapping at the ends
fn step(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        current.checked_sub(1).unwrap_or(len - 1).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geocode::MockRadar;
    use crate::location::FixedLocation;
    use crate::models::{BreadcrumbPoint, Coordinates};
    use crate::storage::Storage;
    use crate::tracker::Sampler;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn state() -> (AppState, mpsc::UnboundedReceiver<ServiceResponse>) {
        state_with(Config::default())
    }

    fn state_with(config: Config) -> (AppState, mpsc::UnboundedReceiver<ServiceResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sampler = Sampler {
            source: Arc::new(FixedLocation(Coordinates::fallback())),
            geocoder: Arc::new(MockRadar::with_delay(Duration::ZERO)),
            fallback: Coordinates::fallback(),
        };
        (AppState::new(config, Storage::in_memory(), sampler, tx), rx)
    }

    fn launched(state: &mut AppState) -> Vec<Intent> {
        state
            .take_commands()
            .into_iter()
            .filter_map(|c| match c {
                ServiceCommand::Launch(intent) => Some(intent),
                _ => None,
            })
            .collect()
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[tokio::test]
    async fn test_login_with_demo_credentials() {
        let (mut state, _rx) = state();
        assert!(!state.authenticated);
        assert_eq!(state.edit_target, Some(EditTarget::LoginUsername));

        type_text(&mut state, "demo");
        state.next_field();
        type_text(&mut state, "wrong");
        state.submit_input();
        assert!(!state.authenticated);
        assert_eq!(
            state.login.error.as_deref(),
            Some("Invalid credentials. Use demo/demo123")
        );

        state.login.password.clear();
        type_text(&mut state, "demo123");
        state.submit_input();
        assert!(state.authenticated);
        assert!(state.storage.load_authenticated());
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn test_logout_clears_persisted_flag() {
        let (mut state, _rx) = state();
        state.demo_login();
        state.logout();
        assert!(!state.authenticated);
        assert!(!state.storage.load_authenticated());
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let (mut state, _rx) = state();
        assert_eq!(state.theme_preference, ThemePreference::System);
        state.toggle_theme();
        assert_eq!(state.theme_preference, ThemePreference::Light);
        assert_eq!(state.storage.load_theme(), ThemePreference::Light);
    }

    #[tokio::test]
    async fn test_voice_match_triggers_emergency_and_dials() {
        let (mut state, _rx) = state();
        assert!(state.execute_voice_command("please call the police now"));
        assert!(state.emergency_active);
        assert!(state.tracker.is_tracking());
        assert_eq!(state.voice.last_command.as_deref(), Some("Police"));
        assert_eq!(launched(&mut state), vec![Intent::dial("10111")]);
    }

    #[tokio::test]
    async fn test_unmatched_transcript_does_nothing() {
        let (mut state, _rx) = state();
        assert!(!state.execute_voice_command("good morning"));
        assert!(!state.emergency_active);
        assert!(launched(&mut state).is_empty());
    }

    #[tokio::test]
    async fn test_voice_unsupported_is_passive() {
        let config = Config {
            voice_enabled: false,
            ..Config::default()
        };
        let (mut state, _rx) = state_with(config);
        state.toggle_listening();
        assert!(!state.voice.listening);
        assert_eq!(
            state.status.as_deref(),
            Some("Voice commands not supported in this terminal")
        );
    }

    #[tokio::test]
    async fn test_typed_transcript_is_finalized_on_submit() {
        let (mut state, _rx) = state();
        state.demo_login();
        state.toggle_listening();
        type_text(&mut state, "Call Ambulance");
        state.submit_input();
        assert_eq!(state.voice.last_transcript.as_deref(), Some("Call Ambulance"));
        assert_eq!(state.voice.last_command.as_deref(), Some("Ambulance"));
        assert!(state.voice.input.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_hold_triggers_share() {
        let (mut state, mut rx) = state();
        state.location = Some(Coordinates::fallback());
        state.panic_press();
        tokio::time::sleep(Duration::from_millis(3100)).await;

        while let Ok(msg) = rx.try_recv() {
            state.handle_response(msg);
        }
        assert!(state.emergency_active);
        match &launched(&mut state)[..] {
            [Intent::Share { title, text, url }] => {
                assert_eq!(title, "EMERGENCY ALERT");
                assert_eq!(text, "EMERGENCY ALERT - Location: Mondeor, Johannesburg");
                assert_eq!(url.as_deref(), Some("https://maps.google.com/?q=-26.2785,27.9867"));
            }
            other => panic!("unexpected intents {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_contacts_add_remove_persist() {
        let (mut state, _rx) = state();
        assert!(!state.add_contact(EmergencyContact::new("", "123", "")));
        assert!(state.add_contact(EmergencyContact::new("Mom", "+27821234567", "Mother")));
        assert!(state.add_contact(EmergencyContact::new("Sam", "+27827654321", "Friend")));
        assert_eq!(state.storage.load_contacts().len(), 2);

        let removed = state.remove_contact(0).unwrap();
        assert_eq!(removed.name, "Mom");
        assert_eq!(state.storage.load_contacts()[0].name, "Sam");
        assert!(state.remove_contact(5).is_none());
    }

    #[tokio::test]
    async fn test_contact_form_requires_name_and_phone() {
        let (mut state, _rx) = state();
        state.demo_login();
        state.open_contact_form();
        type_text(&mut state, "Mom");
        state.submit_input();
        assert!(state.contacts.is_empty());
        assert!(state.contact_form.is_some());

        state.next_field();
        type_text(&mut state, "+27821234567");
        state.submit_input();
        assert_eq!(state.contacts.len(), 1);
        assert!(state.contact_form.is_none());
    }

    #[tokio::test]
    async fn test_notify_contacts() {
        let (mut state, _rx) = state();
        state.add_contact(EmergencyContact::new("Mom", "+27821234567", "Mother"));
        assert_eq!(state.notify_contacts(), 1);
        assert!(state.to_render_state(crate::models::Theme::Dark).notifications_sent);
    }

    #[tokio::test]
    async fn test_medical_draft_save_and_cancel() {
        let (mut state, _rx) = state();
        state.demo_login();
        state.edit_medical();
        type_text(&mut state, "O+");
        state.cancel_input();
        assert!(state.medical_info.blood_type.is_empty());

        state.edit_medical();
        type_text(&mut state, "O+");
        state.next_field();
        type_text(&mut state, "Penicillin");
        state.submit_input();
        assert_eq!(state.medical_info.blood_type, "O+");
        assert_eq!(state.medical_info.allergies, "Penicillin");
        assert_eq!(state.storage.load_medical_info().allergies, "Penicillin");
    }

    #[tokio::test]
    async fn test_share_trail_falls_back_to_sms() {
        let config = Config {
            share_enabled: false,
            ..Config::default()
        };
        let (mut state, _rx) = state_with(config);
        state.share_trail();
        assert!(launched(&mut state).is_empty());

        state.handle_response(ServiceResponse::BreadcrumbRecorded(BreadcrumbPoint::new(
            Coordinates::new(1.0, 2.0),
            None,
        )));
        state.share_trail();
        match &launched(&mut state)[..] {
            [Intent::Sms { number: None, body }] => {
                assert!(body.starts_with("Emergency GPS Trail - Follow my location: https://maps.google.com/maps/dir/1,2/@1,2,15z"));
            }
            other => panic!("unexpected intents {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_quick_dial_and_reset() {
        let (mut state, _rx) = state();
        state.quick_dial(QuickDial::Fire);
        assert!(state.emergency_active);
        assert_eq!(launched(&mut state), vec![Intent::dial("10177")]);
        state.reset_emergency();
        assert!(!state.emergency_active);
        // Trail keeps running after reset
        assert!(state.tracker.is_tracking());
    }

    #[tokio::test]
    async fn test_alerts_mark_read() {
        let (mut state, _rx) = state();
        state.handle_response(ServiceResponse::AlertsLoaded(feeds::security_alerts()));
        state.mark_selected_alert_read();
        assert_eq!(feeds::unread_count(state.alerts.as_ref().unwrap()), 1);
        state.mark_all_alerts_read();
        assert_eq!(state.to_render_state(crate::models::Theme::Light).unread_alerts(), 0);
    }

    #[tokio::test]
    async fn test_location_string() {
        let (mut state, _rx) = state();
        assert_eq!(state.location_string(), "Location unavailable");
        state.handle_response(ServiceResponse::Located {
            at: Coordinates::new(-33.9, 18.4),
            warning: None,
        });
        assert_eq!(state.location_string(), "Mondeor, Johannesburg");
    }

    #[tokio::test]
    async fn test_activity_log_keeps_newest_entries() {
        let (mut state, _rx) = state();
        for i in 0..105 {
            state.log_activity(ActivityKind::Info, format!("entry {}", i));
        }
        assert_eq!(state.activity.len(), 100);
        assert_eq!(state.activity.front().unwrap().content, "entry 5");
        assert_eq!(state.activity.back().unwrap().content, "entry 104");

        let rendered = state.to_render_state(crate::models::Theme::Dark);
        assert_eq!(rendered.activity.first().unwrap().content, "entry 5");
    }

    #[test]
    fn test_step_wraps() {
        assert_eq!(step(2, 3, true), 0);
        assert_eq!(step(0, 3, false), 2);
        assert_eq!(step(0, 0, true), 0);
    }
}
