//! App state - the single owner of application data
//!
//! Besides plain data this holds the two timers that feed it (panic hold and
//! breadcrumb cadence). Work for the Service layer is queued in `outbox` and
//! drained by the actor after every event.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::constants::{LOCATION_UNAVAILABLE, NOTIFY_CONFIRMATION};
use crate::feeds;
use crate::geocode::LocationContext;
use crate::messages::ui_events::{AppTab, ContactField, EditTarget, InputMode};
use crate::messages::{RenderState, ServiceCommand, ServiceResponse};
use crate::models::{
    Coordinates, EmergencyContact, MedicalField, MedicalInfo, SecurityAlert, SecurityCompany,
    SecurityMessage, Theme, ThemePreference, UserProfile,
};
use crate::panic::PanicButton;
use crate::storage::Storage;
use crate::tracker::{BreadcrumbTracker, Sampler};

/// Kind of activity log line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Emergency,
    Intent,
    Info,
    Warning,
}

/// A line in the activity log
#[derive(Clone, Debug)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

/// Login form
#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

/// Voice command panel
#[derive(Clone, Debug, Default)]
pub struct VoiceState {
    pub supported: bool,
    pub listening: bool,
    /// Phrase being typed; submitted as the finalized transcript
    pub input: String,
    pub last_transcript: Option<String>,
    pub last_command: Option<String>,
}

const MAX_ACTIVITY: usize = 100;

/// Main application state
pub struct AppState {
    pub config: Config,
    pub storage: Storage,

    // Session
    pub authenticated: bool,
    pub login: LoginForm,
    pub profile: UserProfile,
    pub theme_preference: ThemePreference,

    // Navigation
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub edit_target: Option<EditTarget>,
    pub show_help: bool,

    // Emergency
    pub emergency_active: bool,
    pub panic: PanicButton,
    pub location: Option<Coordinates>,
    pub location_context: Option<LocationContext>,
    pub location_warning: Option<String>,
    pub voice: VoiceState,
    pub companies: Vec<SecurityCompany>,
    pub selected_company: usize,

    // Contacts
    pub contacts: Vec<EmergencyContact>,
    pub selected_contact: usize,
    pub contact_form: Option<EmergencyContact>,
    pub notified_at: Option<Instant>,

    // Medical
    pub medical_info: MedicalInfo,
    pub medical_draft: Option<MedicalInfo>,
    pub selected_medical_field: MedicalField,

    // Breadcrumbs
    pub tracker: BreadcrumbTracker,

    // Feeds (None until loaded)
    pub alerts: Option<Vec<SecurityAlert>>,
    pub selected_alert: usize,
    pub messages: Option<Vec<SecurityMessage>>,

    // Activity
    pub activity: VecDeque<ActivityEntry>,
    pub status: Option<String>,
    pub events_handled: u64,

    outbox: Vec<ServiceCommand>,
}

impl AppState {
    /// Build state from config and persisted values. Timers post to `events`.
    pub fn new(
        config: Config,
        storage: Storage,
        sampler: Sampler,
        events: mpsc::UnboundedSender<ServiceResponse>,
    ) -> Self {
        let authenticated = storage.load_authenticated();
        let theme_preference = storage.load_theme();
        let contacts = storage.load_contacts();
        let medical_info = storage.load_medical_info();

        let panic = PanicButton::new(config.panic_hold(), events.clone());
        let tracker = BreadcrumbTracker::new(sampler, config.tracking_interval(), events)
            .with_max_waypoints(config.share_waypoints);
        let voice = VoiceState {
            supported: config.voice_enabled,
            ..Default::default()
        };

        let mut state = AppState {
            config,
            storage,
            authenticated,
            login: LoginForm::default(),
            profile: feeds::demo_profile(),
            theme_preference,
            active_tab: AppTab::Emergency,
            input_mode: InputMode::Normal,
            edit_target: None,
            show_help: false,
            emergency_active: false,
            panic,
            location: None,
            location_context: None,
            location_warning: None,
            voice,
            companies: feeds::security_companies(),
            selected_company: 0,
            contacts,
            selected_contact: 0,
            contact_form: None,
            notified_at: None,
            medical_info,
            medical_draft: None,
            selected_medical_field: MedicalField::BloodType,
            tracker,
            alerts: None,
            selected_alert: 0,
            messages: None,
            activity: VecDeque::new(),
            status: None,
            events_handled: 0,
            outbox: Vec::new(),
        };

        if !state.authenticated {
            state.start_editing(EditTarget::LoginUsername);
        }
        state
    }

    /// Queue a command for the Service layer
    pub fn send(&mut self, cmd: ServiceCommand) {
        self.outbox.push(cmd);
    }

    /// Commands queued since the last call
    pub fn take_commands(&mut self) -> Vec<ServiceCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn log_activity(&mut self, kind: ActivityKind, content: impl Into<String>) {
        if self.activity.len() >= MAX_ACTIVITY {
            self.activity.pop_front();
        }
        self.activity.push_back(ActivityEntry {
            kind,
            content: content.into(),
            timestamp: Local::now(),
        });
    }

    /// Location string used in messages and headers
    pub fn location_string(&self) -> String {
        match (&self.location, &self.location_context) {
            (None, _) => LOCATION_UNAVAILABLE.to_string(),
            (Some(_), Some(ctx)) => ctx.display_name(),
            (Some(_), None) => LocationContext::default().display_name(),
        }
    }

    /// Text buffer currently receiving input
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.edit_target? {
            EditTarget::LoginUsername => Some(&mut self.login.username),
            EditTarget::LoginPassword => Some(&mut self.login.password),
            EditTarget::Transcript => Some(&mut self.voice.input),
            EditTarget::Contact(field) => self.contact_form.as_mut().map(|c| match field {
                ContactField::Name => &mut c.name,
                ContactField::Phone => &mut c.phone,
                ContactField::Relationship => &mut c.relationship,
            }),
            EditTarget::Medical(field) => self.medical_draft.as_mut().map(|d| d.field_mut(field)),
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self, system_theme: Theme) -> RenderState {
        RenderState {
            authenticated: self.authenticated,
            login_username: self.login.username.clone(),
            login_password_len: self.login.password.chars().count(),
            login_error: self.login.error.clone(),
            profile: self.profile.clone(),
            theme: self.theme_preference.resolve(system_theme),
            theme_preference: self.theme_preference,
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            edit_target: self.edit_target,
            show_help: self.show_help,
            emergency_active: self.emergency_active,
            panic_pressing: self.panic.is_pressing(),
            location: self.location,
            location_string: self.location_string(),
            location_warning: self.location_warning.clone(),
            voice_supported: self.voice.supported,
            listening: self.voice.listening,
            transcript_input: self.voice.input.clone(),
            last_transcript: self.voice.last_transcript.clone(),
            last_command: self.voice.last_command.clone(),
            companies: self.companies.clone(),
            selected_company: self.selected_company,
            contacts: self.contacts.clone(),
            selected_contact: self.selected_contact,
            contact_form: self.contact_form.clone(),
            notifications_sent: self
                .notified_at
                .map(|at| at.elapsed() < NOTIFY_CONFIRMATION)
                .unwrap_or(false),
            medical_info: self.medical_info.clone(),
            medical_draft: self.medical_draft.clone(),
            selected_medical_field: self.selected_medical_field,
            tracking: self.tracker.is_tracking(),
            breadcrumbs: self.tracker.trail().to_vec(),
            alerts: self.alerts.clone(),
            selected_alert: self.selected_alert,
            messages: self.messages.clone(),
            activity: self.activity.iter().cloned().collect(),
            status: self.status.clone(),
            events_handled: self.events_handled,
        }
    }
}
