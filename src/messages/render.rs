//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::ActivityEntry;
use crate::messages::ui_events::{AppTab, EditTarget, InputMode, KeyContext};
use crate::models::{
    BreadcrumbPoint, Coordinates, EmergencyContact, MedicalField, MedicalInfo, SecurityAlert,
    SecurityCompany, SecurityMessage, Theme, ThemePreference, UserProfile,
};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Session
    pub authenticated: bool,
    pub login_username: String,
    /// Password length only; the UI renders a mask
    pub login_password_len: usize,
    pub login_error: Option<String>,
    pub profile: UserProfile,

    // Appearance
    pub theme: Theme,
    pub theme_preference: ThemePreference,

    // Navigation
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub edit_target: Option<EditTarget>,
    pub show_help: bool,

    // Emergency
    pub emergency_active: bool,
    pub panic_pressing: bool,
    pub location: Option<Coordinates>,
    pub location_string: String,
    pub location_warning: Option<String>,

    // Voice
    pub voice_supported: bool,
    pub listening: bool,
    pub transcript_input: String,
    pub last_transcript: Option<String>,
    pub last_command: Option<String>,

    // Security companies
    pub companies: Vec<SecurityCompany>,
    pub selected_company: usize,

    // Contacts
    pub contacts: Vec<EmergencyContact>,
    pub selected_contact: usize,
    pub contact_form: Option<EmergencyContact>,
    pub notifications_sent: bool,

    // Medical
    pub medical_info: MedicalInfo,
    pub medical_draft: Option<MedicalInfo>,
    pub selected_medical_field: MedicalField,

    // Breadcrumbs
    pub tracking: bool,
    pub breadcrumbs: Vec<BreadcrumbPoint>,

    // Feeds
    pub alerts: Option<Vec<SecurityAlert>>,
    pub selected_alert: usize,
    pub messages: Option<Vec<SecurityMessage>>,

    // Activity
    pub activity: Vec<ActivityEntry>,
    pub status: Option<String>,

    /// UI events the App layer had handled when this state was produced
    pub events_handled: u64,
}

impl RenderState {
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            authenticated: self.authenticated,
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            show_help: self.show_help,
            panic_pressing: self.panic_pressing,
        }
    }

    pub fn unread_alerts(&self) -> usize {
        self.alerts
            .as_deref()
            .map(crate::feeds::unread_count)
            .unwrap_or(0)
    }
}

impl Default for RenderState {
    fn default() -> Self {
        use crate::constants::LOCATION_UNAVAILABLE;
        RenderState {
            authenticated: false,
            login_username: String::new(),
            login_password_len: 0,
            login_error: None,
            profile: crate::feeds::demo_profile(),
            theme: Theme::Dark,
            theme_preference: ThemePreference::System,
            active_tab: AppTab::Emergency,
            input_mode: InputMode::Editing,
            edit_target: Some(EditTarget::LoginUsername),
            show_help: false,
            emergency_active: false,
            panic_pressing: false,
            location: None,
            location_string: String::from(LOCATION_UNAVAILABLE),
            location_warning: None,
            voice_supported: true,
            listening: false,
            transcript_input: String::new(),
            last_transcript: None,
            last_command: None,
            companies: Vec::new(),
            selected_company: 0,
            contacts: Vec::new(),
            selected_contact: 0,
            contact_form: None,
            notifications_sent: false,
            medical_info: MedicalInfo::default(),
            medical_draft: None,
            selected_medical_field: MedicalField::BloodType,
            tracking: false,
            breadcrumbs: Vec::new(),
            alerts: None,
            selected_alert: 0,
            messages: None,
            activity: Vec::new(),
            status: None,
            events_handled: 0,
        }
    }
}
