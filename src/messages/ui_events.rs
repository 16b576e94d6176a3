//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::constants::{AMBULANCE_NUMBER, FIRE_NUMBER, POLICE_NUMBER};
use crate::models::MedicalField;

/// Application tabs
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AppTab {
    #[default]
    Emergency,
    Medical,
    Contacts,
    Track,
    Alerts,
}

impl AppTab {
    pub const ALL: [AppTab; 5] = [
        AppTab::Emergency,
        AppTab::Medical,
        AppTab::Contacts,
        AppTab::Track,
        AppTab::Alerts,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Emergency => "Emergency",
            AppTab::Medical => "Medical",
            AppTab::Contacts => "Contacts",
            AppTab::Track => "Track",
            AppTab::Alerts => "Alerts",
        }
    }

    pub fn index(&self) -> usize {
        AppTab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> AppTab {
        AppTab::ALL[(self.index() + 1) % AppTab::ALL.len()]
    }

    pub fn prev(&self) -> AppTab {
        AppTab::ALL[(self.index() + AppTab::ALL.len() - 1) % AppTab::ALL.len()]
    }
}

/// Quick emergency dial buttons
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuickDial {
    Police,
    Medical,
    Fire,
}

impl QuickDial {
    pub fn number(&self) -> &'static str {
        match self {
            QuickDial::Police => POLICE_NUMBER,
            QuickDial::Medical => AMBULANCE_NUMBER,
            QuickDial::Fire => FIRE_NUMBER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickDial::Police => "Police",
            QuickDial::Medical => "Medical",
            QuickDial::Fire => "Fire",
        }
    }
}

/// Fields of the add-contact form
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ContactField {
    Name,
    Phone,
    Relationship,
}

impl ContactField {
    pub fn next(&self) -> ContactField {
        match self {
            ContactField::Name => ContactField::Phone,
            ContactField::Phone => ContactField::Relationship,
            ContactField::Relationship => ContactField::Name,
        }
    }
}

/// Which text buffer receives typed characters
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditTarget {
    LoginUsername,
    LoginPassword,
    Transcript,
    Contact(ContactField),
    Medical(MedicalField),
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),
    NextTab,
    PrevTab,
    SelectNext,
    SelectPrev,

    // Text input
    CharInput(char),
    Backspace,
    NextField,
    SubmitInput,
    CancelInput,

    // Login
    DemoLogin,
    Logout,

    // Emergency
    PanicPress,
    PanicRelease,
    ToggleListening,
    EditTranscript,
    QuickDial(QuickDial),
    CallCompany,
    ResetEmergency,

    // Medical
    EditMedical,
    CallMedicalContact,

    // Contacts
    OpenContactForm,
    RemoveContact,
    CallContact,
    MessageContact,
    NotifyContacts,

    // Breadcrumbs
    ToggleTracking,
    ClearTrail,
    ShareTrail,
    NavigateLastPoint,

    // Alerts
    MarkAlertRead,
    MarkAllRead,

    // Popups and preferences
    ToggleTheme,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// The slice of render state that decides how a key is interpreted
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub authenticated: bool,
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub panic_pressing: bool,
}

/// Panic press the App layer has not rendered yet
///
/// Render states lag behind sent events, so a key that follows a press
/// within the same poll window would see `panic_pressing == false`. The
/// latch keeps the hold visible until the App layer reports that it has
/// handled the press.
#[derive(Debug, Default)]
pub struct PanicLatch {
    sent: u64,
    pending_press: Option<u64>,
}

impl PanicLatch {
    /// Key context for the next key, given how many events the App layer has handled
    pub fn context(&mut self, mut ctx: KeyContext, events_handled: u64) -> KeyContext {
        if let Some(seq) = self.pending_press {
            if events_handled >= seq {
                self.pending_press = None;
            } else {
                ctx.panic_pressing = true;
            }
        }
        ctx
    }

    /// Record an event sent to the App layer
    pub fn sent(&mut self, event: &UiEvent) {
        self.sent += 1;
        match event {
            UiEvent::PanicPress => self.pending_press = Some(self.sent),
            UiEvent::PanicRelease => self.pending_press = None,
            _ => {}
        }
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    // Releasing 'p' always ends a hold; the context may predate the press
    if key.kind == KeyEventKind::Release && key.code == KeyCode::Char('p') {
        return Some(UiEvent::PanicRelease);
    }

    // A held panic button ends on any other key
    if ctx.panic_pressing {
        return match (key.kind, key.code) {
            (KeyEventKind::Repeat, KeyCode::Char('p')) => None,
            (KeyEventKind::Press, KeyCode::Char('p')) => None,
            (KeyEventKind::Release, _) => None,
            _ => Some(UiEvent::PanicRelease),
        };
    }

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('d') if !ctx.authenticated => return Some(UiEvent::DemoLogin),
            _ => {}
        }
    }

    if !ctx.authenticated {
        return handle_editing_keys(key);
    }

    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.input_mode == InputMode::Editing {
        return handle_editing_keys(key);
    }

    // Global shortcuts in normal mode
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('t') => return Some(UiEvent::ToggleTheme),
        KeyCode::Char('L') => return Some(UiEvent::Logout),
        KeyCode::Tab => return Some(UiEvent::NextTab),
        KeyCode::BackTab => return Some(UiEvent::PrevTab),
        KeyCode::Up => return Some(UiEvent::SelectPrev),
        KeyCode::Down => return Some(UiEvent::SelectNext),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            return Some(UiEvent::SwitchTab(AppTab::ALL[index]));
        }
        _ => {}
    }

    match ctx.active_tab {
        AppTab::Emergency => handle_emergency_keys(key),
        AppTab::Medical => handle_medical_keys(key),
        AppTab::Contacts => handle_contacts_keys(key),
        AppTab::Track => handle_track_keys(key),
        AppTab::Alerts => handle_alerts_keys(key),
    }
}

fn handle_editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CancelInput),
        KeyCode::Enter => Some(UiEvent::SubmitInput),
        KeyCode::Tab => Some(UiEvent::NextField),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_emergency_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('p') => Some(UiEvent::PanicPress),
        KeyCode::Char('v') => Some(UiEvent::ToggleListening),
        KeyCode::Char('e') => Some(UiEvent::EditTranscript),
        KeyCode::Char('o') => Some(UiEvent::QuickDial(QuickDial::Police)),
        KeyCode::Char('m') => Some(UiEvent::QuickDial(QuickDial::Medical)),
        KeyCode::Char('f') => Some(UiEvent::QuickDial(QuickDial::Fire)),
        KeyCode::Char('c') | KeyCode::Enter => Some(UiEvent::CallCompany),
        KeyCode::Char('r') => Some(UiEvent::ResetEmergency),
        _ => None,
    }
}

fn handle_medical_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditMedical),
        KeyCode::Char('c') => Some(UiEvent::CallMedicalContact),
        _ => None,
    }
}

fn handle_contacts_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('a') => Some(UiEvent::OpenContactForm),
        KeyCode::Char('d') => Some(UiEvent::RemoveContact),
        KeyCode::Char('c') | KeyCode::Enter => Some(UiEvent::CallContact),
        KeyCode::Char('s') => Some(UiEvent::MessageContact),
        KeyCode::Char('n') => Some(UiEvent::NotifyContacts),
        _ => None,
    }
}

fn handle_track_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('s') | KeyCode::Enter => Some(UiEvent::ToggleTracking),
        KeyCode::Char('x') => Some(UiEvent::ClearTrail),
        KeyCode::Char('h') => Some(UiEvent::ShareTrail),
        KeyCode::Char('g') => Some(UiEvent::NavigateLastPoint),
        _ => None,
    }
}

fn handle_alerts_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => Some(UiEvent::MarkAlertRead),
        KeyCode::Char('a') => Some(UiEvent::MarkAllRead),
        _ => None,
    }
}
