//! OS intents: dialing, messaging and share sheets
//!
//! The terminal cannot place calls, so the default launcher logs the URI it
//! would have opened and the App layer shows it in the activity log.

use std::fmt::Write;

use crate::models::Coordinates;

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// `tel:<number>`
    Dial(String),
    /// `sms:<number>?body=<text>`; an absent number lets the user pick
    Sms { number: Option<String>, body: String },
    /// Platform share sheet
    Share {
        title: String,
        text: String,
        url: Option<String>,
    },
    /// Open a web link such as a map
    Open(String),
}

impl Intent {
    pub fn dial(number: impl Into<String>) -> Self {
        Intent::Dial(number.into())
    }

    pub fn sms(number: Option<String>, body: impl Into<String>) -> Self {
        Intent::Sms {
            number,
            body: body.into(),
        }
    }

    /// URI handed to the OS
    pub fn to_uri(&self) -> String {
        match self {
            Intent::Dial(number) => format!("tel:{}", number),
            Intent::Sms { number, body } => format!(
                "sms:{}?body={}",
                number.as_deref().unwrap_or(""),
                encode_uri_component(body)
            ),
            Intent::Share { url: Some(url), .. } => url.clone(),
            Intent::Share { text, .. } => text.clone(),
            Intent::Open(url) => url.clone(),
        }
    }

    /// Short description for the activity log
    pub fn describe(&self) -> String {
        match self {
            Intent::Dial(number) => format!("Dial {}", number),
            Intent::Sms {
                number: Some(number),
                ..
            } => format!("SMS to {}", number),
            Intent::Sms { number: None, .. } => "SMS".to_string(),
            Intent::Share { title, .. } => format!("Share \"{}\"", title),
            Intent::Open(_) => "Open map".to_string(),
        }
    }
}

/// Map link centered on a single point
pub fn map_link(at: Coordinates) -> String {
    format!("https://maps.google.com/?q={},{}", at.lat, at.lng)
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

/// Hands intents to the operating system
pub trait IntentLauncher: Send + Sync {
    /// Launch the intent, returning the URI that was opened
    fn launch(&self, intent: &Intent) -> anyhow::Result<String>;
}

/// Logs intents instead of opening them
#[derive(Debug, Default)]
pub struct LogLauncher;

impl IntentLauncher for LogLauncher {
    fn launch(&self, intent: &Intent) -> anyhow::Result<String> {
        let uri = intent.to_uri();
        match intent {
            Intent::Share { title, text, .. } => {
                tracing::info!(%title, %text, %uri, "Share intent");
            }
            _ => tracing::info!(%uri, "Launching intent"),
        }
        Ok(uri)
    }
}
