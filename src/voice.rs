//! Voice emergency commands
//!
//! An ordered phrase table scanned against each finalized transcript.
//! Matching is case-insensitive substring containment and the first entry
//! wins, so "call police" must stay ahead of "police" and an utterance that
//! mentions both police and fire resolves to police.

use crate::constants::{AMBULANCE_NUMBER, FIRE_NUMBER, GENERAL_EMERGENCY_NUMBER, POLICE_NUMBER};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmergencyCommand {
    pub phrase: &'static str,
    pub number: &'static str,
    pub service: &'static str,
}

pub const EMERGENCY_COMMANDS: &[EmergencyCommand] = &[
    EmergencyCommand { phrase: "call police", number: POLICE_NUMBER, service: "Police" },
    EmergencyCommand { phrase: "police", number: POLICE_NUMBER, service: "Police" },
    EmergencyCommand { phrase: "call ambulance", number: AMBULANCE_NUMBER, service: "Ambulance" },
    EmergencyCommand { phrase: "ambulance", number: AMBULANCE_NUMBER, service: "Ambulance" },
    EmergencyCommand { phrase: "call fire", number: FIRE_NUMBER, service: "Fire Department" },
    EmergencyCommand { phrase: "fire department", number: FIRE_NUMBER, service: "Fire Department" },
    EmergencyCommand { phrase: "emergency", number: GENERAL_EMERGENCY_NUMBER, service: "Emergency Services" },
    EmergencyCommand { phrase: "help", number: GENERAL_EMERGENCY_NUMBER, service: "Emergency Services" },
];

/// Phrases advertised in the voice panel
pub const ADVERTISED_PHRASES: [&str; 4] = ["Call police", "Call ambulance", "Call fire", "Emergency"];

/// First table entry contained in `transcript`
pub fn match_command(transcript: &str) -> Option<&'static EmergencyCommand> {
    let lower = transcript.to_lowercase();
    EMERGENCY_COMMANDS
        .iter()
        .find(|cmd| lower.contains(cmd.phrase))
}
