use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_LAT, FALLBACK_LNG};

/// A latitude/longitude pair in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinates { lat, lng }
    }

    /// The fixed coordinate substituted when no fix is available
    pub fn fallback() -> Self {
        Coordinates::new(FALLBACK_LAT, FALLBACK_LNG)
    }

    /// `lat,lng` as used in map links
    pub fn to_pair(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// A person to reach during an emergency
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

impl EmergencyContact {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        EmergencyContact {
            name: name.into(),
            phone: phone.into(),
            relationship: relationship.into(),
        }
    }

    /// Name and phone are required by the add form
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }
}

/// The user's medical record, a single document rather than a collection
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInfo {
    pub blood_type: String,
    pub allergies: String,
    pub conditions: String,
    pub medications: String,
    pub emergency_medical_contact: String,
}

/// Editable fields of [`MedicalInfo`], in form order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MedicalField {
    BloodType,
    Allergies,
    Conditions,
    Medications,
    EmergencyMedicalContact,
}

impl MedicalField {
    pub const ALL: [MedicalField; 5] = [
        MedicalField::BloodType,
        MedicalField::Allergies,
        MedicalField::Conditions,
        MedicalField::Medications,
        MedicalField::EmergencyMedicalContact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MedicalField::BloodType => "Blood Type",
            MedicalField::Allergies => "Allergies",
            MedicalField::Conditions => "Medical Conditions",
            MedicalField::Medications => "Current Medications",
            MedicalField::EmergencyMedicalContact => "Emergency Medical Contact",
        }
    }
}

impl MedicalInfo {
    pub fn field(&self, field: MedicalField) -> &str {
        match field {
            MedicalField::BloodType => &self.blood_type,
            MedicalField::Allergies => &self.allergies,
            MedicalField::Conditions => &self.conditions,
            MedicalField::Medications => &self.medications,
            MedicalField::EmergencyMedicalContact => &self.emergency_medical_contact,
        }
    }

    pub fn field_mut(&mut self, field: MedicalField) -> &mut String {
        match field {
            MedicalField::BloodType => &mut self.blood_type,
            MedicalField::Allergies => &mut self.allergies,
            MedicalField::Conditions => &mut self.conditions,
            MedicalField::Medications => &mut self.medications,
            MedicalField::EmergencyMedicalContact => &mut self.emergency_medical_contact,
        }
    }

    pub fn is_empty(&self) -> bool {
        MedicalField::ALL.iter().all(|f| self.field(*f).trim().is_empty())
    }
}

/// One timestamped GPS sample in a location trail
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbPoint {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl BreadcrumbPoint {
    pub fn new(at: Coordinates, address: Option<String>) -> Self {
        BreadcrumbPoint {
            lat: at.lat,
            lng: at.lng,
            timestamp: Utc::now(),
            address,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// A private security provider from the compiled-in directory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCompany {
    pub name: String,
    pub phone: String,
    pub area: String,
    pub response_time: String,
    pub distance: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// An entry in the security alerts feed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Relative label as delivered by the feed ("15 minutes ago")
    pub timestamp: String,
    pub location: String,
    pub source: String,
    pub read: bool,
    pub action_required: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A broadcast from a security company or community group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMessage {
    pub id: String,
    pub company: String,
    pub content: String,
    pub timestamp: String,
    pub location: String,
    pub priority: Priority,
    pub action_required: bool,
}

/// Signed-in user shown in the header
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub location: Option<String>,
    pub security_provider: Option<String>,
}

/// Theme preference as stored; `System` follows the terminal's color scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// A preference with `System` resolved away
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// Unknown values fall back to `System`
    pub fn parse(value: &str) -> ThemePreference {
        match value {
            "light" => ThemePreference::Light,
            "dark" => ThemePreference::Dark,
            _ => ThemePreference::System,
        }
    }

    /// light -> dark -> system -> light
    pub fn next(&self) -> ThemePreference {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => ThemePreference::Light,
        }
    }

    pub fn resolve(&self, system: Theme) -> Theme {
        match self {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::System => system,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medical_info_uses_camel_case_keys() {
        let info = MedicalInfo {
            blood_type: "O+".into(),
            emergency_medical_contact: "+27110000000".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"bloodType\":\"O+\""));
        assert!(json.contains("\"emergencyMedicalContact\""));
    }

    #[test]
    fn test_medical_info_tolerates_missing_fields() {
        let info: MedicalInfo = serde_json::from_str(r#"{"allergies":"penicillin"}"#).unwrap();
        assert_eq!(info.allergies, "penicillin");
        assert!(info.blood_type.is_empty());
    }

    #[test]
    fn test_contact_requires_name_and_phone() {
        assert!(EmergencyContact::new("Mom", "+27821234567", "").is_complete());
        assert!(!EmergencyContact::new("", "+27821234567", "Mother").is_complete());
        assert!(!EmergencyContact::new("Mom", "  ", "Mother").is_complete());
    }

    #[test]
    fn test_theme_cycle() {
        let mut pref = ThemePreference::Light;
        pref = pref.next();
        assert_eq!(pref, ThemePreference::Dark);
        pref = pref.next();
        assert_eq!(pref, ThemePreference::System);
        pref = pref.next();
        assert_eq!(pref, ThemePreference::Light);
    }

    #[test]
    fn test_theme_parse_and_resolve() {
        assert_eq!(ThemePreference::parse("dark"), ThemePreference::Dark);
        assert_eq!(ThemePreference::parse("neon"), ThemePreference::System);
        assert_eq!(ThemePreference::System.resolve(Theme::Dark), Theme::Dark);
        assert_eq!(ThemePreference::Light.resolve(Theme::Dark), Theme::Light);
    }

    #[test]
    fn test_alert_severity_round_trips_lowercase() {
        let json = r#"{"id":"1","title":"t","description":"d","severity":"critical",
            "timestamp":"now","location":"x","source":"s","read":false,"actionRequired":null}"#;
        let alert: SecurityAlert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.severity, Severity::Critical);
        assert!(alert.action_required.is_none());
    }
}
