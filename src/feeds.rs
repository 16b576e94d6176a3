//! Compiled-in data: security company directory, alert and message feeds,
//! and the demo user profile

use crate::models::{
    Priority, SecurityAlert, SecurityCompany, SecurityMessage, Severity, UserProfile,
};

pub fn security_companies() -> Vec<SecurityCompany> {
    vec![
        company("Mondeor Security", "+27118349555", "Mondeor", "5-8 min", "1.2 km"),
        company("Southdale Patrol", "+27119424700", "Southdale", "8-12 min", "2.5 km"),
        company(
            "ADT Johannesburg South",
            "+27860238238",
            "Johannesburg South",
            "10-15 min",
            "3.8 km",
        ),
    ]
}

fn company(name: &str, phone: &str, area: &str, response_time: &str, distance: &str) -> SecurityCompany {
    SecurityCompany {
        name: name.to_string(),
        phone: phone.to_string(),
        area: area.to_string(),
        response_time: response_time.to_string(),
        distance: distance.to_string(),
    }
}

pub fn security_alerts() -> Vec<SecurityAlert> {
    vec![
        SecurityAlert {
            id: "1".into(),
            title: "Break-in Alert".into(),
            description: "Attempted break-in reported on Maple Street. Suspect fled the scene when alarm activated. Police have been notified.".into(),
            severity: Severity::Critical,
            timestamp: "15 minutes ago".into(),
            location: "Maple Street".into(),
            source: "Eagle Security".into(),
            read: false,
            action_required: Some("Check your security systems and ensure all doors/windows are locked".into()),
        },
        SecurityAlert {
            id: "2".into(),
            title: "Suspicious Vehicle".into(),
            description: "White sedan with no license plates spotted circling the neighborhood. Vehicle last seen heading towards Valley Road.".into(),
            severity: Severity::High,
            timestamp: "1 hour ago".into(),
            location: "Pine Avenue".into(),
            source: "Community Watch".into(),
            read: false,
            action_required: Some("Report if vehicle is spotted again".into()),
        },
        SecurityAlert {
            id: "3".into(),
            title: "Power Outage Alert".into(),
            description: "Planned electricity maintenance will affect blocks 5-8 tomorrow from 9 AM to 2 PM. Ensure backup security systems are functioning.".into(),
            severity: Severity::Medium,
            timestamp: "3 hours ago".into(),
            location: "Blocks 5-8".into(),
            source: "City Power".into(),
            read: true,
            action_required: None,
        },
        SecurityAlert {
            id: "4".into(),
            title: "Security Patrol Update".into(),
            description: "Additional security patrols have been deployed in response to recent incidents. Expect increased visibility over the weekend.".into(),
            severity: Severity::Low,
            timestamp: "5 hours ago".into(),
            location: "Mondeor Area".into(),
            source: "Eagle Security".into(),
            read: true,
            action_required: None,
        },
    ]
}

pub fn security_messages() -> Vec<SecurityMessage> {
    vec![
        message(
            "1",
            "Eagle Security Services",
            "Increased patrols in the Mondeor area following recent incidents. All residents advised to ensure gates and security systems are activated.",
            "2 hours ago",
            "Mondeor Central",
            Priority::High,
            true,
        ),
        message(
            "2",
            "Guardian Protection",
            "Weekly security update: 3 suspicious vehicle incidents reported on Main Road. Please report any unusual activity immediately.",
            "4 hours ago",
            "Main Road",
            Priority::Medium,
            false,
        ),
        message(
            "3",
            "Metro Police",
            "Road closure on Klip River Drive due to ongoing investigation. Alternative routes via Valley Road recommended.",
            "6 hours ago",
            "Klip River Drive",
            Priority::Medium,
            false,
        ),
        message(
            "4",
            "Eagle Security Services",
            "All clear: Earlier security alert has been resolved. Thank you for your cooperation and vigilance.",
            "8 hours ago",
            "Mondeor South",
            Priority::Low,
            false,
        ),
        message(
            "5",
            "Community Watch",
            "Monthly community meeting scheduled for this Saturday 10 AM at the community center. Security updates and safety tips will be discussed.",
            "12 hours ago",
            "Community Center",
            Priority::Low,
            false,
        ),
    ]
}

fn message(
    id: &str,
    company: &str,
    content: &str,
    timestamp: &str,
    location: &str,
    priority: Priority,
    action_required: bool,
) -> SecurityMessage {
    SecurityMessage {
        id: id.to_string(),
        company: company.to_string(),
        content: content.to_string(),
        timestamp: timestamp.to_string(),
        location: location.to_string(),
        priority,
        action_required,
    }
}

pub fn demo_profile() -> UserProfile {
    UserProfile {
        id: "user-1".into(),
        full_name: "Demo Resident".into(),
        email: "demo@emergency-hub.local".into(),
        location: Some("Mondeor, Johannesburg".into()),
        security_provider: Some("Eagle Security Services".into()),
    }
}

/// Number of alerts not yet read
pub fn unread_count(alerts: &[SecurityAlert]) -> usize {
    alerts.iter().filter(|a| !a.read).count()
}

/// Mark one alert read; returns false for an unknown id
pub fn mark_as_read(alerts: &mut [SecurityAlert], id: &str) -> bool {
    match alerts.iter_mut().find(|a| a.id == id) {
        Some(alert) => {
            alert.read = true;
            true
        }
        None => false,
    }
}

pub fn mark_all_as_read(alerts: &mut [SecurityAlert]) {
    for alert in alerts.iter_mut() {
        alert.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_has_three_companies() {
        let companies = security_companies();
        assert_eq!(companies.len(), 3);
        assert_eq!(companies[0].name, "Mondeor Security");
        assert_eq!(companies[2].phone, "+27860238238");
    }

    #[test]
    fn test_unread_and_mark_as_read() {
        let mut alerts = security_alerts();
        assert_eq!(unread_count(&alerts), 2);
        assert!(mark_as_read(&mut alerts, "1"));
        assert_eq!(unread_count(&alerts), 1);
        assert!(!mark_as_read(&mut alerts, "99"));
        mark_all_as_read(&mut alerts);
        assert_eq!(unread_count(&alerts), 0);
    }

    #[test]
    fn test_message_feed_order() {
        let messages = security_messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].priority, Priority::High);
        assert!(messages[0].action_required);
    }
}
