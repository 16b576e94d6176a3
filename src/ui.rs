use ratatui::{prelude::*, widgets::*};

use crate::models::{Priority, Severity, Theme};

/// Colors for one theme
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub danger: Color,
    pub success: Color,
    pub warning: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                danger: Color::Red,
                success: Color::Green,
                warning: Color::Yellow,
                highlight: Color::Yellow,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                danger: Color::Red,
                success: Color::Green,
                warning: Color::Magenta,
                highlight: Color::Blue,
            },
        }
    }
}

/// Terminal theme from `COLORFGBG` ("fg;bg"); dark when unknown
pub fn detect_system_theme() -> Theme {
    theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn theme_from_colorfgbg(value: Option<&str>) -> Theme {
    let bg = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match bg {
        // 7 and 15 are the light greys/whites of the 16-color palette
        Some(7) | Some(15) => Theme::Light,
        _ => Theme::Dark,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::LightRed,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Gray,
    }
}

/// Panic panel text; while held it says how to cancel, since terminals
/// without release events only end a hold on another key
pub fn panic_label(emergency_active: bool, pressing: bool) -> &'static str {
    if emergency_active {
        "EMERGENCY ACTIVE\nHelp is on the way. Press r to reset."
    } else if pressing {
        "HOLDING...\nPress any key to cancel"
    } else {
        "PANIC BUTTON\nHold p for 3 seconds"
    }
}

/// Renders tabs
pub fn render_tabs<'a>(titles: Vec<Line<'a>>, selected: usize, palette: Palette) -> Tabs<'a> {
    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(palette.muted))
        .highlight_style(Style::default().fg(palette.highlight).bold())
        .divider("|")
}

/// Renders a labeled text field; the focused one shows a cursor
pub fn render_field<'a>(label: &'a str, value: &str, focused: bool, palette: Palette) -> Paragraph<'a> {
    let style = if focused {
        Style::default().fg(palette.highlight)
    } else {
        Style::default().fg(palette.muted)
    };
    let content = if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    };

    Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(label),
    )
}

/// Centered rect inside `area` using percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_light_background() {
        assert_eq!(theme_from_colorfgbg(Some("0;15")), Theme::Light);
        assert_eq!(theme_from_colorfgbg(Some("0;default;7")), Theme::Light);
    }

    #[test]
    fn test_colorfgbg_defaults_to_dark() {
        assert_eq!(theme_from_colorfgbg(Some("15;0")), Theme::Dark);
        assert_eq!(theme_from_colorfgbg(Some("garbage")), Theme::Dark);
        assert_eq!(theme_from_colorfgbg(None), Theme::Dark);
    }

    #[test]
    fn test_panic_label_shows_cancel_hint_while_held() {
        assert!(panic_label(false, true).contains("Press any key to cancel"));
        assert!(!panic_label(false, false).contains("cancel"));
        assert!(panic_label(true, false).starts_with("EMERGENCY ACTIVE"));
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, area);
        assert!(inner.width <= 60 && inner.height <= 20);
        assert!(inner.x >= 20);
    }
}
