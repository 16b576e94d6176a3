//! Emergency Hub - Actor-based emergency response terminal
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Service Layer (Tokio) - location, feeds and OS intents

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use emergency_hub::app::state::ActivityKind;
use emergency_hub::config::{default_data_dir, Config};
use emergency_hub::constants::{APP_NAME, APP_VERSION, LOG_FILE};
use emergency_hub::geocode::MockRadar;
use emergency_hub::intents::LogLauncher;
use emergency_hub::location::source_from_config;
use emergency_hub::messages::ui_events::{
    key_to_ui_event, AppTab, ContactField, EditTarget, InputMode, PanicLatch, QuickDial,
};
use emergency_hub::messages::{RenderState, ServiceCommand, ServiceResponse, UiEvent};
use emergency_hub::models::MedicalField;
use emergency_hub::storage::Storage;
use emergency_hub::tracker::Sampler;
use emergency_hub::ui::{
    centered_rect, panic_label, priority_color, render_field, render_tabs, severity_color,
    Palette,
};
use emergency_hub::voice::ADVERTISED_PHRASES;
use emergency_hub::{AppActor, AppState, Platform, ServiceActor};

/// Terminal cleanup guard
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file in the data directory
    let data_dir = default_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let file_appender = tracing_appender::rolling::never(&data_dir, LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::load_from(&data_dir)?;
    tracing::info!(version = APP_VERSION, data_dir = %config.data_dir.display(), "Starting");

    let storage = Storage::open(&config.data_dir);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    // Release events let the panic button end when the key is let go
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let _guard = TerminalGuard { keyboard_enhanced };

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (svc_cmd_tx, svc_cmd_rx) = mpsc::unbounded_channel::<ServiceCommand>();
    let (svc_resp_tx, svc_resp_rx) = mpsc::unbounded_channel::<ServiceResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Platform capabilities shared by the service actor and the breadcrumb sampler
    let location = source_from_config(&config.gps);
    let geocoder = Arc::new(MockRadar::new());
    let platform = Platform {
        location: location.clone(),
        geocoder: geocoder.clone(),
        launcher: Arc::new(LogLauncher),
        fallback: config.fallback,
    };
    let sampler = Sampler {
        source: location,
        geocoder,
        fallback: config.fallback,
    };

    // Spawn service actor
    let service_actor = ServiceActor::new(platform, svc_resp_tx.clone());
    tokio::spawn(service_actor.run(svc_cmd_rx));

    // Spawn app actor
    let state = AppState::new(config, storage, sampler, svc_resp_tx);
    let app_actor = AppActor::new(state, svc_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, svc_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();
    let mut panic_latch = PanicLatch::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let ctx = panic_latch
                    .context(current_state.key_context(), current_state.events_handled);
                if let Some(event) = key_to_ui_event(key, ctx) {
                    panic_latch.sent(&event);
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();
    let palette = Palette::for_theme(state.theme);

    if !state.authenticated {
        draw_login(f, state, palette, area);
        return;
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(6), // Activity log
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, palette, main_chunks[0]);
    draw_tab_bar(f, state, palette, main_chunks[1]);

    match state.active_tab {
        AppTab::Emergency => draw_emergency_tab(f, state, palette, main_chunks[2]),
        AppTab::Medical => draw_medical_tab(f, state, palette, main_chunks[2]),
        AppTab::Contacts => draw_contacts_tab(f, state, palette, main_chunks[2]),
        AppTab::Track => draw_track_tab(f, state, palette, main_chunks[2]),
        AppTab::Alerts => draw_alerts_tab(f, state, palette, main_chunks[2]),
    }

    draw_activity(f, state, palette, main_chunks[3]);
    draw_status_bar(f, state, palette, main_chunks[4]);

    // Popups
    if state.contact_form.is_some() {
        draw_contact_form(f, state, palette, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_login(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let popup = centered_rect(50, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.danger))
        .title(format!(" {} ", APP_NAME))
        .title_style(Style::default().fg(palette.danger).bold());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let intro = Paragraph::new("Sign in to your emergency dashboard")
        .style(Style::default().fg(palette.fg))
        .alignment(Alignment::Center);
    f.render_widget(intro, chunks[0]);

    let username_focused = state.edit_target == Some(EditTarget::LoginUsername);
    f.render_widget(
        render_field(" Username ", &state.login_username, username_focused, palette),
        chunks[1],
    );
    let mask = "*".repeat(state.login_password_len);
    f.render_widget(
        render_field(" Password ", &mask, !username_focused, palette),
        chunks[2],
    );

    if let Some(error) = &state.login_error {
        let error = Paragraph::new(error.as_str())
            .style(Style::default().fg(palette.danger))
            .alignment(Alignment::Center);
        f.render_widget(error, chunks[3]);
    }

    let hint = Paragraph::new(vec![
        Line::from("Enter: sign in | Tab: next field"),
        Line::from("Ctrl+D: demo login (demo / demo123) | Ctrl+C: quit"),
    ])
    .style(Style::default().fg(palette.muted))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[4]);
}

fn draw_header(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let title_style = if state.emergency_active {
        Style::default().fg(Color::White).bg(palette.danger).bold()
    } else {
        Style::default().fg(palette.danger).bold()
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", APP_NAME), title_style),
        Span::raw("  "),
        Span::styled(state.profile.full_name.clone(), Style::default().fg(palette.fg)),
        Span::styled(" @ ", Style::default().fg(palette.muted)),
        Span::styled(state.location_string.clone(), Style::default().fg(palette.accent)),
    ];
    if state.emergency_active {
        spans.push(Span::styled(
            "  EMERGENCY ACTIVE ",
            Style::default().fg(palette.danger).bold(),
        ));
    }

    let mut lines = vec![Line::from(spans)];
    let detail = match (&state.location_warning, state.location) {
        (Some(warning), _) => Span::styled(warning.clone(), Style::default().fg(palette.warning)),
        (None, Some(at)) => Span::styled(
            format!("{:.4}, {:.4}", at.lat, at.lng),
            Style::default().fg(palette.muted),
        ),
        (None, None) => Span::styled("Locating...", Style::default().fg(palette.muted)),
    };
    lines.push(Line::from(vec![Span::raw(" "), detail]));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.muted));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let titles: Vec<Line> = AppTab::ALL
        .iter()
        .map(|tab| {
            let mut title = format!(" {}:{} ", tab.index() + 1, tab.title());
            if *tab == AppTab::Alerts && state.unread_alerts() > 0 {
                title = format!(" {}:{} ({}) ", tab.index() + 1, tab.title(), state.unread_alerts());
            }
            if *tab == AppTab::Track && state.tracking {
                title.push_str("[*] ");
            }
            Line::from(title)
        })
        .collect();

    f.render_widget(render_tabs(titles, state.active_tab.index(), palette), area);
}

fn draw_emergency_tab(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Panic button
            Constraint::Length(6), // Voice
            Constraint::Min(3),    // Quick dial
        ])
        .split(columns[0]);

    // Panic button
    let style = if state.emergency_active {
        Style::default().fg(Color::White).bg(palette.danger).bold()
    } else if state.panic_pressing {
        Style::default().fg(palette.danger).bold()
    } else {
        Style::default().fg(palette.danger)
    };
    let panic = Paragraph::new(panic_label(state.emergency_active, state.panic_pressing))
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.danger))
                .title(" Panic "),
        );
    f.render_widget(panic, left[0]);

    // Voice commands
    let mut voice_lines = Vec::new();
    if !state.voice_supported {
        voice_lines.push(Line::from(Span::styled(
            "Voice commands not supported in this terminal",
            Style::default().fg(palette.muted),
        )));
    } else if state.listening {
        let editing = state.edit_target == Some(EditTarget::Transcript);
        voice_lines.push(Line::from(vec![
            Span::styled("Listening: ", Style::default().fg(palette.success).bold()),
            Span::raw(state.transcript_input.clone()),
            Span::raw(if editing { "_" } else { "" }),
        ]));
    } else {
        voice_lines.push(Line::from(Span::styled(
            "Press v to start listening",
            Style::default().fg(palette.muted),
        )));
    }
    if let Some(transcript) = &state.last_transcript {
        voice_lines.push(Line::from(format!("Heard: \"{}\"", transcript)));
    }
    if let Some(command) = &state.last_command {
        voice_lines.push(Line::from(Span::styled(
            format!("Calling {}", command),
            Style::default().fg(palette.danger),
        )));
    }
    voice_lines.push(Line::from(Span::styled(
        format!("Say: {}", ADVERTISED_PHRASES.join(", ")),
        Style::default().fg(palette.muted),
    )));
    let voice = Paragraph::new(voice_lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Voice Commands "));
    f.render_widget(voice, left[1]);

    // Quick dial
    let dial_lines: Vec<Line> = [
        ('o', QuickDial::Police),
        ('m', QuickDial::Medical),
        ('f', QuickDial::Fire),
    ]
    .iter()
    .map(|(key, dial)| {
        Line::from(vec![
            Span::styled(format!(" {} ", key), Style::default().fg(palette.highlight).bold()),
            Span::styled(format!("{:<8}", dial.label()), Style::default().fg(palette.fg)),
            Span::styled(dial.number(), Style::default().fg(palette.muted)),
        ])
    })
    .collect();
    let dial = Paragraph::new(dial_lines)
        .block(Block::default().borders(Borders::ALL).title(" Quick Dial "));
    f.render_widget(dial, left[2]);

    // Security companies
    let items: Vec<ListItem> = state
        .companies
        .iter()
        .map(|c| {
            ListItem::new(vec![
                Line::from(Span::styled(c.name.clone(), Style::default().fg(palette.fg).bold())),
                Line::from(Span::styled(
                    format!("  {} | {} | {} away", c.area, c.response_time, c.distance),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Security Companies (c/Enter: call) "),
        )
        .highlight_style(Style::default().fg(palette.highlight))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected_company));
    f.render_stateful_widget(list, columns[1], &mut list_state);
}

fn draw_medical_tab(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let info = state.medical_draft.as_ref().unwrap_or(&state.medical_info);
    let editing_field = match state.edit_target {
        Some(EditTarget::Medical(field)) => Some(field),
        _ => None,
    };

    let lines: Vec<Line> = MedicalField::ALL
        .iter()
        .flat_map(|field| {
            let selected = *field == state.selected_medical_field;
            let editing = editing_field == Some(*field);
            let label_style = if editing || selected {
                Style::default().fg(palette.highlight).bold()
            } else {
                Style::default().fg(palette.accent)
            };
            let value = info.field(*field);
            let value_span = if value.is_empty() && !editing {
                Span::styled("Not provided", Style::default().fg(palette.muted))
            } else {
                Span::styled(
                    format!("{}{}", value, if editing { "_" } else { "" }),
                    Style::default().fg(palette.fg),
                )
            };
            [
                Line::from(Span::styled(
                    format!("{}{}", if selected { "> " } else { "  " }, field.label()),
                    label_style,
                )),
                Line::from(vec![Span::raw("    "), value_span]),
            ]
        })
        .collect();

    let title = if state.medical_draft.is_some() {
        " Medical Information (editing: Tab next, Enter save, Esc cancel) "
    } else {
        " Medical Information (e: edit, c: call medical contact) "
    };
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(panel, area);
}

fn draw_contacts_tab(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Emergency Contacts (a: add, d: delete, c: call, s: sms) ");

    if state.contacts.is_empty() {
        let empty = Paragraph::new("No emergency contacts yet. Press a to add one.")
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = state
            .contacts
            .iter()
            .map(|c| {
                let relationship = if c.relationship.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", c.relationship)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(c.name.clone(), Style::default().fg(palette.fg).bold()),
                    Span::styled(relationship, Style::default().fg(palette.muted)),
                    Span::raw("  "),
                    Span::styled(c.phone.clone(), Style::default().fg(palette.accent)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(palette.highlight))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(state.selected_contact));
        f.render_stateful_widget(list, chunks[0], &mut list_state);
    }

    let notify = if state.notifications_sent {
        Paragraph::new("Emergency notifications sent to all contacts")
            .style(Style::default().fg(palette.success).bold())
    } else {
        Paragraph::new("n: notify all contacts with your location")
            .style(Style::default().fg(palette.muted))
    };
    f.render_widget(notify.block(Block::default().borders(Borders::ALL)), chunks[1]);
}

fn draw_contact_form(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let Some(form) = &state.contact_form else {
        return;
    };
    let popup = centered_rect(50, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add Contact (Tab: next, Enter: save, Esc: cancel) ");
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let focused = |field: ContactField| state.edit_target == Some(EditTarget::Contact(field));
    f.render_widget(
        render_field(" Name ", &form.name, focused(ContactField::Name), palette),
        chunks[0],
    );
    f.render_widget(
        render_field(" Phone ", &form.phone, focused(ContactField::Phone), palette),
        chunks[1],
    );
    f.render_widget(
        render_field(
            " Relationship ",
            &form.relationship,
            focused(ContactField::Relationship),
            palette,
        ),
        chunks[2],
    );
}

fn draw_track_tab(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let status = if state.tracking {
        Span::styled("Tracking active", Style::default().fg(palette.success).bold())
    } else {
        Span::styled("Tracking stopped", Style::default().fg(palette.muted))
    };
    let summary = Paragraph::new(vec![
        Line::from(vec![
            status,
            Span::raw(format!("  {} point(s) recorded", state.breadcrumbs.len())),
        ]),
        Line::from(Span::styled(
            "s: start/stop | x: clear | h: share trail | g: navigate to last point",
            Style::default().fg(palette.muted),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(" GPS Breadcrumbs "));
    f.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = state
        .breadcrumbs
        .iter()
        .rev()
        .map(|p| {
            let time = p.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", time), Style::default().fg(palette.muted)),
                Span::styled(
                    format!("{:.5}, {:.5} ", p.lat, p.lng),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(
                    p.address.clone().unwrap_or_default(),
                    Style::default().fg(palette.fg),
                ),
            ]))
        })
        .collect();
    let trail = List::new(items).block(Block::default().borders(Borders::ALL).title(" Trail "));
    f.render_widget(trail, chunks[1]);
}

fn draw_alerts_tab(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let alerts_block = Block::default()
        .borders(Borders::ALL)
        .title(" Security Alerts (r: mark read, a: mark all read) ");
    match &state.alerts {
        None => {
            let loading = Paragraph::new("Loading alerts...")
                .style(Style::default().fg(palette.muted))
                .block(alerts_block);
            f.render_widget(loading, chunks[0]);
        }
        Some(alerts) => {
            let items: Vec<ListItem> = alerts
                .iter()
                .map(|a| {
                    let marker = if a.read { "  " } else { "* " };
                    let title_style = if a.read {
                        Style::default().fg(palette.muted)
                    } else {
                        Style::default().fg(palette.fg).bold()
                    };
                    let mut lines = vec![
                        Line::from(vec![
                            Span::raw(marker),
                            Span::styled(
                                format!("[{}] ", a.severity.as_str()),
                                Style::default().fg(severity_color(a.severity)),
                            ),
                            Span::styled(a.title.clone(), title_style),
                            Span::styled(
                                format!("  {} | {}", a.location, a.timestamp),
                                Style::default().fg(palette.muted),
                            ),
                        ]),
                        Line::from(format!("    {}", a.description)),
                    ];
                    if let Some(action) = &a.action_required {
                        lines.push(Line::from(Span::styled(
                            format!("    Action: {}", action),
                            Style::default().fg(palette.warning),
                        )));
                    }
                    ListItem::new(lines)
                })
                .collect();
            let list = List::new(items)
                .block(alerts_block)
                .highlight_style(Style::default().fg(palette.highlight))
                .highlight_symbol("> ");
            let mut list_state = ListState::default().with_selected(Some(state.selected_alert));
            f.render_stateful_widget(list, chunks[0], &mut list_state);
        }
    }

    let messages_block = Block::default().borders(Borders::ALL).title(" Messages ");
    let lines: Vec<Line> = match &state.messages {
        None => vec![Line::from(Span::styled(
            "Loading messages...",
            Style::default().fg(palette.muted),
        ))],
        Some(messages) => messages
            .iter()
            .flat_map(|m| {
                let action = if m.action_required { " ACTION REQUIRED" } else { "" };
                [
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", m.priority.as_str()),
                            Style::default().fg(priority_color(m.priority)),
                        ),
                        Span::styled(m.company.clone(), Style::default().fg(palette.accent).bold()),
                        Span::styled(
                            format!("  {} | {}", m.location, m.timestamp),
                            Style::default().fg(palette.muted),
                        ),
                        Span::styled(action, Style::default().fg(palette.danger)),
                    ]),
                    Line::from(format!("    {}", m.content)),
                ]
            })
            .collect(),
    };
    let messages = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(messages_block);
    f.render_widget(messages, chunks[1]);
}

fn draw_activity(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.activity.len().saturating_sub(visible);
    let lines: Vec<Line> = state.activity[start..]
        .iter()
        .map(|entry| {
            let color = match entry.kind {
                ActivityKind::Emergency => palette.danger,
                ActivityKind::Intent => palette.accent,
                ActivityKind::Info => palette.fg,
                ActivityKind::Warning => palette.warning,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(palette.muted),
                ),
                Span::styled(entry.content.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let log = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Activity "));
    f.render_widget(log, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, palette: Palette, area: Rect) {
    let status = if let Some(status) = &state.status {
        format!(" {} ", status)
    } else if state.input_mode == InputMode::Editing {
        " Esc:cancel | Enter:submit | Tab:next field ".to_string()
    } else {
        format!(
            " 1-5:tabs | ?:help | t:theme ({}) | L:logout | q:quit ",
            state.theme_preference.as_str()
        )
    };

    let bar = Paragraph::new(status).style(Style::default().fg(palette.muted));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let help_text = r#"
 EMERGENCY HUB - Keyboard Shortcuts

 EMERGENCY (1)
   p (hold 3s)        Panic alert with location
   v                  Start/stop voice commands
   e                  Type a phrase while listening
   o / m / f          Call police / ambulance / fire
   c / Enter          Call selected security company
   r                  Reset emergency status

 MEDICAL (2)          e edit, c call medical contact
 CONTACTS (3)         a add, d delete, c call, s sms, n notify all
 TRACK (4)            s start/stop, x clear, h share, g navigate
 ALERTS (5)           r mark read, a mark all read

 GENERAL
   Tab / Shift+Tab    Switch tabs
   ↑ / ↓              Select item
   t                  Cycle theme (light/dark/system)
   L                  Log out
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black).fg(Color::White));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
