//! Chat screen: sidebar history, transcript pane, input line.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::conversation::ConversationStore;
use crate::ui::App;

const SIDEBAR_WIDTH: u16 = 26;

pub(crate) struct ChatView {
    pub store: ConversationStore,
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub show_sidebar: bool,
    /// Max scroll of the last drawn frame; lets key handlers clamp without
    /// knowing the terminal size.
    pub max_scroll: u16,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            store: ConversationStore::new(),
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            show_sidebar: true,
            max_scroll: 0,
        }
    }
}

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Char('n') if ctrl => app.start_new_conversation(),
        KeyCode::Char('o') if ctrl => app.cycle_conversation(),
        KeyCode::Char('p') if ctrl => app.open_profile(),
        KeyCode::Tab => app.chat.show_sidebar = !app.chat.show_sidebar,
        KeyCode::Up => {
            app.chat.auto_scroll = false;
            app.chat.scroll_offset = app.chat.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down => {
            app.chat.scroll_offset = app
                .chat
                .scroll_offset
                .saturating_add(1)
                .min(app.chat.max_scroll);
            if app.chat.scroll_offset >= app.chat.max_scroll {
                app.chat.auto_scroll = true;
            }
        }
        KeyCode::Backspace => {
            app.chat.input.pop();
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            app.chat.input.push(c);
        }
        _ => {}
    }
}

pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let columns = if app.chat.show_sidebar {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0)])
            .split(area)
    };

    if app.chat.show_sidebar {
        draw_sidebar(frame, app, columns[0]);
    }
    let main = columns[columns.len() - 1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(main);

    draw_transcript(frame, app, rows[0]);
    draw_input(frame, app, rows[1]);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let active = app.chat.store.active_id();
    let mut lines = Vec::new();
    for conversation in app.chat.store.history() {
        let style = if Some(conversation.id) == active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(conversation.title.clone(), style)));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "no conversations yet",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("History (^O cycle, ^N new)"),
    );
    frame.render_widget(sidebar, area);
}

fn draw_transcript(frame: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for msg in app.chat.store.messages() {
        if msg.is_user() {
            lines.push(Line::from(vec![
                Span::styled(
                    "You: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.content.clone(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(""));
        } else {
            for content_line in msg.content.lines() {
                lines.push(Line::from(Span::styled(
                    content_line.to_string(),
                    Style::default().fg(Color::White),
                )));
            }
            lines.push(Line::from(""));
        }
    }

    let available_height = area.height.saturating_sub(1);
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    app.chat.max_scroll = max_offset;
    if app.chat.auto_scroll {
        app.chat.scroll_offset = max_offset;
    } else {
        app.chat.scroll_offset = app.chat.scroll_offset.min(max_offset);
    }

    let transcript = Paragraph::new(lines)
        .block(Block::default().title("Chat"))
        .wrap(Wrap { trim: true })
        .scroll((app.chat.scroll_offset, 0));
    frame.render_widget(transcript, area);
}

fn draw_input(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let title = if let Some(status) = &app.status {
        status.clone()
    } else if app.query_in_flight() {
        "Waiting for a reply... (^P profile, ^C quit)".to_string()
    } else {
        "Type your message (Enter to send, ^P profile, ^C quit)".to_string()
    };

    let input = Paragraph::new(app.chat.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(input, area);

    frame.set_cursor_position((
        area.x + app.chat.input.chars().count() as u16 + 1,
        area.y + 1,
    ));
}
