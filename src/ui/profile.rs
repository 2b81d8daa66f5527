//! Profile screen: personal info with a view/edit/save cycle, plus the
//! questionnaire overlay.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::profile::{ProfileEditor, ProfileField};
use crate::core::questionnaire::{Questionnaire, PAGE_COUNT, PAGE_SIZE, PROMPTS};
use crate::ui::{App, Screen};

/// Editable rows in display order; identity rows above them are read-only.
const FIELDS: [ProfileField; 5] = [
    ProfileField::Name,
    ProfileField::Gender,
    ProfileField::Location,
    ProfileField::Occupation,
    ProfileField::Interests,
];

pub(crate) struct ProfileView {
    pub editor: ProfileEditor,
    pub questionnaire: Questionnaire,
    pub loaded: bool,
    pub cursor: usize,
    /// Input line for the selected field while an edit session is open.
    pub field_input: String,
    pub questionnaire_open: bool,
    pub q_cursor: usize,
    pub saving: bool,
    pub submitting: bool,
}

impl ProfileView {
    pub fn new() -> Self {
        Self {
            editor: ProfileEditor::default(),
            questionnaire: Questionnaire::new(),
            loaded: false,
            cursor: 0,
            field_input: String::new(),
            questionnaire_open: false,
            q_cursor: 0,
            saving: false,
            submitting: false,
        }
    }

    pub fn install(&mut self, editor: ProfileEditor, questionnaire: Questionnaire) {
        self.editor = editor;
        self.questionnaire = questionnaire;
        self.loaded = true;
    }

    fn selected_field(&self) -> ProfileField {
        FIELDS[self.cursor]
    }

    fn seed_input(&mut self) {
        self.field_input = self.editor.field_text(self.selected_field());
    }

    fn apply_input(&mut self) {
        let field = self.selected_field();
        self.editor.set_field(field, &self.field_input);
    }

    fn selected_answer_index(&self) -> usize {
        self.questionnaire.page_indices().start + self.q_cursor
    }
}

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    if !app.profile.loaded {
        if key.code == KeyCode::Esc {
            app.screen = Screen::Chat;
        }
        return;
    }
    if app.profile.questionnaire_open {
        handle_questionnaire_key(app, key);
    } else if app.profile.editor.is_editing() {
        handle_edit_key(app, key);
    } else {
        handle_view_key(app, key);
    }
}

fn handle_view_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.profile.cursor = app.profile.cursor.saturating_sub(1),
        KeyCode::Down => {
            app.profile.cursor = (app.profile.cursor + 1).min(FIELDS.len() - 1);
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            if app.profile.editor.enter_edit() {
                app.profile.seed_input();
                app.status = None;
            }
        }
        KeyCode::Char('q') => {
            app.profile.questionnaire_open = true;
            app.profile.q_cursor = 0;
            app.status = None;
        }
        KeyCode::Esc => app.screen = Screen::Chat,
        _ => {}
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.profile.editor.cancel_edit();
            app.profile.field_input.clear();
        }
        KeyCode::Char('s') if ctrl => {
            app.profile.apply_input();
            app.spawn_profile_save();
        }
        KeyCode::Enter | KeyCode::Down => {
            app.profile.apply_input();
            app.profile.cursor = (app.profile.cursor + 1) % FIELDS.len();
            app.profile.seed_input();
        }
        KeyCode::Up => {
            app.profile.apply_input();
            app.profile.cursor = app
                .profile
                .cursor
                .checked_sub(1)
                .unwrap_or(FIELDS.len() - 1);
            app.profile.seed_input();
        }
        KeyCode::Backspace => {
            app.profile.field_input.pop();
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            app.profile.field_input.push(c);
        }
        _ => {}
    }
}

fn handle_questionnaire_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let index = app.profile.selected_answer_index();
    match key.code {
        KeyCode::Esc => app.profile.questionnaire_open = false,
        KeyCode::Up => app.profile.q_cursor = app.profile.q_cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Enter => {
            app.profile.q_cursor = (app.profile.q_cursor + 1).min(PAGE_SIZE - 1);
        }
        KeyCode::Left => {
            if app.profile.questionnaire.retreat_page() {
                app.profile.q_cursor = 0;
            }
        }
        KeyCode::Right => {
            if app.profile.questionnaire.advance_page() {
                app.profile.q_cursor = 0;
            }
        }
        KeyCode::Char('s') if ctrl => {
            if app.profile.questionnaire.on_last_page() {
                app.spawn_submit_answers();
            } else {
                app.profile.questionnaire.advance_page();
                app.profile.q_cursor = 0;
            }
        }
        KeyCode::Backspace => {
            let mut answer = app
                .profile
                .questionnaire
                .answer(index)
                .unwrap_or_default()
                .to_string();
            answer.pop();
            app.profile.questionnaire.record_answer(index, answer);
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            let mut answer = app
                .profile
                .questionnaire
                .answer(index)
                .unwrap_or_default()
                .to_string();
            answer.push(c);
            app.profile.questionnaire.record_answer(index, answer);
        }
        _ => {}
    }
}

pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    draw_fields(frame, app, rows[0]);
    draw_status(frame, app, rows[1]);

    if app.profile.questionnaire_open {
        draw_questionnaire(frame, app, area);
    }
}

fn draw_fields(frame: &mut Frame, app: &App, area: Rect) {
    let title = if !app.profile.loaded {
        "Personal info (loading...)"
    } else if app.profile.saving {
        "Personal info (saving...)"
    } else if app.profile.editor.is_editing() {
        "Personal info (editing)"
    } else {
        "Personal info"
    };

    let profile = app.profile.editor.display();
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(format!("ID:         {}", profile.user_id), dim)),
        Line::from(Span::styled(format!("Email:      {}", profile.email), dim)),
        Line::from(""),
    ];

    for (row, field) in FIELDS.iter().enumerate() {
        let selected = row == app.profile.cursor;
        let editing_here = selected && app.profile.editor.is_editing();
        let value = if editing_here {
            app.profile.field_input.clone()
        } else {
            app.profile.editor.field_text(*field)
        };
        let style = if editing_here {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{:<11} {}", format!("{}:", field.label()), value),
            style,
        )));
    }

    lines.push(Line::from(""));
    let help = if app.profile.editor.is_editing() {
        "Enter next field   ^S save   Esc cancel"
    } else {
        "e edit   q questionnaire   Esc back to chat   ^C quit"
    };
    lines.push(Line::from(Span::styled(help, dim)));

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(status) = &app.status {
        let line = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Green));
        frame.render_widget(line, area);
    }
}

fn draw_questionnaire(frame: &mut Frame, app: &App, area: Rect) {
    let overlay = centered_rect(80, 80, area);
    frame.render_widget(Clear, overlay);

    let questionnaire = &app.profile.questionnaire;
    let title = format!(
        "Questionnaire (Page {}/{})",
        questionnaire.page() + 1,
        PAGE_COUNT
    );

    let mut lines = Vec::new();
    for (slot, index) in questionnaire.page_indices().enumerate() {
        let selected = slot == app.profile.q_cursor;
        let prompt_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(PROMPTS[index].to_string(), prompt_style)));

        let answer = questionnaire.answer(index).unwrap_or_default();
        let answer_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(
            format!("> {answer}"),
            answer_style,
        )));
        lines.push(Line::from(""));
    }

    let footer = if app.profile.submitting {
        "Submitting answers..."
    } else if questionnaire.on_last_page() {
        "Left/Right pages   ^S finish   Esc close"
    } else {
        "Left/Right pages   Enter next question   Esc close"
    };
    lines.push(Line::from(Span::styled(
        footer,
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, overlay);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
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
