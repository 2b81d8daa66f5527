//! Terminal interface: the chat screen backed by the conversation store and
//! the profile screen backed by the editor and questionnaire.
//!
//! One event loop owns all state. Backend calls run on spawned tasks and
//! re-enter through the [`UiEvent`] channel, so every mutation still happens
//! on the loop; the optimistic message append is visible before any reply
//! arrives.

pub mod chat;
pub mod profile;

use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::conversation::PendingQuery;
use crate::core::profile::ProfileEditor;
use crate::core::questionnaire::Questionnaire;
use crate::core::session::{SessionContext, SubmitReport};
use self::chat::ChatView;
use self::profile::ProfileView;

/// Screen shown when the application starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartScreen {
    Chat,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Chat,
    Profile,
}

/// Results of spawned backend calls, funneled back into the event loop.
pub(crate) enum UiEvent {
    QueryResolved(PendingQuery, String),
    ProfileLoaded(Box<ProfileEditor>, Questionnaire),
    ProfileSaved(Result<(), String>),
    AnswersSubmitted(SubmitReport),
}

pub(crate) struct App {
    pub session: SessionContext,
    pub screen: Screen,
    pub chat: ChatView,
    pub profile: ProfileView,
    pub status: Option<String>,
    events: mpsc::UnboundedSender<UiEvent>,
    query_cancel: Option<CancellationToken>,
    should_quit: bool,
}

pub async fn run_app(
    session: SessionContext,
    start: StartScreen,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(session, start, tx);
    if start == StartScreen::Profile {
        app.request_profile_load();
    }

    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| match app.screen {
            Screen::Chat => chat::draw(frame, app),
            Screen::Profile => profile::draw(frame, app),
        })?;

        if app.should_quit {
            return Ok(());
        }

        // Fold in whatever the background tasks finished since the last
        // frame before taking more input.
        let mut resolved_any = false;
        while let Ok(ui_event) = rx.try_recv() {
            app.apply(ui_event);
            resolved_any = true;
        }
        if resolved_any {
            continue;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
}

impl App {
    fn new(session: SessionContext, start: StartScreen, events: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            session,
            screen: match start {
                StartScreen::Chat => Screen::Chat,
                StartScreen::Profile => Screen::Profile,
            },
            chat: ChatView::new(),
            profile: ProfileView::new(),
            status: None,
            events,
            query_cancel: None,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Chat => chat::handle_key(self, key),
            Screen::Profile => profile::handle_key(self, key),
        }
    }

    fn apply(&mut self, ui_event: UiEvent) {
        match ui_event {
            UiEvent::QueryResolved(pending, reply) => {
                self.chat.store.resolve(&pending, reply);
                self.chat.auto_scroll = true;
                self.query_cancel = None;
            }
            UiEvent::ProfileLoaded(editor, questionnaire) => {
                self.profile.install(*editor, questionnaire);
            }
            UiEvent::ProfileSaved(Ok(())) => {
                self.profile.editor.commit();
                self.profile.saving = false;
                self.status = Some("Information saved".to_string());
            }
            UiEvent::ProfileSaved(Err(message)) => {
                // The edit session stays open with the draft intact.
                self.profile.saving = false;
                self.status = Some(message);
            }
            UiEvent::AnswersSubmitted(report) => {
                self.profile.submitting = false;
                self.status = Some(report.status_line());
                if report.is_complete() {
                    self.profile.questionnaire_open = false;
                    self.screen = Screen::Chat;
                }
            }
        }
    }

    pub(crate) fn query_in_flight(&self) -> bool {
        self.query_cancel.is_some()
    }

    /// Submit the chat input line. Blank input is rejected by the store and
    /// the line is left as typed.
    pub(crate) fn submit_input(&mut self) {
        let text = self.chat.input.clone();
        if let Some(pending) = self.chat.store.submit(&text) {
            self.chat.input.clear();
            self.chat.auto_scroll = true;
            self.status = None;
            self.spawn_query(pending);
        }
    }

    fn spawn_query(&mut self, pending: PendingQuery) {
        let cancel = CancellationToken::new();
        self.query_cancel = Some(cancel.clone());
        let session = self.session.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let reply = tokio::select! {
                _ = cancel.cancelled() => None,
                reply = session.send_query(&pending) => Some(reply),
            };
            if let Some(reply) = reply {
                let _ = tx.send(UiEvent::QueryResolved(pending, reply));
            }
        });
    }

    /// Abandon the in-flight query, if any. The epoch guard in the store
    /// would drop its reply anyway; cancelling just stops the work sooner.
    pub(crate) fn cancel_inflight(&mut self) {
        if let Some(token) = self.query_cancel.take() {
            token.cancel();
        }
    }

    pub(crate) fn start_new_conversation(&mut self) {
        self.cancel_inflight();
        self.chat.store.start_new();
        self.chat.input.clear();
        self.chat.auto_scroll = true;
        self.status = None;
    }

    /// Select the next conversation after the active one, wrapping around.
    pub(crate) fn cycle_conversation(&mut self) {
        let history = self.chat.store.history();
        if history.is_empty() {
            return;
        }
        let next = match self.chat.store.active_id() {
            Some(active) => history
                .iter()
                .position(|c| c.id == active)
                .map(|pos| (pos + 1) % history.len())
                .unwrap_or(0),
            None => 0,
        };
        let id = history[next].id;
        self.cancel_inflight();
        self.chat.store.select(id);
        self.chat.auto_scroll = true;
    }

    pub(crate) fn open_profile(&mut self) {
        self.screen = Screen::Profile;
        self.status = None;
        self.request_profile_load();
    }

    fn request_profile_load(&mut self) {
        if self.profile.loaded {
            return;
        }
        let session = self.session.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let (editor, questionnaire) = session.load_profile().await;
            let _ = tx.send(UiEvent::ProfileLoaded(Box::new(editor), questionnaire));
        });
    }

    /// Send the draft to the profile service. The editor commits only when
    /// the acknowledgment comes back.
    pub(crate) fn spawn_profile_save(&mut self) {
        if self.profile.saving {
            return;
        }
        let Some(draft) = self.profile.editor.draft().cloned() else {
            return;
        };
        self.profile.saving = true;
        let session = self.session.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = session
                .save_profile(&draft)
                .await
                .map_err(|err| format!("Save failed: {err}"));
            let _ = tx.send(UiEvent::ProfileSaved(outcome));
        });
    }

    /// Fan out the questionnaire submission. Only valid from the last page.
    pub(crate) fn spawn_submit_answers(&mut self) {
        if !self.profile.questionnaire.on_last_page() || self.profile.submitting {
            return;
        }
        self.profile.submitting = true;
        let questionnaire = self.profile.questionnaire.clone();
        let session = self.session.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let report = session.submit_all_answers(&questionnaire).await;
            let _ = tx.send(UiEvent::AnswersSubmitted(report));
        });
    }
}
