use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::api::{ApiClient, ChatReply, FileEntry};
use crate::config::{Config, Endpoints};
use crate::error::{Error, Result};
use crate::panels::assistant::AssistantPanel;
use crate::panels::notify::Notifications;
use crate::panels::repo::{IngestSubmit, RepoPanel};
use crate::panels::viewer::ViewerPanel;

use super::{Focus, Overlay};

/// A settled backend request, delivered back to the event loop by the task
/// that ran it. Refresh-style completions carry the generation tag they
/// were issued under so stale ones can be discarded.
enum Msg {
    CloneSettled { result: Result<Value> },
    TreeFetched { seq: u64, result: Result<Vec<String>> },
    SourceFetched { seq: u64, result: Result<String> },
    FilesFetched { seq: u64, result: Result<Vec<FileEntry>> },
    CodeFetched { seq: u64, result: Result<String> },
    ChatSettled { result: Result<ChatReply> },
    ResetSettled { result: Result<Value> },
}

/// One iteration of the multiplexed event loop.
enum Step {
    Terminal(Option<io::Result<CrosstermEvent>>),
    Backend(Option<Msg>),
    Tick,
}

/// Main TUI application
pub struct App {
    api: Arc<ApiClient>,

    repo: RepoPanel,
    viewer: ViewerPanel,
    assistant: AssistantPanel,
    notifications: Notifications,

    focus: Focus,
    overlay: Overlay,
    picker_index: usize,
    viewer_scroll: u16,
    tick_count: u64,
    should_quit: bool,

    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
}

impl App {
    const TICK: Duration = Duration::from_millis(250);

    pub fn new(config: Config) -> Result<Self> {
        let endpoints = Endpoints::new(&config);
        let api = Arc::new(ApiClient::new(endpoints, config.request_timeout)?);
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            api,
            repo: RepoPanel::default(),
            viewer: ViewerPanel::default(),
            assistant: AssistantPanel::default(),
            notifications: Notifications::default(),
            focus: Focus::RepoUrl,
            overlay: Overlay::None,
            picker_index: 0,
            viewer_scroll: 0,
            tick_count: 0,
            should_quit: false,
            tx,
            rx,
        })
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(Self::TICK);

        tracing::info!(base_url = %self.api.base_url(), "starting session");

        // Mount-time refreshes: tree, source, and the file listing.
        self.refresh_tree();
        self.refresh_source();
        self.fetch_files();

        loop {
            terminal.draw(|f| super::render::draw(f, self))?;

            let step = tokio::select! {
                ev = events.next() => Step::Terminal(ev),
                msg = self.rx.recv() => Step::Backend(msg),
                _ = ticker.tick() => Step::Tick,
            };

            match step {
                Step::Terminal(Some(Ok(CrosstermEvent::Key(key))))
                    if key.kind == KeyEventKind::Press =>
                {
                    self.handle_key(key.code, key.modifiers);
                }
                Step::Terminal(Some(Ok(_))) => {
                    // Resize and the rest re-render on the next draw.
                }
                Step::Terminal(Some(Err(err))) => return Err(err.into()),
                Step::Terminal(None) => self.should_quit = true,
                Step::Backend(Some(msg)) => self.handle_msg(msg),
                Step::Backend(None) => {}
                Step::Tick => self.tick(),
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.notifications.prune();
    }

    // ---- key handling ----------------------------------------------------

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('r') => {
                    self.reset_memory();
                    return;
                }
                KeyCode::Char('f') => {
                    self.fetch_files();
                    return;
                }
                KeyCode::Char('h') => {
                    self.overlay = Overlay::Help;
                    return;
                }
                _ => {}
            }
        }

        match self.overlay {
            Overlay::Help => self.handle_help_key(key),
            Overlay::FilePicker => self.handle_picker_key(key),
            Overlay::None => self.handle_base_key(key),
        }
    }

    fn handle_base_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.activate_focused(),
            KeyCode::PageUp => self.viewer_scroll = self.viewer_scroll.saturating_sub(10),
            KeyCode::PageDown => {
                let max = self.viewer.content().lines().count().saturating_sub(1) as u16;
                self.viewer_scroll = (self.viewer_scroll + 10).min(max);
            }
            _ => self.handle_edit_key(key),
        }
    }

    fn handle_edit_key(&mut self, key: KeyCode) {
        let input = match self.focus {
            Focus::RepoUrl => &mut self.repo.url_input,
            Focus::Question => &mut self.assistant.input,
            Focus::Files => {
                if matches!(key, KeyCode::Up | KeyCode::Down) {
                    self.open_picker();
                }
                return;
            }
        };

        match key {
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.overlay = Overlay::None;
        }
    }

    fn handle_picker_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Up => self.picker_index = self.picker_index.saturating_sub(1),
            KeyCode::Down => {
                let last = self.viewer.entries().len().saturating_sub(1);
                self.picker_index = (self.picker_index + 1).min(last);
            }
            KeyCode::Enter => {
                let name = self
                    .viewer
                    .entries()
                    .get(self.picker_index)
                    .map(|e| e.name.clone());
                self.overlay = Overlay::None;
                if let Some(name) = name {
                    self.fetch_code(&name);
                }
            }
            _ => {}
        }
    }

    fn activate_focused(&mut self) {
        match self.focus {
            Focus::RepoUrl => self.submit_ingest(),
            Focus::Files => self.open_picker(),
            Focus::Question => self.submit_question(),
        }
    }

    fn open_picker(&mut self) {
        self.picker_index = self.viewer.selected_index().unwrap_or(0);
        self.overlay = Overlay::FilePicker;
    }

    // ---- controllers: dispatch one request each --------------------------

    fn submit_ingest(&mut self) {
        match self.repo.submit_ingest() {
            IngestSubmit::Rejected => {
                self.notifications.error("Enter the repository URL");
            }
            IngestSubmit::Dispatch(url) => {
                tracing::info!(%url, "ingesting repository");
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.clone_repo(&url).await;
                    let _ = tx.send(Msg::CloneSettled { result });
                });

                // Committing the URL re-keys the dependent refreshes.
                self.refresh_tree();
                self.refresh_source();
            }
        }
    }

    fn refresh_tree(&mut self) {
        let seq = self.repo.begin_tree_refresh();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.tree_structure().await;
            let _ = tx.send(Msg::TreeFetched { seq, result });
        });
    }

    fn refresh_source(&mut self) {
        let seq = self.repo.begin_source_refresh();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.source().await;
            let _ = tx.send(Msg::SourceFetched { seq, result });
        });
    }

    fn fetch_files(&mut self) {
        let seq = self.viewer.begin_files_fetch();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_files().await;
            let _ = tx.send(Msg::FilesFetched { seq, result });
        });
    }

    fn fetch_code(&mut self, name: &str) {
        let fetch = self.viewer.begin_fetch_by_name(name);
        self.viewer_scroll = 0;
        tracing::info!(file = %name, resolved = fetch.dir.is_some(), "fetching file content");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.show_code(fetch.dir.as_deref()).await;
            let _ = tx.send(Msg::CodeFetched {
                seq: fetch.seq,
                result,
            });
        });
    }

    fn submit_question(&mut self) {
        let Some(question) = self.assistant.submit() else {
            return;
        };
        tracing::info!("chat question submitted");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.chat(&question).await;
            let _ = tx.send(Msg::ChatSettled { result });
        });
    }

    fn reset_memory(&mut self) {
        tracing::info!("resetting backend memory");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.reset_memory().await;
            let _ = tx.send(Msg::ResetSettled { result });
        });
    }

    // ---- settled requests ------------------------------------------------

    fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::CloneSettled { result } => {
                self.repo.clone_settled();
                match result {
                    Ok(body) => {
                        tracing::debug!(response = %body, "clone_repos settled");
                        self.notifications.success("Repository ingested");
                        // The backend knows a new repo now; refresh everything.
                        self.refresh_tree();
                        self.refresh_source();
                        self.fetch_files();
                    }
                    Err(err) => self.report_failure("Ingest failed", err),
                }
            }
            Msg::TreeFetched { seq, result } => {
                if let Some(err) = self.repo.apply_tree(seq, result) {
                    self.report_failure("Tree refresh failed", err);
                }
            }
            Msg::SourceFetched { seq, result } => {
                if let Some(err) = self.repo.apply_source(seq, result) {
                    self.report_failure("Source refresh failed", err);
                }
            }
            Msg::FilesFetched { seq, result } => {
                if let Some(err) = self.viewer.apply_files(seq, result) {
                    self.report_failure("File listing failed", err);
                }
            }
            Msg::CodeFetched { seq, result } => {
                if let Some(err) = self.viewer.apply_content(seq, result) {
                    self.report_failure("File fetch failed", err);
                }
            }
            Msg::ChatSettled { result } => {
                // Chat failures surface inline, in place of an answer.
                if let Err(err) = &result {
                    tracing::error!(error = %err, "chat failed");
                }
                self.assistant.finish(result);
            }
            Msg::ResetSettled { result } => match result {
                Ok(body) => {
                    tracing::debug!(response = %body, "reset_memory settled");
                    self.notifications.success("Memory has been reset");
                }
                Err(err) => self.report_failure("Reset failed", err),
            },
        }
    }

    /// Uniform failure policy: one log record and one notification per
    /// failed call.
    fn report_failure(&mut self, what: &str, err: Error) {
        tracing::error!(error = %err, "{what}");
        self.notifications
            .error(format!("{what}: {}", err.user_message()));
    }

    // ---- render accessors ------------------------------------------------

    pub(super) fn repo(&self) -> &RepoPanel {
        &self.repo
    }

    pub(super) fn viewer(&self) -> &ViewerPanel {
        &self.viewer
    }

    pub(super) fn assistant(&self) -> &AssistantPanel {
        &self.assistant
    }

    pub(super) fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub(super) fn focus(&self) -> Focus {
        self.focus
    }

    pub(super) fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub(super) fn picker_index(&self) -> usize {
        self.picker_index
    }

    pub(super) fn viewer_scroll(&self) -> u16 {
        self.viewer_scroll
    }

    pub(super) fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
