use std::{
    io::{self, Stdout},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    ai::{ClassificationError, Classifier, GeminiClient},
    config::AppConfig,
    domain::ClassificationResult,
    infrastructure::shutdown::Shutdown,
    session::Session,
    ui::{self, result_line_count, Focus, ViewState},
};

type Outcome = Result<ClassificationResult, ClassificationError>;
type Tui = Terminal<CrosstermBackend<Stdout>>;

const PAGE: u16 = 5;

pub struct ChatrapatiApp {
    classifier: Arc<dyn Classifier>,
    session: Session,
    view: ViewState,
    shutdown: Shutdown,
    outcome_tx: UnboundedSender<Outcome>,
    outcome_rx: UnboundedReceiver<Outcome>,
    should_quit: bool,
}

impl ChatrapatiApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(format!("chatrapati/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let classifier: Arc<dyn Classifier> =
            Arc::new(GeminiClient::new(http_client, config.gemini.clone()));

        let timezone: Tz = config.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(
                target: "app",
                timezone = %config.timezone,
                "unknown display timezone, falling back to UTC"
            );
            chrono_tz::UTC
        });
        if config.gemini.api_key.is_none() {
            tracing::warn!(
                target: "app",
                "no API key configured; classification requests will fail"
            );
        }

        Ok(Self::with_classifier(classifier, timezone, shutdown))
    }

    pub fn with_classifier(
        classifier: Arc<dyn Classifier>,
        timezone: Tz,
        shutdown: Shutdown,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            classifier,
            session: Session::new(),
            view: ViewState::new(timezone),
            shutdown,
            outcome_tx,
            outcome_rx,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut terminal = enter_terminal()?;
        tracing::info!(target: "app", "terminal session started");

        let result = self.event_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;
        tracing::info!(
            target: "app",
            analyses = self.session.history().len(),
            "terminal session ended"
        );
        result
    }

    async fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventStream::new();
        let mut shutdown_listener = self.shutdown.subscribe();

        loop {
            terminal.draw(|f| ui::render(f, &self.session, &self.view))?;
            if self.should_quit || shutdown_listener.is_triggered() {
                break;
            }

            tokio::select! {
                _ = shutdown_listener.notified() => {
                    tracing::info!(target: "app", "shutdown signal received");
                    break;
                }
                Some(outcome) = self.outcome_rx.recv() => {
                    self.apply_outcome(outcome);
                }
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(err)) => return Err(err).context("failed to read terminal event"),
                    None => break,
                },
            }
        }
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        self.session.complete(outcome);
        self.view.history_cursor = 0;
        self.view.result_scroll = 0;
        tracing::debug!(target: "app", phase = ?self.session.phase(), "classification settled");
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.paste(&text),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        // Unmapped Ctrl/Alt chords must not leak their letter into the email.
        let typing = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Enter if ctrl => self.submit(),
            KeyCode::Char('l') if ctrl => {
                self.session.clear();
                self.view.result_scroll = 0;
            }
            KeyCode::PageDown => {
                let max = self
                    .session
                    .current_result()
                    .map(result_line_count)
                    .unwrap_or(0);
                self.view.scroll_result_down(PAGE, max);
            }
            KeyCode::PageUp => self.view.scroll_result_up(PAGE),
            KeyCode::Char('h') if ctrl => self.view.toggle_history(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.view.focus = self.view.focus.next(self.view.show_history);
            }
            _ => match self.view.focus {
                Focus::Subject => match key.code {
                    KeyCode::Char(c) if typing => self.session.subject_mut().push(c),
                    KeyCode::Backspace => {
                        self.session.subject_mut().pop();
                    }
                    KeyCode::Enter => self.view.focus = Focus::Content,
                    _ => {}
                },
                Focus::Content => match key.code {
                    KeyCode::Char(c) if typing => self.session.content_mut().push(c),
                    KeyCode::Backspace => {
                        self.session.content_mut().pop();
                    }
                    KeyCode::Enter => self.session.content_mut().push('\n'),
                    _ => {}
                },
                Focus::History => match key.code {
                    KeyCode::Up => self.view.cursor_up(),
                    KeyCode::Char('k') if typing => self.view.cursor_up(),
                    KeyCode::Down => self.view.cursor_down(self.session.history().len()),
                    KeyCode::Char('j') if typing => {
                        self.view.cursor_down(self.session.history().len())
                    }
                    KeyCode::Enter => {
                        if self.session.select_history_at(self.view.history_cursor) {
                            self.view.result_scroll = 0;
                        }
                    }
                    _ => {}
                },
            },
        }
    }

    fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        match self.view.focus {
            Focus::Subject => self
                .session
                .subject_mut()
                .push_str(&text.replace('\n', " ")),
            Focus::Content => self.session.content_mut().push_str(&text),
            Focus::History => {}
        }
    }

    /// Starts the single in-flight classification; the outcome arrives on the channel.
    fn submit(&mut self) {
        let Some(pending) = self.session.begin_submit() else {
            return;
        };
        let classifier = self.classifier.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = classifier
                .classify(&pending.content, &pending.subject)
                .await;
            let _ = tx.send(outcome);
        });
    }
}

fn enter_terminal() -> Result<Tui> {
    install_panic_hook();
    enable_raw_mode().context("failed to enable raw mode")?;
    let terminal = with_rollback(
        || {
            execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
            Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
        },
        || {
            let _ = reset_terminal();
        },
    )?;
    Ok(terminal)
}

/// Runs `setup`; if it fails, `rollback` undoes whatever was already switched on.
fn with_rollback<T>(setup: impl FnOnce() -> Result<T>, rollback: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| rollback())
}

/// Puts the terminal back before the default hook prints the panic message.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = reset_terminal();
        previous(info);
    }));
}

fn reset_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        cursor::Show
    )
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    reset_terminal()?;
    terminal.show_cursor()?;
    Ok(())
}
