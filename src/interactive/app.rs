//! TUI application state and logic

use crate::controller::{
    ControllerError, PendingSubmission, ReconciliationController, SubmissionOutcome, SubmitOutcome,
    SyncOutcome, Transition,
};
use crate::gateway::{GatewayError, RemoteStateGateway};
use crate::output::{Alert, AlertKind};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

const MAX_ALERTS: usize = 5;
const FRAME: Duration = Duration::from_millis(30);

/// Connection state shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Connected,
    Failed,
}

/// Remote work finishing in the background
#[derive(Debug)]
pub enum TaskResult {
    Ready(Result<(), GatewayError>),
    Sync(SyncOutcome),
    Submission(SubmissionOutcome),
}

/// Application state
pub struct App<G> {
    pub controller: ReconciliationController<G>,
    pub epoch: u64,
    pub phase: Phase,
    pub alerts: Vec<Alert>,
    pub syncing: bool,
    pub should_quit: bool,
    tasks: UnboundedSender<TaskResult>,
    results: UnboundedReceiver<TaskResult>,
    last_poll: Instant,
}

impl<G: RemoteStateGateway + Clone + 'static> App<G> {
    #[must_use]
    pub fn new(controller: ReconciliationController<G>, epoch: u64) -> Self {
        let (tasks, results) = unbounded_channel();
        Self {
            controller,
            epoch,
            phase: Phase::Connecting,
            alerts: Vec::new(),
            syncing: false,
            should_quit: false,
            tasks,
            results,
            last_poll: Instant::now(),
        }
    }

    pub fn add_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
        if self.alerts.len() > MAX_ALERTS {
            self.alerts.remove(0);
        }
    }

    fn report(&mut self, error: &ControllerError) {
        self.add_alert(Alert::from(error));
    }

    /// Wait for the encrypted-computation provider in the background
    pub fn connect(&mut self) {
        let readiness = self.controller.readiness().clone();
        let gateway = self.controller.gateway().clone();
        let tasks = self.tasks.clone();
        self.phase = Phase::Connecting;
        tokio::task::spawn_local(async move {
            let result = readiness.establish(&gateway).await.map(|_| ());
            let _ = tasks.send(TaskResult::Ready(result));
        });
    }

    /// Start a background re-read unless one is already running
    ///
    /// After a failed handshake this reconnects instead.
    pub fn refresh(&mut self) {
        if self.phase == Phase::Failed {
            self.connect();
            return;
        }
        if self.syncing {
            return;
        }
        match self.controller.begin_sync() {
            Ok(ticket) => {
                let task = self.controller.sync_task(ticket);
                let tasks = self.tasks.clone();
                self.syncing = true;
                self.last_poll = Instant::now();
                tokio::task::spawn_local(async move {
                    let _ = tasks.send(TaskResult::Sync(task.await));
                });
            }
            Err(error) => self.report(&error),
        }
    }

    pub fn submit(&mut self) {
        match self.controller.prepare_submission() {
            Ok(Some(pending)) => self.spawn_submission(pending),
            Ok(None) => {}
            Err(error) => self.report(&error),
        }
    }

    pub fn start_match(&mut self) {
        match self.controller.prepare_start() {
            Ok(Some(pending)) => self.spawn_submission(pending),
            Ok(None) => self.add_alert(Alert::info("The match has already started")),
            Err(error) => self.report(&error),
        }
    }

    fn spawn_submission(&self, pending: PendingSubmission) {
        let task = self.controller.submission_task(pending);
        let tasks = self.tasks.clone();
        tokio::task::spawn_local(async move {
            let _ = tasks.send(TaskResult::Submission(task.await));
        });
    }

    /// Fold a finished background task into the state
    pub fn handle_task(&mut self, result: TaskResult) {
        match result {
            TaskResult::Ready(Ok(())) => {
                self.phase = Phase::Connected;
                self.refresh();
            }
            TaskResult::Ready(Err(error)) => {
                self.phase = Phase::Failed;
                self.report(&ControllerError::Readiness(error));
            }
            TaskResult::Sync(outcome) => {
                self.syncing = false;
                match self.controller.finish_sync(outcome) {
                    Ok(Some(transition)) => self.announce(transition),
                    Ok(None) => {}
                    Err(error) => self.report(&error),
                }
            }
            TaskResult::Submission(outcome) => match self.controller.finish_submission(outcome) {
                Ok(SubmitOutcome::Accepted(transition)) => self.announce(transition),
                Ok(SubmitOutcome::Ignored) => {}
                Err(error) => self.report(&error),
            },
        }
    }

    fn announce(&mut self, transition: Transition) {
        if let Some(alert) = Alert::for_transition(transition, self.controller.progress()) {
            self.add_alert(alert);
        }
    }

    /// Periodic re-read while the match is live
    pub fn tick(&mut self) {
        let interval = self.controller.config().poll_interval;
        if self.phase == Phase::Connected
            && !self.controller.is_submission_pending()
            && !self.controller.status().is_terminal()
            && self.last_poll.elapsed() >= interval
        {
            debug!("polling ledger");
            self.refresh();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.refresh(),
            KeyCode::Char('s') if ctrl => self.start_match(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if !ctrl => {
                self.controller.append_char(c);
            }
            KeyCode::Backspace => {
                self.controller.delete_char();
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    /// Latest alert, if it is an error
    #[must_use]
    pub fn last_error(&self) -> Option<&Alert> {
        self.alerts.last().filter(|a| a.kind() == AlertKind::Error)
    }
}

/// Run the TUI application
///
/// Must be called inside a `LocalSet`: remote work is spawned with
/// `spawn_local` so key handling never waits on the ledger.
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub async fn run_tui<G: RemoteStateGateway + Clone + 'static>(app: App<G>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B, G>(terminal: &mut Terminal<B>, mut app: App<G>) -> Result<()>
where
    B: ratatui::backend::Backend,
    G: RemoteStateGateway + Clone + 'static,
{
    app.connect();

    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        while let Ok(result) = app.results.try_recv() {
            app.handle_task(result);
        }

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                app.handle_key(key);
            }
            tokio::task::yield_now().await;
        } else {
            app.tick();
            tokio::time::sleep(FRAME).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controller::Readiness;
    use crate::core::{MatchStatus, Word};
    use crate::gateway::InMemoryGateway;
    use crate::wordlists::WordList;

    fn app() -> App<InMemoryGateway> {
        let solution = Word::new("speed").unwrap();
        let words = WordList::embedded(5);
        let gateway = InMemoryGateway::new(solution.clone(), words.clone(), 6).already_started();
        let controller = ReconciliationController::new(
            gateway,
            Readiness::new(),
            solution,
            words,
            GameConfig::default(),
        );
        App::new(controller, 0)
    }

    fn press(app: &mut App<InMemoryGateway>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    async fn drain(app: &mut App<InMemoryGateway>) {
        while let Some(result) = app.results.recv().await {
            app.handle_task(result);
            if !app.syncing && !app.controller.is_submission_pending() {
                break;
            }
        }
    }

    #[test]
    fn typing_edits_the_row() {
        let mut app = app();
        for c in "crane".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller.input().text(), "cran");

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn submit_before_connecting_is_rejected_locally() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let mut app = app();
                for c in "crane".chars() {
                    press(&mut app, KeyCode::Char(c));
                }
                press(&mut app, KeyCode::Enter);
                assert_eq!(
                    app.last_error().map(Alert::text),
                    Some("The match has not started yet")
                );
                assert!(app.controller.gateway().calls().is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn failed_handshake_can_be_retried() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let mut app = app();
                app.controller
                    .gateway()
                    .fail_next_ready(GatewayError::Unavailable("coprocessor".into()));
                app.connect();
                drain(&mut app).await;
                assert_eq!(app.phase, Phase::Failed);
                assert!(app.last_error().is_some());
                assert!(!app.controller.is_ready());

                app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
                assert_eq!(app.phase, Phase::Connecting);
                drain(&mut app).await;
                assert_eq!(app.phase, Phase::Connected);
                assert_eq!(app.controller.status(), MatchStatus::InProgress);
            })
            .await;
    }

    #[tokio::test]
    async fn background_submission_round_trip() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let mut app = app();
                app.connect();
                drain(&mut app).await;
                assert_eq!(app.phase, Phase::Connected);
                assert_eq!(app.controller.status(), MatchStatus::InProgress);

                for c in "speed".chars() {
                    press(&mut app, KeyCode::Char(c));
                }
                press(&mut app, KeyCode::Enter);
                assert!(app.controller.is_submission_pending());
                drain(&mut app).await;

                assert_eq!(app.controller.status(), MatchStatus::Won);
                assert_eq!(
                    app.alerts.last().map(Alert::kind),
                    Some(AlertKind::Success)
                );
            })
            .await;
    }
}
