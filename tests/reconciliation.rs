//! Reconciliation protocol tests against call-recording gateways.

use sealed_wordle::config::GameConfig;
use sealed_wordle::controller::{ControllerError, Readiness, ReconciliationController, SubmitOutcome};
use sealed_wordle::core::{Feedback, GuessRecord, LetterVerdict, MatchStatus, Rejection, Word};
use sealed_wordle::gateway::{GatewayCall, GatewayError, InMemoryGateway, RemoteStateGateway};
use sealed_wordle::wordlists::WordList;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

type Controller<G> = ReconciliationController<G>;

fn word(text: &str) -> Word {
    Word::new(text).unwrap()
}

fn controller_with(gateway: InMemoryGateway, solution: &str, config: GameConfig) -> Controller<InMemoryGateway> {
    ReconciliationController::new(
        gateway,
        Readiness::new(),
        word(solution),
        WordList::embedded(5),
        config,
    )
}

fn started_game(solution: &str) -> Controller<InMemoryGateway> {
    let gateway = InMemoryGateway::new(word(solution), WordList::embedded(5), 6).already_started();
    controller_with(gateway, solution, GameConfig::default())
}

fn type_word<G: RemoteStateGateway + Clone>(controller: &mut Controller<G>, text: &str) {
    for c in text.chars() {
        controller.append_char(c);
    }
}

async fn play<G: RemoteStateGateway + Clone>(
    controller: &mut Controller<G>,
    text: &str,
) -> Result<SubmitOutcome, ControllerError> {
    type_word(controller, text);
    controller.submit().await
}

/// Gateway stub that records whether anything reached it before readiness
#[derive(Clone, Default)]
struct OrderCheckingGateway {
    ready: Rc<Cell<bool>>,
    out_of_order: Rc<Cell<usize>>,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl OrderCheckingGateway {
    fn note(&self, call: &'static str) -> Result<(), GatewayError> {
        self.log.borrow_mut().push(call);
        if self.ready.get() {
            Ok(())
        } else {
            self.out_of_order.set(self.out_of_order.get() + 1);
            Err(GatewayError::NotReady)
        }
    }
}

impl RemoteStateGateway for OrderCheckingGateway {
    async fn await_computation_ready(&self) -> Result<(), GatewayError> {
        self.log.borrow_mut().push("ready");
        tokio::task::yield_now().await;
        self.ready.set(true);
        Ok(())
    }

    async fn is_match_started(&self) -> Result<bool, GatewayError> {
        self.note("started")?;
        Ok(true)
    }

    async fn is_match_finished(&self) -> Result<bool, GatewayError> {
        self.note("finished")?;
        Ok(false)
    }

    async fn fetch_guess_history(&self, _previous: &[GuessRecord]) -> Result<Vec<GuessRecord>, GatewayError> {
        self.note("history")?;
        Ok(Vec::new())
    }

    async fn submit_guess(&self, _word: &Word) -> Result<(), GatewayError> {
        self.note("submit")
    }

    async fn start_match(&self) -> Result<(), GatewayError> {
        self.note("start")
    }
}

#[tokio::test]
async fn submitting_after_a_win_makes_no_remote_calls() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();
    play(&mut controller, "speed").await.unwrap();
    assert_eq!(controller.status(), MatchStatus::Won);

    controller.gateway().clear_calls();
    type_word(&mut controller, "crane");
    let outcome = controller.submit().await;

    assert_eq!(outcome, Ok(SubmitOutcome::Ignored));
    assert!(controller.gateway().calls().is_empty());
    assert_eq!(controller.progress().attempts_used(), 1);
    assert_eq!(controller.status(), MatchStatus::Won);
}

#[tokio::test]
async fn failed_submission_keeps_input_and_history() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();
    play(&mut controller, "crane").await.unwrap();

    controller
        .gateway()
        .fail_next_submission(GatewayError::Unavailable("relayer down".into()));
    let outcome = play(&mut controller, "slate").await;

    assert!(matches!(outcome, Err(ControllerError::Submission(_))));
    assert_eq!(controller.input().text(), "slate");
    assert_eq!(controller.progress().attempts_used(), 1);
    assert_eq!(controller.gateway().history_len(), 1);
    assert!(!controller.is_submission_pending());

    // No automatic retry: exactly one submit attempt reached the gateway
    let slate_calls = controller
        .gateway()
        .calls()
        .into_iter()
        .filter(|c| *c == GatewayCall::SubmitGuess("slate".into()))
        .count();
    assert_eq!(slate_calls, 1);
}

#[tokio::test]
async fn nothing_reaches_the_gateway_before_readiness() {
    let gateway = OrderCheckingGateway::default();
    let mut controller = ReconciliationController::new(
        gateway.clone(),
        Readiness::new(),
        word("speed"),
        WordList::embedded(5),
        GameConfig::default(),
    );

    assert_eq!(controller.reconcile().await, Err(ControllerError::NotReady));
    assert_eq!(controller.start_match().await, Err(ControllerError::NotReady));
    type_word(&mut controller, "crane");
    assert!(controller.submit().await.is_err());
    assert!(gateway.log.borrow().is_empty());

    controller.initialize().await.unwrap();
    play(&mut controller, "crane").await.unwrap();

    assert_eq!(gateway.out_of_order.get(), 0);
    assert_eq!(gateway.log.borrow().first(), Some(&"ready"));
}

#[tokio::test]
async fn failed_readiness_is_retried_on_the_next_initialize() {
    let mut controller = started_game("speed");
    controller
        .gateway()
        .fail_next_ready(GatewayError::Unavailable("coprocessor".into()));

    let first = controller.initialize().await;
    assert!(matches!(first, Err(ControllerError::Readiness(_))));
    assert!(!controller.is_ready());
    assert_eq!(controller.status(), MatchStatus::NotStarted);
    assert_eq!(controller.reconcile().await, Err(ControllerError::NotReady));

    let transition = controller.initialize().await.unwrap();
    assert_eq!(transition.to, MatchStatus::InProgress);
    assert!(controller.is_ready());

    let handshakes = controller
        .gateway()
        .calls()
        .into_iter()
        .filter(|c| *c == GatewayCall::AwaitReady)
        .count();
    assert_eq!(handshakes, 2);
    assert_eq!(controller.gateway().premature_calls(), 0);
}

#[tokio::test]
async fn accepted_guess_with_failed_reread_clears_the_row() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();

    type_word(&mut controller, "speed");
    let pending = controller.prepare_submission().unwrap().unwrap();
    assert!(controller.is_submission_pending());
    controller
        .gateway()
        .fail_next_read(GatewayError::Unavailable("rpc".into()));
    let outcome = controller.submission_task(pending).await;
    let result = controller.finish_submission(outcome);

    assert!(matches!(result, Err(ControllerError::Resync(_))));
    assert!(controller.input().is_empty());
    assert!(!controller.is_submission_pending());
    assert_eq!(controller.gateway().history_len(), 1);
    // The view is not rebuilt until the next successful read
    assert_eq!(controller.status(), MatchStatus::InProgress);
    assert_eq!(controller.progress().attempts_used(), 0);

    let transition = controller.reconcile().await.unwrap();
    assert_eq!(transition.from, MatchStatus::InProgress);
    assert_eq!(transition.to, MatchStatus::Won);
    assert_eq!(controller.progress().attempts_used(), 1);
}

#[tokio::test]
async fn in_memory_gateway_sees_no_premature_calls_over_a_full_game() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();
    for guess in ["crane", "slate", "robot", "floor", "metal", "irate"] {
        play(&mut controller, guess).await.unwrap();
    }
    assert_eq!(controller.gateway().premature_calls(), 0);
    assert_eq!(controller.gateway().calls()[0], GatewayCall::AwaitReady);
}

#[tokio::test]
async fn submission_is_followed_by_a_full_reread() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();
    controller.gateway().clear_calls();

    play(&mut controller, "crane").await.unwrap();
    let calls = controller.gateway().calls();

    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], GatewayCall::SubmitGuess("crane".into()));
    assert!(calls[1..3].contains(&GatewayCall::IsStarted));
    assert!(calls[1..3].contains(&GatewayCall::IsFinished));
    assert_eq!(calls[3], GatewayCall::FetchHistory);
}

#[tokio::test(start_paused = true)]
async fn flag_reads_run_concurrently() {
    let gateway = InMemoryGateway::new(word("speed"), WordList::embedded(5), 6)
        .already_started()
        .with_latency(Duration::from_millis(100));
    let mut controller = controller_with(gateway, "speed", GameConfig::default());

    let start = tokio::time::Instant::now();
    controller.initialize().await.unwrap();

    // Two concurrent flag reads plus one history read; sequential reads would take 300ms
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(300));
}

#[tokio::test]
async fn local_win_does_not_wait_for_the_finished_flag() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();
    controller.gateway().hold_finish_flag(true);

    play(&mut controller, "speed").await.unwrap();
    assert_eq!(controller.status(), MatchStatus::Won);
    assert!(!controller.progress().is_remote_finished());
    assert_eq!(controller.progress().revealed_solution(), Some(&word("speed")));

    controller.gateway().release_finish_flag();
    let transition = controller.reconcile().await.unwrap();
    assert!(!transition.changed());
    assert!(controller.progress().is_remote_finished());
}

#[tokio::test]
async fn rebuild_follows_the_ledger_when_it_disagrees_later() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();
    controller.gateway().hold_finish_flag(true);
    play(&mut controller, "speed").await.unwrap();
    assert_eq!(controller.status(), MatchStatus::Won);

    // The ledger drops the winning guess
    controller
        .gateway()
        .replace_history(vec![GuessRecord::new(word("crane"))]);
    controller.gateway().set_flags(true, false);

    let transition = controller.reconcile().await.unwrap();
    assert_eq!(transition.from, MatchStatus::Won);
    assert_eq!(transition.to, MatchStatus::InProgress);
    assert_eq!(controller.progress().revealed_solution(), None);
}

#[tokio::test]
async fn divergent_remote_feedback_is_reported() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();

    let wrong = Feedback::new(vec![LetterVerdict::Correct; 5]);
    controller.gateway().replace_history(vec![
        GuessRecord::with_feedback(word("crane"), wrong),
        GuessRecord::new(word("slate")),
    ]);
    controller.reconcile().await.unwrap();

    assert_eq!(controller.progress().divergent_guesses(), [0]);
    assert_eq!(controller.status(), MatchStatus::InProgress);
}

#[tokio::test]
async fn running_out_of_attempts_waits_for_the_remote_loss() {
    let mut controller = started_game("speed");
    controller.initialize().await.unwrap();

    for guess in ["crane", "slate", "robot", "floor", "metal"] {
        play(&mut controller, guess).await.unwrap();
    }
    assert_eq!(controller.status(), MatchStatus::InProgress);

    let outcome = play(&mut controller, "irate").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Accepted(t) if t.to == MatchStatus::Lost));
    assert_eq!(controller.progress().attempts_remaining(), 0);

    assert!(!controller.append_char('a'));
}

#[tokio::test]
async fn local_rejections_make_no_remote_calls() {
    let gateway = InMemoryGateway::new(word("speed"), WordList::embedded(5), 6).already_started();
    let config = GameConfig {
        hard_mode: true,
        ..GameConfig::default()
    };
    let mut controller = controller_with(gateway, "speed", config);
    controller.initialize().await.unwrap();
    play(&mut controller, "erase").await.unwrap();
    controller.gateway().clear_calls();

    type_word(&mut controller, "cran");
    assert_eq!(
        controller.submit().await,
        Err(ControllerError::Rejected(Rejection::NotEnoughLetters))
    );

    controller.clear_input();
    type_word(&mut controller, "qzxvj");
    assert_eq!(
        controller.submit().await,
        Err(ControllerError::Rejected(Rejection::WordNotFound))
    );

    controller.clear_input();
    type_word(&mut controller, "crane");
    assert_eq!(
        controller.submit().await,
        Err(ControllerError::Rejected(Rejection::HardMode(
            "Guess must contain S".into()
        )))
    );
    assert_eq!(controller.input().text(), "crane");
    assert!(controller.gateway().calls().is_empty());
}

#[tokio::test]
async fn starting_the_match_enables_guessing() {
    let gateway = InMemoryGateway::new(word("speed"), WordList::embedded(5), 6);
    let mut controller = controller_with(gateway, "speed", GameConfig::default());
    controller.initialize().await.unwrap();
    assert_eq!(controller.status(), MatchStatus::NotStarted);

    assert_eq!(
        play(&mut controller, "crane").await,
        Err(ControllerError::Rejected(Rejection::MatchNotStarted))
    );

    controller.start_match().await.unwrap();
    assert_eq!(controller.status(), MatchStatus::InProgress);
    controller.submit().await.unwrap();
    assert_eq!(controller.progress().attempts_used(), 1);
    assert!(controller.input().is_empty());
}
