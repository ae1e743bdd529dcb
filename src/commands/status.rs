//! One-shot status report

use crate::controller::ReconciliationController;
use crate::gateway::RemoteStateGateway;
use crate::output::{print_status_report, spinner};
use anyhow::{Context, Result};

/// Connect, read the ledger once and print the board
///
/// # Errors
///
/// Returns an error if readiness or any read fails.
pub async fn run_status<G: RemoteStateGateway + Clone>(
    controller: &mut ReconciliationController<G>,
    epoch: u64,
) -> Result<()> {
    let pb = spinner("Connecting to the ledger...");
    let result = controller.initialize().await;
    pb.finish_and_clear();

    result.context("failed to read match state")?;
    print_status_report(controller.progress(), epoch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controller::Readiness;
    use crate::core::{MatchStatus, Word};
    use crate::gateway::{GatewayCall, GatewayError, InMemoryGateway};
    use crate::wordlists::WordList;

    fn controller(gateway: InMemoryGateway) -> ReconciliationController<InMemoryGateway> {
        ReconciliationController::new(
            gateway,
            Readiness::new(),
            Word::new("speed").unwrap(),
            WordList::embedded(5),
            GameConfig::default(),
        )
    }

    #[tokio::test]
    async fn fresh_ledger_reports_not_started() {
        let gateway = InMemoryGateway::new(Word::new("speed").unwrap(), WordList::embedded(5), 6);
        let mut controller = controller(gateway);

        run_status(&mut controller, 7).await.unwrap();
        assert_eq!(controller.status(), MatchStatus::NotStarted);
        assert!(!controller.gateway().calls().contains(&GatewayCall::FetchHistory));
    }

    #[tokio::test]
    async fn report_reflects_remote_history() {
        let gateway = InMemoryGateway::new(Word::new("speed").unwrap(), WordList::embedded(5), 6)
            .already_started();
        let mut controller = controller(gateway);
        controller.initialize().await.unwrap();
        for c in "crane".chars() {
            controller.append_char(c);
        }
        controller.submit().await.unwrap();

        run_status(&mut controller, 7).await.unwrap();
        assert_eq!(controller.status(), MatchStatus::InProgress);
        assert_eq!(controller.progress().attempts_used(), 1);
    }

    #[tokio::test]
    async fn failed_handshake_is_an_error() {
        let gateway = InMemoryGateway::new(Word::new("speed").unwrap(), WordList::embedded(5), 6);
        gateway.fail_next_ready(GatewayError::Unavailable("coprocessor".into()));
        let mut controller = controller(gateway);

        assert!(run_status(&mut controller, 7).await.is_err());
    }
}
