//! Move suggestions for computer-controlled seats.
//!
//! Every suggestion is checked against the engine. A late, failed or illegal
//! suggestion is replaced by the fallback move.
use std::time::Duration;

use async_trait::async_trait;
use core_mechanics::board::{Action, Board, RuleViolation};
use core_mechanics::strategy::{fallback_action, GreedyStrategy, Strategy};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("move oracle unavailable: {0}")]
    OracleUnavailable(String),
    #[error("move oracle did not answer within {0:?}")]
    Timeout(Duration),
    #[error("move oracle suggested an illegal move: {0}")]
    IllegalSuggestion(RuleViolation),
}

#[async_trait]
pub trait MoveOracle: Send + Sync {
    /// Suggests a move for whoever is playing now.
    async fn suggest(&self, board: &Board) -> Result<Action, OracleError>;
}

/// Runs a [`Strategy`] locally, optionally pretending to think for a while.
#[derive(Debug, Clone, Default)]
pub struct HeuristicOracle<S = GreedyStrategy> {
    strategy: S,
    think_time: Duration,
}

impl<S: Strategy> HeuristicOracle<S> {
    pub fn new(strategy: S, think_time: Duration) -> Self {
        Self {
            strategy,
            think_time,
        }
    }
}

#[async_trait]
impl<S: Strategy + Send + Sync> MoveOracle for HeuristicOracle<S> {
    async fn suggest(&self, board: &Board) -> Result<Action, OracleError> {
        if !self.think_time.is_zero() {
            tokio::time::sleep(self.think_time).await;
        }
        Ok(self.strategy.choose_action(board))
    }
}

/// Asks the oracle under a deadline and checks the answer is playable.
pub async fn ask_oracle(
    oracle: &dyn MoveOracle,
    board: &Board,
    timeout: Duration,
) -> Result<Action, OracleError> {
    let action = tokio::time::timeout(timeout, oracle.suggest(board))
        .await
        .map_err(|_| OracleError::Timeout(timeout))??;

    board
        .do_action(&action)
        .map_err(OracleError::IllegalSuggestion)?;

    Ok(action)
}

/// The oracle's move, or the fallback move when the oracle fails.
pub async fn choose_ai_action(oracle: &dyn MoveOracle, board: &Board, timeout: Duration) -> Action {
    match ask_oracle(oracle, board, timeout).await {
        Ok(action) => {
            debug!(?action, "oracle suggestion accepted");
            action
        }
        Err(error) => {
            let action = fallback_action(board);
            warn!(%error, ?action, "falling back to the default move");
            action
        }
    }
}
