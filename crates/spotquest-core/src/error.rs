use crate::gateway::GatewayError;
use crate::hints::HintError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Invalid State: {0}")]
    State(String),

    #[error("Gateway Error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Hint Error: {0}")]
    Hint(#[from] HintError),

    /// The client and the backend disagree about the session's state and
    /// reconciliation could not settle on a consistent completed view.
    #[error("Session Desync: {0}")]
    SessionDesync(String),
}

pub type GameResult<T> = Result<T, GameError>;
