//! RPC boundary to the remote authoritative game backend.

use async_trait::async_trait;
use spotquest_protocol::{
    GuessSubmission, HintContent, HintType, RoundInfo, RoundOutcome, SessionEntry, SessionSummary,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network-level failure; the request may or may not have landed.
    /// Never retried automatically (a retry after a landed request would
    /// double-score or double-charge).
    #[error("Transport Error: {0}")]
    Transport(String),

    /// The backend considers the session over while the client does not.
    /// Reconciled by the session controller, not surfaced directly.
    #[error("Session already ended")]
    SessionEnded,

    #[error("Insufficient balance: {0}")]
    InsufficientFunds(String),

    #[error("Hint already purchased")]
    AlreadyPurchased,

    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The six-operation surface the core consumes (plus the session list
/// used as the last reconciliation resort). The backend behind it owns
/// session storage, reward minting, and anti-cheat; the core treats it
/// as opaque and authoritative.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn create_session(&self) -> GatewayResult<String>;

    async fn get_next_round(
        &self,
        session_id: &str,
        region: Option<&str>,
    ) -> GatewayResult<RoundInfo>;

    async fn submit_guess(
        &self,
        session_id: &str,
        guess: &GuessSubmission,
    ) -> GatewayResult<RoundOutcome>;

    async fn purchase_hint(&self, session_id: &str, hint: HintType) -> GatewayResult<HintContent>;

    async fn token_balance(&self, principal: &str) -> GatewayResult<u64>;

    async fn finalize_session(&self, session_id: &str) -> GatewayResult<SessionSummary>;

    async fn abandon_session(&self, session_id: &str) -> GatewayResult<()>;

    async fn list_sessions(&self, principal: &str) -> GatewayResult<Vec<SessionEntry>>;
}
