//! The in-round hint economy: catalog, balance checks, and purchase
//! orchestration against the backend.

use std::sync::Arc;

use spotquest_protocol::{HintContent, HintType};
use thiserror::Error;
use tracing::{info, warn};

use crate::difficulty::Difficulty;
use crate::gateway::{BackendGateway, GatewayError};

#[derive(Error, Debug)]
pub enum HintError {
    #[error("Hint {0} already unlocked this round")]
    AlreadyUnlocked(HintType),

    /// Raised by the local pre-check; no RPC is issued in this case.
    #[error("Insufficient balance: hint costs {required}, balance is {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Base cost in token units, before the difficulty multiplier.
pub const fn base_cost(kind: HintType) -> u64 {
    match kind {
        HintType::BasicRadius => 100,
        HintType::PremiumRadius => 300,
        HintType::DirectionHint => 100,
    }
}

/// Cost actually charged: base cost scaled by the difficulty's hint
/// multiplier.
pub fn effective_cost(kind: HintType, difficulty: Difficulty) -> u64 {
    let scaled = base_cost(kind) as f64 * difficulty.profile().hint_cost_multiplier;
    scaled.round() as u64
}

/// Hints unlocked during the current round. Reset when a round begins.
#[derive(Debug, Default, Clone)]
pub struct RoundHints {
    unlocked: Vec<(HintType, HintContent)>,
}

impl RoundHints {
    pub fn is_unlocked(&self, kind: HintType) -> bool {
        self.unlocked.iter().any(|(k, _)| *k == kind)
    }

    pub fn unlock(&mut self, kind: HintType, content: HintContent) {
        if !self.is_unlocked(kind) {
            self.unlocked.push((kind, content));
        }
    }

    pub fn unlocked(&self) -> &[(HintType, HintContent)] {
        &self.unlocked
    }
}

/// Purchase orchestration plus the read-mostly balance cache.
///
/// The cached balance is only a fast "can afford" pre-check; the backend
/// enforces the real debit and the cache is refreshed from it after
/// every purchase, never computed locally.
pub struct HintEconomy {
    gateway: Arc<dyn BackendGateway>,
    principal: String,
    balance: u64,
}

impl HintEconomy {
    pub fn new(gateway: Arc<dyn BackendGateway>, principal: impl Into<String>) -> Self {
        Self {
            gateway,
            principal: principal.into(),
            balance: 0,
        }
    }

    /// Last balance reported by the backend (possibly stale).
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Refreshes the cached balance. Non-critical: a failure keeps the
    /// stale value and is only logged.
    pub async fn refresh_balance(&mut self) -> u64 {
        match self.gateway.token_balance(&self.principal).await {
            Ok(balance) => self.balance = balance,
            Err(e) => warn!("Balance refresh failed, keeping stale value: {}", e),
        }
        self.balance
    }

    /// Purchases `kind` for the active round.
    ///
    /// Insufficient cached balance and repeat purchases fail locally
    /// without any RPC. A backend rejection or transport failure leaves
    /// the hint locked and the balance untouched.
    pub async fn purchase(
        &mut self,
        session_id: &str,
        round_hints: &mut RoundHints,
        kind: HintType,
        difficulty: Difficulty,
    ) -> Result<HintContent, HintError> {
        if round_hints.is_unlocked(kind) {
            return Err(HintError::AlreadyUnlocked(kind));
        }
        let required = effective_cost(kind, difficulty);
        if self.balance < required {
            return Err(HintError::InsufficientBalance {
                required,
                available: self.balance,
            });
        }

        let content = self.gateway.purchase_hint(session_id, kind).await?;
        round_hints.unlock(kind, content.clone());
        info!("Hint {} unlocked for {} units", kind, required);

        self.refresh_balance().await;
        Ok(content)
    }
}
