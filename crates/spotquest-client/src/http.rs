//! Reqwest-backed implementation of the game backend gateway.

use async_trait::async_trait;
use reqwest::{Client, Response};
use spotquest_core::gateway::{BackendGateway, GatewayError, GatewayResult};
use spotquest_protocol::{
    GuessSubmission, HintContent, HintType, RoundInfo, RoundOutcome, SessionEntry, SessionSummary,
};

use crate::models::{
    BalanceResponse, CreateSessionResponse, ErrorResponse, HintRequest, SessionListResponse,
};

pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_error(response: Response) -> GatewayError {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => classify_error(&body.error),
            Err(_) => GatewayError::Rejected(format!("HTTP {}", status)),
        }
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

/// Maps the backend's known error strings to typed variants. This is
/// the only place those strings are matched; everything above this
/// boundary works with `GatewayError` variants.
pub fn classify_error(message: &str) -> GatewayError {
    let lower = message.to_lowercase();
    if lower.contains("session already ended") {
        GatewayError::SessionEnded
    } else if lower.contains("insufficient balance") {
        GatewayError::InsufficientFunds(message.to_string())
    } else if lower.contains("already purchased") {
        GatewayError::AlreadyPurchased
    } else {
        GatewayError::Rejected(message.to_string())
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn create_session(&self) -> GatewayResult<String> {
        let response = self
            .client
            .post(self.url("/sessions"))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        let body: CreateSessionResponse = response.json().await.map_err(transport)?;
        Ok(body.session_id)
    }

    async fn get_next_round(
        &self,
        session_id: &str,
        region: Option<&str>,
    ) -> GatewayResult<RoundInfo> {
        let mut request = self
            .client
            .get(self.url(&format!("/sessions/{}/round", session_id)));
        if let Some(tag) = region {
            request = request.query(&[("region", tag)]);
        }
        let response = request.send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn submit_guess(
        &self,
        session_id: &str,
        guess: &GuessSubmission,
    ) -> GatewayResult<RoundOutcome> {
        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/guess", session_id)))
            .json(guess)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn purchase_hint(&self, session_id: &str, hint: HintType) -> GatewayResult<HintContent> {
        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/hints", session_id)))
            .json(&HintRequest { hint_type: hint })
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn token_balance(&self, principal: &str) -> GatewayResult<u64> {
        let response = self
            .client
            .get(self.url(&format!("/balance/{}", principal)))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        let body: BalanceResponse = response.json().await.map_err(transport)?;
        Ok(body.balance)
    }

    async fn finalize_session(&self, session_id: &str) -> GatewayResult<SessionSummary> {
        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/finalize", session_id)))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn abandon_session(&self, session_id: &str) -> GatewayResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/abandon", session_id)))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        Ok(())
    }

    async fn list_sessions(&self, principal: &str) -> GatewayResult<Vec<SessionEntry>> {
        let response = self
            .client
            .get(self.url("/sessions"))
            .query(&[("principal", principal)])
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        let body: SessionListResponse = response.json().await.map_err(transport)?;
        Ok(body.sessions)
    }
}
