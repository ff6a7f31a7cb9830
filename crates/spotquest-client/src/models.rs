use serde::{Deserialize, Serialize};
use spotquest_protocol::{HintType, SessionEntry};

#[derive(Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct BalanceResponse {
    pub balance: u64,
}

#[derive(Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionEntry>,
}

#[derive(Serialize)]
pub struct HintRequest {
    pub hint_type: HintType,
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
