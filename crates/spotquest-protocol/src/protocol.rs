use crate::types::SessionStatus;
use serde::{Deserialize, Serialize};

/// Round descriptor handed out by the backend when a new round begins.
///
/// The photo coordinates are part of the descriptor because the client
/// already owns the photo metadata; the backend stays authoritative for
/// scoring, but the client needs the location for its local fallback
/// score and for the results view when the submit RPC fails.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundInfo {
    pub photo_id: u64,
    pub round_number: u32,
    pub photo_lat: f64,
    pub photo_lon: f64,
    #[serde(default)]
    pub region: Option<String>,
}

/// A player's guess as submitted to the backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GuessSubmission {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub azimuth: Option<f64>,
    pub confidence_radius: f64,
}

/// Authoritative per-round result computed by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    /// Raw reward-linked score.
    pub score: u32,
    /// 0-100 normalized score.
    pub score_norm: u32,
    pub actual_lat: f64,
    pub actual_lon: f64,
}

/// Settlement summary returned when a session is finalized.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_score: u64,
    pub rounds_played: u32,
    pub reward_units: u64,
}

/// One entry of the backend's per-player session list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionEntry {
    pub session_id: String,
    pub status: SessionStatus,
}
