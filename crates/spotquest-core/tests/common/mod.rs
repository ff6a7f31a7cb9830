#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use spotquest_core::gateway::{BackendGateway, GatewayError, GatewayResult};
use spotquest_core::session::Guess;
use spotquest_protocol::{
    CompassDirection, GuessSubmission, HintContent, HintType, RoundInfo, RoundOutcome,
    SessionEntry, SessionSummary,
};

/// Eiffel Tower; every mock round uses the same photo location.
pub const PHOTO_LAT: f64 = 48.8584;
pub const PHOTO_LON: f64 = 2.2945;

pub const SESSION_ID: &str = "sess-1";

#[derive(Default, Clone)]
pub struct Calls {
    pub create_session: usize,
    pub get_next_round: usize,
    pub submit_guess: usize,
    pub purchase_hint: usize,
    pub token_balance: usize,
    pub finalize_session: usize,
    pub abandon_session: usize,
    pub list_sessions: usize,
}

/// Scriptable in-memory backend. Tests flip the failure knobs directly
/// and assert on the call counters afterwards.
pub struct MockGateway {
    pub calls: Mutex<Calls>,
    pub balance: Mutex<u64>,
    pub fail_submit: Mutex<bool>,
    pub fail_balance: Mutex<bool>,
    pub next_round_error: Mutex<Option<GatewayError>>,
    pub hint_error: Mutex<Option<GatewayError>>,
    pub server_sessions: Mutex<Vec<SessionEntry>>,
    pub outcome: Mutex<Option<RoundOutcome>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Calls::default()),
            balance: Mutex::new(1000),
            fail_submit: Mutex::new(false),
            fail_balance: Mutex::new(false),
            next_round_error: Mutex::new(None),
            hint_error: Mutex::new(None),
            server_sessions: Mutex::new(Vec::new()),
            outcome: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn create_session(&self) -> GatewayResult<String> {
        self.calls.lock().unwrap().create_session += 1;
        Ok(SESSION_ID.to_string())
    }

    async fn get_next_round(
        &self,
        _session_id: &str,
        region: Option<&str>,
    ) -> GatewayResult<RoundInfo> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.get_next_round += 1;
            calls.get_next_round as u32
        };
        if let Some(e) = self.next_round_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(RoundInfo {
            photo_id: 100 + u64::from(n),
            round_number: n,
            photo_lat: PHOTO_LAT,
            photo_lon: PHOTO_LON,
            region: region.map(str::to_string),
        })
    }

    async fn submit_guess(
        &self,
        _session_id: &str,
        guess: &GuessSubmission,
    ) -> GatewayResult<RoundOutcome> {
        self.calls.lock().unwrap().submit_guess += 1;
        if *self.fail_submit.lock().unwrap() {
            return Err(GatewayError::Transport("connection reset".into()));
        }
        if let Some(outcome) = self.outcome.lock().unwrap().clone() {
            return Ok(outcome);
        }
        // Default authoritative result: perfect score for an on-target
        // guess, a flat mid score otherwise.
        let on_target =
            (guess.lat - PHOTO_LAT).abs() < 1e-9 && (guess.lon - PHOTO_LON).abs() < 1e-9;
        let score = if on_target { 5000 } else { 4200 };
        Ok(RoundOutcome {
            score,
            score_norm: score / 50,
            actual_lat: PHOTO_LAT,
            actual_lon: PHOTO_LON,
        })
    }

    async fn purchase_hint(&self, _session_id: &str, hint: HintType) -> GatewayResult<HintContent> {
        self.calls.lock().unwrap().purchase_hint += 1;
        if let Some(e) = self.hint_error.lock().unwrap().clone() {
            return Err(e);
        }
        let cost: u64 = match hint {
            HintType::BasicRadius => 100,
            HintType::PremiumRadius => 300,
            HintType::DirectionHint => 100,
        };
        let mut balance = self.balance.lock().unwrap();
        *balance = balance.saturating_sub(cost);
        Ok(match hint {
            HintType::DirectionHint => HintContent::Direction {
                direction: CompassDirection::NorthEast,
            },
            HintType::BasicRadius => HintContent::Radius {
                center_lat: PHOTO_LAT,
                center_lon: PHOTO_LON,
                radius_m: 5000.0,
            },
            HintType::PremiumRadius => HintContent::Radius {
                center_lat: PHOTO_LAT,
                center_lon: PHOTO_LON,
                radius_m: 1000.0,
            },
        })
    }

    async fn token_balance(&self, _principal: &str) -> GatewayResult<u64> {
        self.calls.lock().unwrap().token_balance += 1;
        if *self.fail_balance.lock().unwrap() {
            return Err(GatewayError::Transport("balance service down".into()));
        }
        Ok(*self.balance.lock().unwrap())
    }

    async fn finalize_session(&self, session_id: &str) -> GatewayResult<SessionSummary> {
        self.calls.lock().unwrap().finalize_session += 1;
        Ok(SessionSummary {
            session_id: session_id.to_string(),
            total_score: 0,
            rounds_played: 5,
            reward_units: 10,
        })
    }

    async fn abandon_session(&self, _session_id: &str) -> GatewayResult<()> {
        self.calls.lock().unwrap().abandon_session += 1;
        Ok(())
    }

    async fn list_sessions(&self, _principal: &str) -> GatewayResult<Vec<SessionEntry>> {
        self.calls.lock().unwrap().list_sessions += 1;
        Ok(self.server_sessions.lock().unwrap().clone())
    }
}

/// A guess with just coordinates, the way most tests place one.
pub fn guess_at(lat: f64, lon: f64) -> Guess {
    Guess {
        lat,
        lon,
        azimuth: None,
        confidence_radius: 100.0,
    }
}
