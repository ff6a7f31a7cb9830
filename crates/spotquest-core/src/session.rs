//! Session and round lifecycle orchestration.
//!
//! `SessionController` owns the Session/Round aggregate exclusively: it
//! creates sessions, serves rounds, runs the countdown, accepts at most
//! one guess per round, reconciles backend divergence, and finalizes or
//! abandons the session. The presentation layer drives it with discrete
//! events (user submitted, countdown expired, user left) and reads state
//! back through accessors; it never mutates the aggregate directly.

use std::sync::Arc;
use std::time::Instant;

use spotquest_protocol::{
    GuessSubmission, HintContent, HintType, RoundInfo, SessionStatus, SessionSummary,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::consts::MAX_ROUNDS;
use crate::difficulty::Difficulty;
use crate::error::{GameError, GameResult};
use crate::gateway::{BackendGateway, GatewayError};
use crate::guard::{TransitionGuard, TransitionKind};
use crate::hints::{HintEconomy, RoundHints};
use crate::scoring;
use crate::timer::RoundTimer;

/// Countdown events pushed to the presentation layer.
///
/// On `TimedOut` the consumer must call
/// `submit_guess(pending_guess, true)`; the controller's guard makes the
/// call a no-op if the user's submit already won the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick { remaining_secs: u64 },
    TimedOut,
}

/// Controller state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Creating,
    /// Session exists, no round running (between rounds).
    RoundPending,
    RoundActive,
    RoundResolving,
    Finalizing,
    Completed,
    Abandoned,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Abandoned)
    }
}

/// A player's placed guess.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guess {
    pub lat: f64,
    pub lon: f64,
    pub azimuth: Option<f64>,
    pub confidence_radius: f64,
}

/// Immutable record of a resolved round, suitable for a results view.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round_number: u32,
    pub photo_id: u64,
    pub guess: Option<Guess>,
    pub actual_lat: f64,
    pub actual_lon: f64,
    pub score: u32,
    pub score_norm: u32,
    pub elapsed_secs: u64,
    pub difficulty: Difficulty,
    /// False when the backend call failed and the local fallback score
    /// was used instead.
    pub authoritative: bool,
}

/// What `next_round` produced.
#[derive(Debug, Clone)]
pub enum RoundAdvance {
    Started(RoundStart),
    /// Reconciliation determined the session is already over; proceed to
    /// the session summary instead of a new round.
    SessionOver,
}

#[derive(Debug, Clone)]
pub struct RoundStart {
    pub info: RoundInfo,
    pub time_limit_secs: u64,
    pub starting_zoom: u8,
}

struct ActiveRound {
    info: RoundInfo,
    started_at: Instant,
    hints: RoundHints,
}

pub struct SessionController {
    gateway: Arc<dyn BackendGateway>,
    principal: String,
    difficulty: Difficulty,
    phase: Phase,
    session_id: Option<String>,
    round_number: u32,
    results: Vec<RoundRecord>,
    round: Option<ActiveRound>,
    timer: RoundTimer,
    guard: Arc<TransitionGuard>,
    economy: HintEconomy,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionController {
    /// Builds a controller around an injected gateway. The returned
    /// receiver carries the countdown events for the active round.
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        principal: impl Into<String>,
        difficulty: Difficulty,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let principal = principal.into();
        let economy = HintEconomy::new(gateway.clone(), principal.clone());
        let controller = Self {
            gateway,
            principal,
            difficulty,
            phase: Phase::Uninitialized,
            session_id: None,
            round_number: 0,
            results: Vec::new(),
            round: None,
            timer: RoundTimer::new(),
            guard: Arc::new(TransitionGuard::new()),
            economy,
            events,
        };
        (controller, rx)
    }

    // --- Accessors ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// 1-based number of the round currently being played or pending.
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn results(&self) -> &[RoundRecord] {
        &self.results
    }

    pub fn total_score(&self) -> u64 {
        self.results.iter().map(|r| u64::from(r.score)).sum()
    }

    pub fn current_round(&self) -> Option<&RoundInfo> {
        self.round.as_ref().map(|r| &r.info)
    }

    pub fn unlocked_hints(&self) -> &[(HintType, HintContent)] {
        self.round
            .as_ref()
            .map(|r| r.hints.unlocked())
            .unwrap_or(&[])
    }

    pub fn balance(&self) -> u64 {
        self.economy.balance()
    }

    // --- Lifecycle operations ---

    /// Creates a fresh session. Any stale Active session is neutralized
    /// first: marked completed locally and settled best-effort on the
    /// backend, so it is never left orphaned server-side.
    pub async fn create_session(&mut self) -> GameResult<String> {
        if !self.phase.is_terminal() && self.phase != Phase::Uninitialized {
            self.timer.cancel();
            if let Some(stale) = self.session_id.take() {
                warn!("Stale active session {} found; settling before recreate", stale);
                if let Err(e) = self.gateway.finalize_session(&stale).await {
                    warn!("Stale session settlement failed: {}", e);
                }
            }
        }

        self.phase = Phase::Creating;
        self.results.clear();
        self.round = None;

        let id = match self.gateway.create_session().await {
            Ok(id) => id,
            Err(e) => {
                self.phase = Phase::Uninitialized;
                return Err(e.into());
            }
        };

        info!("Session {} created ({})", id, self.difficulty);
        self.session_id = Some(id.clone());
        self.round_number = 1;
        self.phase = Phase::RoundPending;
        self.economy.refresh_balance().await;
        Ok(id)
    }

    /// Fetches the next round descriptor and starts its countdown.
    ///
    /// A backend `SessionEnded` reply is not treated as fatal here: it
    /// is reconciled (round bound, recorded results, then the backend's
    /// own session list) and reported as `SessionOver` when a consistent
    /// completed state can be established.
    pub async fn next_round(&mut self, region: Option<&str>) -> GameResult<RoundAdvance> {
        if self.phase != Phase::RoundPending {
            return Err(GameError::State(format!(
                "cannot start a round from {:?}",
                self.phase
            )));
        }
        let session_id = self.require_session()?;

        let info = match self.gateway.get_next_round(&session_id, region).await {
            Ok(info) => info,
            Err(GatewayError::SessionEnded) => {
                self.reconcile_session_ended().await?;
                return Ok(RoundAdvance::SessionOver);
            }
            Err(e) => return Err(e.into()),
        };
        // A malformed descriptor is rejected here, while the round has
        // not started, so resolution later cannot fail on bad photo
        // coordinates.
        scoring::validate_coordinates(info.photo_lat, info.photo_lon)?;

        // Fresh guard per round: stale closures from the previous round
        // keep their own (already-claimed) instance.
        self.guard = Arc::new(TransitionGuard::new());

        let profile = self.difficulty.profile();
        let tick_events = self.events.clone();
        let expire_events = self.events.clone();
        let guard = self.guard.clone();
        self.timer.start(
            profile.time_limit_secs,
            move |remaining| {
                let _ = tick_events.send(SessionEvent::Tick {
                    remaining_secs: remaining,
                });
            },
            move || {
                if guard.is_navigating_away() || guard.is_claimed() {
                    debug!("Countdown expired after the round already resolved; dropping");
                    return;
                }
                if guard.mark_timeout_handled() {
                    let _ = expire_events.send(SessionEvent::TimedOut);
                }
            },
        );

        self.round = Some(ActiveRound {
            info: info.clone(),
            started_at: Instant::now(),
            hints: RoundHints::default(),
        });
        self.phase = Phase::RoundActive;
        info!(
            "Round {}/{} started (photo {}, {}s)",
            self.round_number, MAX_ROUNDS, info.photo_id, profile.time_limit_secs
        );

        Ok(RoundAdvance::Started(RoundStart {
            info,
            time_limit_secs: profile.time_limit_secs,
            starting_zoom: profile.starting_zoom,
        }))
    }

    /// The single round-resolution path, shared by the manual submit and
    /// the countdown timeout.
    ///
    /// Returns `Ok(None)` when the round was already resolved by the
    /// competing path (the loser of the race is dropped silently, per
    /// the guard contract). A manual submit without coordinates is a
    /// validation error and leaves the round active.
    pub async fn submit_guess(
        &mut self,
        guess: Option<Guess>,
        is_timeout: bool,
    ) -> GameResult<Option<RoundRecord>> {
        if self.phase != Phase::RoundActive {
            if is_timeout {
                debug!("Timeout for a round that is no longer active; dropping");
                return Ok(None);
            }
            return Err(GameError::State(format!(
                "no active round to submit to (phase {:?})",
                self.phase
            )));
        }
        if !is_timeout && guess.is_none() {
            return Err(GameError::Validation(
                "place a guess on the map before submitting".into(),
            ));
        }
        if let Some(g) = &guess {
            scoring::validate_coordinates(g.lat, g.lon)?;
        }

        let kind = if is_timeout {
            TransitionKind::TimedOut
        } else {
            TransitionKind::GuessSubmitted
        };
        if !self.guard.try_claim(kind) {
            debug!(
                "Round already resolved by {:?}; dropping {:?}",
                self.guard.claimed_by(),
                kind
            );
            return Ok(None);
        }

        self.phase = Phase::RoundResolving;
        self.timer.cancel();

        let Some(round) = self.round.take() else {
            return Err(GameError::State("round state missing during resolution".into()));
        };
        let session_id = self.require_session()?;
        let elapsed_secs = round.started_at.elapsed().as_secs();

        // Local fallback score, computed up front so a backend failure
        // can never block the player from seeing a result.
        let profile = self.difficulty.profile();
        let (local_score, local_norm) = match &guess {
            Some(g) => {
                let distance =
                    scoring::distance_meters(g.lat, g.lon, round.info.photo_lat, round.info.photo_lon)?;
                let raw = scoring::score(distance);
                let scaled = (f64::from(raw) * profile.score_multiplier).round() as u32;
                (scaled, scoring::score_norm(raw))
            }
            // Timed out with nothing placed: zero-score round, nothing
            // to submit.
            None => (0, 0),
        };

        let outcome = match &guess {
            Some(g) => {
                let submission = GuessSubmission {
                    lat: g.lat,
                    lon: g.lon,
                    azimuth: g.azimuth,
                    confidence_radius: g.confidence_radius,
                };
                match self.gateway.submit_guess(&session_id, &submission).await {
                    Ok(outcome) => Some(outcome),
                    Err(e) => {
                        warn!("Guess submission failed, using local fallback score: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        let record = match outcome {
            Some(o) => RoundRecord {
                round_number: self.round_number,
                photo_id: round.info.photo_id,
                guess,
                actual_lat: o.actual_lat,
                actual_lon: o.actual_lon,
                score: o.score,
                score_norm: o.score_norm,
                elapsed_secs,
                difficulty: self.difficulty,
                authoritative: true,
            },
            None => RoundRecord {
                round_number: self.round_number,
                photo_id: round.info.photo_id,
                guess,
                actual_lat: round.info.photo_lat,
                actual_lon: round.info.photo_lon,
                score: local_score,
                score_norm: local_norm,
                elapsed_secs,
                difficulty: self.difficulty,
                authoritative: false,
            },
        };
        info!(
            "Round {} resolved: {} points ({})",
            record.round_number,
            record.score,
            if record.authoritative { "server" } else { "local" }
        );
        self.results.push(record.clone());

        if self.round_number >= MAX_ROUNDS {
            self.finalize_session().await?;
        } else {
            self.round_number += 1;
            self.phase = Phase::RoundPending;
        }
        Ok(Some(record))
    }

    /// Purchases a hint for the active round.
    pub async fn purchase_hint(&mut self, kind: HintType) -> GameResult<HintContent> {
        if self.phase != Phase::RoundActive {
            return Err(GameError::State(
                "hints can only be bought during an active round".into(),
            ));
        }
        let session_id = self.require_session()?;
        let Some(round) = self.round.as_mut() else {
            return Err(GameError::State("round state missing".into()));
        };
        let content = self
            .economy
            .purchase(&session_id, &mut round.hints, kind, self.difficulty)
            .await?;
        Ok(content)
    }

    /// Refreshes the cached token balance (non-critical; stale on error).
    pub async fn refresh_balance(&mut self) -> u64 {
        self.economy.refresh_balance().await
    }

    /// Settles the session with the backend. Idempotent: once terminal,
    /// later calls are no-ops and issue no RPC. A settlement failure is
    /// logged and the session still completes locally.
    pub async fn finalize_session(&mut self) -> GameResult<Option<SessionSummary>> {
        if self.phase.is_terminal() {
            debug!("Finalize on a terminal session; nothing to do");
            return Ok(None);
        }
        self.timer.cancel();
        self.phase = Phase::Finalizing;

        let summary = match &self.session_id {
            Some(id) => match self.gateway.finalize_session(id).await {
                Ok(summary) => {
                    info!(
                        "Session settled: {} points over {} rounds",
                        summary.total_score, summary.rounds_played
                    );
                    Some(summary)
                }
                Err(e) => {
                    warn!("Finalize failed; completing locally: {}", e);
                    None
                }
            },
            None => None,
        };

        self.phase = Phase::Completed;
        Ok(summary)
    }

    /// Marks the session Abandoned locally and best-effort notifies the
    /// backend. Idempotent; a failed notification never blocks leaving.
    pub async fn abandon_session(&mut self) -> GameResult<()> {
        if self.phase.is_terminal() {
            return Ok(());
        }
        self.timer.cancel();
        self.guard.try_claim(TransitionKind::Abandoned);

        if let Some(id) = &self.session_id {
            if let Err(e) = self.gateway.abandon_session(id).await {
                warn!("Abandon notification failed: {}", e);
            }
        }
        self.phase = Phase::Abandoned;
        info!("Session abandoned");
        Ok(())
    }

    /// Navigation-away path: cancels the countdown, suppresses any
    /// further timer callbacks, and abandons the session if it was still
    /// in play so the backend is not left with an orphaned Active
    /// session.
    pub async fn leave(&mut self) -> GameResult<()> {
        self.guard.mark_navigating_away();
        self.timer.cancel();
        match self.phase {
            Phase::Creating | Phase::RoundPending | Phase::RoundActive | Phase::RoundResolving => {
                self.abandon_session().await
            }
            _ => Ok(()),
        }
    }

    // --- Internals ---

    fn require_session(&self) -> GameResult<String> {
        self.session_id
            .clone()
            .ok_or_else(|| GameError::State("no session exists".into()))
    }

    /// Resolves a backend "session already ended" reply against local
    /// state. Three heuristics in order; only when all fail is the
    /// divergence surfaced to the caller.
    async fn reconcile_session_ended(&mut self) -> GameResult<()> {
        // (a) The final round was already played: a normal completion.
        if self.round_number >= MAX_ROUNDS {
            info!("Backend reports session over at the round bound; completing normally");
            self.phase = Phase::Completed;
            return Ok(());
        }

        // (b) Some rounds were recorded: treat as an early server-side
        // completion rather than an error.
        if !self.results.is_empty() {
            warn!(
                "Backend ended session early with {} rounds recorded; completing",
                self.results.len()
            );
            self.phase = Phase::Completed;
            return Ok(());
        }

        // (c) Last resort: ask the backend for its own session list.
        let session_id = self.require_session()?;
        match self.gateway.list_sessions(&self.principal).await {
            Ok(entries) => {
                let server_active = entries
                    .iter()
                    .any(|e| e.session_id == session_id && e.status == SessionStatus::Active);
                if !server_active {
                    warn!(
                        "Backend confirms session {} is no longer active; completing",
                        session_id
                    );
                    self.phase = Phase::Completed;
                    Ok(())
                } else {
                    Err(GameError::SessionDesync(
                        "backend reports the session both active and ended".into(),
                    ))
                }
            }
            Err(e) => Err(GameError::SessionDesync(format!(
                "could not confirm session state with the backend: {}",
                e
            ))),
        }
    }
}
