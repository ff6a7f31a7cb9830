//! Round-scoped mutual exclusion for terminal transitions.
//!
//! A round can end through three independent callback sources: the user
//! submitting a guess, the countdown expiring, and the user navigating
//! away. Exactly one of them may win. Instead of scattering boolean
//! flags across the call sites, all round-ending logic is gated behind a
//! single atomic claim on this guard.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// The event that ends a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    GuessSubmitted,
    TimedOut,
    Abandoned,
}

impl TransitionKind {
    fn code(self) -> u8 {
        match self {
            TransitionKind::GuessSubmitted => 1,
            TransitionKind::TimedOut => 2,
            TransitionKind::Abandoned => 3,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TransitionKind::GuessSubmitted),
            2 => Some(TransitionKind::TimedOut),
            3 => Some(TransitionKind::Abandoned),
            _ => None,
        }
    }
}

const UNCLAIMED: u8 = 0;

#[derive(Debug, Default)]
pub struct TransitionGuard {
    claimed: AtomicU8,
    navigating_away: AtomicBool,
    timeout_handled: AtomicBool,
}

impl TransitionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims the round's single terminal transition.
    /// Returns `true` only to the first caller; all later attempts must
    /// be treated as no-ops by their callers.
    pub fn try_claim(&self, kind: TransitionKind) -> bool {
        self.claimed
            .compare_exchange(UNCLAIMED, kind.code(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst) != UNCLAIMED
    }

    /// Which event won the round, if any.
    pub fn claimed_by(&self) -> Option<TransitionKind> {
        TransitionKind::from_code(self.claimed.load(Ordering::SeqCst))
    }

    /// Navigating away suppresses further timer callbacks but is not by
    /// itself a terminal transition (pausing is not abandoning).
    pub fn mark_navigating_away(&self) {
        self.navigating_away.store(true, Ordering::SeqCst);
    }

    pub fn is_navigating_away(&self) -> bool {
        self.navigating_away.load(Ordering::SeqCst)
    }

    /// Marks the round's timeout as handled. Returns `true` only the
    /// first time, so duplicate timeout deliveries are dropped.
    pub fn mark_timeout_handled(&self) -> bool {
        !self.timeout_handled.swap(true, Ordering::SeqCst)
    }

    pub fn timeout_handled(&self) -> bool {
        self.timeout_handled.load(Ordering::SeqCst)
    }

    /// Reopens the guard for a new round.
    pub fn reset(&self) {
        self.claimed.store(UNCLAIMED, Ordering::SeqCst);
        self.navigating_away.store(false, Ordering::SeqCst);
        self.timeout_handled.store(false, Ordering::SeqCst);
    }
}
