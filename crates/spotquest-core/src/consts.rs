/// Number of rounds in a full session.
pub const MAX_ROUNDS: u32 = 5;

/// Mean Earth radius in meters, used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Guesses within this many meters of the photo score the maximum.
pub const PERFECT_GUESS_RADIUS_M: f64 = 10.0;

/// Maximum raw score a single round can produce.
pub const SCORE_MAX: u32 = 5000;

/// Exponential decay applied to the score per kilometer of guess error.
pub const SCORE_DECAY_PER_KM: f64 = 0.15;
