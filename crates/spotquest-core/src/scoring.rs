//! Pure scoring math: great-circle distance and the score decay curve.
//!
//! Everything here is deterministic and side-effect free. The values
//! computed here are the *fallback* scores; whatever the backend returns
//! from a guess submission is authoritative and wins when available.

use crate::consts::{EARTH_RADIUS_M, PERFECT_GUESS_RADIUS_M, SCORE_DECAY_PER_KM, SCORE_MAX};
use crate::error::{GameError, GameResult};

/// Rejects non-finite or out-of-range coordinates.
pub fn validate_coordinates(lat: f64, lon: f64) -> GameResult<()> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(GameError::Validation(format!(
            "coordinates must be finite numbers, got ({}, {})",
            lat, lon
        )));
    }
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(GameError::Validation(format!(
            "coordinates out of range: ({}, {})",
            lat, lon
        )));
    }
    Ok(())
}

/// Great-circle (haversine) distance in meters between a guess and the
/// actual photo location.
pub fn distance_meters(
    guess_lat: f64,
    guess_lon: f64,
    actual_lat: f64,
    actual_lon: f64,
) -> GameResult<f64> {
    validate_coordinates(guess_lat, guess_lon)?;
    validate_coordinates(actual_lat, actual_lon)?;

    let phi1 = guess_lat.to_radians();
    let phi2 = actual_lat.to_radians();
    let d_phi = (actual_lat - guess_lat).to_radians();
    let d_lambda = (actual_lon - guess_lon).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    Ok(2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin())
}

/// Raw round score for a guess `distance_m` meters off target.
///
/// Within the perfect-guess radius the full score is awarded; beyond it
/// the score decays exponentially per kilometer of error.
pub fn score(distance_m: f64) -> u32 {
    if distance_m <= PERFECT_GUESS_RADIUS_M {
        return SCORE_MAX;
    }
    let km = distance_m / 1000.0;
    let raw = f64::from(SCORE_MAX) * (-SCORE_DECAY_PER_KM * km).exp();
    raw.round().clamp(0.0, f64::from(SCORE_MAX)) as u32
}

/// 0-100 normalization of a raw score.
pub fn score_norm(score: u32) -> u32 {
    (f64::from(score) / 50.0).round() as u32
}
