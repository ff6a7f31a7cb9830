use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle state of a session as reported by the backend.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SessionStatus {
    Active,
    Completed,
    Abandoned,
}

/// The fixed catalog of purchasable hint types.
/// Each type can be unlocked at most once per round.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HintType {
    BasicRadius,
    PremiumRadius,
    DirectionHint,
}

/// One of the 8 compass labels a direction hint can resolve to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// The partial-location payload returned by a successful hint purchase.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HintContent {
    /// A circle the photo location is guaranteed to fall inside.
    Radius {
        center_lat: f64,
        center_lon: f64,
        radius_m: f64,
    },
    /// The compass direction from the map's starting center to the photo.
    Direction { direction: CompassDirection },
}
