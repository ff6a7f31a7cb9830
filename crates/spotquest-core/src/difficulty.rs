use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The closed set of difficulty levels.
///
/// The enum is total: every variant has a profile, so an "unknown
/// difficulty" cannot exist past the parsing boundary. Parsing a
/// difficulty name (CLI flag, config) is the only fallible path.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Extreme,
}

/// Static per-difficulty tuning table. Not persisted per-session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Round countdown length.
    pub time_limit_secs: u64,
    /// Applied to the locally computed fallback score.
    pub score_multiplier: f64,
    /// Applied to hint base costs.
    pub hint_cost_multiplier: f64,
    /// Initial map zoom for the presentation layer.
    pub starting_zoom: u8,
}

impl Difficulty {
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                time_limit_secs: 90,
                score_multiplier: 0.8,
                hint_cost_multiplier: 0.8,
                starting_zoom: 12,
            },
            Difficulty::Normal => DifficultyProfile {
                time_limit_secs: 60,
                score_multiplier: 1.0,
                hint_cost_multiplier: 1.0,
                starting_zoom: 10,
            },
            Difficulty::Hard => DifficultyProfile {
                time_limit_secs: 45,
                score_multiplier: 1.25,
                hint_cost_multiplier: 1.25,
                starting_zoom: 8,
            },
            Difficulty::Extreme => DifficultyProfile {
                time_limit_secs: 30,
                score_multiplier: 1.5,
                hint_cost_multiplier: 1.5,
                starting_zoom: 6,
            },
        }
    }
}
