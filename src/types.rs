//! Wire types for the minigame API plus the difficulty enumeration.
//!
//! The service wraps every body in `{"response": ...}` and serializes most
//! numeric fields as JSON strings, so score-shaped fields deserialize through
//! [`de_u64`].

use core::fmt;

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;

/// Zone difficulty tier. `Trivial` is the undefined slot of the score table,
/// `Boss` is the boss sentinel; neither carries a score award.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Trivial,
    Easy,
    Medium,
    Hard,
    Boss,
}

impl Difficulty {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Trivial),
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            4 => Some(Self::Boss),
            _ => None,
        }
    }

    /// Fixed score award per report. `None` for the tiers with no defined
    /// table entry.
    pub fn award(self) -> Option<u32> {
        match self {
            Self::Easy => Some(600),
            Self::Medium => Some(1_200),
            Self::Hard => Some(2_400),
            Self::Trivial | Self::Boss => None,
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trivial => write!(f, "trivial"),
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
            Self::Boss => write!(f, "boss"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlanetState {
    pub name: String,
}

/// Planet as returned by both the listing and detail endpoints; the listing
/// omits `zones`.
#[derive(Clone, Debug, Deserialize)]
pub struct Planet {
    pub id: String,
    pub state: PlanetState,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlanetList {
    #[serde(default)]
    pub planets: Vec<Planet>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Zone {
    pub zone_position: u32,
    #[serde(rename = "type")]
    pub zone_type: u8,
    pub difficulty: u8,
    #[serde(default)]
    pub captured: bool,
    #[serde(default)]
    pub capture_progress: f64,
    #[serde(default)]
    pub boss_active: bool,
}

/// Current engagement for the account. All fields absent means no active
/// session.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerStatus {
    #[serde(default)]
    pub active_planet: Option<String>,
    #[serde(default)]
    pub active_zone_game: Option<String>,
    #[serde(default)]
    pub active_boss_game: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct JoinedZone {
    pub zone_info: Zone,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ScoreStats {
    #[serde(deserialize_with = "de_u64")]
    pub old_score: u64,
    #[serde(deserialize_with = "de_u64")]
    pub new_score: u64,
    #[serde(deserialize_with = "de_u64")]
    pub next_level_score: u64,
    #[serde(deserialize_with = "de_u64")]
    pub old_level: u64,
    #[serde(deserialize_with = "de_u64")]
    pub new_level: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BossReport {
    #[serde(default)]
    pub waiting_for_players: bool,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub boss_status: Option<BossStatus>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BossStatus {
    #[serde(default, deserialize_with = "de_u64")]
    pub boss_hp: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub boss_max_hp: u64,
    #[serde(default)]
    pub boss_players: Vec<BossPlayer>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BossPlayer {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_u64")]
    pub hp: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub max_hp: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub xp_earned: u64,
}

/// Accepts either a JSON number or a numeric string.
fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| DeError::custom("expected an unsigned integer")),
        serde_json::Value::String(text) => text
            .parse::<u64>()
            .map_err(|err| DeError::custom(format!("invalid numeric string: {err}"))),
        other => Err(DeError::custom(format!(
            "expected number or numeric string, got {other}"
        ))),
    }
}
