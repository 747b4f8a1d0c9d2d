//! Fixed protocol values shared across the crate.

pub const DEFAULT_BASE_URL: &str = "https://community.steam-api.com";

/// Server scoring window: one score report per 110 seconds.
pub const REPORT_INTERVAL_SECS: u64 = 110;
/// Cadence of boss damage reports.
pub const BOSS_INTERVAL_SECS: u64 = 5;
/// Pause before restarting a round after an API failure.
pub const BACKOFF_SECS: u64 = 10;
/// Consecutive sub-Hard reports before the round ends and selection reruns.
pub const DEFAULT_EXPLORE_THRESHOLD: u32 = 10;
/// The remote has no request timeout of its own; never hang on it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const BOSS_DAMAGE_PER_REPORT: u32 = 100;
pub const HEAL_CHARGE_START: u8 = 7;

/// Zone `type` value that marks a boss-capable zone.
pub const BOSS_ZONE_TYPE: u8 = 4;
/// Zones at or past this capture progress are not worth joining.
pub const CAPTURE_PROGRESS_CUTOFF: f64 = 0.9;

pub const REPORT_LANGUAGE: &str = "english";

pub const EP_GET_PLANETS: &str = "/ITerritoryControlMinigameService/GetPlanets/v0001/";
pub const EP_GET_PLANET: &str = "/ITerritoryControlMinigameService/GetPlanet/v0001/";
pub const EP_GET_PLAYER_INFO: &str = "/ITerritoryControlMinigameService/GetPlayerInfo/v0001/";
pub const EP_LEAVE_GAME: &str = "/IMiniGameService/LeaveGame/v0001/";
pub const EP_JOIN_PLANET: &str = "/ITerritoryControlMinigameService/JoinPlanet/v0001/";
pub const EP_JOIN_ZONE: &str = "/ITerritoryControlMinigameService/JoinZone/v0001/";
pub const EP_JOIN_BOSS_ZONE: &str = "/ITerritoryControlMinigameService/JoinBossZone/v0001/";
pub const EP_REPORT_SCORE: &str = "/ITerritoryControlMinigameService/ReportScore/v0001/";
pub const EP_REPORT_BOSS_DAMAGE: &str =
    "/ITerritoryControlMinigameService/ReportBossDamage/v0001/";

// The service expects a browser-shaped client.
pub const HEADER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/67.0.3396.87 Safari/537.36";
pub const HEADER_REFERER: &str = "https://steamcommunity.com/saliengame/play/";
pub const HEADER_ORIGIN: &str = "https://steamcommunity.com";
pub const HEADER_ACCEPT: &str = "*/*";
