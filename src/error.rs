use core::fmt;

use crate::types::Difficulty;

/// Why a single network call failed, kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallFailure {
    /// Non-success HTTP status.
    Status(u16),
    /// HTTP 200 with the `{"response": {}}` sentinel body.
    EmptyBody,
    /// Connection / request-level failure before a status was available.
    Transport(String),
    /// Body arrived but did not decode into the expected shape.
    Decode(String),
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "status code {code}"),
            Self::EmptyBody => write!(f, "empty response body"),
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
            Self::Decode(reason) => write!(f, "malformed response: {reason}"),
        }
    }
}

/// One failure kind per API operation. The driver treats them uniformly;
/// the kind exists so logs say which call went wrong.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiError {
    ZoneQuery(CallFailure),
    UserInfo(CallFailure),
    Leave(CallFailure),
    JoinPlanet(CallFailure),
    JoinZone(CallFailure),
    JoinBoss(CallFailure),
    /// Score reported for a difficulty with no defined award. Raised before
    /// any network call is issued.
    InvalidDifficulty(Difficulty),
    ReportScore(CallFailure),
    BossReport(CallFailure),
    /// No planet had an eligible zone.
    NoZoneAvailable,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoneQuery(cause) => write!(f, "planet/zone query failed: {cause}"),
            Self::UserInfo(cause) => write!(f, "player info query failed: {cause}"),
            Self::Leave(cause) => write!(f, "leave game failed: {cause}"),
            Self::JoinPlanet(cause) => write!(f, "join planet failed: {cause}"),
            Self::JoinZone(cause) => write!(f, "join zone failed: {cause}"),
            Self::JoinBoss(cause) => write!(f, "join boss zone failed: {cause}"),
            Self::InvalidDifficulty(difficulty) => {
                write!(f, "no score award defined for difficulty {difficulty}")
            }
            Self::ReportScore(cause) => write!(f, "report score failed: {cause}"),
            Self::BossReport(cause) => write!(f, "report boss damage failed: {cause}"),
            Self::NoZoneAvailable => write!(f, "no zones available"),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
