//! Session client: one network call per operation, with status-code and
//! empty-body validation. Retry policy lives in the controller, not here.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::config::BotConfig;
use crate::constants::{
    EP_GET_PLANET, EP_GET_PLANETS, EP_GET_PLAYER_INFO, EP_JOIN_BOSS_ZONE,
    EP_JOIN_PLANET, EP_JOIN_ZONE, EP_LEAVE_GAME, EP_REPORT_BOSS_DAMAGE, EP_REPORT_SCORE,
    HEADER_ACCEPT, HEADER_ORIGIN, HEADER_REFERER, HEADER_USER_AGENT, REPORT_LANGUAGE,
};
use crate::error::{ApiError, ApiResult, CallFailure};
use crate::types::{BossReport, Difficulty, JoinedZone, Planet, PlanetList, PlayerStatus, ScoreStats, Zone};

/// Boundary the controller plays through. [`SessionClient`] is the HTTP
/// implementation; tests drive the controller with an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait GameApi {
    async fn active_planets(&self) -> ApiResult<Vec<Planet>>;
    async fn planet_detail(&self, planet_id: &str) -> ApiResult<Planet>;
    async fn player_status(&self) -> ApiResult<PlayerStatus>;
    async fn leave(&self, game_id: &str) -> ApiResult<()>;
    async fn join_planet(&self, planet_id: &str) -> ApiResult<()>;
    async fn join_zone(&self, position: u32) -> ApiResult<Zone>;
    async fn join_boss_zone(&self, position: u32) -> ApiResult<()>;
    async fn report_score(&self, difficulty: Difficulty) -> ApiResult<ScoreStats>;
    async fn report_boss_damage(
        &self,
        use_heal: bool,
        damage_to_boss: u32,
        damage_taken: u32,
    ) -> ApiResult<BossReport>;
}

pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SessionClient {
    pub fn new(config: &BotConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(HEADER_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static(HEADER_REFERER));
        headers.insert(ORIGIN, HeaderValue::from_static(HEADER_ORIGIN));
        headers.insert(ACCEPT, HeaderValue::from_static(HEADER_ACCEPT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed building HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<(u16, String), CallFailure> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|err| CallFailure::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| CallFailure::Transport(err.to_string()))?;
        Ok((status, body))
    }

    async fn post(&self, path: &str, form: &[(&str, String)]) -> Result<(u16, String), CallFailure> {
        let response = self
            .http
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|err| CallFailure::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| CallFailure::Transport(err.to_string()))?;
        Ok((status, body))
    }

    fn token_field(&self) -> (&'static str, String) {
        ("access_token", self.token.clone())
    }
}

impl GameApi for SessionClient {
    async fn active_planets(&self) -> ApiResult<Vec<Planet>> {
        let (status, body) = self
            .get(EP_GET_PLANETS, &[("active_only", "1".to_string())])
            .await
            .map_err(ApiError::ZoneQuery)?;
        expect_success(status).map_err(ApiError::ZoneQuery)?;
        let list: PlanetList = decode(&body).map_err(ApiError::ZoneQuery)?;
        Ok(list.planets)
    }

    async fn planet_detail(&self, planet_id: &str) -> ApiResult<Planet> {
        let (status, body) = self
            .get(EP_GET_PLANET, &[("id", planet_id.to_string())])
            .await
            .map_err(ApiError::ZoneQuery)?;
        expect_success(status).map_err(ApiError::ZoneQuery)?;
        let list: PlanetList = decode(&body).map_err(ApiError::ZoneQuery)?;
        list.planets.into_iter().next().ok_or_else(|| {
            ApiError::ZoneQuery(CallFailure::Decode(format!(
                "planet {planet_id} detail missing from response"
            )))
        })
    }

    async fn player_status(&self) -> ApiResult<PlayerStatus> {
        let (status, body) = self
            .post(EP_GET_PLAYER_INFO, &[self.token_field()])
            .await
            .map_err(ApiError::UserInfo)?;
        expect_success(status).map_err(ApiError::UserInfo)?;
        decode(&body).map_err(ApiError::UserInfo)
    }

    async fn leave(&self, game_id: &str) -> ApiResult<()> {
        let (status, _body) = self
            .post(
                EP_LEAVE_GAME,
                &[("gameid", game_id.to_string()), self.token_field()],
            )
            .await
            .map_err(ApiError::Leave)?;
        expect_success(status).map_err(ApiError::Leave)
    }

    async fn join_planet(&self, planet_id: &str) -> ApiResult<()> {
        let (status, _body) = self
            .post(
                EP_JOIN_PLANET,
                &[("id", planet_id.to_string()), self.token_field()],
            )
            .await
            .map_err(ApiError::JoinPlanet)?;
        expect_success(status).map_err(ApiError::JoinPlanet)
    }

    async fn join_zone(&self, position: u32) -> ApiResult<Zone> {
        let (status, body) = self
            .post(
                EP_JOIN_ZONE,
                &[("zone_position", position.to_string()), self.token_field()],
            )
            .await
            .map_err(ApiError::JoinZone)?;
        expect_success(status).map_err(ApiError::JoinZone)?;
        let joined: JoinedZone = decode_nonempty(&body).map_err(ApiError::JoinZone)?;
        Ok(joined.zone_info)
    }

    async fn join_boss_zone(&self, position: u32) -> ApiResult<()> {
        let (status, body) = self
            .post(
                EP_JOIN_BOSS_ZONE,
                &[("zone_position", position.to_string()), self.token_field()],
            )
            .await
            .map_err(ApiError::JoinBoss)?;
        expect_success(status).map_err(ApiError::JoinBoss)?;
        require_nonempty(&body).map_err(ApiError::JoinBoss)
    }

    async fn report_score(&self, difficulty: Difficulty) -> ApiResult<ScoreStats> {
        // Invalid tiers fail before any network traffic.
        let score = difficulty
            .award()
            .ok_or(ApiError::InvalidDifficulty(difficulty))?;
        let (status, body) = self
            .post(
                EP_REPORT_SCORE,
                &[
                    self.token_field(),
                    ("score", score.to_string()),
                    ("language", REPORT_LANGUAGE.to_string()),
                ],
            )
            .await
            .map_err(ApiError::ReportScore)?;
        expect_success(status).map_err(ApiError::ReportScore)?;
        decode_nonempty(&body).map_err(ApiError::ReportScore)
    }

    async fn report_boss_damage(
        &self,
        use_heal: bool,
        damage_to_boss: u32,
        damage_taken: u32,
    ) -> ApiResult<BossReport> {
        let (status, body) = self
            .post(
                EP_REPORT_BOSS_DAMAGE,
                &[
                    self.token_field(),
                    ("use_heal_ability", if use_heal { "1" } else { "0" }.to_string()),
                    ("damage_to_boss", damage_to_boss.to_string()),
                    ("damage_taken", damage_taken.to_string()),
                ],
            )
            .await
            .map_err(ApiError::BossReport)?;
        expect_success(status).map_err(ApiError::BossReport)?;
        decode_nonempty(&body).map_err(ApiError::BossReport)
    }
}

fn expect_success(status: u16) -> Result<(), CallFailure> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(CallFailure::Status(status))
    }
}

fn response_value(body: &str) -> Result<serde_json::Value, CallFailure> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|err| CallFailure::Decode(err.to_string()))?;
    value
        .get("response")
        .cloned()
        .ok_or_else(|| CallFailure::Decode("missing response envelope".to_string()))
}

/// Unwrap the `response` envelope. An empty object decodes into whatever
/// defaults `T` provides; operations where emptiness means failure use
/// [`decode_nonempty`].
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CallFailure> {
    let response = response_value(body)?;
    serde_json::from_value(response).map_err(|err| CallFailure::Decode(err.to_string()))
}

/// Like [`decode`], but HTTP 200 with `{"response": {}}` is a failure. The
/// service signals rejected joins and reports this way.
fn decode_nonempty<T: DeserializeOwned>(body: &str) -> Result<T, CallFailure> {
    let response = response_value(body)?;
    if is_empty_object(&response) {
        return Err(CallFailure::EmptyBody);
    }
    serde_json::from_value(response).map_err(|err| CallFailure::Decode(err.to_string()))
}

fn require_nonempty(body: &str) -> Result<(), CallFailure> {
    let response = response_value(body)?;
    if is_empty_object(&response) {
        Err(CallFailure::EmptyBody)
    } else {
        Ok(())
    }
}

fn is_empty_object(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|map| map.is_empty())
}
