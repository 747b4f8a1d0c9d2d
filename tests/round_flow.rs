//! Round-level scenarios driven through an in-memory game API.

use std::collections::VecDeque;
use std::sync::Mutex;

use salien_autopilot::client::GameApi;
use salien_autopilot::config::BotConfig;
use salien_autopilot::controller::{Autopilot, Phase};
use salien_autopilot::error::{ApiError, ApiResult, CallFailure};
use salien_autopilot::selector::select_zone;
use salien_autopilot::types::{
    BossReport, Difficulty, Planet, PlanetState, PlayerStatus, ScoreStats, Zone,
};

fn test_config() -> BotConfig {
    let mut config = BotConfig::for_token("test-token");
    config.explore_threshold = 1;
    config.randomize = false;
    config.report_interval_secs = 0;
    config.boss_interval_secs = 0;
    config.backoff_secs = 0;
    config
}

fn planet(id: &str, name: &str, zones: Vec<Zone>) -> Planet {
    Planet {
        id: id.to_string(),
        state: PlanetState {
            name: name.to_string(),
        },
        zones,
    }
}

fn standard_zone(position: u32, difficulty: u8, captured: bool, progress: f64) -> Zone {
    Zone {
        zone_position: position,
        zone_type: 3,
        difficulty,
        captured,
        capture_progress: progress,
        boss_active: false,
    }
}

fn boss_zone(position: u32, active: bool) -> Zone {
    Zone {
        zone_position: position,
        zone_type: 4,
        difficulty: 3,
        captured: false,
        capture_progress: 0.0,
        boss_active: active,
    }
}

#[derive(Default)]
struct Calls {
    active_planets: u32,
    join_planet: u32,
    join_zone: u32,
    join_boss_zone: u32,
    reported: Vec<Difficulty>,
    left: Vec<String>,
    boss_heal_flags: Vec<bool>,
}

#[derive(Default)]
struct FakeApi {
    planets: Vec<Planet>,
    broken_planet_ids: Vec<String>,
    status: PlayerStatus,
    boss_reports: Mutex<VecDeque<ApiResult<BossReport>>>,
    calls: Mutex<Calls>,
}

impl FakeApi {
    fn with_planets(planets: Vec<Planet>) -> Self {
        Self {
            planets,
            ..Self::default()
        }
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().unwrap()
    }
}

impl GameApi for FakeApi {
    async fn active_planets(&self) -> ApiResult<Vec<Planet>> {
        self.calls().active_planets += 1;
        let summaries = self
            .planets
            .iter()
            .map(|entry| planet(&entry.id, &entry.state.name, Vec::new()))
            .collect();
        Ok(summaries)
    }

    async fn planet_detail(&self, planet_id: &str) -> ApiResult<Planet> {
        if self.broken_planet_ids.iter().any(|id| id == planet_id) {
            return Err(ApiError::ZoneQuery(CallFailure::Status(500)));
        }
        self.planets
            .iter()
            .find(|entry| entry.id == planet_id)
            .cloned()
            .ok_or(ApiError::ZoneQuery(CallFailure::Status(404)))
    }

    async fn player_status(&self) -> ApiResult<PlayerStatus> {
        Ok(self.status.clone())
    }

    async fn leave(&self, game_id: &str) -> ApiResult<()> {
        self.calls().left.push(game_id.to_string());
        Ok(())
    }

    async fn join_planet(&self, _planet_id: &str) -> ApiResult<()> {
        self.calls().join_planet += 1;
        Ok(())
    }

    async fn join_zone(&self, position: u32) -> ApiResult<Zone> {
        self.calls().join_zone += 1;
        for entry in &self.planets {
            if let Some(zone) = entry.zones.iter().find(|z| z.zone_position == position) {
                return Ok(zone.clone());
            }
        }
        Err(ApiError::JoinZone(CallFailure::EmptyBody))
    }

    async fn join_boss_zone(&self, _position: u32) -> ApiResult<()> {
        self.calls().join_boss_zone += 1;
        Ok(())
    }

    async fn report_score(&self, difficulty: Difficulty) -> ApiResult<ScoreStats> {
        let award = difficulty
            .award()
            .ok_or(ApiError::InvalidDifficulty(difficulty))?;
        self.calls().reported.push(difficulty);
        Ok(ScoreStats {
            old_score: 0,
            new_score: u64::from(award),
            next_level_score: 10_000,
            old_level: 1,
            new_level: 1,
        })
    }

    async fn report_boss_damage(
        &self,
        use_heal: bool,
        _damage_to_boss: u32,
        _damage_taken: u32,
    ) -> ApiResult<BossReport> {
        self.calls().boss_heal_flags.push(use_heal);
        self.boss_reports
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(BossReport {
                    waiting_for_players: false,
                    game_over: true,
                    boss_status: None,
                })
            })
    }
}

/// Step the machine until `Select` is about to execute for the `n`th time.
async fn run_until_nth_select(pilot: &Autopilot<FakeApi>, n: u32, limit: u32) -> Phase {
    let mut phase = Phase::ResolveSession;
    let mut selects = 0;
    for _ in 0..limit {
        if matches!(phase, Phase::Select) {
            selects += 1;
            if selects == n {
                return phase;
            }
        }
        phase = pilot.step(phase).await;
    }
    panic!("never reached select #{n}, stuck at {phase:?}");
}

#[tokio::test]
async fn grind_round_at_threshold_one_reports_once_then_reselects() {
    let api = FakeApi::with_planets(vec![planet(
        "1",
        "Alpha",
        vec![standard_zone(0, 2, false, 0.1)],
    )]);
    let pilot = Autopilot::new(api, test_config());

    run_until_nth_select(&pilot, 2, 32).await;

    let calls = pilot.api().calls();
    assert_eq!(calls.active_planets, 1, "only the first selection ran");
    assert_eq!(calls.join_planet, 1);
    assert_eq!(calls.join_zone, 1);
    assert_eq!(calls.reported, vec![Difficulty::Medium]);
}

#[tokio::test]
async fn grind_round_runs_until_explore_threshold() {
    let api = FakeApi::with_planets(vec![planet(
        "1",
        "Alpha",
        vec![standard_zone(0, 1, false, 0.0)],
    )]);
    let mut config = test_config();
    config.explore_threshold = 3;
    let pilot = Autopilot::new(api, config);

    run_until_nth_select(&pilot, 2, 64).await;

    let calls = pilot.api().calls();
    assert_eq!(calls.join_zone, 3);
    assert_eq!(calls.reported.len(), 3);
}

#[tokio::test]
async fn stale_session_is_left_before_selection() {
    let mut api = FakeApi::with_planets(vec![planet(
        "1",
        "Alpha",
        vec![standard_zone(0, 2, false, 0.1)],
    )]);
    api.status = PlayerStatus {
        active_planet: Some("9".to_string()),
        active_zone_game: Some("2468".to_string()),
        active_boss_game: None,
    };
    let pilot = Autopilot::new(api, test_config());

    let phase = pilot.step(Phase::ResolveSession).await;
    assert!(matches!(phase, Phase::Select));
    // Active zone first, stale planet second.
    assert_eq!(pilot.api().calls().left, vec!["2468", "9"]);
}

#[tokio::test]
async fn boss_round_joins_boss_zone_and_runs_to_game_over() {
    let api = FakeApi::with_planets(vec![planet(
        "1",
        "Alpha",
        vec![standard_zone(0, 3, false, 0.0), boss_zone(7, true)],
    )]);
    *api.boss_reports.lock().unwrap() = VecDeque::from(vec![
        Ok(BossReport {
            waiting_for_players: true,
            game_over: false,
            boss_status: None,
        }),
        Err(ApiError::BossReport(CallFailure::EmptyBody)),
        Ok(BossReport {
            waiting_for_players: false,
            game_over: false,
            boss_status: None,
        }),
        Ok(BossReport {
            waiting_for_players: false,
            game_over: true,
            boss_status: None,
        }),
    ]);
    let pilot = Autopilot::new(api, test_config());

    run_until_nth_select(&pilot, 2, 32).await;

    let calls = pilot.api().calls();
    assert_eq!(calls.join_boss_zone, 1);
    assert_eq!(calls.join_zone, 0, "boss rounds never join a standard zone");
    // Charge starts at 7, so no heal fires in the first four reports, and
    // the failed report does not advance it.
    assert_eq!(calls.boss_heal_flags, vec![false, false, false, false]);
}

#[tokio::test]
async fn selection_skips_planets_whose_detail_fetch_fails() {
    let mut api = FakeApi::with_planets(vec![
        planet("1", "Broken", vec![standard_zone(0, 3, false, 0.0)]),
        planet("2", "Beta", vec![standard_zone(4, 1, false, 0.2)]),
    ]);
    api.broken_planet_ids = vec!["1".to_string()];

    let target = select_zone(&api, false).await.unwrap();
    assert_eq!(target.planet_id, "2");
    assert_eq!(target.zone_position, 4);
    assert_eq!(target.difficulty, Difficulty::Easy);
}

#[tokio::test]
async fn selection_never_returns_captured_or_saturated_zones() {
    let api = FakeApi::with_planets(vec![planet(
        "1",
        "Alpha",
        vec![
            standard_zone(0, 3, true, 0.0),
            standard_zone(1, 3, false, 0.97),
            standard_zone(2, 1, false, 0.5),
        ],
    )]);

    let target = select_zone(&api, false).await.unwrap();
    assert_eq!(target.zone_position, 2);
}

#[tokio::test]
async fn selection_fails_when_no_zone_qualifies() {
    let api = FakeApi::with_planets(vec![planet(
        "1",
        "Alpha",
        vec![standard_zone(0, 3, true, 1.0)],
    )]);

    assert_eq!(
        select_zone(&api, true).await.unwrap_err(),
        ApiError::NoZoneAvailable
    );
}

#[tokio::test]
async fn active_boss_zone_is_preferred_over_hard_zones() {
    let api = FakeApi::with_planets(vec![
        planet("1", "Alpha", vec![standard_zone(0, 3, false, 0.0)]),
        planet("2", "Beta", vec![boss_zone(9, true)]),
    ]);

    let target = select_zone(&api, true).await.unwrap();
    assert_eq!(target.zone_position, 9);
    assert!(target.difficulty.is_boss());
}

#[tokio::test]
async fn api_failure_backs_off_and_restarts_the_round() {
    let mut api = FakeApi::with_planets(vec![planet(
        "1",
        "Broken",
        vec![standard_zone(0, 2, false, 0.1)],
    )]);
    api.broken_planet_ids = vec!["1".to_string()];
    let pilot = Autopilot::new(api, test_config());

    // The only planet is broken, so selection fails; the machine must pass
    // through back-off and come around to resolving the session again.
    let phase = pilot.step(Phase::Select).await;
    let Phase::BackOff(err) = phase else {
        panic!("expected back-off, got {phase:?}");
    };
    assert_eq!(err, ApiError::NoZoneAvailable);
    let phase = pilot.step(Phase::BackOff(err)).await;
    assert!(matches!(phase, Phase::ResolveSession));
}
