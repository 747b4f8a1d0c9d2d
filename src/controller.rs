//! Game loop controller: an explicit state machine over the phases of a
//! round, plus the unbounded retry driver.
//!
//! Phases: resolve the prior session, select a zone, join its planet, then
//! grind (join/sleep/report) or fight the boss. Any API failure moves to
//! back-off, which restarts the round; nothing here terminates the process.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::client::GameApi;
use crate::config::BotConfig;
use crate::constants::{BOSS_DAMAGE_PER_REPORT, HEAL_CHARGE_START};
use crate::error::{ApiError, ApiResult};
use crate::selector::{select_zone, Target};
use crate::types::{BossStatus, Difficulty, ScoreStats};

/// Heal-ability charge for the boss loop. Fires exactly when the charge hits
/// zero, then wraps back to the start value (every 8th report).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealCharge(u8);

impl HealCharge {
    pub fn new() -> Self {
        Self(HEAL_CHARGE_START)
    }

    pub fn fires_now(self) -> bool {
        self.0 == 0
    }

    pub fn advance(self) -> Self {
        if self.0 > 0 {
            Self(self.0 - 1)
        } else {
            Self(HEAL_CHARGE_START)
        }
    }
}

impl Default for HealCharge {
    fn default() -> Self {
        Self::new()
    }
}

/// Round-continuation counter: increments on every report below Hard, resets
/// at Hard or above. Reaching the explore threshold ends the round.
pub fn next_explore_streak(streak: u32, difficulty: Difficulty) -> u32 {
    if difficulty < Difficulty::Hard {
        streak + 1
    } else {
        0
    }
}

/// One state of the controller. `step` consumes a phase and produces the
/// next; the driver loops forever. Cancellation drops the whole future at an
/// await point, so there is no explicit terminated phase here.
#[derive(Debug)]
pub enum Phase {
    ResolveSession,
    Select,
    Join(Target),
    Grind { target: Target, streak: u32 },
    BossFight { target: Target, heal: HealCharge },
    BackOff(ApiError),
}

pub struct Autopilot<A> {
    api: A,
    config: BotConfig,
}

impl<A: GameApi> Autopilot<A> {
    pub fn new(api: A, config: BotConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Drive the state machine forever. Runs until the enclosing task is
    /// cancelled.
    pub async fn run(&self) {
        let mut phase = Phase::ResolveSession;
        loop {
            phase = self.step(phase).await;
        }
    }

    /// Best-effort cleanup for the cancellation path: one more
    /// status-and-leave pass so the account is not left mid-game.
    pub async fn shutdown(&self) -> ApiResult<()> {
        resolve_session(&self.api).await
    }

    pub async fn step(&self, phase: Phase) -> Phase {
        match phase {
            Phase::ResolveSession => match resolve_session(&self.api).await {
                Ok(()) => Phase::Select,
                Err(err) => Phase::BackOff(err),
            },
            Phase::Select => {
                info!("finding a planet and zone");
                match select_zone(&self.api, self.config.randomize).await {
                    Ok(target) => Phase::Join(target),
                    Err(err) => Phase::BackOff(err),
                }
            }
            Phase::Join(target) => match self.api.join_planet(&target.planet_id).await {
                Ok(()) => {
                    info!(
                        planet_id = %target.planet_id,
                        planet_name = %target.planet_name,
                        "joined planet"
                    );
                    if target.difficulty.is_boss() {
                        match self.api.join_boss_zone(target.zone_position).await {
                            Ok(()) => {
                                info!(
                                    zone = target.zone_position,
                                    planet_name = %target.planet_name,
                                    "entering boss encounter"
                                );
                                Phase::BossFight {
                                    target,
                                    heal: HealCharge::new(),
                                }
                            }
                            Err(err) => Phase::BackOff(err),
                        }
                    } else {
                        Phase::Grind { target, streak: 0 }
                    }
                }
                Err(err) => Phase::BackOff(err),
            },
            Phase::Grind { target, streak } => self.grind_step(target, streak).await,
            Phase::BossFight { target, heal } => self.boss_step(target, heal).await,
            Phase::BackOff(err) => {
                warn!(
                    error = %err,
                    backoff_secs = self.config.backoff_secs,
                    "round failed; backing off before restarting"
                );
                sleep(Duration::from_secs(self.config.backoff_secs)).await;
                Phase::ResolveSession
            }
        }
    }

    /// One grind iteration: join the zone, wait out the scoring window,
    /// report, then either keep grinding or end the round for re-selection.
    async fn grind_step(&self, target: Target, streak: u32) -> Phase {
        let joined = match self.api.join_zone(target.zone_position).await {
            Ok(zone) => zone,
            Err(err) => return Phase::BackOff(err),
        };
        info!(
            zone = joined.zone_position,
            planet_name = %target.planet_name,
            difficulty = %target.difficulty,
            "joined zone; waiting out the scoring window"
        );
        sleep(Duration::from_secs(self.config.report_interval_secs)).await;

        let stats = match self.api.report_score(target.difficulty).await {
            Ok(stats) => stats,
            Err(err) => return Phase::BackOff(err),
        };
        log_score(&stats, target.difficulty, self.config.report_interval_secs);

        let streak = next_explore_streak(streak, target.difficulty);
        if streak >= self.config.explore_threshold {
            info!(
                streak,
                threshold = self.config.explore_threshold,
                "explore threshold reached; ending round to re-select"
            );
            Phase::ResolveSession
        } else {
            Phase::Grind { target, streak }
        }
    }

    /// One boss iteration. Failed reports retry the same iteration without
    /// advancing the heal charge.
    async fn boss_step(&self, target: Target, heal: HealCharge) -> Phase {
        sleep(Duration::from_secs(self.config.boss_interval_secs)).await;

        let report = match self
            .api
            .report_boss_damage(heal.fires_now(), BOSS_DAMAGE_PER_REPORT, 0)
            .await
        {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "boss damage report failed; retrying");
                return Phase::BossFight { target, heal };
            }
        };
        let heal = heal.advance();

        if report.waiting_for_players {
            return Phase::BossFight { target, heal };
        }
        if report.game_over {
            info!(zone = target.zone_position, "boss encounter over; round complete");
            return Phase::ResolveSession;
        }
        if let Some(status) = &report.boss_status {
            log_boss_status(status);
        }
        Phase::BossFight { target, heal }
    }
}

/// Leave whatever engagement the account still has: active zone or boss
/// first, then any stale planet session, so exactly one engagement ever
/// exists at a time.
pub async fn resolve_session<A: GameApi>(api: &A) -> ApiResult<()> {
    let status = api.player_status().await?;
    if let Some(game_id) = &status.active_zone_game {
        info!(game_id = %game_id, "leaving active zone");
        api.leave(game_id).await?;
    }
    if let Some(game_id) = &status.active_boss_game {
        info!(game_id = %game_id, "leaving active boss encounter");
        api.leave(game_id).await?;
    }
    if let Some(planet_id) = &status.active_planet {
        info!(planet_id = %planet_id, "leaving stale planet session");
        api.leave(planet_id).await?;
    }
    Ok(())
}

fn log_score(stats: &ScoreStats, difficulty: Difficulty, interval_secs: u64) {
    let eta = difficulty
        .award()
        .map(|award| {
            let remaining = stats.next_level_score.saturating_sub(stats.new_score);
            format_eta((remaining / u64::from(award)) * interval_secs)
        })
        .unwrap_or_default();
    info!(
        level = stats.new_level,
        old_score = stats.old_score,
        new_score = stats.new_score,
        next_level_score = stats.next_level_score,
        level_up_eta = %eta,
        "score reported"
    );
    if stats.new_level != stats.old_level {
        info!(level = stats.new_level, "level up!");
    }
}

fn log_boss_status(status: &BossStatus) {
    info!(
        boss_hp = status.boss_hp,
        boss_max_hp = status.boss_max_hp,
        "boss status"
    );
    for player in &status.boss_players {
        info!(
            name = %player.name,
            hp = player.hp,
            max_hp = player.max_hp,
            xp_earned = player.xp_earned,
            "boss participant"
        );
    }
}

fn format_eta(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours:0>2}:{minutes:0>2}")
    } else {
        format!("{hours:0>2}:{minutes:0>2}")
    }
}
