//! Zone selection: scan every active planet and pick the single best zone.

use tracing::{debug, warn};

use crate::client::GameApi;
use crate::constants::{BOSS_ZONE_TYPE, CAPTURE_PROGRESS_CUTOFF};
use crate::error::{ApiError, ApiResult};
use crate::types::{Difficulty, Zone};

/// The zone the controller should play next.
#[derive(Clone, Debug)]
pub struct Target {
    pub difficulty: Difficulty,
    pub zone_position: u32,
    pub planet_id: String,
    pub planet_name: String,
}

/// Selection tuple for one eligible zone. Only lives for the duration of a
/// single selection pass.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub priority: Difficulty,
    /// Random in [0,1) by default so equally ranked zones spread load across
    /// bots; constant 0 in deterministic mode.
    pub tie_break: f64,
    pub zone_position: u32,
    pub planet_id: String,
    pub planet_name: String,
}

pub fn zone_eligible(zone: &Zone) -> bool {
    !zone.captured && zone.capture_progress < CAPTURE_PROGRESS_CUTOFF
}

/// An active boss outranks every standard zone regardless of its nominal
/// difficulty value.
pub fn zone_priority(zone: &Zone) -> Difficulty {
    if zone.zone_type == BOSS_ZONE_TYPE && zone.boss_active {
        Difficulty::Boss
    } else {
        Difficulty::from_raw(zone.difficulty).unwrap_or(Difficulty::Trivial)
    }
}

/// Sort descending by (priority, tie-break) and keep the head.
pub fn pick_best(mut candidates: Vec<Candidate>) -> Option<Target> {
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.tie_break.total_cmp(&a.tie_break))
    });
    candidates.into_iter().next().map(|candidate| Target {
        difficulty: candidate.priority,
        zone_position: candidate.zone_position,
        planet_id: candidate.planet_id,
        planet_name: candidate.planet_name,
    })
}

/// Fetch the full planet listing and select a target. Planets whose detail
/// fetch fails are skipped rather than aborting the whole selection.
pub async fn select_zone<A: GameApi>(api: &A, randomize: bool) -> ApiResult<Target> {
    let planets = api.active_planets().await?;

    let mut candidates = Vec::new();
    for planet in planets {
        let detail = match api.planet_detail(&planet.id).await {
            Ok(detail) => detail,
            Err(err) => {
                warn!(planet_id = %planet.id, error = %err, "planet detail failed; skipping");
                continue;
            }
        };
        for zone in &detail.zones {
            if !zone_eligible(zone) {
                continue;
            }
            candidates.push(Candidate {
                priority: zone_priority(zone),
                tie_break: if randomize { rand::random::<f64>() } else { 0.0 },
                zone_position: zone.zone_position,
                planet_id: planet.id.clone(),
                planet_name: planet.state.name.clone(),
            });
        }
    }

    debug!(candidates = candidates.len(), "selection pass complete");
    pick_best(candidates).ok_or(ApiError::NoZoneAvailable)
}
