//! Target selection with attacker-occupancy scoring.
//!
//! Every candidate is scored by distance plus a penalty per attacker
//! already committed to it; candidates at the attacker cap are pushed
//! out of contention entirely unless every candidate is at the cap,
//! in which case the cap is waived and the fight stays fair.

use warband_core::config::AgentConfig;
use warband_core::constants::*;
use warband_core::types::{flatten, Vec3};

/// One enemy under consideration, as seen by the selector.
#[derive(Debug, Clone, Copy)]
pub struct TargetCandidate {
    pub position: Vec3,
    /// Attackers currently committed to this candidate.
    pub occupancy: u32,
}

/// Optional pull toward the ally centroid when scoring candidates.
#[derive(Debug, Clone, Copy)]
pub struct CentroidBias {
    pub centroid: Vec3,
    /// Score added per meter of candidate distance from the centroid.
    pub strength: f64,
}

/// Centroid bias strength, amplified by isolation.
pub fn bias_strength(config: &AgentConfig, isolation: f64) -> f64 {
    config.cohesion_target_bias * (1.0 + isolation * (config.isolation_bias_multiplier - 1.0))
}

/// True when every candidate has reached the attacker cap.
pub fn all_saturated(candidates: &[TargetCandidate], max_attackers: u32) -> bool {
    !candidates.is_empty() && candidates.iter().all(|c| c.occupancy >= max_attackers)
}

/// Pick the lowest-scoring candidate. Ties keep the earliest candidate,
/// so callers should list the current target first to avoid flapping.
pub fn select_target(from: Vec3, candidates: &[TargetCandidate]) -> Option<usize> {
    select_target_biased(from, candidates, None)
}

/// `select_target` with an optional centroid bias: candidates far from
/// the pack score worse, pulling isolated agents back toward it.
pub fn select_target_biased(
    from: Vec3,
    candidates: &[TargetCandidate],
    bias: Option<&CentroidBias>,
) -> Option<usize> {
    let saturated = all_saturated(candidates, MAX_ATTACKERS_PER_TARGET);

    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let mut score = ground_distance(from, candidate.position)
            + candidate.occupancy as f64 * OCCUPANCY_PENALTY_PER_ATTACKER;
        if candidate.occupancy >= MAX_ATTACKERS_PER_TARGET && !saturated {
            score += HARD_BLOCK_PENALTY;
        }
        if let Some(bias) = bias {
            score += ground_distance(candidate.position, bias.centroid) * bias.strength;
        }
        if best.map_or(true, |(_, best_score)| score < best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

fn ground_distance(a: Vec3, b: Vec3) -> f64 {
    flatten(a - b).length()
}
