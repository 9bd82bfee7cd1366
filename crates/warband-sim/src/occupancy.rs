//! Attacker occupancy: who is committed to whom.
//!
//! The tracker is the authority behind the per-target attacker cap.
//! A claim moves with the attacker (claiming a new target releases the
//! old one) and must be released when either side dies.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct OccupancyTracker {
    /// attacker -> claimed target
    claims: HashMap<u32, u32>,
    /// target -> number of attackers
    counts: HashMap<u32, u32>,
}

impl OccupancyTracker {
    /// Attackers currently committed to `target`.
    pub fn count(&self, target: u32) -> u32 {
        self.counts.get(&target).copied().unwrap_or(0)
    }

    pub fn claim_of(&self, attacker: u32) -> Option<u32> {
        self.claims.get(&attacker).copied()
    }

    /// Commit `attacker` to `target`, releasing any previous claim.
    pub fn claim(&mut self, attacker: u32, target: u32) {
        if self.claims.get(&attacker) == Some(&target) {
            return;
        }
        self.release(attacker);
        self.claims.insert(attacker, target);
        *self.counts.entry(target).or_insert(0) += 1;
    }

    /// Drop the claim held by `attacker`, if any.
    pub fn release(&mut self, attacker: u32) {
        if let Some(target) = self.claims.remove(&attacker) {
            decrement(&mut self.counts, target);
        }
    }

    /// Drop every claim on `target` (target died or left the field).
    pub fn clear_target(&mut self, target: u32) {
        self.claims.retain(|_, t| *t != target);
        self.counts.remove(&target);
    }

    /// Drop claims whose attacker or target no longer satisfies `alive`.
    /// Run periodically as a safety net against leaked claims.
    pub fn sweep(&mut self, alive: impl Fn(u32) -> bool) {
        let stale: Vec<u32> = self
            .claims
            .iter()
            .filter(|(attacker, target)| !alive(**attacker) || !alive(**target))
            .map(|(attacker, _)| *attacker)
            .collect();
        for attacker in stale {
            self.release(attacker);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

fn decrement(counts: &mut HashMap<u32, u32>, target: u32) {
    if let Some(count) = counts.get_mut(&target) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            counts.remove(&target);
        }
    }
}
