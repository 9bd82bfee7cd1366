//! Tick-local event plumbing: the damage/heal request queues and the
//! sink collecting everything the tick produced.

use warband_core::enums::DamageType;
use warband_core::events::{DamageOutcome, FeedbackEvent, HealOutcome};

/// A damage application waiting for the flush at the end of the tick.
/// Mutating health is deferred so systems never fight over borrows and
/// the application order is deterministic.
#[derive(Debug, Clone)]
pub struct DamageRequest {
    pub attacker: Option<u32>,
    pub target: u32,
    /// Incoming amount, crit multiplier already applied.
    pub amount: f64,
    pub damage_type: DamageType,
    pub crit: bool,
    pub armor_pen_flat: f64,
    pub armor_pen_pct: f64,
}

/// A heal application waiting for the flush.
#[derive(Debug, Clone)]
pub struct HealRequest {
    pub healer: Option<u32>,
    pub target: u32,
    pub amount: f64,
}

/// A death recorded during the flush, with kill credit.
#[derive(Debug, Clone, Copy)]
pub struct Death {
    pub target: u32,
    pub attacker: Option<u32>,
}

/// Everything the systems produced this tick. Drained into the snapshot
/// (feedback, outcomes) or processed by the engine (deaths).
#[derive(Debug, Default)]
pub struct EventSink {
    pub feedback: Vec<FeedbackEvent>,
    pub damage: Vec<DamageOutcome>,
    pub heals: Vec<HealOutcome>,
    pub deaths: Vec<Death>,
}
