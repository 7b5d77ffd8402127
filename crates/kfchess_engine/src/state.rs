//! Per-piece timed state machine
//!
//! Gates what a piece may do and for how long, independent of board logic.
//! Every phase duration derives from the piece type's base cooldown scaled by
//! a global slow-down factor:
//!
//! | Phase       | Duration                          |
//! |-------------|-----------------------------------|
//! | `Idle`      | 0 (always finished)               |
//! | `Move`      | unbounded, ended by the mover      |
//! | `Rest`      | base                              |
//! | `ShortRest` | base / 2                          |
//! | `Jump`      | base / 3                          |
//! | `Exhaust`   | base × 2                          |
//!
//! When a phase elapses, [`PieceStateMachine::tick`] applies
//! `Move → Rest`, `Jump → ShortRest` and `Rest | ShortRest | Exhaust → Idle`.
//! Entering `Move` or `Jump` is always triggered by the dispatcher.

use crate::types::Millis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default global slow-down applied to every cooldown
pub const DEFAULT_SLOWDOWN: u64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Move,
    Rest,
    Jump,
    ShortRest,
    Exhaust,
}

impl Phase {
    /// Phase entered automatically once this one elapses
    pub fn successor(self) -> Option<Phase> {
        match self {
            Phase::Move => Some(Phase::Rest),
            Phase::Jump => Some(Phase::ShortRest),
            Phase::Rest | Phase::ShortRest | Phase::Exhaust => Some(Phase::Idle),
            Phase::Idle => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "IDLE",
            Phase::Move => "MOVE",
            Phase::Rest => "REST",
            Phase::Jump => "JUMP",
            Phase::ShortRest => "SHORT_REST",
            Phase::Exhaust => "EXHAUST",
        };
        f.write_str(name)
    }
}

/// Automatic transition reported by [`PieceStateMachine::tick`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceStateMachine {
    phase: Phase,
    phase_started_at: Millis,
    phase_duration: Millis,
    cooldown_ms: Millis,
    slowdown: u64,
}

impl PieceStateMachine {
    pub fn new(cooldown_ms: Millis, slowdown: u64) -> Self {
        Self {
            phase: Phase::Idle,
            phase_started_at: 0,
            phase_duration: 0,
            cooldown_ms,
            slowdown,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_started_at(&self) -> Millis {
        self.phase_started_at
    }

    pub fn phase_duration(&self) -> Millis {
        self.phase_duration
    }

    /// Cooldown after the slow-down factor is applied
    pub fn base_cooldown(&self) -> Millis {
        self.cooldown_ms.saturating_mul(self.slowdown)
    }

    /// Duration `phase` would last if entered now
    pub fn duration_of(&self, phase: Phase) -> Millis {
        let base = self.base_cooldown();
        match phase {
            Phase::Idle => 0,
            Phase::Move => Millis::MAX,
            Phase::Rest => base,
            Phase::ShortRest => base / 2,
            Phase::Jump => base / 3,
            Phase::Exhaust => base.saturating_mul(2),
        }
    }

    /// Re-initialise the machine in `phase`, starting at `now`
    pub fn set_phase(&mut self, phase: Phase, now: Millis) {
        self.phase = phase;
        self.phase_started_at = now;
        self.phase_duration = self.duration_of(phase);
    }

    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.phase_started_at)
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        self.phase_duration == 0 || self.elapsed(now) >= self.phase_duration
    }

    pub fn remaining(&self, now: Millis) -> Millis {
        if self.is_finished(now) {
            return 0;
        }
        self.phase_duration - self.elapsed(now)
    }

    pub fn can_act(&self, now: Millis) -> bool {
        self.phase == Phase::Idle || self.is_finished(now)
    }

    /// Apply the automatic transition if the current phase has elapsed
    ///
    /// The successor phase starts at `now`, not at the instant the previous
    /// one expired.
    pub fn tick(&mut self, now: Millis) -> Option<PhaseTransition> {
        if !self.is_finished(now) {
            return None;
        }
        let from = self.phase;
        let to = from.successor()?;
        self.set_phase(to, now);
        Some(PhaseTransition { from, to })
    }
}
