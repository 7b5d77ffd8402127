//! Motion scheduler
//!
//! The only writer of interpolated positions. The dispatcher sets the `Move`
//! phase and schedules a motion; each tick advances every motion linearly and,
//! on arrival, snaps the piece to its destination and sets `Rest`. Motions of
//! pieces that left the board are dropped.

use crate::board::BoardIndex;
use crate::state::Phase;
use crate::types::{Cell, Millis};
use serde::Serialize;
use tracing::debug;

/// Default time a regular move takes to reach its destination
pub const DEFAULT_MOVE_DURATION_MS: Millis = 2000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Motion {
    pub piece_id: String,
    pub from: Cell,
    pub to: Cell,
    pub started_at: Millis,
    pub duration: Millis,
}

impl Motion {
    /// Fraction of the motion completed at `now`, clamped to `0.0..=1.0`
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at) as f64;
        (elapsed / self.duration as f64).min(1.0)
    }
}

/// A motion that completed during [`MotionScheduler::advance`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrival {
    pub piece_id: String,
    pub at: Cell,
}

#[derive(Debug, Clone)]
pub struct MotionScheduler {
    motions: Vec<Motion>,
    duration: Millis,
}

impl Default for MotionScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_DURATION_MS)
    }
}

impl MotionScheduler {
    pub fn new(duration: Millis) -> Self {
        Self {
            motions: Vec::new(),
            duration,
        }
    }

    pub fn duration(&self) -> Millis {
        self.duration
    }

    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    pub fn motion_of(&self, piece_id: &str) -> Option<&Motion> {
        self.motions.iter().find(|m| m.piece_id == piece_id)
    }

    /// Start moving `piece_id` toward `to`. The piece claims `to` as its
    /// logical cell immediately.
    pub fn schedule(&mut self, board: &mut BoardIndex, piece_id: &str, to: Cell, now: Millis) -> bool {
        let Some(piece) = board.get_mut(piece_id) else {
            return false;
        };
        let from = piece.cell();
        piece.begin_flight(to);
        self.motions.retain(|m| m.piece_id != piece_id);
        self.motions.push(Motion {
            piece_id: piece_id.to_string(),
            from,
            to,
            started_at: now,
            duration: self.duration,
        });
        true
    }

    /// Interpolate every motion to `now` and settle the ones that arrived
    pub fn advance(&mut self, board: &mut BoardIndex, now: Millis) -> Vec<Arrival> {
        let mut arrivals = Vec::new();
        self.motions.retain(|motion| {
            let Some(piece) = board.get_mut(&motion.piece_id) else {
                debug!("[MOTION] Dropping motion of removed piece {}", motion.piece_id);
                return false;
            };
            let t = motion.progress(now);
            if t >= 1.0 {
                piece.place_at(motion.to);
                piece.state.set_phase(Phase::Rest, now);
                arrivals.push(Arrival {
                    piece_id: motion.piece_id.clone(),
                    at: motion.to,
                });
                return false;
            }
            let x = motion.from.x as f64 + (motion.to.x - motion.from.x) as f64 * t;
            let y = motion.from.y as f64 + (motion.to.y - motion.from.y) as f64 * t;
            piece.set_position(x, y);
            true
        });
        arrivals
    }
}
