//! Engine tuning knobs
//!
//! Every field has a default, so a partial settings file only overrides what
//! it names.

use crate::board::DEFAULT_TOLERANCE;
use crate::moves::DEFAULT_COOLDOWN_MS;
use crate::scheduler::DEFAULT_MOVE_DURATION_MS;
use crate::state::DEFAULT_SLOWDOWN;
use crate::types::{BoardExtents, Millis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_width: i32,
    pub board_height: i32,
    /// Multiplier applied to every base cooldown
    pub slowdown_factor: u64,
    /// Cooldown for piece types without their own
    pub default_cooldown_ms: Millis,
    /// Distance within which a piece counts as standing on a cell
    pub collision_tolerance: f64,
    /// Time a regular move takes to reach its destination
    pub move_duration_ms: Millis,
    pub tick_interval_ms: Millis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: 8,
            board_height: 8,
            slowdown_factor: DEFAULT_SLOWDOWN,
            default_cooldown_ms: DEFAULT_COOLDOWN_MS,
            collision_tolerance: DEFAULT_TOLERANCE,
            move_duration_ms: DEFAULT_MOVE_DURATION_MS,
            tick_interval_ms: 33,
        }
    }
}

impl EngineConfig {
    pub fn extents(&self) -> BoardExtents {
        BoardExtents {
            width: self.board_width,
            height: self.board_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        //! Missing fields fall back to their defaults
        let config: EngineConfig = serde_json::from_str(r#"{"slowdown_factor": 1}"#).unwrap();
        assert_eq!(config.slowdown_factor, 1);
        assert_eq!(config.board_width, 8);
        assert_eq!(config.move_duration_ms, 2000);
        assert_eq!(config.extents(), BoardExtents::default());
    }
}
