//! Per-type moves tables
//!
//! A table is the list of displacements a piece type may make plus the base
//! cooldown its state machine derives phase durations from. One table is
//! built per type code and shared read-only by every piece of that type.
//!
//! # Text Format
//!
//! One `dx,dy` pair per line. Blank lines and lines starting with `#` are
//! ignored:
//!
//! ```text
//! # knight
//! 2,1
//! 1,2
//! ```

use crate::error::{EngineError, EngineResult};
use crate::types::{Displacement, Millis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Base cooldown used when a table does not specify one
pub const DEFAULT_COOLDOWN_MS: Millis = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovesTable {
    allowed: Vec<Displacement>,
    cooldown_ms: Millis,
}

impl Default for MovesTable {
    fn default() -> Self {
        Self::unconfigured(DEFAULT_COOLDOWN_MS)
    }
}

impl MovesTable {
    pub fn new(allowed: Vec<Displacement>, cooldown_ms: Millis) -> Self {
        Self {
            allowed,
            cooldown_ms,
        }
    }

    /// Table with no entries: the validator allows every displacement
    pub fn unconfigured(cooldown_ms: Millis) -> Self {
        Self::new(Vec::new(), cooldown_ms)
    }

    pub fn allowed(&self) -> &[Displacement] {
        &self.allowed
    }

    pub fn cooldown_ms(&self) -> Millis {
        self.cooldown_ms
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Whether `d` or its negation is listed. Table moves are bidirectional.
    pub fn permits(&self, d: Displacement) -> bool {
        self.allowed
            .iter()
            .any(|&entry| entry == d || entry == d.negated())
    }

    /// Strict parse: the first unreadable line is an error
    pub fn parse(text: &str, cooldown_ms: Millis) -> EngineResult<Self> {
        let mut allowed = Vec::new();
        for (index, line) in meaningful_lines(text) {
            allowed.push(parse_entry(line).ok_or_else(|| EngineError::MalformedMove {
                line: index + 1,
                text: line.to_string(),
            })?);
        }
        Ok(Self::new(allowed, cooldown_ms))
    }

    /// Lenient parse: unreadable lines are skipped with a warning
    ///
    /// Qualified entries such as `0,2:first_move` are not part of the table
    /// format and are dropped here; the pawn fallback covers the two-step.
    pub fn parse_lenient(text: &str, cooldown_ms: Millis) -> Self {
        let allowed = meaningful_lines(text)
            .filter_map(|(index, line)| {
                let entry = parse_entry(line);
                if entry.is_none() {
                    warn!(
                        "[MOVES] Skipping malformed entry on line {}: {:?}",
                        index + 1,
                        line
                    );
                }
                entry
            })
            .collect();
        Self::new(allowed, cooldown_ms)
    }
}

fn meaningful_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_entry(line: &str) -> Option<Displacement> {
    let (dx, dy) = line.split_once(',')?;
    Some(Displacement::new(
        dx.trim().parse().ok()?,
        dy.trim().parse().ok()?,
    ))
}
