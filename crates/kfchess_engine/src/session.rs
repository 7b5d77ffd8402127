//! Per-player input session
//!
//! Each player owns one session: which piece is selected, which is hovered,
//! the displacement accumulated in movement mode, and the mode itself. The
//! dispatcher receives the session of the issuing player, so the two players
//! never share selection state.

use crate::types::{Displacement, Player};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum SessionMode {
    /// Direction keys cycle the selection
    #[default]
    Selecting,
    /// Direction keys accumulate the pending displacement
    Accumulating,
}

/// Which way a cycling key moves through the player's sorted piece list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    /// `UP` / `LEFT`
    Previous,
    /// `DOWN` / `RIGHT`
    Next,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSession {
    player: Player,
    pub selected: Option<String>,
    pub hovered: Option<String>,
    pub pending: Displacement,
    pub mode: SessionMode,
}

impl PlayerSession {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            selected: None,
            hovered: None,
            pending: Displacement::ZERO,
            mode: SessionMode::Selecting,
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    /// Point both selection and hover at `first` and leave movement mode
    pub fn reset(&mut self, first: Option<String>) {
        self.selected = first.clone();
        self.hovered = first;
        self.pending = Displacement::ZERO;
        self.mode = SessionMode::Selecting;
    }

    pub fn is_accumulating(&self) -> bool {
        self.mode == SessionMode::Accumulating
    }

    pub fn enter_accumulating(&mut self) {
        self.mode = SessionMode::Accumulating;
        self.pending = Displacement::ZERO;
    }

    pub fn exit_accumulating(&mut self) {
        self.mode = SessionMode::Selecting;
        self.pending = Displacement::ZERO;
    }

    pub fn add_pending(&mut self, dx: i32, dy: i32) {
        self.pending = Displacement::new(self.pending.dx + dx, self.pending.dy + dy);
    }

    /// Read the pending displacement and reset it to zero
    pub fn take_pending(&mut self) -> Displacement {
        std::mem::take(&mut self.pending)
    }

    /// Step the selection through `ids` and hover the result too
    pub fn cycle_selection(&mut self, ids: &[String], direction: CycleDirection) -> Option<&str> {
        let next = cycle(ids, self.selected.as_deref(), direction)?;
        self.hovered = Some(next.clone());
        self.selected = Some(next);
        self.selected.as_deref()
    }

    pub fn cycle_hover(&mut self, ids: &[String], direction: CycleDirection) -> Option<&str> {
        self.hovered = Some(cycle(ids, self.hovered.as_deref(), direction)?);
        self.hovered.as_deref()
    }

    /// Forget pieces that are no longer on the board
    pub fn forget(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
    }
}

/// Wrapping step from `current` through `ids`. An unknown or missing
/// current id lands on the first id without stepping.
fn cycle(ids: &[String], current: Option<&str>, direction: CycleDirection) -> Option<String> {
    let first = ids.first()?;
    let len = ids.len();
    let Some(index) = current.and_then(|id| ids.iter().position(|candidate| candidate == id)) else {
        return Some(first.clone());
    };
    let next = match direction {
        CycleDirection::Previous => (index + len - 1) % len,
        CycleDirection::Next => (index + 1) % len,
    };
    Some(ids[next].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        //! Sorted list, decrement from the first wraps to the last
        let pieces = ids(&["BW1", "KW", "QW"]);
        let mut session = PlayerSession::new(Player::White);
        session.reset(Some("BW1".into()));

        assert_eq!(session.cycle_selection(&pieces, CycleDirection::Previous), Some("QW"));
        assert_eq!(session.cycle_selection(&pieces, CycleDirection::Next), Some("BW1"));
        assert_eq!(session.cycle_selection(&pieces, CycleDirection::Next), Some("KW"));
        assert_eq!(session.hovered.as_deref(), Some("KW"), "Selecting also hovers");
    }

    #[test]
    fn test_cycle_from_nothing_picks_first_piece() {
        //! Either direction lands on index 0 when nothing is selected
        let pieces = ids(&["A1", "A2", "A3"]);
        let mut session = PlayerSession::new(Player::Black);
        assert_eq!(session.cycle_selection(&pieces, CycleDirection::Next), Some("A1"));
        let mut session = PlayerSession::new(Player::Black);
        assert_eq!(session.cycle_selection(&pieces, CycleDirection::Previous), Some("A1"));
        assert_eq!(session.cycle_selection(&pieces, CycleDirection::Next), Some("A2"));
    }

    #[test]
    fn test_cycle_from_removed_piece_picks_first_piece() {
        let pieces = ids(&["KW", "RW1"]);
        let mut session = PlayerSession::new(Player::White);
        session.reset(Some("QW".into()));
        assert_eq!(session.cycle_hover(&pieces, CycleDirection::Previous), Some("KW"));
    }

    #[test]
    fn test_hover_does_not_change_selection() {
        let pieces = ids(&["NW1", "NW2"]);
        let mut session = PlayerSession::new(Player::White);
        session.reset(Some("NW1".into()));
        session.cycle_hover(&pieces, CycleDirection::Next);
        assert_eq!(session.hovered.as_deref(), Some("NW2"));
        assert_eq!(session.selected.as_deref(), Some("NW1"));
    }

    #[test]
    fn test_empty_list_leaves_session_alone() {
        let mut session = PlayerSession::new(Player::White);
        session.reset(Some("KW".into()));
        assert_eq!(session.cycle_selection(&[], CycleDirection::Next), None);
        assert_eq!(session.selected.as_deref(), Some("KW"));
    }

    #[test]
    fn test_pending_accumulates_and_resets() {
        let mut session = PlayerSession::new(Player::White);
        session.enter_accumulating();
        session.add_pending(0, -1);
        session.add_pending(0, -1);
        session.add_pending(1, 0);
        assert_eq!(session.pending, Displacement::new(1, -2));
        assert_eq!(session.take_pending(), Displacement::new(1, -2));
        assert!(session.pending.is_zero());
        session.add_pending(1, 1);
        session.exit_accumulating();
        assert!(session.pending.is_zero());
        assert!(!session.is_accumulating());
    }
}
