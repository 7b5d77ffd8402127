//! Fallback movement rules
//!
//! A registry from type code to a pure legality function. New piece types are
//! added with [`FallbackRules::register`] instead of editing a central match.
//!
//! ## Built-in Rules
//!
//! - **Pawn**: one step forward; two steps forward from its home rank; one
//!   step diagonally forward only onto an enemy piece
//! - **Rook**: one step orthogonally
//! - **Knight**: any of the eight L-shaped jumps
//! - **Bishop**: one step diagonally
//! - **Queen / King**: one step in any direction, never the null move
//!
//! "Forward" is toward lower `y` for white and higher `y` for black. The home
//! rank is the second row from each side's edge.

use crate::types::{Cell, Displacement, PieceColor, PieceKind};
use std::collections::HashMap;
use std::fmt;

/// Everything a fallback rule may look at
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    pub displacement: Displacement,
    pub color: PieceColor,
    pub from: Cell,
    pub board_height: i32,
    pub enemy_at_destination: bool,
}

impl MoveContext {
    pub fn dx(&self) -> i32 {
        self.displacement.dx
    }

    pub fn dy(&self) -> i32 {
        self.displacement.dy
    }

    /// Row a pawn of this colour starts on
    pub fn home_rank(&self) -> i32 {
        match self.color {
            PieceColor::White => self.board_height - 2,
            PieceColor::Black => 1,
        }
    }
}

pub type FallbackRule = fn(&MoveContext) -> bool;

#[derive(Clone)]
pub struct FallbackRules {
    rules: HashMap<char, FallbackRule>,
}

impl fmt::Debug for FallbackRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<char> = self.rules.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("FallbackRules").field("codes", &codes).finish()
    }
}

impl Default for FallbackRules {
    /// Registry holding the six standard piece rules
    fn default() -> Self {
        let mut rules = Self::empty();
        rules.register(PieceKind::Pawn.code(), pawn);
        rules.register(PieceKind::Rook.code(), rook);
        rules.register(PieceKind::Knight.code(), knight);
        rules.register(PieceKind::Bishop.code(), bishop);
        rules.register(PieceKind::Queen.code(), one_step);
        rules.register(PieceKind::King.code(), one_step);
        rules
    }
}

impl FallbackRules {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule for a type code
    pub fn register(&mut self, code: char, rule: FallbackRule) -> Option<FallbackRule> {
        self.rules.insert(code.to_ascii_uppercase(), rule)
    }

    pub fn rule_for(&self, code: char) -> Option<FallbackRule> {
        self.rules.get(&code.to_ascii_uppercase()).copied()
    }

    pub fn is_registered(&self, code: char) -> bool {
        self.rule_for(code).is_some()
    }

    /// Evaluate the rule for `code`; an unregistered type never matches
    pub fn allows(&self, code: char, ctx: &MoveContext) -> bool {
        self.rule_for(code).is_some_and(|rule| rule(ctx))
    }
}

pub fn pawn(ctx: &MoveContext) -> bool {
    let forward = ctx.color.forward();
    let (dx, dy) = (ctx.dx(), ctx.dy());
    if dx == 0 && dy == forward {
        return true;
    }
    if dx == 0 && dy == 2 * forward && ctx.from.y == ctx.home_rank() {
        return true;
    }
    dx.abs() == 1 && dy == forward && ctx.enemy_at_destination
}

pub fn rook(ctx: &MoveContext) -> bool {
    let (dx, dy) = (ctx.dx().abs(), ctx.dy().abs());
    dx + dy == 1
}

pub fn knight(ctx: &MoveContext) -> bool {
    let (dx, dy) = (ctx.dx().abs(), ctx.dy().abs());
    (dx == 1 && dy == 2) || (dx == 2 && dy == 1)
}

pub fn bishop(ctx: &MoveContext) -> bool {
    ctx.dx().abs() == 1 && ctx.dy().abs() == 1
}

/// Queen and king: a single step in any of the eight directions
pub fn one_step(ctx: &MoveContext) -> bool {
    let (dx, dy) = (ctx.dx().abs(), ctx.dy().abs());
    dx <= 1 && dy <= 1 && !ctx.displacement.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(dx: i32, dy: i32, color: PieceColor, from: (i32, i32)) -> MoveContext {
        MoveContext {
            displacement: Displacement::new(dx, dy),
            color,
            from: Cell::new(from.0, from.1),
            board_height: 8,
            enemy_at_destination: false,
        }
    }

    #[test]
    fn test_pawn_two_step_only_from_home_rank() {
        //! White's home rank is row 6, black's is row 1
        let rules = FallbackRules::default();
        assert!(rules.allows('P', &ctx(0, -2, PieceColor::White, (4, 6))));
        assert!(!rules.allows('P', &ctx(0, -2, PieceColor::White, (4, 4))));
        assert!(rules.allows('P', &ctx(0, 2, PieceColor::Black, (3, 1))));
        assert!(!rules.allows('P', &ctx(0, 2, PieceColor::Black, (3, 2))));
    }

    #[test]
    fn test_pawn_forward_direction() {
        let rules = FallbackRules::default();
        assert!(rules.allows('P', &ctx(0, -1, PieceColor::White, (4, 4))));
        assert!(!rules.allows('P', &ctx(0, 1, PieceColor::White, (4, 4))), "White pawns cannot retreat");
        assert!(rules.allows('P', &ctx(0, 1, PieceColor::Black, (4, 4))));
    }

    #[test]
    fn test_pawn_diagonal_requires_enemy() {
        let rules = FallbackRules::default();
        let mut diagonal = ctx(1, -1, PieceColor::White, (3, 3));
        assert!(!rules.allows('P', &diagonal), "Diagonal onto an empty cell is illegal");
        diagonal.enemy_at_destination = true;
        assert!(rules.allows('P', &diagonal));
    }

    #[test]
    fn test_knight_l_shapes() {
        let rules = FallbackRules::default();
        let legal = [(1, 2), (2, 1), (-1, 2), (-2, 1), (1, -2), (2, -1), (-1, -2), (-2, -1)];
        for (dx, dy) in legal {
            assert!(rules.allows('N', &ctx(dx, dy, PieceColor::White, (4, 4))), "({dx},{dy})");
        }
        assert!(!rules.allows('N', &ctx(2, 2, PieceColor::White, (4, 4))));
        assert!(!rules.allows('N', &ctx(0, 1, PieceColor::White, (4, 4))));
    }

    #[test]
    fn test_single_step_rules() {
        let rules = FallbackRules::default();
        let white = |dx, dy| ctx(dx, dy, PieceColor::White, (4, 4));
        assert!(rules.allows('R', &white(0, 1)));
        assert!(!rules.allows('R', &white(1, 1)));
        assert!(!rules.allows('R', &white(0, 2)));
        assert!(rules.allows('B', &white(-1, 1)));
        assert!(!rules.allows('B', &white(1, 0)));
        for code in ['Q', 'K'] {
            assert!(rules.allows(code, &white(1, 1)));
            assert!(rules.allows(code, &white(0, -1)));
            assert!(!rules.allows(code, &white(0, 0)), "{code} null move must be rejected");
            assert!(!rules.allows(code, &white(2, 0)));
        }
    }

    #[test]
    fn test_register_custom_type() {
        //! Unknown codes never match until a rule is registered
        let mut rules = FallbackRules::default();
        let anything = ctx(3, 3, PieceColor::Black, (0, 0));
        assert!(!rules.allows('X', &anything));
        rules.register('x', |ctx| ctx.dx() == ctx.dy());
        assert!(rules.allows('X', &anything));
    }
}
