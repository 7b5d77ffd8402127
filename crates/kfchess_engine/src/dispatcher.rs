//! Command dispatcher
//!
//! Translates a [`Command`] into board mutations. Every command is handed to
//! the command log first. Nothing here raises: each path ends in a
//! [`DispatchOutcome`], and every refusal names its [`Rejection`] so callers
//! can tell "illegal" from "still cooling down" from "no piece selected".
//!
//! ## Key Vocabulary
//!
//! | Key                   | Selecting                   | Accumulating                    |
//! |-----------------------|-----------------------------|---------------------------------|
//! | `UP` `DOWN` `LEFT` `RIGHT` | cycle selection and hover | adjust the pending displacement |
//! | `HOVER_<DIR>`         | cycle hover                 | cycle hover                     |
//! | `CONFIRM` `SPACE` `ENTER` | enter accumulating mode | execute pending move, exit mode |
//! | `ESCAPE` `ESC`        | nothing                     | exit mode, clear pending        |
//! | `SELECT_HOVER`        | select the hovered piece    | same                            |
//! | `1`..`8`              | select the n-th own piece   | same                            |
//! | `MOVE`                | execute the pending move    | same                            |
//! | `JUMP`                | jump with the pending move  | same                            |

use crate::capture::{self, CaptureOutcome};
use crate::command::{Command, CommandKind};
use crate::events::{GameEvent, SoundKind};
use crate::rules::MoveValidator;
use crate::session::{CycleDirection, PlayerSession};
use crate::state::Phase;
use crate::types::{Cell, Displacement, Millis, PieceKind, Player};
use crate::world::World;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ControlAction {
    Start,
    End,
    /// Unknown action text, including malformed input wrapped by the codec
    Unrecognized,
}

impl ControlAction {
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_uppercase().as_str() {
            "START_GAME" | "START" => ControlAction::Start,
            "END_GAME" | "QUIT" => ControlAction::End,
            _ => ControlAction::Unrecognized,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// The player has no piece selected
    NoSelection,
    /// The named piece is not on the board
    UnknownPiece,
    /// The piece belongs to the other player
    NotOwner,
    /// The piece's current phase has not elapsed
    Cooling,
    /// Neither the moves table nor the fallback rule allows it
    IllegalMove,
    /// The destination is off the board
    OutOfBounds,
    /// A friendly piece stands on the destination
    Blocked,
    /// A structured move names a `from` square the piece is not on
    StaleOrigin,
    /// A square could not be read
    InvalidSquare,
    /// The pending displacement is zero
    NoPendingMove,
    UnknownKey,
    /// Key input from a player without a session
    NoSession,
    GameOver,
    /// A required command field is absent
    MissingField,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DispatchOutcome {
    /// An unobstructed move started; the piece arrives later
    Moved {
        piece_id: String,
        from: Cell,
        to: Cell,
    },
    Captured {
        piece_id: String,
        captured_id: String,
        captured_kind: PieceKind,
        at: Cell,
        /// Set when the capture ended the game
        winner: Option<Player>,
    },
    Jumped {
        piece_id: String,
        from: Cell,
        to: Cell,
    },
    Selected {
        piece_id: String,
    },
    Hovered {
        piece_id: String,
    },
    PendingChanged {
        pending: Displacement,
    },
    ModeEntered,
    ModeExited,
    Control(ControlAction),
    Rejected(Rejection),
}

impl DispatchOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, DispatchOutcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            DispatchOutcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Id of a piece this outcome removed from the board
    pub fn captured_id(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Captured { captured_id, .. } => Some(captured_id),
            _ => None,
        }
    }
}

/// A key from the dispatcher vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Direction(Direction),
    Hover(Direction),
    Confirm,
    Escape,
    SelectHover,
    /// 1-based piece number
    Number(usize),
    Move,
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "UP" => Some(Direction::Up),
            "DOWN" => Some(Direction::Down),
            "LEFT" => Some(Direction::Left),
            "RIGHT" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step in board coordinates; up is toward row 0
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn cycle(self) -> CycleDirection {
        match self {
            Direction::Up | Direction::Left => CycleDirection::Previous,
            Direction::Down | Direction::Right => CycleDirection::Next,
        }
    }
}

impl KeyAction {
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim().to_uppercase();
        if let Some(direction) = Direction::parse(&key) {
            return Some(KeyAction::Direction(direction));
        }
        if let Some(direction) = key.strip_prefix("HOVER_").and_then(Direction::parse) {
            return Some(KeyAction::Hover(direction));
        }
        let action = match key.as_str() {
            "CONFIRM" | "SPACE" | "ENTER" => KeyAction::Confirm,
            "ESCAPE" | "ESC" => KeyAction::Escape,
            "SELECT_HOVER" => KeyAction::SelectHover,
            "MOVE" => KeyAction::Move,
            "JUMP" => KeyAction::Jump,
            digits => match digits.parse::<usize>() {
                Ok(n @ 1..=8) => KeyAction::Number(n),
                _ => return None,
            },
        };
        Some(action)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    validator: MoveValidator,
}

impl Dispatcher {
    pub fn new(validator: MoveValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &MoveValidator {
        &self.validator
    }

    /// Apply `command` to `world` at engine time `now`
    ///
    /// `session` is the issuing player's session; key input without one is
    /// rejected.
    pub fn dispatch(
        &self,
        world: &mut World,
        session: Option<&mut PlayerSession>,
        command: &Command,
        now: Millis,
    ) -> DispatchOutcome {
        world.log.log_command(command);
        if world.status().is_over() {
            return DispatchOutcome::Rejected(Rejection::GameOver);
        }

        let outcome = match command.kind() {
            CommandKind::Move | CommandKind::Jump => self.structured(world, command, now),
            CommandKind::KeyInput => match session {
                Some(session) => self.key_input(world, session, command, now),
                None => self.system_key(world, command),
            },
            CommandKind::GameControl => self.control(world, command),
        };
        debug!("[DISPATCH] {} -> {:?}", command.text(), outcome);
        outcome
    }

    fn control(&self, world: &mut World, command: &Command) -> DispatchOutcome {
        let action = if command.is_well_formed() {
            ControlAction::from_text(command.key_input().unwrap_or_default())
        } else {
            ControlAction::Unrecognized
        };
        self.apply_control(world, action, command)
    }

    /// Unprefixed key text such as `END_GAME` parses as a system key; known
    /// control actions are honoured, anything else has no session to act on
    fn system_key(&self, world: &mut World, command: &Command) -> DispatchOutcome {
        match ControlAction::from_text(command.key_input().unwrap_or_default()) {
            ControlAction::Unrecognized => DispatchOutcome::Rejected(Rejection::NoSession),
            action => self.apply_control(world, action, command),
        }
    }

    fn apply_control(&self, world: &mut World, action: ControlAction, command: &Command) -> DispatchOutcome {
        match action {
            ControlAction::Start => {
                world.start();
            }
            ControlAction::End => {
                world.abort();
            }
            ControlAction::Unrecognized => {
                debug!("[DISPATCH] Ignoring control {:?}", command.text());
            }
        }
        DispatchOutcome::Control(action)
    }

    /// `WQW D1->D4` style commands: the piece must stand on `from`
    fn structured(&self, world: &mut World, command: &Command, now: Millis) -> DispatchOutcome {
        let (Some(piece_id), Some(from), Some(to)) = (command.piece_id(), command.from(), command.to())
        else {
            return DispatchOutcome::Rejected(Rejection::MissingField);
        };
        let height = world.board.extents().height;
        let (Ok(from), Ok(to)) = (Cell::from_notation(from, height), Cell::from_notation(to, height))
        else {
            return DispatchOutcome::Rejected(Rejection::InvalidSquare);
        };
        let Some(piece) = world.board.get(piece_id) else {
            return DispatchOutcome::Rejected(Rejection::UnknownPiece);
        };
        if !command.player().owns(piece.color()) {
            return DispatchOutcome::Rejected(Rejection::NotOwner);
        }
        if piece.logical_cell() != from {
            return DispatchOutcome::Rejected(Rejection::StaleOrigin);
        }

        let piece_id = piece_id.to_string();
        let displacement = from.offset_to(to);
        match command.kind() {
            CommandKind::Jump => self.jump_piece(world, &piece_id, command, displacement, now),
            _ => self.move_piece(world, &piece_id, command, displacement, now),
        }
    }

    fn key_input(
        &self,
        world: &mut World,
        session: &mut PlayerSession,
        command: &Command,
        now: Millis,
    ) -> DispatchOutcome {
        let Some(action) = command.key_input().and_then(KeyAction::parse) else {
            return DispatchOutcome::Rejected(Rejection::UnknownKey);
        };
        let player = session.player();

        match action {
            KeyAction::Direction(direction) if session.is_accumulating() => {
                let (dx, dy) = direction.step();
                session.add_pending(dx, dy);
                DispatchOutcome::PendingChanged {
                    pending: session.pending,
                }
            }
            KeyAction::Direction(direction) => {
                let ids = world.board.player_piece_ids(player);
                match session.cycle_selection(&ids, direction.cycle()) {
                    Some(id) => DispatchOutcome::Selected {
                        piece_id: id.to_string(),
                    },
                    None => DispatchOutcome::Rejected(Rejection::NoSelection),
                }
            }
            KeyAction::Hover(direction) => {
                let ids = world.board.player_piece_ids(player);
                match session.cycle_hover(&ids, direction.cycle()) {
                    Some(id) => DispatchOutcome::Hovered {
                        piece_id: id.to_string(),
                    },
                    None => DispatchOutcome::Rejected(Rejection::NoSelection),
                }
            }
            KeyAction::Confirm if session.is_accumulating() => {
                let outcome = if session.pending.is_zero() {
                    DispatchOutcome::ModeExited
                } else {
                    self.pending_move(world, session, command, now)
                };
                session.exit_accumulating();
                outcome
            }
            KeyAction::Confirm => {
                let selected_on_board = session
                    .selected
                    .as_deref()
                    .is_some_and(|id| world.board.contains(id));
                if !selected_on_board {
                    return DispatchOutcome::Rejected(Rejection::NoSelection);
                }
                session.enter_accumulating();
                DispatchOutcome::ModeEntered
            }
            KeyAction::Escape => {
                session.exit_accumulating();
                DispatchOutcome::ModeExited
            }
            KeyAction::SelectHover => {
                let Some(hovered) = session.hovered.clone() else {
                    return DispatchOutcome::Rejected(Rejection::NoSelection);
                };
                let Some(piece) = world.board.get(&hovered) else {
                    return DispatchOutcome::Rejected(Rejection::UnknownPiece);
                };
                if !player.owns(piece.color()) {
                    return DispatchOutcome::Rejected(Rejection::NotOwner);
                }
                session.selected = Some(hovered.clone());
                DispatchOutcome::Selected { piece_id: hovered }
            }
            KeyAction::Number(n) => {
                let ids = world.board.player_piece_ids(player);
                let Some(id) = ids.get(n - 1) else {
                    return DispatchOutcome::Rejected(Rejection::UnknownPiece);
                };
                session.selected = Some(id.clone());
                session.hovered = Some(id.clone());
                DispatchOutcome::Selected {
                    piece_id: id.clone(),
                }
            }
            KeyAction::Move => {
                if session.pending.is_zero() {
                    return DispatchOutcome::Rejected(Rejection::NoPendingMove);
                }
                self.pending_move(world, session, command, now)
            }
            KeyAction::Jump => {
                let Some(piece_id) = session.selected.clone() else {
                    return DispatchOutcome::Rejected(Rejection::NoSelection);
                };
                let displacement = session.take_pending();
                self.jump_piece(world, &piece_id, command, displacement, now)
            }
        }
    }

    /// Move the selected piece by the pending displacement, consuming it
    fn pending_move(
        &self,
        world: &mut World,
        session: &mut PlayerSession,
        command: &Command,
        now: Millis,
    ) -> DispatchOutcome {
        let Some(piece_id) = session.selected.clone() else {
            return DispatchOutcome::Rejected(Rejection::NoSelection);
        };
        let displacement = session.take_pending();
        self.move_piece(world, &piece_id, command, displacement, now)
    }

    /// Regular move: validator, bounds, then capture or an interpolated motion
    fn move_piece(
        &self,
        world: &mut World,
        piece_id: &str,
        command: &Command,
        displacement: Displacement,
        now: Millis,
    ) -> DispatchOutcome {
        let destination = match self.check_move(world, piece_id, command.player(), displacement, now) {
            Ok(destination) => destination,
            Err(rejection) => return DispatchOutcome::Rejected(rejection),
        };

        if world.board.occupant_at(destination).is_some() {
            return self.capture(world, piece_id, command, destination, Phase::Rest, now);
        }

        let Some(piece) = world.board.get_mut(piece_id) else {
            return DispatchOutcome::Rejected(Rejection::UnknownPiece);
        };
        let from = piece.logical_cell();
        piece.state.set_phase(Phase::Move, now);
        world.scheduler.schedule(&mut world.board, piece_id, destination, now);

        info!("[DISPATCH] {} moving {} -> {}", piece_id, from, destination);
        self.publish_move(world, piece_id, from, destination, None, now);
        world.bus.publish(&GameEvent::Sound {
            kind: SoundKind::Move,
        });
        DispatchOutcome::Moved {
            piece_id: piece_id.to_string(),
            from,
            to: destination,
        }
    }

    /// Jump: lands at once with no intermediate checks. A zero displacement
    /// is a jump in place.
    fn jump_piece(
        &self,
        world: &mut World,
        piece_id: &str,
        command: &Command,
        displacement: Displacement,
        now: Millis,
    ) -> DispatchOutcome {
        let Some(piece) = world.board.get_mut(piece_id) else {
            return DispatchOutcome::Rejected(Rejection::UnknownPiece);
        };
        if !command.player().owns(piece.color()) {
            return DispatchOutcome::Rejected(Rejection::NotOwner);
        }
        if !piece.can_act(now) {
            return DispatchOutcome::Rejected(Rejection::Cooling);
        }
        let from = piece.logical_cell();

        if displacement.is_zero() {
            piece.state.set_phase(Phase::Jump, now);
            debug!("[DISPATCH] {} jumps in place at {}", piece_id, from);
            world.bus.publish(&GameEvent::Sound {
                kind: SoundKind::Jump,
            });
            return DispatchOutcome::Jumped {
                piece_id: piece_id.to_string(),
                from,
                to: from,
            };
        }

        let destination = match self.check_move(world, piece_id, command.player(), displacement, now) {
            Ok(destination) => destination,
            Err(rejection) => return DispatchOutcome::Rejected(rejection),
        };
        if world.board.occupant_at(destination).is_some() {
            return self.capture(world, piece_id, command, destination, Phase::Jump, now);
        }

        let Some(piece) = world.board.get_mut(piece_id) else {
            return DispatchOutcome::Rejected(Rejection::UnknownPiece);
        };
        piece.place_at(destination);
        piece.state.set_phase(Phase::Jump, now);

        info!("[DISPATCH] {} jumped {} -> {}", piece_id, from, destination);
        self.publish_move(world, piece_id, from, destination, None, now);
        world.bus.publish(&GameEvent::Sound {
            kind: SoundKind::Jump,
        });
        DispatchOutcome::Jumped {
            piece_id: piece_id.to_string(),
            from,
            to: destination,
        }
    }

    /// Shared gate for moves and jumps: ownership, readiness, legality and
    /// bounds. Returns the destination cell.
    fn check_move(
        &self,
        world: &World,
        piece_id: &str,
        player: Player,
        displacement: Displacement,
        now: Millis,
    ) -> Result<Cell, Rejection> {
        let piece = world.board.get(piece_id).ok_or(Rejection::UnknownPiece)?;
        if !player.owns(piece.color()) {
            return Err(Rejection::NotOwner);
        }
        if !piece.can_act(now) {
            return Err(Rejection::Cooling);
        }
        if displacement.is_zero() {
            return Err(Rejection::NoPendingMove);
        }
        let legality = self
            .validator
            .check(piece, displacement, &world.board)
            .ok_or(Rejection::IllegalMove)?;
        let destination = piece.logical_cell() + displacement;
        if !world.board.extents().contains(destination) {
            return Err(Rejection::OutOfBounds);
        }
        debug!("[DISPATCH] {} {} allowed by {:?}", piece_id, displacement, legality);
        Ok(destination)
    }

    fn capture(
        &self,
        world: &mut World,
        piece_id: &str,
        command: &Command,
        destination: Cell,
        phase: Phase,
        now: Millis,
    ) -> DispatchOutcome {
        match capture::resolve(&mut world.board, piece_id, destination, phase, now) {
            CaptureOutcome::Captured { captured, at, from } => {
                let player = world
                    .board
                    .get(piece_id)
                    .map_or(command.player(), |mover| Player::from(mover.color()));
                self.publish_move(world, piece_id, from, at, Some(captured.kind()), now);
                world.bus.publish(&GameEvent::Sound {
                    kind: SoundKind::Capture,
                });
                world.log.log_capture(player, captured.id(), command);
                let winner = world.check_game_end();
                DispatchOutcome::Captured {
                    piece_id: piece_id.to_string(),
                    captured_id: captured.id().to_string(),
                    captured_kind: captured.kind(),
                    at,
                    winner,
                }
            }
            CaptureOutcome::Blocked(reason) => {
                debug!("[DISPATCH] {} blocked at {}: {:?}", piece_id, destination, reason);
                DispatchOutcome::Rejected(Rejection::Blocked)
            }
        }
    }

    fn publish_move(
        &self,
        world: &mut World,
        piece_id: &str,
        from: Cell,
        to: Cell,
        captured: Option<PieceKind>,
        now: Millis,
    ) {
        let Some(piece) = world.board.get(piece_id) else {
            return;
        };
        let (player, piece_type) = (Player::from(piece.color()), piece.kind());
        let (from, to) = (world.notation(from), world.notation(to));
        let move_number = world.next_move_number();
        world.bus.publish(&GameEvent::PieceMoved {
            piece_id: piece_id.to_string(),
            from,
            to,
            player,
            piece_type,
            move_number,
            captured_piece_type: captured,
            at: now,
        });
    }
}
