use std::collections::HashSet;
use std::rc::Rc;

use crate::coord::{Coord, DIAGONALS, NUM_ROWS};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceKind, PieceOnBoard};
use crate::rules::CheckersRules;


fn promotion_row(force: Force) -> u8 {
    match force {
        Force::White => 0,
        Force::Black => NUM_ROWS - 1,
    }
}

fn should_promote(piece: &PieceOnBoard, to: Coord) -> bool {
    piece.kind == PieceKind::Man && to.row() == promotion_row(piece.force)
}

fn capture_directions(rules: &CheckersRules, piece: &PieceOnBoard) -> Vec<(i8, i8)> {
    if piece.is_king() || rules.capture_backward {
        DIAGONALS.to_vec()
    } else {
        let forward = piece.force.forward();
        vec![(forward, -1), (forward, 1)]
    }
}

// All captures available to the piece at `from`, one per diagonal at most.
fn capture_steps(grid: &Grid, rules: &CheckersRules, from: Coord) -> Vec<CaptureStep> {
    let Some(piece) = grid[from] else {
        return vec![];
    };
    let long_range = piece.is_king() && rules.flying_kings;
    let mut steps = Vec::new();
    for direction in capture_directions(rules, &piece) {
        // The first occupied square on the ray. Without long range it must be adjacent.
        let mut victim = None;
        for pos in from.ray(direction) {
            if let Some(other) = grid[pos] {
                victim = Some((pos, other));
                break;
            }
            if !long_range {
                break;
            }
        }
        if let Some((victim_pos, victim_piece)) = victim {
            let landing = victim_pos.offset(direction);
            if victim_piece.force != piece.force && grid.get(landing).is_free() {
                if let Some(to) = landing {
                    steps.push(CaptureStep {
                        to,
                        captured: victim_pos,
                        captured_piece: victim_piece,
                    });
                }
            }
        }
    }
    steps
}

fn quiet_destinations(grid: &Grid, rules: &CheckersRules, from: Coord) -> Vec<Coord> {
    let Some(piece) = grid[from] else {
        return vec![];
    };
    let mut destinations = Vec::new();
    match piece.kind {
        PieceKind::Man => {
            let forward = piece.force.forward();
            for d_col in [-1, 1] {
                if let Some(to) = from.offset((forward, d_col)) {
                    if grid[to].is_none() {
                        destinations.push(to);
                    }
                }
            }
        },
        PieceKind::King => {
            for direction in DIAGONALS {
                for to in from.ray(direction) {
                    if grid[to].is_some() {
                        break;
                    }
                    destinations.push(to);
                    if !rules.flying_kings {
                        break;
                    }
                }
            }
        },
    }
    destinations
}


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnError {
    PieceMissing,
    WrongTurnOrder,
    // Another piece is in the middle of a capture chain and must continue it.
    ChainCaptureInProgress,
    // A capture is available, so quiet moves are forbidden.
    CaptureRequired,
    ImpossibleTrajectory,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct CaptureStep {
    to: Coord,
    captured: Coord,
    captured_piece: PieceOnBoard,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Capture {
    pub pos: Coord,
    pub piece: PieceOnBoard,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub from: Coord,
    pub to: Coord,
    pub capture: Option<Capture>,
    pub promoted: bool,
    // The same piece must capture again: the turn did not pass.
    pub chain_continues: bool,
}

// Grid plus everything the move rules depend on: whose turn it is and whether a capture chain is
// in progress. Game status lives one level up, in `CheckersGame`.
#[derive(Clone, Debug)]
pub struct Board {
    rules: Rc<CheckersRules>,
    grid: Grid,
    active_force: Force,
    chain_origin: Option<Coord>,
}

impl Board {
    pub fn new(rules: Rc<CheckersRules>, grid: Grid, active_force: Force) -> Self {
        Board {
            rules,
            grid,
            active_force,
            chain_origin: None,
        }
    }

    pub fn rules(&self) -> &CheckersRules { &self.rules }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn active_force(&self) -> Force { self.active_force }
    pub fn chain_origin(&self) -> Option<Coord> { self.chain_origin }

    // Wholesale replacement, used when mirroring the peer. Drops chain state: the peer tells us
    // whose turn it is separately.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.chain_origin = None;
    }
    pub fn set_active_force(&mut self, force: Force) {
        self.active_force = force;
        self.chain_origin = None;
    }

    pub fn force_has_capture(&self, force: Force) -> bool {
        self.grid
            .pieces_of(force)
            .any(|(pos, _)| !capture_steps(&self.grid, &self.rules, pos).is_empty())
    }

    // Every square the piece at `from` may move to this turn, honoring mandatory capture and the
    // pending capture chain.
    pub fn legal_destinations(&self, from: Coord) -> HashSet<Coord> {
        let Some(piece) = self.grid[from] else {
            return HashSet::new();
        };
        // Only the side to move has destinations.
        if piece.force != self.active_force {
            return HashSet::new();
        }
        let captures_only = match self.chain_origin {
            Some(origin) if origin != from => return HashSet::new(),
            Some(_) => true,
            None => self.force_has_capture(piece.force),
        };
        if captures_only {
            capture_steps(&self.grid, &self.rules, from).into_iter().map(|step| step.to).collect()
        } else {
            quiet_destinations(&self.grid, &self.rules, from).into_iter().collect()
        }
    }

    pub fn has_any_legal_move(&self, force: Force) -> bool {
        self.grid.pieces_of(force).any(|(pos, _)| !self.legal_destinations(pos).is_empty())
    }

    // All (from, to) pairs available to the active force.
    pub fn legal_moves(&self) -> Vec<(Coord, Coord)> {
        let mut moves = self
            .grid
            .pieces_of(self.active_force)
            .flat_map(|(from, _)| self.legal_destinations(from).into_iter().map(move |to| (from, to)))
            .collect::<Vec<_>>();
        moves.sort();
        moves
    }

    pub fn is_legal_move(&self, from: Coord, to: Coord) -> bool { self.check_move(from, to).is_ok() }

    pub fn check_move(&self, from: Coord, to: Coord) -> Result<(), TurnError> {
        self.move_outcome(from, to).map(|_| ())
    }

    pub fn try_move(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, TurnError> {
        // Two phases: first validate and find the captured piece (no changes), then apply (cannot
        // fail).
        let (piece, capture_step) = self.move_outcome(from, to)?;
        Ok(self.apply_move(from, to, piece, capture_step))
    }

    fn move_outcome(&self, from: Coord, to: Coord)
        -> Result<(PieceOnBoard, Option<CaptureStep>), TurnError>
    {
        let piece = self.grid[from].ok_or(TurnError::PieceMissing)?;
        if piece.force != self.active_force {
            return Err(TurnError::WrongTurnOrder);
        }
        if let Some(origin) = self.chain_origin {
            if origin != from {
                return Err(TurnError::ChainCaptureInProgress);
            }
        }
        let captures = capture_steps(&self.grid, &self.rules, from);
        if let Some(step) = captures.iter().find(|step| step.to == to) {
            return Ok((piece, Some(*step)));
        }
        if self.chain_origin.is_some() {
            return Err(TurnError::ImpossibleTrajectory);
        }
        let quiet_ok = quiet_destinations(&self.grid, &self.rules, from).contains(&to);
        match (quiet_ok, self.force_has_capture(piece.force)) {
            (true, false) => Ok((piece, None)),
            (true, true) => Err(TurnError::CaptureRequired),
            (false, _) => Err(TurnError::ImpossibleTrajectory),
        }
    }

    fn apply_move(
        &mut self, from: Coord, to: Coord, mut piece: PieceOnBoard, capture_step: Option<CaptureStep>,
    ) -> MoveOutcome {
        self.grid.take(from);
        let capture = capture_step.map(|step| {
            self.grid.take(step.captured);
            Capture{ pos: step.captured, piece: step.captured_piece }
        });
        let promoted = should_promote(&piece, to);
        if promoted {
            piece.kind = PieceKind::King;
        }
        self.grid[to] = Some(piece);

        // A freshly promoted king continues the chain with king movement.
        let chain_continues =
            capture.is_some() && !capture_steps(&self.grid, &self.rules, to).is_empty();
        if chain_continues {
            self.chain_origin = Some(to);
        } else {
            self.chain_origin = None;
            self.active_force = self.active_force.opponent();
        }
        MoveOutcome{ from, to, capture, promoted, chain_continues }
    }
}
