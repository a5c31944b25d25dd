use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use enum_map::{EnumMap, enum_map};
use log::info;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::board::{Board, MoveOutcome, TurnError};
use crate::clock::{Clock, TimeControl};
use crate::coord::Coord;
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceId, PieceKind, PieceOnBoard};
use crate::rules::CheckersRules;
use crate::starter::generate_starting_grid;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum VictoryReason {
    // The loser has no pieces left.
    Elimination,
    // The loser is to move but has no legal move.
    Blocked,
    Flag,
    // The loser left the game.
    Forfeit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DrawReason {
    KingsOnly,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Victory(Force, VictoryReason),
    Draw(DrawReason),
}

// Blocked detection needs to know whose turn it is, which a board snapshot alone does not tell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Evaluation {
    MaterialOnly,
    Full,
}

fn material_status(grid: &Grid) -> Option<GameStatus> {
    let lone_king = |force| grid.count(force) == 1 && grid.count_kind(force, PieceKind::King) == 1;
    if lone_king(Force::White) && lone_king(Force::Black) {
        return Some(GameStatus::Draw(DrawReason::KingsOnly));
    }
    Force::iter()
        .find(|&force| grid.count(force) == 0)
        .map(|force| GameStatus::Victory(force.opponent(), VictoryReason::Elimination))
}

// Keeps piece ids stable across a wholesale grid replacement: a piece that did not move keeps its
// id, and so does a piece that is the only one of its force to have changed squares. Everything
// else is treated as new.
fn reconcile_piece_ids(old: &Grid, new: &Grid, next_id: &mut PieceId) -> Grid {
    let same_force = |a: Option<PieceOnBoard>, b: Option<PieceOnBoard>| match (a, b) {
        (Some(a), Some(b)) => a.force == b.force,
        _ => false,
    };
    let mut result = Grid::new();
    let mut moved: EnumMap<Force, (Vec<Coord>, Vec<Coord>)> = EnumMap::default();
    for coord in Coord::all() {
        if same_force(old[coord], new[coord]) {
            if let (Some(old_piece), Some(new_piece)) = (old[coord], new[coord]) {
                result[coord] = Some(PieceOnBoard { id: old_piece.id, ..new_piece });
            }
            continue;
        }
        if let Some(old_piece) = old[coord] {
            moved[old_piece.force].0.push(coord);
        }
        if let Some(new_piece) = new[coord] {
            moved[new_piece.force].1.push(coord);
        }
    }
    for (_, (vanished, appeared)) in moved {
        let inherited_id = match (vanished.as_slice(), appeared.as_slice()) {
            ([from], [_]) => old[*from].map(|piece| piece.id),
            _ => None,
        };
        for to in appeared {
            if let Some(piece) = new[to] {
                let id = inherited_id.unwrap_or_else(|| next_id.inc());
                result[to] = Some(PieceOnBoard { id, ..piece });
            }
        }
    }
    result
}


// A single match: the board, who won, captured counters and the per-move clock.
#[derive(Clone, Debug)]
pub struct CheckersGame {
    board: Board,
    status: GameStatus,
    captured: EnumMap<Force, u8>,
    clock: Clock,
    next_piece_id: PieceId,
}

impl CheckersGame {
    pub fn new(rules: CheckersRules, time_control: TimeControl) -> Self {
        let mut next_piece_id = PieceId::new();
        let starting_grid = generate_starting_grid(&mut next_piece_id);
        let mut game = Self::new_with_grid(rules, time_control, starting_grid, Force::White);
        game.next_piece_id = next_piece_id;
        game
    }

    // Starts from an arbitrary position. Status is evaluated immediately, so a position without
    // moves for `active_force` is already over.
    pub fn new_with_grid(
        rules: CheckersRules, time_control: TimeControl, grid: Grid, active_force: Force,
    ) -> Self {
        let max_id = grid.pieces().map(|(_, piece)| piece.id.0).max().unwrap_or(0);
        let next_piece_id = PieceId(max_id.saturating_add(1));
        let mut game = CheckersGame {
            board: Board::new(Rc::new(rules), grid, active_force),
            status: GameStatus::Active,
            captured: enum_map! { _ => 0 },
            clock: Clock::new(time_control),
            next_piece_id,
        };
        game.update_status(Evaluation::Full);
        game
    }

    // Back to the starting position with the same rules and time control.
    pub fn reset(&mut self) {
        let rules = *self.board.rules();
        let time_control = self.clock.control().clone();
        *self = Self::new(rules, time_control);
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn grid(&self) -> &Grid { self.board.grid() }
    pub fn rules(&self) -> &CheckersRules { self.board.rules() }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn is_active(&self) -> bool { self.status == GameStatus::Active }
    pub fn game_over(&self) -> bool { !self.is_active() }
    pub fn is_draw(&self) -> bool { matches!(self.status, GameStatus::Draw(_)) }
    pub fn winner(&self) -> Option<Force> {
        match self.status {
            GameStatus::Victory(force, _) => Some(force),
            GameStatus::Active | GameStatus::Draw(_) => None,
        }
    }
    // Number of `force`'s pieces that were captured.
    pub fn captured(&self, force: Force) -> u8 { self.captured[force] }
    pub fn captured_counts(&self) -> EnumMap<Force, u8> { self.captured }
    pub fn clock(&self) -> &Clock { &self.clock }
    pub fn clock_mut(&mut self) -> &mut Clock { &mut self.clock }
    pub fn active_force(&self) -> Force { self.board.active_force() }
    pub fn chain_origin(&self) -> Option<Coord> { self.board.chain_origin() }

    pub fn legal_destinations(&self, from: Coord) -> HashSet<Coord> {
        if self.game_over() {
            return HashSet::new();
        }
        self.board.legal_destinations(from)
    }

    pub fn legal_moves(&self) -> Vec<(Coord, Coord)> {
        if self.game_over() {
            return vec![];
        }
        self.board.legal_moves()
    }

    pub fn check_move(&self, from: Coord, to: Coord) -> Result<(), TurnError> {
        if self.game_over() {
            return Err(TurnError::GameOver);
        }
        self.board.check_move(from, to)
    }

    pub fn is_legal_move(&self, from: Coord, to: Coord) -> bool { self.check_move(from, to).is_ok() }

    pub fn try_move(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, TurnError> {
        if self.game_over() {
            return Err(TurnError::GameOver);
        }
        let outcome = self.board.try_move(from, to)?;
        if let Some(capture) = outcome.capture {
            let count = &mut self.captured[capture.piece.force];
            *count = count.saturating_add(1);
        }
        if outcome.chain_continues {
            // The peer checks material on every snapshot, so do it after every step too.
            self.update_status(Evaluation::MaterialOnly);
        } else {
            self.clock.new_turn(self.board.active_force());
            self.update_status(Evaluation::Full);
        }
        Ok(outcome)
    }

    // Ignored when the game is already over or there is no time limit.
    pub fn on_time_expired(&mut self, force: Force) {
        if self.game_over() || !self.clock.control().is_limited() {
            return;
        }
        self.set_status(GameStatus::Victory(force.opponent(), VictoryReason::Flag));
    }

    pub fn tick_clock(&mut self, elapsed: Duration) {
        if self.game_over() {
            return;
        }
        if let Some(force) = self.clock.tick(elapsed) {
            self.on_time_expired(force);
        }
    }

    pub fn forfeit(&mut self, loser: Force) {
        if self.game_over() {
            return;
        }
        self.set_status(GameStatus::Victory(loser.opponent(), VictoryReason::Forfeit));
    }

    // Mirrors the board reported by the peer. Only material conditions are checked here: the turn
    // arrives separately via `apply_remote_active_force`.
    pub fn apply_snapshot(
        &mut self, grid: &Grid, captured: EnumMap<Force, u8>,
    ) -> Result<(), TurnError> {
        if self.game_over() {
            return Err(TurnError::GameOver);
        }
        let grid = reconcile_piece_ids(self.board.grid(), grid, &mut self.next_piece_id);
        self.board.replace_grid(grid);
        self.captured = captured;
        self.update_status(Evaluation::MaterialOnly);
        Ok(())
    }

    // The move that ends a game is still followed by the side to move, so after game over this only
    // records the force.
    pub fn apply_remote_active_force(&mut self, force: Force) {
        if self.game_over() {
            self.board.set_active_force(force);
            return;
        }
        let turn_changed = force != self.board.active_force();
        self.board.set_active_force(force);
        if turn_changed {
            self.clock.new_turn(force);
        }
        self.update_status(Evaluation::Full);
    }

    fn update_status(&mut self, evaluation: Evaluation) {
        if self.game_over() {
            return;
        }
        let mut status = material_status(self.board.grid());
        if status.is_none() && evaluation == Evaluation::Full && self.board.chain_origin().is_none() {
            let force = self.board.active_force();
            if !self.board.has_any_legal_move(force) {
                status = Some(GameStatus::Victory(force.opponent(), VictoryReason::Blocked));
            }
        }
        if let Some(status) = status {
            self.set_status(status);
        }
    }

    fn set_status(&mut self, status: GameStatus) {
        info!("Game over: {status:?}");
        self.status = status;
        self.clock.stop();
    }
}
