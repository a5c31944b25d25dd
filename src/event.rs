// Messages exchanged between the two peers. The JSON layout is shared with other clients, hence
// the untagged envelopes and camelCase field names.

use std::time::Duration;

use enum_map::{EnumMap, enum_map};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::clock::{TimeControl, TimerMode};
use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceId, PieceKind, PieceOnBoard, cell_code, piece_from_cell_code};
use crate::rules::{CheckersRules, GameSettings};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MessageError {
    // Not valid JSON or does not match any known message.
    Json(String),
    // Board is not 8x8.
    BadShape,
    UnknownCellCode(String),
    LightSquare(Coord),
    // A piece claims a position different from its place in the array.
    PositionMismatch { expected: Coord },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireColor {
    White,
    Black,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WirePieceType {
    Normal,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct WirePosition {
    pub row: i64,
    pub col: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePiece {
    pub id: u32,
    pub color: WireColor,
    #[serde(rename = "type")]
    pub kind: WirePieceType,
    pub position: WirePosition,
    // Redundant with `kind`; either one marks a king.
    pub is_king: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsData {
    // Color played by the sender.
    pub player_color: Force,
    pub timer_mode: TimerMode,
    // All times are in whole seconds.
    pub time_per_move: u64,
    pub initial_white_time: u64,
    pub initial_black_time: u64,
    // Missing means default rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<CheckersRules>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeerMessage {
    #[serde(rename_all = "camelCase")]
    BoardSnapshot {
        board_state: Vec<Vec<String>>,
        captured_white: u8,
        captured_black: u8,
    },
    #[serde(rename_all = "camelCase")]
    CurrentPlayer { current_player: Force },
    #[serde(rename_all = "camelCase")]
    GameSettings { game_settings: GameSettingsData },
    #[serde(rename_all = "camelCase")]
    InitialBoard { initial_board: Vec<Vec<Option<WirePiece>>> },
}

impl PeerMessage {
    pub fn snapshot(grid: &Grid, captured: EnumMap<Force, u8>) -> Self {
        PeerMessage::BoardSnapshot {
            board_state: grid_to_cells(grid),
            captured_white: captured[Force::White],
            captured_black: captured[Force::Black],
        }
    }

    pub fn initial_board(grid: &Grid) -> Self {
        PeerMessage::InitialBoard { initial_board: grid_to_wire_pieces(grid) }
    }

    pub fn settings(settings: &GameSettings, rules: CheckersRules) -> Self {
        PeerMessage::GameSettings {
            game_settings: GameSettingsData::new(settings, rules),
        }
    }
}

// Decodes a `BoardSnapshot` payload. Returned pieces carry temporary ids.
pub fn snapshot_contents(
    board_state: &[Vec<String>], captured_white: u8, captured_black: u8,
) -> Result<(Grid, EnumMap<Force, u8>), MessageError> {
    let grid = grid_from_cells(board_state)?;
    let captured = enum_map! {
        Force::White => captured_white,
        Force::Black => captured_black,
    };
    Ok((grid, captured))
}

impl GameSettingsData {
    pub fn new(settings: &GameSettings, rules: CheckersRules) -> Self {
        let seconds = settings.time_control.time_per_move.as_secs();
        GameSettingsData {
            player_color: settings.local_force,
            timer_mode: settings.time_control.mode,
            time_per_move: seconds,
            initial_white_time: seconds,
            initial_black_time: seconds,
            rules: Some(rules),
        }
    }

    pub fn rules(&self) -> CheckersRules { self.rules.unwrap_or_default() }

    pub fn time_control(&self) -> TimeControl {
        match self.timer_mode {
            TimerMode::NoLimit => TimeControl::no_limit(),
            TimerMode::TimePerMove => TimeControl::per_move(Duration::from_secs(self.time_per_move)),
        }
    }

    pub fn initial_time(&self, force: Force) -> Duration {
        Duration::from_secs(match force {
            Force::White => self.initial_white_time,
            Force::Black => self.initial_black_time,
        })
    }

    // Settings as seen by the receiving side: it plays the other color.
    pub fn receiver_settings(&self, board_style: u8) -> GameSettings {
        GameSettings {
            local_force: self.player_color.opponent(),
            time_control: self.time_control(),
            board_style,
        }
    }
}

fn check_shape<T>(rows: &[Vec<T>]) -> Result<(), MessageError> {
    let ok = rows.len() == NUM_ROWS as usize && rows.iter().all(|row| row.len() == NUM_COLS as usize);
    if ok { Ok(()) } else { Err(MessageError::BadShape) }
}

// Cells in row-major order, paired with their coordinates. Shape must be checked beforehand.
fn cells_with_coords<T>(rows: &[Vec<T>]) -> impl Iterator<Item = (Coord, &T)> {
    rows.iter().enumerate().flat_map(|(row, cells)| {
        cells.iter().enumerate().map(move |(col, cell)| (Coord::new(row as u8, col as u8), cell))
    })
}

fn place(grid: &mut Grid, coord: Coord, piece: PieceOnBoard) -> Result<(), MessageError> {
    if !coord.is_dark() {
        return Err(MessageError::LightSquare(coord));
    }
    grid[coord] = Some(piece);
    Ok(())
}

pub fn grid_to_cells(grid: &Grid) -> Vec<Vec<String>> {
    (0..NUM_ROWS)
        .map(|row| {
            (0..NUM_COLS)
                .map(|col| cell_code(grid[Coord::new(row, col)].as_ref()).to_owned())
                .collect_vec()
        })
        .collect_vec()
}

pub fn grid_from_cells(rows: &[Vec<String>]) -> Result<Grid, MessageError> {
    check_shape(rows)?;
    let mut grid = Grid::new();
    for (coord, code) in cells_with_coords(rows) {
        let cell = piece_from_cell_code(code)
            .ok_or_else(|| MessageError::UnknownCellCode(code.clone()))?;
        if let Some((kind, force)) = cell {
            place(&mut grid, coord, PieceOnBoard::new(PieceId::tmp(), kind, force))?;
        }
    }
    Ok(grid)
}

fn piece_to_wire(coord: Coord, piece: &PieceOnBoard) -> WirePiece {
    WirePiece {
        id: piece.id.0,
        color: match piece.force {
            Force::White => WireColor::White,
            Force::Black => WireColor::Black,
        },
        kind: match piece.kind {
            PieceKind::Man => WirePieceType::Normal,
            PieceKind::King => WirePieceType::King,
        },
        position: WirePosition {
            row: coord.row().into(),
            col: coord.col().into(),
        },
        is_king: piece.is_king(),
    }
}

fn piece_from_wire(piece: &WirePiece) -> PieceOnBoard {
    let force = match piece.color {
        WireColor::White => Force::White,
        WireColor::Black => Force::Black,
    };
    let kind = if piece.is_king || piece.kind == WirePieceType::King {
        PieceKind::King
    } else {
        PieceKind::Man
    };
    PieceOnBoard::new(PieceId(piece.id), kind, force)
}

pub fn grid_to_wire_pieces(grid: &Grid) -> Vec<Vec<Option<WirePiece>>> {
    (0..NUM_ROWS)
        .map(|row| {
            (0..NUM_COLS)
                .map(|col| {
                    let coord = Coord::new(row, col);
                    grid[coord].as_ref().map(|piece| piece_to_wire(coord, piece))
                })
                .collect_vec()
        })
        .collect_vec()
}

pub fn grid_from_wire_pieces(rows: &[Vec<Option<WirePiece>>]) -> Result<Grid, MessageError> {
    check_shape(rows)?;
    let mut grid = Grid::new();
    for (coord, cell) in cells_with_coords(rows) {
        if let Some(piece) = cell {
            let position = Coord::try_new(piece.position.row, piece.position.col);
            if position != Some(coord) {
                return Err(MessageError::PositionMismatch { expected: coord });
            }
            place(&mut grid, coord, piece_from_wire(piece))?;
        }
    }
    Ok(grid)
}
