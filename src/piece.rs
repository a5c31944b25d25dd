use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, Serialize, Deserialize)]
pub enum PieceKind {
    Man,
    King,
}

// Stable piece identity for UI animation. Rules never look at it: a piece is identified by the
// square it occupies.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl PieceId {
    pub fn new() -> Self { PieceId(1) }
    // Placeholder for pieces that will get a real id later (e.g. parsed from a test diagram).
    pub fn tmp() -> Self { PieceId(0) }
    pub fn inc(&mut self) -> Self {
        let id = *self;
        self.0 = self.0.saturating_add(1);
        id
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, new)]
pub struct PieceOnBoard {
    pub id: PieceId,
    pub kind: PieceKind,
    pub force: Force,
}

impl PieceOnBoard {
    pub fn is_king(&self) -> bool { self.kind == PieceKind::King }
}

// Cell codes used by board snapshots: "." empty, "W"/"B" man, "WK"/"BK" king.
pub const EMPTY_CELL_CODE: &str = ".";

pub fn piece_to_cell_code(kind: PieceKind, force: Force) -> &'static str {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, kind) {
        (White, Man) => "W",
        (White, King) => "WK",
        (Black, Man) => "B",
        (Black, King) => "BK",
    }
}

// Returns `None` for an unknown code and `Some(None)` for an empty cell.
pub fn piece_from_cell_code(code: &str) -> Option<Option<(PieceKind, Force)>> {
    use self::Force::*;
    use self::PieceKind::*;
    match code {
        EMPTY_CELL_CODE => Some(None),
        "W" => Some(Some((Man, White))),
        "WK" => Some(Some((King, White))),
        "B" => Some(Some((Man, Black))),
        "BK" => Some(Some((King, Black))),
        _ => None,
    }
}

pub fn cell_code(piece: Option<&PieceOnBoard>) -> &'static str {
    match piece {
        None => EMPTY_CELL_CODE,
        Some(piece) => piece_to_cell_code(piece.kind, piece.force),
    }
}

pub fn piece_to_pictogram(kind: PieceKind, force: Force) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, kind) {
        (White, Man) => '⛀',
        (White, King) => '⛁',
        (Black, Man) => '⛂',
        (Black, King) => '⛃',
    }
}
