use std::{fmt, ops};

use crate::coord::{Coord, NUM_SQUARES};
use crate::force::Force;
use crate::piece::{PieceKind, PieceOnBoard};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GridItem<T> {
    Piece(T),
    Empty,
    OutOfBounds,
}

impl<T> GridItem<T> {
    pub fn is_free(&self) -> bool { matches!(self, GridItem::Empty) }
}

// Fixed arena of 64 slots indexed by `row * 8 + col`. Moving a piece means taking it out of one
// slot and putting it into another.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    data: [Option<PieceOnBoard>; NUM_SQUARES],
}

impl Grid {
    pub fn new() -> Self { Grid { data: [None; NUM_SQUARES] } }

    pub fn get(&self, pos: Option<Coord>) -> GridItem<&PieceOnBoard> {
        match pos {
            None => GridItem::OutOfBounds,
            Some(pos) => match &self.data[pos.to_index()] {
                None => GridItem::Empty,
                Some(piece) => GridItem::Piece(piece),
            },
        }
    }

    pub fn take(&mut self, pos: Coord) -> Option<PieceOnBoard> { self.data[pos.to_index()].take() }

    // Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, &PieceOnBoard)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|piece| (Coord::from_index(idx), piece)))
    }

    pub fn pieces_of(&self, force: Force) -> impl Iterator<Item = (Coord, &PieceOnBoard)> {
        self.pieces().filter(move |(_, piece)| piece.force == force)
    }

    pub fn count(&self, force: Force) -> usize { self.pieces_of(force).count() }

    pub fn count_kind(&self, force: Force, kind: PieceKind) -> usize {
        self.pieces_of(force).filter(|(_, piece)| piece.kind == kind).count()
    }

    // Position-and-kind comparison that ignores piece ids.
    pub fn same_position(&self, other: &Grid) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(a, b)| match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.kind == b.kind && a.force == b.force,
            _ => false,
        })
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<PieceOnBoard>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[pos.to_index()] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output { &mut self.data[pos.to_index()] }
}

fn debug_format_piece(piece: &PieceOnBoard) -> String {
    format!("[{}]-{:?}-{:?}", piece.id.0, piece.force, piece.kind)
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.pieces().map(|(coord, piece)| (coord, debug_format_piece(piece))))
            .finish()
    }
}
