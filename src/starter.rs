use crate::coord::Coord;
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceId, PieceKind, PieceOnBoard};


// Rows holding men at the start, per force.
const BLACK_HOME_ROWS: [u8; 3] = [0, 1, 2];
const WHITE_HOME_ROWS: [u8; 3] = [5, 6, 7];

pub const MEN_PER_SIDE: usize = 12;

fn home_force(row: u8) -> Option<Force> {
    if BLACK_HOME_ROWS.contains(&row) {
        Some(Force::Black)
    } else if WHITE_HOME_ROWS.contains(&row) {
        Some(Force::White)
    } else {
        None
    }
}

pub fn assign_piece_ids(grid: &mut Grid, piece_id: &mut PieceId) {
    for coord in Coord::all() {
        if let Some(piece) = grid[coord] {
            grid[coord] = Some(PieceOnBoard { id: piece_id.inc(), ..piece });
        }
    }
}

pub fn generate_starting_grid(piece_id: &mut PieceId) -> Grid {
    let mut grid = Grid::new();
    for coord in Coord::all_dark() {
        if let Some(force) = home_force(coord.row()) {
            grid[coord] = Some(PieceOnBoard::new(PieceId::tmp(), PieceKind::Man, force));
        }
    }
    assign_piece_ids(&mut grid, piece_id);
    grid
}
