// Test utilities shared by unit tests and the integration tests in the "tests" folder.

use itertools::Itertools;

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::grid::Grid;
use crate::piece::{PieceId, PieceOnBoard, cell_code, piece_from_cell_code};
use crate::starter::assign_piece_ids;


// Parses an 8x8 diagram made of whitespace-separated cell codes ("." "W" "WK" "B" "BK"), top row
// first. Blank lines are ignored. Piece ids are assigned in row-major order starting from 1.
pub fn parse_grid(diagram: &str) -> Result<Grid, String> {
    let rows = diagram.lines().map(str::trim).filter(|line| !line.is_empty()).collect_vec();
    if rows.len() != NUM_ROWS as usize {
        return Err(format!("expected {NUM_ROWS} rows, got {}", rows.len()));
    }
    let mut grid = Grid::new();
    for (row, line) in rows.into_iter().enumerate() {
        let cells = line.split_whitespace().collect_vec();
        if cells.len() != NUM_COLS as usize {
            return Err(format!("row {row}: expected {NUM_COLS} cells, got {}", cells.len()));
        }
        for (col, code) in cells.into_iter().enumerate() {
            let coord = Coord::new(row as u8, col as u8);
            let cell =
                piece_from_cell_code(code).ok_or_else(|| format!("{coord}: unknown cell {code:?}"))?;
            if let Some((kind, force)) = cell {
                if !coord.is_dark() {
                    return Err(format!("{coord}: piece on a light square"));
                }
                grid[coord] = Some(PieceOnBoard::new(PieceId::tmp(), kind, force));
            }
        }
    }
    assign_piece_ids(&mut grid, &mut PieceId::new());
    Ok(grid)
}

// Inverse of `parse_grid`, modulo whitespace.
pub fn render_grid(grid: &Grid) -> String {
    (0..NUM_ROWS)
        .map(|row| {
            (0..NUM_COLS).map(|col| cell_code(grid[Coord::new(row, col)].as_ref())).join(" ")
        })
        .join("\n")
}
