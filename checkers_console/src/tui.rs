use console::Style;
use itertools::Itertools;
use strum::IntoEnumIterator;

use checkers_sync::clock::duration_to_mss;
use checkers_sync::coord::{NUM_COLS, NUM_ROWS};
use checkers_sync::display::{
    BoardOrientation, DisplayCoord, from_display_coord, get_board_orientation, status_reason,
    status_title,
};
use checkers_sync::force::Force;
use checkers_sync::game::CheckersGame;
use checkers_sync::grid::Grid;
use checkers_sync::piece::piece_to_pictogram;


fn format_square(s: impl std::fmt::Display) -> String { format!(" {s} ") }

// Headers show the numbers players type in moves, so row and column labels follow the grid, not
// the screen.
fn render_grid(grid: &Grid, orientation: BoardOrientation) -> String {
    let light = Style::new().color256(233).on_color256(230);
    let dark = Style::new().color256(233).on_color256(137);
    let highlight = Style::new().color256(233).on_color256(180);
    let mut ret = String::new();
    let header_cols = (0..NUM_COLS)
        .filter_map(|x| from_display_coord(DisplayCoord { x, y: 0 }, orientation))
        .map(|coord| format_square(coord.col()))
        .join("");
    ret.push_str(&format!("{}{}\n", format_square(' '), header_cols));
    for y in 0..NUM_ROWS {
        let mut row_header = None;
        let mut line = String::new();
        for x in 0..NUM_COLS {
            let Some(coord) = from_display_coord(DisplayCoord { x, y }, orientation) else {
                continue;
            };
            row_header.get_or_insert(coord.row());
            let style = match (coord.is_dark(), grid[coord].is_some()) {
                (false, _) => &light,
                (true, false) => &dark,
                (true, true) => &highlight,
            };
            let symbol = grid[coord].map_or(' ', |piece| piece_to_pictogram(piece.kind, piece.force));
            line.push_str(&style.apply_to(format_square(symbol)).to_string());
        }
        let header = row_header.map_or_else(|| format_square(' '), format_square);
        ret.push_str(&format!("{header}{line}\n"));
    }
    ret
}

fn render_clock(game: &CheckersGame, force: Force) -> String {
    let clock = game.clock();
    if !clock.control().is_limited() {
        return String::new();
    }
    let text = duration_to_mss(clock.time_left(force));
    if clock.active_force() == Some(force) {
        Style::new().reverse().apply_to(text).to_string()
    } else {
        text
    }
}

pub fn render_game(game: &CheckersGame, local_force: Force) -> String {
    let orientation = get_board_orientation(local_force);
    let mut ret = String::new();
    for force in Force::iter() {
        let you = if force == local_force { " (you)" } else { "" };
        ret.push_str(&format!(
            "{force}{you}: {} captured  {}\n",
            game.captured(force),
            render_clock(game, force)
        ));
    }
    ret.push('\n');
    ret.push_str(&render_grid(game.grid(), orientation));
    ret.push('\n');
    if let (Some(title), Some(reason)) =
        (status_title(game.status(), local_force), status_reason(game.status()))
    {
        let style = Style::new().magenta().bold();
        ret.push_str(&format!("{}: {reason}\n", style.apply_to(title)));
    } else if game.active_force() == local_force {
        let prompt = match game.chain_origin() {
            Some(origin) => format!("Your move: continue capturing with {origin}"),
            None => "Your move (row,col row,col)".to_owned(),
        };
        ret.push_str(&format!("{}\n", Style::new().green().apply_to(prompt)));
    } else {
        ret.push_str("Waiting for the opponent...\n");
    }
    ret
}
