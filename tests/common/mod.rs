// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public items.
//
// Improvement potential. Combine integration tests together:
//   https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use checkers_sync::clock::TimeControl;
use checkers_sync::force::Force;
use checkers_sync::game::CheckersGame;
use checkers_sync::piece::{PieceKind, PieceOnBoard};
use checkers_sync::rules::CheckersRules;
use checkers_sync::test_util::parse_grid;


#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub struct PieceMatcher {
    pub kind: PieceKind,
    pub force: Force,
}

#[allow(dead_code)]
pub trait PieceIs {
    fn is(self, matcher: PieceMatcher) -> bool;
}

impl PieceIs for Option<PieceOnBoard> {
    fn is(self, matcher: PieceMatcher) -> bool {
        if let Some(piece) = self {
            piece.kind == matcher.kind && piece.force == matcher.force
        } else {
            false
        }
    }
}

#[macro_export]
macro_rules! piece {
    ($force:ident $kind:ident) => {
        common::PieceMatcher {
            force: checkers_sync::force::Force::$force,
            kind: checkers_sync::piece::PieceKind::$kind,
        }
    };
}

#[macro_export]
macro_rules! at {
    ($row:literal, $col:literal) => {
        checkers_sync::coord::Coord::new($row, $col)
    };
}

#[allow(dead_code)]
pub fn game_from_diagram(
    rules: CheckersRules, time_control: TimeControl, diagram: &str, active_force: Force,
) -> CheckersGame {
    let grid = parse_grid(diagram).unwrap();
    CheckersGame::new_with_grid(rules, time_control, grid, active_force)
}

#[allow(dead_code)]
pub fn untimed_game(diagram: &str, active_force: Force) -> CheckersGame {
    game_from_diagram(CheckersRules::default(), TimeControl::no_limit(), diagram, active_force)
}
