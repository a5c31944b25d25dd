// Presentation helpers shared by front-ends: board orientation and game over texts.

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::game::{DrawReason, GameStatus, VictoryReason};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardOrientation {
    Normal,  // White at bottom
    Rotated, // Black at bottom
}

// Screen position of a square: row 0 is the top-most row on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayCoord {
    pub x: u8,
    pub y: u8,
}

// Each player sees their own pieces at the bottom.
pub fn get_board_orientation(local_force: Force) -> BoardOrientation {
    match local_force {
        Force::White => BoardOrientation::Normal,
        Force::Black => BoardOrientation::Rotated,
    }
}

pub fn to_display_coord(coord: Coord, orientation: BoardOrientation) -> DisplayCoord {
    match orientation {
        BoardOrientation::Normal => DisplayCoord { x: coord.col(), y: coord.row() },
        BoardOrientation::Rotated => DisplayCoord {
            x: NUM_COLS - 1 - coord.col(),
            y: NUM_ROWS - 1 - coord.row(),
        },
    }
}

pub fn from_display_coord(p: DisplayCoord, orientation: BoardOrientation) -> Option<Coord> {
    let (x, y) = (i64::from(p.x), i64::from(p.y));
    match orientation {
        BoardOrientation::Normal => Coord::try_new(y, x),
        BoardOrientation::Rotated => {
            Coord::try_new(i64::from(NUM_ROWS) - 1 - y, i64::from(NUM_COLS) - 1 - x)
        },
    }
}

// Explanation shown when the game is over.
pub fn status_reason(status: GameStatus) -> Option<String> {
    match status {
        GameStatus::Active => None,
        GameStatus::Draw(DrawReason::KingsOnly) => {
            Some("Both players have only kings left".to_owned())
        },
        GameStatus::Victory(winner, reason) => {
            let loser = winner.opponent();
            Some(match reason {
                VictoryReason::Elimination => format!("{loser} pieces are captured"),
                VictoryReason::Blocked => format!("{loser} pieces are blocked"),
                VictoryReason::Flag => format!("{loser} player ran out of time"),
                VictoryReason::Forfeit => format!("{loser} player left the game"),
            })
        },
    }
}

// Headline from the point of view of `local_force`.
pub fn status_title(status: GameStatus, local_force: Force) -> Option<&'static str> {
    match status {
        GameStatus::Active => None,
        GameStatus::Draw(_) => Some("Draw"),
        GameStatus::Victory(winner, _) if winner == local_force => Some("You won"),
        GameStatus::Victory(..) => Some("You lost"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_involutive() {
        for orientation in [BoardOrientation::Normal, BoardOrientation::Rotated] {
            for coord in Coord::all() {
                let p = to_display_coord(coord, orientation);
                assert_eq!(from_display_coord(p, orientation), Some(coord));
            }
        }
        assert_eq!(
            to_display_coord(Coord::new(7, 0), BoardOrientation::Rotated),
            DisplayCoord { x: 7, y: 0 }
        );
    }

    #[test]
    fn reason_texts() {
        use GameStatus::*;
        assert_eq!(status_reason(Active), None);
        assert_eq!(
            status_reason(Victory(Force::White, VictoryReason::Blocked)).unwrap(),
            "Black pieces are blocked"
        );
        assert_eq!(
            status_reason(Victory(Force::Black, VictoryReason::Flag)).unwrap(),
            "White player ran out of time"
        );
        assert_eq!(
            status_reason(Draw(DrawReason::KingsOnly)).unwrap(),
            "Both players have only kings left"
        );
        assert_eq!(status_title(Victory(Force::Black, VictoryReason::Forfeit), Force::White), Some("You lost"));
    }
}
