use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


// Serialized as "White" / "Black": this is the wire name of the color.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
pub enum Force {
    White,
    Black,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::White => Force::Black,
            Force::Black => Force::White,
        }
    }

    // Row delta of a step towards the opponent's home rank.
    pub fn forward(self) -> i8 {
        match self {
            Force::White => -1,
            Force::Black => 1,
        }
    }
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Force::White => write!(f, "White"),
            Force::Black => write!(f, "Black"),
        }
    }
}
