use serde::{Deserialize, Serialize};

use crate::clock::TimeControl;
use crate::force::Force;


// Both variants found in casual play are expressible through these switches, so there is a single
// engine rather than one per ruleset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersRules {
    // Men may capture backwards (they still only step forward).
    pub capture_backward: bool,
    // Kings slide any distance along an empty diagonal and capture from afar.
    pub flying_kings: bool,
}

impl CheckersRules {
    pub fn flying_kings() -> Self {
        Self{
            capture_backward: true,
            flying_kings: true,
        }
    }

    pub fn simplified() -> Self {
        Self{
            capture_backward: false,
            flying_kings: false,
        }
    }
}

impl Default for CheckersRules {
    fn default() -> Self { Self::flying_kings() }
}

// Fixed for the duration of a match. The host picks them; the guest gets them via
// `PeerMessage::GameSettings` with `local_force` flipped.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameSettings {
    pub local_force: Force,
    pub time_control: TimeControl,
    // Cosmetic, never leaves the device.
    pub board_style: u8,
}
