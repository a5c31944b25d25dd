use serde::{Deserialize, Serialize};

use checkers_sync::clock::TimerMode;
use checkers_sync::force::Force;
use checkers_sync::rules::CheckersRules;


fn default_listen_address() -> String { "0.0.0.0".to_owned() }

// Host-side match configuration, read from a YAML file. Example:
//
//   color: White
//   timer_mode: timePerMove
//   seconds_per_move: 30
//   rules:
//     captureBackward: false
//     flyingKings: false
//   send_initial_board: true
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    pub color: Force,
    pub timer_mode: TimerMode,
    #[serde(default)]
    pub seconds_per_move: u64,
    #[serde(default)]
    pub rules: CheckersRules,
    #[serde(default)]
    pub send_initial_board: bool,
    #[serde(default)]
    pub board_style: u8,
}
