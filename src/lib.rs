#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod clock;
pub mod coord;
pub mod display;
pub mod event;
pub mod force;
pub mod game;
pub mod grid;
pub mod network;
pub mod peer;
pub mod piece;
pub mod role;
pub mod rules;
pub mod starter;
pub mod test_util;
