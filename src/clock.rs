use std::fmt;
use std::time::Duration;

use enum_map::{enum_map, EnumMap};
use serde::{Deserialize, Serialize};

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    NoLimit,
    TimePerMove,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TimeControl {
    pub mode: TimerMode,
    // Allowance for each move. Ignored with `TimerMode::NoLimit`.
    pub time_per_move: Duration,
}

impl TimeControl {
    pub fn no_limit() -> Self {
        TimeControl{ mode: TimerMode::NoLimit, time_per_move: Duration::ZERO }
    }
    pub fn per_move(time_per_move: Duration) -> Self {
        TimeControl{ mode: TimerMode::TimePerMove, time_per_move }
    }
    pub fn is_limited(&self) -> bool {
        self.mode == TimerMode::TimePerMove && !self.time_per_move.is_zero()
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_limited() {
            format_duration_to_mss(self.time_per_move, f)?;
            write!(f, " per move")
        } else {
            write!(f, "no limit")
        }
    }
}

pub fn duration_to_mss(d: Duration) -> String {
    let mut ret = String::new();
    format_duration_to_mss(d, &mut ret).unwrap();
    ret
}

// Partial seconds are rounded up: a countdown shows "0:01" until it actually hits zero.
fn format_duration_to_mss(d: Duration, f: &mut impl fmt::Write) -> fmt::Result {
    let s = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    let minutes = s / 60;
    let seconds = s % 60;
    write!(f, "{minutes}:{seconds:02}")
}


// Per-move countdown bookkeeping. The clock does not observe real time: the owner feeds it with
// elapsed durations from an external tick source.
//
// The countdown starts with the first `new_turn` call, i.e. after the first move of the game.
#[derive(Clone, Debug)]
pub struct Clock {
    control: TimeControl,
    time_left: EnumMap<Force, Duration>,
    active_force: Option<Force>,
}

impl Clock {
    pub fn new(control: TimeControl) -> Self {
        let full = control.time_per_move;
        Clock {
            control,
            time_left: enum_map!{ _ => full },
            active_force: None,
        }
    }

    pub fn control(&self) -> &TimeControl { &self.control }
    pub fn is_active(&self) -> bool { self.active_force.is_some() }
    pub fn active_force(&self) -> Option<Force> { self.active_force }
    pub fn time_left(&self, force: Force) -> Duration { self.time_left[force] }

    // Used when the host announces initial times that differ from the per-move allowance.
    pub fn set_time_left(&mut self, force: Force, time: Duration) { self.time_left[force] = time; }

    // Gives `force` a full allowance and starts counting it down.
    pub fn new_turn(&mut self, force: Force) {
        if !self.control.is_limited() {
            return;
        }
        self.time_left[force] = self.control.time_per_move;
        self.active_force = Some(force);
    }

    pub fn stop(&mut self) { self.active_force = None; }

    // Returns the force whose time ran out, if any. The clock stops when that happens.
    #[must_use]
    pub fn tick(&mut self, elapsed: Duration) -> Option<Force> {
        let force = self.active_force?;
        let left = &mut self.time_left[force];
        *left = left.saturating_sub(elapsed);
        if left.is_zero() {
            self.active_force = None;
            Some(force)
        } else {
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mss() {
        assert_eq!(duration_to_mss(Duration::from_secs(30)), "0:30");
        assert_eq!(duration_to_mss(Duration::from_secs(75)), "1:15");
        assert_eq!(duration_to_mss(Duration::from_millis(400)), "0:01");
        assert_eq!(duration_to_mss(Duration::ZERO), "0:00");
    }

    #[test]
    fn counts_down_only_after_first_turn() {
        let mut clock = Clock::new(TimeControl::per_move(Duration::from_secs(2)));
        assert_eq!(clock.tick(Duration::from_secs(10)), None);
        clock.new_turn(Force::Black);
        assert_eq!(clock.tick(Duration::from_secs(1)), None);
        assert_eq!(clock.time_left(Force::Black), Duration::from_secs(1));
        assert_eq!(clock.time_left(Force::White), Duration::from_secs(2));
        assert_eq!(clock.tick(Duration::from_secs(1)), Some(Force::Black));
        assert!(!clock.is_active());
        assert_eq!(clock.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn new_turn_restores_allowance() {
        let mut clock = Clock::new(TimeControl::per_move(Duration::from_secs(5)));
        clock.new_turn(Force::White);
        assert_eq!(clock.tick(Duration::from_secs(4)), None);
        clock.new_turn(Force::Black);
        clock.new_turn(Force::White);
        assert_eq!(clock.time_left(Force::White), Duration::from_secs(5));
    }

    #[test]
    fn no_limit_never_flags() {
        let mut clock = Clock::new(TimeControl::no_limit());
        clock.new_turn(Force::White);
        assert!(!clock.is_active());
        assert_eq!(clock.tick(Duration::from_secs(1000)), None);
    }
}
