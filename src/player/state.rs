//! The ten player states.
//!
//! Each state is a plain tag. What it does on entry and where it goes on
//! input are functions of the tag, the player is handed in as `&mut Player`
//! when something has to change.
use super::Player;
use crate::input::Direction::{Down, Left, Right, Up};
use crate::input::InputSignal::{self, Press, Release};
use anyhow::{anyhow, Error};
use serde::Serialize;
use std::fmt;

/// TABLE:
/// ┌──────────────────────── Transitions (first match wins) ──────────────────────┐
/// │ From           │ Signal / Predicate   →  To                                  │
/// ├────────────────┼─────────────────────────────────────────────────────────────┤
/// │ StandingLeft   │ PRESS right → RunningRight   PRESS down → SittingLeft       │
/// │                │ PRESS left  → RunningLeft    PRESS up   → JumpingLeft       │
/// │ StandingRight  │ PRESS left  → RunningLeft    PRESS down → SittingRight      │
/// │                │ PRESS right → RunningRight   PRESS up   → JumpingRight      │
/// │ SittingLeft    │ RELEASE down → StandingLeft  PRESS right → SittingRight     │
/// │ SittingRight   │ RELEASE down → StandingRight PRESS left  → SittingLeft      │
/// │ RunningLeft    │ PRESS right → RunningRight   RELEASE left → StandingLeft    │
/// │                │ PRESS down  → SittingLeft                                   │
/// │ RunningRight   │ PRESS left  → RunningLeft    RELEASE right → StandingRight  │
/// │                │ PRESS down  → SittingRight                                  │
/// │ JumpingLeft    │ PRESS right → JumpingRight   grounded → StandingLeft        │
/// │                │ falling     → FallingLeft                                   │
/// │ JumpingRight   │ PRESS left  → JumpingLeft    grounded → StandingRight       │
/// │                │ falling     → FallingRight                                  │
/// │ FallingLeft    │ PRESS right → FallingRight   grounded → StandingLeft        │
/// │ FallingRight   │ PRESS left  → FallingLeft    grounded → StandingRight       │
/// └────────────────┴─────────────────────────────────────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStateId {
    StandingLeft,
    StandingRight,
    SittingLeft,
    SittingRight,
    RunningLeft,
    RunningRight,
    JumpingLeft,
    JumpingRight,
    FallingLeft,
    FallingRight,
}

use PlayerStateId::*;

impl PlayerStateId {
    /// index order matches the numeric ids accepted by `try_from`
    pub const ALL: [PlayerStateId; 10] = [
        StandingLeft,
        StandingRight,
        SittingLeft,
        SittingRight,
        RunningLeft,
        RunningRight,
        JumpingLeft,
        JumpingRight,
        FallingLeft,
        FallingRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StandingLeft => "STANDING_LEFT",
            StandingRight => "STANDING_RIGHT",
            SittingLeft => "SITTING_LEFT",
            SittingRight => "SITTING_RIGHT",
            RunningLeft => "RUNNING_LEFT",
            RunningRight => "RUNNING_RIGHT",
            JumpingLeft => "JUMPING_LEFT",
            JumpingRight => "JUMPING_RIGHT",
            FallingLeft => "FALLING_LEFT",
            FallingRight => "FALLING_RIGHT",
        }
    }

    /// sprite sheet row for this state
    pub fn animation_row(self) -> u32 {
        match self {
            StandingRight => 0,
            StandingLeft => 1,
            JumpingRight => 2,
            JumpingLeft => 3,
            FallingRight => 4,
            FallingLeft => 5,
            RunningRight => 6,
            RunningLeft => 7,
            SittingRight => 8,
            SittingLeft => 9,
        }
    }

    pub fn max_frame(self) -> u32 {
        match self {
            SittingLeft | SittingRight => 4,
            RunningLeft | RunningRight => 8,
            _ => 6,
        }
    }

    /// speed_x set on entry, None when entry leaves it alone (falling)
    fn entry_speed_x(self, max_speed: f64) -> Option<f64> {
        match self {
            StandingLeft | StandingRight | SittingLeft | SittingRight => Some(0.0),
            RunningLeft => Some(-max_speed),
            RunningRight => Some(max_speed),
            JumpingLeft => Some(-0.5 * max_speed),
            JumpingRight => Some(0.5 * max_speed),
            FallingLeft | FallingRight => None,
        }
    }

    fn is_jumping(self) -> bool {
        matches!(self, JumpingLeft | JumpingRight)
    }

    /// Entry effects. Touches speed, animation row and max frame only.
    /// The jump impulse is applied only from the ground, so switching
    /// jump direction mid air keeps the current speed_y.
    pub(super) fn enter(self, player: &mut Player) {
        player.animation.set_row(self.animation_row(), self.max_frame());
        if self.is_jumping() && player.is_on_ground() {
            player.body.velocity.y = -4.0 * player.max_speed;
        }
        if let Some(speed_x) = self.entry_speed_x(player.max_speed) {
            player.body.velocity.x = speed_x;
        }
    }

    /// Next state for this tick, or None to stay put.
    pub fn handle_input(self, signal: InputSignal, grounded: bool, falling: bool) -> Option<Self> {
        match self {
            StandingLeft => match signal {
                Press(Right) => Some(RunningRight),
                Press(Down) => Some(SittingLeft),
                Press(Left) => Some(RunningLeft),
                Press(Up) => Some(JumpingLeft),
                _ => None,
            },
            StandingRight => match signal {
                Press(Left) => Some(RunningLeft),
                Press(Down) => Some(SittingRight),
                Press(Right) => Some(RunningRight),
                Press(Up) => Some(JumpingRight),
                _ => None,
            },
            SittingLeft => match signal {
                Release(Down) => Some(StandingLeft),
                Press(Right) => Some(SittingRight),
                _ => None,
            },
            SittingRight => match signal {
                Release(Down) => Some(StandingRight),
                Press(Left) => Some(SittingLeft),
                _ => None,
            },
            RunningLeft => match signal {
                Press(Right) => Some(RunningRight),
                Release(Left) => Some(StandingLeft),
                Press(Down) => Some(SittingLeft),
                _ => None,
            },
            RunningRight => match signal {
                Press(Left) => Some(RunningLeft),
                Release(Right) => Some(StandingRight),
                Press(Down) => Some(SittingRight),
                _ => None,
            },
            JumpingLeft => {
                if signal.is_press(Right) {
                    Some(JumpingRight)
                } else if grounded {
                    Some(StandingLeft)
                } else if falling {
                    Some(FallingLeft)
                } else {
                    None
                }
            }
            JumpingRight => {
                if signal.is_press(Left) {
                    Some(JumpingLeft)
                } else if grounded {
                    Some(StandingRight)
                } else if falling {
                    Some(FallingRight)
                } else {
                    None
                }
            }
            FallingLeft => {
                if signal.is_press(Right) {
                    Some(FallingRight)
                } else if grounded {
                    Some(StandingLeft)
                } else {
                    None
                }
            }
            FallingRight => {
                if signal.is_press(Left) {
                    Some(FallingLeft)
                } else if grounded {
                    Some(StandingRight)
                } else {
                    None
                }
            }
        }
    }
}

/// Numeric ids are a configuration surface (JS, saved settings). Anything
/// outside 0..=9 is a programming error on the caller's side.
impl TryFrom<u8> for PlayerStateId {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        PlayerStateId::ALL
            .get(usize::from(id))
            .copied()
            .ok_or_else(|| anyhow!("unknown player state id {}", id))
    }
}

impl fmt::Display for PlayerStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
