// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      One tick of Player::update                          │
// ├──────┬───────────────────────────────────────────────────────────────────┤
// │ 1    │ animation.advance(delta)          frame timer                     │
// │ 2    │ state.handle_input(signal, ...)   may set_state -> enter()        │
// │ 3    │ body.integrate()                  position += velocity            │
// │ 4    │ body.clamp_to(world)              both axes                       │
// │ 5    │ body.apply_gravity(world, g)      grounded ? speed_y = 0 : += g   │
// └──────┴───────────────────────────────────────────────────────────────────┘
// - step 2 reads the ground/falling predicates BEFORE this tick moves the body
// - step 5 reads them AFTER, so gravity trails grounding by one tick
//   Jumping -> Falling timing depends on this, keep the order
pub mod config;
pub mod physics;
pub mod state;

use crate::engine::{Point, Size};
use crate::input::InputSignal;
use config::PlayerConfig;
use physics::{Animation, Body};
use serde::Serialize;
use state::PlayerStateId;

/// What a renderer needs after a tick, nothing it could mutate.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub position: Point,
    pub animation_row: u32,
    pub frame_index: u32,
    pub max_frame: u32,
    pub state: PlayerStateId,
}

#[derive(Debug, Clone)]
pub struct Player {
    state: PlayerStateId,
    body: Body,
    animation: Animation,
    world: Size,
    max_speed: f64,
    gravity: f64,
}

impl Player {
    /// Starts centered in the world, facing right, not yet on the floor.
    /// StandingRight's entry is not run: its effects match the initial
    /// values anyway.
    pub fn new(world: Size, config: &PlayerConfig) -> Self {
        let size = config.size();
        let initial = PlayerStateId::StandingRight;
        Player {
            state: initial,
            body: Body {
                position: Point {
                    x: world.width * 0.5 - size.width * 0.5,
                    y: world.height * 0.5 - size.height * 0.5,
                },
                velocity: Point::default(),
                size,
            },
            animation: Animation::new(
                config.frame_interval(),
                initial.animation_row(),
                initial.max_frame(),
            ),
            world,
            max_speed: config.max_speed,
            gravity: config.gravity,
        }
    }

    pub fn update(&mut self, delta: f64, signal: InputSignal) {
        self.animation.advance(delta);

        if let Some(next) =
            self.state
                .handle_input(signal, self.is_on_ground(), self.is_falling_down())
        {
            self.set_state(next);
        }

        self.body.integrate();
        self.body.clamp_to(self.world);
        self.body.apply_gravity(self.world, self.gravity);
    }

    /// switch state and run its entry once, before returning
    pub fn set_state(&mut self, next: PlayerStateId) {
        self.state = next;
        next.enter(self);
    }

    pub fn is_on_ground(&self) -> bool {
        self.body.is_on_ground(self.world)
    }

    pub fn is_falling_down(&self) -> bool {
        self.body.is_falling_down(self.world)
    }

    pub fn state(&self) -> PlayerStateId {
        self.state
    }

    pub fn position(&self) -> Point {
        self.body.position
    }

    pub fn velocity(&self) -> Point {
        self.body.velocity
    }

    pub fn size(&self) -> Size {
        self.body.size
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.body.position,
            animation_row: self.animation.frame_y(),
            frame_index: self.animation.frame_x(),
            max_frame: self.animation.max_frame(),
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction::{Down, Left, Right, Up};
    use crate::input::InputSignal::{Press, Release};
    use super::state::PlayerStateId::*;
    use approx::assert_relative_eq;

    const WORLD: Size = Size {
        width: 1000.0,
        height: 800.0,
    };
    const FRAME: f64 = 16.0;

    fn player() -> Player {
        Player::new(WORLD, &PlayerConfig::default())
    }

    /// dropped from the start position until it rests on the floor
    fn grounded_player() -> Player {
        let mut player = player();
        while !player.is_on_ground() || player.velocity().y != 0.0 {
            player.update(FRAME, InputSignal::None);
        }
        player
    }

    fn floor(player: &Player) -> f64 {
        WORLD.height - player.size().height
    }

    #[test]
    fn starts_centered_standing_right() {
        let player = player();
        let snapshot = player.snapshot();
        assert_eq!(snapshot.state, StandingRight);
        assert_eq!(snapshot.animation_row, 0);
        assert_eq!(snapshot.max_frame, 6);
        assert_eq!(snapshot.frame_index, 0);
        assert_relative_eq!(snapshot.position.x, 400.0);
        assert_relative_eq!(snapshot.position.y, 400.0 - 181.83 * 0.5);
        assert!(!player.is_on_ground());
    }

    #[test]
    fn falls_to_the_floor_and_stays() {
        let mut player = grounded_player();
        assert_eq!(player.state(), StandingRight);
        assert_relative_eq!(player.position().y, floor(&player));
        for _ in 0..10 {
            player.update(FRAME, InputSignal::None);
            assert_relative_eq!(player.velocity().y, 0.0);
            assert_relative_eq!(player.position().y, floor(&player));
        }
    }

    #[test]
    fn press_left_from_standing_right_runs_left() {
        let mut player = player();
        player.update(FRAME, Press(Left));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.state, RunningLeft);
        assert_relative_eq!(player.velocity().x, -10.0);
        assert_eq!(snapshot.animation_row, 7);
        assert_eq!(snapshot.max_frame, 8);
    }

    #[test]
    fn sit_then_stand_from_running_right() {
        let mut player = grounded_player();
        player.set_state(RunningRight);
        player.update(FRAME, Press(Down));
        assert_eq!(player.state(), SittingRight);
        assert_eq!(player.snapshot().animation_row, 8);
        assert_eq!(player.snapshot().max_frame, 4);
        assert_relative_eq!(player.velocity().x, 0.0);

        player.update(FRAME, Release(Down));
        assert_eq!(player.state(), StandingRight);
        assert_eq!(player.snapshot().animation_row, 0);
    }

    #[test]
    fn jump_left_then_fall_left() {
        let mut player = grounded_player();
        player.set_state(StandingLeft);
        player.update(FRAME, Press(Up));
        assert_eq!(player.state(), JumpingLeft);
        // impulse -40, moved once, then one tick of gravity
        assert_relative_eq!(player.position().y, floor(&player) - 40.0);
        assert_relative_eq!(player.velocity().y, -39.0);
        assert_relative_eq!(player.velocity().x, -5.0);
        assert!(!player.is_on_ground());

        let mut ticks = 0;
        while player.state() == JumpingLeft {
            player.update(FRAME, InputSignal::None);
            ticks += 1;
            assert!(ticks < 100, "never started falling");
        }
        assert_eq!(player.state(), FallingLeft);
        assert_eq!(player.snapshot().animation_row, 5);
        // the tick that flips to falling saw speed_y > 0 before moving
        assert!(player.velocity().y > 1.0);

        while player.state() == FallingLeft {
            player.update(FRAME, InputSignal::None);
            ticks += 1;
            assert!(ticks < 200, "never landed");
        }
        assert_eq!(player.state(), StandingLeft);
        assert_relative_eq!(player.velocity().x, 0.0);
    }

    #[test]
    fn switching_jump_direction_mid_air_keeps_vertical_speed() {
        let mut player = grounded_player();
        player.update(FRAME, Press(Up));
        assert_eq!(player.state(), JumpingRight);
        player.update(FRAME, InputSignal::None);

        let before = player.velocity().y;
        player.set_state(JumpingLeft);
        assert_relative_eq!(player.velocity().y, before);
        assert_relative_eq!(player.velocity().x, -5.0);
        player.set_state(JumpingRight);
        assert_relative_eq!(player.velocity().y, before);
        assert_relative_eq!(player.velocity().x, 5.0);
    }

    #[test]
    fn falling_entry_keeps_horizontal_speed() {
        let mut player = player();
        player.set_state(RunningRight);
        player.set_state(FallingRight);
        assert_relative_eq!(player.velocity().x, 10.0);
        assert_eq!(player.snapshot().animation_row, 4);
    }

    #[test]
    fn grounded_at_tick_start_ends_with_zero_vertical_speed() {
        let mut player = grounded_player();
        let signals = [
            Press(Right),
            Release(Right),
            Press(Down),
            Press(Left),
            Release(Down),
            Press(Left),
            Release(Left),
        ];
        for signal in signals {
            assert!(player.is_on_ground());
            player.update(FRAME, signal);
            assert_relative_eq!(player.velocity().y, 0.0);
        }
    }

    #[test]
    fn invariants_hold_over_a_long_input_sequence() {
        let signals = [
            InputSignal::None,
            Press(Left),
            Press(Up),
            Press(Right),
            Release(Right),
            Press(Down),
            Release(Down),
            Release(Left),
            Press(Up),
            InputSignal::None,
        ];
        let mut player = player();
        for tick in 0..5_000usize {
            // hold each signal a varying number of ticks
            let signal = signals[(tick / (1 + tick % 7)) % signals.len()];
            let grounded_before = player.is_on_ground();
            let state_before = player.state();
            player.update(FRAME, signal);

            assert!(PlayerStateId::ALL.contains(&player.state()));
            let position = player.position();
            assert!(position.x >= 0.0 && position.x <= WORLD.width - player.size().width);
            assert!(position.y >= 0.0 && position.y <= floor(&player));

            let jumped = player.state() != state_before
                && matches!(player.state(), JumpingLeft | JumpingRight);
            if grounded_before && !jumped {
                assert_relative_eq!(player.velocity().y, 0.0);
            }
        }
    }

    #[test]
    fn walls_stop_a_runner() {
        let mut player = grounded_player();
        for _ in 0..200 {
            player.update(FRAME, Press(Right));
        }
        assert_eq!(player.state(), RunningRight);
        assert_relative_eq!(player.position().x, WORLD.width - player.size().width);
        for _ in 0..200 {
            player.update(FRAME, Press(Left));
        }
        assert_relative_eq!(player.position().x, 0.0);
    }

    #[test]
    fn animation_keeps_running_across_state_changes() {
        let mut player = grounded_player();
        let frame_before = player.snapshot().frame_index;
        assert!(frame_before > 0);
        player.update(0.0, Press(Right));
        assert_eq!(player.state(), RunningRight);
        assert!(player.snapshot().frame_index <= 8);
    }
}
