//! Per-tick movement and the animation frame timer.
use crate::engine::{Point, Size};

/// Kinematic body in world space. Euler steps, no sub-stepping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub position: Point,
    pub velocity: Point,
    pub size: Size,
}

impl Body {
    pub fn integrate(&mut self) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
    }

    /// keep the whole body inside the world, each axis on its own
    pub fn clamp_to(&mut self, world: Size) {
        self.position.x = clamp(self.position.x, 0.0, world.width - self.size.width);
        self.position.y = clamp(self.position.y, 0.0, world.height - self.size.height);
    }

    /// resting exactly on the floor line counts as grounded
    pub fn is_on_ground(&self, world: Size) -> bool {
        self.position.y >= world.height - self.size.height
    }

    pub fn is_falling_down(&self, world: Size) -> bool {
        self.velocity.y > 0.0 && !self.is_on_ground(world)
    }

    /// Runs after clamping. The grounded check sees this tick's final
    /// position, so speed_y lags grounding by one tick.
    pub fn apply_gravity(&mut self, world: Size, gravity: f64) {
        if !self.is_on_ground(world) {
            self.velocity.y += gravity;
        } else {
            self.velocity.y = 0.0;
        }
    }
}

/// `f64::clamp` panics when min > max (world narrower than the body),
/// here the lower bound wins instead.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// ELI5:
/// ┌──────────── Frame timer ─────────────────────────────────┐
/// │ timer > interval ?  yes → frame_x = frame_x % max + 1    │
/// │                          timer = 0                       │
/// │                     no  → timer += delta                 │
/// └──────────────────────────────────────────────────────────┘
/// Frames cycle 1..=max_frame, 0 only shows before the first advance.
/// A state change swaps the row and max_frame but leaves frame_x and the
/// timer alone.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    frame_x: u32,
    frame_y: u32,
    max_frame: u32,
    frame_timer: f64,
    frame_interval: f64,
}

impl Animation {
    pub fn new(frame_interval: f64, frame_y: u32, max_frame: u32) -> Self {
        Animation {
            frame_x: 0,
            frame_y,
            max_frame,
            frame_timer: 0.0,
            frame_interval,
        }
    }

    pub fn advance(&mut self, delta: f64) {
        if self.frame_timer > self.frame_interval {
            self.frame_x = (self.frame_x % self.max_frame) + 1;
            self.frame_timer = 0.0;
        } else {
            self.frame_timer += delta;
        }
    }

    pub fn set_row(&mut self, frame_y: u32, max_frame: u32) {
        self.frame_y = frame_y;
        self.max_frame = max_frame;
    }

    pub fn frame_x(&self) -> u32 {
        self.frame_x
    }

    pub fn frame_y(&self) -> u32 {
        self.frame_y
    }

    pub fn max_frame(&self) -> u32 {
        self.max_frame
    }
}
