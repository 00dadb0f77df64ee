//! Pacing up and down the bank

use super::{LogicModule, LogicPhase, RESULT_FINISHED};
use crate::context::LogicContext;
use crate::environment::BankSide;
use crate::math;
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Heading error treated as aligned while rotating in place
const ALIGNED: f32 = 1e-3;
/// Distance treated as arrived while walking
const ARRIVED: f32 = 0.05;

/// Parameters for [`ShoreWalk`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoreWalkParams {
    /// Distance walked along the bank before turning back
    pub distance: f32,
    /// Walking speed
    pub speed: f32,
    /// Turning rate while rotating in place
    pub turning_speed: f32,
    /// `1.0` walks downstream first, `-1.0` upstream; random when unset
    pub direction: Option<f32>,
}

impl Default for ShoreWalkParams {
    fn default() -> Self {
        Self {
            distance: 10.0,
            speed: 2.5,
            turning_speed: 2.0,
            direction: None,
        }
    }
}

/// Sub-state of a shore walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShoreWalkState {
    RotatingOut,
    WalkingOut,
    RotatingIn,
    WalkingIn,
    RotatingStart,
}

/// Walk a fixed distance along the bank, come back, and restore the start pose.
///
/// The walk keeps the creature's offset from the water edge constant, so it
/// follows a curving bank.
#[derive(Debug, Clone)]
pub struct ShoreWalk {
    params: ShoreWalkParams,
    state: ShoreWalkState,
    start: Vec2,
    start_angle: f32,
    side: BankSide,
    bank_offset: f32,
    sign: f32,
}

impl ShoreWalk {
    pub fn new(params: ShoreWalkParams) -> Self {
        Self {
            params,
            state: ShoreWalkState::RotatingOut,
            start: Vec2::ZERO,
            start_angle: 0.0,
            side: BankSide::Left,
            bank_offset: 0.0,
            sign: 1.0,
        }
    }

    /// Current sub-state
    pub fn state(&self) -> ShoreWalkState {
        self.state
    }

    /// Point on the walking line at longitudinal coordinate `z`
    fn path_point(&self, ctx: &LogicContext<'_>, z: f32) -> Vec2 {
        let edge = ctx.environment.bank_positions(z).edge(self.side);
        Vec2::new(edge + self.bank_offset, z)
    }

    fn far_end(&self, ctx: &LogicContext<'_>) -> Vec2 {
        self.path_point(ctx, self.start.y + self.sign * self.params.distance)
    }

    /// Rotate in place toward `angle`; true once aligned
    fn rotate(&self, ctx: &LogicContext<'_>, angle: f32) -> (Steering, bool) {
        let aligned = math::angle_difference(ctx.angle(), angle).abs() <= ALIGNED;
        let steering = Steering::toward(ctx.origin + math::forward(angle) * 5.0, 0.0)
            .with_turning_speed(self.params.turning_speed);
        (steering, aligned)
    }

    /// Walk along the line toward `goal`, one look-ahead step at a time
    fn walk(&self, ctx: &LogicContext<'_>, goal: Vec2, sign: f32) -> (Steering, bool) {
        let remaining = ctx.origin.distance(goal);
        if remaining <= ARRIVED {
            return (Steering::hold(goal), true);
        }

        let lookahead = (self.params.speed * ctx.dt * 2.0).max(0.5);
        let point = if remaining <= lookahead {
            goal
        } else {
            self.path_point(ctx, ctx.origin.y + sign * lookahead)
        };
        (Steering::toward(point, self.params.speed), false)
    }

    fn along_bank(&self, ctx: &LogicContext<'_>, sign: f32) -> f32 {
        math::heading(ctx.environment.river_tangent(ctx.origin.y) * sign)
    }
}

impl LogicModule for ShoreWalk {
    fn name(&self) -> &str {
        "ShoreWalk"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        let banks = ctx.environment.bank_positions(ctx.origin.y);
        self.side = banks.nearest_side(ctx.origin.x);
        self.bank_offset = ctx.origin.x - banks.edge(self.side);
        self.start = ctx.origin;
        self.start_angle = ctx.angle();
        self.sign = self.params.direction.map_or_else(|| ctx.rng.sign(), f32::signum);
        self.state = ShoreWalkState::RotatingOut;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let (steering, done) = match self.state {
            ShoreWalkState::RotatingOut => self.rotate(ctx, self.along_bank(ctx, self.sign)),
            ShoreWalkState::WalkingOut => self.walk(ctx, self.far_end(ctx), self.sign),
            ShoreWalkState::RotatingIn => self.rotate(ctx, self.along_bank(ctx, -self.sign)),
            ShoreWalkState::WalkingIn => self.walk(ctx, self.start, -self.sign),
            ShoreWalkState::RotatingStart => {
                let step = self.params.turning_speed * ctx.dt;
                let remaining = math::angle_difference(ctx.angle(), self.start_angle).abs();
                let (steering, _) = self.rotate(ctx, self.start_angle);
                (steering, remaining <= step.max(ALIGNED))
            }
        };

        let result = LogicPathResult::new(steering, LocomotionType::Land);
        if !done {
            return result;
        }

        self.state = match self.state {
            ShoreWalkState::RotatingOut => ShoreWalkState::WalkingOut,
            ShoreWalkState::WalkingOut => ShoreWalkState::RotatingIn,
            ShoreWalkState::RotatingIn => ShoreWalkState::WalkingIn,
            ShoreWalkState::WalkingIn => ShoreWalkState::RotatingStart,
            ShoreWalkState::RotatingStart => return result.finish_with(RESULT_FINISHED),
        };
        log::trace!("ShoreWalk -> {:?}", self.state);
        result
    }

    fn phase(&self) -> LogicPhase {
        match self.state {
            ShoreWalkState::WalkingOut | ShoreWalkState::WalkingIn => LogicPhase::Walking,
            _ => LogicPhase::Rotating,
        }
    }

    fn duration(&self) -> Option<f32> {
        Some(2.0 * self.params.distance / self.params.speed.max(0.1))
    }
}
