//! Walking: kinematic terrain following, with parabolic jumps

use super::{desired_heading, LocomotionCommand, LocomotionState, VisualTarget};
use crate::config::LandConfig;
use crate::context::LogicContext;
use crate::math::{self, MIN_DISTANCE};
use crate::steering::{JumpRequest, LogicPathResult};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Height of a parabolic jump after `traveled` of `arc_length` units.
///
/// The apex, `jump_height` above `start`, is reached halfway.
pub fn jump_height_at(start: f32, jump_height: f32, traveled: f32, arc_length: f32) -> f32 {
    let t = traveled / arc_length.max(MIN_DISTANCE);
    start + 4.0 * t * (1.0 - t) * jump_height
}

/// A jump in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// Height at take-off
    pub start_height: f32,
    /// Apex height above take-off
    pub jump_height: f32,
    /// Horizontal length of the arc
    pub arc_length: f32,
    /// Horizontal distance covered so far
    pub traveled: f32,
}

impl JumpState {
    /// Start a jump from a height
    pub fn new(start_height: f32, request: JumpRequest) -> Self {
        Self {
            start_height,
            jump_height: request.height,
            arc_length: request.distance,
            traveled: 0.0,
        }
    }

    /// Normalized progress along the arc
    pub fn progress(&self) -> f32 {
        self.traveled / self.arc_length.max(MIN_DISTANCE)
    }

    /// Current height
    pub fn height(&self) -> f32 {
        jump_height_at(self.start_height, self.jump_height, self.traveled, self.arc_length)
    }

    /// Check if the arc has been completed
    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }
}

pub(super) fn compute(
    state: &mut LocomotionState,
    ctx: &LogicContext<'_>,
    result: &LogicPathResult,
    config: &LandConfig,
) -> (LocomotionCommand, VisualTarget) {
    let steering = &result.steering;
    let to_target = steering.target - ctx.origin;
    let step = (steering.speed.max(0.0) * ctx.dt).min(to_target.length());
    let direction = math::try_normalize(to_target).unwrap_or(Vec2::ZERO);
    let position = ctx.origin + direction * step;

    let turning = steering.turning_speed.unwrap_or(config.turning_speed);
    let angle = match desired_heading(ctx, steering) {
        Some(heading) => math::rotate_toward(ctx.angle(), heading, turning * ctx.dt),
        None => ctx.angle(),
    };

    if let Some(request) = result.jump {
        if state.jump.is_none() && request.distance > MIN_DISTANCE {
            log::debug!(
                "Jump: apex {:.2} over {:.2} from {:.2}",
                request.height,
                request.distance,
                ctx.height
            );
            state.jump = Some(JumpState::new(ctx.height, request));
        }
    }

    let env = ctx.environment;
    let sample = env.sample(position.x, position.y);
    let surface = sample.height.max(env.water_level());

    let (height, normal) = match state.jump.as_mut() {
        Some(jump) => {
            jump.traveled += step;
            let height = jump.height();
            if jump.is_complete() || height <= surface {
                log::trace!("Jump landed at {:.2}", surface);
                state.jump = None;
                (surface, sample.normal)
            } else {
                (height, Vec3::Y)
            }
        }
        None => match result.explicit_pose {
            Some(pose) => (pose.height, pose.normal),
            None => (surface, sample.normal),
        },
    };

    let velocity = if ctx.dt > 0.0 {
        (position - ctx.origin) / ctx.dt
    } else {
        Vec2::ZERO
    };

    (
        LocomotionCommand::Kinematic {
            position,
            angle,
            velocity,
        },
        VisualTarget::level(height, normal, angle),
    )
}
