//! Flying logics
//!
//! All of these drive [`LocomotionType::Flight`]. The landing logics share a
//! [`Touchdown`] helper: approach a point with [`LandOnPoint`] and report
//! `LANDED` once the creature is both low and slow over ground or water.

mod buzz;
mod landing;
mod roam;

pub use buzz::{BuzzBoat, BuzzBoatParams};
pub use landing::{
    FlyDirectToShore, FlyDirectToShoreParams, ShoreLanding, ShoreLandingParams, SlotLanding,
    SlotLandingParams, WaterLanding, WaterLandingParams,
};
pub use roam::{FlyOpposite, FlyOppositeParams, Wandering, WanderingParams};

use super::{has_touched_down, LogicPhase, RESULT_LANDED};
use crate::context::LogicContext;
use crate::steering::{LocomotionType, LogicPathResult};
use crate::strategy::{LandOnPoint, Strategy};
use glam::Vec2;

/// Highest altitude counted as on the surface
pub const TOUCHDOWN_ALTITUDE: f32 = 0.3;
/// Highest speed counted as at rest
pub const TOUCHDOWN_SPEED: f32 = 0.5;
/// Closing speed per unit of gap when landing on a moving point
const CLOSING_GAIN: f32 = 2.0;

/// Approach-and-land state shared by the landing logics
#[derive(Debug, Clone)]
pub(crate) struct Touchdown {
    strategy: LandOnPoint,
    phase: LogicPhase,
}

impl Touchdown {
    pub(crate) fn new(point: Vec2, altitude: f32, speed: f32, approach_distance: f32) -> Self {
        Self {
            strategy: LandOnPoint::new(point, altitude, speed)
                .with_approach_distance(approach_distance),
            phase: LogicPhase::Flying,
        }
    }

    pub(crate) fn point(&self) -> Vec2 {
        self.strategy.point
    }

    pub(crate) fn set_point(&mut self, point: Vec2) {
        self.strategy.point = point;
    }

    pub(crate) fn phase(&self) -> LogicPhase {
        self.phase
    }

    pub(crate) fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.update_in_frame(ctx, Vec2::ZERO)
    }

    /// Land on a point travelling at `frame_velocity`. Airspeed is the
    /// frame's pace plus a closing speed that fades out over the point, and
    /// the rest check is made relative to the frame.
    pub(crate) fn update_in_frame(
        &mut self,
        ctx: &mut LogicContext<'_>,
        frame_velocity: Vec2,
    ) -> LogicPathResult {
        let mut steering = self.strategy.update(ctx);
        let distance = ctx.origin.distance(self.strategy.point);
        let pace = frame_velocity.length();
        if pace > 0.0 {
            steering.speed = pace + self.strategy.speed.min(distance * CLOSING_GAIN);
        }
        self.phase = if distance > self.strategy.approach_distance {
            LogicPhase::Flying
        } else {
            LogicPhase::Landing
        };

        let result = LogicPathResult::new(steering, LocomotionType::Flight);
        if self.phase == LogicPhase::Landing
            && has_touched_down(ctx, frame_velocity, TOUCHDOWN_ALTITUDE, TOUCHDOWN_SPEED)
        {
            log::debug!("Touched down {:.2} from {:?}", distance, self.strategy.point);
            result.finish_with(RESULT_LANDED)
        } else {
            result
        }
    }
}
