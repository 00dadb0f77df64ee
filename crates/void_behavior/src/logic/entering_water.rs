//! Walking (or leaping) off the bank into the river

use super::{LogicModule, LogicPhase, RESULT_FINISHED};
use crate::context::LogicContext;
use crate::math::{self, MIN_DISTANCE};
use crate::steering::{JumpRequest, LocomotionType, LogicPathResult, Steering};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Parameters for [`EnteringWater`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnteringWaterParams {
    /// Walking speed before the aggression multiplier
    pub speed: f32,
    /// Width of the shallow band; the environment's margin when unset
    pub margin: Option<f32>,
    /// Apex height of a leap into the water; no leap when unset
    pub jump_height: Option<f32>,
    /// Distance from open water at which the leap starts
    pub jump_distance: f32,
}

impl Default for EnteringWaterParams {
    fn default() -> Self {
        Self {
            speed: 8.0,
            margin: None,
            jump_height: None,
            jump_distance: 6.0,
        }
    }
}

/// Horizontal arc length for a leap that first meets the water `distance`
/// ahead, starting `altitude` above it with apex `jump_height`.
///
/// The jump height follows `altitude + 4t(1-t)·jump_height` over progress `t`;
/// the arc is stretched so that the descending branch crosses zero exactly at
/// `distance`.
pub fn jump_arc_length(distance: f32, altitude: f32, jump_height: f32) -> f32 {
    if jump_height <= MIN_DISTANCE {
        return distance;
    }
    let ratio = (altitude / jump_height).clamp(0.0, 64.0);
    let crossing = (1.0 + (1.0 + ratio).sqrt()) * 0.5;
    distance / crossing
}

/// Walk perpendicular to the bank until past the shallow margin
#[derive(Debug, Clone)]
pub struct EnteringWater {
    params: EnteringWaterParams,
    direction: Vec2,
    move_speed: f32,
    margin: f32,
    duration: f32,
    bank_height: f32,
    jump: Option<(Vec2, f32)>,
    phase: LogicPhase,
}

impl EnteringWater {
    pub fn new(params: EnteringWaterParams) -> Self {
        Self {
            params,
            direction: Vec2::X,
            move_speed: 0.0,
            margin: 0.0,
            duration: 0.0,
            bank_height: 0.0,
            jump: None,
            phase: LogicPhase::Walking,
        }
    }

    /// Walking direction chosen at activation
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Speed after the aggression multiplier
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    fn leap(&mut self, ctx: &LogicContext<'_>, into_water: f32) -> Option<JumpRequest> {
        let height = self.params.jump_height?;
        if self.jump.is_some() {
            return None;
        }

        let across = self.direction.x.abs().max(MIN_DISTANCE);
        let distance = (self.margin - into_water).max(0.0) / across;
        if distance > self.params.jump_distance {
            return None;
        }

        let altitude = ctx.height - ctx.environment.water_level();
        let arc = jump_arc_length(distance, altitude, height);
        log::debug!(
            "EnteringWater leap: apex {:.2}, arc {:.2} over {:.2} to water",
            height,
            arc,
            distance
        );
        self.jump = Some((ctx.origin, arc));
        Some(JumpRequest {
            height,
            distance: arc,
        })
    }

    fn is_airborne(&self, origin: Vec2) -> bool {
        matches!(self.jump, Some((start, arc)) if start.distance(origin) < arc)
    }

    fn margin_pose(&self, ctx: &LogicContext<'_>, into_water: f32) -> (f32, Vec3) {
        let water = ctx.environment.water_level();
        let t = (into_water / self.margin.max(MIN_DISTANCE)).clamp(0.0, 1.0);
        let drop = self.bank_height - water;
        let normal = Vec3::new(self.direction.x * drop, self.margin, self.direction.y * drop)
            .try_normalize()
            .unwrap_or(Vec3::Y);
        (math::lerp(self.bank_height, water, t), normal)
    }
}

impl LogicModule for EnteringWater {
    fn name(&self) -> &str {
        "EnteringWater"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        let env = ctx.environment;
        let banks = env.bank_positions(ctx.origin.y);
        let side = banks.nearest_side(ctx.origin.x);

        let mut direction = math::perpendicular(env.river_tangent(ctx.origin.y));
        if direction.x * side.into_water() < 0.0 {
            direction = -direction;
        }
        self.direction = direction;
        self.move_speed = self.params.speed * ctx.aggression_multiplier();
        self.margin = self.params.margin.unwrap_or_else(|| env.margin());

        let into_water = env.zone(ctx.origin.x, ctx.origin.y).distance;
        let to_water = (-into_water).max(0.0) / direction.x.abs().max(MIN_DISTANCE);
        self.duration = if self.move_speed > MIN_DISTANCE {
            to_water / self.move_speed
        } else {
            0.0
        };

        let edge = banks.edge(side) - side.into_water() * 0.5;
        self.bank_height = env.sample(edge, ctx.origin.y).height.max(env.water_level());
        self.jump = None;
        self.phase = LogicPhase::Walking;

        log::debug!(
            "EnteringWater from {:?} bank: {:.1} to water at {:.1}/s",
            side,
            to_water,
            self.move_speed
        );
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let into_water = ctx.environment.zone(ctx.origin.x, ctx.origin.y).distance;
        let steering = Steering::toward(ctx.origin + self.direction * 10.0, self.move_speed);
        let mut result = LogicPathResult::new(steering, LocomotionType::Land);

        if into_water >= self.margin {
            return result.finish_with(RESULT_FINISHED);
        }

        if let Some(jump) = self.leap(ctx, into_water) {
            result = result.with_jump(jump);
        }

        self.phase = if self.is_airborne(ctx.origin) {
            LogicPhase::Jumping
        } else if into_water >= 0.0 {
            let (height, normal) = self.margin_pose(ctx, into_water);
            result = result.with_explicit_pose(height, normal);
            LogicPhase::Entering
        } else {
            LogicPhase::Walking
        };

        result
    }

    fn phase(&self) -> LogicPhase {
        self.phase
    }

    fn duration(&self) -> Option<f32> {
        Some(self.duration)
    }
}
