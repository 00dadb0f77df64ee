//! Landing logics: on the bank ahead of the boat, on the water, on the
//! nearest shore, or on a designated slot

use super::Touchdown;
use crate::context::LogicContext;
use crate::logic::{LogicModule, LogicPhase};
use crate::steering::LogicPathResult;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Parameters for [`ShoreLanding`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoreLandingParams {
    /// Cruise altitude
    pub altitude: f32,
    /// Cruise airspeed
    pub speed: f32,
    /// How far past the water edge to touch down
    pub inland: f32,
    /// How far ahead of the boat, along the river
    pub lead: f32,
    /// Distance over which the descent happens
    pub approach_distance: f32,
}

impl Default for ShoreLandingParams {
    fn default() -> Self {
        Self {
            altitude: 8.0,
            speed: 10.0,
            inland: 3.0,
            lead: 20.0,
            approach_distance: 15.0,
        }
    }
}

/// Land on the creature's bank, ahead of the boat
#[derive(Debug, Clone)]
pub struct ShoreLanding {
    params: ShoreLandingParams,
    touchdown: Touchdown,
}

impl ShoreLanding {
    pub fn new(params: ShoreLandingParams) -> Self {
        let touchdown = Touchdown::new(
            Vec2::ZERO,
            params.altitude,
            params.speed,
            params.approach_distance,
        );
        Self { params, touchdown }
    }

    /// Touchdown point chosen at activation
    pub fn landing_point(&self) -> Vec2 {
        self.touchdown.point()
    }
}

impl LogicModule for ShoreLanding {
    fn name(&self) -> &str {
        "ShoreLanding"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        let travel = if ctx.target_heading().y < 0.0 { -1.0 } else { 1.0 };
        let z = ctx.target_position().y + travel * self.params.lead;
        let side = ctx.bank_side();
        let edge = ctx.environment.bank_positions(z).edge(side);
        let x = edge - side.into_water() * self.params.inland;
        self.touchdown.set_point(Vec2::new(x, z));
        log::debug!("ShoreLanding on {:?} bank at {:?}", side, self.touchdown.point());
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.touchdown.update(ctx)
    }

    fn phase(&self) -> LogicPhase {
        self.touchdown.phase()
    }
}

/// Parameters for [`WaterLanding`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterLandingParams {
    /// Cruise altitude
    pub altitude: f32,
    /// Cruise airspeed
    pub speed: f32,
    /// How far ahead of the creature to touch down
    pub distance: f32,
    /// Distance over which the descent happens
    pub approach_distance: f32,
}

impl Default for WaterLandingParams {
    fn default() -> Self {
        Self {
            altitude: 6.0,
            speed: 10.0,
            distance: 15.0,
            approach_distance: 12.0,
        }
    }
}

/// Land on open water ahead of the creature
#[derive(Debug, Clone)]
pub struct WaterLanding {
    params: WaterLandingParams,
    touchdown: Touchdown,
}

impl WaterLanding {
    pub fn new(params: WaterLandingParams) -> Self {
        let touchdown = Touchdown::new(
            Vec2::ZERO,
            params.altitude,
            params.speed,
            params.approach_distance,
        );
        Self { params, touchdown }
    }

    /// Touchdown point chosen at activation
    pub fn landing_point(&self) -> Vec2 {
        self.touchdown.point()
    }
}

impl LogicModule for WaterLanding {
    fn name(&self) -> &str {
        "WaterLanding"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        let ahead = ctx.origin + ctx.forward() * self.params.distance;
        let banks = ctx.environment.bank_positions(ahead.y);
        let margin = ctx.environment.margin();

        // Keep clear of the shallows
        let x = if banks.width() > 2.0 * margin {
            ahead.x.clamp(banks.left + margin, banks.right - margin)
        } else {
            banks.center()
        };
        self.touchdown.set_point(Vec2::new(x, ahead.y));
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.touchdown.update(ctx)
    }

    fn phase(&self) -> LogicPhase {
        self.touchdown.phase()
    }
}

/// Parameters for [`FlyDirectToShore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyDirectToShoreParams {
    /// Cruise altitude
    pub altitude: f32,
    /// Cruise airspeed
    pub speed: f32,
    /// How far past the water edge to touch down
    pub inland: f32,
    /// Distance over which the descent happens
    pub approach_distance: f32,
}

impl Default for FlyDirectToShoreParams {
    fn default() -> Self {
        Self {
            altitude: 5.0,
            speed: 10.0,
            inland: 2.0,
            approach_distance: 10.0,
        }
    }
}

/// Fly straight across to the nearest bank and land
#[derive(Debug, Clone)]
pub struct FlyDirectToShore {
    params: FlyDirectToShoreParams,
    touchdown: Touchdown,
}

impl FlyDirectToShore {
    pub fn new(params: FlyDirectToShoreParams) -> Self {
        let touchdown = Touchdown::new(
            Vec2::ZERO,
            params.altitude,
            params.speed,
            params.approach_distance,
        );
        Self { params, touchdown }
    }

    /// Touchdown point chosen at activation
    pub fn landing_point(&self) -> Vec2 {
        self.touchdown.point()
    }
}

impl LogicModule for FlyDirectToShore {
    fn name(&self) -> &str {
        "FlyDirectToShore"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        let side = ctx.bank_side();
        let edge = ctx.environment.bank_positions(ctx.origin.y).edge(side);
        let x = edge - side.into_water() * self.params.inland;
        self.touchdown.set_point(Vec2::new(x, ctx.origin.y));
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.touchdown.update(ctx)
    }

    fn phase(&self) -> LogicPhase {
        self.touchdown.phase()
    }
}

/// Parameters for [`SlotLanding`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLandingParams {
    /// Touchdown point
    pub slot: Vec2,
    /// Treat `slot` as a point in the boat's local frame and track it
    pub relative_to_target: bool,
    /// Cruise altitude
    pub altitude: f32,
    /// Cruise airspeed
    pub speed: f32,
    /// Distance over which the descent happens
    pub approach_distance: f32,
}

impl Default for SlotLandingParams {
    fn default() -> Self {
        Self {
            slot: Vec2::ZERO,
            relative_to_target: false,
            altitude: 8.0,
            speed: 10.0,
            approach_distance: 12.0,
        }
    }
}

/// Land on a designated slot, optionally one riding on the boat
#[derive(Debug, Clone)]
pub struct SlotLanding {
    params: SlotLandingParams,
    touchdown: Touchdown,
}

impl SlotLanding {
    pub fn new(params: SlotLandingParams) -> Self {
        let touchdown = Touchdown::new(
            params.slot,
            params.altitude,
            params.speed,
            params.approach_distance,
        );
        Self { params, touchdown }
    }

    fn slot_position(&self, ctx: &LogicContext<'_>) -> Vec2 {
        if self.params.relative_to_target {
            ctx.target.world_point(self.params.slot)
        } else {
            self.params.slot
        }
    }
}

impl LogicModule for SlotLanding {
    fn name(&self) -> &str {
        "SlotLanding"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        let slot = self.slot_position(ctx);
        self.touchdown.set_point(slot);
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        if self.params.relative_to_target {
            let slot = self.slot_position(ctx);
            self.touchdown.set_point(slot);
            let frame = ctx.target_velocity();
            return self.touchdown.update_in_frame(ctx, frame);
        }
        self.touchdown.update(ctx)
    }

    fn phase(&self) -> LogicPhase {
        self.touchdown.phase()
    }
}
