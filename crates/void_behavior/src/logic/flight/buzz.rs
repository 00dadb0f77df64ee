//! Circling the boat from the air

use crate::context::LogicContext;
use crate::logic::{LogicModule, LogicPhase, RESULT_ABORTED, RESULT_FINISHED};
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use crate::strategy::{BuzzTarget, Strategy};
use serde::{Deserialize, Serialize};

/// Parameters for [`BuzzBoat`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuzzBoatParams {
    /// Mean altitude above the surface
    pub altitude: f32,
    /// Airspeed before the aggression multiplier
    pub speed: f32,
    /// Orbit radius around the boat
    pub radius: f32,
    /// Seconds spent circling
    pub buzz_time: f32,
    /// Give up when the boat is farther than this
    pub give_up_distance: f32,
}

impl Default for BuzzBoatParams {
    fn default() -> Self {
        Self {
            altitude: 6.0,
            speed: 12.0,
            radius: 8.0,
            buzz_time: 6.0,
            give_up_distance: 150.0,
        }
    }
}

/// Fly to the boat and circle it for a while
#[derive(Debug, Clone)]
pub struct BuzzBoat {
    params: BuzzBoatParams,
    strategy: BuzzTarget,
    move_speed: f32,
    buzzing: bool,
    timer: f32,
}

impl BuzzBoat {
    pub fn new(params: BuzzBoatParams) -> Self {
        let strategy = BuzzTarget::new(
            params.radius,
            params.speed,
            params.altitude * 0.5,
            params.altitude * 1.5,
        );
        Self {
            params,
            strategy,
            move_speed: 0.0,
            buzzing: false,
            timer: 0.0,
        }
    }
}

impl LogicModule for BuzzBoat {
    fn name(&self) -> &str {
        "BuzzBoat"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        self.move_speed = self.params.speed * ctx.aggression_multiplier();
        let orbit = self.strategy.orbit_speed.abs() * ctx.rng.sign();
        self.strategy = BuzzTarget::new(
            self.params.radius,
            self.move_speed,
            self.params.altitude * 0.5,
            self.params.altitude * 1.5,
        )
        .with_orbit_speed(orbit);
        self.buzzing = false;
        self.timer = 0.0;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let distance = ctx.distance_to_target();

        if !self.buzzing && distance <= self.params.radius * 1.5 {
            log::trace!("BuzzBoat circling at {:.1}", distance);
            self.buzzing = true;
        }

        let steering = if self.buzzing {
            self.timer += ctx.dt;
            self.strategy.update(ctx)
        } else {
            let boat = ctx.target_position();
            let height = ctx.environment.ground_height(boat) + self.params.altitude;
            Steering::toward(boat, self.move_speed).with_height(height)
        };

        let result = LogicPathResult::new(steering, LocomotionType::Flight);
        if distance > self.params.give_up_distance {
            result.finish_with(RESULT_ABORTED)
        } else if self.buzzing && self.timer >= self.params.buzz_time {
            result.finish_with(RESULT_FINISHED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        if self.buzzing {
            LogicPhase::Buzzing
        } else {
            LogicPhase::Flying
        }
    }

    fn duration(&self) -> Option<f32> {
        Some(self.params.buzz_time)
    }
}
