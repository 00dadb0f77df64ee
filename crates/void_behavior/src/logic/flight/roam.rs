//! Free flight: wandering and flying off away from the boat

use crate::context::LogicContext;
use crate::logic::{LogicModule, LogicPhase, RESULT_FINISHED};
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use crate::strategy::{Strategy, Wander};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Parameters for [`Wandering`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderingParams {
    /// Lowest altitude above the surface
    pub min_altitude: f32,
    /// Highest altitude above the surface
    pub max_altitude: f32,
    /// Radius of the wandering area around the activation point
    pub radius: f32,
    /// Airspeed
    pub speed: f32,
    /// Seconds to wander
    pub duration: f32,
}

impl Default for WanderingParams {
    fn default() -> Self {
        Self {
            min_altitude: 4.0,
            max_altitude: 10.0,
            radius: 25.0,
            speed: 8.0,
            duration: 10.0,
        }
    }
}

/// Drift around in the air for a while
#[derive(Debug, Clone)]
pub struct Wandering {
    params: WanderingParams,
    strategy: Wander,
    elapsed: f32,
}

impl Wandering {
    pub fn new(params: WanderingParams) -> Self {
        let strategy = Wander::new(Vec2::ZERO, params.radius, params.speed)
            .with_altitude(params.min_altitude, params.max_altitude);
        Self {
            params,
            strategy,
            elapsed: 0.0,
        }
    }
}

impl LogicModule for Wandering {
    fn name(&self) -> &str {
        "Wandering"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        self.strategy = Wander::new(ctx.origin, self.params.radius, self.params.speed)
            .with_altitude(self.params.min_altitude, self.params.max_altitude);
        self.elapsed = 0.0;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.elapsed += ctx.dt;
        let result = LogicPathResult::new(self.strategy.update(ctx), LocomotionType::Flight);

        if self.elapsed >= self.params.duration {
            result.finish_with(RESULT_FINISHED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        LogicPhase::Flying
    }

    fn duration(&self) -> Option<f32> {
        Some(self.params.duration)
    }
}

/// Parameters for [`FlyOpposite`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyOppositeParams {
    /// Altitude above the surface
    pub altitude: f32,
    /// Airspeed
    pub speed: f32,
    /// How far to fly
    pub distance: f32,
    /// Distance counted as arrived
    pub arrive_radius: f32,
}

impl Default for FlyOppositeParams {
    fn default() -> Self {
        Self {
            altitude: 10.0,
            speed: 12.0,
            distance: 60.0,
            arrive_radius: 3.0,
        }
    }
}

/// Fly off against the boat's direction of travel
#[derive(Debug, Clone)]
pub struct FlyOpposite {
    params: FlyOppositeParams,
    goal: Vec2,
}

impl FlyOpposite {
    pub fn new(params: FlyOppositeParams) -> Self {
        Self {
            params,
            goal: Vec2::ZERO,
        }
    }

    /// Destination chosen at activation
    pub fn goal(&self) -> Vec2 {
        self.goal
    }
}

impl LogicModule for FlyOpposite {
    fn name(&self) -> &str {
        "FlyOpposite"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        self.goal = ctx.origin - ctx.target_heading() * self.params.distance;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let height = ctx.environment.ground_height(self.goal) + self.params.altitude;
        let steering = Steering::toward(self.goal, self.params.speed).with_height(height);
        let result = LogicPathResult::new(steering, LocomotionType::Flight);

        if ctx.origin.distance(self.goal) <= self.params.arrive_radius {
            result.finish_with(RESULT_FINISHED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        LogicPhase::Flying
    }

    fn duration(&self) -> Option<f32> {
        Some(self.params.distance / self.params.speed.max(0.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use void_physics::SimBody;

    #[test]
    fn test_wandering_times_out() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.5;
        let mut logic = Wandering::new(WanderingParams {
            duration: 1.0,
            ..Default::default()
        });
        logic.activate(&mut fixture.ctx());

        let first = logic.update(&mut fixture.ctx());
        assert!(first.steering.target.length() <= 25.0 + 1e-4);
        assert!(!first.has_result());
        assert_eq!(
            logic.update(&mut fixture.ctx()).result.as_deref(),
            Some(RESULT_FINISHED)
        );
    }

    #[test]
    fn test_fly_opposite_heads_upstream() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(0.0, 20.0))
            .with_velocity(Vec2::new(0.0, 5.0));

        let mut logic = FlyOpposite::new(FlyOppositeParams::default());
        logic.activate(&mut fixture.ctx());
        assert_eq!(logic.goal(), Vec2::new(0.0, -60.0));

        let result = logic.update(&mut fixture.ctx());
        assert_eq!(result.steering.height, Some(10.0));
        assert!(!result.has_result());

        fixture.body = SimBody::kinematic().with_position(Vec2::new(1.0, -59.0));
        assert!(logic.update(&mut fixture.ctx()).is_deferred());
    }
}
