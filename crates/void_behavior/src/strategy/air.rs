//! Aerial strategies: buzzing, landing and wandering

use super::Strategy;
use crate::context::LogicContext;
use crate::math;
use crate::steering::Steering;
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Orbit the target while bobbing between two altitudes
#[derive(Debug, Clone)]
pub struct BuzzTarget {
    /// Orbit radius
    pub radius: f32,
    /// Airspeed
    pub speed: f32,
    /// Lowest altitude above the surface
    pub low_altitude: f32,
    /// Highest altitude above the surface
    pub high_altitude: f32,
    /// Orbit rate in rad/s (sign picks the direction)
    pub orbit_speed: f32,
    /// Seconds per bob cycle
    pub bob_period: f32,
    orbit_angle: Option<f32>,
    elapsed: f32,
}

impl BuzzTarget {
    /// Create a buzz strategy
    pub fn new(radius: f32, speed: f32, low_altitude: f32, high_altitude: f32) -> Self {
        Self {
            radius,
            speed,
            low_altitude,
            high_altitude,
            orbit_speed: 1.2,
            bob_period: 3.0,
            orbit_angle: None,
            elapsed: 0.0,
        }
    }

    /// Set the orbit rate
    pub fn with_orbit_speed(mut self, orbit_speed: f32) -> Self {
        self.orbit_speed = orbit_speed;
        self
    }
}

impl Strategy for BuzzTarget {
    fn name(&self) -> &'static str {
        "BuzzTarget"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        let center = ctx.target_position();
        let angle = self
            .orbit_angle
            .unwrap_or_else(|| math::heading(ctx.origin - center))
            + self.orbit_speed * ctx.dt;
        self.orbit_angle = Some(math::normalize_angle(angle));
        self.elapsed += ctx.dt;

        let point = center + math::forward(angle) * self.radius;
        let bob = 0.5 + 0.5 * (self.elapsed * TAU / self.bob_period.max(0.1)).sin();
        let altitude = math::lerp(self.low_altitude, self.high_altitude, bob);
        let height = ctx.environment.ground_height(point) + altitude;

        Steering::toward(point, self.speed).with_height(height)
    }
}

/// Glide down onto a fixed point
#[derive(Debug, Clone)]
pub struct LandOnPoint {
    /// Touchdown point
    pub point: Vec2,
    /// Altitude held until the approach begins
    pub cruise_altitude: f32,
    /// Distance over which altitude and speed bleed off
    pub approach_distance: f32,
    /// Cruise airspeed
    pub speed: f32,
    /// Airspeed just before touchdown
    pub touchdown_speed: f32,
    /// Distance counted as arrived
    pub arrive_radius: f32,
}

impl LandOnPoint {
    /// Create a landing strategy
    pub fn new(point: Vec2, cruise_altitude: f32, speed: f32) -> Self {
        Self {
            point,
            cruise_altitude,
            approach_distance: 15.0,
            speed,
            touchdown_speed: 1.5,
            arrive_radius: 0.5,
        }
    }

    /// Set the approach distance
    pub fn with_approach_distance(mut self, distance: f32) -> Self {
        self.approach_distance = distance;
        self
    }

    /// Whether the creature is over the touchdown point
    pub fn has_arrived(&self, ctx: &LogicContext<'_>) -> bool {
        ctx.origin.distance(self.point) <= self.arrive_radius
    }
}

impl Strategy for LandOnPoint {
    fn name(&self) -> &'static str {
        "LandOnPoint"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        let distance = ctx.origin.distance(self.point);
        let ground = ctx.environment.ground_height(self.point);
        let approach = (distance / self.approach_distance.max(0.1)).clamp(0.0, 1.0);

        let height = ground + self.cruise_altitude * approach;
        let speed = if distance <= self.arrive_radius {
            0.0
        } else {
            math::lerp(self.touchdown_speed, self.speed, approach)
        };

        Steering::toward(self.point, speed)
            .with_height(height)
            .with_banking(approach >= 1.0)
    }
}

/// Drift between random points around an anchor
#[derive(Debug, Clone)]
pub struct Wander {
    /// Centre of the wandering area
    pub anchor: Vec2,
    /// Radius of the wandering area
    pub radius: f32,
    /// Lowest altitude above the surface
    pub min_altitude: f32,
    /// Highest altitude above the surface
    pub max_altitude: f32,
    /// Airspeed
    pub speed: f32,
    /// Seconds before a new point is picked anyway
    pub retarget_interval: f32,
    goal: Option<(Vec2, f32)>,
    timer: f32,
}

impl Wander {
    /// Create a wander strategy
    pub fn new(anchor: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            anchor,
            radius,
            min_altitude: 0.0,
            max_altitude: 0.0,
            speed,
            retarget_interval: 6.0,
            goal: None,
            timer: 0.0,
        }
    }

    /// Set the altitude band
    pub fn with_altitude(mut self, min: f32, max: f32) -> Self {
        self.min_altitude = min;
        self.max_altitude = max;
        self
    }

    /// Current goal point, if one was picked
    pub fn goal(&self) -> Option<Vec2> {
        self.goal.map(|(point, _)| point)
    }

    fn pick_goal(&mut self, ctx: &mut LogicContext<'_>) -> (Vec2, f32) {
        let angle = ctx.rng.range(-PI, PI);
        let distance = self.radius * ctx.rng.unit().sqrt();
        let point = self.anchor + math::forward(angle) * distance;
        let altitude = ctx.rng.range(self.min_altitude, self.max_altitude);
        self.timer = self.retarget_interval;
        (point, altitude)
    }
}

impl Strategy for Wander {
    fn name(&self) -> &'static str {
        "Wander"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        self.timer -= ctx.dt;

        let (point, altitude) = match self.goal {
            Some((point, altitude)) if self.timer > 0.0 && ctx.origin.distance(point) > 2.0 => {
                (point, altitude)
            }
            _ => {
                let goal = self.pick_goal(ctx);
                self.goal = Some(goal);
                goal
            }
        };

        let height = ctx.environment.ground_height(point) + altitude;
        Steering::toward(point, self.speed).with_height(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use void_physics::SimBody;

    #[test]
    fn test_buzz_orbits_at_radius() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic().with_position(Vec2::new(0.0, 20.0));

        let mut buzz = BuzzTarget::new(8.0, 10.0, 2.0, 6.0);
        for _ in 0..30 {
            let steering = buzz.update(&mut fixture.ctx());
            assert!((steering.target.distance(Vec2::new(0.0, 20.0)) - 8.0).abs() < 1e-3);
            let height = steering.height.unwrap();
            assert!((2.0..=6.0).contains(&height));
        }
    }

    #[test]
    fn test_landing_bleeds_altitude_and_speed() {
        let mut fixture = Fixture::new();
        let mut land = LandOnPoint::new(Vec2::new(0.0, 30.0), 10.0, 12.0);

        let far = land.update(&mut fixture.ctx());
        assert_eq!(far.height, Some(10.0));
        assert_eq!(far.speed, 12.0);
        assert!(far.banking_enabled());

        fixture.body = SimBody::kinematic().with_position(Vec2::new(0.0, 25.0));
        let near = land.update(&mut fixture.ctx());
        assert!(near.height.unwrap() < 10.0);
        assert!(near.speed < 12.0);
        assert!(!near.banking_enabled());

        fixture.body = SimBody::kinematic().with_position(Vec2::new(0.0, 30.0));
        assert_eq!(land.update(&mut fixture.ctx()).speed, 0.0);
        assert!(land.has_arrived(&fixture.ctx()));
    }

    #[test]
    fn test_wander_stays_near_anchor() {
        let mut fixture = Fixture::new();
        let anchor = Vec2::new(5.0, 5.0);
        let mut wander = Wander::new(anchor, 10.0, 4.0).with_altitude(3.0, 5.0);
        wander.retarget_interval = 0.0;

        for _ in 0..50 {
            let steering = wander.update(&mut fixture.ctx());
            assert!(steering.target.distance(anchor) <= 10.0 + 1e-4);
            let height = steering.height.unwrap();
            assert!((3.0..=5.0).contains(&height));
        }
    }

    #[test]
    fn test_wander_is_reproducible() {
        let mut a = Fixture::new();
        let mut b = Fixture::new();
        let mut wa = Wander::new(Vec2::ZERO, 10.0, 4.0);
        let mut wb = Wander::new(Vec2::ZERO, 10.0, 4.0);

        assert_eq!(wa.update(&mut a.ctx()).target, wb.update(&mut b.ctx()).target);
    }
}
