//! Per-frame snapshot handed to logic modules and strategies

use crate::environment::{BankSide, Environment};
use crate::math;
use crate::rng::DeterministicRng;
use glam::Vec2;
use void_physics::PhysicsBody;

/// How much each carried bottle adds to a creature's aggressiveness
pub const BOTTLE_AGGRESSION: f32 = 0.05;

/// Read-mostly view of the world for one creature and one tick.
///
/// Built fresh every frame by the orchestrator; never stored.
pub struct LogicContext<'a> {
    /// Frame time in seconds
    pub dt: f32,
    /// Creature position
    pub origin: Vec2,
    /// Creature snout position
    pub snout: Vec2,
    /// Creature height (world y)
    pub height: f32,
    /// Creature body
    pub body: &'a dyn PhysicsBody,
    /// The body every creature reacts to (the boat)
    pub target: &'a dyn PhysicsBody,
    /// Terrain and river queries
    pub environment: &'a dyn Environment,
    /// Base aggressiveness in `[0, 1]`
    pub aggressiveness: f32,
    /// Resource count (bottles) that raises aggressiveness
    pub bottles: u32,
    /// Creature-owned random source
    pub rng: &'a mut DeterministicRng,
}

impl<'a> LogicContext<'a> {
    /// Aggressiveness after the bottle bonus, clamped to `[0, 1]`
    pub fn effective_aggressiveness(&self) -> f32 {
        (self.aggressiveness + self.bottles as f32 * BOTTLE_AGGRESSION).clamp(0.0, 1.0)
    }

    /// Multiplier in `[1, 4]` applied to speeds and notice distances
    pub fn aggression_multiplier(&self) -> f32 {
        1.0 + 3.0 * self.effective_aggressiveness()
    }

    /// Creature heading
    pub fn angle(&self) -> f32 {
        self.body.angle()
    }

    /// Creature facing direction
    pub fn forward(&self) -> Vec2 {
        math::forward(self.body.angle())
    }

    /// Creature velocity
    pub fn velocity(&self) -> Vec2 {
        self.body.linear_velocity()
    }

    /// Target position
    pub fn target_position(&self) -> Vec2 {
        self.target.position()
    }

    /// Target velocity
    pub fn target_velocity(&self) -> Vec2 {
        self.target.linear_velocity()
    }

    /// Direction the target is travelling, or facing when stopped
    pub fn target_heading(&self) -> Vec2 {
        math::try_normalize(self.target.linear_velocity())
            .unwrap_or_else(|| math::forward(self.target.angle()))
    }

    /// Vector from the creature to the target
    pub fn to_target(&self) -> Vec2 {
        self.target.position() - self.origin
    }

    /// Distance from the creature to the target
    pub fn distance_to_target(&self) -> f32 {
        self.to_target().length()
    }

    /// Distance from the creature's snout to the target
    pub fn snout_distance_to_target(&self) -> f32 {
        self.snout.distance(self.target.position())
    }

    /// Offset of the creature along the target's travel direction
    /// (positive when the creature is ahead of the target)
    pub fn longitudinal_offset(&self) -> f32 {
        (self.origin - self.target.position()).dot(self.target_heading())
    }

    /// Whether the target is moving away from the creature faster than `speed`
    pub fn target_receding(&self, speed: f32) -> bool {
        match math::try_normalize(self.target.position() - self.origin) {
            Some(away) => self.target.linear_velocity().dot(away) > speed,
            None => false,
        }
    }

    /// Height of ground or water below the creature
    pub fn ground_height(&self) -> f32 {
        self.environment.ground_height(self.origin)
    }

    /// Height above ground or water
    pub fn altitude(&self) -> f32 {
        self.height - self.ground_height()
    }

    /// Side of the river the creature is on or nearest to
    pub fn bank_side(&self) -> BankSide {
        self.environment
            .bank_positions(self.origin.y)
            .nearest_side(self.origin.x)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixture for building contexts in unit tests

    use super::*;
    use crate::environment::StraightRiver;
    use void_physics::SimBody;

    /// Owns everything a [`LogicContext`] borrows
    pub struct Fixture {
        pub body: SimBody,
        pub target: SimBody,
        pub river: StraightRiver,
        pub rng: DeterministicRng,
        pub height: f32,
        pub aggressiveness: f32,
        pub bottles: u32,
        pub dt: f32,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                body: SimBody::dynamic(),
                target: SimBody::dynamic().with_position(Vec2::new(0.0, 100.0)),
                river: StraightRiver::new(-20.0, 20.0),
                rng: DeterministicRng::new(11),
                height: 0.0,
                aggressiveness: 0.0,
                bottles: 0,
                dt: 1.0 / 60.0,
            }
        }

        pub fn ctx(&mut self) -> LogicContext<'_> {
            let origin = self.body.position();
            LogicContext {
                dt: self.dt,
                origin,
                snout: self.body.world_point(Vec2::new(1.0, 0.0)),
                height: self.height,
                body: &self.body,
                target: &self.target,
                environment: &self.river,
                aggressiveness: self.aggressiveness,
                bottles: self.bottles,
                rng: &mut self.rng,
            }
        }
    }
}
