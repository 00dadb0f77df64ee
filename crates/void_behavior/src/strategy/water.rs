//! Surface strategies: flanking, interception, charging and fleeing

use super::Strategy;
use crate::context::LogicContext;
use crate::math::{self, MIN_DISTANCE};
use crate::steering::Steering;

/// Circle out to one side of the target and pace it from slightly ahead
#[derive(Debug, Clone)]
pub struct CircleFlank {
    /// Lateral distance from the target's track
    pub radius: f32,
    /// How far ahead of the target to hold
    pub lead: f32,
    /// Swimming speed
    pub speed: f32,
    /// Abort once this far behind the target
    pub give_up_behind: f32,
    side: f32,
}

impl CircleFlank {
    /// Create a flank strategy; the side is chosen on first update
    pub fn new(radius: f32, lead: f32, speed: f32) -> Self {
        Self {
            radius,
            lead,
            speed,
            give_up_behind: radius * 3.0,
            side: 0.0,
        }
    }

    /// `1.0` for the target's left, `-1.0` for its right, `0.0` before the first update
    pub fn side(&self) -> f32 {
        self.side
    }
}

impl Strategy for CircleFlank {
    fn name(&self) -> &'static str {
        "CircleFlank"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        let heading = ctx.target_heading();
        let left = math::perpendicular(heading);

        if self.side == 0.0 {
            let offset = ctx.origin - ctx.target_position();
            self.side = if offset.dot(left) >= 0.0 { 1.0 } else { -1.0 };
        }

        let flank = ctx.target_position() + heading * self.lead + left * (self.side * self.radius);
        Steering::toward(flank, self.speed)
    }

    fn should_abort(&self, ctx: &LogicContext<'_>) -> bool {
        ctx.longitudinal_offset() < -self.give_up_behind
    }
}

/// Aim for a point just behind the target's stern, leading its motion
#[derive(Debug, Clone)]
pub struct SternIntercept {
    /// Distance behind the stern to aim for
    pub stern_offset: f32,
    /// Seconds of target motion to lead by
    pub lead_time: f32,
    /// Swimming speed
    pub speed: f32,
    /// Abort when the target pulls away faster than this
    pub abort_speed: f32,
}

impl SternIntercept {
    /// Create an intercept strategy
    pub fn new(stern_offset: f32, speed: f32) -> Self {
        Self {
            stern_offset,
            lead_time: 0.5,
            speed,
            abort_speed: speed * 0.8,
        }
    }

    /// Set the lead time
    pub fn with_lead_time(mut self, lead_time: f32) -> Self {
        self.lead_time = lead_time;
        self
    }
}

impl Strategy for SternIntercept {
    fn name(&self) -> &'static str {
        "SternIntercept"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        let stern = ctx.target_position() - ctx.target_heading() * self.stern_offset;
        let point = stern + ctx.target_velocity() * self.lead_time;
        Steering::toward(point, self.speed)
    }

    fn should_abort(&self, ctx: &LogicContext<'_>) -> bool {
        ctx.target_receding(self.abort_speed)
    }
}

/// Straight charge at where the target will be
#[derive(Debug, Clone)]
pub struct VulnerableCharge {
    /// Charge speed
    pub speed: f32,
    /// Upper bound on lead time in seconds
    pub max_lead: f32,
    /// Abort once the target is this far away
    pub give_up_distance: f32,
}

impl VulnerableCharge {
    /// Create a charge strategy
    pub fn new(speed: f32, give_up_distance: f32) -> Self {
        Self {
            speed,
            max_lead: 1.0,
            give_up_distance,
        }
    }
}

impl Strategy for VulnerableCharge {
    fn name(&self) -> &'static str {
        "VulnerableCharge"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        let distance = ctx.distance_to_target();
        let lead = (distance / self.speed.max(MIN_DISTANCE)).min(self.max_lead);
        let point = ctx.target_position() + ctx.target_velocity() * lead;
        Steering::toward(point, self.speed).with_smoothing(6.0)
    }

    fn should_abort(&self, ctx: &LogicContext<'_>) -> bool {
        ctx.distance_to_target() > self.give_up_distance
    }
}

/// Swim directly away from the target
#[derive(Debug, Clone)]
pub struct Flee {
    /// Swimming speed
    pub speed: f32,
    /// How far ahead the steering point is placed
    pub lookahead: f32,
}

impl Flee {
    /// Create a flee strategy
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            lookahead: 10.0,
        }
    }
}

impl Strategy for Flee {
    fn name(&self) -> &'static str {
        "Flee"
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering {
        let away = math::try_normalize(ctx.origin - ctx.target_position())
            .unwrap_or_else(|| ctx.forward());
        Steering::toward(ctx.origin + away * self.lookahead, self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use glam::Vec2;
    use void_physics::SimBody;

    fn boat_heading_north(fixture: &mut Fixture, position: Vec2, speed: f32) {
        fixture.target = SimBody::dynamic()
            .with_position(position)
            .with_velocity(Vec2::new(0.0, speed));
    }

    #[test]
    fn test_flank_picks_near_side() {
        let mut fixture = Fixture::new();
        boat_heading_north(&mut fixture, Vec2::new(10.0, 0.0), 4.0);

        let mut flank = CircleFlank::new(6.0, 3.0, 8.0);
        let steering = flank.update(&mut fixture.ctx());

        // Creature at x=0 is on the boat's left (-x when heading +y)
        assert_eq!(flank.side(), 1.0);
        assert!((steering.target - Vec2::new(4.0, 3.0)).length() < 1e-4);
        assert_eq!(steering.speed, 8.0);
    }

    #[test]
    fn test_flank_gives_up_far_behind() {
        let mut fixture = Fixture::new();
        boat_heading_north(&mut fixture, Vec2::new(0.0, 40.0), 4.0);

        let flank = CircleFlank::new(5.0, 3.0, 8.0);
        assert!(flank.should_abort(&fixture.ctx()));
    }

    #[test]
    fn test_intercept_leads_stern() {
        let mut fixture = Fixture::new();
        boat_heading_north(&mut fixture, Vec2::new(0.0, 20.0), 4.0);

        let mut intercept = SternIntercept::new(5.0, 10.0).with_lead_time(1.0);
        let steering = intercept.update(&mut fixture.ctx());

        assert!((steering.target - Vec2::new(0.0, 19.0)).length() < 1e-4);
    }

    #[test]
    fn test_intercept_aborts_when_target_runs() {
        let mut fixture = Fixture::new();
        boat_heading_north(&mut fixture, Vec2::new(0.0, 20.0), 12.0);

        let intercept = SternIntercept::new(5.0, 10.0);
        assert!(intercept.should_abort(&fixture.ctx()));

        boat_heading_north(&mut fixture, Vec2::new(0.0, 20.0), 2.0);
        assert!(!intercept.should_abort(&fixture.ctx()));
    }

    #[test]
    fn test_charge_leads_target() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(10.0, 0.0))
            .with_velocity(Vec2::new(0.0, 5.0));

        let mut charge = VulnerableCharge::new(20.0, 50.0);
        let steering = charge.update(&mut fixture.ctx());

        // 10 units at 20 u/s => half a second of lead
        assert!((steering.target - Vec2::new(10.0, 2.5)).length() < 1e-4);
        assert!(!charge.should_abort(&fixture.ctx()));
    }

    #[test]
    fn test_flee_points_away() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic().with_position(Vec2::new(5.0, 0.0));

        let mut flee = Flee::new(6.0);
        let steering = flee.update(&mut fixture.ctx());

        assert!(steering.target.x < 0.0);
        assert_eq!(steering.speed, 6.0);
    }
}
