//! Swimming away from, and back toward, the boat

use super::{LogicModule, LogicPhase, RESULT_DISENGAGED, RESULT_IN_RANGE};
use crate::context::LogicContext;
use crate::math;
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use crate::strategy::{Flee, Strategy};
use serde::{Deserialize, Serialize};

/// Random heading offset that changes every few seconds
#[derive(Debug, Clone)]
pub struct HeadingWobble {
    /// Largest offset in radians
    pub jitter: f32,
    /// Shortest time between changes
    pub min_interval: f32,
    /// Longest time between changes
    pub max_interval: f32,
    offset: f32,
    timer: f32,
}

impl HeadingWobble {
    /// Create a wobble
    pub fn new(jitter: f32, min_interval: f32, max_interval: f32) -> Self {
        Self {
            jitter,
            min_interval,
            max_interval,
            offset: 0.0,
            timer: 0.0,
        }
    }

    /// Advance the timer and return the current offset
    pub fn update(&mut self, ctx: &mut LogicContext<'_>) -> f32 {
        self.timer -= ctx.dt;
        if self.timer <= 0.0 {
            self.offset = ctx.rng.range(-self.jitter, self.jitter);
            self.timer = ctx.rng.range(self.min_interval, self.max_interval).max(ctx.dt);
        }
        self.offset
    }
}

/// Parameters for [`SwimAway`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimAwayParams {
    /// Swimming speed before the aggression multiplier
    pub speed: f32,
    /// Distance at which the creature loses interest
    pub stop_distance: f32,
    /// Seconds before disengaging is considered
    pub min_time: f32,
    /// Target speed away from the creature that ends the chase
    pub receding_speed: f32,
    /// Largest random heading offset
    pub heading_jitter: f32,
    /// Shortest time between heading changes
    pub min_interval: f32,
    /// Longest time between heading changes
    pub max_interval: f32,
}

impl Default for SwimAwayParams {
    fn default() -> Self {
        Self {
            speed: 6.0,
            stop_distance: 60.0,
            min_time: 1.0,
            receding_speed: 1.0,
            heading_jitter: 0.5,
            min_interval: 1.5,
            max_interval: 3.0,
        }
    }
}

/// Swim ahead of the boat, or away from it, until far enough or outrun
#[derive(Debug, Clone)]
pub struct SwimAway {
    params: SwimAwayParams,
    wobble: HeadingWobble,
    flee: Flee,
    move_speed: f32,
    elapsed: f32,
}

impl SwimAway {
    pub fn new(params: SwimAwayParams) -> Self {
        let wobble = HeadingWobble::new(
            params.heading_jitter,
            params.min_interval,
            params.max_interval,
        );
        Self {
            flee: Flee::new(params.speed),
            params,
            wobble,
            move_speed: 0.0,
            elapsed: 0.0,
        }
    }

    /// Bearing before wobble: along the boat's travel while ahead of it,
    /// fleeing it otherwise
    fn bearing(&mut self, ctx: &mut LogicContext<'_>) -> f32 {
        let away = ctx.origin - ctx.target_position();
        match math::try_normalize(ctx.target_velocity()) {
            Some(travel) if travel.dot(away) >= 0.0 => math::heading(travel),
            _ => math::heading(self.flee.update(ctx).target - ctx.origin),
        }
    }
}

impl LogicModule for SwimAway {
    fn name(&self) -> &str {
        "SwimAway"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        self.move_speed = self.params.speed * ctx.aggression_multiplier();
        self.flee.speed = self.move_speed;
        self.elapsed = 0.0;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.elapsed += ctx.dt;

        let angle = self.bearing(ctx) + self.wobble.update(ctx);
        let steering = Steering::toward(ctx.origin + math::forward(angle) * 10.0, self.move_speed);
        let result = LogicPathResult::new(steering, LocomotionType::Water);

        let lost = ctx.distance_to_target() > self.params.stop_distance
            || ctx.target_receding(self.params.receding_speed);
        if self.elapsed >= self.params.min_time && lost {
            result.finish_with(RESULT_DISENGAGED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        LogicPhase::Fleeing
    }
}

/// Parameters for [`SwimBackInRange`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimBackInRangeParams {
    /// Swimming speed before the aggression multiplier
    pub speed: f32,
    /// Distance counted as in range
    pub range: f32,
    /// Seconds the creature must stay in range
    pub settle_time: f32,
    /// Leaving `range * leave_factor` restarts the approach
    pub leave_factor: f32,
    /// Largest random heading offset
    pub heading_jitter: f32,
    /// Shortest time between heading changes
    pub min_interval: f32,
    /// Longest time between heading changes
    pub max_interval: f32,
}

impl Default for SwimBackInRangeParams {
    fn default() -> Self {
        Self {
            speed: 6.0,
            range: 25.0,
            settle_time: 1.0,
            leave_factor: 1.5,
            heading_jitter: 0.3,
            min_interval: 1.0,
            max_interval: 2.5,
        }
    }
}

/// Swim back toward the boat, then pace it until settled in range
#[derive(Debug, Clone)]
pub struct SwimBackInRange {
    params: SwimBackInRangeParams,
    wobble: HeadingWobble,
    move_speed: f32,
    holding: bool,
    hold_timer: f32,
}

impl SwimBackInRange {
    pub fn new(params: SwimBackInRangeParams) -> Self {
        let wobble = HeadingWobble::new(
            params.heading_jitter,
            params.min_interval,
            params.max_interval,
        );
        Self {
            params,
            wobble,
            move_speed: 0.0,
            holding: false,
            hold_timer: 0.0,
        }
    }
}

impl LogicModule for SwimBackInRange {
    fn name(&self) -> &str {
        "SwimBackInRange"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        self.move_speed = self.params.speed * ctx.aggression_multiplier();
        self.holding = false;
        self.hold_timer = 0.0;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let distance = ctx.distance_to_target();

        if self.holding && distance > self.params.range * self.params.leave_factor {
            log::trace!("SwimBackInRange drifted out to {:.1}", distance);
            self.holding = false;
        } else if !self.holding && distance <= self.params.range {
            self.holding = true;
            self.hold_timer = 0.0;
        }

        let wobble = self.wobble.update(ctx);
        let steering = if self.holding {
            self.hold_timer += ctx.dt;
            let pace = ctx.target_velocity();
            match math::try_normalize(pace) {
                Some(travel) => {
                    let angle = math::heading(travel) + wobble;
                    Steering::toward(ctx.origin + math::forward(angle) * 10.0, pace.length())
                }
                None => Steering::hold(ctx.origin),
            }
        } else {
            let angle = math::heading(ctx.to_target()) + wobble;
            Steering::toward(ctx.origin + math::forward(angle) * 10.0, self.move_speed)
        };

        let result = LogicPathResult::new(steering, LocomotionType::Water);
        if self.holding && self.hold_timer >= self.params.settle_time {
            result.finish_with(RESULT_IN_RANGE)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        if self.holding {
            LogicPhase::Holding
        } else {
            LogicPhase::Returning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use glam::Vec2;
    use void_physics::SimBody;

    #[test]
    fn test_wobble_stays_bounded() {
        let mut fixture = Fixture::new();
        let mut wobble = HeadingWobble::new(0.4, 0.1, 0.2);
        for _ in 0..200 {
            let offset = wobble.update(&mut fixture.ctx());
            assert!(offset.abs() <= 0.4);
        }
    }

    #[test]
    fn test_swim_away_ahead_of_boat() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(0.0, -10.0))
            .with_velocity(Vec2::new(0.0, 3.0));

        let mut logic = SwimAway::new(SwimAwayParams {
            heading_jitter: 0.0,
            ..Default::default()
        });
        logic.activate(&mut fixture.ctx());
        let result = logic.update(&mut fixture.ctx());

        assert!(result.steering.target.y > 9.9);
        assert_eq!(result.locomotion, LocomotionType::Water);
        assert!(!result.has_result());
    }

    #[test]
    fn test_swim_away_flees_when_behind_boat() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(4.0, 10.0))
            .with_velocity(Vec2::new(0.0, 3.0));

        let mut logic = SwimAway::new(SwimAwayParams {
            heading_jitter: 0.0,
            ..Default::default()
        });
        logic.activate(&mut fixture.ctx());
        let result = logic.update(&mut fixture.ctx());

        // Straight away from the boat, not along its travel
        let away = (Vec2::ZERO - Vec2::new(4.0, 10.0)).normalize();
        let heading = result.steering.target.normalize();
        assert!(heading.dot(away) > 0.999);
        assert_eq!(result.steering.speed, 6.0);
    }

    #[test]
    fn test_swim_away_disengages_after_min_time() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic().with_position(Vec2::new(0.0, 100.0));

        let mut logic = SwimAway::new(SwimAwayParams::default());
        logic.activate(&mut fixture.ctx());
        assert!(!logic.update(&mut fixture.ctx()).has_result());

        fixture.dt = 1.0;
        let result = logic.update(&mut fixture.ctx());
        assert_eq!(result.result.as_deref(), Some(RESULT_DISENGAGED));
        assert!(result.finish);
    }

    #[test]
    fn test_swim_back_settles_in_range() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.5;
        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(0.0, 40.0))
            .with_velocity(Vec2::new(0.0, 2.0));

        let mut logic = SwimBackInRange::new(SwimBackInRangeParams::default());
        logic.activate(&mut fixture.ctx());

        let returning = logic.update(&mut fixture.ctx());
        assert_eq!(logic.phase(), LogicPhase::Returning);
        assert!(returning.steering.target.y > 0.0);

        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(0.0, 20.0))
            .with_velocity(Vec2::new(0.0, 2.0));
        let holding = logic.update(&mut fixture.ctx());
        assert_eq!(logic.phase(), LogicPhase::Holding);
        assert_eq!(holding.steering.speed, 2.0);
        assert!(!holding.has_result());

        let settled = logic.update(&mut fixture.ctx());
        assert_eq!(settled.result.as_deref(), Some(RESULT_IN_RANGE));
    }
}
