//! Swimming: velocity control of a dynamic body

use super::{desired_heading, LocomotionCommand, VisualTarget};
use crate::config::WaterConfig;
use crate::context::LogicContext;
use crate::math::{self, MIN_DISTANCE};
use crate::steering::Steering;
use glam::{Vec2, Vec3};

/// Forward speed toward a target: scaled by how well the body faces it
/// (never negative) and slowed inside `slow_radius`
pub fn water_target_speed(forward: Vec2, to_target: Vec2, desired: f32, slow_radius: f32) -> f32 {
    let distance = to_target.length();
    if distance < MIN_DISTANCE {
        return 0.0;
    }

    let alignment = forward.dot(to_target / distance).max(0.0);
    let proximity = if distance < slow_radius {
        distance / slow_radius
    } else {
        1.0
    };
    desired * alignment * proximity
}

/// Angular speed for a heading error, proportional and clamped
pub fn target_angular_speed(error: f32, max_turn: f32, taper: f32) -> f32 {
    (error * taper).clamp(-max_turn, max_turn)
}

pub(super) fn compute(
    ctx: &LogicContext<'_>,
    steering: &Steering,
    config: &WaterConfig,
) -> (LocomotionCommand, VisualTarget) {
    let angle = ctx.angle();
    let forward = math::forward(angle);
    let to_target = steering.target - ctx.origin;

    let error = desired_heading(ctx, steering)
        .map_or(0.0, |heading| math::angle_difference(angle, heading));
    let max_turn = steering.turning_speed.unwrap_or(config.turning_speed);
    let angular = math::ease(
        ctx.body.angular_velocity(),
        target_angular_speed(error, max_turn, config.turn_taper),
        config.angular_smoothing,
        ctx.dt,
    );

    let speed = water_target_speed(forward, to_target, steering.speed, config.slow_radius);
    let linear = math::ease_vec(
        ctx.velocity(),
        forward * speed,
        steering.smoothing.unwrap_or(config.linear_smoothing),
        ctx.dt,
    );

    let visual = VisualTarget::level(ctx.environment.water_level(), Vec3::Y, angle);
    (LocomotionCommand::Water { linear, angular }, visual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use approx::assert_relative_eq;
    use void_physics::{PhysicsBody, SimBody};

    #[test]
    fn test_speed_ahead_and_behind() {
        let forward = Vec2::X;
        assert_relative_eq!(water_target_speed(forward, Vec2::new(10.0, 0.0), 5.0, 2.0), 5.0);
        assert_eq!(water_target_speed(forward, Vec2::new(-10.0, 0.0), 5.0, 2.0), 0.0);
        assert_relative_eq!(
            water_target_speed(forward, Vec2::new(10.0, 10.0), 4.0, 2.0),
            4.0 * std::f32::consts::FRAC_1_SQRT_2,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_speed_slows_near_target() {
        assert_relative_eq!(water_target_speed(Vec2::X, Vec2::new(1.0, 0.0), 6.0, 2.0), 3.0);
        assert_eq!(water_target_speed(Vec2::X, Vec2::ZERO, 6.0, 2.0), 0.0);
    }

    #[test]
    fn test_angular_clamped() {
        assert_eq!(target_angular_speed(2.0, 2.5, 3.0), 2.5);
        assert_eq!(target_angular_speed(-2.0, 2.5, 3.0), -2.5);
        assert_relative_eq!(target_angular_speed(0.1, 2.5, 3.0), 0.3);
    }

    #[test]
    fn test_converges_to_desired_speed() {
        let mut fixture = Fixture::new();
        let config = WaterConfig::default();
        let steering = Steering::toward(Vec2::new(1000.0, 0.0), 5.0);

        for _ in 0..600 {
            let (command, _) = compute(&fixture.ctx(), &steering, &config);
            if let LocomotionCommand::Water { linear, angular } = command {
                fixture.body.set_linear_velocity(linear);
                fixture.body.set_angular_velocity(angular);
            }
            fixture.body.step(fixture.dt);
        }

        assert_relative_eq!(fixture.body.linear_velocity().length(), 5.0, epsilon = 0.05);
    }

    #[test]
    fn test_turns_toward_target_behind() {
        let mut fixture = Fixture::new();
        fixture.body = SimBody::dynamic();
        let config = WaterConfig::default();
        let steering = Steering::toward(Vec2::new(0.0, 10.0), 5.0);

        let (command, visual) = compute(&fixture.ctx(), &steering, &config);
        match command {
            LocomotionCommand::Water { linear, angular } => {
                assert!(angular > 0.0);
                assert_eq!(linear, Vec2::ZERO);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(visual.height, 0.0);
    }
}
