//! Flying: kinematic motion with airspeed, climb rate and banking

use super::{desired_heading, LocomotionCommand, LocomotionState, VisualTarget};
use crate::config::FlightConfig;
use crate::context::LogicContext;
use crate::math;
use crate::steering::Steering;
use glam::{Vec2, Vec3};

/// Inside this distance the flyer moves straight at its target instead of
/// along its heading
const CAPTURE_RADIUS: f32 = 1.0;

/// Bank angle wanted for a heading error (positive rolls left)
pub fn bank_target(heading_error: f32, gain: f32, max_bank: f32) -> f32 {
    (heading_error * gain).clamp(-max_bank, max_bank)
}

/// Move `current` toward `target` by at most `max_delta`, within `±max_bank`
pub fn bank_step(current: f32, target: f32, max_delta: f32, max_bank: f32) -> f32 {
    math::approach(current, target, max_delta).clamp(-max_bank, max_bank)
}

/// Up normal of a body facing `heading` and rolled by `bank`
pub fn banked_normal(heading: f32, bank: f32) -> Vec3 {
    let (sin, cos) = heading.sin_cos();
    // Plane (x, y) maps to world (x, z)
    let left = Vec3::new(-sin, 0.0, cos);
    Vec3::Y * bank.cos() + left * bank.sin()
}

pub(super) fn compute(
    state: &mut LocomotionState,
    ctx: &LogicContext<'_>,
    steering: &Steering,
    config: &FlightConfig,
) -> (LocomotionCommand, VisualTarget) {
    let angle = ctx.angle();
    let to_target = steering.target - ctx.origin;
    let distance = to_target.length();

    let error = desired_heading(ctx, steering)
        .map_or(0.0, |heading| math::angle_difference(angle, heading));
    let turning = steering.turning_speed.unwrap_or(config.turning_speed);
    let new_angle = math::rotate_toward(angle, angle + error, turning * ctx.dt);

    state.flight_speed = math::approach(
        state.flight_speed,
        steering.speed.max(0.0),
        config.acceleration * ctx.dt,
    );
    let step = (state.flight_speed * ctx.dt).min(distance);
    let direction = if distance <= CAPTURE_RADIUS {
        math::try_normalize(to_target).unwrap_or(Vec2::ZERO)
    } else {
        math::forward(new_angle)
    };
    let position = ctx.origin + direction * step;

    let env = ctx.environment;
    let floor = env.ground_height(position);
    let wanted = steering.height.unwrap_or(ctx.height);
    let height = math::approach(ctx.height, wanted, config.vertical_rate * ctx.dt).max(floor);

    let bank = if steering.banking_enabled() {
        bank_target(error, config.bank_gain, config.max_bank)
    } else {
        0.0
    };

    let velocity = if ctx.dt > 0.0 {
        (position - ctx.origin) / ctx.dt
    } else {
        Vec2::ZERO
    };

    (
        LocomotionCommand::Kinematic {
            position,
            angle: new_angle,
            velocity,
        },
        VisualTarget {
            height,
            normal: Vec3::Y,
            heading: new_angle,
            bank,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use approx::assert_relative_eq;
    use void_physics::SimBody;

    #[test]
    fn test_bank_bounded_and_settles() {
        let max_bank = 0.6;
        let mut bank = 0.0;

        for _ in 0..100 {
            let target = bank_target(3.0, 1.2, max_bank);
            bank = bank_step(bank, target, 0.05, max_bank);
            assert!(bank.abs() <= max_bank);
        }
        assert_relative_eq!(bank, max_bank);

        for _ in 0..100 {
            bank = bank_step(bank, bank_target(0.0, 1.2, max_bank), 0.05, max_bank);
            assert!(bank.abs() <= max_bank);
        }
        assert_eq!(bank, 0.0);
    }

    #[test]
    fn test_banked_normal() {
        assert_eq!(banked_normal(0.0, 0.0), Vec3::Y);

        // Facing +x, rolling left tips the normal toward +z
        let rolled = banked_normal(0.0, 0.5);
        assert!(rolled.z > 0.0);
        assert_relative_eq!(rolled.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_climbs_at_vertical_rate() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.5;
        fixture.height = 1.0;
        let mut state = LocomotionState::default();
        let config = FlightConfig::default();

        let steering = Steering::toward(Vec2::new(50.0, 0.0), 10.0).with_height(10.0);
        let (_, visual) = compute(&mut state, &fixture.ctx(), &steering, &config);

        assert_relative_eq!(visual.height, 3.0);
        // Airspeed ramps up at the configured acceleration
        assert_relative_eq!(state.flight_speed, 6.0);
    }

    #[test]
    fn test_never_below_surface() {
        let mut fixture = Fixture::new();
        fixture.body = SimBody::kinematic().with_position(Vec2::new(-40.0, 0.0));
        fixture.height = 1.2;
        fixture.dt = 1.0;
        let mut state = LocomotionState::default();

        let steering = Steering::toward(Vec2::new(-40.0, 5.0), 2.0).with_height(-10.0);
        let (_, visual) = compute(&mut state, &fixture.ctx(), &steering, &FlightConfig::default());

        assert_eq!(visual.height, 1.0);
    }

    #[test]
    fn test_turn_rate_limited_and_banks() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.1;
        let mut state = LocomotionState::default();
        let config = FlightConfig::default();

        let steering = Steering::toward(Vec2::new(0.0, 50.0), 10.0);
        let (command, visual) = compute(&mut state, &fixture.ctx(), &steering, &config);

        match command {
            LocomotionCommand::Kinematic { angle, .. } => {
                assert_relative_eq!(angle, config.turning_speed * 0.1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_relative_eq!(visual.bank, config.max_bank);
    }
}
