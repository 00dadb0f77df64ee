//! Steering intent shared by logic modules and locomotion

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Movement model used to translate a [`Steering`] into body motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionType {
    /// No movement, velocity is zeroed every tick
    #[default]
    None,
    /// Dynamic body swimming on the water surface
    Water,
    /// Kinematic body following the terrain
    Land,
    /// Kinematic body in the air
    Flight,
}

/// Locomotion-agnostic movement intent for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Steering {
    /// Point on the plane to head for
    pub target: Vec2,
    /// Altitude to reach (flight only)
    pub height: Option<f32>,
    /// Desired speed in units per second
    pub speed: f32,
    /// Turning speed override in radians per second
    pub turning_speed: Option<f32>,
    /// Easing rate override in 1/s
    pub smoothing: Option<f32>,
    /// Set to `Some(false)` to keep the body level while turning
    pub banking: Option<bool>,
}

impl Steering {
    /// Head for a point at a given speed
    pub fn toward(target: Vec2, speed: f32) -> Self {
        Self {
            target,
            speed,
            ..Default::default()
        }
    }

    /// Stay at a point (turn in place toward it if needed)
    pub fn hold(position: Vec2) -> Self {
        Self::toward(position, 0.0)
    }

    /// Set the target altitude
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the turning speed
    pub fn with_turning_speed(mut self, turning_speed: f32) -> Self {
        self.turning_speed = Some(turning_speed);
        self
    }

    /// Set the easing rate
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = Some(smoothing);
        self
    }

    /// Enable or disable banking
    pub fn with_banking(mut self, banking: bool) -> Self {
        self.banking = Some(banking);
        self
    }

    /// Whether banking is allowed (on unless disabled)
    pub fn banking_enabled(&self) -> bool {
        self.banking.unwrap_or(true)
    }

    /// Distance from a point to the steering target
    pub fn distance_from(&self, position: Vec2) -> f32 {
        self.target.distance(position)
    }
}

/// Parabolic jump requested by a land logic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpRequest {
    /// Apex height above the take-off height
    pub height: f32,
    /// Horizontal arc length
    pub distance: f32,
}

/// Height and surface normal imposed by a logic instead of a terrain sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplicitPose {
    /// World height
    pub height: f32,
    /// Up normal
    pub normal: Vec3,
}

/// Output of one logic module update
#[derive(Debug, Clone, PartialEq)]
pub struct LogicPathResult {
    /// Movement intent for this tick
    pub steering: Steering,
    /// How to interpret the steering
    pub locomotion: LocomotionType,
    /// Set when the logic wants to hand off
    pub result: Option<String>,
    /// `true`: apply this tick's steering, switch next tick.
    /// `false`: switch now and ignore this steering.
    pub finish: bool,
    /// Start a parabolic jump (land only)
    pub jump: Option<JumpRequest>,
    /// Override the terrain-derived height/normal (land only)
    pub explicit_pose: Option<ExplicitPose>,
}

impl LogicPathResult {
    /// Keep running with the given steering
    pub fn new(steering: Steering, locomotion: LocomotionType) -> Self {
        Self {
            steering,
            locomotion,
            result: None,
            finish: false,
            jump: None,
            explicit_pose: None,
        }
    }

    /// Apply this tick's steering, then hand off next tick
    pub fn finish_with(mut self, result: &str) -> Self {
        self.result = Some(result.to_string());
        self.finish = true;
        self
    }

    /// Hand off immediately; the steering is discarded
    pub fn end_with(mut self, result: &str) -> Self {
        self.result = Some(result.to_string());
        self.finish = false;
        self
    }

    /// Request a jump
    pub fn with_jump(mut self, jump: JumpRequest) -> Self {
        self.jump = Some(jump);
        self
    }

    /// Impose a height and normal
    pub fn with_explicit_pose(mut self, height: f32, normal: Vec3) -> Self {
        self.explicit_pose = Some(ExplicitPose { height, normal });
        self
    }

    /// Check whether the logic asked to hand off
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Whether the hand-off must happen within this tick
    pub fn is_immediate(&self) -> bool {
        self.result.is_some() && !self.finish
    }

    /// Whether the hand-off waits for the next tick
    pub fn is_deferred(&self) -> bool {
        self.result.is_some() && self.finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steering_builders() {
        let steering = Steering::toward(Vec2::new(3.0, 4.0), 5.0)
            .with_height(10.0)
            .with_turning_speed(2.0)
            .with_banking(false);

        assert_eq!(steering.distance_from(Vec2::ZERO), 5.0);
        assert_eq!(steering.height, Some(10.0));
        assert_eq!(steering.turning_speed, Some(2.0));
        assert!(!steering.banking_enabled());
        assert!(Steering::default().banking_enabled());
    }

    #[test]
    fn test_result_handoff_modes() {
        let running = LogicPathResult::new(Steering::default(), LocomotionType::Water);
        assert!(!running.has_result());
        assert!(!running.is_immediate());

        let deferred = running.clone().finish_with("FINISHED");
        assert!(deferred.is_deferred());
        assert!(!deferred.is_immediate());

        let immediate = running.end_with("TIMEOUT");
        assert!(immediate.is_immediate());
        assert_eq!(immediate.result.as_deref(), Some("TIMEOUT"));
    }
}
