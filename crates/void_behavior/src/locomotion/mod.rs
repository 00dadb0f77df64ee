//! Locomotion controller
//!
//! Turns a logic's [`Steering`](crate::steering::Steering) into body motion in
//! three phases that line up with a game loop:
//!
//! 1. [`LocomotionController::compute_locomotion`] (logic tick) reads the body
//!    and buffers a [`LocomotionCommand`] plus a visual target
//! 2. [`LocomotionController::update_physics`] (fixed step) switches body
//!    mode if needed and writes the command to the body
//! 3. [`LocomotionController::update_visuals`] (render) eases the bank angle
//!    and returns the [`CreaturePose`]
//!
//! Each locomotion type has its own module with the pure helpers it uses.

mod flight;
mod land;
mod water;

pub use flight::{bank_step, bank_target, banked_normal};
pub use land::{jump_height_at, JumpState};
pub use water::{target_angular_speed, water_target_speed};

use crate::config::{BehaviorConfig, FlightConfig, LandConfig, WaterConfig};
use crate::context::LogicContext;
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use void_physics::{BodyType, CollisionGroups, CollisionLayer, PhysicsBody};

/// Body motion buffered for the physics phase
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocomotionCommand {
    /// Stop dead
    #[default]
    Idle,
    /// Velocities for a dynamic swimming body
    Water {
        /// Linear velocity
        linear: Vec2,
        /// Angular velocity
        angular: f32,
    },
    /// Pose for a kinematic walking or flying body
    Kinematic {
        /// New position
        position: Vec2,
        /// New angle
        angle: f32,
        /// Displacement rate, reported as the body's velocity
        velocity: Vec2,
    },
}

/// Rendered height and orientation of a creature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreaturePose {
    /// World height
    pub height: f32,
    /// Up normal
    pub normal: Vec3,
    /// Bank (roll) angle
    pub bank: f32,
}

/// Visual target produced by the logic-tick phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VisualTarget {
    pub height: f32,
    pub normal: Vec3,
    pub heading: f32,
    pub bank: f32,
}

impl VisualTarget {
    pub(crate) fn level(height: f32, normal: Vec3, heading: f32) -> Self {
        Self {
            height,
            normal,
            heading,
            bank: 0.0,
        }
    }
}

/// Persistent controller state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocomotionState {
    /// Mode the body is currently configured for
    pub mode: LocomotionType,
    /// Current bank angle
    pub bank_angle: f32,
    /// Jump in progress (land only)
    pub jump: Option<JumpState>,
    /// Current airspeed (flight only)
    pub flight_speed: f32,
}

/// Body type and collision filter a locomotion mode requires
pub fn body_settings(mode: LocomotionType) -> Option<(BodyType, CollisionGroups)> {
    match mode {
        LocomotionType::None => None,
        LocomotionType::Water => Some((BodyType::Dynamic, CollisionGroups::ALL)),
        LocomotionType::Land => Some((
            BodyType::Kinematic,
            CollisionGroups::all_except(CollisionLayer::TERRAIN),
        )),
        LocomotionType::Flight => Some((BodyType::Kinematic, CollisionGroups::NONE)),
    }
}

/// Per-creature locomotion controller
#[derive(Debug, Clone)]
pub struct LocomotionController {
    water: WaterConfig,
    land: LandConfig,
    flight: FlightConfig,
    state: LocomotionState,
    requested: LocomotionType,
    command: LocomotionCommand,
    visual: VisualTarget,
}

impl LocomotionController {
    /// Create a controller from behavior configuration
    pub fn new(config: &BehaviorConfig) -> Self {
        Self {
            water: config.water.clone(),
            land: config.land.clone(),
            flight: config.flight.clone(),
            state: LocomotionState::default(),
            requested: LocomotionType::None,
            command: LocomotionCommand::Idle,
            visual: VisualTarget::level(0.0, Vec3::Y, 0.0),
        }
    }

    /// Controller state
    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    /// Mode the body is configured for
    pub fn mode(&self) -> LocomotionType {
        self.state.mode
    }

    /// Command buffered for the next physics phase
    pub fn command(&self) -> LocomotionCommand {
        self.command
    }

    /// Logic-tick phase: compute the command for this tick's result
    pub fn compute_locomotion(&mut self, ctx: &LogicContext<'_>, result: Option<&LogicPathResult>) {
        let locomotion = result.map_or(LocomotionType::None, |r| r.locomotion);

        if locomotion != LocomotionType::Land && self.state.jump.take().is_some() {
            log::debug!("Jump cancelled by switch to {:?}", locomotion);
        }
        if locomotion == LocomotionType::Flight && self.state.mode != LocomotionType::Flight {
            self.state.flight_speed = ctx.velocity().length();
        }
        self.requested = locomotion;

        let (command, visual) = match (locomotion, result) {
            (LocomotionType::Water, Some(r)) => water::compute(ctx, &r.steering, &self.water),
            (LocomotionType::Land, Some(r)) => land::compute(&mut self.state, ctx, r, &self.land),
            (LocomotionType::Flight, Some(r)) => {
                flight::compute(&mut self.state, ctx, &r.steering, &self.flight)
            }
            _ => (
                LocomotionCommand::Idle,
                VisualTarget::level(ctx.height, self.visual.normal, ctx.angle()),
            ),
        };
        self.command = command;
        self.visual = visual;
    }

    /// Physics phase: configure the body for the requested mode and apply
    /// the buffered command
    pub fn update_physics(&mut self, body: &mut dyn PhysicsBody) {
        if self.requested != self.state.mode {
            log::debug!("Locomotion {:?} -> {:?}", self.state.mode, self.requested);
            if let Some((body_type, groups)) = body_settings(self.requested) {
                body.set_body_type(body_type);
                body.set_collision_groups(groups);
            }
            body.set_linear_velocity(Vec2::ZERO);
            body.set_angular_velocity(0.0);
            self.state.mode = self.requested;
        }

        match self.command {
            LocomotionCommand::Idle => {
                body.set_linear_velocity(Vec2::ZERO);
                body.set_angular_velocity(0.0);
            }
            LocomotionCommand::Water { linear, angular } => {
                body.set_linear_velocity(linear);
                body.set_angular_velocity(angular);
            }
            LocomotionCommand::Kinematic {
                position,
                angle,
                velocity,
            } => {
                body.set_position(position);
                body.set_angle(angle);
                body.set_linear_velocity(velocity);
                body.set_angular_velocity(0.0);
            }
        }
    }

    /// Visual phase: ease the bank angle and report the pose
    pub fn update_visuals(&mut self, dt: f32) -> CreaturePose {
        let max_bank = self.flight.max_bank;
        self.state.bank_angle = bank_step(
            self.state.bank_angle,
            self.visual.bank,
            self.flight.bank_rate * dt,
            max_bank,
        );

        let normal = if self.state.mode == LocomotionType::Flight {
            banked_normal(self.visual.heading, self.state.bank_angle)
        } else {
            self.visual.normal
        };

        CreaturePose {
            height: self.visual.height,
            normal,
            bank: self.state.bank_angle,
        }
    }
}

/// Heading toward the steering target; `None` when already on it
pub(crate) fn desired_heading(ctx: &LogicContext<'_>, steering: &Steering) -> Option<f32> {
    crate::math::try_normalize(steering.target - ctx.origin).map(crate::math::heading)
}
