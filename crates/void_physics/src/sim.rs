//! In-memory body for headless simulation
//!
//! `SimBody` integrates dynamic bodies with semi-implicit Euler and leaves
//! kinematic bodies exactly where their owner put them. It has no collision
//! response; it exists so behaviors can be driven without a physics engine.

use crate::body::{BodyType, PhysicsBody};
use crate::layers::CollisionGroups;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A standalone planar rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimBody {
    /// World position
    pub position: Vec2,
    /// Rotation in radians
    pub angle: f32,
    /// Linear velocity
    pub linear_velocity: Vec2,
    /// Angular velocity
    pub angular_velocity: f32,
    /// Simulation mode
    pub body_type: BodyType,
    /// Collision filter
    pub groups: CollisionGroups,
    /// Mass used to convert forces into acceleration
    pub mass: f32,
    /// Rotational inertia
    pub inertia: f32,
    /// Linear damping (water drag)
    pub linear_damping: f32,
    /// Angular damping
    pub angular_damping: f32,
    #[serde(skip)]
    force: Vec2,
    #[serde(skip)]
    torque: f32,
}

impl Default for SimBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            body_type: BodyType::Dynamic,
            groups: CollisionGroups::ALL,
            mass: 1.0,
            inertia: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
        }
    }
}

impl SimBody {
    /// Create a dynamic body at the origin
    pub fn dynamic() -> Self {
        Self::default()
    }

    /// Create a kinematic body at the origin
    pub fn kinematic() -> Self {
        Self {
            body_type: BodyType::Kinematic,
            ..Default::default()
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set rotation
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Set linear velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set linear and angular damping
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Force accumulated since the last step
    pub fn pending_force(&self) -> Vec2 {
        self.force
    }

    /// Advance the body by one fixed step
    pub fn step(&mut self, dt: f32) {
        if self.body_type.is_dynamic() && dt > 0.0 {
            let inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
            let inv_inertia = if self.inertia > 0.0 { 1.0 / self.inertia } else { 0.0 };

            self.linear_velocity += self.force * inv_mass * dt;
            self.angular_velocity += self.torque * inv_inertia * dt;

            self.linear_velocity *= 1.0 / (1.0 + self.linear_damping * dt);
            self.angular_velocity *= 1.0 / (1.0 + self.angular_damping * dt);

            self.position += self.linear_velocity * dt;
            self.angle += self.angular_velocity * dt;
        }

        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }
}

impl PhysicsBody for SimBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn angle(&self) -> f32 {
        self.angle
    }

    fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.linear_velocity = velocity;
    }

    fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    fn set_angular_velocity(&mut self, velocity: f32) {
        self.angular_velocity = velocity;
    }

    fn body_type(&self) -> BodyType {
        self.body_type
    }

    fn set_body_type(&mut self, body_type: BodyType) {
        if self.body_type != body_type {
            log::trace!("SimBody switching {:?} -> {:?}", self.body_type, body_type);
        }
        self.body_type = body_type;
    }

    fn collision_groups(&self) -> CollisionGroups {
        self.groups
    }

    fn set_collision_groups(&mut self, groups: CollisionGroups) {
        self.groups = groups;
    }

    fn apply_force(&mut self, force: Vec2, point: Vec2) {
        let arm = point - self.position;
        self.force += force;
        self.torque += arm.x * force.y - arm.y * force.x;
    }
}
