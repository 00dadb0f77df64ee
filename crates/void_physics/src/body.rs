//! Rigid body types and the body interface

use crate::layers::CollisionGroups;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Dynamic body - fully simulated, moved by velocity and forces
    #[default]
    Dynamic,
    /// Kinematic body - pose written directly by the owner
    Kinematic,
}

impl BodyType {
    /// Check if the body is integrated by the simulation
    pub fn is_dynamic(&self) -> bool {
        matches!(self, BodyType::Dynamic)
    }

    /// Check if the body pose is set directly
    pub fn is_kinematic(&self) -> bool {
        matches!(self, BodyType::Kinematic)
    }
}

/// A planar rigid body owned by an external physics engine.
///
/// Readers (logic modules, strategies) only need the getters. The locomotion
/// controller that owns a creature's body for the tick uses the setters.
pub trait PhysicsBody {
    /// World position on the plane
    fn position(&self) -> Vec2;
    /// Set world position
    fn set_position(&mut self, position: Vec2);

    /// Rotation in radians
    fn angle(&self) -> f32;
    /// Set rotation in radians
    fn set_angle(&mut self, angle: f32);

    /// Linear velocity in world space
    fn linear_velocity(&self) -> Vec2;
    /// Set linear velocity
    fn set_linear_velocity(&mut self, velocity: Vec2);

    /// Angular velocity in radians per second
    fn angular_velocity(&self) -> f32;
    /// Set angular velocity
    fn set_angular_velocity(&mut self, velocity: f32);

    /// Current body type
    fn body_type(&self) -> BodyType;
    /// Switch between dynamic and kinematic simulation
    fn set_body_type(&mut self, body_type: BodyType);

    /// Current collision groups
    fn collision_groups(&self) -> CollisionGroups;
    /// Replace the collision filter
    fn set_collision_groups(&mut self, groups: CollisionGroups);

    /// Apply a force at a world point
    fn apply_force(&mut self, force: Vec2, point: Vec2);

    /// Transform a local point to world space
    fn world_point(&self, local: Vec2) -> Vec2 {
        self.position() + self.world_vector(local)
    }

    /// Rotate a local vector into world space
    fn world_vector(&self, local: Vec2) -> Vec2 {
        let (sin, cos) = self.angle().sin_cos();
        Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    }

    /// Transform a world point into local space
    fn local_point(&self, world: Vec2) -> Vec2 {
        let delta = world - self.position();
        let (sin, cos) = self.angle().sin_cos();
        Vec2::new(delta.x * cos + delta.y * sin, -delta.x * sin + delta.y * cos)
    }

    /// Unit vector the body is facing
    fn forward(&self) -> Vec2 {
        self.world_vector(Vec2::X)
    }
}
