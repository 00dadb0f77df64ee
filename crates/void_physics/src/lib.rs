//! Void Physics - Planar Body Interface
//!
//! This crate describes the narrow slice of a rigid-body engine that creature
//! behaviors are allowed to touch. The simulation itself (integration, contact
//! resolution, body creation) lives elsewhere; behaviors only read and write
//! bodies through [`PhysicsBody`].
//!
//! # Features
//!
//! - Dynamic and kinematic body types
//! - Collision layers and filter masks
//! - Local/world point and vector transforms
//! - An in-memory [`SimBody`] for headless tests and demos
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 PhysicsBody                      │
//! │  position · angle · velocity · body type · mask  │
//! └─────────────────────────────────────────────────┘
//!                        ▲
//!         ┌──────────────┼──────────────┐
//!         │              │              │
//!    ┌─────────┐   ┌──────────┐   ┌──────────┐
//!    │ SimBody │   │ engine   │   │ network  │
//!    │ (tests) │   │ adapter  │   │ mirror   │
//!    └─────────┘   └──────────┘   └──────────┘
//! ```
//!
//! The plane is `(x, y)` where `y` maps to the world's longitudinal `z` axis.
//! A body with angle `a` faces `(cos a, sin a)`.
//!
//! # Example
//!
//! ```ignore
//! use void_physics::prelude::*;
//!
//! let mut body = SimBody::dynamic().with_position(Vec2::new(0.0, 10.0));
//! body.set_linear_velocity(Vec2::new(1.0, 0.0));
//! body.step(1.0 / 60.0);
//! ```

pub mod body;
pub mod layers;
pub mod sim;

pub use glam::{Vec2, Vec3};

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyType, PhysicsBody};
    pub use crate::layers::{CollisionGroups, CollisionLayer};
    pub use crate::sim::SimBody;
    pub use glam::{Vec2, Vec3};
}

pub use prelude::*;
