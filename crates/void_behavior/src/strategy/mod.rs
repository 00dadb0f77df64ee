//! Strategy library
//!
//! Strategies are small steering calculators. They read a [`LogicContext`],
//! keep whatever private state they need between ticks (orbit angle, wander
//! point), and return a [`Steering`]. They know nothing about scripts or
//! locomotion modes; logic modules pick which one runs and when.

mod air;
mod water;

pub use air::{BuzzTarget, LandOnPoint, Wander};
pub use water::{CircleFlank, Flee, SternIntercept, VulnerableCharge};

use crate::context::LogicContext;
use crate::steering::Steering;

/// A steering calculator
pub trait Strategy {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Compute this tick's steering
    fn update(&mut self, ctx: &mut LogicContext<'_>) -> Steering;

    /// Whether the strategy no longer makes sense and should be replaced
    fn should_abort(&self, _ctx: &LogicContext<'_>) -> bool {
        false
    }
}
