//! Void Behavior - Scripted Creature Behaviors
//!
//! Creatures along a river (crocodiles, birds, wolves) react to a single
//! moving target, the boat. Each creature runs a script: a tree of
//! generators that yields one logic module at a time. The active module
//! produces steering every tick, and the locomotion controller turns that
//! steering into body motion for swimming, walking or flying.
//!
//! # Features
//!
//! - Script combinators (sequence, until, random, loop, custom generators)
//! - Immediate and deferred logic hand-offs with a per-tick chain limit
//! - Name-keyed logic registry with JSON-authorable params
//! - Steering strategies (flank, intercept, charge, flee, buzz, land, wander)
//! - Water, land and flight locomotion with jumps and banking
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   LogicConfig   ┌──────────────┐  LogicPathResult  ┌────────────┐
//! │  Script  │ ──────────────▶ │ LogicModule  │ ────────────────▶ │ Locomotion │
//! │  player  │ ◀────────────── │ (+ Strategy) │                   │ controller │
//! └──────────┘   result/finish └──────────────┘                   └────────────┘
//!                                                                     │
//!                                                       PhysicsBody ◀─┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_behavior::prelude::*;
//!
//! let registry = Arc::new(LogicRegistry::with_builtins());
//! let script = script::sequence(vec![
//!     script::logic(LogicParams::WaitForBoat(WaitForBoatParams::default())),
//!     script::logic(LogicParams::EnteringWater(EnteringWaterParams::default())),
//! ]);
//! let mut croc = Behavior::new(registry, script, BehaviorConfig::default());
//!
//! croc.update(dt, Some(&mut body), Some(&boat), &river, &mut entity);
//! ```

pub mod behavior;
pub mod config;
pub mod context;
pub mod environment;
pub mod error;
pub mod events;
pub mod locomotion;
pub mod logic;
pub mod math;
pub mod player;
pub mod registry;
pub mod rng;
pub mod script;
pub mod steering;
pub mod strategy;

pub mod prelude {
    //! Common imports for creature behaviors
    pub use crate::behavior::Behavior;
    pub use crate::config::{BehaviorConfig, FlightConfig, LandConfig, WaterConfig};
    pub use crate::context::LogicContext;
    pub use crate::environment::{
        BankPositions, BankSide, Environment, StraightRiver, TerrainSample, Zone,
    };
    pub use crate::error::{BehaviorError, Result};
    pub use crate::events::{BehaviorEvent, CreatureEntity, RecordingEntity};
    pub use crate::locomotion::{CreaturePose, LocomotionCommand, LocomotionController};
    pub use crate::logic::*;
    pub use crate::player::ScriptPlayer;
    pub use crate::registry::LogicRegistry;
    pub use crate::rng::DeterministicRng;
    pub use crate::script::{self, ScriptFn, ScriptNode};
    pub use crate::steering::{LocomotionType, LogicPathResult, Steering};
    pub use crate::strategy::Strategy;
    pub use std::sync::Arc;
}

pub use prelude::*;
