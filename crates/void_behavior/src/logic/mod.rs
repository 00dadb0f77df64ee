//! Logic modules
//!
//! A logic module is one small state machine covering a single phase of a
//! creature's life: waiting on the bank, walking into the river, swimming
//! after the boat, circling it from the air. Every module implements
//! [`LogicModule`]; the script player activates one at a time and feeds it a
//! fresh [`LogicContext`] each tick.
//!
//! Modules report a `result` string when they want to hand off. Scripts match
//! on these strings (see [`crate::script::ScriptFn::Until`]).

mod attack;
mod basic;
mod entering_water;
mod flight;
mod shore_walk;
mod swim;

pub use attack::{AmbushAttack, AmbushAttackParams, WolfAttack, WolfAttackParams};
pub use basic::{Delay, DelayParams, Idle, WaitForBoat, WaitForBoatParams};
pub use entering_water::{EnteringWater, EnteringWaterParams};
pub use flight::{
    BuzzBoat, BuzzBoatParams, FlyDirectToShore, FlyDirectToShoreParams, FlyOpposite,
    FlyOppositeParams, ShoreLanding, ShoreLandingParams, SlotLanding, SlotLandingParams,
    WaterLanding, WaterLandingParams, Wandering, WanderingParams,
};
pub use shore_walk::{ShoreWalk, ShoreWalkParams, ShoreWalkState};
pub use swim::{HeadingWobble, SwimAway, SwimAwayParams, SwimBackInRange, SwimBackInRangeParams};

use crate::context::LogicContext;
use crate::steering::LogicPathResult;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The creature noticed its target
pub const RESULT_NOTICED: &str = "NOTICED";
/// The logic ran to completion
pub const RESULT_FINISHED: &str = "FINISHED";
/// The script-level timeout expired
pub const RESULT_TIMEOUT: &str = "TIMEOUT";
/// The creature lost interest in its target
pub const RESULT_DISENGAGED: &str = "DISENGAGED";
/// The creature is back within range of its target
pub const RESULT_IN_RANGE: &str = "IN_RANGE";
/// A flight ended on the ground or water
pub const RESULT_LANDED: &str = "LANDED";
/// An attack reached its target
pub const RESULT_ATTACKED: &str = "ATTACKED";
/// The logic gave up
pub const RESULT_ABORTED: &str = "ABORTED";

/// Named sub-state of a logic module, used to pick animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicPhase {
    Idle,
    Waiting,
    Walking,
    Rotating,
    Entering,
    Jumping,
    Swimming,
    Fleeing,
    Returning,
    Holding,
    Flying,
    Buzzing,
    Landing,
    Flanking,
    Intercepting,
    Charging,
    Lurking,
}

/// A single creature behavior phase
pub trait LogicModule {
    /// Name reported in events and logs
    fn name(&self) -> &str;

    /// Called once, on the tick the module becomes active
    fn activate(&mut self, ctx: &mut LogicContext<'_>);

    /// Advance the state machine by one tick
    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult;

    /// Current phase
    fn phase(&self) -> LogicPhase;

    /// Expected duration in seconds, if known (animation sync hint)
    fn duration(&self) -> Option<f32> {
        None
    }
}

/// Typed parameters for every built-in logic, plus an open variant for
/// application-registered modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicParams {
    Idle,
    Delay(DelayParams),
    WaitForBoat(WaitForBoatParams),
    EnteringWater(EnteringWaterParams),
    ShoreWalk(ShoreWalkParams),
    SwimAway(SwimAwayParams),
    SwimBackInRange(SwimBackInRangeParams),
    BuzzBoat(BuzzBoatParams),
    ShoreLanding(ShoreLandingParams),
    WaterLanding(WaterLandingParams),
    Wandering(WanderingParams),
    FlyOpposite(FlyOppositeParams),
    FlyDirectToShore(FlyDirectToShoreParams),
    SlotLanding(SlotLandingParams),
    WolfAttack(WolfAttackParams),
    AmbushAttack(AmbushAttackParams),
    /// A logic registered by the application under `name`
    Custom {
        name: String,
        #[serde(default)]
        params: serde_json::Value,
    },
}

impl LogicParams {
    /// Registry name of the logic these params build
    pub fn name(&self) -> &str {
        match self {
            LogicParams::Idle => "Idle",
            LogicParams::Delay(_) => "Delay",
            LogicParams::WaitForBoat(_) => "WaitForBoat",
            LogicParams::EnteringWater(_) => "EnteringWater",
            LogicParams::ShoreWalk(_) => "ShoreWalk",
            LogicParams::SwimAway(_) => "SwimAway",
            LogicParams::SwimBackInRange(_) => "SwimBackInRange",
            LogicParams::BuzzBoat(_) => "BuzzBoat",
            LogicParams::ShoreLanding(_) => "ShoreLanding",
            LogicParams::WaterLanding(_) => "WaterLanding",
            LogicParams::Wandering(_) => "Wandering",
            LogicParams::FlyOpposite(_) => "FlyOpposite",
            LogicParams::FlyDirectToShore(_) => "FlyDirectToShore",
            LogicParams::SlotLanding(_) => "SlotLanding",
            LogicParams::WolfAttack(_) => "WolfAttack",
            LogicParams::AmbushAttack(_) => "AmbushAttack",
            LogicParams::Custom { name, .. } => name,
        }
    }
}

/// Which logic to run, with what parameters, for at most how long
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicConfig {
    /// Logic and its parameters
    pub logic: LogicParams,
    /// Seconds before the player forces a `TIMEOUT` hand-off
    #[serde(default)]
    pub timeout: Option<f32>,
}

impl LogicConfig {
    /// Create a config without a timeout
    pub fn new(logic: LogicParams) -> Self {
        Self {
            logic,
            timeout: None,
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, seconds: f32) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Registry name
    pub fn name(&self) -> &str {
        self.logic.name()
    }
}

impl From<LogicParams> for LogicConfig {
    fn from(logic: LogicParams) -> Self {
        Self::new(logic)
    }
}

/// Whether a flying creature has come to rest on ground or water, or on a
/// surface moving at `frame_velocity`
pub(crate) fn has_touched_down(
    ctx: &LogicContext<'_>,
    frame_velocity: Vec2,
    max_altitude: f32,
    max_speed: f32,
) -> bool {
    ctx.altitude() <= max_altitude && (ctx.velocity() - frame_velocity).length() <= max_speed
}
