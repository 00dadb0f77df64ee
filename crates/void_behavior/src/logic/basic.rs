//! Stationary logics: idling, fixed delays and waiting for the boat

use super::{LogicModule, LogicPhase, RESULT_FINISHED, RESULT_NOTICED};
use crate::context::LogicContext;
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use serde::{Deserialize, Serialize};

/// Do nothing, forever
#[derive(Debug, Clone, Default)]
pub struct Idle;

impl Idle {
    pub fn new() -> Self {
        Self
    }
}

impl LogicModule for Idle {
    fn name(&self) -> &str {
        "Idle"
    }

    fn activate(&mut self, _ctx: &mut LogicContext<'_>) {}

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        LogicPathResult::new(Steering::hold(ctx.origin), LocomotionType::None)
    }

    fn phase(&self) -> LogicPhase {
        LogicPhase::Idle
    }
}

/// Parameters for [`Delay`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayParams {
    /// Seconds to wait
    pub duration: f32,
    /// Locomotion held while waiting
    pub locomotion: LocomotionType,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            locomotion: LocomotionType::None,
        }
    }
}

/// Hold position for a fixed time, then report `FINISHED`
#[derive(Debug, Clone)]
pub struct Delay {
    params: DelayParams,
    elapsed: f32,
}

impl Delay {
    pub fn new(params: DelayParams) -> Self {
        Self {
            params,
            elapsed: 0.0,
        }
    }

    /// Delay of `duration` seconds without locomotion
    pub fn seconds(duration: f32) -> Self {
        Self::new(DelayParams {
            duration,
            ..Default::default()
        })
    }
}

impl LogicModule for Delay {
    fn name(&self) -> &str {
        "Delay"
    }

    fn activate(&mut self, _ctx: &mut LogicContext<'_>) {
        self.elapsed = 0.0;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        self.elapsed += ctx.dt;
        let result = LogicPathResult::new(Steering::hold(ctx.origin), self.params.locomotion);

        if self.elapsed >= self.params.duration {
            result.end_with(RESULT_FINISHED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        LogicPhase::Waiting
    }

    fn duration(&self) -> Option<f32> {
        Some(self.params.duration)
    }
}

/// Parameters for [`WaitForBoat`].
///
/// Distances are scaled by the aggression multiplier. A missing maximum
/// disables noticing in that direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitForBoatParams {
    /// Closest distance at which a target in front is noticed
    pub forward_min: Option<f32>,
    /// Farthest distance at which a target in front is noticed
    pub forward_max: Option<f32>,
    /// Closest distance at which a target behind is noticed
    pub backward_min: Option<f32>,
    /// Farthest distance at which a target behind is noticed
    pub backward_max: Option<f32>,
    /// Locomotion held while waiting
    pub locomotion: LocomotionType,
}

impl Default for WaitForBoatParams {
    fn default() -> Self {
        Self {
            forward_min: None,
            forward_max: Some(40.0),
            backward_min: None,
            backward_max: Some(15.0),
            locomotion: LocomotionType::None,
        }
    }
}

/// Stand still until the target comes within a notice band
#[derive(Debug, Clone)]
pub struct WaitForBoat {
    params: WaitForBoatParams,
}

impl WaitForBoat {
    pub fn new(params: WaitForBoatParams) -> Self {
        Self { params }
    }

    /// Whether a target at `distance` is noticed, `in_front` picking the band
    pub fn notices(&self, distance: f32, in_front: bool, multiplier: f32) -> bool {
        let (min, max) = if in_front {
            (self.params.forward_min, self.params.forward_max)
        } else {
            (self.params.backward_min, self.params.backward_max)
        };

        match max {
            Some(max) => distance >= min.unwrap_or(0.0) && distance <= max * multiplier,
            None => false,
        }
    }
}

impl LogicModule for WaitForBoat {
    fn name(&self) -> &str {
        "WaitForBoat"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        log::trace!(
            "WaitForBoat armed at distance {:.1}",
            ctx.distance_to_target()
        );
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let to_target = ctx.to_target();
        let in_front = to_target.dot(ctx.forward()) >= 0.0;
        let result = LogicPathResult::new(Steering::hold(ctx.origin), self.params.locomotion);

        if self.notices(to_target.length(), in_front, ctx.aggression_multiplier()) {
            result.finish_with(RESULT_NOTICED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        LogicPhase::Waiting
    }
}
