//! Script player
//!
//! Walks a script tree, keeps exactly one logic module active, and performs
//! the hand-offs the module asks for. Hand-offs come in two flavours:
//!
//! - immediate (`finish == false`): the next logic is activated and updated
//!   within the same tick, and the old steering is dropped
//! - deferred (`finish == true`): the steering is used this tick and the next
//!   logic is activated at the start of the following one
//!
//! Immediate hand-offs are capped per tick; a script that keeps handing off
//! is dropped with [`BehaviorEvent::ScriptAborted`].

use crate::context::LogicContext;
use crate::error::BehaviorError;
use crate::events::BehaviorEvent;
use crate::logic::{LogicConfig, LogicModule, LogicPhase, RESULT_TIMEOUT};
use crate::registry::LogicRegistry;
use crate::rng::DeterministicRng;
use crate::script::{ScriptFn, ScriptNode};
use crate::steering::LogicPathResult;
use std::sync::Arc;

/// Generator descents allowed while resolving a single next logic
const MAX_RESOLVE_STEPS: usize = 256;

/// A generator on the script stack and how many children it has produced
#[derive(Debug, Clone)]
pub struct ScriptStackEntry {
    /// The generator
    pub script: ScriptFn,
    /// Children produced so far
    pub step: u32,
}

struct ActiveLogic {
    module: Box<dyn LogicModule>,
    name: String,
    remaining: Option<f32>,
}

/// Drives one creature's script
pub struct ScriptPlayer {
    registry: Arc<LogicRegistry>,
    stack: Vec<ScriptStackEntry>,
    next_logic: Option<LogicConfig>,
    current: Option<ActiveLogic>,
    last_phase: Option<LogicPhase>,
    chain_limit: usize,
    fallback_delay: f32,
    last_error: Option<BehaviorError>,
    events: Vec<BehaviorEvent>,
}

impl ScriptPlayer {
    /// Create a player and load a script
    pub fn new(registry: Arc<LogicRegistry>, script: ScriptNode) -> Self {
        let mut player = Self {
            registry,
            stack: Vec::new(),
            next_logic: None,
            current: None,
            last_phase: None,
            chain_limit: 8,
            fallback_delay: 1.0,
            last_error: None,
            events: Vec::new(),
        };
        player.start(script);
        player
    }

    /// Set the immediate hand-off limit per tick
    pub fn with_chain_limit(mut self, limit: usize) -> Self {
        self.chain_limit = limit;
        self
    }

    /// Set how long the delay substituted for unbuildable logics lasts
    pub fn with_fallback_delay(mut self, seconds: f32) -> Self {
        self.fallback_delay = seconds;
        self
    }

    /// Replace the running script. The current logic is dropped without a
    /// finished event.
    pub fn start(&mut self, script: ScriptNode) {
        let root = match script {
            ScriptNode::Script(script) => script,
            ScriptNode::Logic(config) => ScriptFn::Sequence(vec![ScriptNode::Logic(config)]),
        };
        self.stack.clear();
        self.stack.push(ScriptStackEntry {
            script: root,
            step: 0,
        });
        self.next_logic = None;
        self.current = None;
        self.last_phase = None;
        self.last_error = None;
    }

    /// Why the last script was dropped, if it was
    pub fn last_error(&self) -> Option<&BehaviorError> {
        self.last_error.as_ref()
    }

    /// Whether the script has run out
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty() && self.current.is_none() && self.next_logic.is_none()
    }

    /// Name of the active logic
    pub fn current_logic(&self) -> Option<&str> {
        self.current.as_ref().map(|active| active.name.as_str())
    }

    /// Phase of the active logic
    pub fn current_phase(&self) -> Option<LogicPhase> {
        self.current.as_ref().map(|active| active.module.phase())
    }

    /// Logic queued for activation next tick
    pub fn next_logic(&self) -> Option<&LogicConfig> {
        self.next_logic.as_ref()
    }

    /// Depth of the generator stack
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<BehaviorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Walk the generator stack to the next logic config.
    ///
    /// Generators that return a logic advance their step. A generator that
    /// returns another generator pushes it, and the new child starts with an
    /// empty result. Exhausted generators are popped and their parent is
    /// asked again with the result that exhausted them.
    pub fn resolve_next_logic(
        &mut self,
        last_result: &str,
        rng: &mut DeterministicRng,
    ) -> Option<LogicConfig> {
        let mut last = last_result;
        for _ in 0..MAX_RESOLVE_STEPS {
            let top = self.stack.last_mut()?;
            let child = top.script.call(top.step, last, rng);
            match child {
                None => {
                    self.stack.pop();
                }
                Some(ScriptNode::Logic(config)) => {
                    top.step += 1;
                    return Some(config);
                }
                Some(ScriptNode::Script(script)) => {
                    top.step += 1;
                    self.stack.push(ScriptStackEntry { script, step: 0 });
                    last = "";
                }
            }
        }

        log::warn!(
            "Script produced no logic after {} steps; dropping it",
            MAX_RESOLVE_STEPS
        );
        self.stack.clear();
        None
    }

    /// Run one tick. Returns the steering result to apply, or `None` when
    /// nothing is running.
    pub fn update(&mut self, ctx: &mut LogicContext<'_>) -> Option<LogicPathResult> {
        if self.current.is_none() && self.next_logic.is_none() {
            if self.stack.is_empty() {
                return None;
            }
            self.next_logic = self.resolve_next_logic("", ctx.rng);
            if self.next_logic.is_none() {
                self.finish_script();
                return None;
            }
        }

        if let Some(config) = self.next_logic.take() {
            self.activate(config, ctx);
        }

        let mut result = self.tick_current(ctx)?;
        let mut handoffs = 0;

        while result.is_immediate() {
            handoffs += 1;
            if handoffs > self.chain_limit {
                self.abort_script();
                return None;
            }

            let last = result.result.take().unwrap_or_default();
            self.retire_current(&last);
            match self.resolve_next_logic(&last, ctx.rng) {
                Some(config) => {
                    self.activate(config, ctx);
                    result = self.tick_current(ctx)?;
                }
                None => {
                    self.finish_script();
                    return None;
                }
            }
        }

        self.report_phase();

        if result.is_deferred() {
            let last = result.result.clone().unwrap_or_default();
            self.retire_current(&last);
            match self.resolve_next_logic(&last, ctx.rng) {
                Some(config) => self.next_logic = Some(config),
                None => self.finish_script(),
            }
        }

        Some(result)
    }

    fn activate(&mut self, config: LogicConfig, ctx: &mut LogicContext<'_>) {
        let mut module = self.registry.create(&config, self.fallback_delay);
        module.activate(ctx);

        let name = module.name().to_string();
        let phase = module.phase();
        log::debug!("Starting logic '{}' ({:?})", name, phase);

        self.events.push(BehaviorEvent::LogicStarting {
            logic: name.clone(),
            phase,
            duration: module.duration(),
        });
        self.last_phase = Some(phase);
        self.current = Some(ActiveLogic {
            module,
            name,
            remaining: config.timeout,
        });
    }

    fn tick_current(&mut self, ctx: &mut LogicContext<'_>) -> Option<LogicPathResult> {
        let active = self.current.as_mut()?;
        let mut result = active.module.update(ctx);

        if let Some(remaining) = active.remaining.as_mut() {
            *remaining -= ctx.dt;
            if *remaining <= 0.0 {
                log::debug!("Logic '{}' timed out", active.name);
                result.result = Some(RESULT_TIMEOUT.to_string());
                result.finish = false;
            }
        }

        Some(result)
    }

    fn report_phase(&mut self) {
        let Some(active) = self.current.as_ref() else {
            return;
        };
        let phase = active.module.phase();
        if self.last_phase != Some(phase) {
            self.events.push(BehaviorEvent::LogicTick {
                logic: active.name.clone(),
                phase,
            });
            self.last_phase = Some(phase);
        }
    }

    fn retire_current(&mut self, result: &str) {
        if let Some(active) = self.current.take() {
            log::debug!("Logic '{}' finished with {}", active.name, result);
            self.events.push(BehaviorEvent::LogicFinished {
                logic: active.name,
                result: result.to_string(),
            });
        }
        self.last_phase = None;
    }

    fn finish_script(&mut self) {
        log::info!("Script finished");
        self.stack.clear();
        self.current = None;
        self.next_logic = None;
        self.events.push(BehaviorEvent::ScriptFinished);
    }

    fn abort_script(&mut self) {
        let error = BehaviorError::ChainLimit {
            limit: self.chain_limit,
        };
        log::warn!("{}; aborting", error);
        self.last_error = Some(error);
        self.stack.clear();
        self.current = None;
        self.next_logic = None;
        self.last_phase = None;
        self.events.push(BehaviorEvent::ScriptAborted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::logic::{
        DelayParams, LogicParams, SwimBackInRangeParams, WaitForBoatParams, RESULT_FINISHED,
    };
    use crate::script::{looped, sequence, until};
    use glam::Vec2;
    use void_physics::SimBody;

    fn registry() -> Arc<LogicRegistry> {
        Arc::new(LogicRegistry::with_builtins())
    }

    fn delay(duration: f32) -> ScriptNode {
        LogicParams::Delay(DelayParams {
            duration,
            ..Default::default()
        })
        .into()
    }

    #[test]
    fn test_bare_logic_runs_once() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.5;
        let mut player = ScriptPlayer::new(registry(), delay(1.0));

        assert!(player.update(&mut fixture.ctx()).is_some());
        assert_eq!(player.current_logic(), Some("Delay"));

        // Delay finishes immediately and nothing follows
        assert!(player.update(&mut fixture.ctx()).is_none());
        assert!(player.is_finished());

        let events = player.drain_events();
        assert!(matches!(events.last(), Some(BehaviorEvent::ScriptFinished)));
    }

    #[test]
    fn test_immediate_handoff_runs_next_logic_same_tick() {
        let mut fixture = Fixture::new();
        fixture.dt = 1.0;
        let mut player = ScriptPlayer::new(registry(), sequence(vec![delay(0.5), delay(5.0)]));

        let result = player.update(&mut fixture.ctx()).unwrap();
        assert!(!result.has_result());
        assert_eq!(player.current_phase(), Some(LogicPhase::Waiting));

        let events = player.drain_events();
        let started: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, BehaviorEvent::LogicStarting { .. }))
            .collect();
        assert_eq!(started.len(), 2);
        assert!(events.contains(&BehaviorEvent::LogicFinished {
            logic: "Delay".into(),
            result: RESULT_FINISHED.into(),
        }));
    }

    #[test]
    fn test_deferred_handoff_waits_a_tick() {
        let mut fixture = Fixture::new();
        fixture.target = SimBody::dynamic().with_position(Vec2::new(10.0, 0.0));
        let wait = LogicParams::WaitForBoat(WaitForBoatParams::default());
        let mut player = ScriptPlayer::new(registry(), sequence(vec![wait.into(), delay(5.0)]));

        let result = player.update(&mut fixture.ctx()).unwrap();
        assert!(result.is_deferred());
        assert!(player.current_logic().is_none());
        assert_eq!(player.next_logic().map(|c| c.name()), Some("Delay"));

        player.update(&mut fixture.ctx());
        assert_eq!(player.current_logic(), Some("Delay"));
    }

    #[test]
    fn test_timeout_forces_immediate_handoff() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.5;
        let waiting = LogicConfig::new(LogicParams::WaitForBoat(WaitForBoatParams::default()))
            .with_timeout(1.0);
        let script = until("NOTICED", Some(2), ScriptNode::Logic(waiting));
        let mut player = ScriptPlayer::new(registry(), script);

        player.update(&mut fixture.ctx());
        player.drain_events();
        player.update(&mut fixture.ctx());

        let events = player.drain_events();
        assert!(events.contains(&BehaviorEvent::LogicFinished {
            logic: "WaitForBoat".into(),
            result: RESULT_TIMEOUT.into(),
        }));
        // The until re-ran the wait in the same tick
        assert_eq!(player.current_logic(), Some("WaitForBoat"));
    }

    #[test]
    fn test_chain_limit_aborts() {
        let mut fixture = Fixture::new();
        let mut player =
            ScriptPlayer::new(registry(), looped(vec![delay(0.0)])).with_chain_limit(4);

        assert!(player.update(&mut fixture.ctx()).is_none());
        assert!(player.is_finished());

        let events = player.drain_events();
        let started = events
            .iter()
            .filter(|e| matches!(e, BehaviorEvent::LogicStarting { .. }))
            .count();
        assert_eq!(started, 5);
        assert_eq!(events.last(), Some(&BehaviorEvent::ScriptAborted));
        assert!(matches!(
            player.last_error(),
            Some(BehaviorError::ChainLimit { limit: 4 })
        ));
    }

    #[test]
    fn test_pushed_generator_starts_with_empty_result() {
        let mut fixture = Fixture::new();
        fixture.dt = 1.0;
        // The first delay ends with FINISHED; the until must still run once
        let script = sequence(vec![delay(0.5), until(RESULT_FINISHED, None, delay(5.0))]);
        let mut player = ScriptPlayer::new(registry(), script);

        assert!(player.update(&mut fixture.ctx()).is_some());
        assert_eq!(player.current_logic(), Some("Delay"));
        assert_eq!(player.stack_depth(), 2);
        assert!(!player.is_finished());

        let mut rng = DeterministicRng::new(1);
        let mut resolver = ScriptPlayer::new(
            registry(),
            sequence(vec![until("DONE", None, delay(2.0))]),
        );
        assert!(resolver.resolve_next_logic("DONE", &mut rng).is_some());
        assert_eq!(resolver.stack_depth(), 2);
    }

    #[test]
    fn test_phase_change_reported_once() {
        let mut fixture = Fixture::new();
        fixture.dt = 0.1;
        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(0.0, 40.0))
            .with_velocity(Vec2::new(0.0, 2.0));
        let swim = LogicParams::SwimBackInRange(SwimBackInRangeParams::default());
        let mut player = ScriptPlayer::new(registry(), swim.into());

        let ticks = |events: &[BehaviorEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, BehaviorEvent::LogicTick { .. }))
                .count()
        };

        player.update(&mut fixture.ctx());
        player.update(&mut fixture.ctx());
        assert_eq!(ticks(&player.drain_events()), 0);
        assert_eq!(player.current_phase(), Some(LogicPhase::Returning));

        fixture.target = SimBody::dynamic()
            .with_position(Vec2::new(0.0, 20.0))
            .with_velocity(Vec2::new(0.0, 2.0));
        player.update(&mut fixture.ctx());
        assert_eq!(
            player.drain_events(),
            vec![BehaviorEvent::LogicTick {
                logic: "SwimBackInRange".into(),
                phase: LogicPhase::Holding,
            }]
        );

        player.update(&mut fixture.ctx());
        assert_eq!(ticks(&player.drain_events()), 0);
    }

    #[test]
    fn test_nested_generators_pop_back_to_parent() {
        let mut fixture = Fixture::new();
        fixture.dt = 1.0;
        let script = sequence(vec![sequence(vec![delay(0.5)]), delay(5.0)]);
        let mut player = ScriptPlayer::new(registry(), script);

        player.update(&mut fixture.ctx());
        assert_eq!(player.stack_depth(), 1);
        assert_eq!(player.current_logic(), Some("Delay"));
        assert!(!player.is_finished());
    }

    #[test]
    fn test_unknown_logic_substitutes_delay() {
        let mut fixture = Fixture::new();
        let script: ScriptNode = LogicParams::Custom {
            name: "Teleport".into(),
            params: serde_json::Value::Null,
        }
        .into();
        let mut player = ScriptPlayer::new(registry(), script);

        assert!(player.update(&mut fixture.ctx()).is_some());
        assert_eq!(player.current_logic(), Some("Delay"));
    }

    #[test]
    fn test_empty_generators_do_not_spin() {
        let mut fixture = Fixture::new();
        let mut player = ScriptPlayer::new(registry(), looped(vec![sequence(vec![])]));

        assert!(player.update(&mut fixture.ctx()).is_none());
        assert!(player.is_finished());
    }
}
