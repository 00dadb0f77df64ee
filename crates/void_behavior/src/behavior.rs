//! Per-creature behavior
//!
//! [`Behavior`] owns a creature's script player, locomotion controller and
//! random source, and runs them in the three phases of a frame:
//!
//! ```text
//! update_logic    build context -> script player -> locomotion command
//! update_physics  mode switch -> write command to body
//! update_visuals  ease bank -> pin entity height and normal
//! ```
//!
//! [`Behavior::update`] runs all three back to back.

use crate::config::BehaviorConfig;
use crate::context::LogicContext;
use crate::environment::Environment;
use crate::error::BehaviorError;
use crate::events::{BehaviorEvent, CreatureEntity};
use crate::locomotion::{CreaturePose, LocomotionController, LocomotionState};
use crate::logic::LogicPhase;
use crate::player::ScriptPlayer;
use crate::registry::LogicRegistry;
use crate::rng::DeterministicRng;
use crate::script::ScriptNode;
use crate::steering::{LocomotionType, LogicPathResult};
use std::sync::Arc;
use void_physics::PhysicsBody;

/// Scripted behavior of a single creature
pub struct Behavior {
    config: BehaviorConfig,
    player: ScriptPlayer,
    locomotion: LocomotionController,
    rng: DeterministicRng,
    aggressiveness: f32,
    bottles: u32,
    last_result: Option<String>,
    last_path: Option<LogicPathResult>,
}

impl Behavior {
    /// Create a behavior running `script`
    pub fn new(registry: Arc<LogicRegistry>, script: ScriptNode, config: BehaviorConfig) -> Self {
        let player = ScriptPlayer::new(registry, script)
            .with_chain_limit(config.chain_limit)
            .with_fallback_delay(config.fallback_delay);
        Self {
            locomotion: LocomotionController::new(&config),
            rng: DeterministicRng::new(config.seed),
            player,
            config,
            aggressiveness: 0.0,
            bottles: 0,
            last_result: None,
            last_path: None,
        }
    }

    /// Set base aggressiveness
    pub fn with_aggressiveness(mut self, aggressiveness: f32) -> Self {
        self.set_aggressiveness(aggressiveness);
        self
    }

    /// Set base aggressiveness, clamped to `[0, 1]`
    pub fn set_aggressiveness(&mut self, aggressiveness: f32) {
        self.aggressiveness = aggressiveness.clamp(0.0, 1.0);
    }

    /// Set the bottle count
    pub fn set_bottles(&mut self, bottles: u32) {
        self.bottles = bottles;
    }

    /// Replace the running script
    pub fn set_script(&mut self, script: ScriptNode) {
        self.player.start(script);
        self.last_result = None;
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn aggressiveness(&self) -> f32 {
        self.aggressiveness
    }

    pub fn bottles(&self) -> u32 {
        self.bottles
    }

    /// Whether the script has run out
    pub fn is_finished(&self) -> bool {
        self.player.is_finished()
    }

    /// Name of the active logic
    pub fn current_logic(&self) -> Option<&str> {
        self.player.current_logic()
    }

    /// Phase of the active logic
    pub fn current_phase(&self) -> Option<LogicPhase> {
        self.player.current_phase()
    }

    /// Locomotion mode the body is configured for
    pub fn locomotion_mode(&self) -> LocomotionType {
        self.locomotion.mode()
    }

    pub fn locomotion_state(&self) -> &LocomotionState {
        self.locomotion.state()
    }

    /// Result reported by the most recently finished logic
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Steering produced by the last logic tick
    pub fn last_path(&self) -> Option<&LogicPathResult> {
        self.last_path.as_ref()
    }

    /// Why the script was dropped, if it was
    pub fn last_error(&self) -> Option<&BehaviorError> {
        self.player.last_error()
    }

    /// Logic phase: tick the script and buffer a locomotion command.
    ///
    /// Returns `true` while the script is still running.
    pub fn update_logic(
        &mut self,
        dt: f32,
        body: &dyn PhysicsBody,
        target: &dyn PhysicsBody,
        environment: &dyn Environment,
        entity: &mut dyn CreatureEntity,
    ) -> bool {
        let mut ctx = LogicContext {
            dt,
            origin: body.position(),
            snout: body.world_point(self.config.snout_offset),
            height: entity.height(),
            body,
            target,
            environment,
            aggressiveness: self.aggressiveness,
            bottles: self.bottles,
            rng: &mut self.rng,
        };

        let result = self.player.update(&mut ctx);
        self.locomotion.compute_locomotion(&ctx, result.as_ref());
        self.last_path = result;

        for event in self.player.drain_events() {
            if let BehaviorEvent::LogicFinished { result, .. } = &event {
                self.last_result = Some(result.clone());
            }
            entity.handle_behavior_event(&event);
        }

        !self.player.is_finished()
    }

    /// Physics phase: apply the buffered command to the body
    pub fn update_physics(&mut self, body: &mut dyn PhysicsBody) {
        self.locomotion.update_physics(body);
    }

    /// Visual phase: pin the entity's rendered height and orientation
    pub fn update_visuals(&mut self, dt: f32, entity: &mut dyn CreatureEntity) -> CreaturePose {
        let pose = self.locomotion.update_visuals(dt);
        entity.set_explicit_position(pose.height, pose.normal);
        pose
    }

    /// Run all three phases. A tick without a body or a target does nothing.
    pub fn update(
        &mut self,
        dt: f32,
        body: Option<&mut dyn PhysicsBody>,
        target: Option<&dyn PhysicsBody>,
        environment: &dyn Environment,
        entity: &mut dyn CreatureEntity,
    ) -> Option<CreaturePose> {
        let (Some(body), Some(target)) = (body, target) else {
            log::trace!("Behavior tick skipped: body or target missing");
            return None;
        };

        self.update_logic(dt, &*body, target, environment, entity);
        self.update_physics(body);
        Some(self.update_visuals(dt, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StraightRiver;
    use crate::events::RecordingEntity;
    use crate::logic::{DelayParams, LogicConfig, LogicParams, WaitForBoatParams, RESULT_NOTICED};
    use crate::script;
    use glam::Vec2;
    use void_physics::SimBody;

    fn registry() -> Arc<LogicRegistry> {
        Arc::new(LogicRegistry::with_builtins())
    }

    #[test]
    fn test_missing_body_is_noop() {
        let mut behavior = Behavior::new(
            registry(),
            script::logic(LogicParams::Delay(DelayParams::default())),
            BehaviorConfig::default(),
        );
        let river = StraightRiver::default();
        let mut entity = RecordingEntity::new(0.0);
        let boat = SimBody::dynamic();

        assert!(behavior.update(0.1, None, Some(&boat), &river, &mut entity).is_none());
        assert!(entity.events.is_empty());
        assert!(behavior.current_logic().is_none());

        let mut body = SimBody::dynamic();
        assert!(behavior.update(0.1, Some(&mut body), None, &river, &mut entity).is_none());
        assert!(entity.events.is_empty());
    }

    #[test]
    fn test_forwards_events_and_tracks_result() {
        let mut behavior = Behavior::new(
            registry(),
            script::sequence(vec![
                script::logic(LogicParams::WaitForBoat(WaitForBoatParams {
                    forward_max: Some(50.0),
                    ..Default::default()
                })),
                script::logic(LogicParams::Delay(DelayParams::default())),
            ]),
            BehaviorConfig::default(),
        );
        let river = StraightRiver::default();
        let mut entity = RecordingEntity::new(0.0);
        let mut body = SimBody::dynamic();
        let boat = SimBody::dynamic().with_position(Vec2::new(40.0, 0.0));

        behavior.update(0.1, Some(&mut body), Some(&boat), &river, &mut entity);
        assert_eq!(behavior.last_result(), Some(RESULT_NOTICED));
        assert_eq!(entity.started(), vec!["WaitForBoat"]);

        behavior.update(0.1, Some(&mut body), Some(&boat), &river, &mut entity);
        assert_eq!(behavior.current_logic(), Some("Delay"));
        assert_eq!(entity.started(), vec!["WaitForBoat", "Delay"]);
    }

    #[test]
    fn test_finishes_and_reports() {
        let mut behavior = Behavior::new(
            registry(),
            ScriptNode::Logic(LogicConfig::new(LogicParams::Delay(DelayParams {
                duration: 0.25,
                ..Default::default()
            }))),
            BehaviorConfig::default(),
        );
        let river = StraightRiver::default();
        let mut entity = RecordingEntity::new(0.0);
        let mut body = SimBody::dynamic();
        let boat = SimBody::dynamic().with_position(Vec2::new(0.0, 100.0));

        for _ in 0..10 {
            behavior.update(0.1, Some(&mut body), Some(&boat), &river, &mut entity);
        }

        assert!(behavior.is_finished());
        assert!(entity.events.iter().any(BehaviorEvent::is_terminal));
        assert_eq!(body.linear_velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_aggressiveness_clamped() {
        let behavior = Behavior::new(
            registry(),
            script::sequence(Vec::new()),
            BehaviorConfig::default(),
        )
        .with_aggressiveness(3.0);

        assert_eq!(behavior.aggressiveness(), 1.0);
    }

    #[test]
    fn test_config_sets_fallback_delay() {
        let config = BehaviorConfig::default().with_fallback_delay(3.0);
        let mut behavior = Behavior::new(
            registry(),
            script::logic(LogicParams::Custom {
                name: "Moonwalk".into(),
                params: serde_json::Value::Null,
            }),
            config,
        );
        let river = StraightRiver::default();
        let mut entity = RecordingEntity::new(0.0);
        let mut body = SimBody::dynamic();
        let boat = SimBody::dynamic().with_position(Vec2::new(0.0, 100.0));

        behavior.update(0.1, Some(&mut body), Some(&boat), &river, &mut entity);

        assert_eq!(behavior.current_logic(), Some("Delay"));
        assert!(matches!(
            entity.events.first(),
            Some(BehaviorEvent::LogicStarting { logic, duration: Some(d), .. })
                if logic == "Delay" && *d == 3.0
        ));
    }
}
