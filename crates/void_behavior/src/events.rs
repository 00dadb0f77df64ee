//! Behavior events and the entity collaborator

use crate::logic::LogicPhase;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Notification sent to the creature's entity (animation, sound)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BehaviorEvent {
    /// A logic module was activated
    LogicStarting {
        /// Logic name
        logic: String,
        /// Phase right after activation
        phase: LogicPhase,
        /// Expected duration hint for animation sync
        duration: Option<f32>,
    },
    /// The active logic reported a new phase
    LogicTick {
        /// Logic name
        logic: String,
        /// New phase
        phase: LogicPhase,
    },
    /// A logic module handed off
    LogicFinished {
        /// Logic name
        logic: String,
        /// Result it reported
        result: String,
    },
    /// The script ran out of logic
    ScriptFinished,
    /// The script was dropped after too many immediate hand-offs
    ScriptAborted,
}

impl BehaviorEvent {
    /// Check if this event ends the script
    pub fn is_terminal(&self) -> bool {
        matches!(self, BehaviorEvent::ScriptFinished | BehaviorEvent::ScriptAborted)
    }
}

/// Entity/animation collaborator driven by a behavior
pub trait CreatureEntity {
    /// Receive a behavior event
    fn handle_behavior_event(&mut self, event: &BehaviorEvent);

    /// Current rendered height
    fn height(&self) -> f32;

    /// Pin the rendered height and up normal
    fn set_explicit_position(&mut self, height: f32, normal: Vec3);
}

/// Entity that records everything it is told (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingEntity {
    /// Received events, oldest first
    pub events: Vec<BehaviorEvent>,
    /// Last pinned height
    pub height: f32,
    /// Last pinned normal
    pub normal: Vec3,
}

impl RecordingEntity {
    /// Create at a height
    pub fn new(height: f32) -> Self {
        Self {
            events: Vec::new(),
            height,
            normal: Vec3::Y,
        }
    }

    /// Names of started logics, in order
    pub fn started(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BehaviorEvent::LogicStarting { logic, .. } => Some(logic.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl CreatureEntity for RecordingEntity {
    fn handle_behavior_event(&mut self, event: &BehaviorEvent) {
        self.events.push(event.clone());
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_explicit_position(&mut self, height: f32, normal: Vec3) {
        self.height = height;
        self.normal = normal;
    }
}
