//! Behavior and locomotion configuration

use crate::error::Result;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Swimming tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Maximum angular speed (rad/s)
    pub turning_speed: f32,
    /// Angular speed per radian of heading error before clamping
    pub turn_taper: f32,
    /// Easing rate for angular velocity (1/s)
    pub angular_smoothing: f32,
    /// Easing rate for linear velocity (1/s)
    pub linear_smoothing: f32,
    /// Distance inside which speed is scaled down
    pub slow_radius: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            turning_speed: 2.5,
            turn_taper: 3.0,
            angular_smoothing: 6.0,
            linear_smoothing: 3.0,
            slow_radius: 2.0,
        }
    }
}

/// Walking tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandConfig {
    /// Maximum turning rate (rad/s)
    pub turning_speed: f32,
}

impl Default for LandConfig {
    fn default() -> Self {
        Self { turning_speed: 3.0 }
    }
}

/// Flying tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Maximum turning rate (rad/s)
    pub turning_speed: f32,
    /// Climb/descent rate (units/s)
    pub vertical_rate: f32,
    /// Airspeed change rate (units/s²)
    pub acceleration: f32,
    /// Largest bank angle (rad)
    pub max_bank: f32,
    /// Bank angle per radian of heading error
    pub bank_gain: f32,
    /// Bank angle change rate (rad/s)
    pub bank_rate: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            turning_speed: 2.0,
            vertical_rate: 4.0,
            acceleration: 12.0,
            max_bank: 0.6,
            bank_gain: 1.2,
            bank_rate: 1.5,
        }
    }
}

/// Per-creature behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Seed for the creature's random source
    pub seed: u64,
    /// Maximum immediate hand-offs within one tick
    pub chain_limit: usize,
    /// Duration of the delay substituted for unknown logic names
    pub fallback_delay: f32,
    /// Snout point in body-local space
    pub snout_offset: Vec2,
    /// Swimming tuning
    pub water: WaterConfig,
    /// Walking tuning
    pub land: LandConfig,
    /// Flying tuning
    pub flight: FlightConfig,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            chain_limit: 8,
            fallback_delay: 1.0,
            snout_offset: Vec2::new(1.0, 0.0),
            water: WaterConfig::default(),
            land: LandConfig::default(),
            flight: FlightConfig::default(),
        }
    }
}

impl BehaviorConfig {
    /// Parse a configuration from JSON (missing fields use defaults)
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the immediate hand-off limit
    pub fn with_chain_limit(mut self, limit: usize) -> Self {
        self.chain_limit = limit;
        self
    }

    /// Set the duration of the delay substituted for unknown logics
    pub fn with_fallback_delay(mut self, seconds: f32) -> Self {
        self.fallback_delay = seconds;
        self
    }

    /// Set the snout offset
    pub fn with_snout_offset(mut self, offset: Vec2) -> Self {
        self.snout_offset = offset;
        self
    }

    /// Set the maximum bank angle
    pub fn with_max_bank(mut self, max_bank: f32) -> Self {
        self.flight.max_bank = max_bank;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BehaviorConfig::from_json(r#"{ "seed": 9, "flight": { "max_bank": 0.3 } }"#)
            .unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.chain_limit, 8);
        assert_eq!(config.flight.max_bank, 0.3);
        assert_eq!(config.flight.bank_rate, FlightConfig::default().bank_rate);
        assert_eq!(config.water.slow_radius, 2.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(BehaviorConfig::from_json("{ seed: }").is_err());
    }
}
