//! Logic registry
//!
//! Maps logic names to factories. The built-ins are registered by
//! [`LogicRegistry::with_builtins`]; applications add their own with
//! [`LogicRegistry::register`] and reach them through
//! [`LogicParams::Custom`].

use crate::error::{BehaviorError, Result};
use crate::logic::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Builds a fresh logic module from its parameters
pub type LogicFactory = Box<dyn Fn(&LogicParams) -> Result<Box<dyn LogicModule>> + Send + Sync>;

/// Name-to-factory table shared by every script player
pub struct LogicRegistry {
    factories: HashMap<String, LogicFactory>,
}

impl Default for LogicRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

macro_rules! register_builtin {
    ($registry:expr, $($variant:ident => $module:ident),* $(,)?) => {
        $(
            $registry.register(stringify!($variant), |params: &LogicParams| match params {
                LogicParams::$variant(p) => {
                    Ok(Box::new($module::new(p.clone())) as Box<dyn LogicModule>)
                }
                other => Err(BehaviorError::ParamsMismatch {
                    logic: stringify!($variant).to_string(),
                    found: other.name().to_string(),
                }),
            });
        )*
    };
}

impl LogicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in logic
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register("Idle", |_: &LogicParams| {
            Ok(Box::new(Idle::new()) as Box<dyn LogicModule>)
        });
        register_builtin!(registry,
            Delay => Delay,
            WaitForBoat => WaitForBoat,
            EnteringWater => EnteringWater,
            ShoreWalk => ShoreWalk,
            SwimAway => SwimAway,
            SwimBackInRange => SwimBackInRange,
            BuzzBoat => BuzzBoat,
            ShoreLanding => ShoreLanding,
            WaterLanding => WaterLanding,
            Wandering => Wandering,
            FlyOpposite => FlyOpposite,
            FlyDirectToShore => FlyDirectToShore,
            SlotLanding => SlotLanding,
            WolfAttack => WolfAttack,
            AmbushAttack => AmbushAttack,
        );

        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&LogicParams) -> Result<Box<dyn LogicModule>> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            log::debug!("Replaced logic factory '{}'", name);
        }
    }

    /// Check if a logic is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a module, failing on unknown names or mismatched params
    pub fn try_create(&self, config: &LogicConfig) -> Result<Box<dyn LogicModule>> {
        let name = config.name();
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BehaviorError::UnknownLogic(name.to_string()))?;
        factory(&config.logic)
    }

    /// Build a module, substituting a `fallback_delay` second delay if that
    /// fails
    pub fn create(&self, config: &LogicConfig, fallback_delay: f32) -> Box<dyn LogicModule> {
        match self.try_create(config) {
            Ok(module) => module,
            Err(e) => {
                log::warn!("Cannot create logic '{}': {}; delaying instead", config.name(), e);
                Box::new(Delay::seconds(fallback_delay))
            }
        }
    }
}

/// Decode the JSON params of a [`LogicParams::Custom`] into a typed struct
pub fn custom_params<T: DeserializeOwned>(params: &LogicParams) -> Result<T> {
    match params {
        LogicParams::Custom { name, params } => {
            serde_json::from_value(params.clone()).map_err(|source| BehaviorError::InvalidParams {
                logic: name.clone(),
                source,
            })
        }
        other => Err(BehaviorError::ParamsMismatch {
            logic: "Custom".to_string(),
            found: other.name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_builtins_registered() {
        let registry = LogicRegistry::with_builtins();
        assert_eq!(registry.names().len(), 16);
        assert!(registry.contains("WaitForBoat"));
        assert!(registry.contains("AmbushAttack"));
    }

    #[test]
    fn test_create_builtin() {
        let registry = LogicRegistry::with_builtins();
        let config = LogicConfig::new(LogicParams::ShoreWalk(ShoreWalkParams::default()));

        let module = registry.try_create(&config).unwrap();
        assert_eq!(module.name(), "ShoreWalk");
    }

    #[test]
    fn test_unknown_logic_falls_back_to_delay() {
        let registry = LogicRegistry::with_builtins();
        let config = LogicConfig::new(LogicParams::Custom {
            name: "Moonwalk".into(),
            params: serde_json::Value::Null,
        });

        assert!(matches!(
            registry.try_create(&config),
            Err(BehaviorError::UnknownLogic(name)) if name == "Moonwalk"
        ));
        let module = registry.create(&config, 2.0);
        assert_eq!(module.name(), "Delay");
        assert_eq!(module.duration(), Some(2.0));
    }

    #[derive(Debug, Deserialize)]
    struct SpinParams {
        rate: f32,
    }

    #[test]
    fn test_custom_factory() {
        let mut registry = LogicRegistry::new();
        registry.register("Spin", |params: &LogicParams| {
            let p: SpinParams = custom_params(params)?;
            Ok(Box::new(Delay::seconds(p.rate)) as Box<dyn LogicModule>)
        });

        let good = LogicConfig::new(LogicParams::Custom {
            name: "Spin".into(),
            params: serde_json::json!({ "rate": 3.0 }),
        });
        assert_eq!(registry.try_create(&good).unwrap().duration(), Some(3.0));

        let bad = LogicConfig::new(LogicParams::Custom {
            name: "Spin".into(),
            params: serde_json::json!({ "speed": 3.0 }),
        });
        assert!(matches!(
            registry.try_create(&bad),
            Err(BehaviorError::InvalidParams { .. })
        ));
    }
}
