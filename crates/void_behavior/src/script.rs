//! Behavior scripts
//!
//! A script is a tree of [`ScriptNode`]s. Leaves are [`LogicConfig`]s; inner
//! nodes are [`ScriptFn`] generators that are asked, one step at a time, for
//! their next child. The generator sees how many children it has already
//! produced and the result string of the last logic that ran, so simple
//! combinators compose into long-running behaviors:
//!
//! ```ignore
//! looped(vec![
//!     until("NOTICED", None, LogicParams::WaitForBoat(Default::default())),
//!     LogicParams::EnteringWater(Default::default()).into(),
//!     LogicParams::WolfAttack(Default::default()).into(),
//! ])
//! ```

use crate::error::Result;
use crate::logic::{LogicConfig, LogicParams};
use crate::rng::DeterministicRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A step in a script: run a logic, or descend into a generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptNode {
    /// Run a single logic
    Logic(LogicConfig),
    /// Ask a generator for children
    Script(ScriptFn),
}

impl ScriptNode {
    /// Parse a script from JSON
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize a script to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<LogicConfig> for ScriptNode {
    fn from(config: LogicConfig) -> Self {
        ScriptNode::Logic(config)
    }
}

impl From<LogicParams> for ScriptNode {
    fn from(params: LogicParams) -> Self {
        ScriptNode::Logic(LogicConfig::new(params))
    }
}

impl From<ScriptFn> for ScriptNode {
    fn from(script: ScriptFn) -> Self {
        ScriptNode::Script(script)
    }
}

/// Signature of an application-defined generator
pub type GeneratorFn = dyn Fn(u32, &str, &mut DeterministicRng) -> Option<ScriptNode> + Send + Sync;

/// Application-defined generator (not serializable)
#[derive(Clone)]
pub struct Generator(Arc<GeneratorFn>);

impl Generator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(u32, &str, &mut DeterministicRng) -> Option<ScriptNode> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}

impl PartialEq for Generator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Generator producing a script node's children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptFn {
    /// Each child once, in order
    Sequence(Vec<ScriptNode>),
    /// Repeat `child` until the last result equals `sentinel`
    /// (or `limit` repetitions have run)
    Until {
        sentinel: String,
        #[serde(default)]
        limit: Option<u32>,
        child: Box<ScriptNode>,
    },
    /// One child picked at random
    Random(Vec<ScriptNode>),
    /// Children in order, forever
    Loop(Vec<ScriptNode>),
    /// Application-defined
    #[serde(skip)]
    Custom(Generator),
}

impl ScriptFn {
    /// Child number `step`, given the last logic result; `None` when exhausted
    pub fn call(
        &self,
        step: u32,
        last_result: &str,
        rng: &mut DeterministicRng,
    ) -> Option<ScriptNode> {
        match self {
            ScriptFn::Sequence(children) => children.get(step as usize).cloned(),
            ScriptFn::Until {
                sentinel,
                limit,
                child,
            } => {
                if last_result == sentinel.as_str() {
                    return None;
                }
                if limit.is_some_and(|limit| step >= limit) {
                    return None;
                }
                Some(child.as_ref().clone())
            }
            ScriptFn::Random(children) => {
                if step > 0 {
                    return None;
                }
                rng.pick(children).cloned()
            }
            ScriptFn::Loop(children) => {
                if children.is_empty() {
                    return None;
                }
                children.get(step as usize % children.len()).cloned()
            }
            ScriptFn::Custom(generator) => (generator.0)(step, last_result, rng),
        }
    }
}

/// Run each node once, in order
pub fn sequence(children: Vec<ScriptNode>) -> ScriptNode {
    ScriptNode::Script(ScriptFn::Sequence(children))
}

/// Repeat `child` until a logic reports `sentinel`
pub fn until(sentinel: &str, limit: Option<u32>, child: impl Into<ScriptNode>) -> ScriptNode {
    ScriptNode::Script(ScriptFn::Until {
        sentinel: sentinel.to_string(),
        limit,
        child: Box::new(child.into()),
    })
}

/// Run one randomly chosen node
pub fn random(children: Vec<ScriptNode>) -> ScriptNode {
    ScriptNode::Script(ScriptFn::Random(children))
}

/// Run the nodes in order, forever
pub fn looped(children: Vec<ScriptNode>) -> ScriptNode {
    ScriptNode::Script(ScriptFn::Loop(children))
}

/// Wrap a closure as a generator node
pub fn generator<F>(f: F) -> ScriptNode
where
    F: Fn(u32, &str, &mut DeterministicRng) -> Option<ScriptNode> + Send + Sync + 'static,
{
    ScriptNode::Script(ScriptFn::Custom(Generator::new(f)))
}

/// Single-logic node
pub fn logic(params: LogicParams) -> ScriptNode {
    params.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::DelayParams;

    fn delay(duration: f32) -> ScriptNode {
        logic(LogicParams::Delay(DelayParams {
            duration,
            ..Default::default()
        }))
    }

    fn unwrap_fn(node: ScriptNode) -> ScriptFn {
        match node {
            ScriptNode::Script(f) => f,
            other => panic!("not a generator: {other:?}"),
        }
    }

    #[test]
    fn test_sequence() {
        let mut rng = DeterministicRng::new(1);
        let seq = unwrap_fn(sequence(vec![delay(1.0), delay(2.0), delay(3.0)]));

        assert_eq!(seq.call(0, "", &mut rng), Some(delay(1.0)));
        assert_eq!(seq.call(1, "FINISHED", &mut rng), Some(delay(2.0)));
        assert_eq!(seq.call(2, "FINISHED", &mut rng), Some(delay(3.0)));
        assert_eq!(seq.call(3, "FINISHED", &mut rng), None);
    }

    #[test]
    fn test_until_stops_on_sentinel() {
        let mut rng = DeterministicRng::new(1);
        let f = unwrap_fn(until("NOTICED", None, delay(1.0)));

        assert_eq!(f.call(0, "", &mut rng), Some(delay(1.0)));
        assert_eq!(f.call(7, "TIMEOUT", &mut rng), Some(delay(1.0)));
        assert_eq!(f.call(8, "NOTICED", &mut rng), None);
    }

    #[test]
    fn test_until_limit() {
        let mut rng = DeterministicRng::new(1);
        let f = unwrap_fn(until("NOTICED", Some(2), delay(1.0)));

        assert!(f.call(1, "", &mut rng).is_some());
        assert_eq!(f.call(2, "", &mut rng), None);
    }

    #[test]
    fn test_loop_wraps() {
        let mut rng = DeterministicRng::new(1);
        let f = unwrap_fn(looped(vec![delay(1.0), delay(2.0)]));

        assert_eq!(f.call(0, "", &mut rng), Some(delay(1.0)));
        assert_eq!(f.call(3, "", &mut rng), Some(delay(2.0)));
        assert_eq!(f.call(100, "", &mut rng), Some(delay(1.0)));
        assert_eq!(unwrap_fn(looped(vec![])).call(0, "", &mut rng), None);
    }

    #[test]
    fn test_random_picks_once() {
        let mut rng = DeterministicRng::new(1);
        let choices = vec![delay(1.0), delay(2.0), delay(3.0)];
        let f = unwrap_fn(random(choices.clone()));

        let picked = f.call(0, "", &mut rng).unwrap();
        assert!(choices.contains(&picked));
        assert_eq!(f.call(1, "", &mut rng), None);
    }

    #[test]
    fn test_custom_generator() {
        let mut rng = DeterministicRng::new(1);
        let f = unwrap_fn(generator(|step, last, _| {
            (step < 2 && last != "STOP").then(|| delay(step as f32))
        }));

        assert_eq!(f.call(0, "", &mut rng), Some(delay(0.0)));
        assert_eq!(f.call(1, "STOP", &mut rng), None);
        assert_eq!(f.call(2, "", &mut rng), None);
    }

    #[test]
    fn test_json_script() {
        let script = ScriptNode::from_json(
            r#"{ "Script": { "Loop": [
                { "Script": { "Until": {
                    "sentinel": "NOTICED",
                    "child": { "Logic": { "logic": { "WaitForBoat": { "forward_max": 50.0 } } } }
                } } },
                { "Logic": { "logic": "Idle", "timeout": 3.0 } }
            ] } }"#,
        )
        .unwrap();

        let f = unwrap_fn(script.clone());
        let mut rng = DeterministicRng::new(1);
        assert!(matches!(
            f.call(0, "", &mut rng),
            Some(ScriptNode::Script(ScriptFn::Until { .. }))
        ));
        assert_eq!(
            f.call(1, "", &mut rng),
            Some(ScriptNode::Logic(LogicConfig::new(LogicParams::Idle).with_timeout(3.0)))
        );

        let reparsed = ScriptNode::from_json(&script.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, script);
    }
}
