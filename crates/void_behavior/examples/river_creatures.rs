//! River creatures demo
//!
//! A boat travels down a gently curving river past three creatures:
//! - a crocodile that waits on the bank, slides in and hunts the boat
//! - a bird that wanders, buzzes the boat and lands on the shore
//! - a lurker that ambushes from the water
//!
//! Run with `RUST_LOG=debug` to see every hand-off.

use glam::Vec3;
use void_behavior::prelude::*;
use void_behavior::script::{looped, sequence, until};
use void_physics::{PhysicsBody, SimBody, Vec2};

const DT: f32 = 1.0 / 30.0;
const SECONDS: f32 = 40.0;

/// Entity that narrates what its creature is doing
struct Narrator {
    name: &'static str,
    height: f32,
    clock: f32,
}

impl CreatureEntity for Narrator {
    fn handle_behavior_event(&mut self, event: &BehaviorEvent) {
        match event {
            BehaviorEvent::LogicStarting {
                logic,
                phase,
                duration,
            } => match duration {
                Some(d) => println!(
                    "[{:6.2}s] {:<9} starts {logic} ({phase:?}, ~{d:.1}s)",
                    self.clock, self.name
                ),
                None => println!(
                    "[{:6.2}s] {:<9} starts {logic} ({phase:?})",
                    self.clock, self.name
                ),
            },
            BehaviorEvent::LogicTick { logic, phase } => {
                println!("[{:6.2}s] {:<9}   {logic} -> {phase:?}", self.clock, self.name)
            }
            BehaviorEvent::LogicFinished { logic, result } => {
                println!("[{:6.2}s] {:<9} {logic} finished: {result}", self.clock, self.name)
            }
            BehaviorEvent::ScriptFinished => {
                println!("[{:6.2}s] {:<9} is done", self.clock, self.name)
            }
            BehaviorEvent::ScriptAborted => {
                println!("[{:6.2}s] {:<9} gave up its script", self.clock, self.name)
            }
        }
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_explicit_position(&mut self, height: f32, _normal: Vec3) {
        self.height = height;
    }
}

struct Creature {
    behavior: Behavior,
    body: SimBody,
    entity: Narrator,
}

impl Creature {
    fn new(
        name: &'static str,
        behavior: Behavior,
        position: Vec2,
        angle: f32,
        river: &StraightRiver,
    ) -> Self {
        Self {
            behavior,
            body: SimBody::dynamic().with_position(position).with_angle(angle),
            entity: Narrator {
                name,
                height: river.ground_height(position),
                clock: 0.0,
            },
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("River Creatures Demo");
    println!("====================\n");

    let river = StraightRiver::new(-15.0, 15.0).with_slope(0.05);
    let registry = Arc::new(LogicRegistry::with_builtins());
    println!("Registered logics: {}\n", registry.names().join(", "));

    let crocodile = sequence(vec![
        until(RESULT_NOTICED, None, LogicParams::WaitForBoat(WaitForBoatParams::default())),
        LogicParams::EnteringWater(EnteringWaterParams {
            jump_height: Some(1.5),
            ..Default::default()
        })
        .into(),
        LogicConfig::new(LogicParams::WolfAttack(WolfAttackParams::default()))
            .with_timeout(15.0)
            .into(),
        LogicParams::SwimAway(SwimAwayParams::default()).into(),
    ]);

    let bird = looped(vec![
        LogicParams::Wandering(WanderingParams {
            duration: 4.0,
            ..Default::default()
        })
        .into(),
        LogicParams::BuzzBoat(BuzzBoatParams::default()).into(),
        LogicParams::ShoreLanding(ShoreLandingParams::default()).into(),
        LogicParams::Delay(DelayParams {
            duration: 2.0,
            ..Default::default()
        })
        .into(),
    ]);

    let lurker = sequence(vec![
        LogicParams::AmbushAttack(AmbushAttackParams::default()).into(),
        LogicParams::SwimBackInRange(SwimBackInRangeParams::default()).into(),
    ]);

    let config = BehaviorConfig::default();
    let mut creatures = vec![
        Creature::new(
            "crocodile",
            Behavior::new(registry.clone(), crocodile, config.clone().with_seed(1))
                .with_aggressiveness(0.4),
            Vec2::new(-22.0, 60.0),
            0.0,
            &river,
        ),
        Creature::new(
            "bird",
            Behavior::new(registry.clone(), bird, config.clone().with_seed(2)),
            Vec2::new(20.0, 30.0),
            std::f32::consts::PI,
            &river,
        ),
        Creature::new(
            "lurker",
            Behavior::new(registry, lurker, config.with_seed(3)).with_aggressiveness(0.8),
            Vec2::new(5.0, 110.0),
            -std::f32::consts::FRAC_PI_2,
            &river,
        ),
    ];

    let mut boat = SimBody::dynamic()
        .with_position(Vec2::new(0.0, 0.0))
        .with_angle(std::f32::consts::FRAC_PI_2)
        .with_velocity(Vec2::new(0.0, 4.0));

    let steps = (SECONDS / DT) as usize;
    for step in 0..steps {
        let clock = step as f32 * DT;

        // Keep the boat in the middle of the drifting channel
        let center = river.bank_positions(boat.position().y).center();
        boat.set_linear_velocity(Vec2::new((center - boat.position().x) * 0.5, 4.0));

        for creature in creatures.iter_mut() {
            creature.entity.clock = clock;
            creature.behavior.update(
                DT,
                Some(&mut creature.body),
                Some(&boat),
                &river,
                &mut creature.entity,
            );
            creature.body.step(DT);
        }
        boat.step(DT);
    }

    println!("\nAfter {SECONDS:.0}s:");
    for creature in &creatures {
        let position = creature.body.position();
        println!(
            "  {:<9} at ({:6.1}, {:6.1}) height {:5.2}, {:?}, logic {}",
            creature.entity.name,
            position.x,
            position.y,
            creature.entity.height,
            creature.behavior.locomotion_mode(),
            creature.behavior.current_logic().unwrap_or("none"),
        );
    }
}
