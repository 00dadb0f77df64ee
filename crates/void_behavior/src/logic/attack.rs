//! Attacks on the boat: pack-style harassment and ambush

use super::{LogicModule, LogicPhase, RESULT_ABORTED, RESULT_ATTACKED};
use crate::context::LogicContext;
use crate::steering::{LocomotionType, LogicPathResult, Steering};
use crate::strategy::{CircleFlank, SternIntercept, Strategy, VulnerableCharge};
use serde::{Deserialize, Serialize};

/// Parameters for [`WolfAttack`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WolfAttackParams {
    /// Swimming speed before the aggression multiplier
    pub speed: f32,
    /// Lateral distance held while flanking
    pub flank_radius: f32,
    /// How far ahead of the boat to flank
    pub flank_lead: f32,
    /// Seconds spent flanking before charging
    pub flank_time: f32,
    /// Distance behind the stern aimed for while intercepting
    pub stern_offset: f32,
    /// Charge speed relative to swimming speed
    pub charge_factor: f32,
    /// Snout-to-boat distance at which the attack lands
    pub attack_distance: f32,
    /// Give up beyond this distance
    pub give_up_distance: f32,
}

impl Default for WolfAttackParams {
    fn default() -> Self {
        Self {
            speed: 7.0,
            flank_radius: 10.0,
            flank_lead: 6.0,
            flank_time: 3.0,
            stern_offset: 4.0,
            charge_factor: 1.6,
            attack_distance: 2.5,
            give_up_distance: 80.0,
        }
    }
}

/// Which strategy a [`WolfAttack`] is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tactic {
    Flank,
    Intercept,
    Charge,
}

/// Flank the boat, charge it, and fall back to the stern when outpaced
pub struct WolfAttack {
    params: WolfAttackParams,
    tactic: Tactic,
    strategy: Box<dyn Strategy>,
    move_speed: f32,
    timer: f32,
}

impl WolfAttack {
    pub fn new(params: WolfAttackParams) -> Self {
        let strategy = Box::new(CircleFlank::new(
            params.flank_radius,
            params.flank_lead,
            params.speed,
        ));
        Self {
            params,
            tactic: Tactic::Flank,
            strategy,
            move_speed: 0.0,
            timer: 0.0,
        }
    }

    fn switch(&mut self, tactic: Tactic) {
        let p = &self.params;
        let strategy: Box<dyn Strategy> = match tactic {
            Tactic::Flank => {
                Box::new(CircleFlank::new(p.flank_radius, p.flank_lead, self.move_speed))
            }
            Tactic::Intercept => Box::new(SternIntercept::new(p.stern_offset, self.move_speed)),
            Tactic::Charge => Box::new(VulnerableCharge::new(
                self.move_speed * p.charge_factor,
                p.give_up_distance,
            )),
        };
        log::trace!("WolfAttack {:?} -> {:?}", self.tactic, tactic);
        self.strategy = strategy;
        self.tactic = tactic;
        self.timer = 0.0;
    }

    fn next_tactic(&self, ctx: &LogicContext<'_>) -> Option<Tactic> {
        let behind = ctx.longitudinal_offset() < 0.0;
        let aborted = self.strategy.should_abort(ctx);

        match self.tactic {
            Tactic::Flank if aborted => Some(Tactic::Intercept),
            Tactic::Flank if self.timer >= self.params.flank_time && !behind => {
                Some(Tactic::Charge)
            }
            Tactic::Intercept if aborted || !behind => Some(Tactic::Flank),
            Tactic::Charge if aborted => Some(Tactic::Flank),
            _ => None,
        }
    }
}

impl LogicModule for WolfAttack {
    fn name(&self) -> &str {
        "WolfAttack"
    }

    fn activate(&mut self, ctx: &mut LogicContext<'_>) {
        self.move_speed = self.params.speed * ctx.aggression_multiplier();
        let opening = if ctx.longitudinal_offset() < 0.0 {
            Tactic::Intercept
        } else {
            Tactic::Flank
        };
        self.switch(opening);
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let distance = ctx.distance_to_target();
        if distance > self.params.give_up_distance {
            let steering = Steering::hold(ctx.origin);
            return LogicPathResult::new(steering, LocomotionType::Water).end_with(RESULT_ABORTED);
        }

        self.timer += ctx.dt;
        if let Some(tactic) = self.next_tactic(ctx) {
            self.switch(tactic);
        }

        let result = LogicPathResult::new(self.strategy.update(ctx), LocomotionType::Water);
        if ctx.snout_distance_to_target() <= self.params.attack_distance {
            result.finish_with(RESULT_ATTACKED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        match self.tactic {
            Tactic::Flank => LogicPhase::Flanking,
            Tactic::Intercept => LogicPhase::Intercepting,
            Tactic::Charge => LogicPhase::Charging,
        }
    }
}

/// Parameters for [`AmbushAttack`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbushAttackParams {
    /// Distance at which a boat in front triggers the charge
    pub notice_distance: f32,
    /// Charge speed before the aggression multiplier
    pub speed: f32,
    /// Snout-to-boat distance at which the attack lands
    pub attack_distance: f32,
    /// Give up the charge beyond this distance
    pub give_up_distance: f32,
}

impl Default for AmbushAttackParams {
    fn default() -> Self {
        Self {
            notice_distance: 30.0,
            speed: 10.0,
            attack_distance: 2.5,
            give_up_distance: 50.0,
        }
    }
}

/// Lie still until the boat comes close in front, then charge it
#[derive(Debug, Clone)]
pub struct AmbushAttack {
    params: AmbushAttackParams,
    charge: Option<VulnerableCharge>,
}

impl AmbushAttack {
    pub fn new(params: AmbushAttackParams) -> Self {
        Self {
            params,
            charge: None,
        }
    }
}

impl LogicModule for AmbushAttack {
    fn name(&self) -> &str {
        "AmbushAttack"
    }

    fn activate(&mut self, _ctx: &mut LogicContext<'_>) {
        self.charge = None;
    }

    fn update(&mut self, ctx: &mut LogicContext<'_>) -> LogicPathResult {
        let distance = ctx.distance_to_target();
        let multiplier = ctx.aggression_multiplier();

        let Some(charge) = self.charge.as_mut() else {
            let result = LogicPathResult::new(Steering::hold(ctx.origin), LocomotionType::Water);
            let in_front = ctx.to_target().dot(ctx.forward()) >= 0.0;

            if in_front && distance <= self.params.notice_distance * multiplier {
                log::debug!("AmbushAttack sprung at {:.1}", distance);
                self.charge = Some(VulnerableCharge::new(
                    self.params.speed * multiplier,
                    self.params.give_up_distance,
                ));
            } else if ctx.longitudinal_offset() < 0.0 && distance > self.params.notice_distance {
                // The boat went by out of reach
                return result.finish_with(RESULT_ABORTED);
            }
            return result;
        };

        if charge.should_abort(ctx) {
            let steering = Steering::hold(ctx.origin);
            return LogicPathResult::new(steering, LocomotionType::Water).end_with(RESULT_ABORTED);
        }

        let result = LogicPathResult::new(charge.update(ctx), LocomotionType::Water);
        if ctx.snout_distance_to_target() <= self.params.attack_distance {
            result.finish_with(RESULT_ATTACKED)
        } else {
            result
        }
    }

    fn phase(&self) -> LogicPhase {
        if self.charge.is_some() {
            LogicPhase::Charging
        } else {
            LogicPhase::Lurking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use glam::Vec2;
    use void_physics::SimBody;

    fn boat(fixture: &mut Fixture, position: Vec2) {
        fixture.target = SimBody::dynamic()
            .with_position(position)
            .with_velocity(Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_wolf_opens_by_flanking_ahead() {
        let mut fixture = Fixture::new();
        boat(&mut fixture, Vec2::new(5.0, -10.0));

        let mut logic = WolfAttack::new(WolfAttackParams::default());
        logic.activate(&mut fixture.ctx());
        let result = logic.update(&mut fixture.ctx());

        assert_eq!(logic.phase(), LogicPhase::Flanking);
        assert_eq!(result.locomotion, LocomotionType::Water);
        assert!(!result.has_result());
    }

    #[test]
    fn test_wolf_intercepts_from_behind() {
        let mut fixture = Fixture::new();
        boat(&mut fixture, Vec2::new(0.0, 10.0));

        let mut logic = WolfAttack::new(WolfAttackParams::default());
        logic.activate(&mut fixture.ctx());
        logic.update(&mut fixture.ctx());

        assert_eq!(logic.phase(), LogicPhase::Intercepting);
    }

    #[test]
    fn test_wolf_charges_after_flanking() {
        let mut fixture = Fixture::new();
        fixture.dt = 1.0;
        boat(&mut fixture, Vec2::new(5.0, -10.0));

        let mut logic = WolfAttack::new(WolfAttackParams::default());
        logic.activate(&mut fixture.ctx());
        for _ in 0..3 {
            logic.update(&mut fixture.ctx());
        }

        assert_eq!(logic.phase(), LogicPhase::Charging);
    }

    #[test]
    fn test_wolf_attacks_in_range() {
        let mut fixture = Fixture::new();
        boat(&mut fixture, Vec2::new(1.0, -1.0));

        let mut logic = WolfAttack::new(WolfAttackParams::default());
        logic.activate(&mut fixture.ctx());
        let result = logic.update(&mut fixture.ctx());

        assert_eq!(result.result.as_deref(), Some(RESULT_ATTACKED));
        assert!(result.finish);
    }

    #[test]
    fn test_attack_range_measured_from_snout() {
        let mut fixture = Fixture::new();
        // Creature faces +x with its snout one unit ahead
        boat(&mut fixture, Vec2::new(3.2, 0.0));
        let mut logic = WolfAttack::new(WolfAttackParams::default());
        logic.activate(&mut fixture.ctx());
        let ahead = logic.update(&mut fixture.ctx());
        assert_eq!(ahead.result.as_deref(), Some(RESULT_ATTACKED));

        boat(&mut fixture, Vec2::new(-3.2, 0.0));
        let mut logic = WolfAttack::new(WolfAttackParams::default());
        logic.activate(&mut fixture.ctx());
        let behind = logic.update(&mut fixture.ctx());
        assert!(!behind.has_result());
    }

    #[test]
    fn test_ambush_springs_on_boat_in_front() {
        let mut fixture = Fixture::new();
        // Creature faces +x
        boat(&mut fixture, Vec2::new(40.0, 0.0));

        let mut logic = AmbushAttack::new(AmbushAttackParams::default());
        logic.activate(&mut fixture.ctx());
        logic.update(&mut fixture.ctx());
        assert_eq!(logic.phase(), LogicPhase::Lurking);

        boat(&mut fixture, Vec2::new(20.0, 0.0));
        logic.update(&mut fixture.ctx());
        assert_eq!(logic.phase(), LogicPhase::Charging);

        boat(&mut fixture, Vec2::new(2.0, 0.0));
        let hit = logic.update(&mut fixture.ctx());
        assert_eq!(hit.result.as_deref(), Some(RESULT_ATTACKED));
    }

    #[test]
    fn test_ambush_gives_up_when_boat_passes() {
        let mut fixture = Fixture::new();
        boat(&mut fixture, Vec2::new(-5.0, 40.0));

        let mut logic = AmbushAttack::new(AmbushAttackParams::default());
        logic.activate(&mut fixture.ctx());
        let result = logic.update(&mut fixture.ctx());

        assert_eq!(result.result.as_deref(), Some(RESULT_ABORTED));
    }
}
