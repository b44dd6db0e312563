//! The approach state machine: one `advance` per polling tick.

use std::time::Duration;

use engine_core::{Clock, IVec2};
use input::{ControlAction, ControlSample, Levers};

use crate::config::LanderConfig;
use crate::drift::DriftSource;
use crate::gear;
use crate::outcome::Outcome;
use crate::state::{ApproachPhase, GearState, LanderSnapshot, LanderState};

/// Advances a [`LanderState`] one tick at a time from sampled controls.
///
/// Each tick runs the phase step first, then the passive updates: gear
/// animation, mother ship drift, and distance.
pub struct ApproachStateMachine<D, C> {
    config: LanderConfig,
    state: LanderState,
    drift: D,
    clock: C,
}

impl<D: DriftSource, C: Clock> ApproachStateMachine<D, C> {
    pub fn new(config: LanderConfig, drift: D, clock: C) -> Self {
        let state = LanderState::new(&config);
        Self { config, state, drift, clock }
    }

    pub fn config(&self) -> &LanderConfig {
        &self.config
    }

    pub fn state(&self) -> &LanderState {
        &self.state
    }

    pub fn snapshot(&self) -> LanderSnapshot {
        self.state.snapshot()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Outcome of the approach, once it is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_game_over()
            .then(|| Outcome::evaluate(&self.state.snapshot(), &self.config))
    }

    /// Time since the first throttle-up. Zero if the throttle was never raised.
    pub fn elapsed(&self) -> Duration {
        match self.state.approach_start {
            Some(start) => self.clock.now().saturating_sub(start),
            None => Duration::ZERO,
        }
    }

    /// Start a new game from the initial state.
    pub fn reset(&mut self) {
        log::info!("Lander reset for a new approach");
        self.state = LanderState::new(&self.config);
    }

    /// Run one tick with the sampled levers and control action.
    pub fn advance(&mut self, input: &ControlSample) -> &LanderState {
        self.step_phase(input.levers, input.action);

        self.update_gear_animation();
        self.update_drift();
        self.update_distance();

        &self.state
    }

    fn step_phase(&mut self, levers: Levers, action: ControlAction) {
        match self.state.phase {
            ApproachPhase::Init => {
                if levers.all_off() {
                    self.enter(ApproachPhase::Preflight);
                }
            }
            ApproachPhase::Preflight => {
                if levers.all_on() {
                    self.enter(ApproachPhase::InFlight);
                }
            }
            ApproachPhase::InFlight | ApproachPhase::Final => {
                self.process_controls(action);
                if self.state.phase == ApproachPhase::InFlight
                    && self.state.distance < self.config.final_approach_distance()
                {
                    self.enter(ApproachPhase::Final);
                }
            }
        }
    }

    fn enter(&mut self, phase: ApproachPhase) {
        log::info!(
            "Approach phase {} -> {} (distance {})",
            self.state.phase.label(),
            phase.label(),
            self.state.distance
        );
        self.state.phase = phase;
    }

    /// Speed, then gear, then steering. The first group that recognises the action consumes it.
    fn process_controls(&mut self, action: ControlAction) {
        if self.process_speed(action) {
            return;
        }
        if self.process_gear(action) {
            return;
        }
        self.process_steering(action);
    }

    fn process_speed(&mut self, action: ControlAction) -> bool {
        match action {
            ControlAction::RaiseSpeed => {
                self.state.speed = self.state.speed.saturating_add(1);
                if self.state.approach_start.is_none() {
                    let now = self.clock.now();
                    log::info!("First thrust at {} ms", now.as_millis());
                    self.state.approach_start = Some(now);
                }
                true
            }
            ControlAction::LowerSpeed => {
                if self.state.speed > 0 {
                    self.state.speed -= 1;
                }
                true
            }
            _ => false,
        }
    }

    fn process_gear(&mut self, action: ControlAction) -> bool {
        let down_index = self.config.gear_down_index();
        match action {
            ControlAction::LowerGear => {
                if self.state.phase == ApproachPhase::Final && self.state.gear_index != down_index {
                    self.state.gear_state = GearState::Lowering;
                }
                true
            }
            ControlAction::RaiseGear => {
                if self.state.gear_index != 0 {
                    self.state.gear_state = GearState::Raising;
                }
                true
            }
            _ => false,
        }
    }

    fn process_steering(&mut self, action: ControlAction) {
        if let Some((dx, dy)) = action.steering_delta() {
            self.state.drift += IVec2::new(dx, dy);
        }
    }

    fn update_gear_animation(&mut self) {
        let down_index = self.config.gear_down_index();
        let before = self.state.gear_state;
        self.state.gear_index = gear::next_frame(before, self.state.gear_index, down_index);
        self.state.gear_state = gear::settle(before, self.state.gear_index, down_index);
        if before != GearState::Idle && self.state.gear_state == GearState::Idle {
            log::debug!("Gear {:?} finished at frame {}", before, self.state.gear_index);
        }
    }

    fn update_drift(&mut self) {
        let step = IVec2::new(self.drift.next_delta(), self.drift.next_delta());
        let limit = IVec2::splat(self.config.max_drift);
        self.state.drift = (self.state.drift + step).clamp(-limit, limit);
    }

    fn update_distance(&mut self) {
        self.state.distance = self.state.distance.saturating_sub(self.state.speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::DriftSequence;
    use engine_core::ManualClock;

    type Machine<'c> = ApproachStateMachine<DriftSequence, &'c ManualClock>;

    const OFF: Levers = Levers { thrust: false, systems: false, confirm: false };
    const ON: Levers = Levers { thrust: true, systems: true, confirm: true };

    fn machine(clock: &ManualClock) -> Machine<'_> {
        ApproachStateMachine::new(LanderConfig::default(), DriftSequence::still(), clock)
    }

    fn tick<D: DriftSource, C: Clock>(m: &mut ApproachStateMachine<D, C>, levers: Levers, action: ControlAction) {
        m.advance(&ControlSample::new(levers, action));
    }

    /// Drive the machine into `InFlight`.
    fn launched(clock: &ManualClock) -> Machine<'_> {
        let mut m = machine(clock);
        tick(&mut m, OFF, ControlAction::Unused);
        tick(&mut m, ON, ControlAction::Unused);
        assert_eq!(m.state().phase(), ApproachPhase::InFlight);
        m
    }

    /// Drive the machine into `Final` with speed back at zero.
    fn on_final(clock: &ManualClock) -> Machine<'_> {
        let mut m = launched(clock);
        for _ in 0..10 {
            tick(&mut m, ON, ControlAction::RaiseSpeed);
        }
        while m.state().phase() != ApproachPhase::Final {
            tick(&mut m, ON, ControlAction::Unused);
        }
        while m.state().speed() > 0 {
            tick(&mut m, ON, ControlAction::LowerSpeed);
        }
        assert!(!m.is_game_over());
        m
    }

    #[test]
    fn init_moves_to_preflight_when_all_levers_off() {
        let clock = ManualClock::new();
        let mut m = machine(&clock);
        tick(&mut m, OFF, ControlAction::Unused);
        assert_eq!(m.state().phase(), ApproachPhase::Preflight);
    }

    #[test]
    fn init_waits_while_any_lever_is_on() {
        let clock = ManualClock::new();
        for levers in [Levers::new(true, false, false), Levers::new(false, true, false), Levers::new(false, false, true)] {
            let mut m = machine(&clock);
            tick(&mut m, levers, ControlAction::Unused);
            assert_eq!(m.state().phase(), ApproachPhase::Init);
        }
    }

    #[test]
    fn preflight_needs_every_lever_on() {
        let clock = ManualClock::new();
        let mut m = machine(&clock);
        tick(&mut m, OFF, ControlAction::Unused);
        tick(&mut m, Levers::new(true, true, false), ControlAction::Unused);
        assert_eq!(m.state().phase(), ApproachPhase::Preflight);
        tick(&mut m, ON, ControlAction::Unused);
        assert_eq!(m.state().phase(), ApproachPhase::InFlight);
    }

    #[test]
    fn controls_are_ignored_before_flight() {
        let clock = ManualClock::new();
        let mut m = machine(&clock);
        tick(&mut m, Levers::new(true, false, false), ControlAction::RaiseSpeed);
        tick(&mut m, OFF, ControlAction::SteerLeft);
        assert_eq!(m.state().speed(), 0);
        assert_eq!(m.state().drift(), IVec2::ZERO);
    }

    #[test]
    fn first_thrust_is_timestamped_once() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        clock.advance(Duration::from_millis(250));
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        assert_eq!(m.state().speed(), 1);
        assert_eq!(m.state().approach_start(), Some(Duration::from_millis(250)));

        clock.advance(Duration::from_millis(100));
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        tick(&mut m, ON, ControlAction::LowerSpeed);
        tick(&mut m, ON, ControlAction::LowerSpeed);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        assert_eq!(m.state().approach_start(), Some(Duration::from_millis(250)));
        clock.advance(Duration::from_millis(650));
        assert_eq!(m.elapsed(), Duration::from_millis(750));
    }

    #[test]
    fn lower_speed_floors_at_zero() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        tick(&mut m, ON, ControlAction::LowerSpeed);
        assert_eq!(m.state().speed(), 0);
        assert_eq!(m.state().approach_start(), None);
        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn distance_drops_by_speed_each_tick() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        assert_eq!(m.state().distance(), 1475);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        assert_eq!(m.state().distance(), 1473);
        tick(&mut m, ON, ControlAction::Unused);
        assert_eq!(m.state().distance(), 1471);
    }

    #[test]
    fn steering_moves_drift() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        tick(&mut m, ON, ControlAction::SteerUpLeft);
        assert_eq!(m.state().drift(), IVec2::new(1, 1));
        tick(&mut m, ON, ControlAction::SteerRight);
        tick(&mut m, ON, ControlAction::SteerRight);
        assert_eq!(m.state().drift(), IVec2::new(-1, 1));
        tick(&mut m, ON, ControlAction::SteerDown);
        assert_eq!(m.state().drift(), IVec2::new(-1, 0));
    }

    #[test]
    fn drift_is_clamped() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        for _ in 0..40 {
            tick(&mut m, ON, ControlAction::SteerDownLeft);
        }
        assert_eq!(m.state().drift(), IVec2::new(18, -18));
    }

    #[test]
    fn random_drift_runs_in_every_phase() {
        let clock = ManualClock::new();
        let mut m = ApproachStateMachine::new(LanderConfig::default(), DriftSequence::new(vec![1]), &clock);
        tick(&mut m, Levers::new(true, false, false), ControlAction::Unused);
        assert_eq!(m.state().phase(), ApproachPhase::Init);
        assert_eq!(m.state().drift(), IVec2::new(1, 1));
        for _ in 0..30 {
            tick(&mut m, Levers::new(true, false, false), ControlAction::Unused);
        }
        assert_eq!(m.state().drift(), IVec2::new(18, 18));
    }

    #[test]
    fn lower_gear_is_ignored_before_final() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        tick(&mut m, ON, ControlAction::LowerGear);
        assert_eq!(m.state().gear_state(), GearState::Idle);
        assert_eq!(m.state().gear_index(), 0);
    }

    #[test]
    fn gear_actions_consume_the_tick_even_when_refused() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        tick(&mut m, ON, ControlAction::RaiseGear);
        tick(&mut m, ON, ControlAction::LowerGear);
        assert_eq!(m.state().drift(), IVec2::ZERO);
        assert_eq!(m.state().speed(), 0);
    }

    #[test]
    fn enters_final_below_a_tenth_of_the_distance() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        for _ in 0..10 {
            tick(&mut m, ON, ControlAction::RaiseSpeed);
        }
        while m.state().phase() == ApproachPhase::InFlight {
            let before = m.state().distance();
            tick(&mut m, ON, ControlAction::Unused);
            if m.state().phase() == ApproachPhase::Final {
                assert!(before < 147);
            } else {
                assert!(before >= 147);
            }
        }
    }

    #[test]
    fn gear_lowers_over_three_ticks_on_final() {
        let clock = ManualClock::new();
        let mut m = on_final(&clock);
        tick(&mut m, ON, ControlAction::LowerGear);
        assert_eq!(m.state().gear_index(), 1);
        assert_eq!(m.state().gear_state(), GearState::Lowering);
        tick(&mut m, ON, ControlAction::Unused);
        assert_eq!(m.state().gear_index(), 2);
        tick(&mut m, ON, ControlAction::Unused);
        assert_eq!(m.state().gear_index(), 3);
        assert_eq!(m.state().gear_state(), GearState::Idle);
        tick(&mut m, ON, ControlAction::LowerGear);
        assert_eq!(m.state().gear_index(), 3);
        assert_eq!(m.state().gear_state(), GearState::Idle);
    }

    #[test]
    fn gear_raises_back_to_zero() {
        let clock = ManualClock::new();
        let mut m = on_final(&clock);
        tick(&mut m, ON, ControlAction::LowerGear);
        tick(&mut m, ON, ControlAction::Unused);
        tick(&mut m, ON, ControlAction::RaiseGear);
        assert_eq!(m.state().gear_index(), 1);
        assert_eq!(m.state().gear_state(), GearState::Raising);
        tick(&mut m, ON, ControlAction::Unused);
        assert_eq!(m.state().gear_index(), 0);
        assert_eq!(m.state().gear_state(), GearState::Idle);
    }

    #[test]
    fn invariants_hold_over_a_random_flight() {
        use crate::drift::RandomDrift;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let clock = ManualClock::new();
        let config = LanderConfig::default();
        let drift = RandomDrift::new(StdRng::seed_from_u64(7), config.drift_model);
        let mut m = ApproachStateMachine::new(config.clone(), drift, &clock);
        let mut pilot = StdRng::seed_from_u64(11);

        tick(&mut m, OFF, ControlAction::Unused);
        tick(&mut m, ON, ControlAction::Unused);

        let mut last_distance = m.state().distance();
        let mut last_phase = m.state().phase();
        for _ in 0..5_000 {
            if m.is_game_over() {
                break;
            }
            let action = ControlAction::from_code(pilot.gen_range(0..=14));
            let before_index = m.state().gear_index();
            tick(&mut m, ON, action);
            clock.advance(Duration::from_millis(100));

            let s = m.state();
            assert!(s.distance() <= last_distance);
            assert!(s.phase() >= last_phase);
            assert!(s.gear_index() <= config.gear_down_index());
            assert!(s.gear_index().abs_diff(before_index) <= 1);
            assert!(s.drift().x.abs() <= config.max_drift);
            assert!(s.drift().y.abs() <= config.max_drift);
            assert!(s.speed() >= 0);
            if s.gear_index() == 0 || s.gear_index() == config.gear_down_index() {
                assert_eq!(s.gear_state(), GearState::Idle);
            }
            last_distance = s.distance();
            last_phase = s.phase();
        }
        assert!(m.is_game_over());
        assert!(m.outcome().is_some());
    }

    #[test]
    fn outcome_only_after_game_over() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        assert_eq!(m.outcome(), None);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        while !m.is_game_over() {
            tick(&mut m, ON, ControlAction::Unused);
        }
        assert_eq!(m.outcome(), Some(Outcome::TooFast));
    }

    #[test]
    fn reset_starts_over() {
        let clock = ManualClock::new();
        let mut m = launched(&clock);
        tick(&mut m, ON, ControlAction::RaiseSpeed);
        m.reset();
        assert_eq!(*m.state(), LanderState::new(&LanderConfig::default()));
    }
}
