//! The poll loop: sample the panel, advance the lander, render, repeat.

use std::time::Duration;

use engine_core::{Clock, TickTimer};
use input::ControlInputSource;
use lander::{ApproachStateMachine, DriftSource, LanderSnapshot, Outcome};

use crate::hud::{CockpitView, Ending, PresentationSink};

/// Result of a completed approach.
#[derive(Debug, Clone, Copy)]
pub struct SessionReport {
    pub outcome: Outcome,
    /// Time from the first throttle-up to arrival.
    pub elapsed: Duration,
    pub ticks: u64,
    pub final_state: LanderSnapshot,
}

#[derive(Debug, Clone, Copy)]
pub enum SessionEnd {
    /// The lander reached the mother ship.
    Landed(SessionReport),
    /// The tick limit ran out first.
    Aborted { ticks: u64, last_state: LanderSnapshot },
}

/// Run ticks until the lander arrives or `max_ticks` is reached.
///
/// `wait` is handed the time left before the next tick is due; pass a no-op to run flat out.
pub fn run_approach<D, C, I, P, W>(
    machine: &mut ApproachStateMachine<D, C>,
    input: &mut I,
    sink: &mut P,
    timer: &mut TickTimer,
    max_ticks: u64,
    mut wait: W,
) -> SessionEnd
where
    D: DriftSource,
    C: Clock,
    I: ControlInputSource,
    P: PresentationSink,
    W: FnMut(Duration),
{
    log::info!(
        "Approach started: distance {}, tick every {} ms",
        machine.state().distance(),
        timer.period().as_millis()
    );

    let mut ticks = 0;
    while ticks < max_ticks {
        wait(timer.until_next_tick(machine.clock().now()));
        timer.mark_tick(machine.clock().now());

        let sample = input.sample();
        let lander = machine.advance(&sample).snapshot();
        ticks += 1;
        sink.render(&CockpitView { lander, levers: sample.levers });

        if let Some(outcome) = machine.outcome() {
            let report = SessionReport {
                outcome,
                elapsed: machine.elapsed(),
                ticks,
                final_state: lander,
            };
            log::info!("Game over after {} ticks: {:?}", ticks, outcome);
            sink.game_over(&Ending { outcome, elapsed: report.elapsed, lander });
            return SessionEnd::Landed(report);
        }
    }

    log::warn!("Approach aborted after {} ticks without arriving", ticks);
    SessionEnd::Aborted { ticks, last_state: machine.snapshot() }
}
