//! Exploration Lander - keypad and lever driven lunar lander approach, plus the small panel demos.

mod config;
mod hud;
mod lights;
mod session;

use std::io::Read;

use anyhow::{Context, Result};
use engine_core::{MonotonicClock, TickTimer};
use input::{read_word, ScriptedInput};
use lander::{ApproachStateMachine, RandomDrift};
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::{Demo, GameConfig};
use hud::{LogTelemetry, TextCockpit};
use lights::{BlinkPattern, LoggedLight};
use session::{run_approach, SessionEnd};

fn run_lander(config: &GameConfig) -> Result<()> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let drift = RandomDrift::new(rng, config.lander.drift_model);
    let mut machine = ApproachStateMachine::new(config.lander.clone(), drift, MonotonicClock::new());

    let mut pilot = match &config.script {
        Some(path) => ScriptedInput::from_path(path)
            .with_context(|| format!("loading pilot script {}", path.display()))?,
        None => {
            log::info!("No pilot script configured, flying the built-in approach");
            ScriptedInput::builtin_approach()
        }
    };

    let mut sink = (
        TextCockpit::stdout(config.lander.clone(), config.realtime),
        LogTelemetry::default(),
    );
    let mut timer = TickTimer::from_millis(config.tick_ms);
    let realtime = config.realtime;

    let end = run_approach(&mut machine, &mut pilot, &mut sink, &mut timer, config.max_ticks, |d| {
        if realtime && !d.is_zero() {
            std::thread::sleep(d);
        }
    });

    match end {
        SessionEnd::Landed(report) => {
            println!(
                "{} ({} ticks,{}, final speed {})",
                report.outcome.headline(),
                report.ticks,
                hud::format_elapsed(report.elapsed),
                report.final_state.speed
            );
        }
        SessionEnd::Aborted { ticks, last_state } => {
            println!(
                "Approach aborted after {} ticks, {} from the mother ship.",
                ticks, last_state.distance
            );
        }
    }
    Ok(())
}

fn run_cabin_lights(config: &GameConfig) {
    let pattern = BlinkPattern::new(&config.lights);
    log::info!(
        "Cabin lights: {} blinks, cycle of {:.1} s",
        pattern.blink_count(),
        pattern.total_duration().as_secs_f32()
    );
    let mut light = LoggedLight::default();
    let realtime = config.realtime;
    pattern.play(&mut light, |d| {
        if realtime {
            std::thread::sleep(d);
        }
    });
}

fn run_keypad_words(config: &GameConfig) -> Result<()> {
    println!("Type keys (1-9, 0, *, A-D); '#' ends a word.");
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading keys from stdin")?;
    let mut keys = text.chars().filter(|c| !c.is_whitespace());
    while let Some(word) = read_word(&mut keys, config.max_word_length) {
        println!("{word}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if std::env::args().any(|a| a == "--write-config") {
        GameConfig::default().save();
        println!("Wrote default config.ron");
        return Ok(());
    }

    let config = GameConfig::load();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                 EXPLORATION LANDER                   ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  LEVERS:  thrust / systems / confirm                 ║");
    println!("║    all OFF to begin, all ON to launch                ║");
    println!("║  KEYPAD:                                             ║");
    println!("║    1 2 3  steer        A  lower gear (final only)    ║");
    println!("║    4   6  steer        B  raise gear                 ║");
    println!("║    7 8 9  steer        C  speed up   D  slow down    ║");
    println!("╚══════════════════════════════════════════════════════╝");

    log::info!("Starting demo {:?} (tick {} ms)", config.demo, config.tick_ms);

    match config.demo {
        Demo::Lander => run_lander(&config)?,
        Demo::CabinLights => run_cabin_lights(&config),
        Demo::KeypadWords => run_keypad_words(&config)?,
    }

    Ok(())
}
