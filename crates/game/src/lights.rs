//! Cabin lights: blink in counted groups (4, 3, 2, 1), then rest.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing of the blink demo, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkConfig {
    /// Blinks per group, in order.
    #[serde(default = "default_groups")]
    pub groups: Vec<u32>,
    #[serde(default = "default_on_ms")]
    pub on_ms: u64,
    #[serde(default = "default_off_ms")]
    pub off_ms: u64,
    /// Pause between two groups.
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
    /// Pause after the last group.
    #[serde(default = "default_rest_ms")]
    pub rest_ms: u64,
}

fn default_groups() -> Vec<u32> {
    vec![4, 3, 2, 1]
}
fn default_on_ms() -> u64 {
    1000
}
fn default_off_ms() -> u64 {
    500
}
fn default_gap_ms() -> u64 {
    3000
}
fn default_rest_ms() -> u64 {
    3600 * 1000
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            on_ms: default_on_ms(),
            off_ms: default_off_ms(),
            gap_ms: default_gap_ms(),
            rest_ms: default_rest_ms(),
        }
    }
}

/// One entry of the schedule: hold the light `on` (or off) for `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightStep {
    pub on: bool,
    pub duration: Duration,
}

impl LightStep {
    fn on(ms: u64) -> Self {
        Self { on: true, duration: Duration::from_millis(ms) }
    }

    fn off(ms: u64) -> Self {
        Self { on: false, duration: Duration::from_millis(ms) }
    }
}

/// Something that can be switched on and off.
pub trait Light {
    fn set(&mut self, on: bool);
}

/// A light that reports its changes to the log.
#[derive(Debug, Default)]
pub struct LoggedLight {
    pub lit: bool,
    pub switches: u32,
}

impl Light for LoggedLight {
    fn set(&mut self, on: bool) {
        if on != self.lit {
            self.switches += 1;
        }
        self.lit = on;
        log::info!("Cabin lights {}", if on { "ON" } else { "OFF" });
    }
}

/// The full on/off schedule for one cycle of the demo.
#[derive(Debug, Clone)]
pub struct BlinkPattern {
    steps: Vec<LightStep>,
}

impl BlinkPattern {
    pub fn new(config: &BlinkConfig) -> Self {
        let mut steps = Vec::new();
        for (i, &count) in config.groups.iter().enumerate() {
            if i > 0 {
                steps.push(LightStep::off(config.gap_ms));
            }
            for _ in 0..count {
                steps.push(LightStep::on(config.on_ms));
                steps.push(LightStep::off(config.off_ms));
            }
        }
        steps.push(LightStep::off(config.rest_ms));
        Self { steps }
    }

    pub fn steps(&self) -> &[LightStep] {
        &self.steps
    }

    /// Length of one full cycle.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn blink_count(&self) -> usize {
        self.steps.iter().filter(|s| s.on).count()
    }

    /// Play the schedule on `light`. `wait` is called with each step's duration.
    pub fn play<L, W>(&self, light: &mut L, mut wait: W)
    where
        L: Light,
        W: FnMut(Duration),
    {
        for step in &self.steps {
            light.set(step.on);
            wait(step.duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_counts_down() {
        let pattern = BlinkPattern::new(&BlinkConfig::default());
        assert_eq!(pattern.blink_count(), 10);
        // 10 blinks of 1.5 s, three 3 s gaps, one hour of rest.
        assert_eq!(pattern.total_duration(), Duration::from_millis(10 * 1500 + 3 * 3000 + 3_600_000));
    }

    #[test]
    fn groups_are_separated_by_gaps() {
        let config = BlinkConfig { groups: vec![2, 1], ..BlinkConfig::default() };
        let pattern = BlinkPattern::new(&config);
        let ms: Vec<(bool, u128)> = pattern.steps().iter().map(|s| (s.on, s.duration.as_millis())).collect();
        assert_eq!(
            ms,
            vec![
                (true, 1000),
                (false, 500),
                (true, 1000),
                (false, 500),
                (false, 3000),
                (true, 1000),
                (false, 500),
                (false, 3_600_000),
            ]
        );
    }

    #[test]
    fn play_drives_the_light() {
        let config = BlinkConfig { groups: vec![3], ..BlinkConfig::default() };
        let pattern = BlinkPattern::new(&config);
        let mut light = LoggedLight::default();
        let mut waited = Duration::ZERO;
        pattern.play(&mut light, |d| waited += d);
        assert_eq!(light.switches, 6);
        assert!(!light.lit);
        assert_eq!(waited, pattern.total_duration());
    }
}
