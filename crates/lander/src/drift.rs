//! Random drift of the mother ship.

use rand::Rng;

use crate::config::DriftModel;

/// Supplies one drift step in {-1, 0, 1} per call.
pub trait DriftSource {
    fn next_delta(&mut self) -> i32;
}

impl<D: DriftSource + ?Sized> DriftSource for &mut D {
    fn next_delta(&mut self) -> i32 {
        (**self).next_delta()
    }
}

/// Drift drawn from a random number generator.
#[derive(Debug, Clone)]
pub struct RandomDrift<R> {
    rng: R,
    model: DriftModel,
}

impl<R: Rng> RandomDrift<R> {
    pub fn new(rng: R, model: DriftModel) -> Self {
        Self { rng, model }
    }

    pub fn model(&self) -> DriftModel {
        self.model
    }
}

impl<R: Rng> DriftSource for RandomDrift<R> {
    fn next_delta(&mut self) -> i32 {
        match self.model {
            DriftModel::Skewed => match self.rng.gen_range(-1..=2) {
                2 => 0,
                d => d,
            },
            DriftModel::Uniform => self.rng.gen_range(-1..=1),
        }
    }
}

/// Replays a fixed list of drift steps, repeating from the start. An empty list never drifts.
#[derive(Debug, Clone, Default)]
pub struct DriftSequence {
    deltas: Vec<i32>,
    pos: usize,
}

impl DriftSequence {
    pub fn new(deltas: Vec<i32>) -> Self {
        Self { deltas, pos: 0 }
    }

    /// A source that never drifts.
    pub fn still() -> Self {
        Self::default()
    }
}

impl DriftSource for DriftSequence {
    fn next_delta(&mut self) -> i32 {
        if self.deltas.is_empty() {
            return 0;
        }
        let d = self.deltas[self.pos % self.deltas.len()];
        self.pos = self.pos.wrapping_add(1);
        d.clamp(-1, 1)
    }
}
