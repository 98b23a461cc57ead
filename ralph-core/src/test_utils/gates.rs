//! Deterministic gates.

use crate::gate::Gate;
use std::sync::Mutex;

/// A gate that always draws the same value.
///
/// `ConstGate(0.0)` admits every strategy with a positive score;
/// `ConstGate(0.999)` admits almost none.
pub struct ConstGate(pub f64);

impl Gate for ConstGate {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// A gate that replays a scripted sequence of draws, wrapping around.
pub struct SequenceGate {
    draws: Vec<f64>,
    next: Mutex<usize>,
}

impl SequenceGate {
    /// Create a gate over the given draws. An empty sequence draws `0.0`.
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws,
            next: Mutex::new(0),
        }
    }

    /// How many draws have been taken.
    pub fn draws_taken(&self) -> usize {
        *self.next.lock().unwrap()
    }
}

impl Gate for SequenceGate {
    fn draw(&self) -> f64 {
        let mut next = self.next.lock().unwrap();
        let value = if self.draws.is_empty() {
            0.0
        } else {
            self.draws[*next % self.draws.len()]
        };
        *next += 1;
        value
    }
}
