//! The production gate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ralph_core::gate::Gate;
use std::sync::Mutex;

/// Uniform draws from a `StdRng`.
///
/// The RNG sits behind a `std::sync::Mutex` because [`Gate::draw`] is
/// synchronous and the lock is never held across an await.
pub struct RandomGate {
    rng: Mutex<StdRng>,
}

impl RandomGate {
    /// A gate seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// A reproducible gate.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomGate {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomGate").finish_non_exhaustive()
    }
}

impl Gate for RandomGate {
    fn draw(&self) -> f64 {
        // A poisoned lock only means another draw panicked mid-call;
        // the RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random::<f64>()
    }
}
