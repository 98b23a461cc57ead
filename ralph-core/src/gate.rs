//! The Gate interface: the Bernoulli draw in front of every strategy.

/// Source of uniform draws in `[0, 1)`.
///
/// A strategy with belief `b` is admitted iff `draw() < b`, so the
/// long-run admission rate equals `b` for any `b` in `[0, 1]`.
///
/// Implementations:
/// - `RandomGate` in `ralph-agent` (thread-safe `StdRng`)
/// - `SequenceGate` in [`crate::test_utils`] (scripted draws)
pub trait Gate: Send + Sync {
    /// Draw the next uniform value in `[0, 1)`.
    fn draw(&self) -> f64;

    /// Draw once and compare against `score`.
    fn admits(&self, score: f64) -> bool {
        self.draw() < score
    }
}
