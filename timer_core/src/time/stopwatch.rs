use super::{Millis, TimingRule};

/// Measures elapsed time between explicit clock readings.
///
/// Readings are passed in rather than sampled so the same stopwatch works
/// with the system clock and with a hand-driven one.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    rule: TimingRule,
    started_at: Option<f64>,
}

impl Stopwatch {
    pub fn new(rule: TimingRule) -> Self {
        Self {
            rule,
            started_at: None,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.started_at = Some(now_ms);
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Quantized milliseconds since `start`, or `None` when stopped.
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<Millis> {
        let started_at = self.started_at?;
        Some(self.rule.quantize(now_ms - started_at))
    }

    /// Final reading; the stopwatch stops.
    pub fn stop(&mut self, now_ms: f64) -> Option<Millis> {
        let elapsed = self.elapsed_ms(now_ms);
        self.started_at = None;
        elapsed
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }
}
