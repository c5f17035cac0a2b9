use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use atomic_float::AtomicF64;
use chrono::{Datelike, Local, NaiveDate};

pub trait Clock {
    /// Monotonic milliseconds from an arbitrary origin.
    fn now_ms(&self) -> f64;

    /// The player's local calendar date.
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock advanced by hand. Clones share the same time source, so a driver
/// can keep one handle while the session owns another.
#[derive(Clone)]
pub struct ManualClock {
    now_ms: Arc<AtomicF64>,
    day: Arc<AtomicI32>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            now_ms: Arc::new(AtomicF64::new(0.0)),
            day: Arc::new(AtomicI32::new(today.num_days_from_ce())),
        }
    }

    pub fn set_ms(&self, ms: f64) {
        self.now_ms.store(ms, Ordering::Release);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now_ms.fetch_add(ms, Ordering::AcqRel);
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.day.store(today.num_days_from_ce(), Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.load(Ordering::Acquire)
    }

    fn today(&self) -> NaiveDate {
        let days = self.day.load(Ordering::Acquire);
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or_default()
    }
}
