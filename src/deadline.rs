use std::time::{Duration, Instant};

/// Remaining budget in milliseconds for a wait that began at `start`.
/// Goes negative once the budget is overrun.
pub fn remaining(start: Instant, budget_ms: u64) -> i64 {
    let budget = i64::try_from(budget_ms).unwrap_or(i64::MAX);
    let elapsed = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);
    budget.saturating_sub(elapsed)
}

/// Monotonic deadline for one probe.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget_ms: u64,
}

impl Deadline {
    pub fn start(budget_ms: u64) -> Self {
        Self::starting_at(Instant::now(), budget_ms)
    }

    pub fn starting_at(start: Instant, budget_ms: u64) -> Self {
        Self { start, budget_ms }
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn remaining_ms(&self) -> i64 {
        remaining(self.start, self.budget_ms)
    }

    /// `None` once the budget is spent.
    pub fn remaining_duration(&self) -> Option<Duration> {
        let left = self.remaining_ms();
        (left > 0).then(|| Duration::from_millis(left as u64))
    }
}
