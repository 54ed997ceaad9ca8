use crate::probe::{ProbeOutcome, probe};

/// Arguments of a ping control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    pub ip: String,
    pub timeout_ms: u64,
}

/// Response block filled in from the probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingResult {
    /// 0 success, 1 timeout, -1 failure.
    pub status: i32,
    pub reply_time_ms: u64,
}

impl From<&ProbeOutcome> for PingResult {
    fn from(outcome: &ProbeOutcome) -> Self {
        let reply_time_ms = match outcome {
            ProbeOutcome::Success { round_trip_ms } => *round_trip_ms,
            _ => 0,
        };
        Self {
            status: outcome.status_code(),
            reply_time_ms,
        }
    }
}

pub fn execute(request: &PingRequest) -> PingResult {
    let result = probe(&request.ip, request.timeout_ms);
    if let Err(e) = &result {
        log::debug!("ping {} failed: {}", request.ip, e);
    }
    PingResult::from(&ProbeOutcome::from(&result))
}
