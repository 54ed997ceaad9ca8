use echoprobe::ProbeOutcome;
use std::process;

/// Enable logging when RUST_LOG is set, or at debug level for --verbose
pub fn init_logging(verbose: bool) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else if verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }
}

/// Print error message and exit with error code
pub fn exit_with_error(message: &str, code: i32) -> ! {
    eprintln!("echoprobe: {}", message);
    process::exit(code);
}

/// One-line rendering of a probe outcome
pub fn format_outcome(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Success { round_trip_ms } => format!("ok: time={}ms", round_trip_ms),
        ProbeOutcome::Timeout => "timeout".to_string(),
        ProbeOutcome::Failed(reason) => format!("unreachable: {}", reason),
    }
}
