mod cli;
mod utils;

use echoprobe::icmp::check_raw_socket_privileges;
use echoprobe::{ProbeOutcome, probe};
use std::process::ExitCode;

/// Run one probe on the blocking pool and map it to a printable outcome.
async fn run(target: String, timeout_ms: u64) -> anyhow::Result<ProbeOutcome> {
    let result = tokio::task::spawn_blocking(move || probe(&target, timeout_ms)).await?;
    Ok(ProbeOutcome::from(&result))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            utils::exit_with_error(&format!("Argument error: {}", e), 2);
        }
    };

    utils::init_logging(args.verbose);

    if !check_raw_socket_privileges() {
        log::warn!("Raw ICMP sockets are unavailable; run as root or grant CAP_NET_RAW");
    }

    let outcome = match run(args.target.clone(), args.timeout).await {
        Ok(outcome) => outcome,
        Err(e) => {
            utils::exit_with_error(&format!("Probe of {} aborted: {}", args.target, e), 1);
        }
    };

    println!("{}", utils::format_outcome(&outcome));

    // A timeout is an answer; only a failed probe is an error
    match outcome {
        ProbeOutcome::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
