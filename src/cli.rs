use clap::{Arg, ArgAction, ArgMatches, Command};

pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeArgs {
    pub target: String,
    pub timeout: u64,
    pub verbose: bool,
}

impl Default for ProbeArgs {
    fn default() -> Self {
        Self {
            target: String::new(),
            timeout: DEFAULT_TIMEOUT_MS,
            verbose: false,
        }
    }
}

pub fn build_cli() -> Command {
    Command::new("echoprobe")
        .version("0.1.0")
        .about("Send one ICMP echo request to an IPv4 address and report the reply")
        .arg(
            Arg::new("target")
                .help("Target IPv4 address (dotted quad)")
                .required(true)
                .index(1)
        )
        .arg(
            Arg::new("timeout")
                .short('w')
                .help("Timeout in milliseconds to wait for the reply")
                .value_name("timeout")
                .value_parser(clap::value_parser!(u64))
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log probe progress to stderr")
                .action(ArgAction::SetTrue)
        )
}

pub fn parse_args() -> anyhow::Result<ProbeArgs> {
    args_from_matches(&build_cli().get_matches())
}

fn args_from_matches(matches: &ArgMatches) -> anyhow::Result<ProbeArgs> {
    let mut args = ProbeArgs::default();

    args.target = matches
        .get_one::<String>("target")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing target address"))?;
    args.verbose = matches.get_flag("verbose");

    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        args.timeout = *timeout;
    }

    Ok(args)
}
