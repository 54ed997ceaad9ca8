//! Single-shot ICMP echo probe for IPv4 targets.
//!
//! [`probe`] sends one Echo Request over a raw socket and waits, up to the
//! given timeout, for the reply carrying the same identifier from the probed
//! address. Raw sockets need root or `CAP_NET_RAW`.

pub mod deadline;
pub mod devctl;
pub mod icmp;
pub mod probe;

pub use icmp::ProbeError;
pub use probe::{ProbeOutcome, ProbeReply, probe, probe_with};
