use crate::deadline::Deadline;
use crate::icmp::{ProbeError, RawIcmpSocket, Transport, build_echo_request, extract_reply, random_identifier};
use std::io;
use std::net::Ipv4Addr;

/// Large enough for a maximal IPv4 header plus the echoed message.
pub const RECV_BUFFER_LEN: usize = 1024;

/// A validated Echo Reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReply {
    pub source: Ipv4Addr,
    pub identifier: u16,
    /// Wall-clock time from transmission to the accepted reply.
    pub round_trip_ms: u64,
}

/// Flattened result of one probe, as handed to outer layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { round_trip_ms: u64 },
    Timeout,
    Failed(String),
}

impl ProbeOutcome {
    /// 0 on success, 1 on timeout, -1 on failure.
    pub fn status_code(&self) -> i32 {
        match self {
            ProbeOutcome::Success { .. } => 0,
            ProbeOutcome::Timeout => 1,
            ProbeOutcome::Failed(_) => -1,
        }
    }
}

impl From<&Result<ProbeReply, ProbeError>> for ProbeOutcome {
    fn from(result: &Result<ProbeReply, ProbeError>) -> Self {
        match result {
            Ok(reply) => ProbeOutcome::Success {
                round_trip_ms: reply.round_trip_ms,
            },
            Err(ProbeError::Timeout) => ProbeOutcome::Timeout,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}

/// Parse a literal dotted-quad target. The broadcast address is refused.
pub fn parse_target(target: &str) -> Result<Ipv4Addr, ProbeError> {
    let addr: Ipv4Addr = target
        .parse()
        .map_err(|_| ProbeError::InvalidInput(format!("'{}' is not an IPv4 address", target)))?;
    check_target(addr)?;
    Ok(addr)
}

fn check_target(addr: Ipv4Addr) -> Result<(), ProbeError> {
    if addr.is_broadcast() {
        return Err(ProbeError::InvalidInput(format!("refusing to probe broadcast address {}", addr)));
    }
    Ok(())
}

fn check_timeout(timeout_ms: u64) -> Result<(), ProbeError> {
    if timeout_ms == 0 {
        return Err(ProbeError::InvalidInput("timeout must be greater than 0".to_string()));
    }
    Ok(())
}

/// Send one Echo Request to `target` and wait up to `timeout_ms` for the
/// matching reply. Input is validated before any socket is opened.
pub fn probe(target: &str, timeout_ms: u64) -> Result<ProbeReply, ProbeError> {
    let addr = parse_target(target)?;
    check_timeout(timeout_ms)?;

    let mut socket = RawIcmpSocket::new().map_err(ProbeError::SocketUnavailable)?;
    let identifier = random_identifier(&mut rand::thread_rng());

    probe_with(&mut socket, addr, timeout_ms, identifier)
}

/// The probe state machine over an arbitrary transport.
///
/// The request is sent exactly once. Every datagram that is not an Echo
/// Reply carrying `identifier` from `target` is discarded and the wait is
/// re-armed with whatever budget is left.
pub fn probe_with<T: Transport>(
    transport: &mut T,
    target: Ipv4Addr,
    timeout_ms: u64,
    identifier: u16,
) -> Result<ProbeReply, ProbeError> {
    check_target(target)?;
    check_timeout(timeout_ms)?;

    let request = build_echo_request(identifier);
    let deadline = Deadline::start(timeout_ms);

    let sent = transport
        .send_to(&request, target)
        .map_err(ProbeError::SendFailed)?;
    if sent != request.len() {
        return Err(ProbeError::SendFailed(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short send: {} of {} bytes", sent, request.len()),
        )));
    }
    log::debug!(
        "Echo request {:#06x} sent to {}, waiting up to {}ms",
        identifier,
        target,
        deadline.budget_ms()
    );

    let mut buffer = [0u8; RECV_BUFFER_LEN];
    loop {
        let Some(wait) = deadline.remaining_duration() else {
            log::debug!("No reply from {} within {}ms", target, deadline.budget_ms());
            return Err(ProbeError::Timeout);
        };

        let (received, source) = match transport
            .recv_within(&mut buffer, wait)
            .map_err(ProbeError::ReceiveFailed)?
        {
            Some(datagram) => datagram,
            // Re-check the deadline; an early wake-up just waits again
            None => continue,
        };

        if received == 0 {
            return Err(ProbeError::ReceiveFailed(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "empty datagram",
            )));
        }

        let Some(reply) = extract_reply(&buffer[..received]) else {
            log::trace!("Ignoring {} byte non-echo-reply datagram from {}", received, source);
            continue;
        };

        if reply.identifier != identifier {
            log::debug!(
                "Ignoring echo reply {:#06x} seq {} from {}, expected {:#06x}",
                reply.identifier,
                reply.sequence,
                source,
                identifier
            );
            continue;
        }

        if source != target {
            log::warn!(
                "Echo reply {:#06x} came from {} (header source {}), expected {}",
                reply.identifier,
                source,
                reply.header_source,
                target
            );
            continue;
        }

        let round_trip_ms = deadline.elapsed_ms();
        if round_trip_ms > timeout_ms {
            log::debug!("Reply from {} arrived after the {}ms deadline", target, timeout_ms);
            return Err(ProbeError::Timeout);
        }

        log::debug!("Echo reply from {}: time={}ms", source, round_trip_ms);
        return Ok(ProbeReply {
            source,
            identifier,
            round_trip_ms,
        });
    }
}
