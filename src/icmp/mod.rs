pub mod packet;
pub mod socket;

pub use packet::*;
pub use socket::*;

use std::io;

/// Why a probe did not produce a validated reply.
#[derive(Debug)]
pub enum ProbeError {
    /// Bad address string, broadcast target or zero timeout. No socket was opened.
    InvalidInput(String),
    /// The raw socket could not be created, usually for lack of privilege.
    SocketUnavailable(io::Error),
    SendFailed(io::Error),
    ReceiveFailed(io::Error),
    /// No matching reply before the deadline.
    Timeout,
}

impl ProbeError {
    /// True for "no reply", false for "could not probe".
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout)
    }
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::InvalidInput(reason) => write!(f, "Invalid input: {}", reason),
            ProbeError::SocketUnavailable(e) => write!(
                f,
                "Failed to create raw socket: {}. Root or CAP_NET_RAW may be required.",
                e
            ),
            ProbeError::SendFailed(e) => write!(f, "Failed to send echo request: {}", e),
            ProbeError::ReceiveFailed(e) => write!(f, "Failed to receive echo reply: {}", e),
            ProbeError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::SocketUnavailable(e)
            | ProbeError::SendFailed(e)
            | ProbeError::ReceiveFailed(e) => Some(e),
            ProbeError::InvalidInput(_) | ProbeError::Timeout => None,
        }
    }
}
