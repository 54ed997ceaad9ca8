use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::mem::MaybeUninit;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// Datagram I/O the probe loop needs from an ICMP endpoint.
pub trait Transport {
    /// Send one datagram to `target`, returning the number of bytes written.
    fn send_to(&mut self, packet: &[u8], target: Ipv4Addr) -> io::Result<usize>;

    /// Block for at most `wait` for the next datagram. `Ok(None)` means the
    /// wait expired with nothing to read.
    fn recv_within(&mut self, buf: &mut [u8], wait: Duration) -> io::Result<Option<(usize, Ipv4Addr)>>;
}

/// Raw IPv4 ICMP socket. Received datagrams include the IP header.
/// The descriptor is closed when this value is dropped.
pub struct RawIcmpSocket {
    socket: Socket,
}

impl RawIcmpSocket {
    pub fn new() -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.set_nonblocking(false)?;
        Ok(Self { socket })
    }
}

impl Transport for RawIcmpSocket {
    fn send_to(&mut self, packet: &[u8], target: Ipv4Addr) -> io::Result<usize> {
        let addr = SocketAddr::V4(SocketAddrV4::new(target, 0));
        log::debug!("Sending ICMP packet to {}: {} bytes", target, packet.len());
        self.socket.send_to(packet, &addr.into())
    }

    fn recv_within(&mut self, buf: &mut [u8], wait: Duration) -> io::Result<Option<(usize, Ipv4Addr)>> {
        // A zero timeout would mean "block forever"
        if wait.is_zero() {
            return Ok(None);
        }
        self.socket.set_read_timeout(Some(wait))?;

        let mut scratch = vec![MaybeUninit::<u8>::uninit(); buf.len()];
        let (received, from) = match self.socket.recv_from(&mut scratch) {
            Ok(result) => result,
            Err(e) if wait_ended_early(&e) => return Ok(None),
            Err(e) => return Err(e),
        };

        for (dst, src) in buf.iter_mut().zip(&scratch[..received]) {
            // SAFETY: recv_from initialized the first `received` bytes
            *dst = unsafe { src.assume_init() };
        }

        // Raw IPv4 sockets only ever report IPv4 peers
        let source = from
            .as_socket_ipv4()
            .map(|addr| *addr.ip())
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        log::trace!("Received {} bytes from {}", received, source);

        Ok(Some((received, source)))
    }
}

/// Errors that end a wait without anything to read: the receive timeout
/// fired, or a signal interrupted the call.
fn wait_ended_early(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Whether this process may open raw ICMP sockets.
pub fn check_raw_socket_privileges() -> bool {
    RawIcmpSocket::new().is_ok()
}
