use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use rand::Rng;
use std::io::Cursor;
use std::net::Ipv4Addr;

pub const ICMP_ECHO_REQUEST: u8 = 8;
pub const ICMP_ECHO_REPLY: u8 = 0;

pub const ICMP_HEADER_LEN: usize = 8;
pub const ECHO_PAYLOAD_LEN: usize = 56;
pub const ECHO_REQUEST_LEN: usize = ICMP_HEADER_LEN + ECHO_PAYLOAD_LEN;

const IPV4_MIN_HEADER_LEN: usize = 20;

// Field offsets inside the ICMP message
const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;
const IDENTIFIER_OFFSET: usize = 4;
const SEQUENCE_OFFSET: usize = 6;

/// Identity fields of an Echo Reply found inside a received IPv4 datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReply {
    pub identifier: u16,
    pub sequence: u16,
    /// Source field of the outer IP header. Matching uses the address the
    /// socket reports instead; this is only logged.
    pub header_source: Ipv4Addr,
}

/// Draw a non-zero identifier from the supplied random source.
pub fn random_identifier<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.gen_range(1..=u16::MAX)
}

/// Serialize an Echo Request with sequence 0 and the fixed filler payload.
pub fn build_echo_request(identifier: u16) -> [u8; ECHO_REQUEST_LEN] {
    let mut packet = [0u8; ECHO_REQUEST_LEN];

    // 'a', 'b', 'c', ... terminated by a NUL in the last byte
    let payload = &mut packet[ICMP_HEADER_LEN..];
    let last = payload.len() - 1;
    for (i, byte) in payload[..last].iter_mut().enumerate() {
        *byte = b'a'.wrapping_add(i as u8);
    }

    packet[TYPE_OFFSET] = ICMP_ECHO_REQUEST;
    packet[CODE_OFFSET] = 0;
    BigEndian::write_u16(&mut packet[IDENTIFIER_OFFSET..], identifier);
    BigEndian::write_u16(&mut packet[SEQUENCE_OFFSET..], 0);

    let sum = checksum(&packet);
    BigEndian::write_u16(&mut packet[CHECKSUM_OFFSET..], sum);
    packet
}

/// RFC 1071 Internet checksum over big-endian 16-bit words.
pub fn checksum(data: &[u8]) -> u16 {
    let mut words = data.chunks_exact(2);
    let mut sum: u32 = words
        .by_ref()
        .map(|w| BigEndian::read_u16(w) as u32)
        .fold(0, |acc, w| fold_carry(acc + w));

    // Odd trailing byte is padded with a zero low byte
    if let [last] = words.remainder() {
        sum = fold_carry(sum + ((*last as u32) << 8));
    }

    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !(sum as u16)
}

fn fold_carry(sum: u32) -> u32 {
    (sum & 0xFFFF) + (sum >> 16)
}

/// True when `data` already carries a correct checksum.
pub fn verify_checksum(data: &[u8]) -> bool {
    checksum(data) == 0
}

/// Locate the ICMP message behind the IPv4 header and return its identity
/// fields if it is an Echo Reply. Anything else is silently `None`.
pub fn extract_reply(datagram: &[u8]) -> Option<EchoReply> {
    if datagram.len() < IPV4_MIN_HEADER_LEN {
        return None;
    }

    let version = datagram[0] >> 4;
    let header_len = ((datagram[0] & 0x0F) as usize) * 4;
    if version != 4 || header_len < IPV4_MIN_HEADER_LEN {
        return None;
    }

    let icmp = datagram.get(header_len..)?;
    if icmp.len() < ICMP_HEADER_LEN {
        return None;
    }

    let mut cursor = Cursor::new(icmp);
    let icmp_type = cursor.read_u8().ok()?;
    if icmp_type != ICMP_ECHO_REPLY {
        return None;
    }
    cursor.set_position(IDENTIFIER_OFFSET as u64);
    let identifier = cursor.read_u16::<BigEndian>().ok()?;
    let sequence = cursor.read_u16::<BigEndian>().ok()?;

    let header_source = Ipv4Addr::new(datagram[12], datagram[13], datagram[14], datagram[15]);

    Some(EchoReply {
        identifier,
        sequence,
        header_source,
    })
}
