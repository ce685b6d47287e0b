use super::wire::{HEADER_LEN, MAX_UDP_PAYLOAD};

/// TTL of the synthetic answer for blocked names.
pub const BLOCK_TTL: u32 = 300;

const FLAGS_QR_AA: u16 = 0x8400;

/// Answer record: name pointer to offset 12, type A, class IN, TTL, 0.0.0.0.
const fn block_answer() -> [u8; 16] {
    let ttl = BLOCK_TTL.to_be_bytes();
    [
        0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, ttl[0], ttl[1], ttl[2], ttl[3], 0x00, 0x04, 0x00,
        0x00, 0x00, 0x00,
    ]
}

const BLOCK_ANSWER: [u8; 16] = block_answer();

pub const BLOCK_ANSWER_LEN: usize = BLOCK_ANSWER.len();

/// Rewrites the query in `buf` into an authoritative 0.0.0.0 answer.
///
/// Anything after `question_end` is overwritten; authority and additional
/// counts are cleared since those sections are discarded. Returns the reply
/// length, or `None` when the reply would exceed `buf` or the UDP payload
/// limit, in which case `buf` is left untouched.
pub fn write_block_response(buf: &mut [u8], question_end: usize) -> Option<usize> {
    let end = question_end.checked_add(BLOCK_ANSWER_LEN)?;
    if question_end < HEADER_LEN || end > buf.len() || end > MAX_UDP_PAYLOAD {
        return None;
    }

    let flags = u16::from_be_bytes([buf[2], buf[3]]) | FLAGS_QR_AA;
    buf[2..4].copy_from_slice(&flags.to_be_bytes());
    buf[4..6].copy_from_slice(&1u16.to_be_bytes());
    buf[6..8].copy_from_slice(&1u16.to_be_bytes());
    buf[8..12].fill(0);
    buf[question_end..end].copy_from_slice(&BLOCK_ANSWER);
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::wire::{build_query, parse_query};

    fn query_buffer(domain: &str) -> ([u8; MAX_UDP_PAYLOAD], usize, usize) {
        let query = build_query(0x4242, domain, 1);
        let question_end = parse_query(&query).unwrap().question_end;
        let mut buf = [0u8; MAX_UDP_PAYLOAD];
        buf[..query.len()].copy_from_slice(&query);
        (buf, query.len(), question_end)
    }

    #[test]
    fn test_block_response_layout() {
        let (mut buf, _, question_end) = query_buffer("ads.example.com");

        let len = write_block_response(&mut buf, question_end).unwrap();
        let reply = &buf[..len];

        assert_eq!(len, question_end + 16);
        assert_eq!(&reply[..2], &[0x42, 0x42]);
        assert_eq!(reply[2] & 0x84, 0x84);
        assert_eq!(&reply[6..8], &[0, 1]);
        assert_eq!(&reply[8..12], &[0, 0, 0, 0]);
        let answer = &reply[question_end..];
        assert_eq!(&answer[..6], &[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01]);
        assert_eq!(&answer[6..10], &300u32.to_be_bytes());
        assert_eq!(&answer[10..], &[0x00, 0x04, 0, 0, 0, 0]);
    }

    #[test]
    fn test_preserves_recursion_desired() {
        let (mut buf, _, question_end) = query_buffer("ads.example.com");

        write_block_response(&mut buf, question_end).unwrap();

        assert_eq!(buf[2], 0x85);
    }

    #[test]
    fn test_discards_additional_section() {
        let (mut buf, len, question_end) = query_buffer("ads.example.com");
        buf[11] = 1;
        buf[len..len + 11].copy_from_slice(&[0, 0, 0x29, 0x10, 0, 0, 0, 0, 0, 0, 0]);

        let reply_len = write_block_response(&mut buf, question_end).unwrap();

        assert_eq!(buf[11], 0);
        assert_eq!(reply_len, question_end + BLOCK_ANSWER_LEN);
    }

    #[test]
    fn test_refuses_when_answer_does_not_fit() {
        let mut buf = [0u8; MAX_UDP_PAYLOAD];
        assert_eq!(write_block_response(&mut buf, MAX_UDP_PAYLOAD - 15), None);
        assert_eq!(write_block_response(&mut buf[..40], 30), None);
        assert_eq!(write_block_response(&mut buf, 4), None);
        assert!(write_block_response(&mut buf, MAX_UDP_PAYLOAD - 16).is_some());
    }
}
