use airgate_domain::normalize_domain;
use thiserror::Error;

pub const HEADER_LEN: usize = 12;
/// Largest DNS message handled over UDP, request or response.
pub const MAX_UDP_PAYLOAD: usize = 512;

const MAX_LABEL_LEN: usize = 63;
const QR_BIT: u16 = 0x8000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("message shorter than the DNS header")]
    Truncated,
    #[error("message is a response")]
    NotQuery,
    #[error("unsupported opcode {0}")]
    UnsupportedOpcode(u8),
    #[error("no question")]
    NoQuestion,
    #[error("malformed question name")]
    BadName,
    #[error("question type/class missing")]
    MissingQuestionFields,
}

/// A validated standard query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub id: u16,
    /// Normalized first question name.
    pub domain: String,
    /// Offset just past the first question's QTYPE/QCLASS.
    pub question_end: usize,
}

/// Validates `buf` as a standard query and extracts its first question.
///
/// Label bytes are read only after their length has been checked against
/// the buffer, and compression pointers are rejected because a question name
/// never needs them.
pub fn parse_query(buf: &[u8]) -> Result<ParsedQuery, WireError> {
    if buf.len() < HEADER_LEN {
        return Err(WireError::Truncated);
    }

    let flags = u16::from_be_bytes([buf[2], buf[3]]);
    if flags & QR_BIT != 0 {
        return Err(WireError::NotQuery);
    }
    let opcode = ((flags >> 11) & 0x0F) as u8;
    if opcode != 0 {
        return Err(WireError::UnsupportedOpcode(opcode));
    }
    if u16::from_be_bytes([buf[4], buf[5]]) == 0 {
        return Err(WireError::NoQuestion);
    }

    let mut pos = HEADER_LEN;
    let mut name = String::new();
    loop {
        let label_len = *buf.get(pos).ok_or(WireError::BadName)? as usize;
        pos += 1;
        if label_len == 0 {
            break;
        }
        if label_len > MAX_LABEL_LEN {
            return Err(WireError::BadName);
        }
        let label = buf.get(pos..pos + label_len).ok_or(WireError::BadName)?;
        if !name.is_empty() {
            name.push('.');
        }
        name.extend(label.iter().map(|&b| b as char));
        pos += label_len;
    }

    if name.is_empty() {
        return Err(WireError::BadName);
    }
    if pos + 4 > buf.len() {
        return Err(WireError::MissingQuestionFields);
    }

    Ok(ParsedQuery {
        id: u16::from_be_bytes([buf[0], buf[1]]),
        domain: normalize_domain(&name),
        question_end: pos + 4,
    })
}

/// Transaction id of any DNS message with at least two bytes.
pub fn transaction_id(buf: &[u8]) -> Option<u16> {
    match buf {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

pub fn set_transaction_id(buf: &mut [u8], id: u16) {
    if buf.len() >= 2 {
        buf[..2].copy_from_slice(&id.to_be_bytes());
    }
}

pub fn is_response(buf: &[u8]) -> bool {
    buf.len() >= HEADER_LEN && buf[2] & 0x80 != 0
}

/// Encodes a single-question query; used by tests and diagnostics.
pub fn build_query(id: u16, domain: &str, qtype: u16) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + domain.len() + 6);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    for label in domain.split('.').filter(|l| !l.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf.extend_from_slice(&qtype.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf
}
