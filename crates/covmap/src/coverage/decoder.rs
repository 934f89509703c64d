//! Event Payload Decoder
//!
//! Payloads use the canonical ABI layout for `(string, uint256...)`:
//!
//! ```text
//! word 0        offset of the string tail (= head size)
//! word 1..=n    unsigned integers, big-endian, left-padded
//! word n+1      string length in bytes
//! word n+2..    UTF-8 bytes, right-padded with zeros to a word boundary
//! ```
//!
//! Decoding is strict. Any deviation from the layout an emitting contract
//! produces is a [`CovmapError::DecodeFailure`]; a payload decoded with the
//! wrong field count fails on the offset check.

use super::EventKind;
use crate::result::{CovmapError, CovmapResult};

/// Size of one ABI word in bytes
pub const WORD: usize = 32;

/// A payload decoded according to its event kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    /// Line hit
    Line {
        /// Canonical contract path
        path: String,
        /// Source line number
        line: u32,
    },
    /// Function entry
    Function {
        /// Canonical contract path
        path: String,
        /// fnMap key
        index: u32,
    },
    /// Branch arm taken
    Branch {
        /// Canonical contract path
        path: String,
        /// branchMap key
        index: u32,
        /// Arm taken, 0 or 1
        arm: usize,
    },
    /// Statement executed
    Statement {
        /// Canonical contract path
        path: String,
        /// statementMap key
        index: u32,
    },
    /// Assertion about to be evaluated
    AssertPre {
        /// Canonical contract path
        path: String,
        /// branchMap key of the assertion
        branch: u32,
    },
    /// Assertion held
    AssertPost {
        /// Canonical contract path
        path: String,
        /// branchMap key of the assertion
        branch: u32,
    },
}

impl DecodedEvent {
    /// Kind of event
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Line { .. } => EventKind::Line,
            Self::Function { .. } => EventKind::Function,
            Self::Branch { .. } => EventKind::Branch,
            Self::Statement { .. } => EventKind::Statement,
            Self::AssertPre { .. } => EventKind::AssertPre,
            Self::AssertPost { .. } => EventKind::AssertPost,
        }
    }

    /// Canonical contract path carried by the payload
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Line { path, .. }
            | Self::Function { path, .. }
            | Self::Branch { path, .. }
            | Self::Statement { path, .. }
            | Self::AssertPre { path, .. }
            | Self::AssertPost { path, .. } => path,
        }
    }
}

/// Decode a payload for the given kind
pub fn decode(kind: EventKind, data: &[u8]) -> CovmapResult<DecodedEvent> {
    let (path, values) = decode_fields(kind, data)?;
    let event = match kind {
        EventKind::Line => DecodedEvent::Line {
            path,
            line: values[0],
        },
        EventKind::Function => DecodedEvent::Function {
            path,
            index: values[0],
        },
        EventKind::Branch => {
            let arm = match values[1] {
                0 => 0,
                1 => 1,
                other => {
                    return Err(CovmapError::decode(
                        kind,
                        format!("branch arm {other} is not 0 or 1"),
                    ))
                }
            };
            DecodedEvent::Branch {
                path,
                index: values[0],
                arm,
            }
        }
        EventKind::Statement => DecodedEvent::Statement {
            path,
            index: values[0],
        },
        EventKind::AssertPre => DecodedEvent::AssertPre {
            path,
            branch: values[0],
        },
        EventKind::AssertPost => DecodedEvent::AssertPost {
            path,
            branch: values[0],
        },
    };
    Ok(event)
}

/// Decode the path and `kind.uint_fields()` integers
fn decode_fields(kind: EventKind, data: &[u8]) -> CovmapResult<(String, Vec<u32>)> {
    let fields = kind.uint_fields();
    let head = WORD * (1 + fields);

    if data.len() % WORD != 0 {
        return Err(CovmapError::decode(
            kind,
            format!("payload length {} is not a multiple of {WORD}", data.len()),
        ));
    }
    if data.len() < head + WORD {
        return Err(CovmapError::decode(
            kind,
            format!(
                "payload of {} bytes is shorter than the {} byte minimum",
                data.len(),
                head + WORD
            ),
        ));
    }

    let offset = read_u32(word(data, 0)).ok_or_else(|| {
        CovmapError::decode(kind, "string offset does not fit in 32 bits")
    })? as usize;
    if offset != head {
        return Err(CovmapError::decode(
            kind,
            format!("string offset {offset} does not match head size {head}"),
        ));
    }

    let values = (0..fields)
        .map(|i| {
            read_u32(word(data, 1 + i)).ok_or_else(|| {
                CovmapError::decode(kind, format!("integer field {i} does not fit in 32 bits"))
            })
        })
        .collect::<CovmapResult<Vec<u32>>>()?;

    let len = read_u32(word(data, 1 + fields))
        .ok_or_else(|| CovmapError::decode(kind, "string length does not fit in 32 bits"))?
        as usize;
    let start = head + WORD;
    let expected = start + len.div_ceil(WORD) * WORD;
    if data.len() != expected {
        return Err(CovmapError::decode(
            kind,
            format!(
                "payload is {} bytes but a {len} byte path requires {expected}",
                data.len()
            ),
        ));
    }

    let (text, padding) = data[start..].split_at(len);
    if padding.iter().any(|b| *b != 0) {
        return Err(CovmapError::decode(kind, "non-zero bytes in string padding"));
    }
    let path = std::str::from_utf8(text)
        .map_err(|e| CovmapError::decode(kind, format!("path is not valid UTF-8: {e}")))?
        .to_string();

    Ok((path, values))
}

/// The `index`th word; callers check bounds first
fn word(data: &[u8], index: usize) -> &[u8] {
    &data[index * WORD..(index + 1) * WORD]
}

/// Big-endian word value, if it fits in `u32`
fn read_u32(word: &[u8]) -> Option<u32> {
    let (high, low) = word.split_at(WORD - 4);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    Some(u32::from_be_bytes([low[0], low[1], low[2], low[3]]))
}

/// Encode a `(string, uint256...)` payload in the layout [`decode`] expects
#[must_use]
pub fn encode(path: &str, values: &[u32]) -> Vec<u8> {
    let head = WORD * (1 + values.len());
    let padded = path.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(head + WORD + padded);

    push_word(&mut out, head as u64);
    for value in values {
        push_word(&mut out, u64::from(*value));
    }
    push_word(&mut out, path.len() as u64);
    out.extend_from_slice(path.as_bytes());
    out.resize(head + WORD + padded, 0);
    out
}

fn push_word(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&[0u8; WORD - 8]);
    out.extend_from_slice(&value.to_be_bytes());
}
