//! Type-Safe Event Identifiers
//!
//! [`EventKind`] is the closed set of coverage events an instrumented contract
//! can emit. [`Topic`] is the 32-byte Keccak-256 identifier that tags an
//! emitted record with an (event kind, contract) pair.

use crate::result::{CovmapError, CovmapResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Coverage event kind
///
/// Declaration order is the classification precedence: when one record
/// carries topics of several kinds, the earliest declared kind wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// A runnable line was executed
    Line,
    /// A function was entered
    Function,
    /// One arm of an explicit two-arm branch was taken
    Branch,
    /// A statement was executed
    Statement,
    /// An assertion is about to be evaluated
    AssertPre,
    /// An assertion held
    AssertPost,
}

impl EventKind {
    /// All kinds in precedence order
    pub const ALL: [Self; 6] = [
        Self::Line,
        Self::Function,
        Self::Branch,
        Self::Statement,
        Self::AssertPre,
        Self::AssertPost,
    ];

    /// Position of this kind in [`EventKind::ALL`]
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Function => "function",
            Self::Branch => "branch",
            Self::Statement => "statement",
            Self::AssertPre => "assert-pre",
            Self::AssertPost => "assert-post",
        }
    }

    /// Event name prefix used by the instrumentation
    #[must_use]
    pub const fn event_prefix(self) -> &'static str {
        match self {
            Self::Line => "__Coverage",
            Self::Function => "__FunctionCoverage",
            Self::Branch => "__BranchCoverage",
            Self::Statement => "__StatementCoverage",
            Self::AssertPre => "__AssertPreCoverage",
            Self::AssertPost => "__AssertPostCoverage",
        }
    }

    /// Number of unsigned integer fields following the path in the payload
    #[must_use]
    pub const fn uint_fields(self) -> usize {
        match self {
            Self::Branch => 2,
            _ => 1,
        }
    }

    /// Full event signature for a contract, e.g. `__CoverageWallet(string,uint256)`
    #[must_use]
    pub fn signature(self, contract_name: &str) -> String {
        let params = match self.uint_fields() {
            2 => "(string,uint256,uint256)",
            _ => "(string,uint256)",
        };
        format!("{}{}{}", self.event_prefix(), contract_name, params)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 32-byte event topic
///
/// Rendered and parsed as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic([u8; 32]);

impl Topic {
    /// Wrap raw topic bytes
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Keccak-256 of the preimage
    #[must_use]
    pub fn keccak(preimage: &[u8]) -> Self {
        let digest = Keccak256::digest(preimage);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Topic for an event kind emitted by a contract
    #[must_use]
    pub fn for_event(kind: EventKind, contract_name: &str) -> Self {
        Self::keccak(kind.signature(contract_name).as_bytes())
    }

    /// Raw bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without the `0x` prefix
    pub fn from_hex(input: &str) -> CovmapResult<Self> {
        let digits = strip_hex_prefix(input);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| CovmapError::invalid_hex(input, e.to_string()))?;
        Ok(Self(bytes))
    }
}

/// Strip an optional `0x`/`0X` prefix
pub(crate) fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", self.to_hex())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Topic {
    type Err = CovmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}
