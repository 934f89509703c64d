//! Non-Fatal Event Diagnostics
//!
//! Fatal conditions abort the run as a [`crate::CovmapError`]. The two
//! conditions that only affect one record are kept here instead:
//!
//! - Unknown events are dropped (their topics belong to no registered
//!   contract, e.g. ordinary application events).
//! - Ambiguous events are processed as the earliest declared kind, but
//!   surfaced so the tie-break is never silent.

use super::{EventKind, Topic};
use serde::Serialize;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The record was dropped
    Drop,
    /// The record was processed, but the result deserves a look
    Warn,
}

/// A non-fatal condition raised by one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// No topic matched a registered contract
    UnknownEvent {
        /// Topics the record carried
        topics: Vec<Topic>,
    },
    /// Topics of several kinds matched
    AmbiguousClassification {
        /// Kind the record was processed as
        chosen: EventKind,
        /// Every kind that matched
        candidates: Vec<EventKind>,
    },
}

impl Diagnostic {
    /// Severity of this diagnostic
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownEvent { .. } => Severity::Drop,
            Self::AmbiguousClassification { .. } => Severity::Warn,
        }
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::UnknownEvent { topics } => {
                format!("Dropped event with {} unregistered topic(s)", topics.len())
            }
            Self::AmbiguousClassification { chosen, candidates } => {
                let names: Vec<&str> = candidates.iter().map(|k| k.name()).collect();
                format!(
                    "Event matched kinds [{}], processed as {}",
                    names.join(", "),
                    chosen
                )
            }
        }
    }
}

/// Per-session diagnostic ledger
///
/// Unknown events are only counted; they can be the bulk of a log.
/// Ambiguous events are kept in full.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    unknown_events: usize,
    ambiguities: Vec<Diagnostic>,
    processed: [usize; 6],
}

impl Diagnostics {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnknownEvent { .. } => self.unknown_events += 1,
            Diagnostic::AmbiguousClassification { .. } => self.ambiguities.push(diagnostic),
        }
    }

    /// Count a successfully applied event
    pub fn record_processed(&mut self, kind: EventKind) {
        self.processed[kind.index()] += 1;
    }

    /// Number of dropped unknown events
    #[must_use]
    pub fn unknown_events(&self) -> usize {
        self.unknown_events
    }

    /// Number of ambiguous events
    #[must_use]
    pub fn ambiguous_events(&self) -> usize {
        self.ambiguities.len()
    }

    /// Every ambiguity seen, in stream order
    #[must_use]
    pub fn ambiguities(&self) -> &[Diagnostic] {
        &self.ambiguities
    }

    /// Events applied for one kind
    #[must_use]
    pub fn processed(&self, kind: EventKind) -> usize {
        self.processed[kind.index()]
    }

    /// Events applied across all kinds
    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.processed.iter().sum()
    }

    /// Whether nothing needs attention
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.ambiguities.is_empty()
    }
}
