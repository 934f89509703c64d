//! Coverage Map Construction
//!
//! Builds per-contract hit counters from instrumentation metadata and the
//! coverage events an instrumented contract emits while tests run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  COVMAP PIPELINE                                                 │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  InstrumentationInfo → add_contract → zeroed ContractCoverage   │
//! │                            ↓                                     │
//! │                     TopicRegistry → TopicSink (scTopics)        │
//! │                                                                  │
//! │  EventRecord → classify → decode → accumulate                   │
//! │                                                                  │
//! │  finalize → AssertLedger::apply → CoverageMap                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events can be applied in any order; counters only ever increase by one.
//! The assertion pass needs the complete stream and runs once, in
//! [`CoverageSession::finalize`].

mod asserts;
mod decoder;
mod diagnostics;
mod event;
mod ids;
mod instrumentation;
mod map;
mod session;
mod sink;
mod topics;

pub use asserts::{AssertCoverage, AssertLedger};
pub use decoder::{decode, encode, DecodedEvent, WORD};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use event::{decode_hex_payload, parse_event_log, read_event_log, EventRecord};
pub use ids::{EventKind, Topic};
pub use instrumentation::{
    load_instrumentation, BranchEntry, FnEntry, InstrumentationInfo, Location, Position,
};
pub use map::{ContractCoverage, CoverageMap, CoverageSummary, Tally};
pub use session::{CoverageConfig, CoverageConfigBuilder, CoverageSession, DEFAULT_TOPICS_PATH};
pub use sink::{AppendFileSink, TopicSink};
pub use topics::{topics_for, Classification, ContractTopics, TopicRegistry};
