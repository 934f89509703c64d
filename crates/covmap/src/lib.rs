//! covmap: Coverage Maps from Emitted Coverage Events
//!
//! An instrumented contract emits one log event per executed line, function,
//! branch arm, statement and assertion. covmap turns those events, plus the
//! instrumentation metadata describing what can be covered, into a coverage
//! map in the conventional `l`/`f`/`b`/`s` shape consumed by report
//! renderers.
//!
//! # Example
//!
//! ```
//! use covmap::{encode, CoverageConfig, CoverageSession, EventKind, EventRecord, InstrumentationInfo};
//!
//! let info = InstrumentationInfo::new("Wallet").with_lines([3, 4]).with_function("deposit", 3);
//! let mut session = CoverageSession::with_sink(CoverageConfig::default(), Vec::<u8>::new());
//! let topics = session.add_contract(&info, "contracts/Wallet.sol")?;
//!
//! let hit = EventRecord::with_topic(topics.get(EventKind::Line), encode("contracts/Wallet.sol", &[4]));
//! session.process(&hit)?;
//!
//! let coverage = session.finalize();
//! assert_eq!(coverage.get("contracts/Wallet.sol").and_then(|c| c.line_hits(4)), Some(1));
//! # Ok::<(), covmap::CovmapError>(())
//! ```

#![warn(missing_docs)]

pub mod coverage;
mod result;

pub use coverage::{
    decode, encode, load_instrumentation, parse_event_log, read_event_log, topics_for,
    AppendFileSink, AssertCoverage, AssertLedger, BranchEntry, Classification, ContractCoverage,
    ContractTopics, CoverageConfig, CoverageConfigBuilder, CoverageMap, CoverageSession,
    CoverageSummary, DecodedEvent, Diagnostic, Diagnostics, EventKind, EventRecord, FnEntry,
    InstrumentationInfo, Location, Position, Severity, Tally, Topic, TopicRegistry, TopicSink,
    DEFAULT_TOPICS_PATH,
};
pub use result::{CovmapError, CovmapResult};
