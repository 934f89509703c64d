//! Coverage Session
//!
//! One session per coverage run. It owns the topic registry, the coverage
//! map, the assertion ledger and the side-channel sink, so independent runs
//! never share state.
//!
//! Lifecycle: `add_contract` for every contract, `process` for every event,
//! then `finalize` exactly once. `finalize` consumes the session, so no event
//! can be applied after the assertion pass.

use super::{
    decode, AppendFileSink, AssertLedger, Classification, ContractCoverage, ContractTopics,
    CoverageMap, DecodedEvent, Diagnostic, Diagnostics, EventKind, EventRecord,
    InstrumentationInfo, TopicRegistry, TopicSink,
};
use crate::result::{CovmapError, CovmapResult};
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

/// Default side-channel file name
pub const DEFAULT_TOPICS_PATH: &str = "scTopics";

/// Session configuration
#[derive(Debug, Clone)]
pub struct CoverageConfig {
    /// Topic side-channel file used by [`CoverageSession::new`]
    pub topics_path: PathBuf,
    /// Maximum contracts per session
    pub max_contracts: usize,
}

impl CoverageConfig {
    /// Create a builder for coverage config
    #[must_use]
    pub fn builder() -> CoverageConfigBuilder {
        CoverageConfigBuilder::default()
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            topics_path: PathBuf::from(DEFAULT_TOPICS_PATH),
            max_contracts: 10_000,
        }
    }
}

/// Builder for coverage configuration
#[derive(Debug, Default)]
pub struct CoverageConfigBuilder {
    topics_path: Option<PathBuf>,
    max_contracts: usize,
}

impl CoverageConfigBuilder {
    /// Set the side-channel path
    #[must_use]
    pub fn topics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.topics_path = Some(path.into());
        self
    }

    /// Set the contract limit
    #[must_use]
    pub fn max_contracts(mut self, max: usize) -> Self {
        self.max_contracts = max;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> CoverageConfig {
        let defaults = CoverageConfig::default();
        CoverageConfig {
            topics_path: self.topics_path.unwrap_or(defaults.topics_path),
            max_contracts: if self.max_contracts == 0 {
                defaults.max_contracts
            } else {
                self.max_contracts
            },
        }
    }
}

/// Coverage map construction for one run
#[derive(Debug)]
pub struct CoverageSession<S: TopicSink = AppendFileSink> {
    config: CoverageConfig,
    registry: TopicRegistry,
    coverage: CoverageMap,
    asserts: AssertLedger,
    diagnostics: Diagnostics,
    sink: S,
}

impl CoverageSession<AppendFileSink> {
    /// Session publishing topics to `config.topics_path`
    #[must_use]
    pub fn new(config: CoverageConfig) -> Self {
        let sink = AppendFileSink::new(config.topics_path.clone());
        Self::with_sink(config, sink)
    }
}

impl<S: TopicSink> CoverageSession<S> {
    /// Session publishing topics to a caller-supplied sink
    #[must_use]
    pub fn with_sink(config: CoverageConfig, sink: S) -> Self {
        Self {
            config,
            registry: TopicRegistry::new(),
            coverage: CoverageMap::new(),
            asserts: AssertLedger::new(),
            diagnostics: Diagnostics::new(),
            sink,
        }
    }

    /// Register a contract under its canonical path
    ///
    /// Validates the metadata, publishes the contract's topics and creates
    /// zeroed counters. Nothing is changed if any step fails.
    pub fn add_contract(
        &mut self,
        info: &InstrumentationInfo,
        path: &str,
    ) -> CovmapResult<ContractTopics> {
        if self.coverage.contains(path) {
            return Err(CovmapError::DuplicateContract {
                path: path.to_string(),
            });
        }
        if self.coverage.len() >= self.config.max_contracts {
            return Err(CovmapError::CapacityExceeded {
                max: self.config.max_contracts,
                path: path.to_string(),
            });
        }
        info.validate()?;

        let topics = self.registry.register(&info.contract_name, &mut self.sink)?;
        self.coverage.insert(ContractCoverage::zeroed(info, path));
        self.asserts.register(path, info.branch_map.keys().copied());

        info!(
            path,
            contract = %info.contract_name,
            lines = info.runnable_lines.len(),
            functions = info.fn_map.len(),
            branches = info.branch_map.len(),
            statements = info.statement_map.len(),
            "added contract"
        );
        Ok(topics)
    }

    /// Classify, decode and apply one event record
    ///
    /// Returns the kind applied, or `None` if the record was dropped as
    /// unknown.
    pub fn process(&mut self, record: &EventRecord) -> CovmapResult<Option<EventKind>> {
        let kind = match self.registry.classify(&record.topics) {
            Classification::Unknown => {
                trace!(topics = record.topics.len(), "dropping unknown event");
                self.diagnostics.record(Diagnostic::UnknownEvent {
                    topics: record.topics.clone(),
                });
                return Ok(None);
            }
            Classification::Matched(kind) => kind,
            Classification::Ambiguous { chosen, candidates } => {
                warn!(%chosen, ?candidates, "event matched several kinds");
                self.diagnostics
                    .record(Diagnostic::AmbiguousClassification { chosen, candidates });
                chosen
            }
        };

        let event = decode(kind, &record.data)?;
        self.accumulate(&event)?;
        self.diagnostics.record_processed(kind);
        Ok(Some(kind))
    }

    /// Process records in order, stopping at the first fatal error
    ///
    /// Returns the number of records applied.
    pub fn process_all<'a, I>(&mut self, records: I) -> CovmapResult<usize>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let mut applied = 0;
        for record in records {
            if self.process(record)?.is_some() {
                applied += 1;
            }
        }
        debug!(applied, "processed event batch");
        Ok(applied)
    }

    /// Apply one decoded event to its counter
    pub fn accumulate(&mut self, event: &DecodedEvent) -> CovmapResult<()> {
        let path = event.path();
        let kind = event.kind();
        let unknown = |index: u32| CovmapError::UnknownCounter {
            kind,
            path: path.to_string(),
            index,
        };

        let contract = self
            .coverage
            .get_mut(path)
            .ok_or_else(|| CovmapError::UnregisteredContract {
                path: path.to_string(),
            })?;

        match event {
            DecodedEvent::Line { line, .. } => {
                *contract.l.get_mut(line).ok_or_else(|| unknown(*line))? += 1;
            }
            DecodedEvent::Function { index, .. } => {
                *contract.f.get_mut(index).ok_or_else(|| unknown(*index))? += 1;
            }
            DecodedEvent::Statement { index, .. } => {
                *contract.s.get_mut(index).ok_or_else(|| unknown(*index))? += 1;
            }
            DecodedEvent::Branch { index, arm, .. } => {
                let arms = contract.b.get_mut(index).ok_or_else(|| unknown(*index))?;
                *arms.get_mut(*arm).ok_or_else(|| unknown(*index))? += 1;
            }
            DecodedEvent::AssertPre { branch, .. } => {
                self.asserts
                    .record_pre(path, *branch)
                    .ok_or_else(|| unknown(*branch))?;
            }
            DecodedEvent::AssertPost { branch, .. } => {
                self.asserts
                    .record_post(path, *branch)
                    .ok_or_else(|| unknown(*branch))?;
            }
        }
        trace!(path, %kind, "applied event");
        Ok(())
    }

    /// Live coverage of one contract, before the assertion pass
    #[must_use]
    pub fn contract(&self, path: &str) -> Option<&ContractCoverage> {
        self.coverage.get(path)
    }

    /// Live coverage map, before the assertion pass
    #[must_use]
    pub fn coverage(&self) -> &CoverageMap {
        &self.coverage
    }

    /// Topic registry
    #[must_use]
    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    /// Diagnostics gathered so far
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Side-channel sink
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Run the assertion pass and return the final coverage map
    #[must_use]
    pub fn finalize(self) -> CoverageMap {
        self.finalize_with_diagnostics().0
    }

    /// Like [`finalize`](Self::finalize), also handing back the diagnostics
    #[must_use]
    pub fn finalize_with_diagnostics(self) -> (CoverageMap, Diagnostics) {
        let mut coverage = self.coverage;
        let rewritten = self.asserts.apply(&mut coverage);
        info!(
            contracts = coverage.len(),
            assertion_branches = rewritten,
            unknown_events = self.diagnostics.unknown_events(),
            ambiguous_events = self.diagnostics.ambiguous_events(),
            "finalized coverage"
        );
        (coverage, self.diagnostics)
    }
}
