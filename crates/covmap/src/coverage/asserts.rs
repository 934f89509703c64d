//! Assertion Branch Reinterpretation
//!
//! An assertion has no syntactic second arm. The instrumentation emits one
//! event before the assertion is evaluated and one after it held; once the
//! whole event stream is consumed, the pair is folded into the branch
//! counter as `[held, failed] = [post, pre - post]`.

use super::CoverageMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Pre/post event counts for one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssertCoverage {
    /// Times the assertion was reached
    pub pre_events: u64,
    /// Times the assertion held
    pub post_events: u64,
}

impl AssertCoverage {
    /// Whether the branch carried assertion events
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        self.pre_events > 0
    }

    /// Synthetic arm counters `[held, failed]`
    #[must_use]
    pub fn arms(&self) -> [u64; 2] {
        [
            self.post_events,
            self.pre_events.saturating_sub(self.post_events),
        ]
    }
}

/// Session-scoped assertion counters, keyed by path then branch index
#[derive(Debug, Clone, Default)]
pub struct AssertLedger {
    entries: BTreeMap<String, BTreeMap<u32, AssertCoverage>>,
}

impl AssertLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero entries for the given branch indices of a contract
    pub fn register(&mut self, path: &str, branches: impl IntoIterator<Item = u32>) {
        let zeroed = branches
            .into_iter()
            .map(|idx| (idx, AssertCoverage::default()))
            .collect();
        let _ = self.entries.insert(path.to_string(), zeroed);
    }

    /// Counters of one branch
    #[must_use]
    pub fn get(&self, path: &str, branch: u32) -> Option<AssertCoverage> {
        self.entries.get(path)?.get(&branch).copied()
    }

    /// Count a pre-event; `None` if the branch is unknown
    pub fn record_pre(&mut self, path: &str, branch: u32) -> Option<()> {
        self.entry_mut(path, branch)?.pre_events += 1;
        Some(())
    }

    /// Count a post-event; `None` if the branch is unknown
    pub fn record_post(&mut self, path: &str, branch: u32) -> Option<()> {
        self.entry_mut(path, branch)?.post_events += 1;
        Some(())
    }

    fn entry_mut(&mut self, path: &str, branch: u32) -> Option<&mut AssertCoverage> {
        self.entries.get_mut(path)?.get_mut(&branch)
    }

    /// Overwrite the branch counters of every assertion-guarded branch
    ///
    /// Consumes the ledger. Returns the number of branches rewritten.
    pub fn apply(self, coverage: &mut CoverageMap) -> usize {
        let mut rewritten = 0;
        for (path, branches) in self.entries {
            let Some(contract) = coverage.get_mut(&path) else {
                continue;
            };
            for (index, counts) in branches {
                if !counts.is_assertion() {
                    continue;
                }
                if let Some(arms) = contract.b.get_mut(&index) {
                    *arms = counts.arms();
                    rewritten += 1;
                    debug!(path = %path, branch = index, ?arms, "reinterpreted assertion branch");
                }
            }
        }
        rewritten
    }
}
