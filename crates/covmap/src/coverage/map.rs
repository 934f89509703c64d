//! Coverage Map
//!
//! Per-contract hit counters in the conventional line/function/branch/
//! statement coverage shape:
//!
//! ```text
//! { path, l: {line: hits}, f: {idx: hits}, b: {idx: [arm0, arm1]},
//!   s: {idx: hits}, fnMap, branchMap, statementMap }
//! ```

use super::{BranchEntry, FnEntry, InstrumentationInfo, Location};
use crate::result::CovmapResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Coverage record of one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCoverage {
    /// Canonical contract path
    pub path: String,
    /// Hits per runnable line
    pub l: BTreeMap<u32, u64>,
    /// Hits per function
    pub f: BTreeMap<u32, u64>,
    /// Hits per branch arm
    pub b: BTreeMap<u32, [u64; 2]>,
    /// Hits per statement
    pub s: BTreeMap<u32, u64>,
    /// Function metadata
    pub fn_map: BTreeMap<u32, FnEntry>,
    /// Branch metadata
    pub branch_map: BTreeMap<u32, BranchEntry>,
    /// Statement metadata
    pub statement_map: BTreeMap<u32, Location>,
}

impl ContractCoverage {
    /// Zero-filled record with one counter per instrumented entity
    #[must_use]
    pub fn zeroed(info: &InstrumentationInfo, path: &str) -> Self {
        Self {
            path: path.to_string(),
            l: info.runnable_lines.iter().map(|line| (*line, 0)).collect(),
            f: info.fn_map.keys().map(|idx| (*idx, 0)).collect(),
            b: info.branch_map.keys().map(|idx| (*idx, [0, 0])).collect(),
            s: info.statement_map.keys().map(|idx| (*idx, 0)).collect(),
            fn_map: info.fn_map.clone(),
            branch_map: info.branch_map.clone(),
            statement_map: info.statement_map.clone(),
        }
    }

    /// Hits of a line, `None` if the line is not runnable
    #[must_use]
    pub fn line_hits(&self, line: u32) -> Option<u64> {
        self.l.get(&line).copied()
    }

    /// Arm counters of a branch
    #[must_use]
    pub fn branch_arms(&self, index: u32) -> Option<[u64; 2]> {
        self.b.get(&index).copied()
    }

    /// Whether every counter is zero
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.l.values().all(|c| *c == 0)
            && self.f.values().all(|c| *c == 0)
            && self.b.values().all(|arms| arms == &[0, 0])
            && self.s.values().all(|c| *c == 0)
    }

    /// Covered/total tallies for this contract
    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary {
            lines: Tally::of(self.l.values().copied()),
            functions: Tally::of(self.f.values().copied()),
            branches: Tally::of(self.b.values().flat_map(|arms| arms.iter().copied())),
            statements: Tally::of(self.s.values().copied()),
        }
    }
}

/// Covered vs. total entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Entities with at least one hit
    pub covered: usize,
    /// All entities
    pub total: usize,
}

impl Tally {
    /// Tally a sequence of hit counters
    #[must_use]
    pub fn of(counts: impl Iterator<Item = u64>) -> Self {
        counts.fold(Self::default(), |acc, count| Self {
            covered: acc.covered + usize::from(count > 0),
            total: acc.total + 1,
        })
    }

    /// Coverage percentage
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0; // Vacuously true
        }
        (self.covered as f64 / self.total as f64) * 100.0
    }

    fn add(self, other: Self) -> Self {
        Self {
            covered: self.covered + other.covered,
            total: self.total + other.total,
        }
    }
}

/// Coverage summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Runnable lines
    pub lines: Tally,
    /// Functions
    pub functions: Tally,
    /// Branch arms (two per branch)
    pub branches: Tally,
    /// Statements
    pub statements: Tally,
}

impl CoverageSummary {
    /// Combine two summaries
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            lines: self.lines.add(other.lines),
            functions: self.functions.add(other.functions),
            branches: self.branches.add(other.branches),
            statements: self.statements.add(other.statements),
        }
    }
}

/// Coverage of every registered contract, keyed by canonical path
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageMap {
    contracts: BTreeMap<String, ContractCoverage>,
}

impl CoverageMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, coverage: ContractCoverage) {
        let _ = self.contracts.insert(coverage.path.clone(), coverage);
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut ContractCoverage> {
        self.contracts.get_mut(path)
    }

    /// Coverage of one contract
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ContractCoverage> {
        self.contracts.get(path)
    }

    /// Whether a path is present
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.contracts.contains_key(path)
    }

    /// Number of contracts
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the map has no contracts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Contracts in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContractCoverage)> {
        self.contracts.iter().map(|(path, cov)| (path.as_str(), cov))
    }

    /// Summary across all contracts
    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        self.contracts
            .values()
            .map(ContractCoverage::summary)
            .fold(CoverageSummary::default(), CoverageSummary::merge)
    }

    /// Pretty JSON in the conventional coverage shape
    pub fn to_json_pretty(&self) -> CovmapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to a file
    pub fn save(&self, path: &Path) -> CovmapResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
