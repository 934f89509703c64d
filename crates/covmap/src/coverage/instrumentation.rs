//! Instrumentation Metadata
//!
//! Structural metadata produced by the instrumentation step: which lines,
//! functions, branches and statements of a contract are eligible for
//! coverage. Function, branch and statement maps are keyed by dense integers
//! starting at 1.

use crate::result::{CovmapError, CovmapResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line
    pub line: u32,
    /// 0-based column
    pub column: u32,
}

/// Source range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Start of the range
    pub start: Position,
    /// End of the range
    pub end: Position,
}

impl Location {
    /// Range covering a single line
    #[must_use]
    pub const fn line(line: u32) -> Self {
        Self {
            start: Position { line, column: 0 },
            end: Position { line, column: 0 },
        }
    }
}

/// fnMap entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FnEntry {
    /// Function name
    pub name: String,
    /// Declaration line
    pub line: u32,
    /// Function body range
    pub loc: Location,
}

/// branchMap entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEntry {
    /// Line of the controlling construct
    pub line: u32,
    /// Construct type, e.g. `if` or `assert`
    #[serde(rename = "type")]
    pub kind: String,
    /// Range of each arm
    pub locations: Vec<Location>,
}

/// Per-contract instrumentation metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentationInfo {
    /// Contract name, used to derive topics
    pub contract_name: String,
    /// Lines eligible for line coverage
    #[serde(default)]
    pub runnable_lines: Vec<u32>,
    /// Functions by dense index
    #[serde(default)]
    pub fn_map: BTreeMap<u32, FnEntry>,
    /// Branches by dense index
    #[serde(default)]
    pub branch_map: BTreeMap<u32, BranchEntry>,
    /// Statements by dense index
    #[serde(default)]
    pub statement_map: BTreeMap<u32, Location>,
}

impl InstrumentationInfo {
    /// Empty metadata for a contract
    #[must_use]
    pub fn new(contract_name: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            ..Self::default()
        }
    }

    /// Add runnable lines
    #[must_use]
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = u32>) -> Self {
        self.runnable_lines.extend(lines);
        self
    }

    /// Add a function under the next dense index
    #[must_use]
    pub fn with_function(mut self, name: &str, line: u32) -> Self {
        let index = next_index(&self.fn_map);
        let _ = self.fn_map.insert(
            index,
            FnEntry {
                name: name.to_string(),
                line,
                loc: Location::line(line),
            },
        );
        self
    }

    /// Add a branch under the next dense index
    #[must_use]
    pub fn with_branch(mut self, kind: &str, line: u32) -> Self {
        let index = next_index(&self.branch_map);
        let _ = self.branch_map.insert(
            index,
            BranchEntry {
                line,
                kind: kind.to_string(),
                locations: vec![Location::line(line), Location::line(line)],
            },
        );
        self
    }

    /// Add a statement under the next dense index
    #[must_use]
    pub fn with_statement(mut self, line: u32) -> Self {
        let index = next_index(&self.statement_map);
        let _ = self.statement_map.insert(index, Location::line(line));
        self
    }

    /// Check that every entity map is keyed `1..=N` without gaps
    pub fn validate(&self) -> CovmapResult<()> {
        check_dense(&self.contract_name, "fnMap", &self.fn_map)?;
        check_dense(&self.contract_name, "branchMap", &self.branch_map)?;
        check_dense(&self.contract_name, "statementMap", &self.statement_map)
    }
}

fn next_index<V>(map: &BTreeMap<u32, V>) -> u32 {
    map.keys().next_back().map_or(1, |last| last + 1)
}

fn check_dense<V>(contract: &str, map_name: &'static str, map: &BTreeMap<u32, V>) -> CovmapResult<()> {
    for (expected, found) in (1u32..).zip(map.keys()) {
        if *found != expected {
            return Err(CovmapError::DenseIndexViolation {
                contract: contract.to_string(),
                map: map_name,
                expected,
                found: *found,
            });
        }
    }
    Ok(())
}

/// Load a JSON object mapping canonical path to metadata
pub fn load_instrumentation(path: &Path) -> CovmapResult<BTreeMap<String, InstrumentationInfo>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
