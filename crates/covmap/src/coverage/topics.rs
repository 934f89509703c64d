//! Topic Registry
//!
//! Derives the six per-contract topics, keeps one ordered set per event kind
//! and a single topic → kind table used to classify incoming records.

use super::{EventKind, Topic, TopicSink};
use crate::result::{CovmapError, CovmapResult};
use std::collections::HashMap;
use tracing::{debug, info};

/// The six topics of one contract, in [`EventKind::ALL`] order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTopics {
    contract_name: String,
    topics: [Topic; 6],
}

impl ContractTopics {
    /// Contract name the topics were derived from
    #[must_use]
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// Topic for one kind
    #[must_use]
    pub fn get(&self, kind: EventKind) -> Topic {
        self.topics[kind.index()]
    }

    /// `(kind, topic)` pairs in precedence order
    pub fn iter(&self) -> impl Iterator<Item = (EventKind, Topic)> + '_ {
        EventKind::ALL.iter().map(move |kind| (*kind, self.get(*kind)))
    }

    /// Side-channel form: one hex topic per line, newline terminated
    #[must_use]
    pub fn to_side_channel(&self) -> String {
        let mut out = String::with_capacity(6 * 67);
        for topic in &self.topics {
            out.push_str(&topic.to_hex());
            out.push('\n');
        }
        out
    }
}

/// Derive the topics of a contract without registering them
pub fn topics_for(contract_name: &str) -> CovmapResult<ContractTopics> {
    if contract_name.is_empty() {
        return Err(CovmapError::EmptyContractName);
    }
    Ok(ContractTopics {
        contract_name: contract_name.to_string(),
        topics: EventKind::ALL.map(|kind| Topic::for_event(kind, contract_name)),
    })
}

/// Outcome of classifying one record's topics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No topic belongs to a registered contract
    Unknown,
    /// Exactly one kind matched
    Matched(EventKind),
    /// Topics of several kinds matched; `chosen` is the earliest declared
    Ambiguous {
        /// Kind the record is processed as
        chosen: EventKind,
        /// Every kind that matched, in precedence order
        candidates: Vec<EventKind>,
    },
}

impl Classification {
    /// Kind the record should be processed as, if any
    #[must_use]
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Unknown => None,
            Self::Matched(kind) | Self::Ambiguous { chosen: kind, .. } => Some(*kind),
        }
    }
}

/// Session-scoped topic registry
#[derive(Debug, Default)]
pub struct TopicRegistry {
    /// Classification table
    by_topic: HashMap<Topic, EventKind>,
    /// One ordered set per kind, one topic appended per registration
    sets: [Vec<Topic>; 6],
}

impl TopicRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive, publish and register the topics of a contract
    ///
    /// The sink write happens before any in-memory state changes, so a
    /// failed write leaves the registry untouched.
    pub fn register<S: TopicSink>(
        &mut self,
        contract_name: &str,
        sink: &mut S,
    ) -> CovmapResult<ContractTopics> {
        let topics = topics_for(contract_name)?;
        sink.append_bytes(topics.to_side_channel().as_bytes())?;

        for (kind, topic) in topics.iter() {
            self.sets[kind.index()].push(topic);
            let _ = self.by_topic.insert(topic, kind);
            debug!(contract = contract_name, %kind, %topic, "registered topic");
        }
        info!(contract = contract_name, "registered coverage topics");
        Ok(topics)
    }

    /// Classify a record by its topics
    #[must_use]
    pub fn classify(&self, topics: &[Topic]) -> Classification {
        let mut candidates: Vec<EventKind> = topics
            .iter()
            .filter_map(|topic| self.by_topic.get(topic).copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        match candidates.len() {
            0 => Classification::Unknown,
            1 => Classification::Matched(candidates[0]),
            _ => Classification::Ambiguous {
                chosen: candidates[0],
                candidates,
            },
        }
    }

    /// Kind of a single topic
    #[must_use]
    pub fn kind_of(&self, topic: &Topic) -> Option<EventKind> {
        self.by_topic.get(topic).copied()
    }

    /// Registered topics of one kind, in registration order
    #[must_use]
    pub fn topics(&self, kind: EventKind) -> &[Topic] {
        &self.sets[kind.index()]
    }

    /// Number of registrations performed
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.sets[EventKind::Line.index()].len()
    }

    /// Whether nothing has been registered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations() == 0
    }
}
