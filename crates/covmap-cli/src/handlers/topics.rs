//! Topics command handler

use crate::commands::TopicsArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::render_topics;
use covmap::{topics_for, ContractTopics};
use std::collections::BTreeMap;

/// JSON object keyed by event kind name
pub fn topics_json(topics: &ContractTopics) -> CliResult<String> {
    let map: BTreeMap<&str, String> = topics
        .iter()
        .map(|(kind, topic)| (kind.name(), topic.to_hex()))
        .collect();
    Ok(serde_json::to_string_pretty(&map)?)
}

/// Execute the topics command
pub fn execute_topics(config: &CliConfig, args: &TopicsArgs) -> CliResult<()> {
    let topics = topics_for(&args.contract_name)?;

    if args.raw {
        print!("{}", topics.to_side_channel());
    } else if args.json {
        println!("{}", topics_json(&topics)?);
    } else {
        print!("{}", render_topics(&topics, config.color.should_color()));
    }
    Ok(())
}
