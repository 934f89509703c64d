//! Human-readable output

use console::style;
use covmap::{ContractTopics, CoverageMap, Diagnostics, Tally};
use std::fmt::Write as _;

fn percent_cell(tally: Tally, use_color: bool) -> String {
    let text = format!("{:>6.1}%", tally.percent());
    let styled = if tally.covered == tally.total {
        style(text).green()
    } else if tally.covered == 0 {
        style(text).red()
    } else {
        style(text).yellow()
    };
    styled.force_styling(use_color).to_string()
}

/// Render a per-contract coverage table followed by totals and diagnostics
#[must_use]
pub fn render_summary(coverage: &CoverageMap, diagnostics: &Diagnostics, use_color: bool) -> String {
    let mut out = String::new();
    let header = style("Coverage Summary").bold().underlined().force_styling(use_color);
    let _ = writeln!(out, "{header}");
    let _ = writeln!(
        out,
        "{:<40} {:>7} {:>7} {:>7} {:>7}",
        "Contract", "Lines", "Funcs", "Branch", "Stmts"
    );

    for (path, contract) in coverage.iter() {
        let summary = contract.summary();
        let _ = writeln!(
            out,
            "{:<40} {} {} {} {}",
            path,
            percent_cell(summary.lines, use_color),
            percent_cell(summary.functions, use_color),
            percent_cell(summary.branches, use_color),
            percent_cell(summary.statements, use_color),
        );
    }

    let total = coverage.summary();
    let _ = writeln!(
        out,
        "{:<40} {} {} {} {}",
        style("All contracts").bold().force_styling(use_color),
        percent_cell(total.lines, use_color),
        percent_cell(total.functions, use_color),
        percent_cell(total.branches, use_color),
        percent_cell(total.statements, use_color),
    );

    let _ = writeln!(
        out,
        "{} events applied, {} unknown events dropped",
        diagnostics.total_processed(),
        diagnostics.unknown_events()
    );
    for diagnostic in diagnostics.ambiguities() {
        let mark = style("⚠").yellow().bold().force_styling(use_color);
        let _ = writeln!(out, "{mark} {}", diagnostic.description());
    }
    out
}

/// Render one `kind  topic` line per event kind
#[must_use]
pub fn render_topics(topics: &ContractTopics, use_color: bool) -> String {
    let mut out = String::new();
    for (kind, topic) in topics.iter() {
        let label = style(format!("{:<12}", kind.name())).cyan().force_styling(use_color);
        let _ = writeln!(out, "{label} {topic}");
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use covmap::{
        encode, topics_for, CoverageConfig, CoverageSession, EventKind, EventRecord,
        InstrumentationInfo,
    };

    fn finished_session() -> (CoverageMap, Diagnostics) {
        let info = InstrumentationInfo::new("Wallet")
            .with_lines([3, 4])
            .with_function("deposit", 3)
            .with_statement(4);
        let mut session = CoverageSession::with_sink(CoverageConfig::default(), Vec::<u8>::new());
        let topics = session.add_contract(&info, "contracts/Wallet.sol").unwrap();
        session
            .process(&EventRecord::with_topic(
                topics.get(EventKind::Line),
                encode("contracts/Wallet.sol", &[3]),
            ))
            .unwrap();
        session.process(&EventRecord::new(vec![], vec![])).unwrap();
        session.finalize_with_diagnostics()
    }

    #[test]
    fn test_summary_lists_contracts_and_totals() {
        let (coverage, diagnostics) = finished_session();
        let text = render_summary(&coverage, &diagnostics, false);

        assert!(text.starts_with("Coverage Summary"));
        assert!(text.contains("contracts/Wallet.sol"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("All contracts"));
        assert!(text.contains("1 events applied, 1 unknown events dropped"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_summary_with_color_has_escapes() {
        let (coverage, diagnostics) = finished_session();
        assert!(render_summary(&coverage, &diagnostics, true).contains('\u{1b}'));
    }

    #[test]
    fn test_render_topics_one_line_per_kind() {
        let topics = topics_for("Wallet").unwrap();
        let text = render_topics(&topics, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("line"));
        assert!(lines[5].starts_with("assert-post"));
        assert!(lines[2].ends_with(&topics.get(EventKind::Branch).to_hex()));
    }
}
