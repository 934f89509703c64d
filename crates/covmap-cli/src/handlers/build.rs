//! Build command handler

use crate::commands::BuildArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::render_summary;
use covmap::{
    load_instrumentation, read_event_log, CoverageConfig, CoverageMap, CoverageSession,
    Diagnostics,
};
use tracing::info;

/// Finished coverage map plus what happened along the way
#[derive(Debug)]
pub struct BuildOutcome {
    /// Coverage after the assertion pass
    pub coverage: CoverageMap,
    /// Non-fatal diagnostics
    pub diagnostics: Diagnostics,
    /// Records applied to a counter
    pub applied: usize,
}

/// Load inputs, run one session and finalize it
pub fn build_coverage(args: &BuildArgs) -> CliResult<BuildOutcome> {
    let contracts = load_instrumentation(&args.instrumentation)?;
    if contracts.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "{} lists no contracts",
            args.instrumentation.display()
        )));
    }
    let records = read_event_log(&args.events)?;
    info!(
        contracts = contracts.len(),
        records = records.len(),
        "loaded inputs"
    );

    let mut config = CoverageConfig::builder().topics_path(&args.topics);
    if let Some(max) = args.max_contracts {
        config = config.max_contracts(max);
    }

    let mut session = CoverageSession::new(config.build());
    for (path, info) in &contracts {
        let _ = session.add_contract(info, path)?;
    }
    let applied = session.process_all(&records)?;
    let (coverage, diagnostics) = session.finalize_with_diagnostics();

    Ok(BuildOutcome {
        coverage,
        diagnostics,
        applied,
    })
}

/// Execute the build command
pub fn execute_build(config: &CliConfig, args: &BuildArgs) -> CliResult<()> {
    let outcome = build_coverage(args)?;

    if !config.verbosity.is_quiet() {
        eprint!(
            "{}",
            render_summary(
                &outcome.coverage,
                &outcome.diagnostics,
                config.color.should_color()
            )
        );
    }

    match args.output {
        Some(ref path) => {
            outcome.coverage.save(path)?;
            info!(path = %path.display(), "wrote coverage map");
        }
        None => println!("{}", outcome.coverage.to_json_pretty()?),
    }
    Ok(())
}
