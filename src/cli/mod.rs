//! CLI command handling
//!
//! Turns parsed arguments and configuration into a harness run.

use crate::commands::RunArgs;
use crate::common::{Config, Result};
use crate::harness::{
    BuildStep, CommandBuild, Harness, ProcessToolchain, Reporter, RunOptions, RunSummary,
    SkipBuild,
};

/// Run the harness as described by `args`
pub async fn dispatch(args: RunArgs) -> Result<RunSummary> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(secs) = args.timeout {
        config.timeouts.case_secs = secs;
    }

    let options = run_options(&args, &config);

    let toolchain = ProcessToolchain::from_config(&config.toolchain, config.case_timeout());
    let build: Box<dyn BuildStep> = if options.build {
        Box::new(CommandBuild::from_config(&config.build))
    } else {
        Box::new(SkipBuild)
    };

    let mut harness = Harness::new(Box::new(toolchain), build, Reporter::stdout());
    let summary = harness.run(&options).await?;

    if let Some(path) = &args.report {
        summary.write_json(path)?;
        tracing::info!("Wrote report to {}", path.display());
    }

    Ok(summary)
}

/// Merge CLI flags over configuration
pub fn run_options(args: &RunArgs, config: &Config) -> RunOptions {
    RunOptions {
        build: !args.no_build,
        dry_run: args.dry_run,
        filter: args.filter.clone(),
        fixture_dir: args
            .fixtures
            .clone()
            .unwrap_or_else(|| config.fixtures.dir.clone()),
        layout: config.fixtures.clone(),
        modes: args.modes.clone(),
    }
}
