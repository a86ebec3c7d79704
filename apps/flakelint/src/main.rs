//! flakelint CLI binary entry point.
//! Loads the autoflake plugin from the discovered config, runs the requested
//! target and prints results.

use anyhow::Context;
use clap::Parser;
use flakelint::autoflake::{AutoflakePlugin, AUTOFLAKE_BIN};
use flakelint::cli::{Cli, Commands, RunArgs};
use flakelint::host::{CollectingReporter, PathContext, Plugin, Target};
use flakelint::{config, output, telemetry};
use owo_colors::OwoColorize;
use tracing::{info, Level};

fn main() {
    let cli = Cli::parse();
    let code = match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::Lint(args) => run_target(Target::Lint, &args),
        Commands::Format(args) => run_target(Target::Format, &args),
    };
    std::process::exit(code);
}

fn run_target(target: Target, args: &RunArgs) -> i32 {
    telemetry::init_tracing(Level::INFO);
    match execute(target, args) {
        Ok(code) => code,
        Err(e) => {
            let prefix = if std::env::var_os("NO_COLOR").is_none() {
                "error:".red().bold().to_string()
            } else {
                "error:".to_string()
            };
            eprintln!("{} {:#}", prefix, e);
            2
        }
    }
}

fn execute(target: Target, args: &RunArgs) -> anyhow::Result<i32> {
    let eff = config::resolve_effective(args.repo_root.as_deref(), args.output.as_deref())
        .context("failed to resolve configuration")?;
    match eff.config.as_ref() {
        Some(c) => info!("Using config {}", c.path.display()),
        None => info!("No flakelint config found; using defaults."),
    }

    let plugin: Box<dyn Plugin> = match &args.program {
        Some(p) => Box::new(AutoflakePlugin::with_program(p.clone())),
        None => flakelint::plugin(),
    };
    let components = plugin
        .load(&eff.config_path(), &eff.plugin_config(AUTOFLAKE_BIN))
        .context("failed to load autoflake plugin")?;

    let paths = PathContext::new(eff.base_dir());
    let mut exit_code = 0;
    for component in &components {
        if !component.targets().contains(&target) {
            info!("Skipping {}: target {} not supported", component.name(), target);
            continue;
        }
        component
            .export_setting(&paths)
            .with_context(|| format!("failed to export {} settings", component.name()))?;
        let command = component.create_command(target, &paths);
        let mut reporter = CollectingReporter::default();
        let code = command
            .run(&mut reporter)
            .with_context(|| format!("{} {} failed", command.name(), target))?;
        let report = reporter.into_report(command.name(), code);
        output::print_report(&report, &eff.output, args.diff);
        if !report.success() {
            exit_code = report.summary.exit_code;
        }
    }
    Ok(exit_code)
}
