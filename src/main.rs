mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, Selection};
use vesaire::utils::format_size;
use vesaire::{
    Analyzer, CleanupCategory, CleanupOptions, Environment, ExclusionSet, NativePlatform,
    Orchestrator, SystemVolumes,
};

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let env = Environment::from_process();
    tracing::debug!(?env, "environment");

    match cli.command {
        Command::Scan { selection } => clean(env, &selection, true, cli.json),
        Command::Clean { confirm, selection } => {
            if !confirm && !cli.json {
                output::print_no_confirm_warning();
            }
            clean(env, &selection, !confirm, cli.json)
        }
        Command::Analyze => analyze(&env, cli.json),
    }
}

fn options_from(selection: &Selection) -> Result<CleanupOptions> {
    if selection.quick {
        return Ok(CleanupOptions::quick());
    }
    if selection.categories.is_empty() {
        return Ok(CleanupOptions::all());
    }
    let mut categories = Vec::new();
    for name in &selection.categories {
        let category = CleanupCategory::from_name(name).with_context(|| {
            let known: Vec<_> = CleanupCategory::ALL.iter().map(|c| c.name()).collect();
            format!("unknown category '{name}' (expected one of: {})", known.join(", "))
        })?;
        categories.push(category);
    }
    Ok(CleanupOptions::new(categories)?)
}

fn clean(env: Environment, selection: &Selection, dry_run: bool, json: bool) -> Result<()> {
    let options = options_from(selection)?;

    let mut orchestrator = Orchestrator::new(env, NativePlatform).dry_run(dry_run);
    if !selection.excludes.is_empty() {
        orchestrator =
            orchestrator.with_exclusion(ExclusionSet::default().with_substrings(&selection.excludes));
    }

    if !json {
        output::print_banner();
    }
    let mut handle = orchestrator.spawn(options).context("failed to start cleanup")?;
    for event in handle.by_ref() {
        if !json {
            output::print_progress(&event);
        }
    }

    let result = match handle.wait() {
        Ok(result) => result,
        Err(e) => {
            if !dry_run && !json {
                output::print_warning("cleanup stopped early; files removed before the failure stay removed");
            }
            return Err(e).context("cleanup failed");
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    output::print_summary(&result, dry_run);
    if dry_run {
        output::print_dry_run_footer();
    } else {
        output::print_clean_complete(&format_size(result.total_freed_bytes()));
    }
    Ok(())
}

fn analyze(env: &Environment, json: bool) -> Result<()> {
    if !json {
        output::print_banner();
    }
    let analyzer = Analyzer::new(vesaire::analyzer::default_locations(env), SystemVolumes);
    let mut handle = analyzer.spawn().context("failed to start analysis")?;
    for event in handle.by_ref() {
        if !json {
            output::print_progress(&event);
        }
    }
    let report = handle.wait().context("analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_analysis(&report);
    }
    Ok(())
}
