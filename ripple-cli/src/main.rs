//! ripple: pull the latest shared code from the upstream repo into this one.
//!
//! # Usage
//!
//! ```text
//! ripple              # checks, pulls, self-update guard, folder sync, report
//! ripple --dry-run    # read-only preview: checks plus pending drift
//! ripple --diff       # preview with unified diffs (implies --dry-run)
//! ```
//!
//! Run it from the root of the repo being updated. Configuration comes from
//! an optional `ripple.yaml` in that root; without one, the defaults apply.

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ripple_core::SyncConfig;
use ripple_git::GitCli;
use ripple_sync::{drift, pipeline, RunContext, RunReport, SelfUpdate};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ripple",
    version,
    about = "Sync shared folders from the upstream repo into this one",
    long_about = None,
)]
struct Cli {
    /// Preview checks and pending drift without pulling or writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print unified diffs for files that would change (implies --dry-run).
    #[arg(long)]
    diff: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("could not determine the current directory")?;
    let config = SyncConfig::load_at(&cwd)
        .with_context(|| format!("failed to load {}", ripple_core::CONFIG_FILE))?;
    let self_file = config.self_file_or(&default_self_file());
    let ctx = RunContext::new(&cwd, &config, self_file)
        .with_context(|| format!("could not resolve the repo at {}", cwd.display()))?;
    let git = GitCli::new();

    if cli.dry_run || cli.diff {
        let preview = drift::preflight(&ctx, &git, cli.diff)
            .with_context(|| format!("preview failed for {}", ctx.local_name))?;
        output::print_preflight(&ctx, &preview);
        return Ok(());
    }

    let report = pipeline::run(&ctx, &git)
        .with_context(|| format!("update run failed for {}", ctx.local_name))?;
    match report {
        RunReport::Aborted(abort) => output::print_abort(&abort),
        RunReport::SelfUpdated { pulls } => {
            output::print_pulls(&pulls);
            output::print_self_updated(&ctx);
        }
        RunReport::Completed {
            pulls,
            self_update,
            outcome,
        } => {
            output::print_pulls(&pulls);
            if self_update == SelfUpdate::KeptLocalEdits {
                output::print_kept_edits(&ctx);
            }
            output::print_outcome(&ctx, &outcome);
        }
    }
    Ok(())
}

/// The name this tool is checked in under, when `ripple.yaml` doesn't pin
/// one: the running executable's own file name.
fn default_self_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("ripple"))
}
