//! Console rendering for runs and previews.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use ripple_git::ChangedFile;
use ripple_sync::{Abort, CheckVerdict, Outcome, Preflight, PullReport, RunContext};

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

pub fn print_pulls(pulls: &[PullReport]) {
    for pull in pulls {
        println!("Pulling latest from {}:", pull.project);
        if !pull.output.is_empty() {
            println!("{}", pull.output);
        }
        println!();
    }
}

pub fn print_abort(abort: &Abort) {
    println!("{abort}");
}

pub fn print_self_updated(ctx: &RunContext) {
    println!(
        "I've updated {} from {}; please rerun it.",
        ctx.self_file.display(),
        ctx.upstream_name
    );
}

pub fn print_kept_edits(ctx: &RunContext) {
    let warning = format!(
        "Warning: {} differs from the copy in {}, but it has uncommitted\n         changes here, so I'll leave it alone in case you're working on it.",
        ctx.self_file.display(),
        ctx.upstream_name
    );
    println!("{}", warning.yellow());
    println!();
}

pub fn print_outcome(ctx: &RunContext, outcome: &Outcome) {
    match outcome {
        Outcome::ChangesDetected { files } => print_changes(ctx, files),
        Outcome::SelfFileOnly => {
            println!(
                "The shared code is up-to-date, but {} has local changes.",
                ctx.self_file.display()
            );
            println!();
            println!("Next steps:");
            println!("  1. Create and merge a PR with just this change");
            println!("  2. Carry on!");
        }
        Outcome::UpToDate => println!("Shared is up-to-date."),
    }
}

#[derive(Tabled)]
struct ChangedRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "change")]
    change: String,
}

fn print_changes(ctx: &RunContext, files: &[ChangedFile]) {
    println!(
        "Done:    The {} shared code has differences which I've copied to here.",
        ctx.upstream_name
    );
    println!("         Use 'git status' to see which files have changed.");
    println!();

    let rows: Vec<ChangedRow> = files
        .iter()
        .map(|file| ChangedRow {
            file: file.path.display().to_string(),
            change: file.kind.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    println!();
    println!("         Next steps:");
    println!("           1. Run 'make coverage'");
    println!("           2. If all good, create and merge a PR with just this shared update");
    println!("              and the commit message:");
    println!("                chore(shared): sync shared code from upstream");
    println!("           3. Carry on!");
}

// ---------------------------------------------------------------------------
// Preview output
// ---------------------------------------------------------------------------

pub fn print_preflight(ctx: &RunContext, preview: &Preflight) {
    println!(
        "ripple v{} | {} <- {} | preview only, nothing pulled or written",
        env!("CARGO_PKG_VERSION"),
        ctx.local_name,
        ctx.upstream_name
    );
    println!();

    for check in &preview.checks {
        match &check.verdict {
            CheckVerdict::Pass => println!("  {} {}", "ok".green().bold(), check.label),
            CheckVerdict::PassWithSelfEdit => println!(
                "  {} {} {}",
                "ok".yellow().bold(),
                check.label,
                format!("(only {} is edited)", ctx.self_file.display()).yellow()
            ),
            CheckVerdict::Fail(reason) => {
                println!("  {} {}: {}", "no".red().bold(), check.label, reason)
            }
        }
    }
    println!();

    let Some(drift) = &preview.drift else {
        println!("A check failed; a real run would stop there. Drift was not scanned.");
        return;
    };

    if drift.self_file_differs {
        println!(
            "  {} {} differs from the upstream copy",
            "~".yellow().bold(),
            ctx.self_file.display()
        );
    }
    for folder in &drift.folders {
        if folder.is_clean() {
            println!("  {} {} in sync", "=".bright_black(), folder.folder.display());
            continue;
        }
        println!("  {} {}", "~".yellow().bold(), folder.folder.display());
        for path in &folder.added {
            println!("      {} {}", "+".green(), path.display());
        }
        for path in &folder.removed {
            println!("      {} {}", "-".red(), path.display());
        }
        for entry in &folder.changed {
            println!("      {} {}", "~".yellow(), entry.path.display());
        }
    }
    println!();

    if drift.is_clean() {
        println!("Everything is in sync; a run would change nothing.");
    } else {
        println!("Run 'ripple' (no flags) to apply. Note: the preview does not pull,");
        println!("so upstream commits not yet fetched are invisible here.");
    }

    for folder in &drift.folders {
        for entry in &folder.changed {
            let Some(diff) = &entry.diff else { continue };
            println!();
            print!("{diff}");
            if !diff.ends_with('\n') {
                println!();
            }
        }
    }
}
