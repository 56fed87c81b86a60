mod blame_index;
mod delta;
mod error;
mod hunk_blamer;
mod line_mapper;
mod msg;
mod orchestrator;
mod patcher;
mod repo;

#[cfg(test)]
mod test_helpers;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::control;

use repo::GitRepo;

/// Rewrite an unstaged reformat into small commits attributed to the
/// original authors.
#[derive(Parser)]
#[command(name = "git-black", about = "Attribute a pending reformat back to its original authors")]
struct Cli {
    /// Number of workers used for the blame-collection phase
    #[arg(long, default_value_t = 8)]
    jobs: usize,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color
        || std::env::var_os("NO_COLOR").is_some()
        || std::env::var_os("TERM").is_some_and(|v| v == "dumb")
        || !std::io::stdout().is_terminal()
    {
        control::set_override(false);
    }

    if let Err(e) = run(cli) {
        msg::error(&format!("{e:#}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("could not determine the current directory")?;
    let repo = GitRepo::open(&cwd).context("could not open the repository")?;

    let summary = orchestrator::run(&repo, cli.jobs)?;

    if summary.commits_created == 0 {
        msg::success("nothing to attribute, working tree already matches HEAD");
    } else {
        msg::success(&format!(
            "created {} commit{}",
            summary.commits_created,
            if summary.commits_created == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}
