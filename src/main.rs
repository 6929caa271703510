mod animation;
mod dashboard;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::animation::{Animator, CounterSpec};
use crate::dashboard::{Dashboard, LoadState};
use crate::input::profile::load_profile;
use crate::input::{DemoSource, FileSource};
use crate::model::thresholds::DashboardProfile;
use crate::pipeline::stage7_report::{ReportFormat, write_reports};
use crate::report::NumberFormat;

const DEFAULT_FRAME_STEP_MS: u64 = 50;

#[derive(Debug, Parser)]
#[command(name = "recoveriq-dash", version, about)]
struct Cli {
    /// Debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one or more saved payloads; the last successful one is written.
    Render {
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::All)]
        format: ReportFormat,
        #[arg(long, default_value_t = DEFAULT_FRAME_STEP_MS)]
        frame_step_ms: u64,
    },
    /// Render the bundled demo payload.
    Demo {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::All)]
        format: ReportFormat,
    },
    /// Print the frames of a single count-up.
    Counter {
        #[arg(long, allow_negative_numbers = true)]
        target: f64,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        suffix: String,
        #[arg(long, default_value_t = 0)]
        decimals: usize,
        #[arg(long, default_value_t = 900)]
        duration_ms: u64,
        #[arg(long, default_value_t = 100)]
        step_ms: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Render {
            input,
            out,
            profile,
            format,
            frame_step_ms,
        } => {
            let mut dashboard = Dashboard::new(resolve_profile(profile.as_deref())?);
            for path in &input {
                dashboard.load(&FileSource::new(path));
            }
            finish(&dashboard, &out, format, frame_step_ms)
        }
        Command::Demo {
            out,
            profile,
            format,
        } => {
            let mut dashboard = Dashboard::new(resolve_profile(profile.as_deref())?);
            dashboard.load(&DemoSource);
            finish(&dashboard, &out, format, DEFAULT_FRAME_STEP_MS)
        }
        Command::Counter {
            target,
            prefix,
            suffix,
            decimals,
            duration_ms,
            step_ms,
        } => {
            let fmt = NumberFormat::from_profile(&DashboardProfile::default_v1());
            let spec = CounterSpec::new(target, duration_ms)
                .prefix(&prefix)
                .suffix(&suffix)
                .decimals(decimals);
            let counter = Animator::default().start("cli", spec);
            for (at, frame) in counter.frames(Duration::from_millis(step_ms), &fmt) {
                println!("{at:>6}ms  {frame}");
            }
            Ok(())
        }
    }
}

fn resolve_profile(path: Option<&Path>) -> Result<DashboardProfile, String> {
    match path {
        Some(path) => load_profile(path).map_err(|e| e.to_string()),
        None => Ok(DashboardProfile::default_v1()),
    }
}

/// Writes whatever was last rendered; fails only when nothing ever was.
fn finish(
    dashboard: &Dashboard,
    out: &Path,
    format: ReportFormat,
    frame_step_ms: u64,
) -> Result<(), String> {
    if dashboard.state() == LoadState::Error {
        if let Some(banner) = dashboard.banner() {
            tracing::warn!(banner, "last load failed; writing previous view");
        }
    }
    if dashboard.view().is_none() {
        return Err(dashboard
            .banner()
            .map(|b| format!("nothing rendered: {b}"))
            .unwrap_or_else(|| "nothing rendered".to_string()));
    }
    let written = write_reports(dashboard, out, format, frame_step_ms).map_err(|e| e.to_string())?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
