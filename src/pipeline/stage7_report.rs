use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::dashboard::Dashboard;
use crate::report::html::render_dashboard_html;
use crate::report::json::render_dashboard_json;
use crate::report::text::render_report_text;
use crate::report::{ReportContext, ReportError};

pub const JSON_FILE: &str = "dashboard.json";
pub const TEXT_FILE: &str = "report.txt";
pub const HTML_FILE: &str = "dashboard.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    All,
    Json,
    Text,
    Html,
}

impl ReportFormat {
    fn wants(self, other: ReportFormat) -> bool {
        self == ReportFormat::All || self == other
    }
}

/// Writes the last rendered view. The banner of a later failed load is
/// carried along so readers can see the view is not the newest request.
pub fn write_reports(
    dashboard: &Dashboard,
    out_dir: &Path,
    format: ReportFormat,
    frame_step_ms: u64,
) -> Result<Vec<PathBuf>, ReportError> {
    let view = dashboard.view().ok_or(ReportError::NothingRendered)?;
    fs::create_dir_all(out_dir)?;

    let ctx = ReportContext {
        view,
        state: dashboard.state().name(),
        banner: dashboard.banner(),
        fmt: dashboard.number_format(),
        counters: dashboard.counters(),
        charts: dashboard.registry().handles().collect(),
        frame_step_ms,
    };

    let mut written = Vec::new();
    if format.wants(ReportFormat::Json) {
        let path = out_dir.join(JSON_FILE);
        write_text(&path, &render_dashboard_json(&ctx)?)?;
        written.push(path);
    }
    if format.wants(ReportFormat::Text) {
        let path = out_dir.join(TEXT_FILE);
        write_text(&path, &render_report_text(&ctx))?;
        written.push(path);
    }
    if format.wants(ReportFormat::Html) {
        let path = out_dir.join(HTML_FILE);
        write_text(&path, &render_dashboard_html(&ctx))?;
        written.push(path);
    }

    for path in &written {
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(written)
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_report.rs"]
mod tests;
