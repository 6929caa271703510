use serde::Serialize;

use crate::dashboard::view::DashboardView;
use crate::model::issues::count_by_kind;
use crate::report::{ReportContext, ReportError};

#[derive(Serialize)]
struct IssueCount {
    kind: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct DashboardDocument<'a> {
    tool: &'static str,
    version: &'static str,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    banner: Option<&'a str>,
    issue_counts: Vec<IssueCount>,
    dashboard: &'a DashboardView,
}

pub fn render_dashboard_json(ctx: &ReportContext<'_>) -> Result<String, ReportError> {
    let doc = DashboardDocument {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        state: ctx.state,
        banner: ctx.banner,
        issue_counts: count_by_kind(&ctx.view.issues)
            .into_iter()
            .map(|(kind, count)| IssueCount {
                kind: kind.name(),
                count,
            })
            .collect(),
        dashboard: ctx.view,
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
