use crate::model::palette::display_label;
use crate::pipeline::stage5_distributions::{BinSeries, Slice};
use crate::report::{NumberFormat, ReportContext, format_fixed};

pub fn render_report_text(ctx: &ReportContext<'_>) -> String {
    let view = ctx.view;
    let fmt = ctx.fmt;
    let mut out = String::new();

    out.push_str("RecoverIQ Lead Conversion Dashboard\n");
    out.push_str("===================================\n\n");
    out.push_str(&format!("Source: {}\n", view.source));
    out.push_str(&format!("State: {}\n", ctx.state));
    if let Some(banner) = ctx.banner {
        out.push_str(&format!("Last load failed: {banner}\n"));
    }
    if !view.snapshot.is_empty() {
        let parts = view
            .snapshot
            .iter()
            .map(|s| format!("{} {}", s.label, s.display))
            .collect::<Vec<_>>();
        out.push_str(&format!("Snapshot: {}\n", parts.join(" | ")));
    }
    out.push('\n');

    out.push_str("01. Key indicators\n");
    if view.cards.is_empty() {
        out.push_str("  (no KPI data)\n");
    }
    for card in &view.cards {
        let gauge = card
            .gauge
            .map(|g| format!("  gauge {}%", format_fixed(g.fill_percent, 0)))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:<18}{:>12}  {}{}\n",
            card.label, card.display, card.sub, gauge
        ));
    }
    if !view.pills.is_empty() {
        let pills = view
            .pills
            .iter()
            .map(|p| format!("{} {} [{}]", p.label, p.display, p.tier.name()))
            .collect::<Vec<_>>();
        out.push_str(&format!("  Health: {}\n", pills.join(" | ")));
    }
    out.push('\n');

    out.push_str("02. Composite score\n");
    match &view.score {
        Some(score) => {
            out.push_str(&format!(
                "  Score {}/10 ({})\n",
                format_fixed(score.value, 1),
                score.grade_label
            ));
            for row in &score.rows {
                let max = row
                    .max
                    .map(|m| format!(" / {}", fmt.locale(m)))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {:<26}{}{}\n",
                    row.name,
                    fmt.locale(row.value),
                    max
                ));
            }
        }
        None => out.push_str("  (no score data)\n"),
    }
    out.push('\n');

    out.push_str("03. Conversion funnel\n");
    match &view.funnel {
        Some(funnel) => {
            for (i, stage) in funnel.stages.iter().enumerate() {
                out.push_str(&format!(
                    "  {:<14}{:>10}  {:>6}%\n",
                    stage.stage,
                    fmt.count(stage.value),
                    format_fixed(stage.share_pct, 1)
                ));
                if let Some(t) = funnel.transitions.get(i) {
                    out.push_str(&format!(
                        "      -{} ({} lost) [{}]\n",
                        fmt.percent(t.lost_pct),
                        fmt.count(t.lost_count),
                        t.severity.name()
                    ));
                }
            }
            for callout in &view.callouts {
                out.push_str(&format!("  {}\n", callout.sentence));
            }
        }
        None => out.push_str("  (no funnel data)\n"),
    }
    out.push('\n');

    out.push_str("04. Efficiency\n");
    match &view.efficiency {
        Some(tables) => {
            out.push_str("  Retry & Attempt Logic\n");
            for row in &tables.retry {
                out.push_str(&format!("    {:<30}{}\n", row.label, row.display));
            }
            out.push_str("  Cost Efficiency\n");
            for row in &tables.cost {
                out.push_str(&format!("    {:<30}{}\n", row.label, row.display));
            }
        }
        None => out.push_str("  (no efficiency data)\n"),
    }
    out.push('\n');

    out.push_str("05. Distributions\n");
    if let Some(slices) = &view.dispositions {
        push_slices(&mut out, "Dispositions", slices, fmt);
    }
    if let Some(slices) = &view.states {
        push_slices(&mut out, "Lead states", slices, fmt);
    }
    if let Some(split) = &view.conn_by_disp {
        out.push_str("  Connection by disposition\n");
        for ((label, c), n) in split
            .labels
            .iter()
            .zip(&split.connected)
            .zip(&split.not_connected)
        {
            out.push_str(&format!(
                "    {:<24}{:>8} connected {:>8} not connected\n",
                label,
                fmt.count(*c),
                fmt.count(*n)
            ));
        }
    }
    if let Some(groups) = &view.scatter {
        out.push_str("  Attempts vs spend\n");
        for g in groups {
            out.push_str(&format!(
                "    {:<24}{} points\n",
                display_label(&g.category),
                g.points.len()
            ));
        }
    }
    if let Some(series) = &view.attempt_dist {
        push_bins(&mut out, "Attempt distribution", series, fmt);
    }
    if let Some(series) = &view.spend_hist {
        push_bins(&mut out, "Spend distribution", series, fmt);
    }
    out.push('\n');

    out.push_str("06. Risks\n");
    for risk in &view.risks {
        out.push_str(&format!("  [{}] {}\n", risk.badge, risk.title));
        out.push_str(&format!("      {}\n", risk.body));
    }
    out.push('\n');

    out.push_str("07. Levers\n");
    for lever in &view.levers {
        out.push_str(&format!("  {}. {}\n", lever.number, lever.title));
        out.push_str(&format!("     {}\n", lever.body));
    }

    if !view.issues.is_empty() {
        out.push_str(&format!("\nValidation issues ({})\n", view.issues.len()));
        for issue in &view.issues {
            out.push_str(&format!(
                "  {} {}: {}\n",
                issue.kind.name(),
                issue.path,
                issue.detail
            ));
        }
    }

    out
}

fn push_slices(out: &mut String, title: &str, slices: &[Slice], fmt: &NumberFormat) {
    out.push_str(&format!("  {title}\n"));
    if slices.is_empty() {
        out.push_str("    (none)\n");
    }
    for s in slices {
        out.push_str(&format!(
            "    {:<24}{:>8}  {:>5}%\n",
            s.label,
            fmt.count(s.count),
            format_fixed(s.share_pct, 1)
        ));
    }
}

fn push_bins(out: &mut String, title: &str, series: &BinSeries, fmt: &NumberFormat) {
    out.push_str(&format!("  {title}\n"));
    for (label, value) in series.labels.iter().zip(&series.values) {
        out.push_str(&format!("    {:<12}{:>8}\n", label, fmt.count(*value)));
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
