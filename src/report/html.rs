//! Self-contained HTML dashboard: inline CSS, plain-markup charts and a small
//! script that replays the pre-computed counter frames.

use std::time::Duration;

use crate::dashboard::registry::{ChartHandle, ChartKind, ChartSpec, Dataset, Region};
use crate::dashboard::view::DashboardView;
use crate::model::palette::NEUTRAL;
use crate::pipeline::stage2_benchmarks::KpiCard;
use crate::pipeline::stage4_funnel::FunnelAnalysis;
use crate::pipeline::stage6_efficiency::TableRow;
use crate::report::{NumberFormat, ReportContext, format_fixed};

pub fn render_dashboard_html(ctx: &ReportContext<'_>) -> String {
    let view = ctx.view;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>RecoverIQ - {source}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {banner}
        {kpis}
        {score}
        {funnel}
        {efficiency}
        {charts}
        {risks}
        {levers}
        {issues}
    </div>
    <script>{js}</script>
</body>
</html>
"#,
        source = html_escape(&view.source),
        css = inline_css(),
        js = inline_javascript(),
        header = render_header(view, ctx.state),
        banner = ctx
            .banner
            .map(|b| format!(r#"<div class="banner">{}</div>"#, html_escape(b)))
            .unwrap_or_default(),
        kpis = render_kpis(ctx),
        score = render_score(view, ctx.fmt),
        funnel = view
            .funnel
            .as_ref()
            .map(|f| render_funnel(f, view, ctx.fmt))
            .unwrap_or_default(),
        efficiency = render_efficiency(view),
        charts = render_charts(&ctx.charts, ctx.fmt),
        risks = render_risks(view),
        levers = render_levers(view),
        issues = render_issues(view),
    )
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; background: #0b1622; color: #e2e8f0; line-height: 1.5; }
.container { max-width: 1280px; margin: 0 auto; padding: 2rem; }
header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
header h1 { font-size: 1.6rem; color: #c9a84c; }
.chip { border: 1px solid #1a3050; border-radius: 999px; padding: 2px 10px; font-size: 12px; color: #94a3b8; margin-left: 8px; }
.snapshot { display: flex; gap: 1.5rem; font-size: 13px; color: #94a3b8; }
.snapshot strong { color: #e2e8f0; }
.banner { background: #3b1219; border: 1px solid #ef4444; color: #fecaca; padding: 10px 14px; border-radius: 8px; margin-bottom: 1rem; }
section { margin-bottom: 2rem; }
section h2 { font-size: 13px; letter-spacing: .08em; text-transform: uppercase; color: #64748b; margin-bottom: .75rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(190px, 1fr)); gap: 12px; }
.card { background: #0f1f30; border: 1px solid #1a3050; border-top: 3px solid var(--accent); border-radius: 10px; padding: 14px; }
.card .lbl { font-size: 12px; color: #94a3b8; }
.card .val { font-size: 1.7rem; font-weight: 700; }
.card .sub { font-size: 12px; color: #64748b; }
.track { height: 5px; background: #1a3050; border-radius: 3px; margin-top: 8px; overflow: hidden; }
.fill { height: 100%; border-radius: 3px; }
.pills { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 12px; }
.pill { border-radius: 999px; padding: 3px 12px; font-size: 12px; border: 1px solid; }
.pill.good { color: #22c55e; border-color: #22c55e55; }
.pill.warn { color: #f59e0b; border-color: #f59e0b55; }
.pill.bad { color: #ef4444; border-color: #ef444455; }
.score-head { display: flex; align-items: baseline; gap: 12px; margin-bottom: 10px; }
.score-val { font-size: 2.4rem; font-weight: 800; }
.stack { display: flex; height: 22px; border-radius: 6px; overflow: hidden; background: #1a3050; }
.legend { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 6px; margin-top: 10px; font-size: 13px; }
.dot { display: inline-block; width: 9px; height: 9px; border-radius: 50%; margin-right: 6px; }
.funnel-bar { margin: 0 auto; padding: 8px 14px; border-radius: 8px; display: flex; justify-content: space-between; font-size: 13px; }
.arrow { text-align: center; font-size: 11px; margin: 3px 0; }
.arrow.normal { color: #475569; }
.arrow.warn { color: #f59e0b; }
.arrow.critical { color: #ef4444; }
.callout { background: #0f1f30; border-left: 3px solid #ef4444; padding: 10px 14px; margin-top: 12px; font-size: 13px; }
.tables { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.table { background: #0f1f30; border: 1px solid #1a3050; border-radius: 10px; padding: 12px; }
.row { display: flex; justify-content: space-between; padding: 4px 0; border-bottom: 1px solid #1a305055; font-size: 13px; }
.charts { display: grid; grid-template-columns: repeat(auto-fill, minmax(380px, 1fr)); gap: 12px; }
.chart { background: #0f1f30; border: 1px solid #1a3050; border-radius: 10px; padding: 12px; }
.chart h3 { font-size: 13px; color: #94a3b8; margin-bottom: 8px; }
.bar-row { display: grid; grid-template-columns: 150px 1fr 64px; gap: 8px; align-items: center; font-size: 12px; margin: 3px 0; }
.bar-track { display: flex; height: 12px; background: #1a3050; border-radius: 3px; overflow: hidden; }
.bar-group { display: flex; flex-direction: column; gap: 2px; }
.bar-group .bar-track { height: 6px; }
.donut { width: 150px; height: 150px; border-radius: 50%; margin: 6px auto; }
.empty { color: #64748b; font-size: 12px; }
.risk, .lever { background: #0f1f30; border: 1px solid #1a3050; border-radius: 10px; padding: 12px; margin-bottom: 8px; }
.badge { font-size: 10px; font-weight: 700; padding: 2px 8px; border-radius: 4px; margin-right: 8px; }
.badge.high { background: #ef444433; color: #ef4444; }
.badge.medium { background: #f59e0b33; color: #f59e0b; }
.badge.low { background: #22c55e33; color: #22c55e; }
.num { display: inline-block; width: 22px; height: 22px; text-align: center; border-radius: 50%; background: #c9a84c; color: #0b1622; font-weight: 700; margin-right: 8px; }
.issues li { font-size: 12px; color: #94a3b8; margin-left: 1.2rem; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
document.querySelectorAll('[data-frames]').forEach(function (el) {
  var frames = JSON.parse(el.getAttribute('data-frames'));
  if (!frames.length) return;
  var start = performance.now();
  var i = 0;
  function step(now) {
    var t = now - start;
    while (i + 1 < frames.length && frames[i + 1][0] <= t) i++;
    el.textContent = frames[i][1];
    if (i + 1 < frames.length) requestAnimationFrame(step);
  }
  requestAnimationFrame(step);
});
"#
}

fn render_header(view: &DashboardView, state: &str) -> String {
    let snapshot = view
        .snapshot
        .iter()
        .map(|s| {
            format!(
                "<span>{} <strong>{}</strong></span>",
                html_escape(s.label),
                html_escape(&s.display)
            )
        })
        .collect::<String>();
    format!(
        r#"<header>
            <div><h1>RecoverIQ</h1><span class="chip">{source}</span><span class="chip">{state}</span></div>
            <div class="snapshot">{snapshot}</div>
        </header>"#,
        source = html_escape(&view.source),
        state = html_escape(state),
        snapshot = snapshot,
    )
}

fn counter_frames(ctx: &ReportContext<'_>, card: &KpiCard) -> String {
    let step = Duration::from_millis(ctx.frame_step_ms.max(1));
    let frames = ctx
        .counters
        .iter()
        .find(|c| c.spec == card.counter && !c.is_cancelled())
        .map(|c| c.frames(step, ctx.fmt))
        .unwrap_or_default();
    serde_json::to_string(&frames).unwrap_or_else(|_| "[]".to_string())
}

fn render_kpis(ctx: &ReportContext<'_>) -> String {
    let view = ctx.view;
    if view.cards.is_empty() {
        return String::new();
    }
    let cards = view
        .cards
        .iter()
        .map(|card| {
            let gauge = card
                .gauge
                .map(|g| {
                    format!(
                        r#"<div class="track"><div class="fill" style="width:{}%;background:{}"></div></div>"#,
                        format_fixed(g.fill_percent, 0),
                        card.accent
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<div class="card" style="--accent:{accent}"><div class="lbl">{label}</div><div class="val" data-frames="{frames}">{display}</div><div class="sub">{sub}</div>{gauge}</div>"#,
                accent = card.accent,
                label = html_escape(card.label),
                frames = html_escape(&counter_frames(ctx, card)),
                display = html_escape(&card.display),
                sub = html_escape(&card.sub),
                gauge = gauge,
            )
        })
        .collect::<String>();
    let pills = view
        .pills
        .iter()
        .map(|p| {
            format!(
                r#"<span class="pill {}">{} {}</span>"#,
                p.tier.name(),
                html_escape(&p.label),
                html_escape(&p.display)
            )
        })
        .collect::<String>();
    format!(
        r#"<section><h2>01 · Key indicators</h2><div class="grid">{cards}</div><div class="pills">{pills}</div></section>"#
    )
}

fn render_score(view: &DashboardView, fmt: &NumberFormat) -> String {
    let Some(score) = &view.score else {
        return String::new();
    };
    let segments = score
        .rows
        .iter()
        .map(|r| {
            format!(
                r#"<div title="{}" style="width:{}%;background:{}"></div>"#,
                html_escape(&r.name),
                format_fixed((r.value / 10.0 * 100.0).clamp(0.0, 100.0), 2),
                r.color
            )
        })
        .collect::<String>();
    let legend = score
        .rows
        .iter()
        .map(|r| {
            let max = r
                .max
                .map(|m| format!(" / {}", fmt.locale(m)))
                .unwrap_or_default();
            format!(
                r#"<div><span class="dot" style="background:{}"></span>{} <strong>{}</strong>{}</div>"#,
                r.color,
                html_escape(&r.name),
                fmt.locale(r.value),
                max
            )
        })
        .collect::<String>();
    format!(
        r#"<section><h2>02 · Composite score</h2>
            <div class="score-head"><span class="score-val" style="color:{color}">{value}</span><span>/ 10 · <strong style="color:{color}">{grade}</strong></span></div>
            <div class="stack">{segments}</div><div class="legend">{legend}</div></section>"#,
        color = html_escape(&score.grade_color),
        value = format_fixed(score.value, 1),
        grade = score.grade_label,
    )
}

fn render_funnel(funnel: &FunnelAnalysis, view: &DashboardView, fmt: &NumberFormat) -> String {
    let mut body = String::new();
    for (i, stage) in funnel.stages.iter().enumerate() {
        body.push_str(&format!(
            r#"<div class="funnel-bar" style="width:{width}%;background:{color}18;border:1px solid {color}55"><span>{name}</span><span>{count} · {share}%</span></div>"#,
            width = format_fixed(stage.width_pct, 2),
            color = html_escape(&stage.color),
            name = html_escape(&stage.stage),
            count = fmt.count(stage.value),
            share = format_fixed(stage.share_pct, 1),
        ));
        if let Some(t) = funnel.transitions.get(i) {
            body.push_str(&format!(
                r#"<div class="arrow {}">▼ −{} ({} lost)</div>"#,
                t.severity.name(),
                fmt.percent(t.lost_pct),
                fmt.count(t.lost_count)
            ));
        }
    }
    let callouts = view
        .callouts
        .iter()
        .map(|c| html_escape(&c.sentence))
        .collect::<Vec<_>>()
        .join("<br>");
    let callout = if callouts.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="callout">{callouts}</div>"#)
    };
    format!(r#"<section><h2>03 · Conversion funnel</h2>{body}{callout}</section>"#)
}

fn render_efficiency(view: &DashboardView) -> String {
    let Some(tables) = &view.efficiency else {
        return String::new();
    };
    let rows = |rows: &[TableRow]| {
        rows.iter()
            .map(|r| {
                format!(
                    r#"<div class="row"><span>{}</span><strong>{}</strong></div>"#,
                    html_escape(r.label),
                    html_escape(&r.display)
                )
            })
            .collect::<String>()
    };
    format!(
        r#"<section><h2>04 · Efficiency</h2><div class="tables"><div class="table"><h3>Retry &amp; Attempt Logic</h3>{}</div><div class="table"><h3>Cost Efficiency</h3>{}</div></div></section>"#,
        rows(&tables.retry),
        rows(&tables.cost)
    )
}

fn chart_title(handle: &ChartHandle) -> &'static str {
    match handle.region {
        Region::ScoreComponents => "Score components",
        Region::StateDonut => "Lead states",
        Region::Dispositions => "Dispositions",
        Region::DispositionDonut => "Disposition share",
        Region::ConnectionByDisposition => "Connection by disposition",
        Region::Scatter => "Attempts vs spend",
        Region::AttemptDistribution => "Attempt distribution",
        Region::SpendHistogram => "Spend distribution",
    }
}

fn render_charts(charts: &[&ChartHandle], fmt: &NumberFormat) -> String {
    if charts.is_empty() {
        return String::new();
    }
    let body = charts
        .iter()
        .map(|h| {
            format!(
                r#"<div class="chart" data-chart="{id}" data-region="{region}"><h3>{title}</h3>{body}</div>"#,
                id = h.id,
                region = h.region.name(),
                title = chart_title(h),
                body = render_chart_body(&h.spec, fmt),
            )
        })
        .collect::<String>();
    format!(r#"<section><h2>05 · Distributions</h2><div class="charts">{body}</div></section>"#)
}

fn render_chart_body(spec: &ChartSpec, fmt: &NumberFormat) -> String {
    if spec.datasets.iter().all(|d| d.values.is_empty() && d.points.is_empty()) {
        return r#"<div class="empty">No data</div>"#.to_string();
    }
    match spec.kind {
        ChartKind::Doughnut => render_donut(spec, fmt),
        ChartKind::Scatter => render_scatter(spec),
        ChartKind::Bar | ChartKind::StackedBar => render_bars(spec, fmt),
    }
}

fn color_at(colors: &[String], i: usize) -> &str {
    colors
        .get(i)
        .or_else(|| colors.first())
        .map(String::as_str)
        .unwrap_or(NEUTRAL)
}

/// Stacked datasets share one track scaled to the largest row total; grouped
/// datasets get a track each, scaled to the largest single value.
fn render_bars(spec: &ChartSpec, fmt: &NumberFormat) -> String {
    let stacked = spec.kind == ChartKind::StackedBar;
    let rows = spec.labels.len().max(1);
    let value_at = |d: &Dataset, i: usize| d.values.get(i).copied().unwrap_or(0.0).max(0.0);
    let peak = (0..rows)
        .map(|i| {
            let values = spec.datasets.iter().map(|d| value_at(d, i));
            if stacked {
                values.sum::<f64>()
            } else {
                values.fold(0.0_f64, f64::max)
            }
        })
        .fold(0.0_f64, f64::max);
    let segment = |d: &Dataset, i: usize| {
        let v = value_at(d, i);
        let w = if peak > 0.0 { v / peak * 100.0 } else { 0.0 };
        format!(
            r#"<div title="{}" style="width:{}%;background:{}"></div>"#,
            html_escape(&d.label),
            format_fixed(w, 2),
            html_escape(color_at(&d.colors, i))
        )
    };

    let mut out = String::new();
    for i in 0..rows {
        let label = spec.labels.get(i).map(String::as_str).unwrap_or("");
        let (bars, shown) = if stacked {
            let total: f64 = spec.datasets.iter().map(|d| value_at(d, i)).sum();
            let segments = spec.datasets.iter().map(|d| segment(d, i)).collect::<String>();
            (
                format!(r#"<div class="bar-track">{segments}</div>"#),
                fmt.count(total),
            )
        } else {
            let tracks = spec
                .datasets
                .iter()
                .map(|d| format!(r#"<div class="bar-track">{}</div>"#, segment(d, i)))
                .collect::<String>();
            let shown = spec
                .datasets
                .iter()
                .map(|d| fmt.locale(value_at(d, i)))
                .collect::<Vec<_>>()
                .join(" / ");
            (format!(r#"<div class="bar-group">{tracks}</div>"#), shown)
        };
        out.push_str(&format!(
            r#"<div class="bar-row"><span>{}</span>{}<span>{}</span></div>"#,
            html_escape(label),
            bars,
            html_escape(&shown)
        ));
    }
    out
}

fn render_donut(spec: &ChartSpec, fmt: &NumberFormat) -> String {
    let Some(data) = spec.datasets.first() else {
        return String::new();
    };
    let total: f64 = data.values.iter().map(|v| v.max(0.0)).sum();
    let mut stops = Vec::new();
    let mut legend = String::new();
    let mut at = 0.0;
    for (i, v) in data.values.iter().enumerate() {
        let share = if total > 0.0 {
            v.max(0.0) / total * 100.0
        } else {
            0.0
        };
        let color = html_escape(color_at(&data.colors, i));
        stops.push(format!(
            "{} {}% {}%",
            color,
            format_fixed(at, 2),
            format_fixed(at + share, 2)
        ));
        at += share;
        legend.push_str(&format!(
            r#"<div class="bar-row"><span><span class="dot" style="background:{}"></span>{}</span><span></span><span>{} · {}%</span></div>"#,
            color,
            html_escape(spec.labels.get(i).map(String::as_str).unwrap_or("")),
            fmt.count(*v),
            format_fixed(share, 1)
        ));
    }
    let gradient = if total > 0.0 {
        format!("conic-gradient({})", stops.join(", "))
    } else {
        "#1a3050".to_string()
    };
    format!(r#"<div class="donut" style="background:{gradient}"></div>{legend}"#)
}

fn render_scatter(spec: &ChartSpec) -> String {
    let points = spec.datasets.iter().flat_map(|d| d.points.iter());
    let (max_x, max_y) = points.fold((0.0_f64, 0.0_f64), |(mx, my), (x, y)| {
        (mx.max(*x), my.max(*y))
    });
    let scale = |v: f64, max: f64, span: f64| if max > 0.0 { v / max * span } else { 0.0 };
    let mut circles = String::new();
    let mut legend = String::new();
    for d in &spec.datasets {
        let color = html_escape(color_at(&d.colors, 0));
        for (x, y) in &d.points {
            circles.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="4" fill="{}" fill-opacity="0.7"/>"#,
                format_fixed(10.0 + scale(*x, max_x, 340.0), 1),
                format_fixed(190.0 - scale(*y, max_y, 180.0), 1),
                color
            ));
        }
        legend.push_str(&format!(
            r#"<span class="chip"><span class="dot" style="background:{}"></span>{} ({})</span>"#,
            color,
            html_escape(&d.label),
            d.points.len()
        ));
    }
    format!(
        r#"<svg viewBox="0 0 360 200" width="100%" role="img">{circles}</svg><div>{legend}</div>"#
    )
}

fn render_risks(view: &DashboardView) -> String {
    if view.risks.is_empty() {
        return String::new();
    }
    let body = view
        .risks
        .iter()
        .map(|r| {
            format!(
                r#"<div class="risk"><span class="badge {cls}">{badge}</span><strong>⚠ {title}</strong><p>{body}</p></div>"#,
                cls = r.badge.to_ascii_lowercase(),
                badge = r.badge,
                title = html_escape(&r.title),
                body = html_escape(&r.body),
            )
        })
        .collect::<String>();
    format!(r#"<section><h2>06 · Risks</h2>{body}</section>"#)
}

fn render_levers(view: &DashboardView) -> String {
    if view.levers.is_empty() {
        return String::new();
    }
    let body = view
        .levers
        .iter()
        .map(|l| {
            format!(
                r#"<div class="lever"><span class="num">{}</span><strong>✦ {}</strong><p>{}</p></div>"#,
                l.number,
                html_escape(&l.title),
                html_escape(&l.body)
            )
        })
        .collect::<String>();
    format!(r#"<section><h2>07 · Levers</h2>{body}</section>"#)
}

fn render_issues(view: &DashboardView) -> String {
    if view.issues.is_empty() {
        return String::new();
    }
    let items = view
        .issues
        .iter()
        .map(|i| {
            format!(
                "<li><code>{}</code> {}: {}</li>",
                i.kind.name(),
                html_escape(&i.path),
                html_escape(&i.detail)
            )
        })
        .collect::<String>();
    format!(r#"<section class="issues"><h2>Validation issues</h2><ul>{items}</ul></section>"#)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/html.rs"]
mod tests;
