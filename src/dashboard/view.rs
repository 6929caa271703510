use serde::Serialize;

use crate::dashboard::registry::{ChartKind, ChartSpec, Dataset, Region};
use crate::model::issues::Issue;
use crate::model::palette::{GREEN, RED, display_label};
use crate::model::payload::{Kpis, MetricsPayload};
use crate::model::thresholds::DashboardProfile;
use crate::pipeline::stage2_benchmarks::{HealthPill, KpiCard, run_stage2};
use crate::pipeline::stage3_score::{ScoreBreakdown, decompose};
use crate::pipeline::stage4_funnel::{FunnelAnalysis, analyze};
use crate::pipeline::stage5_distributions::{
    BinSeries, ConnectionSplit, PointGroup, Slice, Stage5Inputs, run_stage5,
};
use crate::pipeline::stage6_efficiency::{
    DropCallout, EfficiencyTables, LeverCard, RiskCard, SnapshotItem, drop_callouts,
    efficiency_tables, lever_cards, risk_cards, snapshot,
};
use crate::report::NumberFormat;

/// Everything the renderers need, derived once per render pass. Absent
/// regions are `None`; they are omitted, never shown with stale data.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub source: String,
    pub cards: Vec<KpiCard>,
    pub pills: Vec<HealthPill>,
    pub snapshot: Vec<SnapshotItem>,
    pub score: Option<ScoreBreakdown>,
    pub funnel: Option<FunnelAnalysis>,
    pub callouts: Vec<DropCallout>,
    pub efficiency: Option<EfficiencyTables>,
    pub dispositions: Option<Vec<Slice>>,
    pub states: Option<Vec<Slice>>,
    pub conn_by_disp: Option<ConnectionSplit>,
    pub scatter: Option<Vec<PointGroup>>,
    pub attempt_dist: Option<BinSeries>,
    pub spend_hist: Option<BinSeries>,
    pub risks: Vec<RiskCard>,
    pub levers: Vec<LeverCard>,
    pub issues: Vec<Issue>,
}

pub fn build_view(
    source: &str,
    payload: &MetricsPayload,
    mut issues: Vec<Issue>,
    profile: &DashboardProfile,
    fmt: &NumberFormat,
) -> DashboardView {
    let empty = Kpis::default();
    let kpis = payload.kpis.as_ref();
    let score = payload.score.as_ref().map(|s| decompose(s, profile));
    let funnel = payload.funnel.as_deref().map(|f| analyze(f, profile));

    let stage2 = run_stage2(
        kpis.unwrap_or(&empty),
        payload.score.as_ref().map(|s| s.value),
        profile,
        fmt,
    );
    let stage5 = run_stage5(&Stage5Inputs {
        dispositions: kpis.and_then(|k| k.dispositions.as_deref()),
        states: kpis.and_then(|k| k.states.as_deref()),
        conn_by_disp: payload.charts.conn_by_disp.as_ref(),
        scatter: payload.charts.scatter.as_deref(),
        attempt_dist: payload.charts.attempt_dist.as_ref(),
        spend_hist: payload.charts.spend_hist.as_ref(),
    });

    if let Some(s) = &score {
        issues.extend(s.issues.iter().cloned());
    }
    if let Some(f) = &funnel {
        issues.extend(f.issues.iter().cloned());
    }
    issues.extend(stage5.issues);

    DashboardView {
        source: source.to_string(),
        cards: stage2.cards,
        pills: stage2.pills,
        snapshot: kpis.map(|k| snapshot(k, fmt)).unwrap_or_default(),
        callouts: funnel
            .as_ref()
            .map(|f| drop_callouts(f, fmt))
            .unwrap_or_default(),
        score,
        funnel,
        efficiency: kpis.map(|k| efficiency_tables(k, fmt)),
        dispositions: stage5.dispositions,
        states: stage5.states,
        conn_by_disp: stage5.conn_by_disp,
        scatter: stage5.scatter,
        attempt_dist: stage5.attempt_dist,
        spend_hist: stage5.spend_hist,
        risks: risk_cards(&payload.risks),
        levers: lever_cards(&payload.levers),
        issues,
    }
}

fn slice_spec(kind: ChartKind, slices: &[Slice], label: &str) -> ChartSpec {
    ChartSpec {
        kind,
        horizontal: false,
        labels: slices.iter().map(|s| s.label.clone()).collect(),
        datasets: vec![Dataset::values(
            label,
            slices.iter().map(|s| s.count).collect(),
            slices.iter().map(|s| s.color.to_string()).collect(),
        )],
    }
}

fn bin_spec(series: &BinSeries, label: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        horizontal: false,
        labels: series.labels.clone(),
        datasets: vec![Dataset::values(
            label,
            series.values.clone(),
            series.colors.clone(),
        )],
    }
}

/// One spec per region the view can fill, in region order.
pub fn chart_specs(view: &DashboardView) -> Vec<(Region, ChartSpec)> {
    let mut specs = Vec::new();

    if let Some(score) = view.score.as_ref().filter(|s| !s.rows.is_empty()) {
        let rows = &score.rows;
        specs.push((
            Region::ScoreComponents,
            ChartSpec {
                kind: ChartKind::Bar,
                horizontal: true,
                labels: rows.iter().map(|r| r.name.clone()).collect(),
                datasets: vec![
                    Dataset::values(
                        "Score",
                        rows.iter().map(|r| r.value).collect(),
                        rows.iter().map(|r| r.color.to_string()).collect(),
                    ),
                    // Unknown maxima plot as 0.
                    Dataset::values(
                        "Max",
                        rows.iter().map(|r| r.max.unwrap_or(0.0)).collect(),
                        rows.iter().map(|r| format!("{}18", r.color)).collect(),
                    ),
                ],
            },
        ));
    }
    if let Some(states) = &view.states {
        specs.push((
            Region::StateDonut,
            slice_spec(ChartKind::Doughnut, states, "Leads"),
        ));
    }
    if let Some(disp) = &view.dispositions {
        specs.push((Region::Dispositions, slice_spec(ChartKind::Bar, disp, "Leads")));
        specs.push((
            Region::DispositionDonut,
            slice_spec(ChartKind::Doughnut, disp, "Leads"),
        ));
    }
    if let Some(split) = &view.conn_by_disp {
        let n = split.labels.len();
        specs.push((
            Region::ConnectionByDisposition,
            ChartSpec {
                kind: ChartKind::StackedBar,
                horizontal: true,
                labels: split.labels.clone(),
                datasets: vec![
                    Dataset::values("Connected", split.connected.clone(), vec![GREEN.to_string(); n]),
                    Dataset::values(
                        "Not Connected",
                        split.not_connected.clone(),
                        vec![RED.to_string(); n],
                    ),
                ],
            },
        ));
    }
    if let Some(groups) = &view.scatter {
        specs.push((
            Region::Scatter,
            ChartSpec {
                kind: ChartKind::Scatter,
                horizontal: false,
                labels: Vec::new(),
                datasets: groups
                    .iter()
                    .map(|g| Dataset::points(display_label(&g.category), g.points.clone(), g.color))
                    .collect(),
            },
        ));
    }
    if let Some(series) = &view.attempt_dist {
        specs.push((Region::AttemptDistribution, bin_spec(series, "Leads")));
    }
    if let Some(series) = &view.spend_hist {
        specs.push((Region::SpendHistogram, bin_spec(series, "Leads")));
    }
    specs
}

#[cfg(test)]
#[path = "../../tests/src_inline/dashboard/view.rs"]
mod tests;
