use serde::Serialize;

use crate::model::payload::{Kpis, Narrative, RiskSeverity};
use crate::pipeline::stage4_funnel::{FunnelAnalysis, Severity, Transition};
use crate::report::NumberFormat;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: &'static str,
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyTables {
    pub retry: Vec<TableRow>,
    pub cost: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotItem {
    pub label: &'static str,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropCallout {
    pub heading: &'static str,
    pub label: String,
    pub lost_count: f64,
    pub lost_pct: f64,
    pub severity: Severity,
    pub sentence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskCard {
    pub title: String,
    pub body: String,
    pub severity: RiskSeverity,
    pub badge: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeverCard {
    pub number: usize,
    pub title: String,
    pub body: String,
}

const MISSING: &str = "—";

fn row(label: &'static str, value: Option<f64>, render: impl Fn(f64) -> String) -> TableRow {
    TableRow {
        label,
        value,
        display: value.map(render).unwrap_or_else(|| MISSING.to_string()),
    }
}

pub fn efficiency_tables(kpis: &Kpis, fmt: &NumberFormat) -> EfficiencyTables {
    let calls = |v: f64| format!("{} calls", fmt.locale(v));
    let retry = vec![
        row("Avg Attempts — Connected", kpis.avg_attempts_connected, calls),
        row(
            "Avg Attempts — Not Connected",
            kpis.avg_attempts_not_connected,
            calls,
        ),
        row("Attempt Efficiency", kpis.attempt_efficiency, |v| {
            fmt.percent(v)
        }),
        row("Total AI Attempts", kpis.total_attempted_calls, |v| {
            fmt.count(v)
        }),
        row("Total AI Connections", kpis.total_connected_calls, |v| {
            fmt.count(v)
        }),
    ];
    let money = |v: f64| fmt.currency(v);
    let cost = vec![
        row("Cost per PTP", kpis.cost_per_ptp, money),
        row("Cost per Connection", kpis.cost_per_connection, money),
        row("Cost per Attempt", kpis.cost_per_attempt, money),
        row("Cost per Lead", kpis.cost_per_lead, money),
        row("Avg Spend per Lead", kpis.spend_mean, money),
    ];
    EfficiencyTables { retry, cost }
}

pub fn snapshot(kpis: &Kpis, fmt: &NumberFormat) -> Vec<SnapshotItem> {
    let opt = |v: Option<f64>, render: &dyn Fn(f64) -> String| {
        v.map(render).unwrap_or_else(|| MISSING.to_string())
    };
    let ptps = match (kpis.ptp_count, kpis.ptp_pct) {
        (Some(n), Some(p)) => format!("{} ({})", fmt.count(n), fmt.percent(p)),
        (Some(n), None) => fmt.count(n),
        _ => MISSING.to_string(),
    };
    vec![
        SnapshotItem {
            label: "Leads",
            display: opt(kpis.total, &|v| fmt.count(v)),
        },
        SnapshotItem {
            label: "PTPs",
            display: ptps,
        },
        SnapshotItem {
            label: "Connected",
            display: opt(kpis.connected_leads, &|v| fmt.count(v)),
        },
        SnapshotItem {
            label: "Total Spend",
            display: opt(kpis.total_spend, &|v| fmt.currency_whole(v)),
        },
    ]
}

fn callout(heading: &'static str, verb: &str, t: &Transition, fmt: &NumberFormat) -> DropCallout {
    DropCallout {
        heading,
        label: t.label.clone(),
        lost_count: t.lost_count,
        lost_pct: t.lost_pct,
        severity: t.severity,
        sentence: format!(
            "{}: {} {} {} leads ({}).",
            heading,
            t.label,
            verb,
            fmt.count(t.lost_count),
            fmt.percent(t.lost_pct)
        ),
    }
}

pub fn drop_callouts(funnel: &FunnelAnalysis, fmt: &NumberFormat) -> Vec<DropCallout> {
    let mut out = Vec::with_capacity(2);
    if let Some(t) = funnel.top() {
        out.push(callout("Critical", "loses", t, fmt));
    }
    if let Some(t) = funnel.second() {
        out.push(callout("Secondary", "drops", t, fmt));
    }
    out
}

pub fn risk_cards(risks: &[Narrative]) -> Vec<RiskCard> {
    risks
        .iter()
        .map(|r| {
            let severity = r.severity.unwrap_or(RiskSeverity::Medium);
            RiskCard {
                title: r.title.clone(),
                body: r.body.clone(),
                severity,
                badge: severity.label(),
            }
        })
        .collect()
}

pub fn lever_cards(levers: &[Narrative]) -> Vec<LeverCard> {
    levers
        .iter()
        .enumerate()
        .map(|(i, l)| LeverCard {
            number: i + 1,
            title: l.title.clone(),
            body: l.body.clone(),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_efficiency.rs"]
mod tests;
