use serde::Serialize;

use crate::model::issues::{Issue, IssueKind};
use crate::model::palette::{disposition_color, display_label, state_color};
use crate::model::payload::{CategoryCount, ConnByDisposition, Histogram, ScatterPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGroup {
    pub category: String,
    pub color: &'static str,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub key: String,
    pub label: String,
    pub count: f64,
    pub share_pct: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionSplit {
    pub labels: Vec<String>,
    pub connected: Vec<f64>,
    pub not_connected: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Stage5Inputs<'a> {
    pub dispositions: Option<&'a [CategoryCount]>,
    pub states: Option<&'a [CategoryCount]>,
    pub conn_by_disp: Option<&'a ConnByDisposition>,
    pub scatter: Option<&'a [ScatterPoint]>,
    pub attempt_dist: Option<&'a Histogram>,
    pub spend_hist: Option<&'a Histogram>,
}

#[derive(Debug, Clone, Default)]
pub struct Stage5Output {
    pub dispositions: Option<Vec<Slice>>,
    pub states: Option<Vec<Slice>>,
    pub conn_by_disp: Option<ConnectionSplit>,
    pub scatter: Option<Vec<PointGroup>>,
    pub attempt_dist: Option<BinSeries>,
    pub spend_hist: Option<BinSeries>,
    pub issues: Vec<Issue>,
}

/// Groups points by disposition in first-seen order.
pub fn group_by_category(points: &[ScatterPoint]) -> Vec<PointGroup> {
    let mut groups: Vec<PointGroup> = Vec::new();
    for p in points {
        match groups.iter_mut().find(|g| g.category == p.category) {
            Some(group) => group.points.push((p.x, p.y)),
            None => groups.push(PointGroup {
                category: p.category.clone(),
                color: disposition_color(&p.category),
                points: vec![(p.x, p.y)],
            }),
        }
    }
    groups
}

pub fn ramp_color(index: usize, len: usize) -> String {
    let p = if len == 0 {
        0.0
    } else {
        index as f64 / len as f64
    };
    let hue = 220.0 - p * 60.0;
    format!("hsla({}, 70%, 60%, 0.7)", trim_hue(hue))
}

fn trim_hue(hue: f64) -> String {
    let s = format!("{hue:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `None` and an issue when labels and values disagree in length.
pub fn bin_series(hist: &Histogram, path: &str, issues: &mut Vec<Issue>) -> Option<BinSeries> {
    if hist.labels.len() != hist.values.len() {
        issues.push(Issue::new(
            IssueKind::LengthMismatch,
            path,
            format!(
                "{} labels vs {} values",
                hist.labels.len(),
                hist.values.len()
            ),
        ));
        return None;
    }
    let n = hist.values.len();
    Some(BinSeries {
        labels: hist.labels.clone(),
        values: hist.values.clone(),
        colors: (0..n).map(|i| ramp_color(i, n)).collect(),
    })
}

/// Descending by count; equal counts keep payload order.
pub fn disposition_slices(entries: &[CategoryCount]) -> Vec<Slice> {
    let mut slices = slices(entries, disposition_color);
    slices.sort_by(|a, b| {
        b.count
            .partial_cmp(&a.count)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    slices
}

pub fn state_slices(entries: &[CategoryCount]) -> Vec<Slice> {
    slices(entries, state_color)
}

fn slices(entries: &[CategoryCount], color: fn(&str) -> &'static str) -> Vec<Slice> {
    let total: f64 = entries.iter().map(|e| e.count).sum();
    entries
        .iter()
        .map(|e| Slice {
            key: e.name.clone(),
            label: display_label(&e.name),
            count: e.count,
            share_pct: if total > 0.0 {
                e.count / total * 100.0
            } else {
                0.0
            },
            color: color(&e.name),
        })
        .collect()
}

pub fn connection_split(data: &ConnByDisposition, issues: &mut Vec<Issue>) -> Option<ConnectionSplit> {
    let n = data.labels.len();
    if data.connected.len() != n || data.not_connected.len() != n {
        issues.push(Issue::new(
            IssueKind::LengthMismatch,
            "charts.conn_by_disp",
            format!(
                "{} labels, {} connected, {} not connected",
                n,
                data.connected.len(),
                data.not_connected.len()
            ),
        ));
        return None;
    }
    Some(ConnectionSplit {
        labels: data.labels.iter().map(|l| display_label(l)).collect(),
        connected: data.connected.clone(),
        not_connected: data.not_connected.clone(),
    })
}

pub fn run_stage5(inputs: &Stage5Inputs<'_>) -> Stage5Output {
    let mut issues = Vec::new();
    let conn_by_disp = inputs
        .conn_by_disp
        .and_then(|c| connection_split(c, &mut issues));
    let attempt_dist = inputs
        .attempt_dist
        .and_then(|h| bin_series(h, "charts.attempt_dist", &mut issues));
    let spend_hist = inputs
        .spend_hist
        .and_then(|h| bin_series(h, "charts.spend_hist", &mut issues));

    Stage5Output {
        dispositions: inputs.dispositions.map(disposition_slices),
        states: inputs.states.map(state_slices),
        conn_by_disp,
        scatter: inputs.scatter.map(group_by_category),
        attempt_dist,
        spend_hist,
        issues,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_distributions.rs"]
mod tests;
