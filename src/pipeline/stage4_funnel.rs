use std::cmp::Ordering;

use serde::Serialize;

use crate::model::issues::{Issue, IssueKind};
use crate::model::payload::FunnelStage;
use crate::model::thresholds::{DashboardProfile, SeverityCuts};

const STAGE_COLORS: [&str; 5] = ["#58a6ff", "#4d94e0", "#3fb950", "#2ea044", "#238636"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warn,
    Critical,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warn => "warn",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageBar {
    pub stage: String,
    pub value: f64,
    pub color: String,
    /// Share of the first stage.
    pub share_pct: f64,
    /// Rendered width, never below the configured floor.
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub label: String,
    pub from_value: f64,
    pub to_value: f64,
    pub lost_count: f64,
    pub lost_pct: f64,
    pub retention_pct: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelAnalysis {
    pub stages: Vec<StageBar>,
    pub transitions: Vec<Transition>,
    pub top_drop: Option<usize>,
    pub second_drop: Option<usize>,
    #[serde(skip)]
    pub issues: Vec<Issue>,
}

impl FunnelAnalysis {
    pub fn top(&self) -> Option<&Transition> {
        self.top_drop.and_then(|i| self.transitions.get(i))
    }

    pub fn second(&self) -> Option<&Transition> {
        self.second_drop.and_then(|i| self.transitions.get(i))
    }
}

/// Strict comparisons: a loss of exactly `critical_above` is only warn.
pub fn classify_drop(lost_pct: f64, cuts: &SeverityCuts) -> Severity {
    if lost_pct > cuts.critical_above {
        Severity::Critical
    } else if lost_pct > cuts.warn_above {
        Severity::Warn
    } else {
        Severity::Normal
    }
}

pub fn bar_width(value: f64, top: f64, floor_pct: f64) -> f64 {
    share_of(value, top).max(floor_pct).min(100.0)
}

fn share_of(value: f64, total: f64) -> f64 {
    if total > 0.0 { value / total * 100.0 } else { 0.0 }
}

/// Transition indices by descending loss; equal losses keep stage order.
pub fn rank_drops(transitions: &[Transition]) -> Vec<usize> {
    let mut order = (0..transitions.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        transitions[b]
            .lost_pct
            .partial_cmp(&transitions[a].lost_pct)
            .unwrap_or(Ordering::Equal)
    });
    order
}

pub fn analyze(stages: &[FunnelStage], profile: &DashboardProfile) -> FunnelAnalysis {
    let top = stages.first().map(|s| s.value).unwrap_or(0.0);
    let mut issues = Vec::new();

    let bars = stages
        .iter()
        .enumerate()
        .map(|(i, s)| StageBar {
            stage: s.stage.clone(),
            value: s.value,
            color: s
                .color
                .clone()
                .unwrap_or_else(|| STAGE_COLORS[i % STAGE_COLORS.len()].to_string()),
            share_pct: share_of(s.value, top),
            width_pct: bar_width(s.value, top, profile.funnel_floor_pct),
        })
        .collect::<Vec<_>>();

    let mut transitions = Vec::with_capacity(stages.len().saturating_sub(1));
    for (index, pair) in stages.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        if to.value > from.value {
            issues.push(Issue::new(
                IssueKind::FunnelWidens,
                format!("funnel[{}]", index + 1),
                format!(
                    "{} ({}) exceeds {} ({})",
                    to.stage, to.value, from.stage, from.value
                ),
            ));
        }
        let lost_count = from.value - to.value;
        let (lost_pct, retention_pct) = if from.value == 0.0 {
            (0.0, 0.0)
        } else {
            (
                lost_count / from.value * 100.0,
                to.value / from.value * 100.0,
            )
        };
        transitions.push(Transition {
            index,
            from: from.stage.clone(),
            to: to.stage.clone(),
            label: format!("{} → {}", from.stage, to.stage),
            from_value: from.value,
            to_value: to.value,
            lost_count,
            lost_pct,
            retention_pct,
            severity: classify_drop(lost_pct, &profile.severity),
        });
    }

    let ranked = rank_drops(&transitions);

    FunnelAnalysis {
        stages: bars,
        transitions,
        top_drop: ranked.first().copied(),
        second_drop: ranked.get(1).copied(),
        issues,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_funnel.rs"]
mod tests;
