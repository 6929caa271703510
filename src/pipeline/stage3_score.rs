use serde::Serialize;

use crate::model::issues::{Issue, IssueKind};
use crate::model::palette::component_color;
use crate::model::payload::{Grade, ScorePayload};
use crate::model::thresholds::{DashboardProfile, GradeBands};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub name: String,
    pub value: f64,
    pub max: Option<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub value: f64,
    pub grade: Grade,
    pub grade_label: &'static str,
    pub grade_color: String,
    pub rows: Vec<ScoreRow>,
    #[serde(skip)]
    pub issues: Vec<Issue>,
}

impl ScoreBreakdown {
    pub fn component_sum(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }
}

pub fn grade_for(value: f64, bands: &GradeBands) -> Grade {
    if value >= bands.strong_min {
        Grade::Strong
    } else if value >= bands.needs_optimization_min {
        Grade::NeedsOptimization
    } else {
        Grade::Weak
    }
}

pub fn grade_color(grade: Grade, bands: &GradeBands) -> String {
    match grade {
        Grade::Strong => bands.strong_color.clone(),
        Grade::NeedsOptimization => bands.needs_optimization_color.clone(),
        Grade::Weak => bands.weak_color.clone(),
    }
}

/// Rows keep payload order. The grade always comes from the configured bands;
/// disagreement with the upstream grade is reported, not trusted.
pub fn decompose(score: &ScorePayload, profile: &DashboardProfile) -> ScoreBreakdown {
    let bands = &profile.grades;
    let mut issues = Vec::new();

    let rows = score
        .components
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            if let Some(max) = c.max {
                if c.value > max + 1e-9 {
                    issues.push(Issue::new(
                        IssueKind::ComponentOverMax,
                        format!("score.components.{}", c.name),
                        format!("{} exceeds maximum {}", c.value, max),
                    ));
                }
            }
            ScoreRow {
                name: c.name.clone(),
                value: c.value,
                max: c.max,
                color: component_color(idx),
            }
        })
        .collect::<Vec<_>>();

    let grade = grade_for(score.value, bands);
    if let Some(upstream) = score.grade {
        if upstream != grade {
            issues.push(Issue::new(
                IssueKind::GradeMismatch,
                "score.grade",
                format!(
                    "payload says {}, bands give {}",
                    upstream.label(),
                    grade.label()
                ),
            ));
        }
    }

    let mut breakdown = ScoreBreakdown {
        value: score.value,
        grade,
        grade_label: grade.label(),
        grade_color: grade_color(grade, bands),
        rows,
        issues,
    };
    let sum = breakdown.component_sum();
    if !breakdown.rows.is_empty() && (sum - score.value).abs() > profile.score_sum_tolerance {
        breakdown.issues.push(Issue::new(
            IssueKind::ScoreSumMismatch,
            "score.components",
            format!("components sum to {:.2}, score is {:.2}", sum, score.value),
        ));
    }
    breakdown
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_score.rs"]
mod tests;
