use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingSection,
    WrongType,
    DroppedEntry,
    LengthMismatch,
    FunnelWidens,
    ScoreSumMismatch,
    ComponentOverMax,
    GradeMismatch,
}

/// A soft validation finding. Never aborts a render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub path: String,
    pub detail: String,
}

impl Issue {
    pub fn new(kind: IssueKind, path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail: detail.into(),
        }
    }
}

impl IssueKind {
    pub fn name(self) -> &'static str {
        match self {
            IssueKind::MissingSection => "MISSING_SECTION",
            IssueKind::WrongType => "WRONG_TYPE",
            IssueKind::DroppedEntry => "DROPPED_ENTRY",
            IssueKind::LengthMismatch => "LENGTH_MISMATCH",
            IssueKind::FunnelWidens => "FUNNEL_WIDENS",
            IssueKind::ScoreSumMismatch => "SCORE_SUM_MISMATCH",
            IssueKind::ComponentOverMax => "COMPONENT_OVER_MAX",
            IssueKind::GradeMismatch => "GRADE_MISMATCH",
        }
    }
}

pub fn issue_order() -> &'static [IssueKind] {
    &[
        IssueKind::MissingSection,
        IssueKind::WrongType,
        IssueKind::DroppedEntry,
        IssueKind::LengthMismatch,
        IssueKind::FunnelWidens,
        IssueKind::ScoreSumMismatch,
        IssueKind::ComponentOverMax,
        IssueKind::GradeMismatch,
    ]
}

/// Per-kind counts in stable order, kinds with zero hits skipped.
pub fn count_by_kind(issues: &[Issue]) -> Vec<(IssueKind, usize)> {
    let mut out = Vec::new();
    for kind in issue_order() {
        let n = issues.iter().filter(|i| i.kind == *kind).count();
        if n > 0 {
            out.push((*kind, n));
        }
    }
    out
}
