use super::*;
use crate::model::payload::ScoreComponent;

fn component(name: &str, value: f64, max: Option<f64>) -> ScoreComponent {
    ScoreComponent {
        name: name.to_string(),
        value,
        max,
    }
}

fn well_formed() -> ScorePayload {
    ScorePayload {
        value: 6.4,
        grade: Some(Grade::NeedsOptimization),
        color: Some("#d29922".to_string()),
        components: vec![
            component("PTP Rate (40%)", 3.52, Some(4.0)),
            component("Connection Rate (30%)", 3.0, Some(3.0)),
            component("Active Lead Mgmt (15%)", 1.35, Some(1.5)),
            component("Cost Efficiency (15%)", 1.5, Some(1.5)),
        ],
    }
}

#[test]
fn test_grade_bands() {
    let bands = GradeBands::default();
    assert_eq!(grade_for(7.0, &bands), Grade::Strong);
    assert_eq!(grade_for(6.99, &bands), Grade::NeedsOptimization);
    assert_eq!(grade_for(4.0, &bands), Grade::NeedsOptimization);
    assert_eq!(grade_for(3.9, &bands), Grade::Weak);
    assert_eq!(grade_color(Grade::Weak, &bands), "#f85149");
}

#[test]
fn test_order_preserved_and_sum_matches() {
    let mut score = well_formed();
    score.value = 9.4;
    score.grade = Some(Grade::Strong);
    let b = decompose(&score, &DashboardProfile::default_v1());
    assert_eq!(
        b.rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec![
            "PTP Rate (40%)",
            "Connection Rate (30%)",
            "Active Lead Mgmt (15%)",
            "Cost Efficiency (15%)"
        ]
    );
    assert!((b.component_sum() - b.value).abs() <= 0.05);
    assert!(b.issues.is_empty(), "{:?}", b.issues);
    assert_eq!(b.grade, Grade::Strong);
    assert_eq!(b.rows[0].color, "#3b82f6");
}

#[test]
fn test_sum_mismatch_and_grade_mismatch_reported() {
    let b = decompose(&well_formed(), &DashboardProfile::default_v1());
    let kinds: Vec<_> = b.issues.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&IssueKind::ScoreSumMismatch));
    assert!(!kinds.contains(&IssueKind::GradeMismatch));

    let mut score = well_formed();
    score.grade = Some(Grade::Strong);
    let b = decompose(&score, &DashboardProfile::default_v1());
    assert!(b.issues.iter().any(|i| i.kind == IssueKind::GradeMismatch));
    assert_eq!(b.grade, Grade::NeedsOptimization);
}

#[test]
fn test_component_over_max() {
    let score = ScorePayload {
        value: 4.5,
        grade: None,
        color: None,
        components: vec![component("PTP Rate (40%)", 4.5, Some(4.0))],
    };
    let b = decompose(&score, &DashboardProfile::default_v1());
    assert_eq!(b.issues.len(), 1);
    assert_eq!(b.issues[0].kind, IssueKind::ComponentOverMax);
}

#[test]
fn test_incomplete_components_still_render() {
    let score = ScorePayload {
        value: 2.0,
        grade: None,
        color: None,
        components: vec![component("PTP Rate (40%)", 2.0, None)],
    };
    let b = decompose(&score, &DashboardProfile::default_v1());
    assert_eq!(b.rows.len(), 1);
    assert_eq!(b.rows[0].max, None);
    assert_eq!(b.grade, Grade::Weak);
    assert!(b.issues.is_empty());

    let empty = ScorePayload {
        value: 5.0,
        grade: None,
        color: None,
        components: vec![],
    };
    let b = decompose(&empty, &DashboardProfile::default_v1());
    assert!(b.rows.is_empty());
    assert!(b.issues.is_empty());
}
