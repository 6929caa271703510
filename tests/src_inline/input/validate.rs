use serde_json::json;

use super::*;

fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
    issues.iter().map(|i| i.kind).collect()
}

#[test]
fn test_top_level_must_be_object() {
    assert!(matches!(
        validate(&json!([1, 2, 3])),
        Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
        validate(&json!("hello")),
        Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
        validate(&json!({})),
        Err(PayloadError::Malformed(_))
    ));
}

#[test]
fn test_dispositions_keep_payload_order() {
    let v = validate(&json!({
        "kpis": {
            "total": 10,
            "dispositions": {"RTP": 2, "PTP": 5, "Unreachable": 3}
        }
    }))
    .unwrap();
    let d = v.payload.kpis.unwrap().dispositions.unwrap();
    let names: Vec<_> = d.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["RTP", "PTP", "Unreachable"]);
}

#[test]
fn test_wrong_typed_scalar_blanks_only_that_field() {
    let v = validate(&json!({
        "kpis": {"total": 500, "ptp_pct": "22%", "connection_rate": null}
    }))
    .unwrap();
    let k = v.payload.kpis.unwrap();
    assert_eq!(k.total, Some(500.0));
    assert_eq!(k.ptp_pct, None);
    assert_eq!(k.connection_rate, None);
    let wrong: Vec<_> = v
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::WrongType)
        .collect();
    assert_eq!(wrong.len(), 1);
    assert_eq!(wrong[0].path, "kpis.ptp_pct");
}

#[test]
fn test_score_components_with_positional_maxima() {
    let v = validate(&json!({
        "score": {
            "value": 6.4,
            "grade": "At Risk",
            "components": {"PTP Rate (40%)": 3.0, "Connection Rate (30%)": 2.0},
            "max_scores": [4.0, 3.0]
        }
    }))
    .unwrap();
    let s = v.payload.score.unwrap();
    assert_eq!(s.grade, Some(Grade::Weak));
    assert_eq!(s.components[0].name, "PTP Rate (40%)");
    assert_eq!(s.components[1].max, Some(3.0));
}

#[test]
fn test_score_maxima_by_name_and_mismatch() {
    let v = validate(&json!({
        "score": {
            "value": 5.0,
            "components": [
                {"name": "A", "value": 2.0},
                {"name": "B", "value": 3.0, "max": 3.0},
                {"value": 1.0}
            ],
            "max_scores": {"A": 4.0}
        }
    }))
    .unwrap();
    let s = v.payload.score.unwrap();
    assert_eq!(s.components.len(), 2);
    assert_eq!(s.components[0].max, Some(4.0));
    assert_eq!(s.components[1].max, Some(3.0));
    assert!(kinds(&v.issues).contains(&IssueKind::DroppedEntry));

    let v = validate(&json!({
        "score": {"value": 5.0, "components": {"A": 2.0, "B": 3.0}, "max_scores": [4.0]}
    }))
    .unwrap();
    assert!(kinds(&v.issues).contains(&IssueKind::LengthMismatch));
    assert_eq!(v.payload.score.unwrap().components[1].max, None);
}

#[test]
fn test_missing_score_value_drops_score_only() {
    let v = validate(&json!({
        "score": {"grade": "Strong"},
        "funnel": [{"stage": "Total Leads", "value": 10}]
    }))
    .unwrap();
    assert!(v.payload.score.is_none());
    assert_eq!(v.payload.funnel.unwrap().len(), 1);
}

#[test]
fn test_malformed_entries_dropped() {
    let v = validate(&json!({
        "funnel": [
            {"stage": "Total Leads", "value": 100},
            {"stage": "Attempted"},
            {"stage": "Connected", "value": 40}
        ],
        "risks": [{"title": "t", "body": "b", "severity": "HIGH"}, {"title": 3}],
        "levers": "not a list"
    }))
    .unwrap();
    assert_eq!(v.payload.funnel.unwrap().len(), 2);
    assert_eq!(v.payload.risks.len(), 1);
    assert_eq!(
        v.payload.risks[0].severity,
        Some(crate::model::payload::RiskSeverity::High)
    );
    assert!(v.payload.levers.is_empty());
    let k = kinds(&v.issues);
    assert!(k.contains(&IssueKind::DroppedEntry));
    assert!(k.contains(&IssueKind::WrongType));
}

#[test]
fn test_charts_sections_degrade_individually() {
    let v = validate(&json!({
        "charts": {
            "conn_by_disp": {"labels": ["PTP"], "connected": "x", "not_connected": [1]},
            "scatter": [{"x": 1, "y": 2, "d": "PTP"}, {"x": 1}],
            "attempt_dist": {"labels": [0, "1-3"], "values": [4, 5]}
        }
    }))
    .unwrap();
    let c = v.payload.charts;
    assert!(c.conn_by_disp.is_none());
    assert_eq!(c.scatter.unwrap().len(), 1);
    assert_eq!(c.attempt_dist.unwrap().labels, vec!["0", "1-3"]);
    assert!(c.spend_hist.is_none());
}

#[test]
fn test_states_accept_pair_arrays() {
    let v = validate(&json!({
        "kpis": {"states": [["active", 3], {"name": "completed", "count": 1}, 7]}
    }))
    .unwrap();
    let s = v.payload.kpis.unwrap().states.unwrap();
    assert_eq!(s.len(), 2);
    assert_eq!(s[1].name, "completed");
}
