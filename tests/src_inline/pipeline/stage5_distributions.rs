use super::*;
use crate::model::palette::{DISPOSITION_FALLBACK, GREEN, NEUTRAL, RED, SLATE};

fn point(x: f64, y: f64, d: &str) -> ScatterPoint {
    ScatterPoint {
        x,
        y,
        category: d.to_string(),
    }
}

fn cc(name: &str, count: f64) -> CategoryCount {
    CategoryCount {
        name: name.to_string(),
        count,
    }
}

#[test]
fn test_grouping_first_seen_order() {
    let pts = vec![
        point(1.0, 10.0, "PTP"),
        point(2.0, 20.0, "RTP"),
        point(3.0, 30.0, "PTP"),
        point(4.0, 40.0, "Mystery"),
    ];
    let groups = group_by_category(&pts);
    let names: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(names, vec!["PTP", "RTP", "Mystery"]);
    assert_eq!(groups[0].points, vec![(1.0, 10.0), (3.0, 30.0)]);
    assert_eq!(groups[0].color, GREEN);
    assert_eq!(groups[1].color, RED);
    assert_eq!(groups[2].color, DISPOSITION_FALLBACK);
    let total: usize = groups.iter().map(|g| g.points.len()).sum();
    assert_eq!(total, pts.len());
    assert!(group_by_category(&[]).is_empty());
}

#[test]
fn test_ramp_is_deterministic() {
    assert_eq!(ramp_color(0, 3), "hsla(220, 70%, 60%, 0.7)");
    assert_eq!(ramp_color(1, 3), "hsla(200, 70%, 60%, 0.7)");
    assert_eq!(ramp_color(2, 3), "hsla(180, 70%, 60%, 0.7)");
    assert_eq!(ramp_color(1, 4), "hsla(205, 70%, 60%, 0.7)");
}

#[test]
fn test_bin_series_length_mismatch() {
    let mut issues = Vec::new();
    let bad = Histogram {
        labels: vec!["1".into(), "2".into()],
        values: vec![5.0],
    };
    assert_eq!(bin_series(&bad, "charts.attempt_dist", &mut issues), None);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::LengthMismatch);

    let good = Histogram {
        labels: vec!["1".into(), "2".into(), "3".into()],
        values: vec![5.0, 3.0, 1.0],
    };
    let s = bin_series(&good, "charts.attempt_dist", &mut issues).unwrap();
    assert_eq!(s.colors.len(), 3);
    assert_eq!(issues.len(), 1);
}

#[test]
fn test_both_histograms_use_the_ramp() {
    let attempts = Histogram {
        labels: vec!["1".into(), "2".into(), "3".into()],
        values: vec![5.0, 3.0, 1.0],
    };
    let spend = Histogram {
        labels: vec!["0-50".into(), "50-100".into()],
        values: vec![8.0, 2.0],
    };
    let out = run_stage5(&Stage5Inputs {
        attempt_dist: Some(&attempts),
        spend_hist: Some(&spend),
        ..Stage5Inputs::default()
    });
    let spend = out.spend_hist.unwrap();
    assert_eq!(spend.colors, vec![ramp_color(0, 2), ramp_color(1, 2)]);
    assert_eq!(out.attempt_dist.unwrap().colors[2], ramp_color(2, 3));
}

#[test]
fn test_disposition_slices_sorted_desc_stable() {
    let entries = vec![
        cc("Unreachable", 40.0),
        cc("PTP", 110.0),
        cc("Callback", 40.0),
        cc("Not_Evaluated", 12.0),
    ];
    let s = disposition_slices(&entries);
    let keys: Vec<_> = s.iter().map(|x| x.key.as_str()).collect();
    assert_eq!(keys, vec!["PTP", "Unreachable", "Callback", "Not_Evaluated"]);
    assert_eq!(s[3].label, "Not Evaluated");
    assert_eq!(s[1].color, SLATE);

    let unknown = disposition_slices(&[cc("Wrong_Number", 3.0)]);
    assert_eq!(unknown[0].color, DISPOSITION_FALLBACK);
    assert_eq!(state_slices(&[cc("paused", 3.0)])[0].color, NEUTRAL);
}

#[test]
fn test_empty_dispositions_yield_empty_slices() {
    assert!(disposition_slices(&[]).is_empty());
    let out = run_stage5(&Stage5Inputs {
        dispositions: Some(&[]),
        ..Stage5Inputs::default()
    });
    assert_eq!(out.dispositions, Some(vec![]));
    assert!(out.issues.is_empty());
}

#[test]
fn test_state_shares_and_zero_total() {
    let s = state_slices(&[cc("active", 30.0), cc("completed", 10.0), cc("paused", 0.0)]);
    assert!((s[0].share_pct - 75.0).abs() < 1e-9);
    assert_eq!(s[2].color, NEUTRAL);

    let zero = state_slices(&[cc("active", 0.0), cc("inactive", 0.0)]);
    assert!(zero.iter().all(|x| x.share_pct == 0.0));
    assert_eq!(zero[1].color, SLATE);
}

#[test]
fn test_connection_split_validation() {
    let mut issues = Vec::new();
    let ok = ConnByDisposition {
        labels: vec!["PTP".into(), "Connected_No_Outcome".into()],
        connected: vec![100.0, 40.0],
        not_connected: vec![10.0, 0.0],
    };
    let split = connection_split(&ok, &mut issues).unwrap();
    assert_eq!(split.labels[1], "Connected No Outcome");

    let bad = ConnByDisposition {
        not_connected: vec![10.0],
        ..ok
    };
    assert_eq!(connection_split(&bad, &mut issues), None);
    assert_eq!(issues.len(), 1);
}

#[test]
fn test_missing_inputs_stay_absent() {
    let out = run_stage5(&Stage5Inputs::default());
    assert!(out.dispositions.is_none());
    assert!(out.states.is_none());
    assert!(out.scatter.is_none());
    assert!(out.attempt_dist.is_none());
}
