use super::*;
use crate::model::payload::FunnelStage;
use crate::model::thresholds::DashboardProfile;
use crate::pipeline::stage4_funnel::analyze;

fn fmt() -> NumberFormat {
    NumberFormat::from_profile(&DashboardProfile::default_v1())
}

fn narrative(title: &str, severity: Option<RiskSeverity>) -> Narrative {
    Narrative {
        title: title.to_string(),
        body: format!("{title} body"),
        severity,
    }
}

#[test]
fn test_tables_render_missing_as_dash() {
    let kpis = Kpis {
        avg_attempts_connected: Some(4.2),
        attempt_efficiency: Some(62.4),
        total_attempted_calls: Some(4050.0),
        cost_per_ptp: Some(113.64),
        spend_mean: Some(25.001),
        ..Kpis::default()
    };
    let t = efficiency_tables(&kpis, &fmt());
    assert_eq!(t.retry.len(), 5);
    assert_eq!(t.cost.len(), 5);
    assert_eq!(t.retry[0].display, "4.2 calls");
    assert_eq!(t.retry[1].display, "—");
    assert_eq!(t.retry[2].display, "62.4%");
    assert_eq!(t.retry[3].display, "4,050");
    assert_eq!(t.cost[0].display, "₹113.64");
    assert_eq!(t.cost[1].value, None);
    assert_eq!(t.cost[4].display, "₹25.001");
    assert_eq!(t.cost[4].label, "Avg Spend per Lead");
}

#[test]
fn test_snapshot_strip() {
    let kpis = Kpis {
        total: Some(123456.0),
        ptp_count: Some(110.0),
        ptp_pct: Some(22.0),
        total_spend: Some(12500.4),
        ..Kpis::default()
    };
    let s = snapshot(&kpis, &fmt());
    let labels: Vec<_> = s.iter().map(|i| i.label).collect();
    assert_eq!(labels, vec!["Leads", "PTPs", "Connected", "Total Spend"]);
    assert_eq!(s[0].display, "1,23,456");
    assert_eq!(s[1].display, "110 (22.0%)");
    assert_eq!(s[2].display, "—");
    assert_eq!(s[3].display, "₹12,500");
}

#[test]
fn test_drop_callouts_name_worst_transitions() {
    let names = ["Total Leads", "Attempted", "Connected", "PTP", "Completed"];
    let values = [1000.0, 600.0, 300.0, 120.0, 80.0];
    let stages: Vec<FunnelStage> = names
        .iter()
        .zip(values)
        .map(|(n, v)| FunnelStage {
            stage: n.to_string(),
            value: v,
            color: None,
        })
        .collect();
    let funnel = analyze(&stages, &DashboardProfile::default_v1());
    let c = drop_callouts(&funnel, &fmt());
    assert_eq!(c.len(), 2);
    assert_eq!(
        c[0].sentence,
        "Critical: Connected → PTP loses 180 leads (60.0%)."
    );
    assert_eq!(
        c[1].sentence,
        "Secondary: Attempted → Connected drops 300 leads (50.0%)."
    );
    assert_eq!(c[1].severity, Severity::Warn);
}

#[test]
fn test_callout_keeps_one_decimal_above_critical_cut() {
    let stages = vec![
        FunnelStage {
            stage: "A".to_string(),
            value: 1000.0,
            color: None,
        },
        FunnelStage {
            stage: "B".to_string(),
            value: 496.0,
            color: None,
        },
    ];
    let funnel = analyze(&stages, &DashboardProfile::default_v1());
    let c = drop_callouts(&funnel, &fmt());
    assert_eq!(c.len(), 1);
    assert_eq!(c[0].severity, Severity::Critical);
    assert_eq!(c[0].sentence, "Critical: A → B loses 504 leads (50.4%).");
}

#[test]
fn test_risks_default_to_medium() {
    let cards = risk_cards(&[
        narrative("Critically low PTP", None),
        narrative("Backlog", Some(RiskSeverity::High)),
    ]);
    assert_eq!(cards[0].severity, RiskSeverity::Medium);
    assert_eq!(cards[0].badge, "MEDIUM");
    assert_eq!(cards[1].badge, "HIGH");
}

#[test]
fn test_levers_numbered_from_one() {
    let cards = lever_cards(&[narrative("Retry window", None), narrative("Scripts", None)]);
    assert_eq!(cards[0].number, 1);
    assert_eq!(cards[1].number, 2);
    assert!(lever_cards(&[]).is_empty());
}
