use std::time::Duration;

use serde_json::json;

use super::registry::Region;
use super::*;
use crate::input::DemoSource;

fn dashboard() -> Dashboard {
    Dashboard::new(DashboardProfile::default_v1())
}

fn small_payload(total: f64) -> Value {
    json!({
        "kpis": {
            "total": total,
            "ptp_pct": 20.0,
            "dispositions": {"PTP": 20, "RTP": 10}
        },
        "funnel": [
            {"stage": "Total Leads", "value": total},
            {"stage": "PTP", "value": 20}
        ]
    })
}

#[test]
fn test_idle_to_rendered() {
    let mut d = dashboard();
    assert_eq!(d.state(), LoadState::Idle);
    assert!(d.view().is_none());

    assert_eq!(d.load(&DemoSource), Completion::Applied);
    assert_eq!(d.state(), LoadState::Rendered);
    assert_eq!(d.banner(), None);
    let view = d.view().unwrap();
    assert_eq!(view.source, "Demo Data");
    assert_eq!(view.cards.len(), 6);
    assert_eq!(d.registry().live_count(), 8);
    assert_eq!(d.counters().len(), 6);
}

#[test]
fn test_stale_completion_ignored() {
    let mut d = dashboard();
    let first = d.request("first.json");
    let second = d.request("second.json");
    assert!(second > first);

    assert_eq!(
        d.complete(first, Ok(small_payload(100.0))),
        Completion::Stale
    );
    assert_eq!(d.state(), LoadState::Loading(second));
    assert!(d.view().is_none());

    assert_eq!(
        d.complete(second, Ok(small_payload(200.0))),
        Completion::Applied
    );
    assert_eq!(d.view().unwrap().source, "second.json");
    assert_eq!(d.view().unwrap().cards[0].value, 200.0);

    // A ticket completes at most once.
    assert_eq!(
        d.complete(second, Ok(small_payload(300.0))),
        Completion::Stale
    );
    assert_eq!(d.view().unwrap().cards[0].value, 200.0);
}

#[test]
fn test_failure_keeps_previous_view() {
    let mut d = dashboard();
    d.load(&DemoSource);
    let before = d.view().unwrap().cards.len();

    let t = d.request("broken.json");
    let outcome = d.complete(
        t,
        Err(PayloadError::Server("Missing columns: Lead_State".to_string())),
    );
    assert_eq!(outcome, Completion::Applied);
    assert_eq!(d.state(), LoadState::Error);
    assert_eq!(d.banner(), Some("Missing columns: Lead_State"));
    assert_eq!(d.view().unwrap().cards.len(), before);
    assert_eq!(d.view().unwrap().source, "Demo Data");

    d.load(&DemoSource);
    assert_eq!(d.state(), LoadState::Rendered);
    assert_eq!(d.banner(), None);
}

#[test]
fn test_blank_server_error_shows_generic_banner() {
    let mut d = dashboard();
    let t = d.request("upload.csv");
    d.complete(t, Ok(json!({"error": ""})));
    assert_eq!(d.state(), LoadState::Error);
    assert_eq!(d.banner(), Some("upload failed"));
}

#[test]
fn test_malformed_top_level_is_error_state() {
    let mut d = dashboard();
    let t = d.request("list.json");
    d.complete(t, Ok(json!([1, 2, 3])));
    assert_eq!(d.state(), LoadState::Error);
    assert!(d.banner().unwrap().starts_with("malformed payload"));
    assert!(d.view().is_none());
}

#[test]
fn test_rerender_releases_every_chart() {
    let mut d = dashboard();
    d.load(&DemoSource);
    d.load(&DemoSource);
    d.load(&DemoSource);
    let r = d.registry();
    assert_eq!(r.live_count(), 8);
    assert_eq!(r.created(), 24);
    assert_eq!(r.released(), 16);
    assert_eq!(d.passes(), 3);
}

#[test]
fn test_rerender_cancels_running_counters() {
    let mut d = dashboard();
    d.load(&DemoSource);
    let old = d.counters()[0].clone();
    let fmt = d.number_format().clone();
    assert!(old.frame_at(Duration::from_millis(100), &fmt).is_some());

    d.load(&DemoSource);
    assert!(old.is_cancelled());
    assert_eq!(old.frame_at(Duration::from_millis(100), &fmt), None);
    assert!(!d.counters()[0].is_cancelled());
}

#[test]
fn test_empty_dispositions_still_create_charts() {
    let mut d = dashboard();
    let t = d.request("empty.json");
    d.complete(
        t,
        Ok(json!({"kpis": {"total": 0, "dispositions": {}}})),
    );
    assert_eq!(d.state(), LoadState::Rendered);
    let bar = d.registry().get(Region::Dispositions).unwrap();
    assert!(bar.spec.labels.is_empty());
    assert!(bar.spec.datasets[0].values.is_empty());
    assert!(d.registry().get(Region::DispositionDonut).is_some());
}

#[test]
fn test_missing_states_omits_only_state_donut() {
    let mut value = DemoSource.fetch().unwrap();
    value["kpis"].as_object_mut().unwrap().remove("states");

    let mut d = dashboard();
    let t = d.request("no-states.json");
    d.complete(t, Ok(value));
    assert_eq!(d.state(), LoadState::Rendered);
    assert!(d.registry().get(Region::StateDonut).is_none());
    assert_eq!(d.registry().live_count(), 7);
    let view = d.view().unwrap();
    assert!(view.states.is_none());
    assert!(view.score.is_some());
    assert!(view.funnel.is_some());
    assert_eq!(view.cards.len(), 6);
}

#[test]
fn test_state_names() {
    assert_eq!(LoadState::Idle.name(), "idle");
    assert_eq!(LoadState::Loading(Ticket(1)).name(), "loading");
    assert_eq!(Ticket(7).generation(), 7);
}
