use serde::Serialize;

use crate::animation::CounterSpec;
use crate::model::palette::{AMBER, BLUE, CYAN, GOLD, GREEN, PURPLE};
use crate::model::payload::Kpis;
use crate::model::thresholds::{DashboardProfile, HealthRule, KpiBenchmark, Polarity, TierThresholds};
use crate::report::NumberFormat;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gauge {
    pub fill_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warn,
    Bad,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Warn => "warn",
            Tier::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub key: &'static str,
    pub label: &'static str,
    pub accent: &'static str,
    pub value: f64,
    pub display: String,
    pub sub: String,
    pub gauge: Option<Gauge>,
    pub counter: CounterSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthPill {
    pub label: String,
    pub display: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, Default)]
pub struct Stage2Output {
    pub cards: Vec<KpiCard>,
    pub pills: Vec<HealthPill>,
}

/// Gauge fill where more fill always reads as better. `None` when there is
/// no usable ceiling.
pub fn normalize(value: f64, ceiling: f64, polarity: Polarity) -> Option<Gauge> {
    if !ceiling.is_finite() || ceiling <= 0.0 || !value.is_finite() {
        return None;
    }
    let ratio = value / ceiling * 100.0;
    let fill = match polarity {
        Polarity::HigherIsBetter => ratio,
        Polarity::LowerIsBetter => 100.0 - ratio,
    };
    Some(Gauge {
        fill_percent: fill.clamp(0.0, 100.0),
    })
}

pub fn classify(value: f64, thresholds: TierThresholds, polarity: Polarity) -> Tier {
    let (good, bad) = match polarity {
        Polarity::HigherIsBetter => (value >= thresholds.good, value < thresholds.bad),
        Polarity::LowerIsBetter => (value <= thresholds.good, value > thresholds.bad),
    };
    if good {
        Tier::Good
    } else if bad {
        Tier::Bad
    } else {
        Tier::Warn
    }
}

pub fn run_stage2(
    kpis: &Kpis,
    score_value: Option<f64>,
    profile: &DashboardProfile,
    fmt: &NumberFormat,
) -> Stage2Output {
    Stage2Output {
        cards: build_cards(kpis, profile, fmt),
        pills: build_pills(kpis, score_value, profile, fmt),
    }
}

struct CardDef {
    key: &'static str,
    label: &'static str,
    accent: &'static str,
    value: Option<f64>,
    sub: String,
    benchmark: Option<KpiBenchmark>,
    currency: bool,
    suffix: &'static str,
    decimals: usize,
}

fn build_cards(kpis: &Kpis, profile: &DashboardProfile, fmt: &NumberFormat) -> Vec<KpiCard> {
    let b = &profile.benchmarks;
    let defs = vec![
        CardDef {
            key: "total",
            label: "Total Leads",
            accent: GOLD,
            value: kpis.total,
            sub: format!("{} attempted", opt_count(kpis.attempted_leads, fmt)),
            benchmark: None,
            currency: false,
            suffix: "",
            decimals: 0,
        },
        CardDef {
            key: "ptp_pct",
            label: "PTP Rate",
            accent: GREEN,
            value: kpis.ptp_pct,
            sub: format!("{} PTPs", opt_count(kpis.ptp_count, fmt)),
            benchmark: Some(b.ptp_pct.clone()),
            currency: false,
            suffix: "%",
            decimals: 1,
        },
        CardDef {
            key: "connection_rate",
            label: "Connection Rate",
            accent: BLUE,
            value: kpis.connection_rate,
            sub: format!("{} connected", opt_count(kpis.connected_leads, fmt)),
            benchmark: Some(b.connection_rate.clone()),
            currency: false,
            suffix: "%",
            decimals: 1,
        },
        CardDef {
            key: "cost_per_ptp",
            label: "Cost per PTP",
            accent: AMBER,
            value: kpis.cost_per_ptp,
            sub: format!(
                "Total {}",
                kpis.total_spend
                    .map(|v| fmt.currency(v))
                    .unwrap_or_else(|| "—".to_string())
            ),
            benchmark: Some(b.cost_per_ptp.clone()),
            currency: true,
            suffix: "",
            decimals: 0,
        },
        CardDef {
            key: "active_pct",
            label: "Active Leads",
            accent: PURPLE,
            value: kpis.active_pct,
            sub: format!("{} active", opt_count(kpis.active_count, fmt)),
            benchmark: Some(b.active_pct.clone()),
            currency: false,
            suffix: "%",
            decimals: 1,
        },
        CardDef {
            key: "avg_attempts",
            label: "Avg Attempts",
            accent: CYAN,
            value: kpis.avg_attempts,
            sub: "AI attempts per lead".to_string(),
            benchmark: Some(b.avg_attempts.clone()),
            currency: false,
            suffix: "x",
            decimals: 1,
        },
    ];

    let mut cards = Vec::with_capacity(defs.len());
    for def in defs {
        let Some(value) = def.value else {
            tracing::debug!(card = def.key, "kpi missing; card omitted");
            continue;
        };
        let counter = CounterSpec::new(value, profile.counter_duration_ms)
            .prefix(if def.currency { profile.currency_symbol.as_str() } else { "" })
            .suffix(def.suffix)
            .decimals(def.decimals);
        cards.push(KpiCard {
            key: def.key,
            label: def.label,
            accent: def.accent,
            value,
            display: counter.final_display(fmt),
            sub: def.sub,
            gauge: def
                .benchmark
                .and_then(|bench| normalize(value, bench.ceiling, bench.polarity)),
            counter,
        });
    }
    cards
}

fn build_pills(
    kpis: &Kpis,
    score_value: Option<f64>,
    profile: &DashboardProfile,
    fmt: &NumberFormat,
) -> Vec<HealthPill> {
    let h = &profile.health;
    let rows: [(&HealthRule, Option<f64>, fn(f64, &NumberFormat) -> String); 6] = [
        (&h.ptp_pct, kpis.ptp_pct, |v, f| f.percent(v)),
        (&h.connection_rate, kpis.connection_rate, |v, f| f.percent(v)),
        (&h.cost_per_ptp, kpis.cost_per_ptp, |v, f| f.currency(v)),
        (&h.active_pct, kpis.active_pct, |v, f| f.percent(v)),
        (&h.attempt_efficiency, kpis.attempt_efficiency, |v, f| f.percent(v)),
        (&h.score, score_value, |v, _| format!("{:.1}/10", v)),
    ];

    let mut pills = Vec::new();
    for (rule, value, render) in rows {
        let Some(value) = value else {
            continue;
        };
        pills.push(HealthPill {
            label: rule.label.clone(),
            display: render(value, fmt),
            tier: classify(value, rule.thresholds, rule.polarity),
        });
    }
    pills
}

fn opt_count(v: Option<f64>, fmt: &NumberFormat) -> String {
    v.map(|v| fmt.count(v)).unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_benchmarks.rs"]
mod tests;
