//! Boundary validation: untyped JSON in, typed [`MetricsPayload`] out.
//!
//! Only two conditions are fatal: a top level that is not an object (or is
//! the error envelope), and an object with no usable section at all. Every
//! other defect drops the affected section or entry and is recorded as an
//! [`Issue`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::input::{PayloadError, error_envelope};
use crate::model::issues::{Issue, IssueKind};
use crate::model::payload::{
    CategoryCount, Charts, Grade, Kpis, MetricsPayload, Narrative, ScoreComponent, ScorePayload,
};

#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub payload: MetricsPayload,
    pub issues: Vec<Issue>,
}

const SECTIONS: [&str; 6] = ["kpis", "score", "funnel", "charts", "risks", "levers"];

const KPI_SCALARS: [&str; 20] = [
    "total",
    "attempted_leads",
    "ptp_count",
    "ptp_pct",
    "connected_leads",
    "connection_rate",
    "cost_per_ptp",
    "total_spend",
    "active_count",
    "active_pct",
    "avg_attempts",
    "avg_attempts_connected",
    "avg_attempts_not_connected",
    "attempt_efficiency",
    "total_attempted_calls",
    "total_connected_calls",
    "cost_per_connection",
    "cost_per_attempt",
    "cost_per_lead",
    "spend_mean",
];

pub fn validate(value: &Value) -> Result<Validated, PayloadError> {
    if let Some(msg) = error_envelope(value) {
        return Err(PayloadError::Server(msg));
    }
    let Some(root) = value.as_object() else {
        return Err(PayloadError::Malformed(format!(
            "top level must be an object, got {}",
            type_name(value)
        )));
    };

    let mut issues = Vec::new();
    for name in SECTIONS {
        if !root.contains_key(name) {
            issues.push(Issue::new(IssueKind::MissingSection, name, "section absent"));
        }
    }

    let kpis = root.get("kpis").and_then(|v| parse_kpis(v, &mut issues));
    let score = root.get("score").and_then(|v| parse_score(v, &mut issues));
    let funnel = root
        .get("funnel")
        .and_then(|v| entries(v, "funnel", &mut issues));
    let charts = root
        .get("charts")
        .map(|v| parse_charts(v, &mut issues))
        .unwrap_or_default();
    let risks = root
        .get("risks")
        .and_then(|v| entries::<Narrative>(v, "risks", &mut issues));
    let levers = root
        .get("levers")
        .and_then(|v| entries::<Narrative>(v, "levers", &mut issues));

    let usable = kpis.is_some()
        || score.is_some()
        || funnel.is_some()
        || risks.is_some()
        || levers.is_some()
        || charts.conn_by_disp.is_some()
        || charts.scatter.is_some()
        || charts.attempt_dist.is_some()
        || charts.spend_hist.is_some();
    if !usable {
        return Err(PayloadError::Malformed(
            "payload has no usable section".to_string(),
        ));
    }

    Ok(Validated {
        payload: MetricsPayload {
            kpis,
            score,
            funnel,
            charts,
            risks: risks.unwrap_or_default(),
            levers: levers.unwrap_or_default(),
        },
        issues,
    })
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn number(v: &Value) -> Option<f64> {
    v.as_f64().filter(|n| n.is_finite())
}

fn object<'a>(v: &'a Value, path: &str, issues: &mut Vec<Issue>) -> Option<&'a Map<String, Value>> {
    match v.as_object() {
        Some(map) => Some(map),
        None => {
            issues.push(Issue::new(
                IssueKind::WrongType,
                path,
                format!("expected object, got {}", type_name(v)),
            ));
            None
        }
    }
}

fn kpi_slot<'a>(k: &'a mut Kpis, name: &str) -> Option<&'a mut Option<f64>> {
    Some(match name {
        "total" => &mut k.total,
        "attempted_leads" => &mut k.attempted_leads,
        "ptp_count" => &mut k.ptp_count,
        "ptp_pct" => &mut k.ptp_pct,
        "connected_leads" => &mut k.connected_leads,
        "connection_rate" => &mut k.connection_rate,
        "cost_per_ptp" => &mut k.cost_per_ptp,
        "total_spend" => &mut k.total_spend,
        "active_count" => &mut k.active_count,
        "active_pct" => &mut k.active_pct,
        "avg_attempts" => &mut k.avg_attempts,
        "avg_attempts_connected" => &mut k.avg_attempts_connected,
        "avg_attempts_not_connected" => &mut k.avg_attempts_not_connected,
        "attempt_efficiency" => &mut k.attempt_efficiency,
        "total_attempted_calls" => &mut k.total_attempted_calls,
        "total_connected_calls" => &mut k.total_connected_calls,
        "cost_per_connection" => &mut k.cost_per_connection,
        "cost_per_attempt" => &mut k.cost_per_attempt,
        "cost_per_lead" => &mut k.cost_per_lead,
        "spend_mean" => &mut k.spend_mean,
        _ => return None,
    })
}

fn parse_kpis(v: &Value, issues: &mut Vec<Issue>) -> Option<Kpis> {
    let map = object(v, "kpis", issues)?;
    let mut out = Kpis::default();
    for name in KPI_SCALARS {
        let Some(raw) = map.get(name) else {
            continue;
        };
        if raw.is_null() {
            continue;
        }
        let parsed = number(raw);
        if parsed.is_none() {
            issues.push(Issue::new(
                IssueKind::WrongType,
                format!("kpis.{name}"),
                format!("expected finite number, got {}", type_name(raw)),
            ));
        }
        if let Some(slot) = kpi_slot(&mut out, name) {
            *slot = parsed;
        }
    }
    out.dispositions = map
        .get("dispositions")
        .and_then(|d| category_counts(d, "kpis.dispositions", issues));
    out.states = map
        .get("states")
        .and_then(|s| category_counts(s, "kpis.states", issues));
    Some(out)
}

/// Ordered `name → count`, as an object or as `[{name, count}]` / `[[name, count]]`.
fn category_counts(v: &Value, path: &str, issues: &mut Vec<Issue>) -> Option<Vec<CategoryCount>> {
    let pairs: Vec<(String, &Value)> = match v {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => {
            let mut pairs = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let pair = match item {
                    Value::Object(o) => o
                        .get("name")
                        .and_then(Value::as_str)
                        .zip(o.get("count")),
                    Value::Array(a) if a.len() == 2 => a[0].as_str().zip(a.get(1)),
                    _ => None,
                };
                match pair {
                    Some((name, count)) => pairs.push((name.to_string(), count)),
                    None => issues.push(Issue::new(
                        IssueKind::DroppedEntry,
                        format!("{path}[{i}]"),
                        "entry is not a name/count pair",
                    )),
                }
            }
            pairs
        }
        other => {
            issues.push(Issue::new(
                IssueKind::WrongType,
                path,
                format!("expected object or array, got {}", type_name(other)),
            ));
            return None;
        }
    };

    let mut out = Vec::with_capacity(pairs.len());
    for (name, count) in pairs {
        match number(count) {
            Some(count) => out.push(CategoryCount { name, count }),
            None => issues.push(Issue::new(
                IssueKind::DroppedEntry,
                format!("{path}.{name}"),
                format!("count is {}", type_name(count)),
            )),
        }
    }
    Some(out)
}

fn parse_score(v: &Value, issues: &mut Vec<Issue>) -> Option<ScorePayload> {
    let map = object(v, "score", issues)?;
    let Some(value) = map.get("value").and_then(number) else {
        issues.push(Issue::new(
            IssueKind::WrongType,
            "score.value",
            "score value missing or not a number",
        ));
        return None;
    };

    let grade = match map.get("grade") {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let parsed = raw.as_str().and_then(Grade::parse);
            if parsed.is_none() {
                issues.push(Issue::new(
                    IssueKind::WrongType,
                    "score.grade",
                    format!("unrecognised grade {raw}"),
                ));
            }
            parsed
        }
    };

    let mut components = match map.get("components") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => parse_components(raw, issues),
    };
    if let Some(max_scores) = map.get("max_scores") {
        apply_max_scores(&mut components, max_scores, issues);
    }

    Some(ScorePayload {
        value,
        grade,
        color: map.get("color").and_then(Value::as_str).map(str::to_string),
        components,
    })
}

fn parse_components(v: &Value, issues: &mut Vec<Issue>) -> Vec<ScoreComponent> {
    let mut out = Vec::new();
    match v {
        Value::Object(map) => {
            for (name, raw) in map {
                match number(raw) {
                    Some(value) => out.push(ScoreComponent {
                        name: name.clone(),
                        value,
                        max: None,
                    }),
                    None => issues.push(Issue::new(
                        IssueKind::DroppedEntry,
                        format!("score.components.{name}"),
                        format!("value is {}", type_name(raw)),
                    )),
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let name = item.get("name").and_then(Value::as_str);
                let value = item.get("value").and_then(number);
                match name.zip(value) {
                    Some((name, value)) => out.push(ScoreComponent {
                        name: name.to_string(),
                        value,
                        max: item.get("max").and_then(number),
                    }),
                    None => issues.push(Issue::new(
                        IssueKind::DroppedEntry,
                        format!("score.components[{i}]"),
                        "component needs a name and a numeric value",
                    )),
                }
            }
        }
        other => issues.push(Issue::new(
            IssueKind::WrongType,
            "score.components",
            format!("expected object or array, got {}", type_name(other)),
        )),
    }
    out
}

/// Maxima come positionally (`[4, 3, 1.5, 1.5]`) or keyed by component name.
fn apply_max_scores(components: &mut [ScoreComponent], v: &Value, issues: &mut Vec<Issue>) {
    match v {
        Value::Array(items) => {
            if items.len() != components.len() {
                issues.push(Issue::new(
                    IssueKind::LengthMismatch,
                    "score.max_scores",
                    format!(
                        "{} maxima for {} components",
                        items.len(),
                        components.len()
                    ),
                ));
            }
            for (c, max) in components.iter_mut().zip(items) {
                c.max = number(max);
            }
        }
        Value::Object(map) => {
            for c in components.iter_mut() {
                if let Some(max) = map.get(&c.name).and_then(number) {
                    c.max = Some(max);
                }
            }
        }
        Value::Null => {}
        other => issues.push(Issue::new(
            IssueKind::WrongType,
            "score.max_scores",
            format!("expected array or object, got {}", type_name(other)),
        )),
    }
}

/// Array of typed entries; entries that do not deserialize are dropped.
fn entries<T: DeserializeOwned>(v: &Value, path: &str, issues: &mut Vec<Issue>) -> Option<Vec<T>> {
    let Some(items) = v.as_array() else {
        issues.push(Issue::new(
            IssueKind::WrongType,
            path,
            format!("expected array, got {}", type_name(v)),
        ));
        return None;
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(entry) => out.push(entry),
            Err(err) => issues.push(Issue::new(
                IssueKind::DroppedEntry,
                format!("{path}[{i}]"),
                err.to_string(),
            )),
        }
    }
    Some(out)
}

fn typed<T: DeserializeOwned>(v: &Value, path: &str, issues: &mut Vec<Issue>) -> Option<T> {
    match serde_json::from_value::<T>(v.clone()) {
        Ok(t) => Some(t),
        Err(err) => {
            issues.push(Issue::new(IssueKind::WrongType, path, err.to_string()));
            None
        }
    }
}

fn parse_charts(v: &Value, issues: &mut Vec<Issue>) -> Charts {
    let Some(map) = object(v, "charts", issues) else {
        return Charts::default();
    };
    Charts {
        conn_by_disp: map
            .get("conn_by_disp")
            .and_then(|c| typed(c, "charts.conn_by_disp", issues)),
        scatter: map
            .get("scatter")
            .and_then(|s| entries(s, "charts.scatter", issues)),
        attempt_dist: map
            .get("attempt_dist")
            .and_then(|h| typed(h, "charts.attempt_dist", issues)),
        spend_hist: map
            .get("spend_hist")
            .and_then(|h| typed(h, "charts.spend_hist", issues)),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/validate.rs"]
mod tests;
