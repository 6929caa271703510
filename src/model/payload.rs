use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Typed view of one metrics payload. Every section is optional: a missing or
/// malformed section only blanks the regions that consume it.
#[derive(Debug, Clone, Default)]
pub struct MetricsPayload {
    pub kpis: Option<Kpis>,
    pub score: Option<ScorePayload>,
    pub funnel: Option<Vec<FunnelStage>>,
    pub charts: Charts,
    pub risks: Vec<Narrative>,
    pub levers: Vec<Narrative>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub name: String,
    pub count: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    pub total: Option<f64>,
    pub attempted_leads: Option<f64>,
    pub ptp_count: Option<f64>,
    pub ptp_pct: Option<f64>,
    pub connected_leads: Option<f64>,
    pub connection_rate: Option<f64>,
    pub cost_per_ptp: Option<f64>,
    pub total_spend: Option<f64>,
    pub active_count: Option<f64>,
    pub active_pct: Option<f64>,
    pub avg_attempts: Option<f64>,
    pub avg_attempts_connected: Option<f64>,
    pub avg_attempts_not_connected: Option<f64>,
    pub attempt_efficiency: Option<f64>,
    pub total_attempted_calls: Option<f64>,
    pub total_connected_calls: Option<f64>,
    pub cost_per_connection: Option<f64>,
    pub cost_per_attempt: Option<f64>,
    pub cost_per_lead: Option<f64>,
    pub spend_mean: Option<f64>,
    pub dispositions: Option<Vec<CategoryCount>>,
    pub states: Option<Vec<CategoryCount>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    Strong,
    NeedsOptimization,
    Weak,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::Strong => "Strong",
            Grade::NeedsOptimization => "Needs Optimization",
            Grade::Weak => "Weak",
        }
    }

    /// Upstream still emits "At Risk" for the lowest band.
    pub fn parse(raw: &str) -> Option<Grade> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strong" => Some(Grade::Strong),
            "needs optimization" | "needs_optimization" => Some(Grade::NeedsOptimization),
            "weak" | "at risk" | "at_risk" => Some(Grade::Weak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub name: String,
    pub value: f64,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorePayload {
    pub value: f64,
    pub grade: Option<Grade>,
    pub color: Option<String>,
    pub components: Vec<ScoreComponent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunnelStage {
    pub stage: String,
    pub value: f64,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Charts {
    pub conn_by_disp: Option<ConnByDisposition>,
    pub scatter: Option<Vec<ScatterPoint>>,
    pub attempt_dist: Option<Histogram>,
    pub spend_hist: Option<Histogram>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnByDisposition {
    #[serde(deserialize_with = "labels")]
    pub labels: Vec<String>,
    pub connected: Vec<f64>,
    pub not_connected: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "d")]
    pub category: String,
}

/// Pre-binned distribution as delivered upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Histogram {
    #[serde(deserialize_with = "labels")]
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    #[serde(alias = "HIGH", alias = "High")]
    High,
    #[serde(alias = "MEDIUM", alias = "Medium")]
    Medium,
    #[serde(alias = "LOW", alias = "Low")]
    Low,
}

impl RiskSeverity {
    pub fn label(self) -> &'static str {
        match self {
            RiskSeverity::High => "HIGH",
            RiskSeverity::Medium => "MEDIUM",
            RiskSeverity::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Narrative {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub severity: Option<RiskSeverity>,
}

// Bin labels arrive as strings ("1-3") or bare numbers (4).
fn labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "label must be a string or number, got {other}"
            ))),
        })
        .collect()
}
