use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// 12,34,567
    Indian,
    /// 1,234,567
    Western,
}

/// Good/bad cut points for a health tier. Interpreted through a [`Polarity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub good: f64,
    pub bad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiBenchmark {
    pub ceiling: f64,
    pub polarity: Polarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRule {
    pub label: String,
    pub thresholds: TierThresholds,
    pub polarity: Polarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiBenchmarks {
    pub ptp_pct: KpiBenchmark,
    pub connection_rate: KpiBenchmark,
    pub cost_per_ptp: KpiBenchmark,
    pub active_pct: KpiBenchmark,
    pub avg_attempts: KpiBenchmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRules {
    pub ptp_pct: HealthRule,
    pub connection_rate: HealthRule,
    pub cost_per_ptp: HealthRule,
    pub active_pct: HealthRule,
    pub attempt_efficiency: HealthRule,
    pub score: HealthRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeBands {
    pub strong_min: f64,
    pub needs_optimization_min: f64,
    pub strong_color: String,
    pub needs_optimization_color: String,
    pub weak_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCuts {
    /// Loss strictly above this is critical.
    pub critical_above: f64,
    /// Loss strictly above this (and not critical) is warn.
    pub warn_above: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardProfile {
    pub benchmarks: KpiBenchmarks,
    pub health: HealthRules,
    pub grades: GradeBands,
    pub severity: SeverityCuts,
    pub funnel_floor_pct: f64,
    pub score_sum_tolerance: f64,
    pub counter_duration_ms: u64,
    pub currency_symbol: String,
    pub grouping: Grouping,
}

impl KpiBenchmark {
    fn new(ceiling: f64, polarity: Polarity) -> Self {
        Self { ceiling, polarity }
    }
}

impl HealthRule {
    fn new(label: &str, good: f64, bad: f64, polarity: Polarity) -> Self {
        Self {
            label: label.to_string(),
            thresholds: TierThresholds { good, bad },
            polarity,
        }
    }
}

impl Default for KpiBenchmarks {
    fn default() -> Self {
        Self {
            ptp_pct: KpiBenchmark::new(25.0, Polarity::HigherIsBetter),
            connection_rate: KpiBenchmark::new(60.0, Polarity::HigherIsBetter),
            cost_per_ptp: KpiBenchmark::new(150.0, Polarity::LowerIsBetter),
            active_pct: KpiBenchmark::new(50.0, Polarity::LowerIsBetter),
            avg_attempts: KpiBenchmark::new(12.0, Polarity::LowerIsBetter),
        }
    }
}

impl Default for HealthRules {
    fn default() -> Self {
        Self {
            ptp_pct: HealthRule::new("PTP Rate", 25.0, 15.0, Polarity::HigherIsBetter),
            connection_rate: HealthRule::new("Connection", 50.0, 30.0, Polarity::HigherIsBetter),
            cost_per_ptp: HealthRule::new("Cost/PTP", 150.0, 300.0, Polarity::LowerIsBetter),
            active_pct: HealthRule::new("Active Backlog", 50.0, 70.0, Polarity::LowerIsBetter),
            attempt_efficiency: HealthRule::new(
                "Attempt Eff.",
                50.0,
                30.0,
                Polarity::HigherIsBetter,
            ),
            score: HealthRule::new("Score", 7.0, 4.0, Polarity::HigherIsBetter),
        }
    }
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            strong_min: 7.0,
            needs_optimization_min: 4.0,
            strong_color: "#3fb950".to_string(),
            needs_optimization_color: "#d29922".to_string(),
            weak_color: "#f85149".to_string(),
        }
    }
}

impl Default for SeverityCuts {
    fn default() -> Self {
        Self {
            critical_above: 50.0,
            warn_above: 25.0,
        }
    }
}

impl Default for DashboardProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl DashboardProfile {
    pub fn default_v1() -> Self {
        Self {
            benchmarks: KpiBenchmarks::default(),
            health: HealthRules::default(),
            grades: GradeBands::default(),
            severity: SeverityCuts::default(),
            funnel_floor_pct: 18.0,
            score_sum_tolerance: 0.05,
            counter_duration_ms: 900,
            currency_symbol: "₹".to_string(),
            grouping: Grouping::Indian,
        }
    }
}
