use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    ScoreComponents,
    StateDonut,
    Dispositions,
    DispositionDonut,
    ConnectionByDisposition,
    Scatter,
    AttemptDistribution,
    SpendHistogram,
}

impl Region {
    pub fn name(self) -> &'static str {
        match self {
            Region::ScoreComponents => "score_components",
            Region::StateDonut => "state_donut",
            Region::Dispositions => "dispositions",
            Region::DispositionDonut => "disposition_donut",
            Region::ConnectionByDisposition => "connection_by_disposition",
            Region::Scatter => "scatter",
            Region::AttemptDistribution => "attempt_distribution",
            Region::SpendHistogram => "spend_histogram",
        }
    }
}

pub fn region_order() -> &'static [Region] {
    &[
        Region::ScoreComponents,
        Region::StateDonut,
        Region::Dispositions,
        Region::DispositionDonut,
        Region::ConnectionByDisposition,
        Region::Scatter,
        Region::AttemptDistribution,
        Region::SpendHistogram,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    StackedBar,
    Doughnut,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<(f64, f64)>,
    pub colors: Vec<String>,
}

impl Dataset {
    pub fn values(label: impl Into<String>, values: Vec<f64>, colors: Vec<String>) -> Self {
        Self {
            label: label.into(),
            values,
            points: Vec::new(),
            colors,
        }
    }

    pub fn points(label: impl Into<String>, points: Vec<(f64, f64)>, color: &str) -> Self {
        Self {
            label: label.into(),
            values: Vec::new(),
            points,
            colors: vec![color.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub horizontal: bool,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHandle {
    pub id: u64,
    pub region: Region,
    pub spec: ChartSpec,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("chart region {0} is still occupied; release it before creating a new chart")]
    Occupied(&'static str),
}

/// Live chart handles, at most one per region.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    live: BTreeMap<Region, ChartHandle>,
    next_id: u64,
    created: u64,
    released: u64,
}

impl ChartRegistry {
    pub fn create(&mut self, region: Region, spec: ChartSpec) -> Result<u64, RegistryError> {
        if self.live.contains_key(&region) {
            return Err(RegistryError::Occupied(region.name()));
        }
        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(region, ChartHandle { id, region, spec });
        self.created += 1;
        Ok(id)
    }

    pub fn release(&mut self, region: Region) -> bool {
        let released = self.live.remove(&region).is_some();
        if released {
            self.released += 1;
        }
        released
    }

    pub fn release_all(&mut self) -> usize {
        region_order()
            .iter()
            .filter(|region| self.release(**region))
            .count()
    }

    pub fn get(&self, region: Region) -> Option<&ChartHandle> {
        self.live.get(&region)
    }

    /// Live handles in page order.
    pub fn handles(&self) -> impl Iterator<Item = &ChartHandle> {
        region_order().iter().filter_map(|region| self.live.get(region))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/dashboard/registry.rs"]
mod tests;
