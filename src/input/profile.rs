use std::path::Path;

use crate::model::thresholds::DashboardProfile;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("IO error reading profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid profile {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("inconsistent profile: {0}")]
    Inconsistent(String),
}

/// Reads a JSON profile. Absent fields keep their `default_v1` values.
pub fn load_profile(path: &Path) -> Result<DashboardProfile, ProfileError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let profile: DashboardProfile =
        serde_json::from_str(&raw).map_err(|source| ProfileError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    check_profile(&profile)?;
    tracing::info!(path = %path.display(), "dashboard profile loaded");
    Ok(profile)
}

pub fn check_profile(profile: &DashboardProfile) -> Result<(), ProfileError> {
    let g = &profile.grades;
    if g.strong_min < g.needs_optimization_min {
        return Err(ProfileError::Inconsistent(format!(
            "grade strong_min {} is below needs_optimization_min {}",
            g.strong_min, g.needs_optimization_min
        )));
    }
    let s = &profile.severity;
    if s.critical_above < s.warn_above {
        return Err(ProfileError::Inconsistent(format!(
            "severity critical_above {} is below warn_above {}",
            s.critical_above, s.warn_above
        )));
    }
    if !(0.0..=100.0).contains(&profile.funnel_floor_pct) {
        return Err(ProfileError::Inconsistent(format!(
            "funnel_floor_pct {} outside 0..=100",
            profile.funnel_floor_pct
        )));
    }
    if !profile.score_sum_tolerance.is_finite() || profile.score_sum_tolerance < 0.0 {
        return Err(ProfileError::Inconsistent(
            "score_sum_tolerance must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}
