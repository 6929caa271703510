pub mod html;
pub mod json;
pub mod text;

use crate::animation::CounterAnimation;
use crate::dashboard::registry::ChartHandle;
use crate::dashboard::view::DashboardView;
use crate::model::thresholds::{DashboardProfile, Grouping};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize dashboard: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("nothing rendered yet")]
    NothingRendered,
}

/// What every renderer reads: the last rendered view plus load status.
pub struct ReportContext<'a> {
    pub view: &'a DashboardView,
    pub state: &'static str,
    pub banner: Option<&'a str>,
    pub fmt: &'a NumberFormat,
    pub counters: &'a [CounterAnimation],
    pub charts: Vec<&'a ChartHandle>,
    pub frame_step_ms: u64,
}

/// Locale-aware number formatting shared by every region.
#[derive(Debug, Clone)]
pub struct NumberFormat {
    pub grouping: Grouping,
    pub currency_symbol: String,
}

impl NumberFormat {
    pub fn from_profile(profile: &DashboardProfile) -> Self {
        Self {
            grouping: profile.grouping,
            currency_symbol: profile.currency_symbol.clone(),
        }
    }

    /// Whole number with locale grouping.
    pub fn count(&self, v: f64) -> String {
        self.fixed_grouped(v, 0)
    }

    /// Up to three fraction digits, trailing zeros dropped, grouped.
    pub fn locale(&self, v: f64) -> String {
        let s = self.fixed_grouped(v, 3);
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }

    pub fn currency(&self, v: f64) -> String {
        format!("{}{}", self.currency_symbol, self.locale(v))
    }

    pub fn currency_whole(&self, v: f64) -> String {
        format!("{}{}", self.currency_symbol, self.count(v))
    }

    pub fn percent(&self, v: f64) -> String {
        format!("{}%", format_fixed(v, 1))
    }

    pub fn fixed_grouped(&self, v: f64, decimals: usize) -> String {
        let fixed = format_fixed(v, decimals);
        let (sign, digits) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };
        let mut out = String::with_capacity(fixed.len() + 8);
        out.push_str(sign);
        out.push_str(&group_digits(int_part, self.grouping));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

/// Fixed decimals; non-finite input renders as zero and `-0` is normalised.
pub fn format_fixed(v: f64, decimals: usize) -> String {
    let v = finite_or_zero(v);
    let s = format!("{:.*}", decimals, v);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

pub fn group_digits(int_part: &str, grouping: Grouping) -> String {
    let len = int_part.len();
    if len <= 3 {
        return int_part.to_string();
    }
    let (head, tail) = int_part.split_at(len - 3);
    let group = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
