//! Cosmetic count-up of displayed numbers.
//!
//! Animations are sampled, not scheduled: callers ask for the frame at an
//! elapsed time. Each animation carries a cancel token owned by the
//! [`Animator`], so a newer render pass can silence a stale counter before it
//! writes over a fresh value.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use crate::report::{NumberFormat, format_fixed};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSpec {
    pub target: f64,
    pub duration_ms: u64,
    pub prefix: String,
    pub suffix: String,
    pub decimals: usize,
}

impl CounterSpec {
    pub fn new(target: f64, duration_ms: u64) -> Self {
        Self {
            target,
            duration_ms,
            prefix: String::new(),
            suffix: String::new(),
            decimals: 0,
        }
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn display(&self, value: f64, fmt: &NumberFormat) -> String {
        let body = if self.decimals > 0 {
            format_fixed(value, self.decimals)
        } else {
            fmt.count(value)
        };
        format!("{}{}{}", self.prefix, body, self.suffix)
    }

    pub fn final_display(&self, fmt: &NumberFormat) -> String {
        self.display(self.target, fmt)
    }
}

/// Cubic ease-out on a progress value clamped to [0, 1].
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    1.0 - (1.0 - p).powi(3)
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone)]
pub struct CounterAnimation {
    pub spec: CounterSpec,
    token: CancelToken,
}

impl CounterAnimation {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// `None` once cancelled.
    pub fn frame_at(&self, elapsed: Duration, fmt: &NumberFormat) -> Option<String> {
        if self.token.is_cancelled() {
            return None;
        }
        let p = if self.spec.duration_ms == 0 {
            1.0
        } else {
            elapsed.as_secs_f64() * 1000.0 / self.spec.duration_ms as f64
        };
        if p >= 1.0 {
            return Some(self.spec.final_display(fmt));
        }
        let value = self.spec.target * ease_out_cubic(p);
        Some(self.spec.display(value, fmt))
    }

    /// Frames every `step` from zero; the last one is always the target.
    pub fn frames(&self, step: Duration, fmt: &NumberFormat) -> Vec<(u64, String)> {
        let mut out = Vec::new();
        let step_ms = step.as_millis().max(1) as u64;
        let mut t = 0u64;
        loop {
            let at = t.min(self.spec.duration_ms);
            match self.frame_at(Duration::from_millis(at), fmt) {
                Some(frame) => out.push((at, frame)),
                None => break,
            }
            if at >= self.spec.duration_ms {
                break;
            }
            t = t.saturating_add(step_ms);
        }
        out
    }
}

/// Owns the running counters, one per display region.
#[derive(Debug, Default)]
pub struct Animator {
    running: BTreeMap<String, CancelToken>,
}

impl Animator {
    pub fn start(&mut self, region: &str, spec: CounterSpec) -> CounterAnimation {
        if let Some(previous) = self.running.remove(region) {
            previous.cancel();
        }
        let token = CancelToken::default();
        self.running.insert(region.to_string(), token.clone());
        CounterAnimation { spec, token }
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in std::mem::take(&mut self.running) {
            token.cancel();
        }
    }

    pub fn running(&self) -> usize {
        self.running.len()
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/animation.rs"]
mod tests;
