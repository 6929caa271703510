//! Load lifecycle and the render pass.
//!
//! `Idle → Loading → Rendered | Error`. Each request hands out a ticket from
//! a monotonically increasing generation counter; only the newest ticket may
//! complete, so a slow earlier load can never overwrite a newer one.

pub mod registry;
pub mod view;

use serde_json::Value;

use crate::animation::{Animator, CounterAnimation};
use crate::input::validate::{Validated, validate};
use crate::input::{PayloadError, PayloadSource};
use crate::model::issues::count_by_kind;
use crate::model::thresholds::DashboardProfile;
use crate::report::NumberFormat;
use registry::{ChartRegistry, RegistryError};
use view::{DashboardView, build_view, chart_specs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading(Ticket),
    Rendered,
    Error,
}

impl LoadState {
    pub fn name(self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading(_) => "loading",
            LoadState::Rendered => "rendered",
            LoadState::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

pub struct Dashboard {
    profile: DashboardProfile,
    fmt: NumberFormat,
    state: LoadState,
    generation: u64,
    pending_label: String,
    banner: Option<String>,
    view: Option<DashboardView>,
    registry: ChartRegistry,
    animator: Animator,
    counters: Vec<CounterAnimation>,
    passes: u64,
}

impl Dashboard {
    pub fn new(profile: DashboardProfile) -> Self {
        let fmt = NumberFormat::from_profile(&profile);
        Self {
            profile,
            fmt,
            state: LoadState::Idle,
            generation: 0,
            pending_label: String::new(),
            banner: None,
            view: None,
            registry: ChartRegistry::default(),
            animator: Animator::default(),
            counters: Vec::new(),
            passes: 0,
        }
    }

    /// Starts a load from any state. Any earlier ticket becomes stale.
    pub fn request(&mut self, source_label: impl Into<String>) -> Ticket {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.pending_label = source_label.into();
        self.state = LoadState::Loading(ticket);
        tracing::info!(
            generation = ticket.0,
            source = %self.pending_label,
            "load requested"
        );
        ticket
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.state == LoadState::Loading(ticket)
    }

    /// Completes a load with the raw fetch result.
    pub fn complete(&mut self, ticket: Ticket, fetched: Result<Value, PayloadError>) -> Completion {
        if !self.is_current(ticket) {
            tracing::warn!(
                generation = ticket.0,
                latest = self.generation,
                "stale load completion ignored"
            );
            return Completion::Stale;
        }
        match fetched.and_then(|value| validate(&value)) {
            Ok(validated) => self.succeed(ticket, validated),
            Err(err) => self.fail(ticket, err.to_string()),
        }
    }

    pub fn succeed(&mut self, ticket: Ticket, validated: Validated) -> Completion {
        if !self.is_current(ticket) {
            tracing::warn!(generation = ticket.0, "stale success ignored");
            return Completion::Stale;
        }
        for (kind, n) in count_by_kind(&validated.issues) {
            tracing::debug!(kind = kind.name(), count = n, "payload validation issues");
        }
        match self.render_pass(validated) {
            Ok(()) => {
                self.banner = None;
                self.state = LoadState::Rendered;
            }
            Err(err) => {
                tracing::error!(error = %err, "render pass failed");
                self.banner = Some(err.to_string());
                self.state = LoadState::Error;
            }
        }
        Completion::Applied
    }

    /// Sets the banner; whatever was rendered before stays visible.
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> Completion {
        if !self.is_current(ticket) {
            tracing::warn!(generation = ticket.0, "stale failure ignored");
            return Completion::Stale;
        }
        let message = message.into();
        tracing::error!(generation = ticket.0, error = %message, "load failed");
        self.banner = Some(message);
        self.state = LoadState::Error;
        Completion::Applied
    }

    /// Request, fetch and complete in one step.
    pub fn load(&mut self, source: &dyn PayloadSource) -> Completion {
        let ticket = self.request(source.label());
        let fetched = source.fetch();
        self.complete(ticket, fetched)
    }

    fn render_pass(&mut self, validated: Validated) -> Result<(), RegistryError> {
        self.animator.cancel_all();
        self.counters.clear();
        let released = self.registry.release_all();

        let view = build_view(
            &self.pending_label,
            &validated.payload,
            validated.issues,
            &self.profile,
            &self.fmt,
        );
        for issue in &view.issues {
            tracing::warn!(
                kind = issue.kind.name(),
                path = %issue.path,
                "{}",
                issue.detail
            );
        }

        let specs = chart_specs(&view);
        for (region, spec) in specs {
            self.registry.create(region, spec)?;
        }
        for card in &view.cards {
            self.counters
                .push(self.animator.start(card.key, card.counter.clone()));
        }

        self.passes += 1;
        tracing::info!(
            pass = self.passes,
            source = %view.source,
            charts = self.registry.live_count(),
            released,
            cards = view.cards.len(),
            issues = view.issues.len(),
            "dashboard rendered"
        );
        self.view = Some(view);
        Ok(())
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    pub fn counters(&self) -> &[CounterAnimation] {
        &self.counters
    }

    pub fn profile(&self) -> &DashboardProfile {
        &self.profile
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.fmt
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/dashboard/tests.rs"]
mod tests;
