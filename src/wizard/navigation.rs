use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use log::debug;

use super::control::{Control, ControlKind};
use super::history::History;
use super::routes::StepState;

/// Single source of truth for wizard progress and the single authority on
/// whether a requested step transition is permitted.
///
/// One instance exists per active wizard, shared with every step, rail
/// entry and control-bar consumer through [`super::context::WizardScope`].
/// All mutation funnels through the operations below; illegal transitions
/// degrade to no-ops rather than errors.
pub struct NavigationState {
    /// Index into the flattened route list of the displayed step.
    active_step: usize,
    /// Restrict forward navigation to `active_step + 1` and visited steps.
    strict: bool,
    /// One-way completion flag; there is no un-complete operation.
    completed: bool,
    /// Control-bar override claimed by the mounted step.
    active_controls: Option<Vec<Control>>,
    /// Severity override claimed by the mounted step.
    active_state: Option<StepState>,
    /// Flattened route list; the index is the canonical step number.
    routes: Vec<String>,
    history: Box<dyn History>,
}

impl NavigationState {
    pub fn new(history: Box<dyn History>) -> Self {
        Self {
            active_step: 0,
            strict: true,
            completed: false,
            active_controls: None,
            active_state: None,
            routes: Vec::new(),
            history,
        }
    }

    pub fn active_step(&self) -> usize {
        self.active_step
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn active_controls(&self) -> Option<&[Control]> {
        self.active_controls.as_deref()
    }

    pub fn active_state(&self) -> Option<StepState> {
        self.active_state
    }

    pub fn current_path(&self) -> String {
        self.history.current_path()
    }

    /// Push a location without touching the step index. Used for
    /// router-level redirects; the mounting step claims its index itself.
    pub fn push_path(&mut self, path: &str) {
        self.history.push(path);
    }

    /// Whether `step` is currently permitted as a transition target.
    ///
    /// Pure function of (step, active_step, strict, completed). Once the
    /// wizard is completed only the final index stays navigable, so the
    /// summary view remains reachable while forward progression is frozen.
    pub fn is_navigable_step(&self, step: usize) -> bool {
        if self.completed {
            return !self.routes.is_empty() && step == self.routes.len() - 1;
        }
        !self.strict || step <= self.active_step + 1
    }

    /// Asynchronous validation gate for forward navigation.
    ///
    /// Looks up the `Next` control's click handler from the active
    /// controls; when present its settled verdict decides, with any value
    /// other than `Some(false)` counting as valid. Without a handler the
    /// gate resolves to true immediately. A handler error propagates to
    /// the caller; the transition simply never happens.
    pub fn is_valid_step(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send>> {
        let handler = self
            .active_controls
            .as_deref()
            .and_then(|controls| controls.iter().find(|c| c.kind == ControlKind::Next))
            .and_then(|control| control.on_click.clone());

        Box::pin(async move {
            match handler {
                Some(handler) => Ok(handler().await? != Some(false)),
                None => Ok(true),
            }
        })
    }

    /// Advance one step, pushing the target path to history.
    ///
    /// The target resolves to `path` when given, else the next entry in
    /// the route list. With no resolvable target (already at the last
    /// step) this is a no-op. Validation is the caller's concern: gate on
    /// [`Self::is_valid_step`] before invoking.
    pub fn next_step(&mut self, path: Option<&str>) {
        let target = path
            .map(str::to_string)
            .or_else(|| self.routes.get(self.active_step + 1).cloned());
        let Some(target) = target else {
            return;
        };

        self.active_step = (self.active_step + 1).min(self.max_index());
        debug!("next step -> {} ({})", self.active_step, target);
        self.history.push(&target);
    }

    /// Go back one step, pushing the target path to history. No-op at the
    /// first step when no explicit path is given.
    pub fn previous_step(&mut self, path: Option<&str>) {
        let target = path.map(str::to_string).or_else(|| {
            self.active_step
                .checked_sub(1)
                .and_then(|previous| self.routes.get(previous).cloned())
        });
        let Some(target) = target else {
            return;
        };

        self.active_step = self.active_step.saturating_sub(1);
        debug!("previous step -> {} ({})", self.active_step, target);
        self.history.push(&target);
    }

    /// Idempotently mark the wizard as completed.
    pub fn complete_wizard(&mut self) {
        if !self.completed {
            debug!("wizard completed at step {}", self.active_step);
        }
        self.completed = true;
    }

    /// Directly claim a step index. Called by the mounting step so the
    /// shared notion of "current" tracks whatever the router resolved,
    /// covering deep links and browser-style back/forward navigation.
    pub fn set_active_step(&mut self, step: usize) {
        self.active_step = step.min(self.max_index());
    }

    /// Claim the control-bar override. First claim wins: a value already
    /// set by another consumer is kept.
    pub fn set_active_controls(&mut self, controls: Vec<Control>) {
        if self.active_controls.is_none() {
            self.active_controls = Some(controls);
        }
    }

    pub fn clear_active_controls(&mut self) {
        self.active_controls = None;
    }

    /// Claim the severity override, first claim wins.
    pub fn set_active_state(&mut self, state: StepState) {
        if self.active_state.is_none() {
            self.active_state = Some(state);
        }
    }

    pub fn clear_active_state(&mut self) {
        self.active_state = None;
    }

    /// Replace the flattened route list. Invoked by the step-list renderer
    /// whenever the step descriptors or their computed paths change.
    pub fn set_routes(&mut self, routes: Vec<String>) {
        self.routes = routes;
        // keep the active index in range when the list shrinks
        self.active_step = self.active_step.min(self.max_index());
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    fn max_index(&self) -> usize {
        self.routes.len().saturating_sub(1)
    }
}
