use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use super::context::{NavigationContext, StepMount, WizardScope};
use super::control::{Control, ControlKind, default_controls};
use super::guard::{StepResolution, resolve_step};
use super::history::History;
use super::routes::{RouteMatch, RouteProjection, StepConfig, project_steps};
use super::theme::Theme;
use super::widgets::{WizardControls, WizardHeader, WizardNavigations, WizardStepFrame};

/// Wizard-wide configuration supplied by the embedder.
#[derive(Clone)]
pub struct WizardConfig {
    /// Heading shown in the wizard header.
    pub heading: String,
    /// Rail description template; supports `{activeStep}`/`{totalSteps}`.
    pub navigation_description: String,
    /// Restrict forward navigation to one step ahead.
    pub strict: bool,
    /// The router match the wizard is nested under.
    pub base: RouteMatch,
    pub theme: Theme,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            heading: "Wizard".to_string(),
            navigation_description: "Step {activeStep} of {totalSteps}".to_string(),
            strict: true,
            base: RouteMatch::root(),
            theme: Theme::default(),
        }
    }
}

/// Which part of the wizard the keyboard is operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    /// Rail cursor, holding a flat step index.
    Rail(usize),
    /// Control-bar cursor, holding a control index.
    Controls(usize),
}

/// What to do once a pending validation gate settles.
enum NavigationIntent {
    /// Rail click on a forward step, gated on `is_valid_step`.
    JumpForward { path: String },
    /// Control-bar activation, gated on the control's own handler.
    Control {
        kind: ControlKind,
        path: Option<String>,
    },
}

/// A click whose gate is still settling. The transition is applied only
/// after the future resolves valid: validate-then-transition, never the
/// other way around.
struct PendingNavigation {
    future: Pin<Box<dyn Future<Output = Result<bool>> + Send>>,
    intent: NavigationIntent,
}

/// Drives a wizard instance: owns the scope, projects the step list,
/// routes key events to rail/controls, polls the pending validation gate
/// and renders the widget set.
pub struct WizardRuntime {
    // Keeps the shared navigation state alive; contexts are handed to
    // consumers from here.
    _scope: WizardScope,
    nav: NavigationContext,
    config: WizardConfig,
    steps: Vec<StepConfig>,
    projection: RouteProjection,
    focus: Focus,
    mounted: Option<StepMount>,
    pending: Option<PendingNavigation>,
    done: bool,
}

impl WizardRuntime {
    pub fn new(config: WizardConfig, steps: Vec<StepConfig>, history: Box<dyn History>) -> Self {
        let scope = WizardScope::new(history);
        let nav = scope.navigation();
        nav.set_strict(config.strict);

        let mut runtime = Self {
            _scope: scope,
            nav,
            config,
            steps,
            projection: RouteProjection::default(),
            focus: Focus::Rail(0),
            mounted: None,
            pending: None,
            done: false,
        };
        runtime.refresh_projection();
        runtime.sync_mounted_step();
        runtime
    }

    /// Navigation handle for embedder code (e.g. completion checks).
    pub fn navigation(&self) -> NavigationContext {
        self.nav.clone()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether a validation future is outstanding.
    pub fn is_validating(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the step descriptors; re-projects and re-resolves.
    pub fn set_steps(&mut self, steps: Vec<StepConfig>) {
        self.steps = steps;
        self.refresh_projection();
        self.sync_mounted_step();
    }

    /// Replace the base router match; re-projects and re-resolves.
    pub fn set_base(&mut self, base: RouteMatch) {
        self.config.base = base;
        self.refresh_projection();
        self.sync_mounted_step();
    }

    fn refresh_projection(&mut self) {
        self.projection = project_steps(&self.steps, &self.config.base);
        self.nav.set_routes(self.projection.routes());
    }

    /// Resolve the current location through the render guard, mounting
    /// the step that may render and following at most one redirect hop.
    fn sync_mounted_step(&mut self) {
        for _ in 0..2 {
            match resolve_step(&self.projection, &self.nav) {
                StepResolution::Render(step) => {
                    let already_mounted = self.mounted.as_ref().map(StepMount::step) == Some(step);
                    if !already_mounted {
                        // release the old claim before the new step takes it
                        self.mounted = None;
                        let data = &self.projection.flat[step].data;
                        let mount = self.nav.mount_step(step, data.controls.clone(), data.state);
                        self.mounted = Some(mount);
                        self.focus = Focus::Rail(step);
                    }
                    return;
                }
                StepResolution::Redirect(path) => {
                    if path == self.nav.current_path() {
                        warn!("redirect loop at {}; leaving location unchanged", path);
                        break;
                    }
                    debug!("redirecting to {}", path);
                    self.nav.redirect(&path);
                }
            }
        }
        // resolution produced no renderable step (e.g. the step list
        // shrank away); a stale claim must not survive into render
        self.mounted = None;
        self.focus = Focus::Rail(self.nav.active_step());
    }

    fn current_controls(&self) -> Vec<Control> {
        self.nav.active_controls().unwrap_or_else(default_controls)
    }

    /// Handle a key event. Returns false when the wizard wants to close.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        if key_event.kind != KeyEventKind::Press {
            return Ok(true);
        }

        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.done = true;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Rail(_) => Focus::Controls(self.default_control_index()),
                    Focus::Controls(_) => Focus::Rail(self.nav.active_step()),
                };
            }
            KeyCode::Up => {
                if let Focus::Rail(cursor) = self.focus {
                    self.focus = Focus::Rail(cursor.saturating_sub(1));
                }
            }
            KeyCode::Down => {
                if let Focus::Rail(cursor) = self.focus {
                    let last = self.projection.len().saturating_sub(1);
                    self.focus = Focus::Rail((cursor + 1).min(last));
                }
            }
            KeyCode::Left => {
                if let Focus::Controls(cursor) = self.focus {
                    self.focus = Focus::Controls(cursor.saturating_sub(1));
                }
            }
            KeyCode::Right => {
                if let Focus::Controls(cursor) = self.focus {
                    let last = self.current_controls().len().saturating_sub(1);
                    self.focus = Focus::Controls((cursor + 1).min(last));
                }
            }
            KeyCode::Enter => match self.focus {
                Focus::Rail(step) => self.activate_rail(step),
                Focus::Controls(index) => self.activate_control(index),
            },
            _ => {}
        }

        Ok(!self.done)
    }

    fn default_control_index(&self) -> usize {
        let controls = self.current_controls();
        controls
            .iter()
            .position(|c| c.kind == ControlKind::Next)
            .unwrap_or(0)
    }

    /// Rail click semantics: forward targets are gated on the current
    /// step's validation, backward/visited targets navigate immediately,
    /// disabled or non-navigable targets swallow the event.
    fn activate_rail(&mut self, step: usize) {
        if self.pending.is_some() {
            return;
        }
        let Some(flat) = self.projection.flat.get(step) else {
            return;
        };
        if flat.disabled || !self.nav.is_navigable_step(step) {
            debug!("suppressed navigation to non-navigable step {}", step);
            return;
        }

        if step > self.nav.active_step() {
            let future = self.nav.is_valid_step();
            self.pending = Some(PendingNavigation {
                future,
                intent: NavigationIntent::JumpForward {
                    path: flat.route.clone(),
                },
            });
        } else {
            self.nav.redirect(&flat.route);
            self.sync_mounted_step();
        }
    }

    /// Control-bar activation: every control's own handler gates its
    /// navigation, `Some(false)` blocking it.
    fn activate_control(&mut self, index: usize) {
        if self.pending.is_some() {
            return;
        }
        let controls = self.current_controls();
        let Some(control) = controls.get(index) else {
            return;
        };
        if control.disabled {
            return;
        }

        let intent = NavigationIntent::Control {
            kind: control.kind,
            path: control.path.clone(),
        };
        let future: Pin<Box<dyn Future<Output = Result<bool>> + Send>> =
            match control.on_click.clone() {
                Some(handler) => Box::pin(async move { Ok(handler().await? != Some(false)) }),
                None => Box::pin(async { Ok(true) }),
            };
        self.pending = Some(PendingNavigation { future, intent });
    }

    /// Poll the outstanding validation gate, applying the stored intent
    /// once it settles valid. A validator error surfaces to the caller;
    /// the net effect on navigation is that no transition occurred.
    pub fn poll_validation(&mut self) -> Result<()> {
        let Some(mut pending) = self.pending.take() else {
            return Ok(());
        };

        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        match pending.future.as_mut().poll(&mut cx) {
            Poll::Pending => {
                self.pending = Some(pending);
            }
            Poll::Ready(result) => {
                if result? {
                    self.apply_intent(pending.intent);
                } else {
                    debug!("validation blocked navigation");
                }
            }
        }
        Ok(())
    }

    fn apply_intent(&mut self, intent: NavigationIntent) {
        match intent {
            NavigationIntent::JumpForward { path } => {
                self.nav.next_step(Some(&path));
            }
            NavigationIntent::Control { kind, path } => match kind {
                ControlKind::Next => {
                    let last = self.projection.len().saturating_sub(1);
                    if self.nav.active_step() == last && path.is_none() {
                        // Next on the final step finishes the wizard
                        self.nav.complete_wizard();
                    } else {
                        self.nav.next_step(path.as_deref());
                    }
                }
                ControlKind::Prev => self.nav.previous_step(path.as_deref()),
                ControlKind::Cancel => {
                    self.done = true;
                }
            },
        }
        self.sync_mounted_step();
    }

    /// Render the wizard shell: header, rail, step frame + body, controls.
    pub fn render(&mut self, frame: &mut Frame) {
        let theme = self.config.theme.clone();
        let active_step = self.nav.active_step();
        let total_steps = self.projection.len();
        let mounted_step = self.mounted.as_ref().map(StepMount::step);
        let severity = self.nav.active_state().or_else(|| {
            mounted_step.and_then(|step| self.projection.flat.get(step)?.data.state)
        });

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(frame.size());

        frame.render_widget(
            WizardHeader::new(&self.config.heading, &theme)
                .progress(active_step, total_steps)
                .severity(severity),
            rows[0],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(rows[1]);

        let rail_cursor = match self.focus {
            Focus::Rail(cursor) => Some(cursor),
            Focus::Controls(_) => None,
        };
        frame.render_widget(
            WizardNavigations::new(&self.projection.entries, &theme)
                .description(&self.config.navigation_description)
                .progress(active_step, total_steps)
                .completed(self.nav.completed())
                .cursor(rail_cursor),
            columns[0],
        );

        if let Some(flat) = mounted_step.and_then(|step| self.projection.flat.get(step)) {
            let flat = flat.clone();
            let step_frame = WizardStepFrame::new(&flat.data, &theme).severity(severity);
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(step_frame.height()), Constraint::Min(0)])
                .split(columns[1]);
            frame.render_widget(step_frame, body[0]);
            (flat.component)(frame, body[1], &theme);
        }

        let controls = self.current_controls();
        let control_cursor = match self.focus {
            Focus::Controls(cursor) => Some(cursor),
            Focus::Rail(_) => None,
        };
        frame.render_widget(
            WizardControls::new(&controls, &theme)
                .selected(control_cursor)
                .pending(self.pending.is_some()),
            rows[2],
        );
    }
}
