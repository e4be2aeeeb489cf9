use std::sync::{Arc, Weak};

use anyhow::Result;
use parking_lot::Mutex;

use super::control::Control;
use super::history::History;
use super::navigation::NavigationState;
use super::routes::StepState;

const SCOPE_ERROR: &str = "NavigationContext must be used within an active WizardScope";

/// Owns the single [`NavigationState`] of a wizard instance.
///
/// The scope is created once when the wizard comes up and dropped when it
/// goes away; every consumer works through [`NavigationContext`] handles,
/// so the state itself is never reachable for direct field mutation.
pub struct WizardScope {
    state: Arc<Mutex<NavigationState>>,
}

impl WizardScope {
    pub fn new(history: Box<dyn History>) -> Self {
        Self {
            state: Arc::new(Mutex::new(NavigationState::new(history))),
        }
    }

    /// Hand out a navigation handle for steps, rail and controls.
    pub fn navigation(&self) -> NavigationContext {
        NavigationContext {
            state: Arc::downgrade(&self.state),
        }
    }
}

/// Cheap cloneable handle to the wizard's shared navigation state.
///
/// Every operation fails fast with a panic when invoked after the owning
/// [`WizardScope`] is gone; that is a wiring bug in the embedder, not a
/// runtime condition.
#[derive(Clone)]
pub struct NavigationContext {
    state: Weak<Mutex<NavigationState>>,
}

impl NavigationContext {
    fn with<R>(&self, f: impl FnOnce(&mut NavigationState) -> R) -> R {
        let state = self.state.upgrade().expect(SCOPE_ERROR);
        let mut nav = state.lock();
        f(&mut nav)
    }

    pub fn active_step(&self) -> usize {
        self.with(|nav| nav.active_step())
    }

    pub fn strict(&self) -> bool {
        self.with(|nav| nav.strict())
    }

    pub fn completed(&self) -> bool {
        self.with(|nav| nav.completed())
    }

    pub fn routes(&self) -> Vec<String> {
        self.with(|nav| nav.routes().to_vec())
    }

    pub fn active_controls(&self) -> Option<Vec<Control>> {
        self.with(|nav| nav.active_controls().map(<[Control]>::to_vec))
    }

    pub fn active_state(&self) -> Option<StepState> {
        self.with(|nav| nav.active_state())
    }

    pub fn current_path(&self) -> String {
        self.with(|nav| nav.current_path())
    }

    pub fn is_navigable_step(&self, step: usize) -> bool {
        self.with(|nav| nav.is_navigable_step(step))
    }

    /// Build the validation-gate future. The lock is released before the
    /// future is handed back, so nothing is held across the await.
    pub fn is_valid_step(
        &self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<bool>> + Send>> {
        self.with(|nav| nav.is_valid_step())
    }

    pub fn next_step(&self, path: Option<&str>) {
        self.with(|nav| nav.next_step(path));
    }

    pub fn previous_step(&self, path: Option<&str>) {
        self.with(|nav| nav.previous_step(path));
    }

    pub fn complete_wizard(&self) {
        self.with(|nav| nav.complete_wizard());
    }

    pub fn set_active_step(&self, step: usize) {
        self.with(|nav| nav.set_active_step(step));
    }

    pub fn set_active_controls(&self, controls: Vec<Control>) {
        self.with(|nav| nav.set_active_controls(controls));
    }

    pub fn clear_active_controls(&self) {
        self.with(|nav| nav.clear_active_controls());
    }

    pub fn set_active_state(&self, state: StepState) {
        self.with(|nav| nav.set_active_state(state));
    }

    pub fn clear_active_state(&self) {
        self.with(|nav| nav.clear_active_state());
    }

    pub fn set_routes(&self, routes: Vec<String>) {
        self.with(|nav| nav.set_routes(routes));
    }

    pub fn set_strict(&self, strict: bool) {
        self.with(|nav| nav.set_strict(strict));
    }

    /// Router-level redirect: push a location without touching the step
    /// index. The step that mounts at the new location claims its own
    /// index afterwards.
    pub fn redirect(&self, path: &str) {
        self.with(|nav| {
            let current = nav.current_path();
            // history is behind the state, so go through a plain push
            if current != path {
                nav.push_path(path);
            }
        });
    }

    /// Per-step self-registration: claim the step index plus the
    /// controls/severity overrides (set-if-absent). The returned guard
    /// releases both overrides when dropped, however the step goes away.
    pub fn mount_step(
        &self,
        step: usize,
        controls: Option<Vec<Control>>,
        state: Option<StepState>,
    ) -> StepMount {
        self.with(|nav| {
            nav.set_active_step(step);
            if let Some(controls) = controls {
                nav.set_active_controls(controls);
            }
            if let Some(state) = state {
                nav.set_active_state(state);
            }
        });
        StepMount {
            state: self.state.clone(),
            step,
        }
    }
}

/// RAII guard for a mounted step's claim on the shared overrides.
pub struct StepMount {
    state: Weak<Mutex<NavigationState>>,
    step: usize,
}

impl StepMount {
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Drop for StepMount {
    fn drop(&mut self) {
        // Must not panic inside drop; a vanished scope already released
        // everything anyway.
        if let Some(state) = self.state.upgrade() {
            let mut nav = state.lock();
            nav.clear_active_controls();
            nav.clear_active_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::control::ControlKind;
    use crate::wizard::history::MemoryHistory;

    fn scope_with_routes(routes: &[&str]) -> WizardScope {
        let scope = WizardScope::new(Box::new(MemoryHistory::new(routes[0])));
        scope
            .navigation()
            .set_routes(routes.iter().map(|r| r.to_string()).collect());
        scope
    }

    #[test]
    fn test_context_reflects_shared_state() {
        let scope = scope_with_routes(&["/first", "/second"]);
        let nav = scope.navigation();
        let other = nav.clone();

        nav.next_step(None);
        assert_eq!(other.active_step(), 1);
        assert_eq!(other.current_path(), "/second");
    }

    #[test]
    fn test_mount_claims_and_releases_overrides() {
        let scope = scope_with_routes(&["/first", "/second"]);
        let nav = scope.navigation();

        {
            let mount = nav.mount_step(
                1,
                Some(vec![Control::next("Continue")]),
                Some(StepState::Info),
            );
            assert_eq!(mount.step(), 1);
            assert_eq!(nav.active_step(), 1);
            assert_eq!(nav.active_controls().unwrap()[0].kind, ControlKind::Next);
            assert_eq!(nav.active_state(), Some(StepState::Info));
        }

        // unmount released both overrides
        assert!(nav.active_controls().is_none());
        assert!(nav.active_state().is_none());
    }

    #[test]
    fn test_second_mount_does_not_clobber_first_claim() {
        let scope = scope_with_routes(&["/first", "/second"]);
        let nav = scope.navigation();

        let _outer = nav.mount_step(0, Some(vec![Control::next("Outer")]), None);
        let inner = nav.mount_step(0, Some(vec![Control::next("Inner")]), None);

        assert_eq!(nav.active_controls().unwrap()[0].label, "Outer");
        drop(inner);
        // release is unconditional, even for the declined claimant
        assert!(nav.active_controls().is_none());
    }

    #[test]
    fn test_redirect_pushes_without_moving_the_step() {
        let scope = scope_with_routes(&["/first", "/second"]);
        let nav = scope.navigation();

        nav.redirect("/second");
        assert_eq!(nav.current_path(), "/second");
        assert_eq!(nav.active_step(), 0);

        // redirect to the current location is a no-op
        nav.redirect("/second");
        assert_eq!(nav.current_path(), "/second");
    }

    #[test]
    #[should_panic(expected = "must be used within an active WizardScope")]
    fn test_use_after_scope_drop_panics() {
        let scope = scope_with_routes(&["/first"]);
        let nav = scope.navigation();
        drop(scope);
        nav.active_step();
    }

    #[test]
    fn test_mount_drop_after_scope_drop_is_harmless() {
        let scope = scope_with_routes(&["/first"]);
        let nav = scope.navigation();
        let mount = nav.mount_step(0, None, None);
        drop(scope);
        drop(mount);
    }
}
