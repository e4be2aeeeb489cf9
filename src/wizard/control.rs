use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Settled output of a control's click handler.
///
/// The gate contract is deliberately permissive: only an explicit
/// `Some(false)` blocks navigation. A handler that yields no verdict
/// (`None`) counts as valid, so "handler with no explicit return" means
/// "allow navigation".
pub type Verdict = Option<bool>;

/// Boxed future produced by a click handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Verdict>> + Send>>;

/// Shared click handler. Cloned out of the active controls before being
/// invoked, so no lock is held across the await.
pub type ClickHandler = Arc<dyn Fn() -> HandlerFuture + Send + Sync>;

/// Kind of control in the step's control bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    Next,
    Prev,
    Cancel,
}

/// A single control/action in the footer of a step.
///
/// Both `Next` and `Prev` navigate to the next/previous step by default;
/// `path` overrides the target. A handler's `Some(false)` verdict blocks
/// the navigation, which is how a step enforces mandatory validation.
#[derive(Clone)]
pub struct Control {
    pub kind: ControlKind,
    pub label: String,
    /// Explicit target path for the router, overriding the route list.
    pub path: Option<String>,
    pub disabled: bool,
    pub on_click: Option<ClickHandler>,
}

impl Control {
    pub fn new(kind: ControlKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            path: None,
            disabled: false,
            on_click: None,
        }
    }

    /// Helper to create a forward-navigation control
    pub fn next(label: impl Into<String>) -> Self {
        Self::new(ControlKind::Next, label)
    }

    /// Helper to create a backward-navigation control
    pub fn prev(label: impl Into<String>) -> Self {
        Self::new(ControlKind::Prev, label)
    }

    /// Helper to create a cancel control
    pub fn cancel(label: impl Into<String>) -> Self {
        Self::new(ControlKind::Cancel, label)
    }

    /// Set an explicit target path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Disable the control
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Attach an asynchronous click handler
    pub fn on_click<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Verdict>> + Send + 'static,
    {
        self.on_click = Some(Arc::new(move || Box::pin(handler()) as HandlerFuture));
        self
    }

    /// Attach a synchronous click handler
    pub fn on_click_sync<F>(mut self, handler: F) -> Self
    where
        F: Fn() -> Result<Verdict> + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(move || {
            let verdict = handler();
            Box::pin(async move { verdict }) as HandlerFuture
        }));
        self
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("path", &self.path)
            .field("disabled", &self.disabled)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Controls used when a step does not supply its own.
pub fn default_controls() -> Vec<Control> {
    vec![Control::prev("Back"), Control::next("Next")]
}
