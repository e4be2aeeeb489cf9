pub mod context;
pub mod control;
pub mod guard;
pub mod history;
pub mod navigation;
pub mod routes;
pub mod runtime;
pub mod theme;
pub mod widgets;

pub use context::{NavigationContext, StepMount, WizardScope};
pub use control::{ClickHandler, Control, ControlKind, Verdict, default_controls};
pub use guard::{StepResolution, resolve_step};
pub use history::{History, MemoryHistory};
pub use navigation::NavigationState;
pub use routes::{
    FlatStep, NavigationEntry, RouteMatch, RouteProjection, StepComponent, StepConfig, StepData,
    StepState, project_steps,
};
pub use runtime::{WizardConfig, WizardRuntime};
pub use theme::{Theme, ThemeVariant};
pub use widgets::{WizardControls, WizardHeader, WizardNavigations, WizardStepFrame};
