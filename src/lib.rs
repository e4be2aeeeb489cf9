pub mod wizard;

pub use wizard::{
    Control, ControlKind, History, MemoryHistory, NavigationContext, NavigationEntry,
    NavigationState, RouteMatch, RouteProjection, StepConfig, StepData, StepMount, StepResolution,
    StepState, Theme, ThemeVariant, Verdict, WizardConfig, WizardRuntime, WizardScope,
    project_steps,
    resolve_step,
};
