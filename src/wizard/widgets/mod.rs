pub mod controls;
pub mod header;
pub mod navigations;
pub mod step;

pub use controls::WizardControls;
pub use header::WizardHeader;
pub use navigations::WizardNavigations;
pub use step::WizardStepFrame;
