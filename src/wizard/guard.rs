use super::context::NavigationContext;
use super::routes::RouteProjection;

/// Outcome of resolving the current location against the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResolution {
    /// Render the step with this flat index.
    Render(usize),
    /// Redirect to the last known-good step.
    Redirect(String),
}

/// Decide whether the step matching the current location may render.
///
/// A matched step renders when it is navigable and not disabled, or when
/// it is the final flattened step and the wizard is completed. Everything
/// else redirects to the active step's path - this is the enforcement
/// point that makes `is_navigable_step` binding rather than advisory.
pub fn resolve_step(projection: &RouteProjection, nav: &NavigationContext) -> StepResolution {
    let current = nav.current_path();
    let matched = projection
        .flat
        .iter()
        .position(|step| step.route == current || step.pattern == current);

    if let Some(step) = matched {
        let is_final = step + 1 == projection.len();
        let disabled = projection.flat[step].disabled;
        if (nav.is_navigable_step(step) && !disabled) || (is_final && nav.completed()) {
            return StepResolution::Render(step);
        }
    }

    let fallback = projection
        .flat
        .get(nav.active_step())
        .map(|step| step.route.clone())
        .unwrap_or_else(|| "/".to_string());
    StepResolution::Redirect(fallback)
}
