use std::fmt;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use super::control::Control;
use super::theme::Theme;

/// Visual severity a step can project into the rail and header. Used to
/// highlight and clarify wizard progress - completed steps, errors etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepState {
    Info,
    Warning,
    Danger,
    Success,
}

/// Render callback for a step's body.
pub type StepComponent = Arc<dyn Fn(&mut Frame, Rect, &Theme) + Send + Sync>;

/// Presentation data carried by each step.
#[derive(Clone, Default)]
pub struct StepData {
    /// Heading text. Doubles as the page heading when none is set.
    pub heading: String,
    pub page_heading: Option<String>,
    /// Controls for the footer of the step; Back/Next are used when absent.
    pub controls: Option<Vec<Control>>,
    /// Initial severity for the step.
    pub state: Option<StepState>,
    /// Secondary content shown next to the step body.
    pub secondary_content: Option<String>,
}

/// One step of the wizard: a route path, a label for the navigation rail,
/// a render component and its presentation data. Steps may nest one level
/// deep via `children`.
#[derive(Clone)]
pub struct StepConfig {
    /// Route path segment, unique within its nesting level.
    pub path: String,
    pub label: String,
    pub component: StepComponent,
    pub data: StepData,
    /// Disabled steps are listed in the rail but never navigable.
    pub disabled: bool,
    pub children: Vec<StepConfig>,
}

impl StepConfig {
    pub fn new(path: impl Into<String>, label: impl Into<String>, component: StepComponent) -> Self {
        let label = label.into();
        Self {
            path: path.into(),
            data: StepData {
                heading: label.clone(),
                ..StepData::default()
            },
            label,
            component,
            disabled: false,
            children: Vec::new(),
        }
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.data.heading = heading.into();
        self
    }

    pub fn page_heading(mut self, page_heading: impl Into<String>) -> Self {
        self.data.page_heading = Some(page_heading.into());
        self
    }

    pub fn controls(mut self, controls: Vec<Control>) -> Self {
        self.data.controls = Some(controls);
        self
    }

    pub fn state(mut self, state: StepState) -> Self {
        self.data.state = Some(state);
        self
    }

    pub fn secondary_content(mut self, content: impl Into<String>) -> Self {
        self.data.secondary_content = Some(content.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn child(mut self, child: StepConfig) -> Self {
        self.children.push(child);
        self
    }
}

impl fmt::Debug for StepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepConfig")
            .field("path", &self.path)
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("children", &self.children)
            .finish()
    }
}

/// The router's current match: the path pattern that matched and the URL
/// prefix it resolved to. A match at the application root contributes no
/// prefix to the projected step paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Matched path pattern.
    pub path: String,
    /// Matched URL prefix.
    pub url: String,
}

impl RouteMatch {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }

    /// Match at the application root.
    pub fn root() -> Self {
        Self::new("/", "/")
    }

    fn prefix(segment: &str) -> &str {
        // the root match contributes no prefix
        if segment == "/" { "" } else { segment }
    }
}

impl Default for RouteMatch {
    fn default() -> Self {
        Self::root()
    }
}

/// One step in flattened (depth-first) order. The position in the flat
/// sequence is the canonical step number used for navigability math.
#[derive(Clone)]
pub struct FlatStep {
    pub step: usize,
    /// Absolute URL, pushed to history when navigating here.
    pub route: String,
    /// Absolute path pattern, matched against the current location.
    pub pattern: String,
    pub label: String,
    pub disabled: bool,
    pub depth: usize,
    pub data: StepData,
    pub component: StepComponent,
}

/// Navigation-rail display data, preserving the nesting of the input
/// descriptors while carrying flat step numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub step: usize,
    pub label: String,
    pub path: String,
    pub state: Option<StepState>,
    pub disabled: bool,
    pub children: Vec<NavigationEntry>,
}

/// Projection of the caller's step descriptors against the router's
/// current match.
#[derive(Clone, Default)]
pub struct RouteProjection {
    pub flat: Vec<FlatStep>,
    pub entries: Vec<NavigationEntry>,
}

impl RouteProjection {
    /// The flattened route list, in canonical step order.
    pub fn routes(&self) -> Vec<String> {
        self.flat.iter().map(|s| s.route.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }
}

/// Turn the ordered step descriptors plus the router's current match into
/// absolute paths, the flattened route list and the rail entries.
///
/// Flattening is depth-first: parent, then its children, then the next
/// sibling. That order defines the integer step numbering the rest of the
/// wizard relies on.
pub fn project_steps(steps: &[StepConfig], current: &RouteMatch) -> RouteProjection {
    let base_path = RouteMatch::prefix(&current.path);
    let base_url = RouteMatch::prefix(&current.url);

    let mut projection = RouteProjection::default();
    for step in steps {
        let entry = project_one(step, base_path, base_url, 0, &mut projection.flat);
        projection.entries.push(entry);
    }
    projection
}

fn project_one(
    step: &StepConfig,
    parent_pattern: &str,
    parent_url: &str,
    depth: usize,
    flat: &mut Vec<FlatStep>,
) -> NavigationEntry {
    let pattern = format!("{}{}", parent_pattern, step.path);
    let route = format!("{}{}", parent_url, step.path);
    let index = flat.len();

    flat.push(FlatStep {
        step: index,
        route: route.clone(),
        pattern: pattern.clone(),
        label: step.label.clone(),
        disabled: step.disabled,
        depth,
        data: step.data.clone(),
        component: step.component.clone(),
    });

    let children = step
        .children
        .iter()
        .map(|child| project_one(child, &pattern, &route, depth + 1, flat))
        .collect();

    NavigationEntry {
        step: index,
        label: step.label.clone(),
        path: route,
        state: step.data.state,
        disabled: step.disabled,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_component() -> StepComponent {
        Arc::new(|_, _, _| {})
    }

    fn step(path: &str, label: &str) -> StepConfig {
        StepConfig::new(path, label, blank_component())
    }

    #[test]
    fn test_flat_steps_at_root() {
        let steps = vec![step("/first", "First"), step("/second", "Second")];
        let projection = project_steps(&steps, &RouteMatch::root());

        assert_eq!(projection.routes(), &["/first", "/second"]);
        assert_eq!(projection.flat[0].pattern, "/first");
        assert_eq!(projection.entries.len(), 2);
        assert_eq!(projection.entries[1].step, 1);
    }

    #[test]
    fn test_nested_match_prefixes_paths() {
        let steps = vec![step("/account", "Account"), step("/confirm", "Confirm")];
        let current = RouteMatch::new("/checkout/:id", "/checkout/42");
        let projection = project_steps(&steps, &current);

        assert_eq!(
            projection.routes(),
            &["/checkout/42/account", "/checkout/42/confirm"]
        );
        assert_eq!(projection.flat[0].pattern, "/checkout/:id/account");
    }

    #[test]
    fn test_depth_first_flattening_order() {
        let steps = vec![
            step("/account", "Account")
                .child(step("/profile", "Profile"))
                .child(step("/password", "Password")),
            step("/confirm", "Confirm"),
        ];
        let projection = project_steps(&steps, &RouteMatch::root());

        assert_eq!(
            projection.routes(),
            &[
                "/account",
                "/account/profile",
                "/account/password",
                "/confirm",
            ]
        );
        let depths: Vec<usize> = projection.flat.iter().map(|s| s.depth).collect();
        assert_eq!(depths, &[0, 1, 1, 0]);

        // rail entries keep the nesting, with flat step numbers
        assert_eq!(projection.entries.len(), 2);
        assert_eq!(projection.entries[0].children.len(), 2);
        assert_eq!(projection.entries[0].children[1].step, 2);
        assert_eq!(projection.entries[1].step, 3);
    }

    #[test]
    fn test_disabled_and_state_carried_into_entries() {
        let steps = vec![
            step("/first", "First").state(StepState::Warning),
            step("/second", "Second").disabled(true),
        ];
        let projection = project_steps(&steps, &RouteMatch::root());

        assert_eq!(projection.entries[0].state, Some(StepState::Warning));
        assert!(projection.entries[1].disabled);
        assert!(projection.flat[1].disabled);
    }

    #[test]
    fn test_projection_is_stable_for_same_input() {
        let steps = vec![step("/a", "A").child(step("/b", "B")), step("/c", "C")];
        let first = project_steps(&steps, &RouteMatch::root());
        let second = project_steps(&steps, &RouteMatch::root());
        assert_eq!(first.routes(), second.routes());
    }
}
