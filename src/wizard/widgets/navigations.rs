use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::wizard::routes::NavigationEntry;
use crate::wizard::theme::Theme;

const ACTIVE_STEP_TOKEN: &str = "{activeStep}";
const TOTAL_STEPS_TOKEN: &str = "{totalSteps}";

/// Interpolate the rail description template. `{activeStep}` is 1-based,
/// `{totalSteps}` is the flattened step count.
pub fn render_description(template: &str, active_step: usize, total_steps: usize) -> String {
    template
        .replace(ACTIVE_STEP_TOKEN, &(active_step + 1).to_string())
        .replace(TOTAL_STEPS_TOKEN, &total_steps.to_string())
}

/// Navigation rail: one clickable entry per step, sub-steps indented one
/// level, with active/passed/disabled and severity highlighting.
pub struct WizardNavigations<'a> {
    entries: &'a [NavigationEntry],
    description: &'a str,
    active_step: usize,
    total_steps: usize,
    completed: bool,
    cursor: Option<usize>,
    theme: &'a Theme,
}

impl<'a> WizardNavigations<'a> {
    pub fn new(entries: &'a [NavigationEntry], theme: &'a Theme) -> Self {
        Self {
            entries,
            description: "",
            active_step: 0,
            total_steps: 0,
            completed: false,
            cursor: None,
            theme,
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = description;
        self
    }

    pub fn progress(mut self, active_step: usize, total_steps: usize) -> Self {
        self.active_step = active_step;
        self.total_steps = total_steps;
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Flat step index the keyboard cursor sits on.
    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    fn entry_line(&self, entry: &NavigationEntry, depth: usize) -> Line<'static> {
        let is_active = entry.step == self.active_step;
        let is_passed = self.completed || entry.step < self.active_step;

        let marker = if is_active {
            "> "
        } else if is_passed && !entry.disabled {
            "+ "
        } else {
            "  "
        };

        let mut style = if entry.disabled {
            Style::default().fg(self.theme.overlay)
        } else if is_active {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else if is_passed {
            Style::default().fg(self.theme.success)
        } else {
            Style::default().fg(self.theme.subtext)
        };

        // a step-announced severity overrides the progress color
        if let Some(state) = entry.state {
            if !entry.disabled {
                style = style.fg(self.theme.severity(state));
            }
        }

        if self.cursor == Some(entry.step) {
            style = style.bg(self.theme.surface);
        }

        let indent = "  ".repeat(depth);
        Line::from(Span::styled(
            format!("{}{}{}", indent, marker, entry.label),
            style,
        ))
    }

    fn push_lines(&self, entry: &NavigationEntry, depth: usize, lines: &mut Vec<Line<'static>>) {
        lines.push(self.entry_line(entry, depth));
        for child in &entry.children {
            self.push_lines(child, depth + 1, lines);
        }
    }
}

impl Widget for WizardNavigations<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();
        if !self.description.is_empty() {
            lines.push(Line::from(Span::styled(
                render_description(self.description, self.active_step, self.total_steps),
                Style::default().fg(self.theme.subtext),
            )));
            lines.push(Line::default());
        }
        for entry in self.entries {
            self.push_lines(entry, 0, &mut lines);
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(self.theme.surface)),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_tokens() {
        assert_eq!(render_description("Step {activeStep} of {totalSteps}", 0, 4), "Step 1 of 4");
        assert_eq!(render_description("Step {activeStep} of {totalSteps}", 3, 4), "Step 4 of 4");
    }

    #[test]
    fn test_description_without_tokens_is_unchanged() {
        assert_eq!(render_description("Checkout", 1, 3), "Checkout");
    }
}
