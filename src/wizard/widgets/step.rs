use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::wizard::routes::{StepData, StepState};
use crate::wizard::theme::Theme;

/// Heading frame of a step: the heading, the page heading (falling back
/// to the heading when absent) and optional secondary content. The step
/// body itself is drawn by the step's component below this frame.
pub struct WizardStepFrame<'a> {
    data: &'a StepData,
    severity: Option<StepState>,
    theme: &'a Theme,
}

impl<'a> WizardStepFrame<'a> {
    pub fn new(data: &'a StepData, theme: &'a Theme) -> Self {
        Self {
            data,
            severity: None,
            theme,
        }
    }

    pub fn severity(mut self, severity: Option<StepState>) -> Self {
        self.severity = severity;
        self
    }

    /// Lines this frame needs, for layout splitting.
    pub fn height(&self) -> u16 {
        if self.data.secondary_content.is_some() { 4 } else { 3 }
    }
}

impl Widget for WizardStepFrame<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let page_heading = self
            .data
            .page_heading
            .as_deref()
            .unwrap_or(&self.data.heading);
        let accent = self
            .severity
            .map(|state| self.theme.severity(state))
            .unwrap_or(self.theme.accent);

        let mut lines = vec![
            Line::from(Span::styled(
                self.data.heading.clone(),
                Style::default().fg(self.theme.subtext),
            )),
            Line::from(Span::styled(
                page_heading.to_string(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(secondary) = &self.data.secondary_content {
            lines.push(Line::from(Span::styled(
                secondary.clone(),
                Style::default()
                    .fg(self.theme.overlay)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
