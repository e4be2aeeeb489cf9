use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::wizard::routes::StepState;
use crate::wizard::theme::Theme;

/// Header bar of the wizard: the wizard heading plus the step counter,
/// tinted by the active severity when one is set.
pub struct WizardHeader<'a> {
    heading: &'a str,
    active_step: usize,
    total_steps: usize,
    severity: Option<StepState>,
    theme: &'a Theme,
}

impl<'a> WizardHeader<'a> {
    pub fn new(heading: &'a str, theme: &'a Theme) -> Self {
        Self {
            heading,
            active_step: 0,
            total_steps: 0,
            severity: None,
            theme,
        }
    }

    pub fn progress(mut self, active_step: usize, total_steps: usize) -> Self {
        self.active_step = active_step;
        self.total_steps = total_steps;
        self
    }

    pub fn severity(mut self, severity: Option<StepState>) -> Self {
        self.severity = severity;
        self
    }
}

impl Widget for WizardHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = self
            .severity
            .map(|state| self.theme.severity(state))
            .unwrap_or(self.theme.accent);

        let mut spans = vec![Span::styled(
            self.heading.to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )];
        if self.total_steps > 0 {
            spans.push(Span::styled(
                format!("  Step {} of {}", self.active_step + 1, self.total_steps),
                Style::default().fg(self.theme.subtext),
            ));
        }

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(self.theme.surface)),
            )
            .render(area, buf);
    }
}
