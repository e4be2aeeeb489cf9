use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::wizard::control::Control;
use crate::wizard::theme::Theme;

/// Control bar at the foot of a step: back/next/cancel buttons.
///
/// While a validation future is outstanding the whole bar renders dimmed;
/// the runtime also ignores activations during that window, so rapid
/// clicks cannot race the pending gate.
pub struct WizardControls<'a> {
    controls: &'a [Control],
    selected: Option<usize>,
    pending: bool,
    theme: &'a Theme,
}

impl<'a> WizardControls<'a> {
    pub fn new(controls: &'a [Control], theme: &'a Theme) -> Self {
        Self {
            controls,
            selected: None,
            pending: false,
            theme,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }
}

impl Widget for WizardControls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (index, control) in self.controls.iter().enumerate() {
            let style = if control.disabled || self.pending {
                Style::default().fg(self.theme.overlay)
            } else if self.selected == Some(index) {
                Style::default()
                    .fg(self.theme.accent)
                    .bg(self.theme.surface)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text)
            };

            spans.push(Span::styled(format!("[ {} ]", control.label), style));
            spans.push(Span::raw("  "));
        }

        if self.pending {
            spans.push(Span::styled(
                "validating...",
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(self.theme.surface)),
            )
            .render(area, buf);
    }
}
