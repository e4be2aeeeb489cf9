use ratatui::style::Color;

use super::routes::StepState;

/// Color scheme for the wizard widgets, derived from the Catppuccin
/// palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Mocha, // Dark theme (default)
    Latte, // Light theme
}

impl Default for ThemeVariant {
    fn default() -> Self {
        Self::Mocha
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Color,
    pub subtext: Color,
    pub overlay: Color,
    pub surface: Color,
    pub base: Color,
    /// Accent for the active step and focused controls.
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Mocha => Self::mocha(),
            ThemeVariant::Latte => Self::latte(),
        }
    }

    fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext: Color::Rgb(0xa6, 0xad, 0xc8),
            overlay: Color::Rgb(0x6c, 0x70, 0x86),
            surface: Color::Rgb(0x31, 0x32, 0x44),
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
            accent: Color::Rgb(0x89, 0xb4, 0xfa),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
            warning: Color::Rgb(0xf9, 0xe2, 0xaf),
            danger: Color::Rgb(0xf3, 0x8b, 0xa8),
            info: Color::Rgb(0x89, 0xdc, 0xeb),
        }
    }

    fn latte() -> Self {
        Self {
            text: Color::Rgb(0x4c, 0x4f, 0x69),
            subtext: Color::Rgb(0x6c, 0x6f, 0x85),
            overlay: Color::Rgb(0x9c, 0xa0, 0xb0),
            surface: Color::Rgb(0xcc, 0xd0, 0xda),
            base: Color::Rgb(0xef, 0xf1, 0xf5),
            accent: Color::Rgb(0x1e, 0x66, 0xf5),
            success: Color::Rgb(0x40, 0xa0, 0x2b),
            warning: Color::Rgb(0xdf, 0x8e, 0x1d),
            danger: Color::Rgb(0xd2, 0x0f, 0x39),
            info: Color::Rgb(0x04, 0xa5, 0xe5),
        }
    }

    /// Color for a step's severity state.
    pub fn severity(&self, state: StepState) -> Color {
        match state {
            StepState::Info => self.info,
            StepState::Warning => self.warning,
            StepState::Danger => self.danger,
            StepState::Success => self.success,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}
