use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    style::Style,
    text::Line,
    widgets::Paragraph,
};

use wizard_tui::wizard::StepComponent;
use wizard_tui::{
    Control, MemoryHistory, StepConfig, StepState, Theme, ThemeVariant, WizardConfig,
    WizardRuntime,
};

#[derive(Parser)]
#[command(name = "wizard-tui", about = "Multi-step wizard widget demo")]
struct Cli {
    /// Allow jumping to any step (turns strict navigation off)
    #[arg(long)]
    free_nav: bool,

    /// Use the light theme
    #[arg(long)]
    light: bool,

    /// Log file path
    #[arg(long, default_value = "wizard-tui.log")]
    log_file: String,
}

fn text_component(lines: Vec<&'static str>) -> StepComponent {
    Arc::new(move |frame, area, theme| {
        let text: Vec<Line> = lines
            .iter()
            .map(|line| Line::styled(*line, Style::default().fg(theme.text)))
            .collect();
        frame.render_widget(Paragraph::new(text), area);
    })
}

fn demo_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::new(
            "/account",
            "Account",
            text_component(vec![
                "Create your account.",
                "",
                "Use the rail (Tab + arrows) or the controls below to move around.",
            ]),
        )
        .page_heading("Tell us who you are")
        .child(StepConfig::new(
            "/profile",
            "Profile",
            text_component(vec!["Fill in your profile details."]),
        ))
        .child(StepConfig::new(
            "/password",
            "Password",
            text_component(vec!["Pick a strong password."]),
        )),
        StepConfig::new(
            "/shipping",
            "Shipping",
            text_component(vec![
                "Where should we ship to?",
                "",
                "The Next control here runs an async validation before advancing.",
            ]),
        )
        .controls(vec![
            Control::prev("Back"),
            Control::next("Validate & Continue").on_click(|| async {
                // simulate an async address check
                tokio::time::sleep(Duration::from_millis(400)).await;
                Ok(Some(true))
            }),
            Control::cancel("Cancel"),
        ]),
        StepConfig::new(
            "/payment",
            "Payment",
            text_component(vec!["Enter your payment details."]),
        )
        .state(StepState::Warning)
        .secondary_content("Payments are processed after confirmation."),
        StepConfig::new(
            "/summary",
            "Summary",
            text_component(vec![
                "All done - review your order.",
                "",
                "Next on this final step completes the wizard.",
            ]),
        )
        .controls(vec![Control::prev("Back"), Control::next("Finish")]),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&cli.log_file)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    info!("Starting wizard-tui demo");

    let variant = if cli.light {
        ThemeVariant::Latte
    } else {
        ThemeVariant::Mocha
    };
    let config = WizardConfig {
        heading: "Checkout".to_string(),
        navigation_description: "Step {activeStep} of {totalSteps}".to_string(),
        strict: !cli.free_nav,
        theme: Theme::new(variant),
        ..WizardConfig::default()
    };
    let mut runtime = WizardRuntime::new(
        config,
        demo_steps(),
        Box::new(MemoryHistory::new("/account")),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_wizard(&mut terminal, &mut runtime).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_wizard<B: Backend>(
    terminal: &mut Terminal<B>,
    runtime: &mut WizardRuntime,
) -> Result<()> {
    loop {
        let frame_start = std::time::Instant::now();

        // Process all pending events first for minimal input latency
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !runtime.handle_key(key)? {
                    return Ok(());
                }
            }
        }

        // Poll the outstanding validation gate; a failing validator is
        // surfaced here and the navigation simply does not happen.
        if let Err(err) = runtime.poll_validation() {
            error!("step validator failed: {:#}", err);
        }

        terminal.draw(|frame| {
            runtime.render(frame);
        })?;

        if runtime.is_done() {
            return Ok(());
        }

        // Sleep for remainder of 16ms frame (60 FPS)
        let elapsed = frame_start.elapsed();
        if let Some(remaining) = Duration::from_millis(16).checked_sub(elapsed) {
            tokio::time::sleep(remaining).await;
        }
    }
}
