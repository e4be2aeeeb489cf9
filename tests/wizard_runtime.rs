use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Poll;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use wizard_tui::wizard::StepComponent;
use wizard_tui::{Control, MemoryHistory, StepConfig, WizardConfig, WizardRuntime};

fn blank() -> StepComponent {
    Arc::new(|_, _, _| {})
}

fn runtime_with(steps: Vec<StepConfig>, initial: &str) -> WizardRuntime {
    WizardRuntime::new(
        WizardConfig::default(),
        steps,
        Box::new(MemoryHistory::new(initial)),
    )
}

fn three_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::new("/first", "First", blank()),
        StepConfig::new("/second", "Second", blank()),
        StepConfig::new("/third", "Third", blank()),
    ]
}

fn press(runtime: &mut WizardRuntime, code: KeyCode) {
    runtime
        .handle_key(KeyEvent::from(code))
        .expect("key handling failed");
}

fn settle(runtime: &mut WizardRuntime) {
    // the default gates resolve on the first poll
    runtime.poll_validation().expect("validation failed");
}

#[test]
fn test_control_bar_walks_forward_and_back() {
    let mut runtime = runtime_with(three_steps(), "/first");
    let nav = runtime.navigation();

    // Tab focuses the control bar on the Next control
    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert_eq!(nav.active_step(), 1);
    assert_eq!(nav.current_path(), "/second");

    // Left moves the cursor onto Back
    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Left);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert_eq!(nav.active_step(), 0);
    assert_eq!(nav.current_path(), "/first");
}

#[test]
fn test_rail_jump_is_gated_by_the_current_step() {
    let blocked = vec![
        StepConfig::new("/first", "First", blank()).controls(vec![
            Control::prev("Back"),
            Control::next("Next").on_click_sync(|| Ok(Some(false))),
        ]),
        StepConfig::new("/second", "Second", blank()),
    ];
    let mut runtime = runtime_with(blocked, "/first");
    let nav = runtime.navigation();

    press(&mut runtime, KeyCode::Down);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert_eq!(nav.active_step(), 0);
    assert_eq!(nav.current_path(), "/first");

    let allowed = vec![
        StepConfig::new("/first", "First", blank()).controls(vec![
            Control::prev("Back"),
            Control::next("Next").on_click_sync(|| Ok(Some(true))),
        ]),
        StepConfig::new("/second", "Second", blank()),
    ];
    let mut runtime = runtime_with(allowed, "/first");
    let nav = runtime.navigation();

    press(&mut runtime, KeyCode::Down);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert_eq!(nav.active_step(), 1);
    assert_eq!(nav.current_path(), "/second");
}

#[test]
fn test_activations_are_ignored_while_a_gate_is_pending() {
    let gate = Arc::new(AtomicBool::new(false));
    let probe = gate.clone();
    let steps = vec![
        StepConfig::new("/first", "First", blank()).controls(vec![
            Control::prev("Back"),
            Control::next("Next").on_click(move || {
                let gate = probe.clone();
                futures::future::poll_fn(move |_| {
                    if gate.load(Ordering::SeqCst) {
                        Poll::Ready(Ok(Some(true)))
                    } else {
                        Poll::Pending
                    }
                })
            }),
        ]),
        StepConfig::new("/second", "Second", blank()),
    ];
    let mut runtime = runtime_with(steps, "/first");
    let nav = runtime.navigation();

    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert!(runtime.is_validating());
    assert_eq!(nav.active_step(), 0);

    // further activations are swallowed until the gate settles
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert!(runtime.is_validating());

    gate.store(true, Ordering::SeqCst);
    settle(&mut runtime);
    assert!(!runtime.is_validating());
    assert_eq!(nav.active_step(), 1);
    assert_eq!(nav.current_path(), "/second");
}

#[test]
fn test_cancel_control_closes_the_wizard() {
    let steps = vec![
        StepConfig::new("/first", "First", blank()).controls(vec![
            Control::cancel("Cancel"),
            Control::next("Next"),
        ]),
        StepConfig::new("/second", "Second", blank()),
    ];
    let mut runtime = runtime_with(steps, "/first");

    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Left);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert!(runtime.is_done());
}

#[test]
fn test_finish_on_the_final_step_completes_the_wizard() {
    let mut runtime = runtime_with(three_steps(), "/first");
    let nav = runtime.navigation();

    for _ in 0..2 {
        press(&mut runtime, KeyCode::Tab);
        press(&mut runtime, KeyCode::Enter);
        settle(&mut runtime);
    }
    assert_eq!(nav.active_step(), 2);

    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert!(nav.completed());

    // the finished wizard keeps the final step; earlier rail entries
    // no longer navigate
    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Up);
    press(&mut runtime, KeyCode::Up);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert_eq!(nav.active_step(), 2);
    assert_eq!(nav.current_path(), "/third");
}

#[test]
fn test_deep_link_redirects_to_the_active_step() {
    let mut runtime = runtime_with(three_steps(), "/third");
    let nav = runtime.navigation();

    // strict mode refuses the deep link and falls back to the active step
    assert_eq!(nav.active_step(), 0);
    assert_eq!(nav.current_path(), "/first");
}

#[test]
fn test_validator_error_leaves_navigation_unchanged() {
    let steps = vec![
        StepConfig::new("/first", "First", blank()).controls(vec![
            Control::prev("Back"),
            Control::next("Next").on_click_sync(|| anyhow::bail!("backend down")),
        ]),
        StepConfig::new("/second", "Second", blank()),
    ];
    let mut runtime = runtime_with(steps, "/first");
    let nav = runtime.navigation();

    press(&mut runtime, KeyCode::Tab);
    press(&mut runtime, KeyCode::Enter);
    assert!(runtime.poll_validation().is_err());
    assert!(!runtime.is_validating());
    assert_eq!(nav.active_step(), 0);
    assert_eq!(nav.current_path(), "/first");
}

#[test]
fn test_render_survives_the_step_list_shrinking_away() {
    let mut runtime = runtime_with(three_steps(), "/first");
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).expect("terminal");

    runtime.set_steps(Vec::new());
    terminal
        .draw(|frame| runtime.render(frame))
        .expect("draw with no steps");

    // a fresh step list mounts again
    runtime.set_steps(three_steps());
    let nav = runtime.navigation();
    assert_eq!(nav.active_step(), 0);
    assert_eq!(nav.current_path(), "/first");
    terminal
        .draw(|frame| runtime.render(frame))
        .expect("draw after remount");
}

#[test]
fn test_disabled_rail_entries_swallow_activation() {
    let steps = vec![
        StepConfig::new("/first", "First", blank()),
        StepConfig::new("/second", "Second", blank()).disabled(true),
        StepConfig::new("/third", "Third", blank()),
    ];
    let mut runtime = runtime_with(steps, "/first");
    let nav = runtime.navigation();

    press(&mut runtime, KeyCode::Down);
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime);
    assert_eq!(nav.active_step(), 0);
    assert_eq!(nav.current_path(), "/first");
}
