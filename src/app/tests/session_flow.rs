use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::super::{App, LoopControl, SessionMode};
use crate::command::{ActionId, CommandOutcome, GridCell, GridCommand, PointerButton};
use crate::config::Config;
use crate::error::AppError;
use crate::event::AppEvent;
use crate::geometry::{Point, Region};
use crate::input::{HookDecision, KeyIntent, RawKeyEvent, VirtualKey};
use crate::nav::NavEvent;
use crate::platform::SimulatedDesktop;
use crate::sequence::GridSymbol;

const MONITOR: Region = Region::new(0, 0, 1920, 1080);

fn test_app() -> App {
    let mut config = Config::default();
    config.sequence.window_ms = 40;
    config.desktop.monitors = vec![MONITOR];
    App::new_with_config(config).expect("app should build")
}

fn key(ch: char) -> VirtualKey {
    VirtualKey::letter(ch).expect("letter key")
}

fn tap(app: &mut App, ch: char) -> HookDecision {
    app.handle_key(RawKeyEvent::down(key(ch), KeyModifiers::NONE))
}

fn wait_for_bounds(app: &mut App, expected: Region) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        app.apply_resolved();
        if app.navigator().current_bounds() == Some(expected) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!(
        "bounds never reached {expected:?}, last {:?}",
        app.navigator().current_bounds()
    );
}

#[test]
fn keys_pass_through_while_inactive() {
    let mut app = test_app();

    assert_eq!(tap(&mut app, 'q'), HookDecision::PassThrough);
    assert!(!app.has_pending_sequence());
    assert!(app.take_events().is_empty());
    assert_eq!(app.state.mode, SessionMode::Inactive);
}

#[test]
fn activation_reports_session_then_monitor_bounds() {
    let mut app = test_app();
    app.activate();

    let events = app.take_events();
    assert_eq!(events[0], AppEvent::SessionChanged { active: true });
    assert!(events.contains(&AppEvent::Nav(NavEvent::BoundsChanged { bounds: MONITOR })));
    assert_eq!(app.state.mode, SessionMode::Active);
    assert_eq!(app.state.status.last_action_id, Some(ActionId::Activate));
    assert_eq!(app.navigator().desktop().pointer(), Point::new(960, 540));
}

#[test]
fn single_tap_drills_once_window_expires() {
    let mut app = test_app();
    app.activate();

    let decision = tap(&mut app, 'q');
    let top_left = GridCell::new(0, 0).expect("cell in range");
    assert_eq!(
        decision,
        HookDecision::Swallow(KeyIntent::Symbol(GridSymbol::Cell(top_left)))
    );
    assert_eq!(app.navigator().current_bounds(), Some(MONITOR));

    wait_for_bounds(&mut app, Region::new(0, 0, 640, 360));
    assert_eq!(app.state.symbols_registered, 1);
    assert_eq!(app.state.status.message, "drill applied");
}

#[test]
fn third_tap_resets_without_waiting() {
    let mut app = test_app();
    app.activate();
    app.execute(GridCommand::Drill(GridCell::CENTER));

    for _ in 0..3 {
        tap(&mut app, 'd');
    }

    assert_eq!(app.apply_resolved(), 1);
    assert_eq!(
        app.navigator().current_bounds(),
        Some(Region::new(960, 0, 1920, 1080))
    );
    assert_eq!(app.navigator().history_len(), 0);
}

#[test]
fn escape_deactivates_and_discards_pending_taps() {
    let mut app = test_app();
    app.activate();
    tap(&mut app, 'q');
    app.take_events();

    let decision = app.handle_key(RawKeyEvent::down(VirtualKey::ESCAPE, KeyModifiers::NONE));
    assert_eq!(decision, HookDecision::Swallow(KeyIntent::Deactivate));
    assert!(!app.navigator().is_active());
    assert!(!app.has_pending_sequence());

    thread::sleep(Duration::from_millis(120));
    assert_eq!(app.apply_resolved(), 0);

    let events = app.take_events();
    assert!(events.contains(&AppEvent::Nav(NavEvent::BoundsChanged {
        bounds: Region::EMPTY
    })));
    assert_eq!(events.last(), Some(&AppEvent::SessionChanged { active: false }));
}

#[test]
fn shift_direction_moves_until_shift_is_released() {
    let mut app = test_app();
    app.activate();
    app.execute(GridCommand::Drill(GridCell::CENTER));
    app.take_events();

    let shift_down = app.handle_key(RawKeyEvent::down(VirtualKey::LEFT_SHIFT, KeyModifiers::SHIFT));
    assert_eq!(shift_down, HookDecision::PassThrough);

    let decision = app.handle_key(RawKeyEvent::down(key('d'), KeyModifiers::SHIFT));
    assert_eq!(
        decision,
        HookDecision::Swallow(KeyIntent::Command(GridCommand::ManualMove { dx: 1, dy: 0 }))
    );
    assert!(app.navigator().is_moving());

    assert_eq!(app.motion_tick(), CommandOutcome::Applied);
    assert_eq!(app.motion_tick(), CommandOutcome::Applied);
    assert_eq!(
        app.navigator().current_bounds(),
        Some(Region::new(656, 360, 1296, 720))
    );

    let release = app.handle_key(RawKeyEvent::up(VirtualKey::LEFT_SHIFT, KeyModifiers::NONE));
    assert_eq!(
        release,
        HookDecision::Observe(KeyIntent::Command(GridCommand::StopManualMove))
    );
    assert!(!app.navigator().is_moving());
    assert_eq!(app.motion_tick(), CommandOutcome::Noop);

    let events = app.take_events();
    assert!(events.contains(&AppEvent::Nav(NavEvent::MotionStarted)));
    assert!(events.contains(&AppEvent::Nav(NavEvent::MotionStopped)));
}

#[test]
fn click_keys_click_at_the_pointer() {
    let mut app = test_app();
    app.activate();

    tap(&mut app, 'y');
    tap(&mut app, 'n');

    assert_eq!(
        app.navigator().desktop().clicks(),
        &[
            (PointerButton::Left, Point::new(960, 540)),
            (PointerButton::Right, Point::new(960, 540))
        ]
    );
}

#[test]
fn terminal_hotkeys_toggle_and_quit() {
    let mut app = test_app();
    let ctrl_g = Event::Key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

    assert_eq!(app.handle_terminal_event(ctrl_g.clone()), LoopControl::Continue);
    assert!(app.navigator().is_active());
    assert_eq!(app.handle_terminal_event(ctrl_g), LoopControl::Continue);
    assert!(!app.navigator().is_active());
    assert_eq!(app.handle_terminal_event(ctrl_c), LoopControl::Quit);
}

#[test]
fn reactivation_starts_a_fresh_session() {
    let mut app = test_app();
    app.activate();
    app.execute(GridCommand::Drill(GridCell::CENTER));
    assert_eq!(app.navigator().history_len(), 1);

    app.deactivate();
    app.activate();
    assert_eq!(app.navigator().current_bounds(), Some(MONITOR));
    assert_eq!(app.navigator().history_len(), 0);
}

#[test]
fn zero_window_config_is_rejected() {
    let mut config = Config::default();
    config.sequence.window_ms = 0;

    let result = App::with_desktop(config, SimulatedDesktop::new(vec![MONITOR]));
    assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
}

#[test]
fn direct_command_runs_after_pending_tap() {
    let mut app = test_app();
    app.activate();

    tap(&mut app, 'q');
    tap(&mut app, 'y');

    assert_eq!(
        app.navigator().current_bounds(),
        Some(Region::new(0, 0, 640, 360))
    );
    assert_eq!(
        app.navigator().desktop().clicks(),
        &[(PointerButton::Left, Point::new(320, 180))]
    );

    thread::sleep(Duration::from_millis(120));
    assert_eq!(app.apply_resolved(), 0);
    assert_eq!(app.navigator().history_len(), 1);
}

#[test]
fn shift_move_after_pending_tap_keeps_moving() {
    let mut app = test_app();
    app.activate();

    tap(&mut app, 's');
    app.handle_key(RawKeyEvent::down(VirtualKey::LEFT_SHIFT, KeyModifiers::SHIFT));
    app.handle_key(RawKeyEvent::down(key('d'), KeyModifiers::SHIFT));

    assert_eq!(
        app.navigator().current_bounds(),
        Some(Region::new(640, 360, 1280, 720))
    );
    assert!(app.navigator().is_moving());

    thread::sleep(Duration::from_millis(120));
    assert_eq!(app.apply_resolved(), 0);
    assert!(app.navigator().is_moving());
}

#[test]
fn held_grid_key_repeats_do_not_count_as_taps() {
    let mut app = test_app();
    app.activate();

    let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    let repeat = KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Repeat);
    app.handle_terminal_event(Event::Key(press));
    for _ in 0..4 {
        app.handle_terminal_event(Event::Key(repeat));
    }

    assert_eq!(app.state.symbols_registered, 1);
    wait_for_bounds(&mut app, Region::new(0, 0, 640, 360));
}
