use std::io::Stdout;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::command::GridCommand;
use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::platform::Desktop;

use super::core::App;
use super::event_bus::EventBusRuntime;
use super::input_ops::LoopControl;
use super::report::{ReportFormat, Reporter};
use super::terminal_session::TerminalSession;

struct LoopRuntime {
    session: TerminalSession,
    reporter: Reporter<Stdout>,
    motion_tick: Interval,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Resolved(GridCommand),
    MotionTick,
    Closed,
}

impl<D: Desktop> App<D> {
    /// Runs until Ctrl+C or until terminal input ends. Ctrl+G toggles the
    /// navigation session.
    pub async fn run(&mut self, format: ReportFormat) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime(format)?;

        let result = self.drive(&mut runtime).await;

        runtime.loop_event_runtime.shutdown();
        self.deactivate();
        let flushed = runtime.reporter.emit_all(&self.take_events());
        runtime.session.restore()?;
        result.and(flushed)
    }

    fn initialize_loop_runtime(&mut self, format: ReportFormat) -> AppResult<LoopRuntime> {
        let session = TerminalSession::enter()?;
        let mut reporter = Reporter::stdout(format);
        reporter.note("keygrid: Ctrl+G toggles navigation, Ctrl+C quits")?;
        if !session.supports_key_release() {
            reporter.note("keygrid: key releases are not reported; Shift+S or a grid tap stops motion")?;
        }

        let tick_interval = self.config.tick_interval();
        let mut motion_tick = time::interval_at(Instant::now() + tick_interval, tick_interval);
        motion_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let (loop_event_rx, loop_event_runtime) = EventBusRuntime::spawn();
        info!(
            window_ms = self.config.sequence.window_ms,
            tick_ms = self.config.motion.tick_ms,
            preset = self.hook.preset().as_str(),
            "event loop started"
        );

        Ok(LoopRuntime {
            session,
            reporter,
            motion_tick,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    async fn drive(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        loop {
            let was_moving = self.navigator.is_moving();
            let waited = wait_next_event(
                &mut runtime.loop_event_rx,
                &mut self.resolved_rx,
                &mut runtime.motion_tick,
                was_moving,
            )
            .await;

            let control = match waited {
                WaitEvent::Event(DomainEvent::Input(event)) => self.handle_terminal_event(event),
                WaitEvent::Event(DomainEvent::InputError(message)) => {
                    warn!(%message, "terminal input error");
                    LoopControl::Continue
                }
                WaitEvent::Resolved(command) => {
                    self.execute(command);
                    LoopControl::Continue
                }
                WaitEvent::MotionTick => {
                    self.motion_tick();
                    LoopControl::Continue
                }
                WaitEvent::Closed => LoopControl::Quit,
            };

            if !was_moving && self.navigator.is_moving() {
                runtime.motion_tick.reset();
            }
            runtime.reporter.emit_all(&self.take_events())?;

            if control == LoopControl::Quit {
                return Ok(());
            }
        }
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    resolved_rx: &mut UnboundedReceiver<GridCommand>,
    motion_tick: &mut Interval,
    moving: bool,
) -> WaitEvent {
    tokio::select! {
        event = loop_event_rx.recv() => event.map_or(WaitEvent::Closed, WaitEvent::Event),
        command = resolved_rx.recv() => command.map_or(WaitEvent::Closed, WaitEvent::Resolved),
        _ = motion_tick.tick(), if moving => WaitEvent::MotionTick,
    }
}
