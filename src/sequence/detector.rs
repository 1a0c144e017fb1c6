use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::error::{AppError, AppResult};

use super::resolver::SequenceResolver;

type EmitFn<C> = Box<dyn Fn(C) + Send + Sync>;

struct PendingSequence<S> {
    symbol: S,
    taps: u32,
}

struct DetectorState<S> {
    pending: Option<PendingSequence<S>>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

impl<S> DetectorState<S> {
    /// Invalidates any armed timer. A timer task that already woke up and is
    /// waiting on the lock sees a stale generation and does nothing.
    fn disarm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Shared<S, R: SequenceResolver<S>> {
    state: Mutex<DetectorState<S>>,
    resolver: R,
    emit: EmitFn<R::Output>,
}

impl<S, R: SequenceResolver<S>> Shared<S, R> {
    fn lock(&self) -> MutexGuard<'_, DetectorState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Called with the state lock held so emissions keep registration order.
    fn flush(&self, sequence: PendingSequence<S>) {
        match self.resolver.resolve(&sequence.symbol, sequence.taps) {
            Some(output) => (self.emit)(output),
            None => trace!(taps = sequence.taps, "sequence resolved to no output"),
        }
    }

    fn expire(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation {
            return;
        }
        state.timer = None;
        if let Some(sequence) = state.pending.take() {
            trace!(taps = sequence.taps, "disambiguation window elapsed");
            self.flush(sequence);
        }
    }
}

struct TimerRuntime {
    _owned: Option<Runtime>,
    handle: Handle,
}

impl TimerRuntime {
    fn new() -> AppResult<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                _owned: None,
                handle,
            });
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("keygrid-sequence")
            .build()
            .map_err(|source| {
                AppError::io_with_context(source, "failed to start sequence timer runtime")
            })?;
        let handle = runtime.handle().clone();
        Ok(Self {
            _owned: Some(runtime),
            handle,
        })
    }
}

/// Counts consecutive repeats of one input symbol and emits the resolved
/// output once, either immediately (when the resolver asks for it) or after
/// the disambiguation window passes without another matching input.
///
/// `register_input` and the window timer run on different threads; all state
/// changes happen under one mutex, and the emit callback is invoked while it
/// is held. The callback must therefore not call back into the detector.
///
/// When no tokio runtime is current at construction, the detector owns a
/// small one; such a detector must then be dropped outside async context.
pub struct SequenceDetector<S, R: SequenceResolver<S>> {
    shared: Arc<Shared<S, R>>,
    window: Duration,
    runtime: TimerRuntime,
}

impl<S, R> SequenceDetector<S, R>
where
    S: PartialEq + Send + 'static,
    R: SequenceResolver<S>,
{
    pub fn new<F>(window: Duration, resolver: R, emit: F) -> AppResult<Self>
    where
        F: Fn(R::Output) + Send + Sync + 'static,
    {
        if window.is_zero() {
            return Err(AppError::invalid_configuration(
                "disambiguation window must be greater than zero",
            ));
        }

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(DetectorState {
                    pending: None,
                    timer: None,
                    generation: 0,
                }),
                resolver,
                emit: Box::new(emit),
            }),
            window,
            runtime: TimerRuntime::new()?,
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn register_input(&self, symbol: S) {
        let mut state = self.shared.lock();
        let sequence = match state.pending.take() {
            Some(mut pending) if pending.symbol == symbol => {
                pending.taps = pending.taps.saturating_add(1);
                pending
            }
            previous => {
                if let Some(previous) = previous {
                    self.shared.flush(previous);
                }
                PendingSequence { symbol, taps: 1 }
            }
        };

        if self
            .shared
            .resolver
            .should_flush_immediately(&sequence.symbol, sequence.taps)
        {
            state.disarm();
            self.shared.flush(sequence);
            return;
        }

        state.pending = Some(sequence);
        self.arm(&mut state);
    }

    fn arm(&self, state: &mut DetectorState<S>) {
        state.disarm();
        let generation = state.generation;
        let shared = Arc::clone(&self.shared);
        let window = self.window;
        state.timer = Some(self.runtime.handle.spawn(async move {
            tokio::time::sleep(window).await;
            shared.expire(generation);
        }));
    }
}

impl<S: Clone, R: SequenceResolver<S>> SequenceDetector<S, R> {
    /// Snapshot of the pending `(symbol, taps)`, if a sequence is open.
    pub fn pending(&self) -> Option<(S, u32)> {
        let state = self.shared.lock();
        state
            .pending
            .as_ref()
            .map(|pending| (pending.symbol.clone(), pending.taps))
    }
}

impl<S, R: SequenceResolver<S>> SequenceDetector<S, R> {
    /// Drops the pending sequence and its timer without emitting anything.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        state.disarm();
        state.pending = None;
    }

    /// Resolves and emits the pending sequence now, as if its window had
    /// elapsed. Returns whether a sequence was pending.
    pub fn flush_pending(&self) -> bool {
        let mut state = self.shared.lock();
        state.disarm();
        let Some(sequence) = state.pending.take() else {
            return false;
        };
        trace!(taps = sequence.taps, "sequence flushed early");
        self.shared.flush(sequence);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.shared.lock().timer.is_some()
    }
}

impl<S, R: SequenceResolver<S>> Drop for SequenceDetector<S, R> {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::command::{GridCell, GridCommand};
    use crate::error::AppError;
    use crate::sequence::{GridSequenceResolver, GridSymbol, SequenceResolver};

    use super::SequenceDetector;

    /// Emits the raw `(symbol, taps)` pair and never flushes early; symbol 0
    /// resolves to nothing.
    struct EchoResolver;

    impl SequenceResolver<u8> for EchoResolver {
        type Output = (u8, u32);

        fn resolve(&self, symbol: &u8, taps: u32) -> Option<(u8, u32)> {
            (*symbol != 0).then_some((*symbol, taps))
        }

        fn should_flush_immediately(&self, _symbol: &u8, _taps: u32) -> bool {
            false
        }
    }

    type Recorded<T> = Arc<Mutex<Vec<T>>>;

    fn recorder<T: Send + 'static>() -> (Recorded<T>, impl Fn(T) + Send + Sync + 'static) {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&recorded);
        (recorded, move |value| {
            sink.lock().expect("recorder lock").push(value)
        })
    }

    fn snapshot<T: Clone>(recorded: &Recorded<T>) -> Vec<T> {
        recorded.lock().expect("recorder lock").clone()
    }

    fn wait_for_len<T>(recorded: &Recorded<T>, len: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while recorded.lock().expect("recorder lock").len() < len && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn cell(col: u8, row: u8) -> GridSymbol {
        GridSymbol::Cell(GridCell::new(col, row).expect("cell in range"))
    }

    #[test]
    fn zero_window_is_rejected() {
        let result = SequenceDetector::new(Duration::ZERO, EchoResolver, |_| {});
        assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
    }

    #[test]
    fn repeated_symbol_emits_once_with_tap_count_after_window() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_millis(40), EchoResolver, sink).expect("detector");

        detector.register_input(4);
        detector.register_input(4);
        assert_eq!(detector.pending(), Some((4, 2)));
        assert!(detector.is_armed());
        assert!(snapshot(&recorded).is_empty());

        wait_for_len(&recorded, 1);
        thread::sleep(Duration::from_millis(80));
        assert_eq!(snapshot(&recorded), vec![(4, 2)]);
        assert_eq!(detector.pending(), None);
        assert!(!detector.is_armed());
    }

    #[test]
    fn third_grid_tap_resets_without_waiting() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_secs(5), GridSequenceResolver, sink)
                .expect("detector");

        detector.register_input(cell(0, 2));
        detector.register_input(cell(0, 2));
        assert!(snapshot(&recorded).is_empty());
        detector.register_input(cell(0, 2));

        let cell = GridCell::new(0, 2).expect("cell in range");
        assert_eq!(snapshot(&recorded), vec![GridCommand::Reset(cell)]);
        assert_eq!(detector.pending(), None);
        assert!(!detector.is_armed());
    }

    #[test]
    fn switching_symbols_flushes_previous_sequence_first() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_millis(40), EchoResolver, sink).expect("detector");

        detector.register_input(1);
        detector.register_input(2);
        assert_eq!(snapshot(&recorded), vec![(1, 1)]);
        assert_eq!(detector.pending(), Some((2, 1)));

        wait_for_len(&recorded, 2);
        assert_eq!(snapshot(&recorded), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn back_flushes_pending_drill_then_itself() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_secs(5), GridSequenceResolver, sink)
                .expect("detector");

        detector.register_input(cell(1, 0));
        detector.register_input(GridSymbol::Back);

        let cell = GridCell::new(1, 0).expect("cell in range");
        assert_eq!(
            snapshot(&recorded),
            vec![GridCommand::Drill(cell), GridCommand::Back]
        );
        assert!(!detector.is_armed());
    }

    #[test]
    fn reset_discards_pending_sequence_silently() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_millis(30), EchoResolver, sink).expect("detector");

        detector.register_input(3);
        detector.register_input(3);
        detector.reset();
        assert_eq!(detector.pending(), None);
        thread::sleep(Duration::from_millis(90));
        assert!(snapshot(&recorded).is_empty());

        detector.register_input(3);
        assert_eq!(detector.pending(), Some((3, 1)));
        wait_for_len(&recorded, 1);
        assert_eq!(snapshot(&recorded), vec![(3, 1)]);
    }

    #[test]
    fn flush_pending_emits_now_and_disarms_timer() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_millis(30), EchoResolver, sink).expect("detector");

        assert!(!detector.flush_pending());
        detector.register_input(4);
        detector.register_input(4);
        assert!(detector.flush_pending());
        assert_eq!(snapshot(&recorded), vec![(4, 2)]);
        assert!(!detector.is_armed());
        assert_eq!(detector.pending(), None);

        thread::sleep(Duration::from_millis(90));
        assert_eq!(snapshot(&recorded), vec![(4, 2)]);
    }

    #[test]
    fn unresolved_sequence_is_cleared_without_emitting() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_millis(20), EchoResolver, sink).expect("detector");

        detector.register_input(0);
        detector.register_input(5);
        assert!(snapshot(&recorded).is_empty());
        assert_eq!(detector.pending(), Some((5, 1)));
    }

    #[test]
    fn racing_timer_never_loses_or_duplicates_taps() {
        let (recorded, sink) = recorder::<(u8, u32)>();
        let detector =
            SequenceDetector::new(Duration::from_millis(2), EchoResolver, sink).expect("detector");

        let mut registered = 0u32;
        for i in 0..200u32 {
            let symbol = if i % 7 < 4 { 1 } else { 2 };
            detector.register_input(symbol);
            registered += 1;
            if i % 3 == 0 {
                thread::sleep(Duration::from_millis(2));
            }
        }

        let deadline = Instant::now() + Duration::from_secs(2);
        while detector.pending().is_some() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        let emitted: u32 = snapshot(&recorded).iter().map(|(_, taps)| taps).sum();
        assert_eq!(emitted, registered);
    }

    #[test]
    fn dropping_detector_cancels_pending_timer() {
        let (recorded, sink) = recorder();
        let detector =
            SequenceDetector::new(Duration::from_millis(20), EchoResolver, sink).expect("detector");
        detector.register_input(9);
        drop(detector);

        thread::sleep(Duration::from_millis(60));
        assert!(snapshot(&recorded).is_empty());
    }
}
