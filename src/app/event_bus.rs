use crossterm::event::EventStream;
use futures_util::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;

use crate::event::DomainEvent;

/// Terminal input pump. Raw key transitions from the terminal stand in for
/// the OS keyboard hook.
pub(crate) struct EventBusRuntime {
    tasks: Vec<JoinHandle<()>>,
}

impl EventBusRuntime {
    pub(crate) fn spawn() -> (UnboundedReceiver<DomainEvent>, Self) {
        let (tx, rx) = unbounded_channel();
        let tasks = vec![tokio::spawn(async move {
            let mut input_stream = EventStream::new();
            while let Some(event) = input_stream.next().await {
                let loop_event = match event {
                    Ok(event) => DomainEvent::Input(event),
                    Err(err) => DomainEvent::InputError(err.to_string()),
                };
                if tx.send(loop_event).is_err() {
                    return;
                }
            }
        })];
        (rx, Self { tasks })
    }

    pub(crate) fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for EventBusRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
