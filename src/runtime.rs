use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// Input the event loop reacts to
#[derive(Clone, Debug)]
pub enum RushEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

/// An event plus the moment the loop received it.
///
/// Reaction times are measured against `at`, so it must be read after the
/// blocking wait, never before.
#[derive(Clone, Debug)]
pub struct Stamped {
    pub event: RushEvent,
    pub at: Instant,
}

/// Channel-backed event source, fed by the terminal reader thread or by tests
pub struct EventChannel {
    rx: Receiver<RushEvent>,
}

impl EventChannel {
    pub fn new(rx: Receiver<RushEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a thread forwarding crossterm keys, mouse and resize events
    pub fn crossterm() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let event = match event::read() {
                Ok(CtEvent::Key(key)) => RushEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => RushEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => RushEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event stream failed: {e}");
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self::new(rx)
    }

    fn recv_timeout(&self, timeout: Duration) -> Option<RushEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Waits for the next input, producing a tick whenever `tick` passes quietly
pub struct Runner {
    events: EventChannel,
    tick: Duration,
}

impl Runner {
    pub fn new(events: EventChannel, tick: Duration) -> Self {
        Self { events, tick }
    }

    pub fn step(&self) -> Stamped {
        let event = self.events.recv_timeout(self.tick).unwrap_or(RushEvent::Tick);
        Stamped {
            event,
            at: Instant::now(),
        }
    }
}
