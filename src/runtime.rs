//! Terminal input as a stream of drill events.
//!
//! Input is read on a background thread and handed over through a channel.
//! [`Runner`] interleaves those events with ticks on a fixed schedule, so a
//! pending auto-advance fires on time even while keys keep arriving.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Everything the drill loop reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Map a raw terminal event to a drill event. Key releases (reported on
/// Windows) and focus/mouse/paste events are dropped.
pub fn translate(event: CtEvent) -> Option<DrillEvent> {
    match event {
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(DrillEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(DrillEvent::Resize),
        _ => None,
    }
}

/// Anything that can hand out drill events with a timeout.
pub trait EventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Events delivered through an mpsc channel.
pub struct EventChannel {
    rx: Receiver<DrillEvent>,
}

impl EventChannel {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }

    /// Start a thread reading the terminal. It stops when the channel is
    /// dropped or the terminal can no longer be read.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            match event::read() {
                Ok(raw) => {
                    if let Some(evt) = translate(raw) {
                        if tx.send(evt).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self::new(rx)
    }
}

impl EventSource for EventChannel {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Pulls events from a source and injects a `Tick` every `tick` interval.
pub struct Runner<S: EventSource> {
    source: S,
    tick: Duration,
    next_tick: Instant,
}

impl<S: EventSource> Runner<S> {
    pub fn new(source: S, tick: Duration) -> Self {
        Self {
            source,
            tick,
            next_tick: Instant::now() + tick,
        }
    }

    /// Next event, or `Tick` once the tick deadline has passed. Blocks at
    /// most until that deadline.
    pub fn step(&mut self) -> DrillEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.tick_at(now);
        }

        match self.source.recv_timeout(self.next_tick - now) {
            Ok(evt) => evt,
            Err(RecvTimeoutError::Timeout) => self.tick_at(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                // no more input; keep ticking at the normal pace
                thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.tick_at(Instant::now())
            }
        }
    }

    fn tick_at(&mut self, now: Instant) -> DrillEvent {
        self.next_tick = now + self.tick;
        DrillEvent::Tick
    }
}
