// Progress sinks — where a preload run narrates its percentage and completion.

use parking_lot::Mutex;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadEvent {
    Progress(u8),
    Complete,
}

/// Receives progress from the sequencer.
///
/// Callbacks run while the sequencer holds its bookkeeping lock, so they
/// must return quickly and must not call back into the `Preloader`.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, percent: u8);
    fn on_complete(&self);
}

/// Forwards events into an unbounded tokio channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PreloadEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PreloadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn on_progress(&self, percent: u8) {
        // A dropped receiver means nobody is watching any more.
        let _ = self.tx.send(PreloadEvent::Progress(percent));
    }

    fn on_complete(&self) {
        let _ = self.tx.send(PreloadEvent::Complete);
    }
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PreloadEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PreloadEvent> {
        self.events.lock().clone()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PreloadEvent::Progress(p) => Some(*p),
                PreloadEvent::Complete => None,
            })
            .collect()
    }

    pub fn completions(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| **e == PreloadEvent::Complete)
            .count()
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, percent: u8) {
        self.events.lock().push(PreloadEvent::Progress(percent));
    }

    fn on_complete(&self) {
        self.events.lock().push(PreloadEvent::Complete);
    }
}
