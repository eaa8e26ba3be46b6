/// One-shot completion protocol between a mini-game and its host.
///
/// Each puzzle is constructed with a `CompletionSignal`; the host keeps
/// the matching `CompletionWatcher` and polls it once per frame. Firing
/// consumes the underlying sender, so a second fire is impossible by
/// construction rather than by discipline. Dropping an unfired signal
/// (level torn down mid-game) simply leaves the watcher unsignaled.

use std::sync::mpsc::{channel as mpsc_channel, Receiver, Sender};

/// Create a linked signal/watcher pair for one mini-game lifetime.
pub fn channel() -> (CompletionSignal, CompletionWatcher) {
    let (tx, rx) = mpsc_channel();
    (
        CompletionSignal { tx: Some(tx) },
        CompletionWatcher { rx, seen: false },
    )
}

/// The puzzle-held half. `fire` signals the host exactly once.
pub struct CompletionSignal {
    tx: Option<Sender<()>>,
}

impl CompletionSignal {
    /// Signal completion. The sender is taken out on the first call;
    /// every later call is a no-op.
    pub fn fire(&mut self) {
        if let Some(tx) = self.tx.take() {
            // A dropped watcher just means nobody is listening anymore.
            let _ = tx.send(());
        }
    }

    #[allow(dead_code)]
    pub fn fired(&self) -> bool {
        self.tx.is_none()
    }
}

/// The host-held half. `poll` latches: once true, always true.
pub struct CompletionWatcher {
    rx: Receiver<()>,
    seen: bool,
}

impl CompletionWatcher {
    pub fn poll(&mut self) -> bool {
        if !self.seen && self.rx.try_recv().is_ok() {
            self.seen = true;
        }
        self.seen
    }
}
