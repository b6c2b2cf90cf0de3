//! The shared message log and its change signal.
//!
//! Every delivered line lives in one append-only log. Each connection's
//! write loop holds a cursor into the log and a [`Broadcaster`] subscription;
//! an append wakes every subscriber, and each write loop drains the suffix
//! it has not yet sent. The single log plus monotonic cursors is what gives
//! every client the same delivery order.

use tokio::sync::{Mutex, watch};

/// One rendered chat line, ready for verbatim delivery.
///
/// The text already carries the sender's color code, name and reset code;
/// the log never rewrites an entry after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    rendered: String,
}

impl Message {
    /// Wrap an already-formatted line.
    pub fn new(rendered: impl Into<String>) -> Self {
        Self {
            rendered: rendered.into(),
        }
    }

    /// The formatted text as it goes out on the wire (without the trailing
    /// newline).
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

/// Append-only, totally ordered log of delivered messages.
///
/// `append` is the only mutator. The current length is published on a
/// [`watch`] channel while the entries lock is still held, so a subscriber
/// woken by an append always observes a length at least as large as the
/// post-append length, and the published value never goes backwards.
///
/// The log is unbounded: entries are kept for the process lifetime. That is
/// a deliberate limitation of this design, not an oversight.
pub struct MessageLog {
    entries: Mutex<Vec<Message>>,
    len_tx: watch::Sender<usize>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            entries: Mutex::new(Vec::new()),
            len_tx,
        }
    }

    /// Append one message and wake every subscriber.
    pub async fn append(&self, message: Message) {
        let mut entries = self.entries.lock().await;
        entries.push(message);
        // Publish under the lock so the watch value stays monotonic.
        self.len_tx.send_replace(entries.len());
    }

    /// Number of messages appended so far.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the log is still empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// All entries with index >= `from`, in append order.
    ///
    /// Never blocks on anything but the entries lock, and never returns
    /// fewer entries than exist for the range at call time.
    pub async fn read_from(&self, from: usize) -> Vec<Message> {
        let entries = self.entries.lock().await;
        entries.get(from..).map(|s| s.to_vec()).unwrap_or_default()
    }

    /// Subscribe to log growth. One subscription per write loop.
    pub fn subscribe(&self) -> Broadcaster {
        Broadcaster {
            len_rx: self.len_tx.subscribe(),
        }
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A write loop's handle on the log's change signal.
///
/// Built on [`watch`], so it is a true multi-consumer broadcast: every
/// subscriber is woken by every append, and because the channel retains the
/// latest length, a wakeup can never be lost between the check and the wait.
pub struct Broadcaster {
    len_rx: watch::Receiver<usize>,
}

impl Broadcaster {
    /// Block until the log length exceeds `cursor`.
    ///
    /// Returns the observed length, or `None` once the log side has shut
    /// down and no further growth is possible.
    pub async fn wait_past(&mut self, cursor: usize) -> Option<usize> {
        loop {
            let len = *self.len_rx.borrow_and_update();
            if len > cursor {
                return Some(len);
            }
            self.len_rx.changed().await.ok()?;
        }
    }
}
