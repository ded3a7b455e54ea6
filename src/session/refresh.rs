//! Coalescing "history changed" signal.
//!
//! The counter only ever grows. Observers remember the last value they
//! acted on and re-fetch when the current value differs; how many bumps
//! happened in between is deliberately not reported.

use tokio::sync::watch;

pub struct HistoryRefreshSignal {
    tx: watch::Sender<u64>,
}

impl Default for HistoryRefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRefreshSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Increment by exactly one and return the new value.
    pub(crate) fn bump(&mut self) -> u64 {
        self.tx.send_modify(|value| *value += 1);
        self.value()
    }

    pub fn value(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Read-only handle that starts out having seen the current value.
    pub fn observer(&self) -> RefreshObserver {
        let rx = self.tx.subscribe();
        let last_seen = *rx.borrow();
        RefreshObserver { rx, last_seen }
    }
}

pub struct RefreshObserver {
    rx: watch::Receiver<u64>,
    last_seen: u64,
}

impl RefreshObserver {
    /// At least one bump happened since the last [`mark_seen`](Self::mark_seen).
    pub fn has_changed(&self) -> bool {
        *self.rx.borrow() != self.last_seen
    }

    /// Record the current value as handled and return it.
    pub fn mark_seen(&mut self) -> u64 {
        self.last_seen = *self.rx.borrow_and_update();
        self.last_seen
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    /// Wait until the signal differs from the last seen value.
    ///
    /// Returns `false` if the signal was dropped first.
    pub async fn changed(&mut self) -> bool {
        loop {
            if self.has_changed() {
                return true;
            }
            if self.rx.changed().await.is_err() {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn bump_increments_by_one() {
        let mut signal = HistoryRefreshSignal::new();
        assert_eq!(signal.value(), 0);
        assert_eq!(signal.bump(), 1);
        assert_eq!(signal.bump(), 2);
        assert_eq!(signal.value(), 2);
    }

    #[test]
    fn observer_coalesces_multiple_bumps() {
        let mut signal = HistoryRefreshSignal::new();
        let mut observer = signal.observer();
        assert!(!observer.has_changed());

        signal.bump();
        signal.bump();
        signal.bump();
        assert!(observer.has_changed());
        assert_eq!(observer.mark_seen(), 3);
        assert!(!observer.has_changed());
    }

    #[test]
    fn late_observer_starts_in_sync() {
        let mut signal = HistoryRefreshSignal::new();
        signal.bump();
        let observer = signal.observer();
        assert_eq!(observer.last_seen(), 1);
        assert!(!observer.has_changed());
    }

    #[tokio::test]
    async fn changed_wakes_on_bump() {
        let mut signal = HistoryRefreshSignal::new();
        let mut observer = signal.observer();

        let waiter = tokio::spawn(async move {
            let changed = observer.changed().await;
            (changed, observer.mark_seen())
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.bump();

        let (changed, seen) = waiter.await.unwrap();
        assert!(changed);
        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn changed_returns_false_when_signal_dropped() {
        let signal = HistoryRefreshSignal::new();
        let mut observer = signal.observer();
        drop(signal);
        assert!(!observer.changed().await);
    }
}
