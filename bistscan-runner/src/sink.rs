//! Destinations for emitted signals and operator notices.

use std::sync::{Arc, Mutex, PoisonError};

use bistscan_core::scoring::EmittedSignal;

/// Notification seam. Implementations must not block the scan for long.
pub trait SignalSink: Send + Sync {
    fn publish(&self, signal: &EmittedSignal);

    /// Free-form operator notice (startup, daily reset).
    fn notice(&self, text: &str);
}

/// Writes everything to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SignalSink for LogSink {
    fn publish(&self, signal: &EmittedSignal) {
        tracing::info!(key = %signal.key, "\n{}", signal.message);
    }

    fn notice(&self, text: &str) {
        tracing::info!(notice = text);
    }
}

/// Keeps everything in memory. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    signals: Arc<Mutex<Vec<EmittedSignal>>>,
    notices: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<EmittedSignal> {
        self.signals.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|s| s.key.clone())
            .collect()
    }
}

impl SignalSink for CollectingSink {
    fn publish(&self, signal: &EmittedSignal) {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal.clone());
    }

    fn notice(&self, text: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

impl<S: SignalSink + ?Sized> SignalSink for Arc<S> {
    fn publish(&self, signal: &EmittedSignal) {
        (**self).publish(signal);
    }

    fn notice(&self, text: &str) {
        (**self).notice(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_clones_share_storage() {
        let sink = CollectingSink::new();
        let other = sink.clone();
        other.notice("started");
        assert_eq!(sink.notices(), ["started"]);
        assert!(sink.signals().is_empty());
    }
}
