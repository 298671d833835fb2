//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::thread;
use std::time::{Duration, Instant};

use cqrs_base::{Event, EventSubscriber, SubscriberError};

static TRACING: Once = Once::new();

/// Initialize tracing output for tests (honors `RUST_LOG`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Numbered test event.
#[derive(Debug)]
pub struct Numbered(pub u32);

impl Event for Numbered {}

/// Subscriber that records the sequence numbers of every `Numbered` event
/// it receives.
#[derive(Default)]
pub struct RecordingSubscriber {
    seen: Mutex<Vec<u32>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<u32> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl EventSubscriber for RecordingSubscriber {
    fn on_event(&self, event: &dyn Event) -> Result<(), SubscriberError> {
        let numbered = event
            .downcast_ref::<Numbered>()
            .ok_or("expected a Numbered event")?;
        self.seen.lock().unwrap().push(numbered.0);
        Ok(())
    }
}

/// Subscriber whose callback always fails.
#[derive(Default)]
pub struct FailingSubscriber {
    pub calls: AtomicUsize,
}

impl EventSubscriber for FailingSubscriber {
    fn on_event(&self, _event: &dyn Event) -> Result<(), SubscriberError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err("subscriber is broken".into())
    }
}

/// Poll `predicate` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, predicate: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    predicate()
}
