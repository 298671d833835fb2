//! In-memory event publisher with an explicit start/stop lifecycle.
//!
//! The service owns three pieces: a [`SubscriberRegistry`], a bounded
//! [`EventQueue`], and — while running — one background delivery thread
//! that drains the queue and fans each event out to every registered
//! subscriber. Producers (usually command handlers) only ever touch the
//! queue, so publishing never waits on subscriber callbacks.

use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::{
    EventQueue, EventSubscriber, PublishError, ServiceError, SubscriberRegistry,
    DEFAULT_QUEUE_CAPACITY,
};
use crate::Event;

/// How long `stop()` waits for the delivery loop to finish.
const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// How often the delivery loop re-checks its stop signal while the queue is
/// empty.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Statistics from a delivery loop, returned by a clean `stop()`.
#[derive(Debug, Default, Clone)]
pub struct DeliveryStats {
    /// Events dequeued and fanned out to subscribers.
    pub events_delivered: usize,
    /// Individual subscriber callbacks that returned an error.
    pub subscriber_errors: usize,
    /// Empty dequeue attempts.
    pub polls: usize,
}

struct DeliveryWorker {
    stop_tx: mpsc::Sender<()>,
    done_rx: mpsc::Receiver<DeliveryStats>,
    handle: JoinHandle<()>,
}

/// Producer-facing publishing handle.
///
/// Cheap to clone and safe to hand to command handlers; all clones share
/// the service's queue and registry. Publishing only enqueues — whether
/// the events get delivered depends on the service being started.
#[derive(Clone)]
pub struct EventPublisher {
    queue: Arc<EventQueue>,
    registry: Arc<SubscriberRegistry>,
}

impl EventPublisher {
    /// Publish a single event to all registered subscribers.
    ///
    /// Blocks while the queue is full.
    pub fn publish<E: Event>(&self, event: E) -> Result<(), PublishError> {
        self.publish_shared(Arc::new(event))
    }

    /// Publish an already-shared event.
    pub fn publish_shared(&self, event: Arc<dyn Event>) -> Result<(), PublishError> {
        self.queue.enqueue(event)
    }

    /// Publish each event of a sequence, in order.
    ///
    /// Events are enqueued one at a time, not as an atomic batch — events
    /// from concurrent producers may interleave between elements.
    pub fn publish_all(&self, events: &[Arc<dyn Event>]) -> Result<(), PublishError> {
        for event in events {
            self.publish_shared(Arc::clone(event))?;
        }
        Ok(())
    }

    /// Register a subscriber for all events published from now on.
    ///
    /// Takes effect at the next dequeued event's fan-out. Registering the
    /// same subscriber twice delivers every event twice to it.
    pub fn add_subscriber(&self, subscriber: Arc<dyn EventSubscriber>) {
        self.registry.add(subscriber);
    }

    /// Remove the first registration of a subscriber.
    ///
    /// Takes effect at the next dequeued event's fan-out; a fan-out already
    /// in progress still delivers to the removed subscriber.
    pub fn remove_subscriber(&self, subscriber: &Arc<dyn EventSubscriber>) {
        self.registry.remove(subscriber);
    }
}

/// An in-memory event publisher service for standalone applications.
///
/// The service is a two-state machine, `Stopped` (initial) and `Running`.
/// [`start`](EventPublisherService::start) spawns exactly one delivery
/// thread; [`stop`](EventPublisherService::stop) cancels it cooperatively
/// and waits up to a bounded timeout for it to finish. At most one delivery
/// thread is alive per service at any time.
///
/// All methods take `&self`; the service can be shared across threads via
/// `Arc` and `is_running()` may be called concurrently with `start`/`stop`.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use cqrs_base::{Event, EventPublisherService, EventSubscriber, SubscriberError};
///
/// #[derive(Debug)]
/// struct OrderConfirmed;
/// impl Event for OrderConfirmed {}
///
/// struct Printer;
/// impl EventSubscriber for Printer {
///     fn on_event(&self, event: &dyn Event) -> Result<(), SubscriberError> {
///         println!("{event:?}");
///         Ok(())
///     }
/// }
///
/// let service = EventPublisherService::new();
/// service.add_subscriber(Arc::new(Printer));
/// service.start().unwrap();
///
/// service.publish(OrderConfirmed).unwrap();
///
/// service.stop().unwrap();
/// ```
pub struct EventPublisherService {
    publisher: EventPublisher,
    worker: Mutex<Option<DeliveryWorker>>,
    poll_interval: Duration,
    join_timeout: Duration,
}

impl Default for EventPublisherService {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisherService {
    /// Create a stopped service with the default queue capacity of 1024.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a stopped service with the given queue capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        debug!(capacity, "event publisher service created");
        Self {
            publisher: EventPublisher {
                queue: Arc::new(EventQueue::with_capacity(capacity)),
                registry: Arc::new(SubscriberRegistry::new()),
            },
            worker: Mutex::new(None),
            poll_interval: DEFAULT_POLL_INTERVAL,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
        }
    }

    /// Set how long `stop()` waits for the delivery loop to finish.
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Set how often the idle delivery loop re-checks its stop signal.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Start the delivery loop.
    ///
    /// Fails with [`ServiceError::AlreadyRunning`] when the service is
    /// already running, leaving it running.
    pub fn start(&self) -> Result<(), ServiceError> {
        let mut worker = self.lock_worker();
        if worker.is_some() {
            return Err(ServiceError::AlreadyRunning);
        }

        let queue = Arc::clone(&self.publisher.queue);
        let registry = Arc::clone(&self.publisher.registry);
        let poll_interval = self.poll_interval;
        let (stop_tx, stop_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let stats = delivery_loop(&queue, &registry, &stop_rx, poll_interval);
            let _ = done_tx.send(stats);
        });

        *worker = Some(DeliveryWorker {
            stop_tx,
            done_rx,
            handle,
        });
        info!("event publisher started");
        Ok(())
    }

    /// Stop the delivery loop.
    ///
    /// Fails with [`ServiceError::NotRunning`] when the service is not
    /// running. Otherwise sends the cancellation signal and waits up to the
    /// join timeout; the fan-out of an already-dequeued event always
    /// completes first. A loop that does not finish in time is detached and
    /// logged, not raised — the service transitions to stopped either way.
    ///
    /// Returns the loop's [`DeliveryStats`] on a clean join, `None` when
    /// the wait timed out.
    pub fn stop(&self) -> Result<Option<DeliveryStats>, ServiceError> {
        let worker = {
            let mut slot = self.lock_worker();
            slot.take().ok_or(ServiceError::NotRunning)?
        };

        // The slot is cleared before the wait, so the service reports
        // stopped and `is_running()`/`start()` never block on the join. A
        // `start()` during the wait spawns a fresh worker; the signaled one
        // exits after its in-flight fan-out.
        let _ = worker.stop_tx.send(());

        match worker.done_rx.recv_timeout(self.join_timeout) {
            Ok(stats) => {
                let _ = worker.handle.join();
                info!(
                    events = stats.events_delivered,
                    subscriber_errors = stats.subscriber_errors,
                    "event publisher stopped"
                );
                Ok(Some(stats))
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                warn!(
                    timeout = ?self.join_timeout,
                    "delivery loop did not finish in time, detaching"
                );
                Ok(None)
            }
        }
    }

    /// Whether the delivery loop is currently running.
    ///
    /// Pure query, safe to call from any thread concurrently with
    /// `start`/`stop`.
    pub fn is_running(&self) -> bool {
        self.lock_worker().is_some()
    }

    /// A cloneable producer-facing handle sharing this service's queue and
    /// registry.
    pub fn publisher(&self) -> EventPublisher {
        self.publisher.clone()
    }

    /// Publish a single event. See [`EventPublisher::publish`].
    pub fn publish<E: Event>(&self, event: E) -> Result<(), PublishError> {
        self.publisher.publish(event)
    }

    /// Publish an already-shared event. See [`EventPublisher::publish_shared`].
    pub fn publish_shared(&self, event: Arc<dyn Event>) -> Result<(), PublishError> {
        self.publisher.publish_shared(event)
    }

    /// Publish each event of a sequence, in order. See
    /// [`EventPublisher::publish_all`].
    pub fn publish_all(&self, events: &[Arc<dyn Event>]) -> Result<(), PublishError> {
        self.publisher.publish_all(events)
    }

    /// Register a subscriber. See [`EventPublisher::add_subscriber`].
    pub fn add_subscriber(&self, subscriber: Arc<dyn EventSubscriber>) {
        self.publisher.add_subscriber(subscriber);
    }

    /// Remove a subscriber. See [`EventPublisher::remove_subscriber`].
    pub fn remove_subscriber(&self, subscriber: &Arc<dyn EventSubscriber>) {
        self.publisher.remove_subscriber(subscriber);
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<DeliveryWorker>> {
        // The slot only changes under this lock; recover from poisoning so
        // one panicked caller cannot wedge the lifecycle.
        self.worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for EventPublisherService {
    fn drop(&mut self) {
        if let Some(worker) = self.lock_worker().take() {
            // Signal the loop but do not join; let it wind down on its own.
            let _ = worker.stop_tx.send(());
        }
    }
}

/// Single long-running delivery worker, one per started service.
///
/// Repeatedly dequeues one event, snapshots the registry, and invokes every
/// subscriber in snapshot order. A subscriber error is isolated — logged,
/// counted, and delivery continues with the remaining subscribers — so the
/// loop's liveness never depends on subscriber correctness. The loop exits
/// only on the stop signal, never on an empty queue; the stop check sits
/// between fan-outs, so the current event's delivery always completes.
fn delivery_loop(
    queue: &EventQueue,
    registry: &SubscriberRegistry,
    stop_rx: &mpsc::Receiver<()>,
    poll_interval: Duration,
) -> DeliveryStats {
    let mut stats = DeliveryStats::default();

    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        match queue.dequeue_timeout(poll_interval) {
            Ok(Some(event)) => {
                for subscriber in registry.snapshot() {
                    if let Err(e) = subscriber.on_event(event.as_ref()) {
                        stats.subscriber_errors += 1;
                        error!(error = %e, event = ?event, "subscriber failed to handle event");
                    }
                }
                stats.events_delivered += 1;
            }
            Ok(None) => {
                stats.polls += 1;
            }
            Err(e) => {
                error!(error = %e, "event queue unavailable, delivery loop exiting");
                break;
            }
        }
    }

    stats
}
