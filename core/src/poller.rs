/*!
# Poller Module

This module defines the poller that drives message consumption.

The poller runs `ceil(max_concurrency / 10)` worker loops. Each iteration:
- computes the free slots as `max_concurrency - tracker.count()`
- receives up to `min(free, 10)` messages, long-polling the queue
- spawns one handler task per message into the task tracker
- resets the shared backoff timer, or waits on it when the receive failed
- blocks on `wait_one()` while the pool is saturated

Blocking on the tracker is the only backpressure: receive calls are paced by
the rate at which handlers complete. When no slot is free the receive call is
skipped entirely.

`stop()` is a strict barrier. It signals every worker loop, joins them so no
task can be registered afterwards, then drains the tracker. In-flight receive,
delete and handler calls are never aborted; backoff sleeps and slot waits are.
*/

use crate::backoff::BackoffTimer;
use crate::config::PollerConfig;
use crate::error::{Result, SluiceError};
use crate::events::{NoopObserver, PollerEvent, PollerObserver};
use crate::handler::MessageHandler;
use crate::message::{Disposition, Message};
use crate::queue::{QueueClient, ReceiveRequest, FETCH_LIMIT};
use crate::tracker::TaskTracker;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// State shared by the poller handle, its worker loops and handler tasks
struct Shared {
    config: PollerConfig,
    queue: Arc<dyn QueueClient>,
    handler: Arc<dyn MessageHandler>,
    observer: Arc<dyn PollerObserver>,
    tracker: TaskTracker,
    backoff: BackoffTimer,
    running: AtomicBool,
}

/// Bounded-concurrency queue poller
pub struct Poller {
    shared: Arc<Shared>,

    /// Worker loops of the current generation
    workers: Mutex<Vec<JoinHandle<()>>>,

    /// Flipped to `true` to interrupt waiting worker loops
    shutdown: watch::Sender<bool>,
}

impl Poller {
    /// Create a poller that discards notifications
    pub fn new(
        config: PollerConfig,
        queue: Arc<dyn QueueClient>,
        handler: impl MessageHandler,
    ) -> Result<Self> {
        Self::with_observer(config, queue, handler, NoopObserver)
    }

    /// Create a poller reporting notifications to `observer`
    pub fn with_observer(
        config: PollerConfig,
        queue: Arc<dyn QueueClient>,
        handler: impl MessageHandler,
        observer: impl PollerObserver,
    ) -> Result<Self> {
        config.validate()?;

        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                queue,
                handler: Arc::new(handler),
                observer: Arc::new(observer),
                tracker: TaskTracker::new(),
                backoff: BackoffTimer::new(),
                running: AtomicBool::new(false),
            }),
            workers: Mutex::new(Vec::new()),
            shutdown,
        })
    }

    pub fn config(&self) -> &PollerConfig {
        &self.shared.config
    }

    /// Whether worker loops are currently allowed to iterate
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Number of tracked handler tasks, settled ones included until purged
    pub async fn in_flight(&self) -> usize {
        self.shared.tracker.count().await
    }

    /// Start polling. Does nothing if already running.
    ///
    /// A previous generation of worker loops is stopped and drained first,
    /// so two generations never overlap.
    pub async fn start(&self) {
        let mut workers = self.workers.lock().await;

        if self.is_running() {
            return;
        }

        self.shutdown_generation(&mut workers).await;

        self.shared.running.store(true, Ordering::SeqCst);
        self.shutdown.send_replace(false);

        let worker_count = self.shared.config.worker_count();
        info!(
            queue_url = %self.shared.config.queue_url,
            max_concurrency = self.shared.config.max_concurrency,
            worker_count,
            "Starting poller"
        );

        for worker_id in 0..worker_count {
            let shared = self.shared.clone();
            let shutdown = self.shutdown.subscribe();
            workers.push(tokio::spawn(shared.run_worker(worker_id, shutdown)));
        }
    }

    /// Stop polling and wait for every in-flight handler task to settle
    pub async fn stop(&self) {
        let mut workers = self.workers.lock().await;
        self.shutdown_generation(&mut workers).await;
    }

    async fn shutdown_generation(&self, workers: &mut Vec<JoinHandle<()>>) {
        self.shared.running.store(false, Ordering::SeqCst);
        self.shutdown.send_replace(true);

        for handle in workers.drain(..) {
            if let Err(e) = handle.await {
                error!("Worker loop terminated abnormally: {}", e);
            }
        }

        let pending = self.shared.tracker.count().await;
        if pending > 0 {
            info!(pending, "Draining in-flight messages");
        }

        self.shared.tracker.wait_all().await;
        debug!("Poller drained");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        // Detached worker loops exit after their current iteration
        self.shared.running.store(false, Ordering::SeqCst);
        self.shutdown.send_replace(true);
    }
}

impl Shared {
    async fn run_worker(self: Arc<Self>, worker_id: usize, mut shutdown: watch::Receiver<bool>) {
        debug!(worker_id, "Worker loop started");

        while self.running.load(Ordering::SeqCst) {
            self.poll_once(worker_id, &mut shutdown).await;
            tokio::task::yield_now().await;
        }

        debug!(worker_id, "Worker loop stopped");
    }

    async fn poll_once(self: &Arc<Self>, worker_id: usize, shutdown: &mut watch::Receiver<bool>) {
        let available = self.available_slots().await;

        if available > 0 {
            let max_messages = (available as usize).min(FETCH_LIMIT);

            match self.fetch(max_messages).await {
                Ok(messages) => {
                    self.dispatch(worker_id, messages).await;
                    self.backoff.reset();
                }
                Err(error) => {
                    warn!(
                        worker_id,
                        error = %error,
                        backoff_secs = self.backoff.next_delay().as_secs(),
                        "Failed to receive messages, backing off"
                    );
                    self.observer.notify(PollerEvent::FetchError(error));

                    tokio::select! {
                        _ = self.backoff.wait() => {}
                        _ = stopped(shutdown) => {}
                    }
                }
            }
        }

        if self.available_slots().await <= 0 {
            tokio::select! {
                result = self.tracker.wait_one() => {
                    if let Err(e) = result {
                        debug!(worker_id, "No slot to wait for: {}", e);
                    }
                }
                _ = stopped(shutdown) => {}
            }
        }
    }

    async fn available_slots(&self) -> isize {
        let ceiling = isize::try_from(self.config.max_concurrency).unwrap_or(isize::MAX);
        let tracked = isize::try_from(self.tracker.count().await).unwrap_or(isize::MAX);
        ceiling.saturating_sub(tracked)
    }

    async fn fetch(&self, max_messages: usize) -> Result<Vec<Message>> {
        self.queue
            .receive(ReceiveRequest {
                queue_url: self.config.queue_url.clone(),
                max_messages,
                wait_seconds: self.config.wait_seconds,
                include_attributes: self.config.include_attributes,
            })
            .await
    }

    async fn dispatch(self: &Arc<Self>, worker_id: usize, messages: Vec<Message>) {
        if messages.is_empty() {
            debug!(worker_id, "Queue is empty");
            self.observer.notify(PollerEvent::EmptyQueue);
            return;
        }

        debug!(worker_id, count = messages.len(), "Received messages");

        for message in messages {
            let message_id = message.id.clone();
            let shared = self.clone();

            let added = self
                .tracker
                .add(message_id.clone(), async move { shared.process(message).await })
                .await;

            if !added {
                debug!(message_id = %message_id, "Message already in flight, skipping");
            }
        }
    }

    /// Run the handler for one message and settle it. Never fails: every
    /// error is logged and reported to the observer.
    async fn process(&self, message: Message) {
        let message_id = message.id.clone();
        let receipt_handle = message.receipt_handle.clone();

        let outcome = AssertUnwindSafe(self.handler.handle(message))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(disposition)) => self.settle(&message_id, &receipt_handle, disposition).await,
            Ok(Err(source)) => Err(SluiceError::Handler {
                message_id: message_id.clone(),
                source,
            }),
            Err(panic) => Err(SluiceError::HandlerPanic {
                message_id: message_id.clone(),
                reason: panic_reason(panic.as_ref()),
            }),
        };

        if let Err(error) = result {
            error!(message_id = %message_id, error = %error, "Failed to process message");
            self.observer
                .notify(PollerEvent::MessageError { message_id, error });
        }
    }

    async fn settle(
        &self,
        message_id: &str,
        receipt_handle: &str,
        disposition: Disposition,
    ) -> Result<()> {
        if !self.config.auto_delete || !disposition.is_acknowledge() {
            debug!(message_id, ?disposition, "Leaving message in queue");
            return Ok(());
        }

        self.queue
            .delete(&self.config.queue_url, receipt_handle)
            .await
            .map_err(|e| SluiceError::Delete {
                message_id: message_id.to_string(),
                reason: e.to_string(),
            })?;

        debug!(message_id, "Deleted message");
        Ok(())
    }
}

/// Resolves once the shutdown flag is set
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stopped| *stopped).await.is_err();
    if closed {
        // Sender dropped together with the poller, which clears `running`
        std::future::pending::<()>().await;
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelObserver;
    use std::collections::VecDeque;
    use std::future::pending;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::{sleep, Instant};

    const URL: &str = "stub://queue";

    /// Queue stub replaying scripted receive results, then long-polling empty
    #[derive(Default)]
    struct ScriptedQueue {
        script: StdMutex<VecDeque<Result<Vec<Message>>>>,
        requests: StdMutex<Vec<(Instant, ReceiveRequest)>>,
        deleted: StdMutex<Vec<String>>,
        fail_deletes: bool,
    }

    impl ScriptedQueue {
        fn new(script: Vec<Result<Vec<Message>>>) -> Self {
            Self {
                script: StdMutex::new(script.into()),
                ..Self::default()
            }
        }

        fn deleted(&self) -> Vec<String> {
            self.deleted.lock().unwrap().clone()
        }

        fn request_times(&self) -> Vec<Instant> {
            self.requests.lock().unwrap().iter().map(|(at, _)| *at).collect()
        }
    }

    #[async_trait::async_trait]
    impl QueueClient for ScriptedQueue {
        async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>> {
            let wait = Duration::from_secs(request.wait_seconds);
            self.requests
                .lock()
                .unwrap()
                .push((Instant::now(), request));

            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(result) => result,
                None => {
                    sleep(wait).await;
                    Ok(Vec::new())
                }
            }
        }

        async fn delete(&self, _queue_url: &str, receipt_handle: &str) -> Result<()> {
            if self.fail_deletes {
                return Err(SluiceError::Queue("access denied".into()));
            }
            self.deleted.lock().unwrap().push(receipt_handle.to_string());
            Ok(())
        }
    }

    /// Queue stub returning one fresh message per receive call
    #[derive(Default)]
    struct EndlessQueue {
        sent: AtomicUsize,
        requested: StdMutex<Vec<usize>>,
    }

    #[async_trait::async_trait]
    impl QueueClient for EndlessQueue {
        async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>> {
            self.requested.lock().unwrap().push(request.max_messages);
            let n = self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(vec![message(&format!("m-{n}"))])
        }

        async fn delete(&self, _queue_url: &str, _receipt_handle: &str) -> Result<()> {
            Ok(())
        }
    }

    fn message(id: &str) -> Message {
        Message::new(id, format!("rh-{id}"), format!("body of {id}"))
    }

    fn config(max_concurrency: usize) -> PollerConfig {
        PollerConfig::new(URL)
            .with_max_concurrency(max_concurrency)
            .with_wait_seconds(1)
    }

    fn ack_handler() -> impl MessageHandler {
        |_message: Message| async move { Ok::<_, anyhow::Error>(Disposition::Acknowledge) }
    }

    fn drain_events(events: &mut UnboundedReceiver<PollerEvent>) -> Vec<PollerEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    async fn eventually(mut condition: impl FnMut() -> bool) {
        for _ in 0..1000 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not met in time");
    }

    #[test]
    fn rejects_invalid_config() {
        let queue = Arc::new(ScriptedQueue::default());
        let result = Poller::new(config(0), queue, ack_handler());
        assert!(matches!(result, Err(SluiceError::Config(_))));
    }

    #[test]
    fn rejects_unbounded_concurrency() {
        let queue = Arc::new(ScriptedQueue::default());
        let result = Poller::new(config(usize::MAX), queue, ack_handler());
        assert!(matches!(result, Err(SluiceError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent_and_spawns_one_loop_per_batch() {
        let queue = Arc::new(ScriptedQueue::default());
        let poller = Poller::new(config(25), queue, ack_handler()).unwrap();
        assert!(!poller.is_running());

        poller.start().await;
        poller.start().await;

        assert!(poller.is_running());
        assert_eq!(poller.workers.lock().await.len(), 3);

        poller.stop().await;
        assert!(!poller.is_running());
        assert!(poller.workers.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop() {
        let queue = Arc::new(ScriptedQueue::new(vec![
            Ok(vec![message("a")]),
        ]));
        let poller = Poller::new(config(5), queue.clone(), ack_handler()).unwrap();

        poller.start().await;
        poller.stop().await;
        poller.start().await;
        assert!(poller.is_running());
        eventually(|| !queue.deleted().is_empty()).await;
        poller.stop().await;

        assert_eq!(queue.deleted(), vec!["rh-a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrency_never_exceeds_ceiling() {
        let queue = Arc::new(EndlessQueue::default());
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (active_in, peak_in) = (active.clone(), peak.clone());
        let handler = move |_message: Message| {
            let active = active_in.clone();
            let peak = peak_in.clone();
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                pending::<()>().await;
                Ok::<_, anyhow::Error>(Disposition::Acknowledge)
            }
        };

        let poller = Poller::new(config(3), queue.clone(), handler).unwrap();
        poller.start().await;
        sleep(Duration::from_secs(10)).await;

        assert_eq!(active.load(Ordering::SeqCst), 3);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
        assert_eq!(poller.in_flight().await, 3);

        // Saturated loops wait for a slot instead of sending empty requests
        let requested = queue.requested.lock().unwrap().clone();
        assert_eq!(requested, vec![3, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_drains_outstanding_handlers() {
        let queue = Arc::new(ScriptedQueue::new(vec![Ok(vec![
            message("a"),
            message("b"),
            message("c"),
        ])]));
        let started = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        let (started_in, completed_in) = (started.clone(), completed.clone());
        let handler = move |_message: Message| {
            let started = started_in.clone();
            let completed = completed_in.clone();
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_secs(5)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(Disposition::Acknowledge)
            }
        };

        let poller = Poller::new(config(10), queue.clone(), handler).unwrap();
        poller.start().await;

        eventually(|| started.load(Ordering::SeqCst) == 3).await;
        assert_eq!(completed.load(Ordering::SeqCst), 0);

        poller.stop().await;

        assert_eq!(completed.load(Ordering::SeqCst), 3);
        assert_eq!(queue.deleted().len(), 3);
        assert_eq!(poller.in_flight().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_handler_does_not_affect_batch_mates() {
        let queue = Arc::new(ScriptedQueue::new(vec![Ok(vec![
            message("a"),
            message("b"),
        ])]));
        let (observer, mut events) = ChannelObserver::new();

        let handler = |message: Message| async move {
            if message.id == "a" {
                anyhow::bail!("cannot process {}", message.id);
            }
            Ok(Disposition::Acknowledge)
        };

        let poller = Poller::with_observer(config(10), queue.clone(), handler, observer).unwrap();
        poller.start().await;
        eventually(|| !queue.deleted().is_empty()).await;
        poller.stop().await;

        assert_eq!(queue.deleted(), vec!["rh-b".to_string()]);

        let errors: Vec<_> = drain_events(&mut events)
            .into_iter()
            .filter_map(|event| match event {
                PollerEvent::MessageError { message_id, error } => Some((message_id, error)),
                _ => None,
            })
            .collect();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "a");
        assert!(matches!(errors[0].1, SluiceError::Handler { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_handler_is_reported() {
        let queue = Arc::new(ScriptedQueue::new(vec![Ok(vec![message("a")])]));
        let (observer, mut events) = ChannelObserver::new();

        let handler = |_message: Message| async move {
            if true {
                panic!("handler exploded");
            }
            Ok::<_, anyhow::Error>(Disposition::Acknowledge)
        };

        let poller = Poller::with_observer(config(10), queue.clone(), handler, observer).unwrap();
        poller.start().await;
        eventually(|| queue.request_times().len() >= 2).await;
        poller.stop().await;

        let events = drain_events(&mut events);
        let reason = events.iter().find_map(|event| match event {
            PollerEvent::MessageError {
                error: SluiceError::HandlerPanic { reason, .. },
                ..
            } => Some(reason.clone()),
            _ => None,
        });

        assert_eq!(reason.as_deref(), Some("handler exploded"));
        assert!(queue.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn delete_failure_is_a_message_error() {
        let queue = Arc::new(ScriptedQueue {
            fail_deletes: true,
            ..ScriptedQueue::new(vec![Ok(vec![message("a")])])
        });
        let (observer, mut events) = ChannelObserver::new();

        let poller = Poller::with_observer(config(10), queue.clone(), ack_handler(), observer)
            .unwrap();
        poller.start().await;
        eventually(|| queue.request_times().len() >= 2).await;
        poller.stop().await;

        let errors: Vec<_> = drain_events(&mut events)
            .into_iter()
            .filter(|event| matches!(event, PollerEvent::MessageError { .. }))
            .collect();

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            PollerEvent::MessageError { message_id, error: SluiceError::Delete { .. } }
                if message_id == "a"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn retained_or_unacknowledged_messages_are_not_deleted() {
        let queue = Arc::new(ScriptedQueue::new(vec![Ok(vec![
            message("keep"),
            message("ack"),
        ])]));
        let handler = |message: Message| async move {
            Ok::<_, anyhow::Error>(Disposition::from(message.id == "ack"))
        };

        let poller = Poller::new(config(10), queue.clone(), handler).unwrap();
        poller.start().await;
        eventually(|| !queue.deleted().is_empty()).await;
        poller.stop().await;
        assert_eq!(queue.deleted(), vec!["rh-ack".to_string()]);

        let queue = Arc::new(ScriptedQueue::new(vec![Ok(vec![message("ack")])]));
        let poller = Poller::new(
            config(10).with_auto_delete(false),
            queue.clone(),
            ack_handler(),
        )
        .unwrap();
        poller.start().await;
        eventually(|| queue.request_times().len() >= 2).await;
        poller.stop().await;
        assert!(queue.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_errors_back_off_then_reset() {
        let queue = Arc::new(ScriptedQueue::new(vec![
            Err(SluiceError::Queue("throttled".into())),
            Err(SluiceError::Queue("throttled".into())),
            Err(SluiceError::Queue("throttled".into())),
            Ok(vec![message("a")]),
        ]));
        let (observer, mut events) = ChannelObserver::new();

        let poller = Poller::with_observer(config(10), queue.clone(), ack_handler(), observer)
            .unwrap();
        poller.start().await;
        eventually(|| !queue.deleted().is_empty()).await;

        let times = queue.request_times();
        let gaps: Vec<_> = times.windows(2).take(3).map(|w| w[1] - w[0]).collect();
        assert_eq!(
            gaps,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        assert_eq!(poller.shared.backoff.counter(), 0);

        poller.stop().await;

        let fetch_errors = drain_events(&mut events)
            .into_iter()
            .filter(|event| matches!(event, PollerEvent::FetchError(_)))
            .count();
        assert_eq!(fetch_errors, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_interrupts_backoff() {
        let queue = Arc::new(ScriptedQueue::new(vec![Err(SluiceError::Queue(
            "unreachable".into(),
        ))]));
        let poller = Poller::new(config(10), queue.clone(), ack_handler()).unwrap();
        for _ in 0..8 {
            poller.shared.backoff.wait().await;
        }
        assert_eq!(poller.shared.backoff.next_delay(), Duration::from_secs(256));

        poller.start().await;
        eventually(|| !queue.request_times().is_empty()).await;

        let stopping = Instant::now();
        poller.stop().await;
        assert!(stopping.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_receive_is_notified() {
        let queue = Arc::new(ScriptedQueue::new(vec![Ok(Vec::new())]));
        let (observer, mut events) = ChannelObserver::new();

        let poller = Poller::with_observer(config(10), queue.clone(), ack_handler(), observer)
            .unwrap();
        poller.start().await;
        eventually(|| queue.request_times().len() >= 2).await;
        poller.stop().await;

        let events = drain_events(&mut events);
        assert!(matches!(events.first(), Some(PollerEvent::EmptyQueue)));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_receipt_of_same_message_runs_handler_once() {
        let queue = Arc::new(ScriptedQueue::new(vec![
            Ok(vec![message("a")]),
            Ok(vec![message("a")]),
        ]));
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_in = calls.clone();
        let handler = move |_message: Message| {
            let calls = calls_in.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_secs(30)).await;
                Ok::<_, anyhow::Error>(Disposition::Acknowledge)
            }
        };

        let poller = Poller::new(config(10), queue.clone(), handler).unwrap();
        poller.start().await;
        eventually(|| queue.request_times().len() >= 3).await;
        poller.stop().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(queue.deleted(), vec!["rh-a".to_string()]);
    }
}
