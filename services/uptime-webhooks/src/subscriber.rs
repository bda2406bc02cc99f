//! Subscriber: turns state-change events into webhook deliveries

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::dispatcher::{DeliveryRecord, WebhookDispatcher};
use crate::event::{EventBus, StateChangeEvent};
use crate::payload::render;
use crate::resource::ResourceResolver;

/// Resolve, render and dispatch for a single event
pub struct NotificationPipeline {
    config: Arc<Config>,
    resolver: Arc<dyn ResourceResolver>,
    dispatcher: WebhookDispatcher,
}

impl std::fmt::Debug for NotificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPipeline")
            .field("channel", &self.config.channel)
            .finish_non_exhaustive()
    }
}

impl NotificationPipeline {
    pub fn new(
        config: Arc<Config>,
        resolver: Arc<dyn ResourceResolver>,
        dispatcher: WebhookDispatcher,
    ) -> Self {
        Self {
            config,
            resolver,
            dispatcher,
        }
    }

    /// Handle one event end to end.
    ///
    /// Returns the delivery records, or an empty list when the kind has no
    /// destinations or the resource could not be resolved. Never fails.
    pub async fn handle_event(&self, event: &StateChangeEvent) -> Vec<DeliveryRecord> {
        let Some(destinations) = self.config.destinations_for(&event.kind) else {
            tracing::debug!("No webhook destinations for '{}' events", event.kind);
            return Vec::new();
        };

        let resource = match self.resolver.resolve(&event.resource_ref).await {
            Ok(resource) => resource,
            Err(e) => {
                tracing::warn!(
                    "Dropping '{}' notification for {}: {}",
                    event.kind,
                    event.resource_ref,
                    e
                );
                return Vec::new();
            }
        };

        let payload = render(event, &resource, &self.config);
        tracing::debug!(
            "Dispatching '{}' for '{}' to {} destination(s)",
            event.kind,
            resource.name,
            destinations.len()
        );

        let records = self.dispatcher.dispatch(&payload, Some(destinations)).await;
        let failed = records.iter().filter(|r| !r.success).count();
        if failed > 0 {
            tracing::debug!(
                "'{}' for '{}': {} of {} webhook(s) failed",
                event.kind,
                resource.name,
                failed,
                records.len()
            );
        }
        records
    }
}

/// How long [`Subscription::unsubscribe`] waits for in-flight deliveries
pub const DEFAULT_UNSUBSCRIBE_GRACE: Duration = Duration::from_secs(10);

/// A live registration on the event bus
///
/// Dropping a subscription without calling [`Subscription::unsubscribe`]
/// leaves the listener running until the bus is dropped.
#[derive(Debug)]
pub struct Subscription {
    cancel: CancellationToken,
    listener: JoinHandle<()>,
    in_flight: TaskTracker,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled() && !self.listener.is_finished()
    }

    /// Stop listening and wait up to [`DEFAULT_UNSUBSCRIBE_GRACE`] for
    /// in-flight events to finish.
    ///
    /// Events published before this call are still handled.
    pub async fn unsubscribe(self) {
        self.unsubscribe_within(DEFAULT_UNSUBSCRIBE_GRACE).await;
    }

    /// Stop listening and wait at most `grace` for in-flight events.
    ///
    /// Handlers still running after `grace` are left to finish on their own.
    pub async fn unsubscribe_within(self, grace: Duration) {
        self.cancel.cancel();
        if let Err(e) = self.listener.await {
            tracing::warn!("Webhook listener ended abnormally: {}", e);
        }

        self.in_flight.close();
        if tokio::time::timeout(grace, self.in_flight.wait())
            .await
            .is_err()
        {
            tracing::warn!(
                "Abandoning {} in-flight webhook notification(s) after {:?}",
                self.in_flight.len(),
                grace
            );
        }
        tracing::debug!("Webhook listener unsubscribed");
    }
}

/// Register `pipeline` as a listener on `bus`.
///
/// Each event is handled on its own task, so the publisher never waits on
/// resolution or delivery. Must be called from within a Tokio runtime.
pub fn subscribe(bus: &EventBus, pipeline: Arc<NotificationPipeline>) -> Subscription {
    let mut events = bus.receiver();
    let cancel = CancellationToken::new();
    let cancel_for_listener = cancel.clone();
    let in_flight = TaskTracker::new();
    let tracker = in_flight.clone();

    let listener = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                received = events.recv() => match received {
                    Ok(event) => {
                        let pipeline = Arc::clone(&pipeline);
                        tracker.spawn(async move {
                            pipeline.handle_event(&event).await;
                        });
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Webhook listener lagged, {} event(s) skipped", skipped);
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Event bus closed");
                        break;
                    }
                },
                _ = cancel_for_listener.cancelled() => break,
            }
        }
    });

    Subscription {
        cancel,
        listener,
        in_flight,
    }
}
