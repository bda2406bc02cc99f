//! Uptime webhooks - state-change notifications for monitored resources
//!
//! Listens for resource state changes (up, down, paused, restarted), renders
//! a chat-style payload for the affected resource, and POSTs it to every
//! webhook configured for that kind of change.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod io;
pub mod payload;
pub mod resource;
pub mod style;
pub mod subscriber;
pub mod tags;

pub use config::{load_config, Config};
pub use error::{Result, WebhookError};
pub use event::{EventBus, EventKind, StateChangeEvent};
pub use resource::{MonitoredResource, ResourceRef, ResourceResolver};
pub use subscriber::{subscribe, NotificationPipeline, Subscription};

use std::sync::Arc;

use crate::dispatcher::WebhookDispatcher;
use crate::io::{HttpClient, ReqwestHttpClient};

/// Wire the notifier onto `bus` using the production HTTPS client.
///
/// The returned [`Subscription`] belongs to the caller; call
/// [`Subscription::unsubscribe`] to detach.
pub fn init(
    config: Config,
    resolver: Arc<dyn ResourceResolver>,
    bus: &EventBus,
) -> Result<Subscription> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);
    Ok(init_with_client(config, resolver, http, bus))
}

/// Like [`init`], with a caller-supplied HTTP client
pub fn init_with_client(
    config: Config,
    resolver: Arc<dyn ResourceResolver>,
    http: Arc<dyn HttpClient>,
    bus: &EventBus,
) -> Subscription {
    tracing::debug!(
        "Webhook destinations configured for {} event kind(s)",
        config.event.len()
    );

    let pipeline = NotificationPipeline::new(
        Arc::new(config),
        resolver,
        WebhookDispatcher::new(http),
    );
    let subscription = subscribe(bus, Arc::new(pipeline));

    tracing::info!("Enabled webhook notifier");
    subscription
}
