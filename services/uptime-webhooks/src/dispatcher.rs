//! Concurrent delivery of a payload to webhook destinations

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::task::JoinSet;

use crate::io::HttpClient;
use crate::payload::NotificationPayload;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryRecord {
    pub destination: String,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp_epoch_ms: u64,
}

/// Sends payloads to every destination independently
#[derive(Clone)]
pub struct WebhookDispatcher {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookDispatcher").finish_non_exhaustive()
    }
}

impl WebhookDispatcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// POST `payload` to each destination.
    ///
    /// Every request is started before any is awaited, and a failing
    /// destination never affects its siblings. `None` means the event kind
    /// has no destinations and nothing is sent. The records are returned in
    /// completion order.
    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        destinations: Option<&[String]>,
    ) -> Vec<DeliveryRecord> {
        let Some(destinations) = destinations else {
            return Vec::new();
        };

        let body: Arc<str> = match serde_json::to_string(payload) {
            Ok(body) => body.into(),
            Err(e) => {
                tracing::error!("Failed to serialize webhook payload: {}", e);
                return Vec::new();
            }
        };

        let mut deliveries = JoinSet::new();
        for destination in destinations {
            let http = Arc::clone(&self.http);
            let body = Arc::clone(&body);
            let destination = destination.clone();
            deliveries.spawn(async move { deliver(http, destination, body).await });
        }

        let mut records = Vec::with_capacity(destinations.len());
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Webhook delivery task aborted: {}", e),
            }
        }
        records
    }
}

async fn deliver(http: Arc<dyn HttpClient>, destination: String, body: Arc<str>) -> DeliveryRecord {
    let result = http.post_json(&destination, &body).await;

    match &result {
        Ok(response) => tracing::debug!(
            "Webhook delivered to {} (status {})",
            destination,
            response.status
        ),
        Err(e) => tracing::warn!("Problem with webhook request to {}: {}", destination, e),
    }

    DeliveryRecord {
        success: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
        destination,
        timestamp_epoch_ms: current_epoch_ms(),
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
