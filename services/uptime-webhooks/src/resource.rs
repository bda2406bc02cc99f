//! Monitored resources and the lookup used to resolve them from events

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Opaque handle carried by an event, resolved into a [`MonitoredResource`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resource under uptime monitoring, as stored by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredResource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub uptime_millis: u64,
    #[serde(default)]
    pub downtime_millis: u64,
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Asynchronous lookup of the resource an event refers to
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ResourceResolver: Send + Sync {
    /// Resolve a reference, failing if the resource is gone or the lookup errors
    async fn resolve(&self, resource_ref: &ResourceRef) -> crate::Result<MonitoredResource>;
}

/// Resolver backed by an in-process map
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    resources: RwLock<HashMap<ResourceRef, MonitoredResource>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource, keyed by its id
    pub async fn insert(&self, resource: MonitoredResource) {
        let key = ResourceRef::new(resource.id.clone());
        self.resources.write().await.insert(key, resource);
    }

    pub async fn remove(&self, resource_ref: &ResourceRef) -> Option<MonitoredResource> {
        self.resources.write().await.remove(resource_ref)
    }
}

#[async_trait]
impl ResourceResolver for InMemoryResolver {
    async fn resolve(&self, resource_ref: &ResourceRef) -> crate::Result<MonitoredResource> {
        self.resources
            .read()
            .await
            .get(resource_ref)
            .cloned()
            .ok_or_else(|| {
                crate::WebhookError::Resolution(format!("resource {} not found", resource_ref))
            })
    }
}
