//! Configuration types for the webhook notifier

use std::collections::HashMap;
use std::path::Path;

use chrono_tz::Tz;
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};

use crate::event::EventKind;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Destination URLs per event kind
    #[serde(default, deserialize_with = "deserialize_destinations")]
    pub event: HashMap<EventKind, Vec<String>>,
    pub dashboard_url: String,
    pub channel: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_icon_emoji")]
    pub icon_emoji: String,
    /// IANA zone for rendered timestamps; the host's local zone when unset
    #[serde(default)]
    pub timezone: Option<Tz>,
}

impl Config {
    /// Destinations configured for an event kind, if any
    pub fn destinations_for(&self, kind: &EventKind) -> Option<&[String]> {
        self.event.get(kind).map(Vec::as_slice)
    }

    pub fn validate(&self) -> crate::Result<()> {
        Url::parse(&self.dashboard_url).map_err(|e| {
            crate::WebhookError::Config(format!(
                "Invalid dashboard_url '{}': {}",
                self.dashboard_url, e
            ))
        })?;

        if self.channel.is_empty() {
            return Err(crate::WebhookError::Config(
                "channel must not be empty".to_string(),
            ));
        }

        for (kind, destinations) in &self.event {
            if let EventKind::Unrecognized(name) = kind {
                tracing::warn!("Destinations configured for unknown event kind '{}'", name);
            }
            for destination in destinations {
                if let Err(e) = Url::parse(destination) {
                    tracing::warn!(
                        "Destination '{}' for '{}' is not a valid URL: {}",
                        destination,
                        kind,
                        e
                    );
                }
            }
        }

        Ok(())
    }
}

fn default_username() -> String {
    "uptime".to_string()
}

fn default_icon_emoji() -> String {
    ":bell:".to_string()
}

/// Keep only sequence values; anything else means "do not notify" for that kind
fn deserialize_destinations<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<EventKind, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut destinations = HashMap::with_capacity(raw.len());

    for (kind, value) in raw {
        let serde_json::Value::Array(entries) = value else {
            tracing::debug!("Ignoring non-list destinations for '{}'", kind);
            continue;
        };

        let urls = entries
            .into_iter()
            .filter_map(|entry| match entry {
                serde_json::Value::String(url) => Some(url),
                other => {
                    tracing::debug!("Ignoring non-string destination {} for '{}'", other, kind);
                    None
                }
            })
            .collect();
        destinations.insert(EventKind::from(kind), urls);
    }

    Ok(destinations)
}

/// Load and validate configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WebhookError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
