//! Rendering of state changes into webhook payloads
//!
//! The payload layout follows the incoming-webhook schema used by chat
//! services: a channel, a sender identity, a summary line, and one
//! attachment carrying a color and a list of title/value fields.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::Config;
use crate::event::StateChangeEvent;
use crate::resource::MonitoredResource;
use crate::style::{style_for, SeverityMarker};
use crate::tags::{parse_tags, ADMIN_TAG, CHANNEL_TAG};

const LAST_CHECKED_FORMAT: &str = "%Y-%m-%d %-I:%M:%S";

/// Body posted to every destination for one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub channel: String,
    pub username: String,
    pub text: String,
    pub icon_emoji: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub color: SeverityMarker,
    pub fields: Vec<AttachmentField>,
}

/// One title/value row; `short` fields render two per line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    fn new(title: &str, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short,
        }
    }
}

/// Build the payload for an event on a resolved resource
pub fn render(
    event: &StateChangeEvent,
    resource: &MonitoredResource,
    config: &Config,
) -> NotificationPayload {
    let tags = parse_tags(&resource.tags);

    let channel = match tags.get(CHANNEL_TAG) {
        Some(channel) => format!("#{}", channel),
        None => config.channel.clone(),
    };

    let mut text = format!(
        "<{}/dashboard/checks/{}?type=hour&date={}|{}> {}",
        config.dashboard_url.trim_end_matches('/'),
        resource.id,
        event.timestamp.timestamp_millis(),
        resource.name,
        event.kind
    );
    if let Some(admin) = tags.get(ADMIN_TAG) {
        text.push_str(&format!(" <@{}>", admin));
    }

    let fields = vec![
        AttachmentField::new("Name", resource.name.as_str(), true),
        AttachmentField::new("Type", resource.resource_type.as_str(), true),
        AttachmentField::new("Uptime", (resource.uptime_millis / 1000).to_string(), true),
        AttachmentField::new(
            "Downtime",
            (resource.downtime_millis / 1000).to_string(),
            true,
        ),
        AttachmentField::new("URL", resource.url.as_str(), false),
        AttachmentField::new(
            "Last Checked",
            format_last_checked(resource.last_checked_at, config.timezone),
            false,
        ),
    ];

    NotificationPayload {
        channel,
        username: config.username.clone(),
        text,
        icon_emoji: config.icon_emoji.clone(),
        attachments: vec![Attachment {
            color: style_for(&event.kind),
            fields,
        }],
    }
}

fn format_last_checked(at: Option<DateTime<Utc>>, timezone: Option<Tz>) -> String {
    match (at, timezone) {
        (None, _) => String::new(),
        (Some(at), Some(tz)) => at.with_timezone(&tz).format(LAST_CHECKED_FORMAT).to_string(),
        (Some(at), None) => at
            .with_timezone(&Local)
            .format(LAST_CHECKED_FORMAT)
            .to_string(),
    }
}
