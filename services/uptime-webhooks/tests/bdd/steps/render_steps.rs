//! BDD step definitions for payload rendering

use chrono::Utc;
use cucumber::{given, then, when};

use uptime_webhooks::payload::render;
use uptime_webhooks::{EventKind, ResourceRef, StateChangeEvent};

use crate::world::{resource_named, WebhookWorld};

#[given(expr = "a default channel {string}")]
fn default_channel(world: &mut WebhookWorld, channel: String) {
    world.config.channel = channel;
}

#[given(expr = "a resource named {string} tagged {string}")]
fn resource_tagged(world: &mut WebhookWorld, name: String, tags: String) {
    world.resource = Some(resource_named("r1", &name, &tags));
}

#[given(expr = "the resource has {int} ms of uptime and {int} ms of downtime")]
fn resource_counters(world: &mut WebhookWorld, uptime: u64, downtime: u64) {
    let resource = world.resource.as_mut().expect("resource not set");
    resource.uptime_millis = uptime;
    resource.downtime_millis = downtime;
}

#[when(expr = "a {string} event is rendered")]
fn event_rendered(world: &mut WebhookWorld, kind: String) {
    let resource = world.resource.as_ref().expect("resource not set");
    let event = StateChangeEvent::new(EventKind::from(kind), Utc::now(), ResourceRef::new("r1"));
    world.payload = Some(render(&event, resource, &world.config));
}

#[then(expr = "the payload channel is {string}")]
fn payload_channel(world: &mut WebhookWorld, channel: String) {
    let payload = world.payload.as_ref().expect("payload not rendered");
    assert_eq!(payload.channel, channel);
}

#[then(expr = "the payload text contains {string}")]
fn payload_text_contains(world: &mut WebhookWorld, expected: String) {
    let payload = world.payload.as_ref().expect("payload not rendered");
    assert!(
        payload.text.contains(&expected),
        "Expected text to contain '{}', got '{}'",
        expected,
        payload.text
    );
}

#[then(expr = "the payload text does not contain {string}")]
fn payload_text_lacks(world: &mut WebhookWorld, unexpected: String) {
    let payload = world.payload.as_ref().expect("payload not rendered");
    assert!(
        !payload.text.contains(&unexpected),
        "Expected text without '{}', got '{}'",
        unexpected,
        payload.text
    );
}

#[then(expr = "the payload color is {string}")]
fn payload_color(world: &mut WebhookWorld, color: String) {
    let payload = world.payload.as_ref().expect("payload not rendered");
    assert_eq!(payload.attachments[0].color.as_str(), color);
}

#[then(expr = "the field {string} has value {string}")]
fn field_value(world: &mut WebhookWorld, title: String, value: String) {
    let payload = world.payload.as_ref().expect("payload not rendered");
    let field = payload.attachments[0]
        .fields
        .iter()
        .find(|f| f.title == title)
        .unwrap_or_else(|| panic!("no field titled '{}'", title));
    assert_eq!(field.value, value);
}
