//! BDD step definitions for the end-to-end event pipeline

use std::sync::Arc;

use chrono::Utc;
use cucumber::{given, then, when};

use uptime_webhooks::resource::InMemoryResolver;
use uptime_webhooks::{init_with_client, EventBus, EventKind, ResourceRef, StateChangeEvent};

use crate::world::{resource_named, split_list, WebhookWorld};

#[given(expr = "{string} events are sent to {string}")]
fn kind_destinations(world: &mut WebhookWorld, kind: String, destinations: String) {
    world
        .config
        .event
        .insert(EventKind::from(kind), split_list(&destinations));
}

#[given(expr = "a stored resource {string} named {string} tagged {string}")]
fn stored_resource(world: &mut WebhookWorld, id: String, name: String, tags: String) {
    world.stored_resources.push(resource_named(&id, &name, &tags));
}

#[when(expr = "a {string} event for {string} is published")]
async fn event_published(world: &mut WebhookWorld, kind: String, resource_id: String) {
    let resolver = InMemoryResolver::new();
    for resource in &world.stored_resources {
        resolver.insert(resource.clone()).await;
    }

    let bus = EventBus::default();
    let subscription = init_with_client(
        world.config.clone(),
        Arc::new(resolver),
        world.http.clone(),
        &bus,
    );

    let event = StateChangeEvent::new(
        EventKind::from(kind),
        Utc::now(),
        ResourceRef::new(resource_id),
    );
    assert_eq!(bus.publish(event), 1);

    subscription.unsubscribe().await;
}

#[then(expr = "exactly {int} POST(s) is/are sent")]
async fn posts_sent(world: &mut WebhookWorld, count: usize) {
    assert_eq!(world.http.recorded().await.len(), count);
}

#[then(expr = "the POST goes to {string}")]
async fn post_goes_to(world: &mut WebhookWorld, url: String) {
    let recorded = world.http.recorded().await;
    assert!(recorded.iter().all(|r| r.url == url), "requests: {recorded:?}");
}

#[then(expr = "the posted {string} is {string}")]
async fn posted_field(world: &mut WebhookWorld, pointer: String, expected: String) {
    let recorded = world.http.recorded().await;
    let request = recorded.last().expect("nothing was posted");
    let json = request.json();
    let value = json
        .pointer(&pointer)
        .unwrap_or_else(|| panic!("no value at {} in {}", pointer, json));
    assert_eq!(value.as_str(), Some(expected.as_str()));
}

#[then(expr = "the posted text mentions {string}")]
async fn posted_text_mentions(world: &mut WebhookWorld, expected: String) {
    let recorded = world.http.recorded().await;
    let request = recorded.last().expect("nothing was posted");
    let text = request.json()["text"].as_str().unwrap_or_default().to_string();
    assert!(
        text.contains(&expected),
        "Expected posted text to contain '{}', got '{}'",
        expected,
        text
    );
}
