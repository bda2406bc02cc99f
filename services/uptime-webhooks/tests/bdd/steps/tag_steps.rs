//! BDD step definitions for tag parsing and severity styling

use cucumber::{given, then, when};

use uptime_webhooks::style::style_for;
use uptime_webhooks::tags::parse_tags;
use uptime_webhooks::EventKind;

use crate::world::{split_list, WebhookWorld};

#[given(expr = "the tags {string}")]
fn given_tags(world: &mut WebhookWorld, tags: String) {
    world.tags = split_list(&tags);
}

#[when("the tags are parsed")]
fn tags_parsed(world: &mut WebhookWorld) {
    world.parsed_tags = Some(parse_tags(&world.tags));
}

#[then(expr = "tag {string} has value {string}")]
fn tag_has_value(world: &mut WebhookWorld, key: String, value: String) {
    let parsed = world.parsed_tags.as_ref().expect("tags not parsed");
    assert_eq!(parsed.get(&key), Some(&value), "parsed tags: {parsed:?}");
}

#[then(expr = "there are {int} parsed tags")]
fn parsed_tag_count(world: &mut WebhookWorld, count: usize) {
    let parsed = world.parsed_tags.as_ref().expect("tags not parsed");
    assert_eq!(parsed.len(), count, "parsed tags: {parsed:?}");
}

#[then(expr = "the severity marker for {string} is {string}")]
fn severity_marker(_world: &mut WebhookWorld, kind: String, marker: String) {
    assert_eq!(style_for(&EventKind::from(kind)).as_str(), marker);
}
