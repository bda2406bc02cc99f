//! Key/value parsing of free-form resource tags

use std::collections::HashMap;

/// Tag key overriding the destination channel
pub const CHANNEL_TAG: &str = "channel";

/// Tag key naming the user to mention in the message
pub const ADMIN_TAG: &str = "admin";

/// Key/value view of a resource's tags
pub type ParsedTags = HashMap<String, String>;

/// Build a key/value map from `key:value` tags.
///
/// Tags without a colon are plain labels and are skipped. Only the first
/// colon separates key from value, so `url:https://x` maps `url` to
/// `https://x`. Later duplicates overwrite earlier ones.
pub fn parse_tags<S: AsRef<str>>(tags: &[S]) -> ParsedTags {
    tags.iter()
        .filter_map(|tag| tag.as_ref().split_once(':'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
