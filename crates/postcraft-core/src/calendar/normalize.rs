//! Turns raw calendar payloads into `ScheduledPost` lists.
//!
//! The read endpoint wraps every entry as `{"calendar_list": {...}}` while the
//! reschedule endpoint and error bodies carry bare entries. A field with an
//! unexpected type is dropped on its own; only non-object items are skipped.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::encoding::decode_component;
use super::model::{PostId, PostStatus, ScheduledPost, parse_post_date};

/// Whether free-text fields arrive percent-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Plain,
    UriComponent,
}

fn text_field(entry: &Map<String, Value>, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => {
            tracing::warn!(field = key, "Ignoring non-text calendar field: {}", other);
            None
        }
    }
}

fn id_field(entry: &Map<String, Value>) -> Option<PostId> {
    match entry.get("id")? {
        Value::Null => None,
        Value::Number(number) => Some(
            number
                .as_i64()
                .map(PostId::Number)
                .unwrap_or_else(|| PostId::Text(number.to_string())),
        ),
        Value::String(text) => Some(PostId::Text(text.clone())),
        other => {
            tracing::warn!("Ignoring calendar entry id of unexpected type: {}", other);
            None
        }
    }
}

fn parse_entry(entry: &Map<String, Value>, encoding: TextEncoding) -> ScheduledPost {
    let text = |key: &str| {
        let value = text_field(entry, key);
        match encoding {
            TextEncoding::Plain => value,
            TextEncoding::UriComponent => value.map(|value| decode_component(&value)),
        }
    };
    ScheduledPost {
        id: id_field(entry),
        date: text_field(entry, "date").as_deref().and_then(parse_post_date),
        status: text_field(entry, "status")
            .map(PostStatus::from)
            .unwrap_or_else(|| PostStatus::Other("unknown".to_string())),
        title: text("title"),
        content: text("content"),
        summary: text_field(entry, "summary"),
        image_url: text_field(entry, "image_url").filter(|url| !url.trim().is_empty()),
    }
}

/// Parses a post list item by item. An item whose `calendar_list` holds an
/// object is unwrapped; any other object is read as a bare entry.
pub fn posts_from_items(items: Vec<Value>, encoding: TextEncoding) -> Vec<ScheduledPost> {
    items
        .iter()
        .filter_map(|item| {
            let Value::Object(object) = item else {
                tracing::warn!("Skipping calendar item that is not an object");
                return None;
            };
            match object.get("calendar_list") {
                Some(Value::Object(entry)) => Some(parse_entry(entry, encoding)),
                Some(_) => {
                    tracing::warn!("Skipping calendar item with a malformed calendar_list");
                    None
                }
                None => Some(parse_entry(object, encoding)),
            }
        })
        .collect()
}

/// Orders dated posts ascending. Undated posts keep their positions.
///
/// Dated posts are sorted stably among the slots they already occupy, so
/// equal dates keep their relative order and the result is deterministic.
pub fn sort_by_date(posts: &mut [ScheduledPost]) {
    let slots: Vec<usize> = posts
        .iter()
        .enumerate()
        .filter(|(_, post)| post.date.is_some())
        .map(|(index, _)| index)
        .collect();

    let mut dated: Vec<ScheduledPost> = slots.iter().map(|&index| posts[index].clone()).collect();
    dated.sort_by_key(|post| post.date);

    for (slot, post) in slots.into_iter().zip(dated) {
        posts[slot] = post;
    }
}

/// Posts shown in list and grid views.
pub fn visible_posts(posts: &[ScheduledPost]) -> impl Iterator<Item = &ScheduledPost> {
    posts.iter().filter(|post| post.status.is_visible())
}

/// Visible posts scheduled on `date`.
pub fn posts_on(posts: &[ScheduledPost], date: NaiveDate) -> Vec<&ScheduledPost> {
    visible_posts(posts)
        .filter(|post| post.date == Some(date))
        .collect()
}
