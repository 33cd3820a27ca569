//! Content calendar: scheduled posts, normalization and write requests.
pub mod encoding;
pub mod model;
pub mod mutation;
pub mod normalize;

pub use encoding::{decode_component, encode_component};
pub use model::{PostId, PostStatus, ScheduledPost, parse_post_date};
pub use mutation::{CalendarMutation, SCHEDULED_POST_TITLE, validate_schedule_date};
pub use normalize::{TextEncoding, posts_from_items, posts_on, sort_by_date, visible_posts};
