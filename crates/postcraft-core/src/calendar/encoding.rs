//! URI-component percent encoding for free-text calendar fields.
//!
//! The scheduling endpoint mangles special characters in `title` and `content`
//! unless they are sent percent-encoded, so reschedule requests encode them and
//! the returned list is decoded again.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left as-is, matching `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Decodes percent escapes. Text that does not decode to UTF-8 is returned unchanged.
pub fn decode_component(text: &str) -> String {
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| text.to_string())
}
