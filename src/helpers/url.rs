//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Link to one temp page under the index route
///
/// # Examples
/// ```ignore
/// temp_url("/t", "hello world") // -> "/t/hello%20world"
/// ```
pub fn temp_url(route: &str, slug: &str) -> String {
    format!(
        "{}/{}",
        route.trim_end_matches('/'),
        encode_segment(slug)
    )
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
