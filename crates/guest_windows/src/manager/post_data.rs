//! Request body headers for the first navigation of a new window

use crate::backend::{LoadUrlOptions, PostDataElement, Referrer};

const FORM_URLENCODED: &str = "content-type: application/x-www-form-urlencoded";

/// Content-type header for a request body
///
/// Empty bodies get no header. A body whose first element starts with a
/// `--boundary` line is multipart; everything else is URL-encoded form data.
pub fn content_type_header(post_data: &[PostDataElement]) -> Option<String> {
    let first = post_data.first()?;
    let front = String::from_utf8_lossy(first.bytes());

    Some(match multipart_boundary(&front) {
        Some(boundary) => format!("content-type: multipart/form-data; boundary={boundary}"),
        None => FORM_URLENCODED.to_string(),
    })
}

/// Boundary of a multipart body, read from its first line
///
/// The line must start with `--` and contain at least one character other
/// than `-`; trailing hyphens are not part of the boundary.
pub fn multipart_boundary(front: &str) -> Option<&str> {
    let rest = front.strip_prefix("--")?;
    let line = rest.split(|c| c == '\r' || c == '\n').next().unwrap_or_default();
    let boundary = line.trim_end_matches('-');
    (!boundary.is_empty()).then_some(boundary)
}

/// Load options for navigating a freshly created window
pub fn initial_load_options(referrer: Option<&Referrer>, post_data: Option<&[PostDataElement]>) -> LoadUrlOptions {
    LoadUrlOptions {
        referrer: referrer.cloned(),
        extra_headers: post_data.and_then(content_type_header),
        post_data: post_data.map(<[PostDataElement]>::to_vec),
    }
}
