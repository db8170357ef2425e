//! Peer Network Protocol
//!
//! A peer asks the owner of a key for its value with a single request:
//!
//! ```text
//! GET {base_path}{group}/{key}
//! ```
//!
//! `group` and `key` are percent-encoded path segments, so a key may itself
//! contain `/`. The owner answers `200` with the raw value as an
//! `application/octet-stream` body, `400` for a malformed path, `404` for an
//! unknown group and `500` with the error text when the lookup fails.

use crate::error::ServeError;

/// Prefix shared by every peer request.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Forces a base path into the `/segment/` shape.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// The URL prefix used to reach `peer`, e.g. `http://10.0.0.2:8008/_geecache/`.
pub fn peer_base_url(peer: &str, base_path: &str) -> String {
    format!("{}{}", peer.trim_end_matches('/'), base_path)
}

/// Full request URL for one `(group, key)` pair.
pub fn fetch_url(base_url: &str, group: &str, key: &str) -> String {
    format!(
        "{}{}/{}",
        base_url,
        urlencoding::encode(group),
        urlencoding::encode(key)
    )
}

/// Splits an inbound request path into its decoded `(group, key)`.
pub fn parse_peer_path(base_path: &str, path: &str) -> Result<(String, String), ServeError> {
    let rest = path
        .strip_prefix(base_path)
        .ok_or_else(|| ServeError::UnexpectedPath(path.to_string()))?;

    let (group, key) = rest.split_once('/').ok_or(ServeError::BadRequest)?;
    if group.is_empty() {
        return Err(ServeError::BadRequest);
    }

    Ok((decode_segment(group)?, decode_segment(key)?))
}

fn decode_segment(segment: &str) -> Result<String, ServeError> {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ServeError::BadEncoding(segment.to_string()))
}
