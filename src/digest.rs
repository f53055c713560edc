//! Content digests used to detect configuration file changes.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of `content` as a lowercase hex string.
///
/// The result is always 64 characters long. Empty input is valid.
///
/// # Examples
///
/// ```rust
/// use gateway_config::digest::content_digest;
///
/// let digest = content_digest(b"name: gateway");
/// assert_eq!(digest.len(), 64);
/// assert_eq!(digest, content_digest(b"name: gateway"));
/// ```
pub fn content_digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
