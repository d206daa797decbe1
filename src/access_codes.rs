//! Deterministic access-code derivation.
//!
//! Pure functions, no stored state: the same inputs always yield the same
//! code, so a school's code, QR payload and parent invite link can be
//! re-derived anywhere without a lookup.

use sha2::{Digest, Sha256};

/// Derives a school access code of the form `TG-XXXXXX`.
///
/// The school name is normalized the same way role ids are (lowercased,
/// whitespace stripped) before hashing, so casing and spacing variants of
/// the same name produce the same code.
///
/// ```rust
/// use taste_grow_content_core::access_codes::school_code;
///
/// let code = school_code("Griffith Primary", 2026);
/// assert_eq!(code, school_code("  griffith  PRIMARY", 2026));
/// assert!(code.starts_with("TG-"));
/// assert_eq!(code.len(), 9);
/// ```
pub fn school_code(name: &str, year: u32) -> String {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let digest = Sha256::digest(format!("{normalized}:{year}").as_bytes());
    format!("TG-{}", hex::encode_upper(&digest[..3]))
}

/// Derives the QR payload id for a school code: `qr_` plus the first 16 hex
/// chars of the code's SHA-256.
pub fn qr_token(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    format!("qr_{}", &hex::encode(digest)[..16])
}

/// Builds the parent invite link for a school code. A trailing slash on the
/// base URL is trimmed so the path never doubles up.
pub fn parent_link(base_url: &str, code: &str) -> String {
    format!("{}/join/{}?src=parent", base_url.trim_end_matches('/'), code)
}
