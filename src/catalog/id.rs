//! Deterministic track id derivation.
//!
//! Ids are 64-bit FNV-1a digests rendered as 16 lowercase hex digits. Field
//! boundaries are separated by a NUL byte so `("ab", "c")` and `("a", "bc")`
//! hash differently.

use std::path::Path;

use super::model::TrackId;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(parts: &[&str]) -> u64 {
    let mut hash = FNV_OFFSET;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            // NUL byte: xor with 0 is a no-op, only the multiply remains.
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        for b in part.bytes() {
            hash ^= u64::from(b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Id used by the JSON store and the search producer.
pub fn genre_source_id(genre: &str, source: &str) -> TrackId {
    TrackId::new(format!("{:016x}", fnv1a(&[genre, source])))
}

/// Id used by the local filesystem producer.
pub fn path_id(path: &Path) -> TrackId {
    TrackId::new(format!("{:016x}", fnv1a(&[&path.to_string_lossy()])))
}
