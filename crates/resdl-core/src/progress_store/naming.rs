//! URL → progress-store file name mapping.

use sha2::{Digest, Sha256};

/// Maps a URL to the file name of its progress record.
///
/// Implementations must be deterministic: the same URL always yields the same
/// name, or a later run cannot find the record to resume from.
pub trait StoreNaming: Send + Sync {
    fn store_file_name(&self, url: &str) -> String;
}

/// Lowercase hex SHA-256 of the URL bytes plus `.resdl`.
///
/// Fixed length, filesystem-safe for any URL, and collision-resistant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Naming;

/// Extension of progress-store files.
pub const STORE_EXTENSION: &str = "resdl";

impl StoreNaming for Sha256Naming {
    fn store_file_name(&self, url: &str) -> String {
        let digest = Sha256::digest(url.as_bytes());
        format!("{}.{}", hex::encode(digest), STORE_EXTENSION)
    }
}
