//! Extension trait for [`CacheBucket`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Provides `get_json`/`set_json` for serde-serializable types and
/// `get_string`/`set_string` for UTF-8 strings. Implemented as default
/// methods on an extension trait so [`CacheBucket`] stays object-safe and
/// implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use folio_cache::{Cache, CacheBucketExt, NullCache};
///
/// let cache = NullCache;
/// let bucket = cache.bucket("media");
///
/// bucket.set_string("block-1", "2025-01-01T00:00:00.000Z", "images/a.png");
/// assert_eq!(bucket.get_string("block-1", "2025-01-01T00:00:00.000Z"), None);
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve and decode a JSON value.
    ///
    /// Returns `None` on cache miss or etag mismatch, and `Some(Err(_))` when
    /// the stored bytes are not valid JSON for `T`, so callers can tell a
    /// corrupt entry from a missing one.
    fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
        etag: &str,
    ) -> Option<Result<T, serde_json::Error>> {
        let bytes = self.get(key, etag)?;
        Some(serde_json::from_slice(&bytes))
    }

    /// Store a value as JSON in the cache.
    fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        etag: &str,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, etag, &bytes);
        Ok(())
    }

    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on cache miss, etag mismatch, or invalid UTF-8.
    fn get_string(&self, key: &str, etag: &str) -> Option<String> {
        let bytes = self.get(key, etag)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value in the cache.
    fn set_string(&self, key: &str, etag: &str, value: &str) {
        self.set(key, etag, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
