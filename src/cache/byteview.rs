use bytes::Bytes;
use std::fmt;

use super::eviction::Value;

/// An immutable view over a cached payload.
///
/// Cloning a `ByteView` only bumps a reference count; the underlying bytes are
/// never mutated after construction. Callers that need an owned, mutable buffer
/// go through [`ByteView::byte_slice`], which always copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Copies `data` into a fresh view, so later changes to the source are not observed.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a defensive copy of the payload.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns a shared handle on the payload without copying it.
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

impl Value for ByteView {
    fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&'static str> for ByteView {
    fn from(value: &'static str) -> Self {
        Self::new(Bytes::from_static(value.as_bytes()))
    }
}

impl From<String> for ByteView {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}
