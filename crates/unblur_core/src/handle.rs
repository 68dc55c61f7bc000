use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;

pub type HandleId = u64;

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    live: AtomicUsize,
}

/// Allocates locally addressable handles for preview and result bytes.
///
/// Handles release themselves on drop, so the live count tracks exactly the
/// handles still owned somewhere in the session.
#[derive(Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<RegistryInner>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self, bytes: Bytes) -> ObjectHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.live.fetch_add(1, Ordering::Relaxed);
        ObjectHandle {
            id,
            bytes,
            registry: self.inner.clone(),
        }
    }

    /// Number of handles allocated and not yet dropped.
    pub fn live_count(&self) -> usize {
        self.inner.live.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owned reference to a byte buffer the presentation layer can render by id.
pub struct ObjectHandle {
    id: HandleId,
    bytes: Bytes,
    registry: Arc<RegistryInner>,
}

impl ObjectHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl Drop for ObjectHandle {
    fn drop(&mut self) {
        self.registry.live.fetch_sub(1, Ordering::Relaxed);
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectHandle {}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("id", &self.id)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}
