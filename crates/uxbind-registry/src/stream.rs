//! In-memory stream subsystem.
//!
//! [`StreamTable`] stands in for the scripting runtime's stream objects:
//! byte buffers registered under a [`StreamHandle`]. String values are
//! treated as filesystem paths when the configuration allows it.

use std::fs::File;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;
use uxbind_core::{Dynamic, MarshalConfig, ResourceError, StreamHandle, StreamProvider};

/// Stream handles backed by shared byte buffers.
#[derive(Debug, Default)]
pub struct StreamTable {
    next: AtomicU64,
    streams: RwLock<FxHashMap<StreamHandle, Arc<[u8]>>>,
    /// Successful opens, handles and paths alike
    opens: AtomicUsize,
}

impl StreamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buffer and return its handle.
    pub fn register(&self, bytes: impl Into<Arc<[u8]>>) -> StreamHandle {
        let handle = StreamHandle(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        self.streams.write().insert(handle, bytes.into());
        handle
    }

    /// Forget a handle. Readers already open keep their buffer.
    pub fn close(&self, handle: StreamHandle) -> bool {
        self.streams.write().remove(&handle).is_some()
    }

    pub fn contains(&self, handle: StreamHandle) -> bool {
        self.streams.read().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.streams.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.read().is_empty()
    }

    /// Number of streams opened so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }
}

impl StreamProvider for StreamTable {
    fn open<'a>(
        &'a self,
        source: &Dynamic,
        config: &MarshalConfig,
    ) -> Result<Box<dyn Read + 'a>, ResourceError> {
        let reader: Box<dyn Read + 'a> = match source {
            Dynamic::Stream(handle) => {
                let bytes = self
                    .streams
                    .read()
                    .get(handle)
                    .cloned()
                    .ok_or(ResourceError::UnknownHandle(*handle))?;
                trace!(%handle, len = bytes.len(), "open stream");
                Box::new(Cursor::new(bytes))
            }
            Dynamic::String(path) => {
                if !config.allow_path_streams {
                    return Err(ResourceError::PathsDisabled { path: path.clone() });
                }
                trace!(path = %path, "open path stream");
                Box::new(File::open(path)?)
            }
            other => {
                return Err(ResourceError::Unsupported {
                    kind: other.type_name(),
                });
            }
        };
        self.opens.fetch_add(1, Ordering::Relaxed);
        Ok(reader)
    }
}
