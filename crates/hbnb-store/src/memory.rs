//! In-memory persistence backend.
//!
//! [`InMemoryBackend`] keeps the document in a byte buffer behind a
//! `RwLock`. It counts writes and can be switched into a failing mode, which
//! makes it the backend of choice for observing when the store persists.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::traits::Backend;

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryBackend {
    /// Create an empty backend; `read` returns `None` until the first write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds `data`.
    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: RwLock::new(Some(data.into())),
            ..Self::default()
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail with an I/O error (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// A copy of the current document.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.read().ok().and_then(|d| d.clone())
    }

    /// Overwrite the document directly, bypassing the write counter.
    pub fn replace_contents(&self, data: impl Into<Vec<u8>>) -> io::Result<()> {
        let mut guard = self.data.write().map_err(poisoned)?;
        *guard = Some(data.into());
        Ok(())
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> io::Error {
    io::Error::other(format!("lock poisoned: {e}"))
}

impl Backend for InMemoryBackend {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        let guard = self.data.read().map_err(poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, data: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "in-memory backend is failing writes",
            ));
        }
        let mut guard = self.data.write().map_err(poisoned)?;
        *guard = Some(data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
