use std::io;

/// Byte-level persistence for one JSON document.
///
/// Implementations must satisfy:
/// - `read` returns `Ok(None)` when nothing has been persisted yet, and
///   `Err` only for real I/O failures.
/// - `write` replaces the whole document. A failed write must leave the
///   previously persisted document readable and intact.
/// - Handles are released on every exit path.
pub trait Backend: Send + Sync {
    /// Read the persisted document, if any.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the persisted document with `data`.
    fn write(&self, data: &[u8]) -> io::Result<()>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}
