//! Shared helpers for the in-crate tests.

use std::io::{Result as IoResult, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::config::Config;
use crate::session::{Session, SharedSink};

/// Memory-backed writer that stays readable after being handed to a
/// [`SharedSink`].
#[derive(Clone, Default)]
pub(crate) struct MemSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl Write for MemSink {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// A default-configured session writing into a readable memory sink.
pub(crate) fn mem_session() -> (Session, MemSink) {
    let sink = MemSink::new();
    let session = Session::new(SharedSink::new(sink.clone()), Config::default());
    (session, sink)
}

/// Serializes tests that read or change the process working directory.
pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX.get_or_init(|| Mutex::new(())).lock().unwrap()
}
