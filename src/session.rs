use std::io::{Result as IoResult, Write};
use std::sync::{Arc, Mutex};

use crate::config::Config;

/// Cloneable handle to the shell's real output target.
///
/// The foreground loop and every background job hold clones of the same sink.
/// A mutex serializes individual write calls, so output from concurrent
/// execution paths may interleave at write granularity; ordering across paths
/// is unspecified and accepted.
#[derive(Clone)]
pub struct SharedSink {
    inner: Arc<Mutex<dyn Write + Send>>,
}

impl SharedSink {
    /// Wrap any writer as a shared output sink.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, dyn Write + Send + 'static> {
        // A poisoned sink still holds a usable writer.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Write for SharedSink {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.lock().write(data)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.lock().flush()
    }
}

/// Mutable context for one execution path: the foreground loop or a single
/// background job.
///
/// A session owns the in-pipe flag and the buffer that captures a pipeline
/// stage's output for splicing into the next stage. Exactly one pipeline runs
/// synchronously per session; concurrency exists only across independent
/// sessions created by [`Session::duplicate`].
pub struct Session {
    out: SharedSink,
    in_pipe: bool,
    pipe_buf: Vec<u8>,
    config: Config,
}

impl Session {
    /// Create a session writing to `out`.
    pub fn new(out: SharedSink, config: Config) -> Self {
        Self {
            out,
            in_pipe: false,
            pipe_buf: Vec::new(),
            config,
        }
    }

    /// Copy this session for a background job: the same output sink, a fresh
    /// private pipe buffer, and the in-pipe flag cleared.
    pub fn duplicate(&self) -> Self {
        Self {
            out: self.out.clone(),
            in_pipe: false,
            pipe_buf: Vec::new(),
            config: self.config.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The active output target: the pipe buffer while a non-final pipeline
    /// stage runs, the real sink otherwise.
    pub fn writer(&mut self) -> &mut dyn Write {
        if self.in_pipe {
            &mut self.pipe_buf
        } else {
            &mut self.out
        }
    }

    /// The real output target, regardless of pipeline state. Prompts, error
    /// reports and job markers always go here.
    pub fn real_writer(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    /// Write the configured prompt to the real sink.
    pub(crate) fn write_prompt(&mut self) -> IoResult<()> {
        let prompt = self.config.prompt.clone();
        let out = self.real_writer();
        out.write_all(prompt.as_bytes())?;
        out.flush()
    }

    /// Report a command error to the real sink and keep going.
    pub(crate) fn report(&mut self, err: &anyhow::Error) -> IoResult<()> {
        writeln!(self.real_writer(), "{err:#}")
    }

    /// Whether a non-final pipeline stage is currently capturing output.
    pub fn in_pipe(&self) -> bool {
        self.in_pipe
    }

    /// Mark the start of a pipeline: stage output is captured from here on.
    pub(crate) fn enter_pipe(&mut self) {
        self.in_pipe = true;
        self.pipe_buf.clear();
    }

    /// Mark the final stage: output goes to the real sink again.
    pub(crate) fn leave_pipe(&mut self) {
        self.in_pipe = false;
    }

    /// Reset the capture buffer before dispatching a stage.
    pub(crate) fn reset_pipe_buf(&mut self) {
        self.pipe_buf.clear();
    }

    /// The previous stage's captured output.
    pub(crate) fn captured(&self) -> String {
        String::from_utf8_lossy(&self.pipe_buf).into_owned()
    }
}
