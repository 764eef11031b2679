//! The foreground input loop.

use crate::session::Session;
use crate::{jobs, pipeline};
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::BufRead;
use std::thread::JoinHandle;

/// Reads lines from `input`, writing the configured prompt to the session's
/// output sink before each read, until end-of-input or the exit sentinel.
///
/// Works over any line-readable byte stream; the binary uses
/// [`run_interactive`] instead when stdin is a terminal.
pub struct Repl<R> {
    session: Session,
    input: R,
}

impl<R: BufRead> Repl<R> {
    pub fn new(session: Session, input: R) -> Self {
        Self { session, input }
    }

    /// Drive the loop to completion.
    ///
    /// Returns `Ok(())` on end-of-input or the exit sentinel. A read failure
    /// (or a failure to write to the output sink) is fatal and propagates.
    pub fn run(mut self) -> Result<()> {
        loop {
            self.session.write_prompt().context("failed to write prompt")?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read input")?;
            if read == 0 {
                log::debug!("end of input");
                break;
            }

            let line = line.trim_end();
            if line == self.session.config().exit_sentinel {
                log::debug!("exit sentinel read");
                break;
            }
            // Background handles are detached; only tests wait on them.
            let _ = eval_line(&mut self.session, line)?;
        }
        Ok(())
    }
}

/// Dispatch one trimmed line: spawn a background job when it carries the `&`
/// marker, run it through the pipeline executor inline otherwise.
///
/// Returns the join handle of a spawned background job so tests can wait for
/// its completion markers.
pub(crate) fn eval_line(session: &mut Session, line: &str) -> Result<Option<JoinHandle<()>>> {
    if line.contains('&') {
        let stripped = line.strip_suffix('&').unwrap_or(line).trim_end();
        let handle = jobs::spawn(session.duplicate(), stripped.to_string());
        return Ok(Some(handle));
    }
    pipeline::run(session, line)?;
    Ok(None)
}

/// Interactive variant of [`Repl::run`] with line editing and history.
///
/// `rustyline` renders the prompt itself, so output goes to the terminal
/// rather than through the session sink. EOF (`Ctrl-D`) ends the loop like
/// end-of-input; `Ctrl-C` only cancels the current line.
pub fn run_interactive(mut session: Session) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    loop {
        let prompt = session.config().prompt.clone();
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim_end().to_string();
                if line == session.config().exit_sentinel {
                    break;
                }
                if !line.is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                let _ = eval_line(&mut session, &line)?;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        }
    }
    Ok(())
}
