//! Fire-and-forget background execution.
//!
//! A background-marked line runs on its own thread against a duplicated
//! [`Session`], so it owns a private pipe buffer and cannot disturb the
//! foreground pipeline state. The thread writes a start marker, runs the line
//! through the pipeline executor, writes a completion marker and exits.
//!
//! Job numbers are local to each spawned path and start at 1, so two jobs
//! started in close succession both report `[1]`. This mirrors the historical
//! behavior and is a documented limitation; there is no shared job table.

use crate::pipeline;
use crate::session::Session;
use std::thread::{self, JoinHandle};

/// Run `line` on an independent thread owning `session`.
///
/// The input loop drops the returned handle; it exists so tests can wait for
/// a job to finish.
pub(crate) fn spawn(mut session: Session, line: String) -> JoinHandle<()> {
    thread::spawn(move || {
        let id = 1u32; // per-path numbering, see module docs
        let pid = std::process::id();

        log::debug!("background job [{id}] started: {line}");
        if writeln!(session.real_writer(), "[{id}]\t{pid}").is_err() {
            log::warn!("background job [{id}]: output sink is gone");
            return;
        }
        if let Err(err) = pipeline::run(&mut session, &line) {
            let _ = session.report(&err);
        }
        if writeln!(session.real_writer(), "[{id}]+\tDone").is_err() {
            log::warn!("background job [{id}]: output sink is gone");
        }
        log::debug!("background job [{id}] finished");
    })
}
