//! The builtin dispatcher and the fixed set of built-in commands.
//!
//! Each builtin is a small struct built from its argument tokens after a
//! uniform arity check on the token count. Tokens are never interpreted as
//! options, so dash-prefixed arguments like `echo -n` or `kill -5` pass
//! through as plain text. Arity violations surface as descriptive errors
//! written to output; they never stop the input loop.

use crate::command::Command;
use crate::external;
use crate::session::Session;
use anyhow::{Context, Result, ensure};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// A command implemented directly by the interpreter.
///
/// Builtins write through [`Session::writer`], so their output lands in the
/// pipe buffer while a non-final pipeline stage runs and in the real sink
/// otherwise.
trait Builtin: Sized {
    /// Error reported when the argument list does not fit the arity.
    fn arity_error() -> &'static str;

    /// Whether `count` arguments fit this command's arity.
    fn accepts(count: usize) -> bool;

    /// Take ownership of the argument tokens. Only called after
    /// [`Builtin::accepts`] approved the count.
    fn build(args: Vec<String>) -> Self;

    fn execute(self, session: &mut Session, raw: &str) -> Result<()>;
}

/// Dispatch one pipeline stage.
///
/// A blank stage is a no-op. An unrecognized name produces a notice on the
/// real sink, not an error. Errors returned from here are command failures the
/// caller reports before moving on to the next stage.
pub(crate) fn dispatch(session: &mut Session, stage: &str) -> Result<()> {
    let Some(cmd) = Command::parse(stage) else {
        return Ok(());
    };
    match cmd.name.clone().as_str() {
        "cd" => run::<Cd>(session, cmd),
        "pwd" => run::<Pwd>(session, cmd),
        "echo" => run::<Echo>(session, cmd),
        "kill" => run::<Kill>(session, cmd),
        "ps" => run::<Ps>(session, cmd),
        "exec" => run::<Exec>(session, cmd),
        other => {
            writeln!(session.real_writer(), "unknown command '{other}'")?;
            Ok(())
        }
    }
}

/// Check the arity, build `T` from the token list and execute it.
fn run<T: Builtin>(session: &mut Session, cmd: Command) -> Result<()> {
    ensure!(T::accepts(cmd.args.len()), T::arity_error());
    T::build(cmd.args).execute(session, &cmd.raw)
}

/// Change the process working directory.
struct Cd {
    target: String,
}

impl Builtin for Cd {
    fn arity_error() -> &'static str {
        "cd must have 1 argument"
    }

    fn accepts(count: usize) -> bool {
        count == 1
    }

    fn build(mut args: Vec<String>) -> Self {
        Self {
            target: args.remove(0),
        }
    }

    fn execute(self, _session: &mut Session, _raw: &str) -> Result<()> {
        std::env::set_current_dir(&self.target)
            .with_context(|| format!("cd: {}", self.target))
    }
}

/// Print the absolute path of the current working directory.
struct Pwd;

impl Builtin for Pwd {
    fn arity_error() -> &'static str {
        "pwd must not have any arguments"
    }

    fn accepts(count: usize) -> bool {
        count == 0
    }

    fn build(_args: Vec<String>) -> Self {
        Self
    }

    fn execute(self, session: &mut Session, _raw: &str) -> Result<()> {
        let path = std::env::current_dir().context("pwd")?;
        writeln!(session.writer(), "{}", path.display())?;
        Ok(())
    }
}

/// Write the arguments to output, separated by single spaces.
struct Echo {
    args: Vec<String>,
}

impl Builtin for Echo {
    fn arity_error() -> &'static str {
        "echo must have 1+ argument"
    }

    fn accepts(count: usize) -> bool {
        count >= 1
    }

    fn build(args: Vec<String>) -> Self {
        Self { args }
    }

    fn execute(self, session: &mut Session, raw: &str) -> Result<()> {
        let first = &self.args[0];
        let last = &self.args[self.args.len() - 1];
        if first.starts_with('"') && last.ends_with('"') {
            // The whole argument text is quoted: print the interior of the
            // raw stage verbatim so internal whitespace survives.
            let interior = raw
                .trim_start()
                .strip_prefix("echo")
                .unwrap_or(raw)
                .trim_start();
            let interior = interior.strip_prefix('"').unwrap_or(interior);
            let interior = interior.strip_suffix('"').unwrap_or(interior);
            writeln!(session.writer(), "{interior}")?;
        } else {
            writeln!(session.writer(), "{}", self.args.join(" "))?;
        }
        Ok(())
    }
}

/// Send SIGTERM to every listed process id.
struct Kill {
    pids: Vec<String>,
}

impl Builtin for Kill {
    fn arity_error() -> &'static str {
        "kill must have 1+ argument"
    }

    fn accepts(count: usize) -> bool {
        count >= 1
    }

    fn build(args: Vec<String>) -> Self {
        Self { pids: args }
    }

    fn execute(self, session: &mut Session, _raw: &str) -> Result<()> {
        // Every argument is attempted; failures are collected and reported
        // together instead of short-circuiting. A negative id addresses a
        // process group, as the underlying kill(2) defines it.
        let mut failures = Vec::new();
        for arg in &self.pids {
            match arg.parse::<i32>() {
                Ok(pid) => {
                    log::debug!("sending SIGTERM to pid {pid}");
                    if let Err(errno) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
                        failures.push(format!("kill: pid {pid}: {errno}"));
                    }
                }
                Err(_) => failures.push(format!("kill: invalid process id '{arg}'")),
            }
        }
        for failure in &failures {
            writeln!(session.real_writer(), "{failure}")?;
        }
        Ok(())
    }
}

/// List running processes: pid, parent pid and executable name.
struct Ps;

impl Builtin for Ps {
    fn arity_error() -> &'static str {
        "ps must not have any arguments"
    }

    fn accepts(count: usize) -> bool {
        count == 0
    }

    fn build(_args: Vec<String>) -> Self {
        Self
    }

    fn execute(self, session: &mut Session, _raw: &str) -> Result<()> {
        let processes =
            procfs::process::all_processes().context("ps: failed to read process table")?;
        for process in processes {
            // A process may exit between enumeration and stat; skip it.
            let Ok(process) = process else { continue };
            let Ok(stat) = process.stat() else { continue };
            writeln!(
                session.writer(),
                "{}\t{}\t{}",
                stat.pid,
                stat.ppid,
                stat.comm
            )?;
        }
        Ok(())
    }
}

/// Launch an external program and wait for it to finish.
struct Exec {
    argv: Vec<String>,
}

impl Builtin for Exec {
    fn arity_error() -> &'static str {
        "exec must have 1+ argument"
    }

    fn accepts(count: usize) -> bool {
        count >= 1
    }

    fn build(args: Vec<String>) -> Self {
        Self { argv: args }
    }

    fn execute(self, session: &mut Session, _raw: &str) -> Result<()> {
        external::launch(session, &self.argv)
    }
}
