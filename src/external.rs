//! Launching external programs for the `exec` builtin.

use crate::session::Session;
use anyhow::{Context, Result, anyhow, bail};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Launch `argv[0]` with the remaining arguments and wait for it.
///
/// The child inherits the parent's stderr; its stdout is captured and written
/// to the session's active output target, so a non-final pipeline stage feeds
/// the pipe buffer. Spawn failures and non-zero or abnormal exits come back as
/// errors for the caller to report; they never abort the enclosing pipeline.
pub(crate) fn launch(session: &mut Session, argv: &[String]) -> Result<()> {
    let name = &argv[0];
    let search_paths = std::env::var_os("PATH").unwrap_or_default();
    let path = find_command_path(&search_paths, Path::new(name))
        .ok_or_else(|| anyhow!("{name}: executable not found"))?;

    log::debug!("spawning {}", path.display());
    let child = std::process::Command::new(path.as_ref())
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("{name}: failed to start"))?;

    let output = child
        .wait_with_output()
        .with_context(|| format!("{name}: failed to wait"))?;
    session.writer().write_all(&output.stdout)?;

    if !output.status.success() {
        bail!("{name}: exited with status {}", exit_code(output.status));
    }
    Ok(())
}

fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returned if it exists.
/// - Relative with multiple components (e.g. `bin/sh`): returned if it exists.
/// - `./foo` on Unix or any `./`-prefixed path elsewhere: returned if it exists.
/// - Single component: the first existing match in `search_paths` (PATH).
/// - Empty path: `None`.
pub(crate) fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(search_paths) {
        let path = dir.join(cmd);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
