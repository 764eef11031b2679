//! A tiny interactive command interpreter.
//!
//! This crate implements a toy shell: a line-oriented input loop over a small
//! fixed set of built-in commands (`cd`, `pwd`, `echo`, `kill`, `ps`, `exec`),
//! an external process launcher behind the `exec` builtin, splice-style
//! pipelines and fire-and-forget background execution marked by a trailing `&`.
//!
//! The main entry points are [`Session`], which carries the output sink and
//! pipeline state for one execution path, and [`Repl`], the foreground loop
//! that reads lines from any [`std::io::BufRead`] source. Background jobs run
//! on their own threads against a [`Session::duplicate`] so they never touch
//! the foreground pipeline buffer.

mod builtin;
pub mod command;
pub mod config;
mod external;
mod jobs;
mod pipeline;
pub mod repl;
pub mod session;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::Config;
pub use repl::Repl;
pub use session::{Session, SharedSink};
