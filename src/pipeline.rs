//! Splitting an input line into pipeline stages and running them in order.
//!
//! Piping here is splice-based, not stream-based: each non-final stage writes
//! into the session's pipe buffer, and the captured text is inserted into the
//! next stage's token list (as its second token) before that stage is
//! dispatched. Splitting on `|` does not respect quoting, so a quoted `|`
//! still separates stages.

use crate::builtin;
use crate::session::Session;
use anyhow::Result;

/// Execute one preprocessed input line.
///
/// Stage errors are reported to the real sink and do not abort the remaining
/// stages; only failures to write the report itself propagate out.
pub(crate) fn run(session: &mut Session, line: &str) -> Result<()> {
    let stages: Vec<&str> = line.split('|').collect();
    if stages.len() == 1 {
        if let Err(err) = builtin::dispatch(session, line) {
            session.report(&err)?;
        }
        return Ok(());
    }

    let last = stages.len() - 1;
    session.enter_pipe();
    for (index, stage) in stages.iter().enumerate() {
        let text = if index == 0 {
            (*stage).to_string()
        } else {
            splice(stage, &session.captured())
        };
        session.reset_pipe_buf();
        if index == last {
            session.leave_pipe();
        }
        if let Err(err) = builtin::dispatch(session, &text) {
            session.report(&err)?;
        }
    }
    Ok(())
}

/// Insert the previous stage's captured output into this stage's token list:
/// it replaces the second token when there is more than one, and is appended
/// as the second token otherwise.
fn splice(stage: &str, captured: &str) -> String {
    let mut tokens: Vec<&str> = stage.split_whitespace().collect();
    if tokens.len() > 1 {
        tokens.truncate(1);
    }
    tokens.push(captured);
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{lock_current_dir, mem_session};

    #[test]
    fn splice_replaces_second_token() {
        assert_eq!(splice("echo x y", "prev"), "echo prev");
    }

    #[test]
    fn splice_appends_to_single_token() {
        assert_eq!(splice("echo", "prev"), "echo prev");
    }

    #[test]
    fn single_command_writes_to_real_sink() {
        let (mut session, sink) = mem_session();
        run(&mut session, "echo hello world").unwrap();
        assert_eq!(sink.contents(), "hello world\n");
        assert!(!session.in_pipe());
    }

    #[test]
    fn captured_output_feeds_next_stage() {
        let (mut session, sink) = mem_session();
        // Second stage has >1 token: its own "x y" is replaced by the
        // captured "a b".
        run(&mut session, "echo a b | echo x y").unwrap();
        assert_eq!(sink.contents(), "a b\n");
    }

    #[test]
    fn captured_output_appended_when_stage_has_one_token() {
        let _lock = lock_current_dir();
        let (mut session, sink) = mem_session();
        run(&mut session, "pwd | echo").unwrap();
        let expected = format!("{}\n", std::env::current_dir().unwrap().display());
        assert_eq!(sink.contents(), expected);
    }

    #[test]
    fn quoted_echo_feeds_pipeline() {
        let (mut session, sink) = mem_session();
        run(&mut session, r#"echo "a  b c"| echo x"#).unwrap();
        // Splicing re-tokenizes, so runs of whitespace in the captured text
        // collapse in the final stage.
        assert_eq!(sink.contents(), "a b c\n");
    }

    #[test]
    fn space_before_pipe_keeps_trailing_quote() {
        let (mut session, sink) = mem_session();
        run(&mut session, r#"echo "a b" | echo x"#).unwrap();
        // The first stage's text ends in a space, so echo finds no trailing
        // quote to strip and the quote flows into the next stage.
        assert_eq!(sink.contents(), "a b\"\n");
    }

    #[test]
    fn stage_error_reported_and_later_stages_still_run() {
        let _lock = lock_current_dir();
        let (mut session, sink) = mem_session();
        run(&mut session, "cd | pwd").unwrap();
        let out = sink.contents();
        assert!(out.contains("cd must have 1 argument"));
        // The failed stage captured nothing, but pwd still ran.
        let cwd = std::env::current_dir().unwrap().display().to_string();
        assert!(out.contains(&cwd));
        assert!(!session.in_pipe());
    }

    #[test]
    fn session_leaves_pipe_mode_after_final_stage() {
        let (mut session, _sink) = mem_session();
        run(&mut session, "echo a | echo b | echo c").unwrap();
        assert!(!session.in_pipe());
        assert_eq!(session.captured(), "");
    }

    #[test]
    fn three_stage_pipeline_forwards_last_capture() {
        let (mut session, sink) = mem_session();
        run(&mut session, "echo one | echo two three | echo four five").unwrap();
        // Each splice keeps only the leading token of the next stage.
        assert_eq!(sink.contents(), "one\n");
    }
}
