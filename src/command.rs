//! One pipeline stage split into a command name and argument tokens.

/// A command name plus its whitespace-separated arguments, together with the
/// raw stage text the tokens came from.
///
/// The raw text is kept because `echo` applies its whole-line quote check to
/// the original stage, not to the token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
    pub raw: String,
}

impl Command {
    /// Tokenize one stage by whitespace. Returns `None` for a blank stage,
    /// which the dispatcher treats as a no-op.
    pub fn parse(stage: &str) -> Option<Self> {
        let mut tokens = stage.split_whitespace();
        let name = tokens.next()?.to_string();
        let args = tokens.map(str::to_string).collect();
        Some(Self {
            name,
            args,
            raw: stage.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn parse_splits_on_any_whitespace() {
        let cmd = Command::parse("  echo  a\tb ").unwrap();
        assert_eq!(cmd.name, "echo");
        assert_eq!(cmd.args, vec!["a", "b"]);
        assert_eq!(cmd.raw, "  echo  a\tb ");
    }

    #[test]
    fn parse_blank_stage_is_none() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t "), None);
    }

    #[test]
    fn parse_name_only() {
        let cmd = Command::parse("pwd").unwrap();
        assert_eq!(cmd.name, "pwd");
        assert!(cmd.args.is_empty());
    }
}
