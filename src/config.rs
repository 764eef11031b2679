/// Runtime configuration handed to a [`Session`](crate::Session) at
/// construction.
///
/// The interpreter has no command-line flags or configuration files; this
/// struct exists so the prompt and exit sentinel are explicit state instead of
/// globals, and so tests can run the loop with a distinctive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Text written to the output sink before every read.
    pub prompt: String,
    /// Literal line that terminates the input loop.
    pub exit_sentinel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            exit_sentinel: r"\quit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn default_prompt_and_sentinel() {
        let config = Config::default();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.exit_sentinel, r"\quit");
    }
}
