pub const DEFAULT_PROMPT: &str = "db > ";

/// Interpreter settings resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Printed before every line is read.
    pub prompt: String,
    /// Whether to greet the user before the first prompt.
    pub banner: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            banner: false,
        }
    }
}
