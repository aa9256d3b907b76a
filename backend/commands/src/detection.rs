//! Prefix command detection: split a message into a command token and args.

/// A text command found at the start of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInvocation {
    /// The first token with the prefix removed.
    pub command: String,
    /// The remaining whitespace-separated tokens.
    pub args: Vec<String>,
}

/// Detect a prefix command in `content`.
///
/// Returns `None` when the first token does not start with `prefix`, or is
/// nothing but the prefix.
pub fn parse_invocation(content: &str, prefix: &str) -> Option<TextInvocation> {
    let mut tokens = content.split_whitespace();
    let command = tokens.next()?.strip_prefix(prefix)?;
    if command.is_empty() {
        return None;
    }

    Some(TextInvocation {
        command: command.to_string(),
        args: tokens.map(str::to_string).collect(),
    })
}
