//! Discord markdown escaping for relayed game text.

use fancy_regex::Regex;

use crate::game::formatter::split_message;

/// Escapes Discord markdown while leaving mentions intact.
#[derive(Debug, Clone)]
pub struct MarkdownEscaper {
    /// Pattern for user, role and channel mentions.
    mention_pattern: Regex,
    /// Whether to enable markdown (disable escaping).
    enable_markdown: bool,
}

impl Default for MarkdownEscaper {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MarkdownEscaper {
    pub fn new(enable_markdown: bool) -> Self {
        Self {
            mention_pattern: Regex::new(r"<@[!&]?\d+>|<#\d+>").expect("Invalid regex"),
            enable_markdown,
        }
    }

    /// Escape markdown characters outside of mentions.
    pub fn escape(&self, message: &str) -> String {
        if self.enable_markdown {
            return message.to_string();
        }

        let mut result = String::with_capacity(message.len());
        let mut last_end = 0;

        for m in self.mention_pattern.find_iter(message).flatten() {
            result.push_str(&escape_markdown(&message[last_end..m.start()]));
            result.push_str(m.as_str());
            last_end = m.end();
        }
        result.push_str(&escape_markdown(&message[last_end..]));
        result
    }

    /// Escape `message`, then split it into chunks of at most `max_len` bytes.
    ///
    /// An escaping backslash always stays in the same chunk as the character
    /// it escapes.
    pub fn escape_chunks(&self, message: &str, max_len: usize) -> Vec<String> {
        if self.enable_markdown {
            return split_message(message, max_len);
        }

        let escaped = self.escape(message);
        // One byte of headroom for a backslash carried over from the previous chunk.
        let pieces = split_message(&escaped, max_len.max(2) - 1);

        let mut chunks = Vec::with_capacity(pieces.len());
        let mut carry = false;
        for piece in pieces {
            let mut chunk = if carry { format!("\\{}", piece) } else { piece };
            let trailing = chunk.len() - chunk.trim_end_matches('\\').len();
            carry = trailing % 2 == 1;
            if carry {
                chunk.pop();
            }
            if !chunk.is_empty() {
                chunks.push(chunk);
            }
        }
        chunks
    }
}

/// Backslash-escape the characters Discord treats as formatting.
pub fn escape_markdown(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '~' | '|' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
