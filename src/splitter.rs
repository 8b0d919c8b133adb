//! Locating argument boundaries without unquoting them.
//!
//! Unlike [`tokenize`](crate::tokenize), the functions here return raw spans of the
//! input: quotes and backslashes stay in place. This is what a launcher needs when
//! only the first few arguments matter and the rest must be passed through verbatim.
//!
//! All positions are byte offsets into the input string.

use crate::tokenizer::QuoteState;

/// Skips whitespace starting at `from` and returns the offset of the next argument.
///
/// Returns `None` if only whitespace remains, or if `from` is past the end or not on
/// a character boundary.
pub fn find_argument_start(s: &str, from: usize) -> Option<usize> {
    s.get(from..)?
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(offset, _)| from + offset)
}

/// Finds the inclusive end of the argument that starts at `from`.
///
/// The returned offset points at the first byte of the argument's last character.
/// A backslash always consumes itself and the following character, quotes toggle
/// exactly like in [`tokenize`](crate::tokenize), and the first unquoted whitespace
/// ends the argument. Running off the end of the input ends it as well; a trailing
/// backslash then becomes the last character of the span.
///
/// Returns `None` when there is no argument at `from` (out of range, not a character
/// boundary, or unquoted whitespace).
pub fn find_argument_end(s: &str, from: usize) -> Option<usize> {
    let rest = s.get(from..)?;
    let mut quote = QuoteState::None;
    let mut last = None;
    let mut chars = rest.char_indices();

    while let Some((offset, ch)) = chars.next() {
        if ch == '\\' {
            last = Some(from + offset);
            if let Some((escaped, _)) = chars.next() {
                last = Some(from + escaped);
            }
            continue;
        }
        if ch.is_whitespace() && !quote.is_active() {
            break;
        }
        if let Some(next) = quote.toggled_by(ch) {
            quote = next;
        }
        last = Some(from + offset);
    }

    last
}

/// Splits `command_line` into at most `max_tokens` raw arguments.
///
/// When the token about to be produced would be the `max_tokens`-th one, the whole
/// untouched remainder of the line (from that argument's start to the end) becomes
/// the final token. `None` or `Some(0)` means no limit. If the line holds fewer
/// arguments than the limit, fewer tokens are returned.
///
/// ```
/// use shell_args::split_bounded;
/// assert_eq!(split_bounded("ssh host 'ls -l' | wc", Some(2)), ["ssh", "host 'ls -l' | wc"]);
/// ```
pub fn split_bounded(command_line: &str, max_tokens: Option<usize>) -> Vec<String> {
    let limit = max_tokens.filter(|&n| n > 0);
    let mut out = Vec::new();
    let mut next_start = 0;

    while let Some(start) = find_argument_start(command_line, next_start) {
        if limit == Some(out.len() + 1) {
            out.push(command_line[start..].to_string());
            break;
        }
        let Some(end) = find_argument_end(command_line, start) else {
            break;
        };
        next_start = char_end(command_line, end);
        out.push(command_line[start..next_start].to_string());
    }

    tracing::trace!(tokens = out.len(), ?limit, "split command line");
    out
}

/// Exclusive end of the character starting at byte `idx`.
fn char_end(s: &str, idx: usize) -> usize {
    idx + s[idx..].chars().next().map_or(0, char::len_utf8)
}
