//! Splitting a raw command line into `argv`-style tokens.
//!
//! The rules are a merge of POSIX and Windows conventions:
//! - both single (`'`) and double (`"`) quotes enclose a string, and a quote of one
//!   kind is an ordinary character while the other kind is open;
//! - a backslash escapes whatever character follows it, inside quotes too;
//! - unquoted whitespace separates arguments.

/// Which kind of quoted string the scanner is currently inside.
///
/// A single value instead of one flag per quote type, so "inside both" cannot happen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteState {
    /// Not inside a quoted string.
    #[default]
    None,
    /// Inside `'...'`.
    SingleQuoted,
    /// Inside `"..."`.
    DoubleQuoted,
}

impl QuoteState {
    /// Returns `true` while a quoted string is open.
    pub fn is_active(self) -> bool {
        self != QuoteState::None
    }

    /// The state after seeing `ch`, or `None` if `ch` is not a quote character in this state.
    ///
    /// A `'` inside a double-quoted string (and vice versa) is not a quote character.
    pub fn toggled_by(self, ch: char) -> Option<QuoteState> {
        match (self, ch) {
            (QuoteState::None, '\'') => Some(QuoteState::SingleQuoted),
            (QuoteState::SingleQuoted, '\'') => Some(QuoteState::None),
            (QuoteState::None, '"') => Some(QuoteState::DoubleQuoted),
            (QuoteState::DoubleQuoted, '"') => Some(QuoteState::None),
            _ => None,
        }
    }
}

struct ArgvFSM {
    input: Vec<char>,
    pos: usize,
    quote: QuoteState,
    inside_arg: bool,
    buffer: String,
}

impl ArgvFSM {
    fn new(line: &str) -> Self {
        ArgvFSM {
            input: line.chars().collect(),
            pos: 0,
            quote: QuoteState::None,
            inside_arg: false,
            buffer: String::new(),
        }
    }

    fn make_argv(mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match ch {
                '\\' => self.handle_escape(),
                c if c.is_whitespace() && !self.quote.is_active() => self.finish_arg(&mut out),
                c => self.handle_char(c),
            }
        }

        // An unterminated quote simply keeps the rest of the line in the last argument.
        self.finish_arg(&mut out);
        out
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_escape(&mut self) {
        // A lone trailing backslash is kept as a literal backslash.
        let escaped = self.read_char().unwrap_or('\\');
        self.buffer.push(escaped);
        self.inside_arg = true;
    }

    fn handle_char(&mut self, ch: char) {
        if let Some(next) = self.quote.toggled_by(ch) {
            self.quote = next;
            self.inside_arg = true;
            return;
        }
        self.buffer.push(ch);
        self.inside_arg = true;
    }

    fn finish_arg(&mut self, out: &mut Vec<String>) {
        if self.inside_arg {
            out.push(std::mem::take(&mut self.buffer));
            self.inside_arg = false;
        }
    }
}

/// Splits `command_line` into its arguments, removing quotes and escapes.
///
/// Never fails: an unterminated quote makes the rest of the input part of the
/// last token, and adjacent quoted segments (`'it''s'`) merge into one token.
///
/// ```
/// use shell_args::tokenize;
/// assert_eq!(tokenize(r#"cp "my file" backup\ dir"#), ["cp", "my file", "backup dir"]);
/// ```
pub fn tokenize(command_line: &str) -> Vec<String> {
    let argv = ArgvFSM::new(command_line).make_argv();
    tracing::trace!(tokens = argv.len(), "tokenized command line");
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_words() {
        assert_eq!(tokenize("foo bar"), vec!["foo", "bar"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  \n").is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_dropped() {
        assert_eq!(tokenize("   ls\t-la   /tmp  "), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_double_quotes_keep_spaces() {
        assert_eq!(tokenize(r#""foo bar" baz"#), vec!["foo bar", "baz"]);
    }

    #[test]
    fn test_escaped_space() {
        assert_eq!(tokenize(r"foo\ bar baz"), vec!["foo bar", "baz"]);
    }

    #[test]
    fn test_adjacent_quoted_segments_merge() {
        assert_eq!(tokenize("'it''s' a"), vec!["its", "a"]);
        assert_eq!(tokenize(r#"pre"fix"'post' next"#), vec!["prefixpost", "next"]);
    }

    #[test]
    fn test_quote_types_do_not_nest() {
        assert_eq!(tokenize(r#""it's here" x"#), vec!["it's here", "x"]);
        assert_eq!(tokenize(r#"'say "hi"' x"#), vec![r#"say "hi""#, "x"]);
    }

    #[test]
    fn test_escape_inside_quotes() {
        assert_eq!(tokenize(r#""a \" b""#), vec![r#"a " b"#]);
        assert_eq!(tokenize(r"'a \' b'"), vec!["a ' b"]);
    }

    #[test]
    fn test_escaped_quotes_outside_quotes() {
        assert_eq!(tokenize(r#"a\"b"#), vec![r#"a"b"#]);
        assert_eq!(tokenize(r"it\'s fine"), vec!["it's", "fine"]);
    }

    #[test]
    fn test_escaped_backslash() {
        assert_eq!(tokenize(r"C:\\dir x"), vec![r"C:\dir", "x"]);
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        assert_eq!(tokenize(r"foo bar\"), vec!["foo", r"bar\"]);
        assert_eq!(tokenize(r"\"), vec![r"\"]);
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        assert_eq!(tokenize(r#"echo "hello   world"#), vec!["echo", "hello   world"]);
        assert_eq!(tokenize("echo 'a b"), vec!["echo", "a b"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_token() {
        assert_eq!(tokenize(r#"a "" b ''"#), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_unicode_content() {
        assert_eq!(tokenize("héllo 'wörld ü'"), vec!["héllo", "wörld ü"]);
    }

    #[test]
    fn test_quote_state_toggles() {
        assert_eq!(QuoteState::None.toggled_by('"'), Some(QuoteState::DoubleQuoted));
        assert_eq!(QuoteState::DoubleQuoted.toggled_by('\''), None);
        assert_eq!(QuoteState::SingleQuoted.toggled_by('"'), None);
        assert_eq!(QuoteState::SingleQuoted.toggled_by('\''), Some(QuoteState::None));
        assert_eq!(QuoteState::None.toggled_by('x'), None);
    }
}
