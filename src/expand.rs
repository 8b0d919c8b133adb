//! Environment variable expansion.
//!
//! Recognized references are `$NAME`, `${NAME}`, `$(NAME)` and, with
//! [`Platform::Windows`], `%NAME%`. A name is a run of ASCII letters, digits and
//! underscores. A backslash in front of `$` (or `%` on Windows) produces the trigger
//! character literally.
//!
//! Expansion is a single left-to-right pass: substituted values are never scanned
//! again. References that cannot be expanded (unknown name, empty name, missing
//! closing bracket) are copied to the output exactly as written.

use std::fmt;
use std::str::FromStr;

/// Which variable reference syntax is recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Platform {
    /// `$NAME`, `${NAME}` and `$(NAME)`.
    #[default]
    Posix,
    /// Everything [`Platform::Posix`] accepts plus `%NAME%`.
    Windows,
}

impl Platform {
    /// The flavor matching the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    fn is_trigger(self, byte: u8) -> bool {
        byte == b'$' || (byte == b'%' && self == Platform::Windows)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Posix => write!(f, "posix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// Error returned when parsing an unknown platform name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform `{0}` (expected `posix` or `windows`)")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posix" | "unix" | "linux" => Ok(Platform::Posix),
            "windows" | "win" => Ok(Platform::Windows),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// Delimiter style of a reference, decided by the characters right after the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    None,
    Parenthesis,
    Curly,
    Percent,
}

impl Bracket {
    fn closing(self) -> Option<u8> {
        match self {
            Bracket::None => None,
            Bracket::Parenthesis => Some(b')'),
            Bracket::Curly => Some(b'}'),
            Bracket::Percent => Some(b'%'),
        }
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Replaces variable references in `input` with the values returned by `lookup`.
///
/// `lookup` is called once per non-empty name, in order of appearance, including names
/// whose closing bracket is missing; such a reference is still copied unchanged. A
/// reference whose name `lookup` does not know is left untouched.
///
/// ```
/// use shell_args::{expand, Platform};
///
/// let lookup = |name: &str| (name == "HOME").then(|| "/home/u".to_string());
/// assert_eq!(expand("${HOME}/bin:$UNSET", lookup, Platform::Posix), "/home/u/bin:$UNSET");
/// ```
pub fn expand<F>(input: &str, mut lookup: F, platform: Platform) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    // Start of the literal run not yet copied to `out`.
    let mut copied = 0;
    let mut pos = 0;

    // Every delimiter is ASCII, so each index where a run starts or stops is a char boundary.
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if bytes.get(pos + 1).is_some_and(|&b| platform.is_trigger(b)) => {
                out.push_str(&input[copied..pos]);
                out.push(char::from(bytes[pos + 1]));
                pos += 2;
                copied = pos;
            }
            b if platform.is_trigger(b) => {
                out.push_str(&input[copied..pos]);
                pos = expand_reference(input, pos, &mut lookup, &mut out);
                copied = pos;
            }
            _ => pos += 1,
        }
    }

    out.push_str(&input[copied..]);
    out
}

/// Expands the reference whose trigger sits at `at` and returns where scanning resumes.
fn expand_reference<F>(input: &str, at: usize, lookup: &mut F, out: &mut String) -> usize
where
    F: FnMut(&str) -> Option<String>,
{
    let bytes = input.as_bytes();
    let (bracket, name_start) = match (bytes[at], bytes.get(at + 1)) {
        (b'%', _) => (Bracket::Percent, at + 1),
        (_, Some(b'(')) => (Bracket::Parenthesis, at + 2),
        (_, Some(b'{')) => (Bracket::Curly, at + 2),
        _ => (Bracket::None, at + 1),
    };

    let name_len = bytes[name_start..]
        .iter()
        .take_while(|&&b| is_name_byte(b))
        .count();
    let name_end = name_start + name_len;
    let name = &input[name_start..name_end];
    let value = if name.is_empty() { None } else { lookup(name) };

    let end = match bracket.closing() {
        None => name_end,
        Some(close) if bytes.get(name_end) == Some(&close) => name_end + 1,
        Some(close) => {
            if bracket != Bracket::Percent {
                // A stray `%` is common in Windows text, so only the `$` forms are reported.
                tracing::debug!(
                    position = name_end,
                    missing = %char::from(close),
                    input,
                    "variable expansion skipped: closing bracket missing"
                );
            }
            // The name was looked up, but a malformed reference is never substituted.
            out.push_str(&input[at..name_end]);
            return name_end;
        }
    };

    match value {
        Some(value) => out.push_str(&value),
        None => out.push_str(&input[at..end]),
    }
    end
}

/// Expands `input` against the process environment using [`Platform::native`] syntax.
pub fn expand_env(input: &str) -> String {
    expand(input, |name| std::env::var(name).ok(), Platform::native())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn platform() -> impl Strategy<Value = Platform> {
        prop_oneof![Just(Platform::Posix), Just(Platform::Windows)]
    }

    proptest! {
        #[test]
        fn unresolved_references_are_unchanged(
            s in "[A-Za-z_0-9 ${}()%/.:]{0,48}",
            platform in platform(),
        ) {
            prop_assert_eq!(expand(&s, |_| None, platform), s);
        }

        #[test]
        fn only_known_references_are_replaced(
            pieces in proptest::collection::vec(
                prop_oneof![
                    Just("$U"), Just("${U}"), Just("$(U)"),
                    Just("$K"), Just("${K}"), Just("$(K)"),
                    Just(" "), Just("/"), Just(":"), Just("-"),
                ],
                0..16,
            )
        ) {
            let input: String = pieces.concat();
            let expected: String = pieces
                .iter()
                .map(|piece| if piece.contains('K') { "v" } else { *piece })
                .collect();
            let lookup = |name: &str| (name == "K").then(|| "v".to_string());
            prop_assert_eq!(expand(&input, lookup, Platform::Posix), expected);
        }

        #[test]
        fn trigger_free_input_is_identity(
            s in "[^$%]{0,48}",
            platform in platform(),
        ) {
            let out = expand(&s, |_| Some("X".to_string()), platform);
            prop_assert_eq!(out, s);
        }

        #[test]
        fn never_panics(s in "\\PC{0,48}", platform in platform()) {
            let _ = expand(&s, |name| Some(name.to_lowercase()), platform);
        }
    }
}
