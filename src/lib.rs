//! Shell-style command-line splitting and environment variable expansion.
//!
//! Three pure entry points do the parsing:
//! - [`tokenize`] turns a command line into an `argv`-style list, honoring single and
//!   double quotes and backslash escapes;
//! - [`split_bounded`] (with [`find_argument_start`] / [`find_argument_end`]) carves
//!   raw argument spans and folds everything past a limit into the last token;
//! - [`expand()`] substitutes `$NAME`, `${NAME}`, `$(NAME)` and, for
//!   [`Platform::Windows`], `%NAME%` through a caller-supplied lookup.
//!
//! None of them can fail: malformed input degrades to a best-effort result and
//! unresolved references are left exactly as written.
//!
//! The [`Interpreter`] is a small prompt built on top of these functions.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod expand;
mod interpreter;
pub mod path;
pub mod splitter;
pub mod tokenizer;

pub use expand::{ParsePlatformError, Platform, expand, expand_env};
pub use interpreter::Interpreter;
pub use splitter::{find_argument_end, find_argument_start, split_bounded};
pub use tokenizer::{QuoteState, tokenize};
