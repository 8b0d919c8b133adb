//! Front-end settings.
//!
//! Resolution order: built-in defaults, then `SHELL_ARGS_*` variables from the
//! [`Environment`], then command-line flags (applied by the binary).

use crate::env::Environment;
use crate::expand::{Platform, expand};
use std::path::PathBuf;

pub const PLATFORM_VAR: &str = "SHELL_ARGS_PLATFORM";
pub const MAX_TOKENS_VAR: &str = "SHELL_ARGS_MAX_TOKENS";
pub const PROMPT_VAR: &str = "SHELL_ARGS_PROMPT";
pub const HISTORY_VAR: &str = "SHELL_ARGS_HISTORY";

const DEFAULT_PROMPT: &str = "args$ ";
const DEFAULT_HISTORY: &str = "${HOME}/.shell_args_history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Variable syntax used by `expand` when no `-p` is given.
    pub platform: Platform,
    /// Token limit used by `split` when no `-m` is given. `None` is unbounded.
    pub max_tokens: Option<usize>,
    pub prompt: String,
    /// Where the prompt keeps its history; `None` disables persistence.
    pub history_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: Platform::native(),
            max_tokens: None,
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: None,
        }
    }
}

impl Settings {
    /// Defaults overridden by `SHELL_ARGS_*` variables in `env`.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_env(env: &Environment) -> Self {
        let mut settings = Settings::default();

        if let Some(raw) = env.get_var(PLATFORM_VAR) {
            match raw.parse() {
                Ok(platform) => settings.platform = platform,
                Err(e) => tracing::warn!(var = PLATFORM_VAR, "ignoring setting: {e}"),
            }
        }

        if let Some(raw) = env.get_var(MAX_TOKENS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(0) => settings.max_tokens = None,
                Ok(n) => settings.max_tokens = Some(n),
                Err(e) => tracing::warn!(var = MAX_TOKENS_VAR, value = %raw, "ignoring setting: {e}"),
            }
        }

        if let Some(prompt) = env.get_var(PROMPT_VAR) {
            settings.prompt = prompt;
        }

        let history = env
            .get_var(HISTORY_VAR)
            .unwrap_or_else(|| DEFAULT_HISTORY.to_string());
        settings.history_file = resolve_history(&history, env, settings.platform);

        settings
    }
}

/// Expands the history path; a reference that stays unresolved disables history.
fn resolve_history(raw: &str, env: &Environment, platform: Platform) -> Option<PathBuf> {
    let mut unresolved = false;
    let path = expand(
        raw,
        |name| {
            let value = env.get_var(name);
            unresolved |= value.is_none();
            value
        },
        platform,
    );
    if unresolved || path.trim().is_empty() {
        tracing::warn!(raw, "history disabled: path has unresolved variables");
        return None;
    }
    Some(PathBuf::from(path))
}
