use crate::config::Settings;
use std::collections::HashMap;
use std::env as stdenv;

/// Variable store that backs `lookup` during expansion.
///
/// [`Environment::new`] snapshots the process environment; later edits only affect
/// this copy, never the real process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars().collect(),
        }
    }

    /// An environment with no variables at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the value of a variable.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Remove a variable, returning its previous value.
    pub fn unset_var(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// All variables sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<_> = self
            .vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort_unstable();
        all
    }

    /// A lookup closure suitable for [`expand`](crate::expand()).
    pub fn lookup(&self) -> impl Fn(&str) -> Option<String> + '_ {
        move |name: &str| self.get_var(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Mutable state of an interactive session.
///
/// - `env`: variables used for expansion.
/// - `settings`: defaults for the builtins (platform, token limit, prompt).
/// - `should_exit`: set by `exit`, checked by the prompt loop.
#[derive(Debug, Clone)]
pub struct Session {
    pub env: Environment,
    pub settings: Settings,
    pub should_exit: bool,
}

impl Session {
    pub fn new(env: Environment, settings: Settings) -> Self {
        Self {
            env,
            settings,
            should_exit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::{Platform, expand};

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::empty();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));

        assert_eq!(env.unset_var("KEY"), Some("VALUE".to_string()));
        assert_eq!(env.get_var("KEY"), None);
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_sorted_orders_by_name() {
        let env: Environment = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(env.sorted(), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_lookup_feeds_expansion() {
        let env: Environment = [("HOME", "/home/u")].into_iter().collect();
        assert_eq!(expand("$HOME/bin", env.lookup(), Platform::Posix), "/home/u/bin");
    }
}
