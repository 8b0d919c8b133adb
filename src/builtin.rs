use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Session;
use crate::expand::{Platform, expand};
use crate::interpreter::Factory;
use crate::path;
use crate::splitter::split_bounded;
use crate::tokenizer::tokenize;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use regex::Regex;
use std::io::Write;

/// Commands known to the prompt at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and run in-process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "tokenize" or "set".
    fn name() -> &'static str;

    /// Executes the command against the session.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, stdout, session) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{}: {e:#}", T::name())?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _session: &mut Session) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

fn write_tokens(stdout: &mut dyn Write, tokens: &[String]) -> Result<()> {
    writeln!(stdout, "{tokens:?}")?;
    Ok(())
}

#[derive(FromArgs)]
/// Split each command line into arguments, removing quotes and escapes.
pub struct Tokenize {
    #[argh(positional, greedy)]
    /// command lines to split; quote each one so it arrives as a single argument.
    pub lines: Vec<String>,
}

impl BuiltinCommand for Tokenize {
    fn name() -> &'static str {
        "tokenize"
    }

    fn execute(self, stdout: &mut dyn Write, _session: &mut Session) -> Result<ExitCode> {
        for line in &self.lines {
            write_tokens(stdout, &tokenize(line))?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Split each command line into raw arguments, folding everything past the limit
/// into the last one.
pub struct Split {
    #[argh(option, short = 'm')]
    /// maximum number of tokens; 0 means unbounded. Defaults to the session setting.
    pub max_tokens: Option<usize>,

    #[argh(positional, greedy)]
    /// command lines to split.
    pub lines: Vec<String>,
}

impl BuiltinCommand for Split {
    fn name() -> &'static str {
        "split"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let limit = self.max_tokens.or(session.settings.max_tokens);
        for line in &self.lines {
            write_tokens(stdout, &split_bounded(line, limit))?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Expand variable references using the session variables.
pub struct Expand {
    #[argh(option, short = 'p')]
    /// variable syntax: posix or windows. Defaults to the session setting.
    pub platform: Option<Platform>,

    #[argh(positional, greedy)]
    /// strings to expand.
    pub inputs: Vec<String>,
}

impl BuiltinCommand for Expand {
    fn name() -> &'static str {
        "expand"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let platform = self.platform.unwrap_or(session.settings.platform);
        for input in &self.inputs {
            writeln!(stdout, "{}", expand(input, session.env.lookup(), platform))?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Set a session variable.
pub struct Set {
    #[argh(positional)]
    /// variable name.
    pub name: String,

    #[argh(positional)]
    /// new value; taken literally.
    pub value: String,
}

impl BuiltinCommand for Set {
    fn name() -> &'static str {
        "set"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        session.env.set_var(self.name, self.value);
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove a session variable.
pub struct Unset {
    #[argh(positional)]
    /// variable name.
    pub name: String,
}

impl BuiltinCommand for Unset {
    fn name() -> &'static str {
        "unset"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        Ok(match session.env.unset_var(&self.name) {
            Some(_) => 0,
            None => 1,
        })
    }
}

#[derive(FromArgs)]
/// List session variables as NAME=value, sorted by name.
pub struct Vars {
    #[argh(positional)]
    /// only list variables whose name matches this regular expression.
    pub pattern: Option<String>,
}

impl BuiltinCommand for Vars {
    fn name() -> &'static str {
        "vars"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let filter = self
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid pattern")?;

        for (name, value) in session.env.sorted() {
            if filter.as_ref().is_none_or(|re| re.is_match(name)) {
                writeln!(stdout, "{name}={value}")?;
            }
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Expand each path and report whether it names an existing directory, and where
/// it lies relative to the working directory.
pub struct Resolve {
    #[argh(positional, greedy)]
    /// paths, possibly containing variable references.
    pub paths: Vec<String>,
}

impl BuiltinCommand for Resolve {
    fn name() -> &'static str {
        "resolve"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let platform = session.settings.platform;
        let mut code = 0;
        for raw in &self.paths {
            match path::resolve_dir(raw, session.env.lookup(), platform) {
                Some(dir) => {
                    let dir = dir.to_string_lossy();
                    match std::env::current_dir() {
                        Ok(cwd) => {
                            let relative = path::relative_path(&dir, &cwd.to_string_lossy());
                            writeln!(stdout, "{dir}\tdirectory ({relative})")?
                        }
                        Err(e) => {
                            tracing::debug!("working directory unavailable: {e}");
                            writeln!(stdout, "{dir}\tdirectory")?
                        }
                    }
                }
                None => {
                    let expanded = expand(raw, session.env.lookup(), platform);
                    writeln!(stdout, "{expanded}\tmissing ({})", path::file_name(&expanded))?;
                    code = 1;
                }
            }
        }
        Ok(code)
    }
}

#[derive(FromArgs)]
/// Leave the interactive prompt.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        session.should_exit = true;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::env::Environment;
    use pretty_assertions::assert_eq;

    fn session(pairs: &[(&str, &str)]) -> Session {
        let env: Environment = pairs.iter().copied().collect();
        let settings = Settings {
            platform: Platform::Posix,
            ..Settings::default()
        };
        Session::new(env, settings)
    }

    fn run<T: BuiltinCommand>(cmd: T, session: &mut Session) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = ExecutableCommand::execute(Box::new(cmd), &mut out, session).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_tokenize_prints_each_line() {
        let mut s = session(&[]);
        let cmd = Tokenize {
            lines: vec!["a 'b c'".to_string(), "x\\ y".to_string()],
        };
        let (code, out) = run(cmd, &mut s);
        assert_eq!(code, 0);
        assert_eq!(out, "[\"a\", \"b c\"]\n[\"x y\"]\n");
    }

    #[test]
    fn test_split_uses_session_limit() {
        let mut s = session(&[]);
        s.settings.max_tokens = Some(2);
        let cmd = Split {
            max_tokens: None,
            lines: vec!["a b c".to_string()],
        };
        let (_, out) = run(cmd, &mut s);
        assert_eq!(out, "[\"a\", \"b c\"]\n");

        let cmd = Split {
            max_tokens: Some(0),
            lines: vec!["a b c".to_string()],
        };
        let (_, out) = run(cmd, &mut s);
        assert_eq!(out, "[\"a\", \"b\", \"c\"]\n");
    }

    #[test]
    fn test_expand_with_platform_override() {
        let mut s = session(&[("HOME", "/home/u")]);
        let cmd = Expand {
            platform: Some(Platform::Windows),
            inputs: vec!["%HOME%/bin".to_string(), "$MISSING".to_string()],
        };
        let (_, out) = run(cmd, &mut s);
        assert_eq!(out, "/home/u/bin\n$MISSING\n");
    }

    #[test]
    fn test_set_unset_and_vars() {
        let mut s = session(&[("B", "2")]);
        run(
            Set {
                name: "A".to_string(),
                value: "1".to_string(),
            },
            &mut s,
        );
        let (_, out) = run(Vars { pattern: None }, &mut s);
        assert_eq!(out, "A=1\nB=2\n");

        let (code, _) = run(Unset { name: "A".to_string() }, &mut s);
        assert_eq!(code, 0);
        let (code, _) = run(Unset { name: "A".to_string() }, &mut s);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_vars_filters_by_regex() {
        let mut s = session(&[("PATH", "/bin"), ("HOME", "/h"), ("PWD", "/")]);
        let (_, out) = run(
            Vars {
                pattern: Some("^P".to_string()),
            },
            &mut s,
        );
        assert_eq!(out, "PATH=/bin\nPWD=/\n");
    }

    #[test]
    fn test_vars_reports_bad_regex() {
        let mut s = session(&[]);
        let (code, out) = run(
            Vars {
                pattern: Some("(".to_string()),
            },
            &mut s,
        );
        assert_eq!(code, 1);
        assert!(out.starts_with("vars: invalid pattern"));
    }

    #[test]
    fn test_resolve_reports_missing_dir() {
        let mut s = session(&[("ROOT", "/definitely/not")]);
        let (code, out) = run(
            Resolve {
                paths: vec!["$ROOT/here".to_string()],
            },
            &mut s,
        );
        assert_eq!(code, 1);
        assert_eq!(out, "/definitely/not/here\tmissing (here)\n");
    }

    #[test]
    fn test_resolve_prints_relative_path() {
        let cwd = std::env::current_dir().unwrap();
        let cwd = cwd.to_string_lossy().into_owned();
        let mut s = session(&[("HERE", cwd.as_str())]);
        let (code, out) = run(
            Resolve {
                paths: vec!["${HERE}".to_string()],
            },
            &mut s,
        );
        assert_eq!(code, 0);
        assert_eq!(out, format!("{cwd}\tdirectory (.)\n"));
    }

    #[test]
    fn test_exit_sets_flag() {
        let mut s = session(&[]);
        run(Exit {}, &mut s);
        assert!(s.should_exit);
    }
}
