use crate::command::{CommandFactory, ExitCode};
use crate::config::Settings;
use crate::env::{Environment, Session};
use crate::tokenizer::tokenize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A small prompt for trying out tokenizing, splitting and expansion.
///
/// The interpreter owns a [`Session`] and a list of [`CommandFactory`] objects that
/// are queried to create commands by name. See [`Default`] for the builtins included
/// out of the box.
///
/// Example
/// ```
/// use shell_args::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let code = sh.run_line("tokenize 'a \"b c\"'", &mut out).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(String::from_utf8(out).unwrap(), "[\"a\", \"b c\"]\n");
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(session: Session, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { session, commands }
    }

    /// An interpreter with the default builtins over the given variables and settings.
    pub fn with_session(session: Session) -> Self {
        Self::new(session, default_commands())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a single command invocation by name, printing to standard output.
    pub fn run(&mut self, name: &str, args: &[&str]) -> anyhow::Result<ExitCode> {
        let mut stdout = std::io::stdout().lock();
        self.run_with_output(name, args, &mut stdout)
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's exit code or an error if no builtin has that name or
    /// writing its output fails.
    pub fn run_with_output(
        &mut self,
        name: &str,
        args: &[&str],
        stdout: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        tracing::trace!(name, ?args, "dispatching command");
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(name, args) {
                return cmd.execute(stdout, &mut self.session);
            }
        }
        Err(anyhow::anyhow!("command not found: {}", name))
    }

    /// Tokenize one prompt line and run it. Blank lines succeed without doing anything.
    pub fn run_line(&mut self, line: &str, stdout: &mut dyn Write) -> anyhow::Result<ExitCode> {
        let argv = tokenize(line);
        let Some((name, rest)) = argv.split_first() else {
            return Ok(0);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.run_with_output(name, &args, stdout)
    }

    /// Read-Eval-Print Loop until `exit`, Ctrl-C or end of input.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let history = self.session.settings.history_file.clone();
        if let Some(path) = &history {
            // A missing history file is normal on first start.
            if let Err(e) = rl.load_history(path) {
                tracing::debug!(path = %path.display(), "history not loaded: {e}");
            }
        }

        while !self.session.should_exit {
            let readline = rl.readline(&self.session.settings.prompt);
            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    let mut stdout = std::io::stdout().lock();
                    if let Err(e) = self.run_line(&line, &mut stdout) {
                        eprintln!("{e:#}");
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }

        if let Some(path) = &history {
            if let Err(e) = rl.save_history(path) {
                tracing::warn!(path = %path.display(), "failed to save history: {e}");
            }
        }
        Ok(())
    }
}

fn default_commands() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    vec![
        Box::new(Factory::<Tokenize>::default()),
        Box::new(Factory::<Split>::default()),
        Box::new(Factory::<Expand>::default()),
        Box::new(Factory::<Set>::default()),
        Box::new(Factory::<Unset>::default()),
        Box::new(Factory::<Vars>::default()),
        Box::new(Factory::<Resolve>::default()),
        Box::new(Factory::<Exit>::default()),
    ]
}

impl Default for Interpreter {
    /// Create an interpreter over the process environment, with settings taken
    /// from `SHELL_ARGS_*` variables.
    fn default() -> Self {
        let env = Environment::new();
        let settings = Settings::from_env(&env);
        Self::with_session(Session::new(env, settings))
    }
}
