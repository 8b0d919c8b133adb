use argh::FromArgs;
use shell_args::Interpreter;
use shell_args::Platform;
use shell_args::config::Settings;
use shell_args::env::{Environment, Session};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Split command lines and expand environment variables, interactively or once.
struct Cli {
    #[argh(option, short = 'p')]
    /// variable syntax for `expand`: posix or windows.
    platform: Option<Platform>,

    #[argh(option, short = 'm')]
    /// default token limit for `split`; 0 means unbounded.
    max_tokens: Option<usize>,

    #[argh(option)]
    /// history file for the interactive prompt.
    history: Option<PathBuf>,

    #[argh(positional, greedy)]
    /// builtin to run once (e.g. `tokenize "a b"`); starts the prompt when omitted.
    command: Vec<String>,
}

/// Enable with `RUST_LOG=shell_args=debug`.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli: Cli = argh::from_env();

    let env = Environment::new();
    let mut settings = Settings::from_env(&env);
    if let Some(platform) = cli.platform {
        settings.platform = platform;
    }
    if let Some(n) = cli.max_tokens {
        settings.max_tokens = (n > 0).then_some(n);
    }
    if cli.history.is_some() {
        settings.history_file = cli.history;
    }

    let mut sh = Interpreter::with_session(Session::new(env, settings));
    match cli.command.split_first() {
        None => sh
            .repl()
            .map_err(|e| anyhow::anyhow!("interactive prompt failed: {e}")),
        Some((name, rest)) => {
            let args: Vec<&str> = rest.iter().map(String::as_str).collect();
            let code = sh.run(name, &args)?;
            std::process::exit(code);
        }
    }
}
