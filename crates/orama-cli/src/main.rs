//! orama-ask: stream answers from an Orama collection in the terminal.
//!
//! With a question on the command line it answers once and exits, non-zero
//! if the answer ended in error. Without one it starts a prompt.

mod cli;
mod render;
mod repl;
mod settings;

use std::process::ExitCode;

use orama_answer::{AnswerSession, InteractionState};
use orama_config::OramaConfig;
use tracing_subscriber::EnvFilter;

fn init_logging(log_level: Option<&str>, config: &OramaConfig) {
    let directive = log_level
        .map(|level| format!("orama={level}"))
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let (config, load_error) = match &args.config {
        Some(path) => match orama_config::toml_loader::load_from_path(path) {
            Ok(config) => (config, None),
            Err(e) => {
                eprintln!("orama-ask: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => match orama_config::load_config() {
            Ok(config) => (config, None),
            Err(e) => (OramaConfig::default(), Some(e)),
        },
    };

    init_logging(args.log_level.as_deref(), &config);
    if let Some(e) = load_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if args.print_config {
        println!("{}", orama_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let session = match settings::session_config(&config, &args)
        .and_then(|c| AnswerSession::new(c).map_err(Into::into))
    {
        Ok(session) => session,
        Err(e) => {
            eprintln!("orama-ask: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.query() {
        Some(query) => {
            let stream = match session.ask(query) {
                Ok(stream) => stream,
                Err(e) => {
                    eprintln!("orama-ask: {e}");
                    return ExitCode::FAILURE;
                }
            };
            match render::follow(&session, stream).await {
                Some(interaction) if interaction.state == InteractionState::Done => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            }
        }
        None => match repl::run(&session).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("orama-ask: {e}");
                ExitCode::FAILURE
            }
        },
    }
}
