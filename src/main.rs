//! bbpr CLI entrypoint for Bitbucket pull request actions.

use std::io::{self, Write};
use std::process::ExitCode;

use bbpr::{BbprConfig, ClientError};
use ortho_config::OrthoConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "BBPR_LOG";

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{}", cli::output::render_error(&error)).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ClientError> {
    let config = load_config()?;
    let mut stdout = io::stdout().lock();
    cli::run(&config, &mut stdout)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ClientError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BbprConfig, ClientError> {
    BbprConfig::load().map_err(|error| ClientError::Configuration {
        message: error.to_string(),
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("bbpr=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}
