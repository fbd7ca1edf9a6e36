use std::process::ExitCode;
use std::sync::Arc;

use authgate::api::ApiError;
use authgate::config::{
    ConfigError, ENV_BASE_URL, ENV_CONNECT_TIMEOUT_SECS, ENV_REQUEST_TIMEOUT_SECS, ENV_TOKEN_FILE,
};
use authgate::forms::{LoginForm, RegistrationForm};
use authgate::store::StoreError;
use authgate::{AuthActions, ClientConfig, FileStore, HttpAuthApi, Notice, SessionGate, SessionState};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authgate", about = "Session client for the users API")]
struct Cli {
    /// Backend origin [default: http://localhost:8080].
    #[arg(long, env = "AUTHGATE_BASE_URL")]
    base_url: Option<String>,

    /// Session file [default: .authgate/session.json].
    #[arg(long, env = "AUTHGATE_TOKEN_FILE")]
    token_file: Option<String>,

    /// Whole-request timeout in seconds [default: 30].
    #[arg(long, env = "AUTHGATE_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Connect timeout in seconds [default: 10].
    #[arg(long, env = "AUTHGATE_CONNECT_TIMEOUT_SECS")]
    connect_timeout_secs: Option<u64>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and store the session token.
    Login {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, env = "AUTHGATE_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        password_verify: String,
        #[arg(long, default_value = "")]
        fullname: String,
        #[arg(long, default_value = "")]
        age: String,
    },
    /// Expire the stored session.
    Logout,
    /// Run the page guard for a login-only or anonymous-only page.
    Check {
        #[arg(long, value_enum)]
        require: Requirement,
    },
    /// Validate the stored token and print the profile.
    Whoami,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Requirement {
    Login,
    Anonymous,
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if run(cli).await? { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
}

/// Execute one subcommand. `Ok(true)` maps to a zero exit status.
async fn run(cli: Cli) -> Result<bool, CliError> {
    let config = resolve_config(&cli)?;
    let api = Arc::new(HttpAuthApi::from_config(&config)?);
    let store = Arc::new(FileStore::new(config.token_file.clone()));
    tracing::debug!(base_url = %config.base_url, token_file = %config.token_file.display(), "configured");

    let actions = AuthActions::new(api.clone(), store.clone());
    let gate = SessionGate::new(api, store);

    match cli.command {
        Command::Login { username, password } => {
            let notice = actions.login(&LoginForm { username, password }).await?;
            Ok(report(notice.as_ref()))
        }
        Command::Register { username, password, password_verify, fullname, age } => {
            let form = RegistrationForm { username, password, password_verify, fullname, age };
            let notice = actions.register(&form).await?;
            Ok(report(notice.as_ref()))
        }
        Command::Logout => {
            let notice = actions.logout().await?;
            Ok(report(notice.as_ref()))
        }
        Command::Check { require } => {
            let notice = match require {
                Requirement::Login => gate.require_login().await?,
                Requirement::Anonymous => gate.require_anonymous().await?,
            };
            match notice {
                Some(notice) => Ok(report(Some(&notice))),
                None => Ok(true),
            }
        }
        Command::Whoami => run_whoami(&gate).await,
    }
}

/// Flags (already merged with their env fallbacks by clap) go through the
/// same parsing and defaults as [`ClientConfig::from_env`].
fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let config = ClientConfig::from_lookup(|key| match key {
        ENV_BASE_URL => cli.base_url.clone(),
        ENV_TOKEN_FILE => cli.token_file.clone(),
        ENV_REQUEST_TIMEOUT_SECS => cli.request_timeout_secs.map(|secs| secs.to_string()),
        ENV_CONNECT_TIMEOUT_SECS => cli.connect_timeout_secs.map(|secs| secs.to_string()),
        _ => None,
    })?;
    Ok(config)
}

async fn run_whoami(gate: &SessionGate) -> Result<bool, CliError> {
    match gate.evaluate().await? {
        SessionState::Authenticated(profile) => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(true)
        }
        SessionState::Anonymous { .. } => {
            println!("not logged in");
            Ok(false)
        }
        SessionState::Indeterminate => Ok(false),
    }
}

/// Print the alert and redirect, if any. Transport failures were already
/// logged and print nothing.
fn report(notice: Option<&Notice>) -> bool {
    let Some(notice) = notice else {
        return false;
    };
    println!("{}", render(notice));
    notice.is_success()
}

fn render(notice: &Notice) -> String {
    match notice.redirect {
        Some(page) => format!("{}\n-> {page}", notice.message),
        None => notice.message.clone(),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
