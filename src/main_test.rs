use std::path::{Path, PathBuf};

use authgate::config::{DEFAULT_BASE_URL, DEFAULT_TOKEN_FILE, Timeouts};
use authgate::{Page, SessionStore};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use super::*;

// =============================================================================
// FAKE BACKEND
// =============================================================================

async fn authenticate(Json(body): Json<Value>) -> Json<Value> {
    if body == json!({ "username": "bob", "password": "pw" }) {
        Json(json!({ "status": true, "result": { "token": "abc" } }))
    } else {
        Json(json!({ "status": false }))
    }
}

async fn validate(Json(body): Json<Value>) -> Json<Value> {
    if body["token"] == "abc" {
        Json(json!({ "status": true, "result": { "username": "bob", "fullname": "Bob Stone", "age": 31 } }))
    } else {
        Json(json!({ "status": false }))
    }
}

async fn expire(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "status": body["token"] == "abc" }))
}

async fn start() -> String {
    let app = Router::new()
        .route("/users/authenticate", post(authenticate))
        .route("/users", post(validate))
        .route("/users/expire", post(expire));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn token_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("authgate-cli-{}", uuid::Uuid::new_v4()))
        .join("session.json")
}

fn cli(base_url: &str, token_file: &Path, args: &[&str]) -> Cli {
    let path = token_file.display().to_string();
    let mut argv = vec!["authgate", "--base-url", base_url, "--token-file", path.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

// =============================================================================
// FLAGS
// =============================================================================

#[test]
fn flags_resolve_into_config() {
    let cli = Cli::try_parse_from([
        "authgate",
        "--base-url",
        "https://auth.example.test/",
        "--token-file",
        "/tmp/authgate-cli.json",
        "--request-timeout-secs",
        "5",
        "--connect-timeout-secs",
        "3",
        "logout",
    ])
    .unwrap();

    let config = resolve_config(&cli).unwrap();
    assert_eq!(config.base_url, "https://auth.example.test");
    assert_eq!(config.timeouts, Timeouts { request_secs: 5, connect_secs: 3 });
    assert_eq!(config.token_file, PathBuf::from("/tmp/authgate-cli.json"));
}

#[test]
fn omitted_flags_use_defaults() {
    let cli = Cli::try_parse_from(["authgate", "whoami"]).unwrap();
    let config = resolve_config(&cli).unwrap();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeouts, Timeouts::default());
    assert_eq!(config.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
}

#[test]
fn bad_base_url_flag_is_config_error() {
    let cli = Cli::try_parse_from(["authgate", "--base-url", "localhost:8080", "whoami"]).unwrap();
    assert!(matches!(resolve_config(&cli), Err(CliError::Config(ConfigError::InvalidBaseUrl(_)))));
}

#[test]
fn non_numeric_timeout_flag_is_rejected() {
    assert!(Cli::try_parse_from(["authgate", "--connect-timeout-secs", "soon", "whoami"]).is_err());
}

#[test]
fn check_requires_a_requirement() {
    assert!(Cli::try_parse_from(["authgate", "check"]).is_err());
    let cli = Cli::try_parse_from(["authgate", "check", "--require", "anonymous"]).unwrap();
    assert!(matches!(cli.command, Command::Check { require: Requirement::Anonymous }));
}

// =============================================================================
// REPORT
// =============================================================================

#[test]
fn report_exit_status_follows_notice_kind() {
    assert!(!report(None));
    assert!(report(Some(&Notice::success("ok", Some(Page::UserHome)))));
    assert!(!report(Some(&Notice::failure("nope"))));
    assert!(!report(Some(&Notice::invalid("fill it in"))));
    assert!(!report(Some(&Notice::redirect("go away", Page::Index))));
}

#[test]
fn render_appends_redirect_target() {
    assert_eq!(render(&Notice::success("Login successful.", Some(Page::UserHome))), "Login successful.\n-> userhome.html");
    assert_eq!(render(&Notice::failure("Already logged out!")), "Already logged out!");
}

// =============================================================================
// COMMANDS
// =============================================================================

#[tokio::test]
async fn login_check_whoami_logout_round() {
    let base_url = start().await;
    let path = token_file();

    assert!(!run(cli(&base_url, &path, &["login", "--username", "bob", "--password", "wrong"])).await.unwrap());
    assert!(!path.exists());
    assert!(!run(cli(&base_url, &path, &["check", "--require", "login"])).await.unwrap());

    assert!(run(cli(&base_url, &path, &["login", "--username", "bob", "--password", "pw"])).await.unwrap());
    assert!(run(cli(&base_url, &path, &["check", "--require", "login"])).await.unwrap());
    assert!(!run(cli(&base_url, &path, &["check", "--require", "anonymous"])).await.unwrap());
    assert!(run(cli(&base_url, &path, &["whoami"])).await.unwrap());

    assert!(run(cli(&base_url, &path, &["logout"])).await.unwrap());
    assert!(!run(cli(&base_url, &path, &["whoami"])).await.unwrap());
    assert!(!run(cli(&base_url, &path, &["logout"])).await.unwrap());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn check_login_with_rejected_token_fails() {
    let base_url = start().await;
    let path = token_file();
    FileStore::new(path.clone()).set("expired").unwrap();

    assert!(!run(cli(&base_url, &path, &["check", "--require", "login"])).await.unwrap());
    assert!(!path.exists());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn whoami_unreachable_backend_keeps_token() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let path = token_file();
    let store = FileStore::new(path.clone());
    store.set("abc").unwrap();

    assert!(!run(cli(&format!("http://{addr}"), &path, &["whoami"])).await.unwrap());
    assert_eq!(store.get().unwrap().as_deref(), Some("abc"));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
