use std::process::{Command, Output};

use claim::assert_err;
use newsletter_signup::{configuration::WarmupSettings, warmup::ping};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::helpers::spawn_app;

#[tokio::test]
async fn warmup_pings_the_backend_home_page() {
    let test_app = spawn_app().await;
    let settings = WarmupSettings::from_vars([(
        "BACKEND_URL".to_string(),
        format!("http://127.0.0.1:{}/", test_app.port),
    )])
    .unwrap();

    let status = ping(&reqwest::Client::new(), &settings.backend_url)
        .await
        .expect("Warmup failed");

    assert_eq!(200, status.as_u16());
}

#[tokio::test]
async fn warmup_issues_exactly_one_get() {
    let mock_server = MockServer::start().await;
    Mock::given(path("/"))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = ping(&reqwest::Client::new(), &mock_server.uri())
        .await
        .expect("Warmup failed");

    // any answer keeps the instance warm
    assert_eq!(503, status.as_u16());
}

/// Runs the `warmup` binary outside the crate root, so no `.env` is picked up.
fn run_warmup(backend_url: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_warmup"));
    command
        .current_dir(std::env::temp_dir())
        .env_remove("RUST_LOG")
        .env_remove("BACKEND_URL");
    if let Some(url) = backend_url {
        command.env("BACKEND_URL", url);
    }
    command.output().expect("Failed to run the warmup binary")
}

fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn warmup_exits_with_an_error_when_backend_url_is_missing() {
    let output = run_warmup(None);

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("No url"));
}

#[test]
fn warmup_exits_with_an_error_when_backend_url_is_empty() {
    let output = run_warmup(Some(""));

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("No url"));
}

#[test]
fn warmup_reports_an_unreachable_backend() {
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let output = run_warmup(Some(&format!("http://127.0.0.1:{}/", closed_port)));

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("Warmup failed"));
}

#[tokio::test]
async fn warmup_succeeds_against_a_live_backend() {
    let test_app = spawn_app().await;
    let url = format!("http://127.0.0.1:{}/", test_app.port);

    // the server runs on this runtime, keep it polled while the binary talks to it
    let output = tokio::task::spawn_blocking(move || run_warmup(Some(&url)))
        .await
        .unwrap();

    assert!(output.status.success());
    assert!(combined_output(&output).contains("Warmup ping successful"));
}

#[tokio::test]
async fn warmup_fails_when_the_backend_is_unreachable() {
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let outcome = ping(
        &reqwest::Client::new(),
        &format!("http://127.0.0.1:{}/", closed_port),
    )
    .await;

    assert_err!(outcome);
}
