// Integration tests for the session controller, exercised against a scripted
// command runner and probe instead of the real external tool.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use hstray_core::error::SessionError;
use hstray_core::types::Credentials;
use hstray_core::vpn::{
    CommandOutput, CommandRunner, ConnectionState, ReachabilityProbe, RunnerError,
    SessionController, Tuning,
};

/// Scripted stand-in for the external tool
///
/// Responses are keyed by the joined argument list. A key with several
/// queued responses pops them in order and repeats the last one; an unkeyed
/// invocation succeeds with empty output.
#[derive(Default)]
struct FakeRunner {
    responses: Mutex<HashMap<String, VecDeque<Result<CommandOutput, RunnerError>>>>,
    calls: Mutex<Vec<String>>,
    inputs: Mutex<Vec<String>>,
}

impl FakeRunner {
    fn respond(&self, key: &str, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(Ok(output));
    }

    fn fail(&self, key: &str, error: RunnerError) {
        self.responses
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(Err(error));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    fn next_response(&self, key: &str) -> Result<CommandOutput, RunnerError> {
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| Ok(ok(""))),
            None => Ok(ok("")),
        }
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, args: &[&str], _timeout: Duration) -> Result<CommandOutput, RunnerError> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        self.next_response(&key)
    }

    async fn run_with_input(
        &self,
        args: &[&str],
        input: &str,
        _timeout: Duration,
    ) -> Result<CommandOutput, RunnerError> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        self.inputs.lock().unwrap().push(input.to_string());
        self.next_response(&key)
    }
}

struct FakeProbe {
    reachable: bool,
}

impl ReachabilityProbe for FakeProbe {
    async fn is_reachable(&self) -> bool {
        self.reachable
    }
}

fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        success: true,
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Tuning with zero settle delays so tests run instantly
fn fast_tuning() -> Tuning {
    Tuning {
        connect_settle: Duration::ZERO,
        location_settle: Duration::ZERO,
        disconnect_settle: Duration::ZERO,
        ..Tuning::default()
    }
}

fn controller(runner: FakeRunner, reachable: bool) -> SessionController<FakeRunner, FakeProbe> {
    SessionController::new(runner, FakeProbe { reachable }, fast_tuning())
}

#[tokio::test]
async fn test_status_connected() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Connected to Germany"));
    let controller = controller(runner, true);

    assert_eq!(
        controller.status().await.unwrap(),
        ConnectionState::Connected
    );
}

#[tokio::test]
async fn test_status_not_connected() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Not connected"));
    let controller = controller(runner, true);

    assert_eq!(
        controller.status().await.unwrap(),
        ConnectionState::Disconnected
    );
}

#[tokio::test]
async fn test_status_unexpected_output_treated_as_disconnected() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("daemon warming up"));
    let controller = controller(runner, true);

    assert_eq!(
        controller.status().await.unwrap(),
        ConnectionState::Disconnected
    );
}

#[tokio::test]
async fn test_status_timeout_maps_to_timeout_error() {
    let runner = FakeRunner::default();
    runner.fail("status", RunnerError::Timeout { seconds: 10 });
    let controller = controller(runner, true);

    assert_eq!(
        controller.status().await.unwrap_err(),
        SessionError::Timeout { seconds: 10 }
    );
}

#[tokio::test]
async fn test_connect_already_connected_is_noop() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Connected to Germany"));
    let controller = controller(runner, true);

    assert!(controller.connect(None).await.is_ok());

    // No redundant external connect invocation
    assert!(controller
        .runner()
        .calls()
        .iter()
        .all(|call| !call.starts_with("connect")));
}

#[tokio::test]
async fn test_connect_success_by_requery() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Not connected"));
    runner.respond("status", ok("Connected to United States"));
    runner.respond("connect", ok("Connecting..."));
    let controller = controller(runner, true);

    assert!(controller.connect(None).await.is_ok());
    assert!(controller.runner().calls().contains(&"connect".to_string()));
}

#[tokio::test]
async fn test_connect_exit_code_alone_is_not_success() {
    // The connect command exits zero but status never reaches connected
    let runner = FakeRunner::default();
    runner.respond("status", ok("Not connected"));
    runner.respond("connect", ok(""));
    let controller = controller(runner, true);

    assert_eq!(
        controller.connect(None).await.unwrap_err(),
        SessionError::ConnectFailed
    );
}

#[tokio::test]
async fn test_connect_without_network_skips_external_tool() {
    let runner = FakeRunner::default();
    let controller = controller(runner, false);

    assert_eq!(
        controller.connect(None).await.unwrap_err(),
        SessionError::NoNetwork
    );
    assert!(controller.runner().calls().is_empty());
}

#[tokio::test]
async fn test_connect_not_signed_in_mixed_case() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Not connected"));
    runner.respond("connect", failed("Error: Not Signed In"));
    let controller = controller(runner, true);

    assert_eq!(
        controller.connect(None).await.unwrap_err(),
        SessionError::NotSignedIn
    );
}

#[tokio::test]
async fn test_connect_to_location_disconnects_first() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Connected to Germany")); // pre-connect check
    runner.respond("status", ok("Connected to Germany")); // disconnect pre-check
    runner.respond("status", ok("Not connected")); // disconnect re-query
    runner.respond("status", ok("Connected to Turkey")); // connect re-query
    runner.respond("connect tr", ok(""));
    let controller = controller(runner, true);

    assert!(controller.connect(Some("tr")).await.is_ok());

    let calls = controller.runner().calls();
    let disconnect_at = calls.iter().position(|c| c == "disconnect").unwrap();
    let connect_at = calls.iter().position(|c| c == "connect tr").unwrap();
    assert!(disconnect_at < connect_at);
}

#[tokio::test]
async fn test_disconnect_already_disconnected_is_noop() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Not connected"));
    let controller = controller(runner, true);

    assert!(controller.disconnect().await.is_ok());
    assert!(!controller
        .runner()
        .calls()
        .contains(&"disconnect".to_string()));
}

#[tokio::test]
async fn test_disconnect_still_connected_fails() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Connected to Germany"));
    runner.respond("disconnect", ok(""));
    let controller = controller(runner, true);

    assert_eq!(
        controller.disconnect().await.unwrap_err(),
        SessionError::DisconnectFailed
    );
}

#[tokio::test]
async fn test_disconnect_timeout_reports_disconnect_failed() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Connected to Germany"));
    runner.fail("disconnect", RunnerError::Timeout { seconds: 30 });
    let controller = controller(runner, true);

    assert_eq!(
        controller.disconnect().await.unwrap_err(),
        SessionError::DisconnectFailed
    );
}

#[tokio::test]
async fn test_disconnect_success() {
    let runner = FakeRunner::default();
    runner.respond("status", ok("Connected to Germany"));
    runner.respond("status", ok("Not connected"));
    runner.respond("disconnect", ok("Disconnecting..."));
    let controller = controller(runner, true);

    assert!(controller.disconnect().await.is_ok());
}

#[tokio::test]
async fn test_locations_parsed_from_listing() {
    let runner = FakeRunner::default();
    runner.respond(
        "locations",
        ok("Available locations:\nCODE  NAME\nus United States\nde Germany\n"),
    );
    let controller = controller(runner, true);

    let locations = controller.locations().await;
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].code(), "us");
}

#[tokio::test]
async fn test_locations_header_only_yields_placeholder() {
    let runner = FakeRunner::default();
    runner.respond("locations", ok("Available locations:\nCODE  NAME\n"));
    let controller = controller(runner, true);

    let locations = controller.locations().await;
    assert_eq!(locations.len(), 1);
    assert!(locations[0].is_placeholder());
}

#[tokio::test]
async fn test_locations_failure_yields_placeholder() {
    let runner = FakeRunner::default();
    runner.fail(
        "locations",
        RunnerError::Spawn {
            reason: "no such file".to_string(),
        },
    );
    let controller = controller(runner, true);

    let locations = controller.locations().await;
    assert_eq!(locations.len(), 1);
    assert!(locations[0].is_placeholder());
}

#[tokio::test]
async fn test_login_success_when_username_in_account_status() {
    let runner = FakeRunner::default();
    runner.respond("account status", ok("Signed in as ALICE@example.com"));
    let controller = controller(runner, true);

    let credentials = Credentials::new("alice", "secret".to_string());
    assert!(controller.login(&credentials).await);

    // Username and password each fed as one line on stdin
    assert_eq!(controller.runner().inputs(), vec!["alice\nsecret\n"]);

    // Any previous session was signed out first
    let calls = controller.runner().calls();
    let signout_at = calls.iter().position(|c| c == "account signout").unwrap();
    let signin_at = calls.iter().position(|c| c == "account signin").unwrap();
    assert!(signout_at < signin_at);
}

#[tokio::test]
async fn test_login_fails_on_different_username() {
    let runner = FakeRunner::default();
    runner.respond("account status", ok("Signed in as bob@example.com"));
    let controller = controller(runner, true);

    let credentials = Credentials::new("alice", "secret".to_string());
    assert!(!controller.login(&credentials).await);
}

#[tokio::test]
async fn test_login_fails_on_empty_account_status() {
    let runner = FakeRunner::default();
    runner.respond("account status", ok(""));
    let controller = controller(runner, true);

    let credentials = Credentials::new("alice", "secret".to_string());
    assert!(!controller.login(&credentials).await);
}

#[tokio::test]
async fn test_logout_success_by_exit_code() {
    let runner = FakeRunner::default();
    runner.respond("account signout", ok("Signed out"));
    let controller = controller(runner, true);

    assert!(controller.logout().await);
}

#[tokio::test]
async fn test_logout_failure() {
    let runner = FakeRunner::default();
    runner.respond("account signout", failed("no active session"));
    let controller = controller(runner, true);

    assert!(!controller.logout().await);
}
