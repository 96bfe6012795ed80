use std::time::Duration;

use bridge_relay::{HostRelay, LogLevel};
use harness_codegen::encode;

use super::serial;
use crate::{ExecuteResult, HarnessSurface, RelayBinding};

/// Loads `source` into a fresh surface wired to a fresh host relay
async fn load(source: &str) -> (ExecuteResult, HostRelay, HarnessSurface) {
    let mut host = HostRelay::new();
    let relay = host.reset_session();
    let mut surface =
        HarnessSurface::new(&RelayBinding::default(), relay).expect("surface should start");

    let result = surface.load(&encode(source), None).await;
    host.pump();
    (result, host, surface)
}

#[serial]
#[tokio::test]
async fn test_console_lines_arrive_in_order() {
    let (result, host, _surface) = load(r#"console.log("a"); console.log("b");"#).await;

    assert!(result.success, "harness should run: {:?}", result.error);
    assert_eq!(host.transcript().messages(), ["a", "b"]);
    let events = host.transcript().events();
    assert!(events[0].sequence < events[1].sequence);
    assert!(events.iter().all(|e| e.level == LogLevel::Info));
}

#[serial]
#[tokio::test]
async fn test_thrown_error_becomes_single_error_event() {
    let (result, mut host, mut surface) = load(r#"throw new Error("boom");"#).await;

    assert!(result.success, "user errors are contained by the harness");
    assert_eq!(host.transcript().len(), 1);
    let event = &host.transcript().events()[0];
    assert!(event.is_error());
    assert!(event.message.contains("boom"), "got: {}", event.message);
    assert_eq!(event.message, "Execution Error: boom");

    // the surface is still alive and relaying
    surface
        .evaluate("<probe>", r#"console.log("still alive");"#)
        .expect("surface should accept more script");
    host.pump();
    assert_eq!(host.transcript().messages(), ["Execution Error: boom", "still alive"]);
}

#[serial]
#[tokio::test]
async fn test_syntax_error_is_reported() {
    let (result, host, _surface) = load(r#"console.log("never""#).await;

    assert!(result.success);
    let errors: Vec<_> = host.transcript().errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].message.starts_with("Execution Error:"),
        "got: {}",
        errors[0].message
    );
}

#[serial]
#[tokio::test]
async fn test_objects_are_json_stringified() {
    let (_, host, _surface) =
        load(r#"console.log({ score: 10 }, [1, 2], "lives", 3, null, undefined);"#).await;

    assert_eq!(
        host.transcript().messages(),
        [r#"{"score":10} [1,2] lives 3 null undefined"#]
    );
}

#[serial]
#[tokio::test]
async fn test_hostile_source_runs_as_plain_text() {
    let (result, host, _surface) = load(r#"console.log("</script>\"\\");"#).await;

    assert!(result.success);
    assert_eq!(host.transcript().messages(), ["</script>\"\\"]);
}

#[serial]
#[tokio::test]
async fn test_multiline_source_with_crlf() {
    let source = "const a = 1;\r\nconst b = 2;\r\nconsole.log(a + b);\r\n";
    let (_, host, _surface) = load(source).await;

    assert_eq!(host.transcript().messages(), ["3"]);
}

#[serial]
#[tokio::test]
async fn test_console_shim_is_installed_once() {
    let mut host = HostRelay::new();
    let relay = host.reset_session();
    let mut surface =
        HarnessSurface::new(&RelayBinding::default(), relay).expect("surface should start");
    let document = encode(r#"console.log("x");"#);

    surface.load(&document, None).await;
    surface.load(&document, None).await;
    host.pump();

    // one line per load, never duplicated by a second wrapper
    assert_eq!(host.transcript().messages(), ["x", "x"]);
}

#[serial]
#[tokio::test]
async fn test_relay_failure_is_dropped_by_shim() {
    let source = r#"
        const relay = Android.showLog;
        Android.showLog = () => { throw new Error("relay down"); };
        console.log("dropped");
        Android.showLog = relay;
        console.log("after");
    "#;
    let (result, host, _surface) = load(source).await;

    assert!(result.success);
    assert_eq!(host.transcript().messages(), ["after"]);
}

#[serial]
#[tokio::test]
async fn test_non_string_relay_arguments_are_dropped() {
    let source = r#"
        Android.showLog(42);
        Android.showLog({ score: 10 });
        Android.showLog(undefined);
        Android.showLog("direct");
        console.log("after");
    "#;
    let (result, host, _surface) = load(source).await;

    assert!(result.success, "got: {:?}", result.error);
    assert_eq!(host.transcript().messages(), ["direct", "after"]);
    assert_eq!(host.transcript().errors().count(), 0);
}

#[serial]
#[tokio::test]
async fn test_missing_runtime_library_fails_through_transcript() {
    let (result, host, _surface) =
        load("new Phaser.Game({ type: Phaser.AUTO, parent: 'game-container' });").await;

    assert!(result.success);
    let errors: Vec<_> = host.transcript().errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Phaser"), "got: {}", errors[0].message);
}

#[serial]
#[tokio::test]
async fn test_unhandled_rejection_reaches_onerror() {
    let (result, host, _surface) = load(r#"Promise.reject(new Error("late"));"#).await;

    assert!(!result.success);
    assert!(result.error.is_some());
    let errors: Vec<_> = host.transcript().errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("ERROR:"), "got: {}", errors[0].message);
    assert!(errors[0].message.contains("late"), "got: {}", errors[0].message);
}

#[serial]
#[tokio::test]
async fn test_watchdog_ends_runaway_script() {
    let mut host = HostRelay::new();
    let relay = host.reset_session();
    let mut surface =
        HarnessSurface::new(&RelayBinding::default(), relay).expect("surface should start");

    let document = encode(r#"console.log("spinning"); while (true) {}"#);
    let result = surface.load(&document, Some(Duration::from_millis(200))).await;
    host.pump();

    assert!(!result.success);
    assert!(result.timed_out);
    assert_eq!(host.transcript().messages(), ["spinning"]);

    // termination does not linger on the isolate
    surface
        .evaluate("<after_timeout>", r#"console.log("recovered");"#)
        .expect("surface should accept more script");
    host.pump();
    assert_eq!(host.transcript().messages(), ["spinning", "recovered"]);
}

#[serial]
#[tokio::test]
async fn test_watchdog_leaves_finished_session_alone() {
    let (_, mut host, mut surface) = load(r#"console.log("quick");"#).await;

    let document = encode(r#"console.log("quick again");"#);
    let result = surface.load(&document, Some(Duration::from_secs(5))).await;
    host.pump();

    assert!(result.success, "got: {:?}", result.error);
    assert!(!result.timed_out);
    assert_eq!(host.transcript().messages(), ["quick", "quick again"]);
}

#[serial]
#[tokio::test]
async fn test_relay_after_host_teardown_does_not_crash() {
    let mut host = HostRelay::new();
    let relay = host.reset_session();
    let mut surface =
        HarnessSurface::new(&RelayBinding::default(), relay).expect("surface should start");
    drop(host);

    let result = surface
        .load(&encode(r#"console.log("into the void");"#), None)
        .await;
    assert!(result.success, "got: {:?}", result.error);
}
