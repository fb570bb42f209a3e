// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn runs_a_trivial_command_successfully() {
    let result = run(
        &["echo".to_string(), "hello".to_string()],
        Path::new("/tmp"),
        &HashMap::new(),
        "",
        Duration::from_secs(2),
        ResourceLimits::default(),
    )
    .await;
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, "hello\n");
}

#[tokio::test]
async fn deadline_kills_a_runaway_process() {
    let start = Instant::now();
    let result = run(
        &["sh".to_string(), "-c".to_string(), "while true; do :; done".to_string()],
        Path::new("/tmp"),
        &HashMap::new(),
        "",
        Duration::from_millis(200),
        ResourceLimits::default(),
    )
    .await;
    assert_eq!(result.exit_code, DEADLINE_EXCEEDED_EXIT_CODE);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn unknown_executable_is_a_spawn_failure_not_a_panic() {
    let result = run(
        &["this-binary-does-not-exist-anywhere".to_string()],
        Path::new("/tmp"),
        &HashMap::new(),
        "",
        Duration::from_secs(1),
        ResourceLimits::default(),
    )
    .await;
    assert_eq!(result.exit_code, SPAWN_FAILED_EXIT_CODE);
}

#[tokio::test]
async fn stdin_is_forwarded_to_the_child() {
    let result = run(
        &["cat".to_string()],
        Path::new("/tmp"),
        &HashMap::new(),
        "hello from stdin",
        Duration::from_secs(2),
        ResourceLimits::default(),
    )
    .await;
    assert_eq!(result.stdout, "hello from stdin");
}

#[test]
fn parses_vm_hwm_line() {
    let status = "Name:\tcat\nVmHWM:\t  1234 kB\nVmRSS:\t1000 kB\n";
    assert_eq!(parse_vm_hwm_kb(status), Some(1234));
}
