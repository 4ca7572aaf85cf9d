#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `uninstall` command.
//!
//! Every test starts from a completed install on a throwaway host.

mod common;

use std::sync::Arc;

use common::*;
use turing_setup::commands;
use turing_setup::logging::StepStatus;
use turing_setup::tasks::{self, Context};

/// Install on a fresh host; the shared executor keeps service state.
fn installed() -> (TestHost, Arc<FakeHost>) {
    let host = TestHost::new();
    let exec = Arc::new(FakeHost::new());
    let ctx = host.context(
        Arc::clone(&exec),
        Arc::new(FakeSudo::new()),
        Arc::new(ScriptedPrompter::default()),
    );
    commands::install::run(&ctx).expect("install succeeds");
    (host, exec)
}

fn uninstall(
    host: &TestHost,
    exec: &Arc<FakeHost>,
    sudo: FakeSudo,
    prompter: &Arc<ScriptedPrompter>,
) -> (Context, anyhow::Result<()>) {
    let ctx = host.context(Arc::clone(exec), Arc::new(sudo), Arc::clone(prompter));
    let result = commands::uninstall::run(&ctx);
    (ctx, result)
}

/// Yes to the integration, yes to the checkout, then the typed word.
fn answers(checkout: bool, typed: &[&str]) -> Arc<ScriptedPrompter> {
    Arc::new(ScriptedPrompter::new(&[true, checkout], typed))
}

#[test]
fn declining_checkout_removal_keeps_the_checkout() {
    let (host, exec) = installed();
    let prompter = answers(false, &[]);
    let (ctx, result) = uninstall(&host, &exec, FakeSudo::new(), &prompter);

    result.expect("cancellation is not an error");
    for path in host.managed_paths() {
        assert!(!path.exists(), "{} still present", path.display());
    }
    assert!(host.root().join("main.py").is_file());
    assert_eq!(ctx.log.count(StepStatus::Fatal), 0);
    let last = ctx.log.steps().pop().unwrap();
    assert_eq!(last.name, "Remove checkout");
    assert_eq!(last.status, StepStatus::Cancelled);
    assert_eq!(prompter.remaining(), (0, 0));
}

#[test]
fn service_is_stopped_and_disabled_before_its_file_goes() {
    let (host, exec) = installed();
    let before = exec.calls().len();
    let (_ctx, result) = uninstall(&host, &exec, FakeSudo::new(), &answers(false, &[]));
    result.unwrap();

    let systemctl: Vec<String> = exec.calls()[before..]
        .iter()
        .filter(|c| c.starts_with("systemctl"))
        .cloned()
        .collect();
    insta::assert_debug_snapshot!(systemctl, @r#"
    [
        "systemctl --user is-enabled turing-screen.service",
        "systemctl --user stop turing-screen.service",
        "systemctl --user disable turing-screen.service",
        "systemctl --user daemon-reload",
    ]
    "#);
}

#[test]
fn second_uninstall_is_a_no_op() {
    let (host, exec) = installed();
    uninstall(&host, &exec, FakeSudo::new(), &answers(false, &[]))
        .1
        .unwrap();

    let sudo = FakeSudo::new();
    let (ctx, result) = uninstall(&host, &exec, sudo, &answers(false, &[]));
    result.expect("second uninstall succeeds");

    let steps = ctx.log.steps();
    let removals: Vec<_> = steps
        .iter()
        .filter(|s| s.name.starts_with("Remove ") && s.name != "Remove checkout")
        .collect();
    assert_eq!(removals.len(), tasks::all_uninstall_tasks().len());
    for step in removals {
        assert_eq!(step.status, StepStatus::Unchanged, "{}", step.name);
        assert_eq!(step.message.as_deref(), Some("already absent"), "{}", step.name);
    }
}

#[test]
fn exact_word_deletes_the_checkout() {
    let (host, exec) = installed();
    let (ctx, result) = uninstall(&host, &exec, FakeSudo::new(), &answers(true, &["REMOVE"]));
    result.unwrap();
    assert!(!host.root().exists());
    assert_eq!(ctx.log.steps().last().unwrap().status, StepStatus::Ok);
}

#[test]
fn near_miss_keeps_the_checkout() {
    for typed in ["remove", "Remove", "REMOVE\n", ""] {
        let (host, exec) = installed();
        let (ctx, result) = uninstall(&host, &exec, FakeSudo::new(), &answers(true, &[typed]));
        result.unwrap();
        assert!(host.root().exists(), "{typed:?} deleted the checkout");
        assert_eq!(
            ctx.log.steps().last().unwrap().status,
            StepStatus::Cancelled
        );
    }
}

#[test]
fn declining_up_front_removes_nothing() {
    let (host, exec) = installed();
    let prompter = Arc::new(ScriptedPrompter::new(&[false], &[]));
    let (ctx, result) = uninstall(&host, &exec, FakeSudo::new(), &prompter);

    result.unwrap();
    for path in host.managed_paths() {
        assert!(path.exists(), "{} was removed", path.display());
    }
    assert_eq!(ctx.log.count(StepStatus::Cancelled), 1);
}

#[test]
fn device_rule_without_privilege_is_fatal() {
    let (host, exec) = installed();
    let prompter = answers(false, &[]);
    let (ctx, result) = uninstall(&host, &exec, FakeSudo::denying(), &prompter);

    assert!(result.is_err());
    assert!(host.device_rule().exists());
    let last = ctx.log.steps().pop().unwrap();
    assert_eq!(last.name, "Remove device rule");
    assert_eq!(last.status, StepStatus::Fatal);
    // The checkout gate is never reached.
    assert_eq!(prompter.remaining(), (1, 0));
}

#[test]
fn uninstall_task_names() {
    let all = tasks::all_uninstall_tasks();
    let names: Vec<&str> = all.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    Remove configuration directory
    Remove icon
    Remove autostart entry
    Remove menu entry
    Remove service unit
    Remove runtime environment
    Remove device rule
    ");
}
