#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `install` command.
//!
//! Each test runs the whole command against a throwaway host and checks the
//! resulting files, the commands issued, and the recorded outcome.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::*;
use turing_setup::commands;
use turing_setup::config::settings;
use turing_setup::logging::StepStatus;
use turing_setup::prereq::{GpuVendor, Readiness};
use turing_setup::tasks;

/// One finished `install` run and the doubles it used.
struct Run {
    exec: Arc<FakeHost>,
    sudo: Arc<FakeSudo>,
    ctx: tasks::Context,
    result: anyhow::Result<()>,
}

fn install(host: &TestHost, exec: FakeHost, sudo: FakeSudo) -> Run {
    let exec = Arc::new(exec);
    let sudo = Arc::new(sudo);
    let ctx = host.context(
        Arc::clone(&exec),
        Arc::clone(&sudo),
        Arc::new(ScriptedPrompter::default()),
    );
    let result = commands::install::run(&ctx);
    Run {
        exec,
        sudo,
        ctx,
        result,
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn fresh_host_gets_every_resource() {
    let host = TestHost::new();
    let run = install(&host, FakeHost::new(), FakeSudo::new());

    run.result.expect("install succeeds");
    let log = &run.ctx.log;
    assert_eq!(log.count(StepStatus::Fatal), 0);
    assert_eq!(log.count(StepStatus::Warn), 0, "{}", log.render_summary());
    for path in host.managed_paths() {
        assert!(path.exists(), "{} missing", path.display());
    }
    assert!(host.tray_config().join("tray.json").is_file());
}

#[test]
fn templates_are_rendered_with_the_checkout_path() {
    let host = TestHost::new();
    install(&host, FakeHost::new(), FakeSudo::new()).result.unwrap();

    let root = host.root().display().to_string();
    let unit = std::fs::read_to_string(host.service_unit()).unwrap();
    assert!(!unit.contains('@'), "placeholder left in:\n{unit}");
    assert!(unit.contains(&format!("WorkingDirectory={root}\n")));
    assert!(unit.contains(&format!(
        "ExecStart={root}/venv/bin/python3.11 {root}/main.py\n"
    )));

    let menu = std::fs::read_to_string(host.menu_entry()).unwrap();
    let autostart = std::fs::read_to_string(host.autostart_entry()).unwrap();
    assert_eq!(menu, autostart);
    assert!(menu.contains(&format!("Path={root}\n")));

    assert_eq!(
        std::fs::read_to_string(host.device_rule()).unwrap(),
        settings::DEVICE_RULE
    );
    assert_eq!(
        std::fs::read(host.icon()).unwrap(),
        std::fs::read(host.root().join(settings::ICON_SOURCE)).unwrap()
    );
}

#[test]
fn reinstall_produces_the_same_files() {
    let host = TestHost::new();
    install(&host, FakeHost::new(), FakeSudo::new()).result.unwrap();
    let home_before = host.files_under(&host.layout.home);
    let system_before = host.files_under(&host.layout.system_root);

    std::fs::write(host.service_unit(), "[Service]\nExecStart=/bin/false\n").unwrap();
    let prefs = "{\"language\": \"en\"}\n";
    std::fs::write(host.tray_config().join("tray.json"), prefs).unwrap();

    let second = install(&host, FakeHost::new(), FakeSudo::new());
    second.result.unwrap();
    assert_eq!(second.ctx.log.count(StepStatus::Fatal), 0);

    let home_after = host.files_under(&host.layout.home);
    assert_eq!(home_before.len(), home_after.len());
    for (before, after) in home_before.iter().zip(&home_after) {
        assert_eq!(before.0, after.0);
        if before.0.ends_with("tray.json") {
            // Operator preferences survive a reinstall.
            assert_eq!(after.1, prefs);
        } else {
            assert_eq!(before.1, after.1, "{} differs", before.0);
        }
    }
    assert_eq!(system_before, host.files_under(&host.layout.system_root));
}

#[test]
fn missing_runtime_aborts_before_any_mutation() {
    let host = TestHost::new();
    let run = install(
        &host,
        FakeHost::new().without(settings::RUNTIME_PROGRAM),
        FakeSudo::new(),
    );

    assert!(run.result.is_err());
    assert!(run.ctx.log.has_fatal());
    assert_eq!(run.ctx.log.follow_ups(), vec![settings::RUNTIME_INSTALL_HINT]);
    for path in host.managed_paths() {
        assert!(!path.exists(), "{} was created", path.display());
    }
    assert!(run.sudo.calls().is_empty());
    assert_eq!(run.exec.calls(), vec!["id -u"]);
}

#[test]
fn running_as_root_is_refused() {
    let host = TestHost::new();
    let run = install(&host, FakeHost::new().with_uid("0"), FakeSudo::new());
    assert!(run.result.is_err());
    assert_eq!(run.ctx.log.steps().len(), 1);
    assert!(run.sudo.calls().is_empty());
    assert!(!host.layout.home.exists());
}

#[test]
fn unknown_user_aborts_before_any_mutation() {
    let mut host = TestHost::new();
    host.layout.user = String::new();
    let run = install(&host, FakeHost::new(), FakeSudo::new());

    assert!(run.result.is_err());
    assert!(run.sudo.calls().is_empty());
    assert_eq!(run.exec.calls(), vec!["id -u"]);
    for path in host.managed_paths() {
        assert!(!path.exists(), "{} was created", path.display());
    }
    let follow_ups = run.ctx.log.follow_ups();
    assert_eq!(follow_ups.len(), 1);
    assert!(follow_ups[0].contains("id -un"));
}

#[test]
fn refused_privilege_stops_at_the_device_rule() {
    let host = TestHost::new();
    let run = install(&host, FakeHost::new(), FakeSudo::denying());

    assert!(run.result.is_err());
    let steps = run.ctx.log.steps();
    let last = steps.last().unwrap();
    assert_eq!(last.name, "Install device rule");
    assert_eq!(last.status, StepStatus::Fatal);
    assert!(!host.device_rule().exists());
    assert!(!host.service_unit().exists());
}

#[test]
fn missing_cache_tools_only_warn() {
    let host = TestHost::new();
    let run = install(
        &host,
        FakeHost::new()
            .without("gtk-update-icon-cache")
            .without("update-desktop-database"),
        FakeSudo::new(),
    );

    run.result.expect("reload failures never fail the run");
    assert_eq!(run.ctx.log.count(StepStatus::Warn), 2);
    assert!(host.icon().exists());
    assert!(host.menu_entry().exists());
    let follow_ups = run.ctx.log.follow_ups();
    assert!(
        follow_ups
            .iter()
            .any(|f| f.starts_with("gtk-update-icon-cache -f -t "))
    );
    assert!(
        follow_ups
            .iter()
            .any(|f| f.starts_with("update-desktop-database "))
    );
}

// ---------------------------------------------------------------------------
// Privilege boundary
// ---------------------------------------------------------------------------

#[test]
fn only_the_device_rule_goes_through_sudo() {
    let host = TestHost::new();
    let run = install(&host, FakeHost::new(), FakeSudo::new());
    run.result.unwrap();

    let rule = host.device_rule().display().to_string();
    assert_eq!(
        run.sudo.calls(),
        vec![
            format!("install {rule}"),
            "udevadm control --reload-rules".to_string(),
            "udevadm trigger --subsystem-match=tty".to_string(),
        ]
    );
    for call in run.exec.calls() {
        for privileged in ["udevadm", "usermod", "zypper", "install "] {
            assert!(!call.starts_with(privileged), "unprivileged: {call}");
        }
    }
}

// ---------------------------------------------------------------------------
// Task list
// ---------------------------------------------------------------------------

fn readiness() -> Readiness {
    Readiness {
        runtime: "/usr/bin/python3.11".into(),
        runtime_version: (3, 11),
        gpu: Some(GpuVendor::Nvidia),
        warnings: Vec::new(),
    }
}

#[test]
fn install_task_names() {
    let all = tasks::all_install_tasks(&readiness());
    let names: Vec<&str> = all.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!(names.join("\n"), @r"
    Install system packages
    Install device rule
    Configure USB access
    Build runtime environment
    Install service unit
    Install menu entry
    Install autostart entry
    Install icon
    Install configuration directory
    ");
}

#[test]
fn install_task_names_are_unique() {
    let all = tasks::all_install_tasks(&readiness());
    let mut seen = HashSet::new();
    for task in &all {
        assert!(seen.insert(task.name()), "duplicate task name: {}", task.name());
    }
}
