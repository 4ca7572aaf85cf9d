// Shared helpers for integration tests.
//
// Provides a temporary host (checkout, home directory and system root) plus
// scripted doubles for the executor, the privileged executor and the
// prompter, so each test can run a whole command without touching the real
// system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};

use turing_setup::config::{Layout, settings};
use turing_setup::exec::{ExecResult, Executor, command_line};
use turing_setup::logging::Logger;
use turing_setup::privilege::PrivilegedExecutor;
use turing_setup::prompt::Prompter;
use turing_setup::tasks::Context;

const DF: &str = "Filesystem 1024-blocks Used Available Capacity Mounted on\n\
                  /dev/nvme0n1p2 976284672 402341888 573942784 42% /home\n";
const LSPCI: &str = "00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 630\n\
                     01:00.0 VGA compatible controller: NVIDIA Corporation TU117 [GeForce GTX 1650]\n";

/// Unprivileged host double.
///
/// Answers the identity, runtime, disk and PCI probes like a healthy
/// openSUSE desktop, creates the runtime environment directory when asked to,
/// and tracks whether the user service is enabled.
#[derive(Debug, Default)]
pub struct FakeHost {
    calls: Mutex<Vec<String>>,
    missing: HashSet<String>,
    enabled: Mutex<HashSet<String>>,
    uid: String,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            uid: "1000".to_string(),
            ..Self::default()
        }
    }

    /// `program` is not on the search path.
    pub fn without(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Report `uid` from `id -u`.
    pub fn with_uid(mut self, uid: &str) -> Self {
        self.uid = uid.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let line = command_line(program, args);
        if self.missing.contains(program) {
            bail!("failed to execute: {line}");
        }
        self.calls.lock().unwrap().push(line);

        let mut success = true;
        let stdout = match (program, args) {
            ("id", ["-u"]) => format!("{}\n", self.uid),
            ("id", ["-nG", ..]) => "users dialout\n".to_string(),
            ("df", _) => DF.to_string(),
            ("lspci", _) => LSPCI.to_string(),
            (_, ["--version"]) => "Python 3.11.9\n".to_string(),
            (_, ["-m", "venv", dir]) => {
                std::fs::create_dir_all(Path::new(dir).join("bin"))?;
                String::new()
            }
            ("systemctl", ["--user", "enable", "--now", unit]) => {
                self.enabled.lock().unwrap().insert((*unit).to_string());
                String::new()
            }
            ("systemctl", ["--user", "disable", unit]) => {
                self.enabled.lock().unwrap().remove(*unit);
                String::new()
            }
            ("systemctl", ["--user", "is-enabled", unit]) => {
                success = self.enabled.lock().unwrap().contains(*unit);
                String::new()
            }
            _ => String::new(),
        };
        Ok(ExecResult {
            stdout,
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        })
    }

    fn checked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.answer(program, args)?;
        if !result.success {
            bail!("{} failed (exit 1)", command_line(program, args));
        }
        Ok(result)
    }
}

impl Executor for FakeHost {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_in(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.answer(program, args)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        (!self.missing.contains(program)).then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// Privileged executor double that writes below the sandbox's system root.
#[derive(Debug, Default)]
pub struct FakeSudo {
    calls: Mutex<Vec<String>>,
    deny: bool,
}

impl FakeSudo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authentication always fails.
    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, line: String) {
        self.calls.lock().unwrap().push(line);
    }
}

impl PrivilegedExecutor for FakeSudo {
    fn acquire(&self) -> Result<()> {
        if self.deny {
            bail!("sudo: 3 incorrect password attempts");
        }
        Ok(())
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.acquire()?;
        self.record(command_line(program, args));
        Ok(ExecResult {
            success: true,
            code: Some(0),
            ..ExecResult::default()
        })
    }

    fn install_file(&self, content: &[u8], dest: &Path) -> Result<()> {
        self.acquire()?;
        self.record(format!("install {}", dest.display()));
        std::fs::create_dir_all(dest.parent().unwrap())?;
        std::fs::write(dest, content)?;
        Ok(())
    }

    fn remove_file(&self, dest: &Path) -> Result<()> {
        self.acquire()?;
        self.record(format!("remove {}", dest.display()));
        if dest.exists() {
            std::fs::remove_file(dest)?;
        }
        Ok(())
    }
}

/// Prompter that replays queued answers; an exhausted queue is unreadable input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new(confirms: &[bool], inputs: &[&str]) -> Self {
        Self {
            confirms: Mutex::new(confirms.iter().copied().collect()),
            inputs: Mutex::new(inputs.iter().map(ToString::to_string).collect()),
        }
    }

    /// Answers not consumed by the run.
    pub fn remaining(&self) -> (usize, usize) {
        (
            self.confirms.lock().unwrap().len(),
            self.inputs.lock().unwrap().len(),
        )
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        match self.confirms.lock().unwrap().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no answer scripted"),
        }
    }

    fn input(&self, _prompt: &str) -> Result<String> {
        match self.inputs.lock().unwrap().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no answer scripted"),
        }
    }
}

/// A throwaway host: checkout, home and system root in one temp dir.
pub struct TestHost {
    pub dir: tempfile::TempDir,
    pub layout: Layout,
}

impl TestHost {
    /// A complete checkout using the templates shipped in `packaging/`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("turing-smart-screen-python");
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));

        std::fs::create_dir_all(root.join(settings::ANCHOR_DIR)).expect("create library/");
        std::fs::write(root.join(settings::ANCHOR_FILE), "print('display')\n").expect("main.py");
        std::fs::write(root.join(settings::REQUIREMENTS_FILE), "pyserial\nPillow\n")
            .expect("requirements.txt");
        for rel in [
            settings::SERVICE_TEMPLATE,
            settings::DESKTOP_TEMPLATE,
            settings::ICON_SOURCE,
        ] {
            let dest = root.join(rel);
            std::fs::create_dir_all(dest.parent().unwrap()).expect("create source dir");
            std::fs::copy(manifest.join(rel), &dest).expect("copy source");
        }

        let layout = Layout::new(root, dir.path().join("home"), "ana")
            .with_system_root(dir.path().join("sysroot"));
        Self { dir, layout }
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }

    /// Context wired to the given doubles and a file-less logger.
    pub fn context(
        &self,
        executor: Arc<FakeHost>,
        privileged: Arc<FakeSudo>,
        prompter: Arc<ScriptedPrompter>,
    ) -> Context {
        Context {
            layout: Arc::new(self.layout.clone()),
            log: Arc::new(Logger::new(None)),
            executor,
            privileged,
            prompter,
        }
    }

    pub fn service_unit(&self) -> PathBuf {
        self.layout.user_units_dir().join(settings::SERVICE_UNIT)
    }

    pub fn device_rule(&self) -> PathBuf {
        self.layout
            .system_path("etc/udev/rules.d/99-turing-smart-screen.rules")
    }

    pub fn menu_entry(&self) -> PathBuf {
        self.layout
            .applications_dir()
            .join("turing-smart-screen.desktop")
    }

    pub fn autostart_entry(&self) -> PathBuf {
        self.layout
            .config_home
            .join("autostart/turing-smart-screen-tray.desktop")
    }

    pub fn icon(&self) -> PathBuf {
        self.layout
            .icon_theme_dir()
            .join("scalable/apps/turing-smart-screen.svg")
    }

    pub fn tray_config(&self) -> PathBuf {
        self.layout.tray_config_dir()
    }

    /// Every path install creates.
    pub fn managed_paths(&self) -> Vec<PathBuf> {
        vec![
            self.service_unit(),
            self.device_rule(),
            self.menu_entry(),
            self.autostart_entry(),
            self.icon(),
            self.tray_config(),
            self.layout.venv_dir(),
        ]
    }

    /// Every regular file below `dir`, relative to the temp root, sorted.
    pub fn files_under(&self, dir: &Path) -> Vec<(String, String)> {
        let mut out = Vec::new();
        collect(dir, self.dir.path(), &mut out);
        out.sort();
        out
    }
}

fn collect(dir: &Path, base: &Path, out: &mut Vec<(String, String)>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, base, out);
        } else {
            let rel = path.strip_prefix(base).unwrap().display().to_string();
            out.push((rel, std::fs::read_to_string(&path).unwrap_or_default()));
        }
    }
}
