//! Log file location, escape stripping and timestamps.
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Remove terminal escape sequences so the persistent log stays plain text.
///
/// Only CSI sequences (`ESC [ ... final`) are emitted by the console
/// formatter; a lone `ESC` is dropped together with the character after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((plain, escaped)) = rest.split_once('\x1b') {
        out.push_str(plain);
        let mut tail = escaped.chars();
        if tail.next() == Some('[') {
            for c in tail.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        rest = tail.as_str();
    }
    out.push_str(rest);
    out
}

/// Resolve `<cache>/turing-setup/<command>.log`.
///
/// `cache_home` and `home` are the raw `XDG_CACHE_HOME` and `HOME` values; a
/// relative `XDG_CACHE_HOME` is ignored.
pub(super) fn log_path_in(
    cache_home: Option<OsString>,
    home: Option<OsString>,
    command: &str,
) -> Option<PathBuf> {
    let base = cache_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| PathBuf::from(h).join(".cache")))?;
    Some(base.join("turing-setup").join(format!("{command}.log")))
}

/// Log path for `command` on this host, with its directory created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let path = log_path_in(
        std::env::var_os("XDG_CACHE_HOME"),
        std::env::var_os("HOME"),
        command,
    )?;
    fs::create_dir_all(path.parent()?).ok()?;
    Some(path)
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
