//! Best-effort presentation of the written figure.
//!
//! Nothing here can fail the run: problems are logged and ignored.

use std::{path::Path, process::Command};

/// Open `file` in the platform's default viewer if a display is available.
pub fn show(file: &Path) {
    let Some(mut cmd) = viewer_command(file) else {
        log::warn!("no display available, not showing {file:?}");
        return;
    };

    match cmd.spawn() {
        Ok(_) => log::info!("opened {file:?} in the default viewer"),
        Err(error) => log::warn!("failed to open {file:?} in the default viewer: {error}"),
    }
}

#[cfg(target_os = "macos")]
fn viewer_command(file: &Path) -> Option<Command> {
    let mut cmd = Command::new("open");
    cmd.arg(file);
    Some(cmd)
}

#[cfg(target_os = "windows")]
fn viewer_command(file: &Path) -> Option<Command> {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(file);
    Some(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(file: &Path) -> Option<Command> {
    if !has_display(|key| std::env::var_os(key).is_some_and(|val| !val.is_empty())) {
        return None;
    }
    let mut cmd = Command::new("xdg-open");
    cmd.arg(file);
    Some(cmd)
}

#[cfg_attr(any(target_os = "macos", target_os = "windows"), allow(dead_code))]
fn has_display<F: Fn(&str) -> bool>(is_set: F) -> bool {
    is_set("DISPLAY") || is_set("WAYLAND_DISPLAY")
}
