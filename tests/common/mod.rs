//! Shared helpers for integration tests: stub CLI executables standing in
//! for real assistant tools.

#![cfg(unix)]

use cligate::CopilotConfig;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable stub script that answers `--version` like a real
/// CLI and otherwise runs `body`.
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then\n\
         \x20 echo \"stub 1.0.0\"\n\
         \x20 exit 0\n\
         fi\n\
         {body}\n"
    );
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A stub that echoes its stdin payload back verbatim, or prints `OK` when
/// no payload was supplied — enough to fake every Copilot operation.
pub fn write_echo_stub(dir: &Path) -> PathBuf {
    write_stub(
        dir,
        "copilot",
        "body=$(cat)\n\
         if [ -n \"$body\" ]; then\n\
         \x20 printf '%s' \"$body\"\n\
         else\n\
         \x20 printf 'OK'\n\
         fi",
    )
}

/// Copilot adapter config pointing at a stub, with test-friendly timeouts.
pub fn stub_config(command: &Path) -> CopilotConfig {
    CopilotConfig {
        command: command.to_string_lossy().into_owned(),
        default_model: None,
        chat_timeout_secs: 10,
        code_timeout_secs: 10,
        diff_timeout_secs: 5,
        probe_timeout_secs: 5,
    }
}
