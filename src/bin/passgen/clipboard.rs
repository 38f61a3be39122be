use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Context;

/// Copy a credential to the system clipboard.
pub(crate) fn copy(secret: &passgen::Secret) -> anyhow::Result<()> {
    send_to_clipboard(secret.as_str().as_bytes())?;
    eprintln!("Copied! Remember to clear clipboard later.");
    Ok(())
}

fn send_to_clipboard(data: &[u8]) -> anyhow::Result<()> {
    let mut cmd = clipboard_cmd();
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start `{program}` to copy to the clipboard"))?;
    child
        .stdin
        .take()
        .context("clipboard command has no stdin")?
        .write_all(data)
        .with_context(|| format!("failed to write to `{program}`"))?;
    let status = child
        .wait()
        .with_context(|| format!("failed to wait for `{program}` to finish"))?;
    if !status.success() {
        anyhow::bail!("`{program}` exited with {status}");
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn clipboard_cmd() -> Command {
    Command::new("pbcopy")
}

#[cfg(not(target_os = "macos"))]
fn clipboard_cmd() -> Command {
    let mut cmd = Command::new("xsel");
    cmd.arg("-b");
    cmd
}
