use std::process::Stdio;

use reco_client::{Clipboard, RecoError};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// A clipboard helper program and the arguments that make it read stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardTool {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    /// Helpers to try on this platform, most preferred first.
    pub fn candidates(wayland: bool) -> Vec<Self> {
        if cfg!(target_os = "macos") {
            vec![Self::new("pbcopy", &[])]
        } else if cfg!(windows) {
            vec![Self::new("clip", &[])]
        } else {
            let mut tools = Vec::with_capacity(3);
            if wayland {
                tools.push(Self::new("wl-copy", &[]));
            }
            tools.push(Self::new("xclip", &["-selection", "clipboard"]));
            tools.push(Self::new("xsel", &["--clipboard", "--input"]));
            tools
        }
    }

    /// First candidate found on `PATH`.
    pub fn detect() -> Option<Self> {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        Self::candidates(wayland)
            .into_iter()
            .find(|tool| which::which(&tool.program).is_ok())
    }
}

/// [`Clipboard`] that pipes text into the platform clipboard helper.
///
/// The helper only replaces the clipboard once it has read all of stdin and
/// exited cleanly, so a failed write leaves the previous contents in place.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    tool: Option<ClipboardTool>,
}

impl SystemClipboard {
    /// Use whichever helper is installed.
    pub fn detect() -> Self {
        let tool = ClipboardTool::detect();
        match &tool {
            Some(tool) => tracing::debug!(program = %tool.program, "clipboard helper found"),
            None => tracing::debug!("no clipboard helper on PATH"),
        }
        Self { tool }
    }

    pub fn with_tool(tool: ClipboardTool) -> Self {
        Self { tool: Some(tool) }
    }

    pub fn tool(&self) -> Option<&ClipboardTool> {
        self.tool.as_ref()
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), RecoError> {
        let tool = self
            .tool
            .as_ref()
            .ok_or_else(|| RecoError::Clipboard("no clipboard helper found on PATH".into()))?;

        let mut child = Command::new(&tool.program)
            .args(&tool.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecoError::Clipboard(format!("failed to spawn {}: {e}", tool.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RecoError::Clipboard(format!("{} has no stdin", tool.program)))?;
        if let Err(e) = stdin.write_all(text.as_bytes()).await {
            let _ = child.kill().await;
            return Err(RecoError::Clipboard(format!(
                "failed to write to {}: {e}",
                tool.program
            )));
        }
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RecoError::Clipboard(format!("{} did not finish: {e}", tool.program)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecoError::Clipboard(format!(
                "{} exited with {}: {}",
                tool.program,
                output.status,
                stderr.trim()
            )));
        }
        tracing::debug!(program = %tool.program, bytes = text.len(), "copied to clipboard");
        Ok(())
    }
}
