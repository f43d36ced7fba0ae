use std::process::{Command, Stdio};

use reco_client::{RecoError, ShareLauncher};

/// Program and arguments that open `url` with the desktop's default handler.
pub fn opener_command(url: &str) -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open".to_owned(), vec![url.to_owned()])
    } else if cfg!(windows) {
        // The empty string is the window title `start` expects first.
        (
            "cmd".to_owned(),
            vec!["/C".into(), "start".into(), String::new(), url.to_owned()],
        )
    } else {
        ("xdg-open".to_owned(), vec![url.to_owned()])
    }
}

/// [`ShareLauncher`] that hands the URL to the platform opener and returns
/// without waiting for the browser.
#[derive(Debug, Clone, Default)]
pub struct SystemShareLauncher {
    program: Option<String>,
}

impl SystemShareLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `program <url>` instead of the platform opener.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: Some(program.to_owned()),
        }
    }
}

impl ShareLauncher for SystemShareLauncher {
    fn open(&self, url: &str) -> Result<(), RecoError> {
        let (program, args) = match &self.program {
            Some(program) => (program.clone(), vec![url.to_owned()]),
            None => opener_command(url),
        };

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RecoError::Share(format!("failed to launch {program}: {e}")))?;
        tracing::debug!(%program, "share target opened");

        // Reap the opener in the background.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}
