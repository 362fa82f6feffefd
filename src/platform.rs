//! Clipboard and file-save capabilities.
//!
//! The app only talks to these through traits so the orchestration can be
//! exercised without a desktop session.

use anyhow::{anyhow, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

pub trait Clipboard: Send {
    fn write_text(&self, text: &str) -> Result<()>;
}

pub trait FileSaver: Send {
    /// Persist `bytes` under `file_name`, returning where it ended up
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf>;
}

/// Pipes text into whichever clipboard tool the platform provides.
pub struct SystemClipboard;

const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        for (program, args) in CLIPBOARD_COMMANDS {
            let Ok(mut child) = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            else {
                continue;
            };

            let status = feed_and_wait(child, text)?;
            if status.success() {
                tracing::debug!(program, "copied output to clipboard");
                return Ok(());
            }
            return Err(anyhow!("{} exited with {}", program, status));
        }

        Err(anyhow!("No clipboard tool found"))
    }
}

/// Write `text` to the child's stdin, close it and reap the child. The child
/// is waited on even when the write fails.
fn feed_and_wait(mut child: Child, text: &str) -> Result<ExitStatus> {
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    Ok(status)
}

/// Writes downloads into a fixed directory.
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The user's download directory, falling back to the working directory
    pub fn default_dir() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}
