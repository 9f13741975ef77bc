/*!
 * Clipboard sinks for exported page documents
 *
 * `SystemClipboard` pipes text into whichever clipboard command the host
 * offers; `MemoryClipboard` keeps writes in process.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Mutex, OnceLock};

use log::debug;
use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The command is not available on the system
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Destination for finished documents
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard commands, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardCommand {
    /// tmux paste buffer
    Tmux,
    /// Wayland `wl-copy`
    Wayland,
    /// X11 `xsel`
    Xsel,
    /// X11 `xclip`
    Xclip,
    /// macOS `pbcopy`
    MacOS,
    /// Windows `clip.exe` (also from WSL)
    Wsl,
    /// Termux on Android
    Termux,
}

impl ClipboardCommand {
    /// Program and arguments that read the clipboard text from stdin
    fn invocation(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Wsl => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Name of the program behind this command
    pub fn program(self) -> &'static str {
        self.invocation().0
    }

    /// Commands worth trying on a platform, most preferred first
    fn candidates(platform: &str) -> &'static [ClipboardCommand] {
        match platform {
            "macos" => &[Self::Tmux, Self::MacOS],
            "windows" | "wsl" => &[Self::Tmux, Self::Wsl],
            "linux" => &[Self::Tmux, Self::Wayland, Self::Xsel, Self::Xclip],
            "android" => &[Self::Tmux, Self::Termux],
            _ => &[Self::Tmux],
        }
    }
}

/// The host's clipboard, reached through an external command
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    command: ClipboardCommand,
}

impl SystemClipboard {
    /// Use a specific clipboard command
    pub fn with_command(command: ClipboardCommand) -> Self {
        Self { command }
    }

    /// Pick the first clipboard command available on this system
    pub fn detect() -> Result<Self> {
        ClipboardCommand::candidates(platform())
            .iter()
            .copied()
            .find(|cmd| match cmd {
                ClipboardCommand::Tmux => command_exists("tmux") && is_tmux_running(),
                other => command_exists(other.program()),
            })
            .map(|command| {
                debug!("Using clipboard command {}", command.program());
                Self { command }
            })
            .ok_or(ClipboardError::NoClipboardFound)
    }

    /// The command in use
    pub fn command(&self) -> ClipboardCommand {
        self.command
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command.invocation();
        pipe_to_command(cmd, args, text)
    }
}

/// In-process clipboard that records every write
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent contents
    pub fn contents(&self) -> Option<String> {
        self.writes.lock().ok().and_then(|w| w.last().cloned())
    }

    /// Number of writes so far
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        self.writes
            .lock()
            .map_err(|_| ClipboardError::CommandFailed("memory clipboard poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| Path::new(&dir).join(command).is_file()) {
            return true;
        }
    }

    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn `cmd`, feed `text` on stdin and wait for it to finish
fn pipe_to_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ClipboardError::CommandNotFound(cmd.to_string()),
            _ => ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)),
        })?;

    {
        let mut stdin = child.stdin.take().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "android") {
            "android"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else {
            "unknown"
        }
    })
}

/// Whether a tmux server is reachable
fn is_tmux_running() -> bool {
    if env::var("TMUX").is_ok() {
        return true;
    }

    Command::new("tmux")
        .args(["list-buffers"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
