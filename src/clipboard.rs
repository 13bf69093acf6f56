//! Clipboard delivery
//!
//! An ordered chain of strategies, tried in sequence until one confirms the
//! write. The platform clipboard is one strategy; a copy tool (`pbcopy`,
//! `wl-copy`, `xclip`, ...) fed from a staged temporary file is the other.
//! Strategy failures are logged and never escape [`ClipboardWriter::write`].

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Copy command '{program}' failed with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("Failed to run copy command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One way of putting text on the clipboard.
pub trait ClipboardStrategy {
    fn name(&self) -> &str;

    /// `Ok(())` only when the write is confirmed.
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard through the `clipboard` crate.
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl ClipboardStrategy for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        use ::clipboard::{ClipboardContext, ClipboardProvider};

        let mut ctx: ClipboardContext =
            ClipboardProvider::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        ctx.set_contents(text.to_owned())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// A legacy copy tool reading the text from stdin.
///
/// The text is staged in a temporary file that exists only for the duration
/// of one write; it is removed on success, on tool failure and on spawn
/// failure alike.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
    staging_dir: Option<PathBuf>,
}

impl CommandClipboard {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            staging_dir: None,
        }
    }

    /// Build from an argv list; `None` when the list is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            staging_dir: None,
        })
    }

    /// The usual copy tool of the current platform: `pbcopy`, PowerShell's
    /// `Set-Clipboard`, `wl-copy` under Wayland, else `xclip`. Other tools
    /// such as `xsel` or `clip` go through [`CommandClipboard::from_argv`].
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", &[])
        } else if cfg!(windows) {
            Self::new(
                "powershell",
                &[
                    "-NoProfile",
                    "-Command",
                    "[Console]::InputEncoding = [Text.Encoding]::UTF8; Set-Clipboard -Value ([Console]::In.ReadToEnd())",
                ],
            )
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", &[])
        } else {
            Self::new("xclip", &["-selection", "clipboard"])
        }
    }

    /// Stage text under `dir` instead of the system temp directory.
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }
}

impl ClipboardStrategy for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut staged = match &self.staging_dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        staged.write_all(text.as_bytes())?;
        staged.flush()?;

        // Output streams are not captured: xclip keeps running to serve the
        // selection and would hold a captured pipe open.
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::from(staged.reopen()?))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ClipboardError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    System,
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Strategies in the order they are tried.
    pub strategies: Vec<StrategyKind>,
    /// argv of the copy tool; the platform default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        // An X11 selection owned by this process is gone once it exits, so
        // there the copy tool, which outlives us, goes first.
        let strategies = if cfg!(any(target_os = "macos", windows)) {
            vec![StrategyKind::System, StrategyKind::Command]
        } else {
            vec![StrategyKind::Command, StrategyKind::System]
        };
        Self {
            strategies,
            command: None,
        }
    }
}

/// Ordered strategy chain. Stops at the first confirmed write.
#[derive(Default)]
pub struct ClipboardWriter {
    strategies: Vec<Box<dyn ClipboardStrategy>>,
}

impl ClipboardWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: impl ClipboardStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn from_config(config: &ClipboardConfig) -> Self {
        let mut writer = Self::new();
        for kind in &config.strategies {
            match kind {
                #[cfg(feature = "system-clipboard")]
                StrategyKind::System => writer = writer.with_strategy(SystemClipboard),
                #[cfg(not(feature = "system-clipboard"))]
                StrategyKind::System => {
                    warn!("system clipboard support not compiled in, skipping");
                }
                StrategyKind::Command => {
                    let command = config
                        .command
                        .as_deref()
                        .and_then(CommandClipboard::from_argv)
                        .unwrap_or_else(CommandClipboard::platform_default);
                    writer = writer.with_strategy(command);
                }
            }
        }
        writer
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Deliver `text`. `true` means some strategy confirmed the write.
    pub fn write(&self, text: &str) -> bool {
        for strategy in &self.strategies {
            match strategy.write(text) {
                Ok(()) => {
                    debug!(strategy = strategy.name(), bytes = text.len(), "clipboard write confirmed");
                    return true;
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "clipboard strategy failed");
                }
            }
        }
        false
    }
}
