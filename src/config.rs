//! Runtime settings: animation timing and loop behaviour
//!
//! Defaults reproduce the classroom pacing. A JSON file can override any
//! subset of fields:
//!
//! ```json
//! { "looping": false, "timing": { "medium_pause_ms": 300 } }
//! ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Pauses of the animated walk, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Highlight shown before a line executes
    pub line_highlight_ms: u64,
    /// Section markers, braces and comments
    pub short_pause_ms: u64,
    /// After a statement that did something
    pub medium_pause_ms: u64,
    /// Between two iterations of the loop body
    pub loop_pause_ms: u64,
    /// Lines passed over without executing (skipped `si` blocks, blank loop lines)
    pub skip_pause_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            line_highlight_ms: 100,
            short_pause_ms: 500,
            medium_pause_ms: 600,
            loop_pause_ms: 1000,
            skip_pause_ms: 200,
        }
    }
}

impl Timing {
    /// Every pause set to zero, for tests and headless runs
    pub fn instant() -> Self {
        Timing {
            line_highlight_ms: 0,
            short_pause_ms: 0,
            medium_pause_ms: 0,
            loop_pause_ms: 0,
            skip_pause_ms: 0,
        }
    }

    pub fn line_highlight(&self) -> Duration {
        Duration::from_millis(self.line_highlight_ms)
    }

    pub fn short_pause(&self) -> Duration {
        Duration::from_millis(self.short_pause_ms)
    }

    pub fn medium_pause(&self) -> Duration {
        Duration::from_millis(self.medium_pause_ms)
    }

    pub fn loop_pause(&self) -> Duration {
        Duration::from_millis(self.loop_pause_ms)
    }

    pub fn skip_pause(&self) -> Duration {
        Duration::from_millis(self.skip_pause_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: Timing,
    /// Repeat the loop body of student runs until stopped
    pub looping: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            timing: Timing::default(),
            looping: true,
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
