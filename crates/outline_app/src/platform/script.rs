//! Scripted page activity: timed mutations and pointer input replayed against
//! the virtual page while the session runs.

use std::fs;
use std::path::{Path, PathBuf};

use outline_core::Msg;
use outline_engine::{DomError, HostPage, VirtualPage};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse script {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("step at {at_ms} ms failed")]
    Step {
        at_ms: u64,
        #[source]
        source: DomError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Appends an HTML fragment to the first element matching `parent`.
    Append { parent: String, html: String },
    Remove { selector: String },
    Toggle,
    Click { index: usize },
    Hover { index: usize },
    Leave,
    Minimize,
    Maximize,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Milliseconds after activation.
    pub at_ms: u64,
    pub action: Action,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ScriptError> {
        let mut script: Script = ron::from_str(content).map_err(|source| ScriptError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // Stable: steps sharing a timestamp keep their written order.
        script.steps.sort_by_key(|step| step.at_ms);
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn last_at_ms(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }
}

impl Step {
    /// Applies a page mutation directly, or returns the message a pointer
    /// action would send to the session.
    pub fn apply(&self, page: &mut VirtualPage) -> Result<Option<Msg>, ScriptError> {
        let step_error = |source| ScriptError::Step {
            at_ms: self.at_ms,
            source,
        };
        let msg = match &self.action {
            Action::Append { parent, html } => {
                page.document_mut()
                    .append_html_to(parent, html)
                    .map_err(step_error)?;
                return Ok(None);
            }
            Action::Remove { selector } => {
                page.document_mut()
                    .remove_matching(selector)
                    .map_err(step_error)?;
                return Ok(None);
            }
            Action::Toggle => Msg::ToggleRequested,
            Action::Click { index } => Msg::EntryClicked { index: *index },
            Action::Hover { index } => Msg::EntryHovered { index: *index },
            Action::Leave => Msg::EntryLeft,
            Action::Minimize => Msg::MinimizeClicked,
            Action::Maximize => Msg::MaximizeClicked,
            Action::Close => Msg::CloseClicked,
        };
        Ok(Some(msg))
    }
}
