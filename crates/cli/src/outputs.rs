//! GitHub Actions step outputs.
//!
//! When running inside an Actions job, `GITHUB_OUTPUT` names a file that
//! collects `name=value` lines; later workflow steps read them as
//! `steps.<id>.outputs.<name>`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Run status reported to the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Comment posted, label failed.
    Partial,
    Error,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        }
    }
}

/// Writer for step outputs. Does nothing outside GitHub Actions.
#[derive(Debug, Clone, Default)]
pub struct ActionOutputs {
    path: Option<PathBuf>,
}

impl ActionOutputs {
    /// Reads the output file location from `GITHUB_OUTPUT`.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("GITHUB_OUTPUT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Writes to the given file.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Appends `result` and `status` lines.
    ///
    /// Newlines in `result` are replaced by spaces since a plain
    /// `name=value` line cannot span lines.
    pub fn write(&self, result: &str, status: RunStatus) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let result = result.replace(['\r', '\n'], " ");
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "result={result}")?;
        writeln!(file, "status={}", status.as_str())?;
        Ok(())
    }
}
