use std::path::Path;

use super::error::CompileError;

/// WGSL shader text plus the label used in diagnostics and GPU debug names.
///
/// A source may hold several entry points; the compiler picks the one whose
/// stage matches the requested kind, or the one named by `with_entry_point`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSource {
    label: String,
    text: String,
    entry_point: Option<String>,
}

impl ShaderSource {
    /// Wraps embedded WGSL text.
    pub fn wgsl(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            entry_point: None,
        }
    }

    /// Reads WGSL text from disk. The path becomes the label.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("loaded shader source {}", path.display());
        Ok(Self::wgsl(path.display().to_string(), text))
    }

    /// Selects an entry point by name instead of by stage kind.
    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = Some(name.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }
}
