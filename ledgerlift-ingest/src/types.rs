use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";

/// An uploaded statement file, held in memory for the duration of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File name used in logs and error messages
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: PDF_MIME.to_string(),
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn with_bytes(&self, bytes: Vec<u8>) -> Self {
        Self {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            bytes,
        }
    }
}
