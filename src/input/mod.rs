use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde_json::Value;

pub mod profile;
pub mod validate;

const DEMO_PAYLOAD: &str = include_str!("../../assets/demo_payload.json");

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Server(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Where a metrics payload comes from. A fetch yields raw JSON; typing and
/// validation happen at the boundary in [`validate`].
pub trait PayloadSource {
    fn label(&self) -> String;
    fn fetch(&self) -> Result<Value, PayloadError>;
}

/// Bundled sample payload, always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl PayloadSource for DemoSource {
    fn label(&self) -> String {
        "Demo Data".to_string()
    }

    fn fetch(&self) -> Result<Value, PayloadError> {
        Ok(serde_json::from_str(DEMO_PAYLOAD)?)
    }
}

/// A saved upload response on disk, plain or gzip-compressed.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PayloadSource for FileSource {
    fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn fetch(&self) -> Result<Value, PayloadError> {
        let reader = open_maybe_gz(&self.path)?;
        let value: Value = serde_json::from_reader(reader)?;
        tracing::debug!(path = %self.path.display(), "payload read");
        Ok(value)
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, PayloadError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub const GENERIC_UPLOAD_ERROR: &str = "upload failed";

/// An object carrying an `error` string is the non-2xx response envelope.
/// A blank message falls back to a generic one.
pub fn error_envelope(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    let msg = match obj.get("error")? {
        Value::String(msg) => msg.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    if msg.is_empty() {
        Some(GENERIC_UPLOAD_ERROR.to_string())
    } else {
        Some(msg)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
