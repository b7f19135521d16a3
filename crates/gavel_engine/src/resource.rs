//! Sources of rule text.

use std::path::{Path, PathBuf};

use gavel_foundation::{Error, ErrorKind, Result};

/// Something that can produce rule source text.
pub trait Resource {
    /// Loads the full source text.
    ///
    /// # Errors
    /// Returns a `Resource` error if the text cannot be read or decoded.
    fn load(&self) -> Result<String>;

    /// Short description used in logs and errors.
    fn describe(&self) -> String;
}

/// Rule text held in memory.
#[derive(Clone, Debug)]
pub struct BytesResource {
    bytes: Vec<u8>,
}

impl BytesResource {
    /// Wraps raw bytes, which must be UTF-8 when loaded.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl From<&str> for BytesResource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Resource for BytesResource {
    fn load(&self) -> Result<String> {
        String::from_utf8(self.bytes.clone())
            .map_err(|e| Error::new(ErrorKind::Resource(format!("{}: {e}", self.describe()))))
    }

    fn describe(&self) -> String {
        format!("{} bytes", self.bytes.len())
    }
}

/// Rule text read from a file.
#[derive(Clone, Debug)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    /// Points at a file; nothing is read until [`Resource::load`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn load(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| Error::new(ErrorKind::Resource(format!("{}: {e}", self.describe()))))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
