//! Source map - registry of loaded source files.
//!
//! The driver adds every compiled file here so the diagnostic renderer can
//! resolve a [`FileId`] back to a file name. The map also keeps the content
//! around for tooling that wants to show snippets.

use crate::error::{SourceMapError, SourceMapResult};

use super::FileId;

/// A single registered source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Identifier assigned by the [`SourceMap`].
    pub id: FileId,
    /// Display name (usually the path the file was read from).
    pub name: String,
    /// Full file content.
    pub content: String,
}

impl SourceFile {
    /// Byte length of the file content.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// True if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Registry mapping [`FileId`]s to their names and contents.
///
/// Files are assigned sequential ids in registration order.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Register a file and return its id.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile {
            id,
            name: name.into(),
            content: content.into(),
        });
        id
    }

    /// Look up a file by id.
    pub fn file(&self, id: FileId) -> SourceMapResult<&SourceFile> {
        self.files
            .get(id.index())
            .ok_or_else(|| SourceMapError::FileNotFound(format!("file id {}", id.index())))
    }

    /// Display name for a file id, or `"<unknown>"` when the id was never
    /// registered (e.g. diagnostics built from `Span::DUMMY` in tests).
    pub fn name(&self, id: FileId) -> &str {
        self.files
            .get(id.index())
            .map(|f| f.name.as_str())
            .unwrap_or("<unknown>")
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over all registered files.
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }
}
