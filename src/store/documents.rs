use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::model::MatchDocument;

const DOCUMENT_PREFIX: &str = "game_";
const DOCUMENT_EXTENSION: &str = "json";

/// A directory of JSON match documents, one `game_<matchId>.json` per match.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Open the directory named by a `file://` URL or a plain path,
    /// creating it if needed.
    pub fn open(url: &str) -> Result<Self> {
        let root = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        debug!(root = %root.display(), "document store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, document_id: &str) -> PathBuf {
        self.root
            .join(document_id)
            .with_extension(DOCUMENT_EXTENSION)
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.path_of(document_id).is_file()
    }

    /// Write `document` unless one with the same id exists.
    /// Returns whether a file was written.
    pub fn insert(&self, document: &MatchDocument) -> Result<bool> {
        if self.contains(&document.document_id) {
            debug!(id = document.document_id, "document exists, skipping");
            return Ok(false);
        }
        let path = self.path_of(&document.document_id);
        let file = fs::File::create(&path).map_err(|e| io_error(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush().map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), "document written");
        Ok(true)
    }

    /// Number of stored match documents.
    pub fn len(&self) -> Result<usize> {
        Ok(self.document_paths()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove every match document; other files in the directory are kept.
    pub fn clear(&self) -> Result<usize> {
        let paths = self.document_paths()?;
        for path in &paths {
            fs::remove_file(path).map_err(|e| io_error(path, e))?;
        }
        info!(removed = paths.len(), "documents cleared");
        Ok(paths.len())
    }

    fn document_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.root, e))?.path();
            let is_document = path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION)
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(DOCUMENT_PREFIX));
            if is_document {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

fn io_error(path: &Path, source: io::Error) -> IngestError {
    IngestError::DocumentIo {
        path: path.to_path_buf(),
        source,
    }
}
