//! Identifier source backed by a local text file

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::IdentifierSource;
use crate::error::{Error, Result};
use crate::identifier::RawIdentifier;

/// Reads identifiers from a UTF-8 text file, one entry per line.
///
/// Blank lines are skipped silently. Unparseable lines surface as
/// [`Error::MalformedLine`] carrying the 1-based line number; the sequence
/// continues on the next call. Duplicate identifiers are yielded once.
pub struct FileSource {
    path: PathBuf,
    lines: Vec<String>,
    next_line: usize,
    seen: HashSet<RawIdentifier>,
}

impl FileSource {
    /// Open `path` and read its contents
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)?;
        let lines = content.lines().map(str::to_owned).collect();
        Ok(Self {
            path,
            lines,
            next_line: 0,
            seen: HashSet::new(),
        })
    }

    /// The file this source reads from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IdentifierSource for FileSource {
    async fn next_identifier(&mut self) -> Result<Option<RawIdentifier>> {
        while self.next_line < self.lines.len() {
            let index = self.next_line;
            self.next_line += 1;
            let line = self.lines[index].trim();
            if line.is_empty() {
                continue;
            }
            match RawIdentifier::parse(line) {
                Some(identifier) => {
                    if self.seen.insert(identifier) {
                        return Ok(Some(identifier));
                    }
                }
                None => {
                    return Err(Error::MalformedLine {
                        line: index + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Ok(None)
    }
}
