//! Writers for the collection output formats
//!
//! Binary output follows the osu!stable collection.db layout:
//! - i32: version number
//! - i32: number of collections
//! - For each collection:
//!   - String: collection name
//!   - i32: number of beatmaps
//!   - For each beatmap: String (MD5 hash)
//!
//! Strings use the osu! format: a 0x0b marker, ULEB128 length, then UTF-8
//! bytes; a single 0x00 byte stands for the absent string.
//!
//! The plain-text format lists each collection's name followed by one
//! `<hash>\t<title>` line per member.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::model::Collection;
use crate::error::{Error, Result};

/// collection.db version number written to new files
pub const DB_VERSION: i32 = 20150203;

/// Output encodings for an assembled collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// osu!stable collection.db binary format
    #[default]
    CollectionDb,
    /// Human-readable text listing
    Text,
}

impl OutputFormat {
    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::CollectionDb => "db",
            OutputFormat::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::CollectionDb => write!(f, "collection.db"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Serializes assembled collections to disk
pub struct CollectionWriter;

impl CollectionWriter {
    /// Write `collections` to `path` in `format`.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place only once fully written, so a failed run never leaves a file
    /// that looks complete. Any failure maps to [`Error::OutputWrite`]
    /// naming the destination.
    pub fn write<P: AsRef<Path>>(
        collections: &[Collection],
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = Self::temp_path(path);
        let outcome =
            Self::write_to(&tmp_path, collections, format).and_then(|()| fs::rename(&tmp_path, path));
        if let Err(err) = outcome {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::OutputWrite {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
        tracing::info!(path = %path.display(), "wrote {} collection(s)", collections.len());
        Ok(())
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut tmp = path.as_os_str().to_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn write_to(
        tmp_path: &Path,
        collections: &[Collection],
        format: OutputFormat,
    ) -> std::io::Result<()> {
        let file = File::create(tmp_path)?;
        let mut writer = BufWriter::new(file);
        match format {
            OutputFormat::CollectionDb => Self::write_db(&mut writer, collections)?,
            OutputFormat::Text => Self::write_text(&mut writer, collections)?,
        }
        writer.flush()
    }

    /// Serialize in the collection.db binary layout
    fn write_db<W: Write>(writer: &mut W, collections: &[Collection]) -> std::io::Result<()> {
        Self::write_i32(writer, DB_VERSION)?;
        Self::write_i32(writer, collections.len() as i32)?;
        for collection in collections {
            Self::write_string(writer, &collection.name)?;
            Self::write_i32(writer, collection.beatmaps.len() as i32)?;
            for hash in collection.hashes() {
                Self::write_string(writer, hash)?;
            }
        }
        Ok(())
    }

    fn write_text<W: Write>(writer: &mut W, collections: &[Collection]) -> std::io::Result<()> {
        for (index, collection) in collections.iter().enumerate() {
            if index > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{} ({} beatmaps)", collection.name, collection.len())?;
            for beatmap in &collection.beatmaps {
                writeln!(writer, "{}\t{}", beatmap.content_hash, beatmap.title)?;
            }
        }
        Ok(())
    }

    /// Write a little-endian i32
    fn write_i32<W: Write>(writer: &mut W, value: i32) -> std::io::Result<()> {
        writer.write_all(&value.to_le_bytes())
    }

    /// Write an osu! format string
    fn write_string<W: Write>(writer: &mut W, s: &str) -> std::io::Result<()> {
        if s.is_empty() {
            writer.write_all(&[0x00])
        } else {
            writer.write_all(&[0x0b])?;
            Self::write_uleb128(writer, s.len() as u32)?;
            writer.write_all(s.as_bytes())
        }
    }

    /// Write a ULEB128 encoded integer
    fn write_uleb128<W: Write>(writer: &mut W, mut value: u32) -> std::io::Result<()> {
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            writer.write_all(&[byte])?;
            if value == 0 {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::ResolvedBeatmap;

    fn beatmap(hash: &str, title: &str) -> ResolvedBeatmap {
        ResolvedBeatmap {
            content_hash: hash.to_string(),
            beatmap_id: 1,
            set_id: 1,
            star_rating: 5.0,
            bpm: 180.0,
            title: title.to_string(),
        }
    }

    #[test]
    fn db_layout_single_collection() {
        let collection = Collection::new(
            "Favorites",
            vec![beatmap("d41d8cd98f00b204e9800998ecf8427e", "Song")],
        );
        let mut buf = Vec::new();
        CollectionWriter::write_db(&mut buf, std::slice::from_ref(&collection)).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&DB_VERSION.to_le_bytes());
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.push(0x0b);
        expected.push(9); // "Favorites"
        expected.extend_from_slice(b"Favorites");
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.push(0x0b);
        expected.push(32);
        expected.extend_from_slice(b"d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(buf, expected);
    }

    #[test]
    fn empty_name_writes_null_marker() {
        let collection = Collection::new("", Vec::new());
        let mut buf = Vec::new();
        CollectionWriter::write_db(&mut buf, std::slice::from_ref(&collection)).unwrap();

        // version + count, then a single 0x00 for the name, then zero maps.
        assert_eq!(buf[8], 0x00);
        assert_eq!(&buf[9..13], &0i32.to_le_bytes());
    }

    #[test]
    fn uleb128_single_byte() {
        let mut buf = Vec::new();
        CollectionWriter::write_uleb128(&mut buf, 127).unwrap();
        assert_eq!(buf, vec![0x7f]);
    }

    #[test]
    fn uleb128_multi_byte() {
        // 300 = 0xAC 0x02
        let mut buf = Vec::new();
        CollectionWriter::write_uleb128(&mut buf, 300).unwrap();
        assert_eq!(buf, vec![0xac, 0x02]);
    }

    #[test]
    fn text_listing_format() {
        let collections = vec![
            Collection::new("First", vec![beatmap("aaa", "Song A"), beatmap("bbb", "Song B")]),
            Collection::new("Second", vec![beatmap("ccc", "Song C")]),
        ];
        let mut buf = Vec::new();
        CollectionWriter::write_text(&mut buf, &collections).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "First (2 beatmaps)\naaa\tSong A\nbbb\tSong B\n\nSecond (1 beatmaps)\nccc\tSong C\n"
        );
    }

    #[test]
    fn write_renames_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.db");
        let collection = Collection::new("A", vec![beatmap("aaa", "Song")]);

        CollectionWriter::write(std::slice::from_ref(&collection), &path, OutputFormat::CollectionDb)
            .unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("collection.db.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("collection.db");
        let collection = Collection::new("A", Vec::new());

        let err = CollectionWriter::write(
            std::slice::from_ref(&collection),
            &missing,
            OutputFormat::CollectionDb,
        )
        .unwrap_err();

        assert!(matches!(err, Error::OutputWrite { .. }));
        assert!(!missing.exists());
    }
}
