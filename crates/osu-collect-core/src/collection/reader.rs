//! Reader for osu!stable collection.db files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::model::StoredCollection;
use crate::error::{Error, Result};

/// Reads collection.db files, including ones this crate wrote
pub struct CollectionReader;

impl CollectionReader {
    /// Read all collections from a collection.db file.
    ///
    /// Returns an empty list if the file does not exist.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<StoredCollection>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::parse(&mut reader)
    }

    /// Parse collection.db data from a reader
    fn parse<R: Read>(reader: &mut R) -> Result<Vec<StoredCollection>> {
        let _version = Self::read_i32(reader)?;
        let count = Self::read_i32(reader)?;
        if count < 0 {
            return Err(Error::Other("Invalid collection count".to_string()));
        }

        let mut collections = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = Self::read_string(reader)?.unwrap_or_else(|| "Unnamed Collection".to_string());
            let hash_count = Self::read_i32(reader)?;
            if hash_count < 0 {
                return Err(Error::Other("Invalid beatmap count".to_string()));
            }
            let mut hashes = Vec::with_capacity(hash_count as usize);
            for _ in 0..hash_count {
                if let Some(hash) = Self::read_string(reader)? {
                    hashes.push(hash);
                }
            }
            collections.push(StoredCollection::with_hashes(name, hashes));
        }
        Ok(collections)
    }

    /// Read a little-endian i32
    fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    /// Read an osu! format string (0x00 for absent, 0x0b marker then
    /// ULEB128 length and UTF-8 bytes)
    fn read_string<R: Read>(reader: &mut R) -> Result<Option<String>> {
        let mut marker = [0u8; 1];
        reader.read_exact(&mut marker)?;
        match marker[0] {
            0x00 => Ok(None),
            0x0b => {
                let len = Self::read_uleb128(reader)?;
                let mut buf = vec![0u8; len as usize];
                reader.read_exact(&mut buf)?;
                String::from_utf8(buf)
                    .map(Some)
                    .map_err(|e| Error::Other(format!("Invalid UTF-8 in string: {}", e)))
            }
            other => Err(Error::Other(format!("Unknown string marker: 0x{:02x}", other))),
        }
    }

    /// Read a ULEB128 encoded integer
    fn read_uleb128<R: Read>(reader: &mut R) -> Result<u32> {
        let mut result: u32 = 0;
        let mut shift = 0;
        loop {
            let mut byte = [0u8; 1];
            reader.read_exact(&mut byte)?;
            result |= u32::from(byte[0] & 0x7f) << shift;
            if byte[0] & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= 35 {
                return Err(Error::Other("ULEB128 value too large".to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::ResolvedBeatmap;
    use crate::collection::writer::{CollectionWriter, OutputFormat, DB_VERSION};
    use crate::collection::Collection;
    use std::io::Cursor;

    fn push_i32(buf: &mut Vec<u8>, value: i32) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    fn push_string(buf: &mut Vec<u8>, s: &str) {
        if s.is_empty() {
            buf.push(0x00);
        } else {
            buf.push(0x0b);
            buf.push(s.len() as u8);
            buf.extend_from_slice(s.as_bytes());
        }
    }

    #[test]
    fn parses_empty_db() {
        let mut buf = Vec::new();
        push_i32(&mut buf, DB_VERSION);
        push_i32(&mut buf, 0);

        let collections = CollectionReader::parse(&mut Cursor::new(buf)).unwrap();
        assert!(collections.is_empty());
    }

    #[test]
    fn parses_single_collection() {
        let mut buf = Vec::new();
        push_i32(&mut buf, DB_VERSION);
        push_i32(&mut buf, 1);
        push_string(&mut buf, "Favorites");
        push_i32(&mut buf, 2);
        push_string(&mut buf, "d41d8cd98f00b204e9800998ecf8427e");
        push_string(&mut buf, "098f6bcd4621d373cade4e832627b4f6");

        let collections = CollectionReader::parse(&mut Cursor::new(buf)).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "Favorites");
        assert_eq!(collections[0].beatmap_hashes.len(), 2);
        assert_eq!(collections[0].beatmap_hashes[0], "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn absent_name_gets_placeholder() {
        let mut buf = Vec::new();
        push_i32(&mut buf, DB_VERSION);
        push_i32(&mut buf, 1);
        push_string(&mut buf, "");
        push_i32(&mut buf, 0);

        let collections = CollectionReader::parse(&mut Cursor::new(buf)).unwrap();
        assert_eq!(collections[0].name, "Unnamed Collection");
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut buf = Vec::new();
        push_i32(&mut buf, DB_VERSION);
        push_i32(&mut buf, -1);

        assert!(CollectionReader::parse(&mut Cursor::new(buf)).is_err());
    }

    #[test]
    fn unknown_string_marker_is_rejected() {
        let mut buf = Vec::new();
        push_i32(&mut buf, DB_VERSION);
        push_i32(&mut buf, 1);
        buf.push(0x07); // neither 0x00 nor 0x0b

        assert!(CollectionReader::parse(&mut Cursor::new(buf)).is_err());
    }

    #[test]
    fn truncated_data_is_an_error() {
        let mut buf = Vec::new();
        push_i32(&mut buf, DB_VERSION);
        push_i32(&mut buf, 1);
        push_string(&mut buf, "Cut");
        push_i32(&mut buf, 5); // promises 5 hashes, provides none

        assert!(CollectionReader::parse(&mut Cursor::new(buf)).is_err());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let collections = CollectionReader::read("/nonexistent/collection.db").unwrap();
        assert!(collections.is_empty());
    }

    #[test]
    fn round_trips_writer_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.db");
        let beatmaps = vec![
            ResolvedBeatmap {
                content_hash: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
                beatmap_id: 1,
                set_id: 1,
                star_rating: 4.5,
                bpm: 180.0,
                title: "A".to_string(),
            },
            ResolvedBeatmap {
                content_hash: "098f6bcd4621d373cade4e832627b4f6".to_string(),
                beatmap_id: 2,
                set_id: 2,
                star_rating: 5.5,
                bpm: 200.0,
                title: "B".to_string(),
            },
        ];
        let collection = Collection::new("12345", beatmaps);
        CollectionWriter::write(std::slice::from_ref(&collection), &path, OutputFormat::CollectionDb)
            .unwrap();

        let stored = CollectionReader::read(&path).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "12345");
        assert_eq!(
            stored[0].beatmap_hashes,
            vec![
                "d41d8cd98f00b204e9800998ecf8427e".to_string(),
                "098f6bcd4621d373cade4e832627b4f6".to_string(),
            ]
        );
    }
}
