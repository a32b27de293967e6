//! Opening audio locations as seekable byte streams.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::PlaybackError;
use crate::library::is_http_url;

/// Raw audio bytes ready for a decoder.
pub enum SourceData {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl Read for SourceData {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SourceData::File(r) => r.read(buf),
            SourceData::Memory(r) => r.read(buf),
        }
    }
}

impl Seek for SourceData {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            SourceData::File(r) => r.seek(pos),
            SourceData::Memory(r) => r.seek(pos),
        }
    }
}

/// Open `location`: http(s) URLs are fetched whole with `http`, anything else
/// is treated as a local path.
pub fn open_source(
    location: &str,
    http: &reqwest::blocking::Client,
) -> Result<SourceData, PlaybackError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(PlaybackError::InvalidSource("empty location".to_string()));
    }

    if is_http_url(location) {
        debug!(url = %location, "Fetching remote audio");
        let response = http
            .get(location)
            .send()
            .map_err(|e| PlaybackError::Fetch(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError::Fetch(format!("{location}: HTTP {status}")));
        }
        let bytes = response
            .bytes()
            .map_err(|e| PlaybackError::Fetch(e.to_string()))?;
        return Ok(SourceData::Memory(Cursor::new(bytes.to_vec())));
    }

    let path = Path::new(location);
    if !path.is_file() {
        return Err(PlaybackError::InvalidSource(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let file = File::open(path)?;
    Ok(SourceData::File(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_locations_are_invalid() {
        let http = reqwest::blocking::Client::new();
        assert!(matches!(
            open_source("   ", &http),
            Err(PlaybackError::InvalidSource(_))
        ));
        assert!(matches!(
            open_source("/definitely/not/here.mp3", &http),
            Err(PlaybackError::InvalidSource(_))
        ));
    }

    #[test]
    fn local_file_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        std::fs::write(&path, b"abc").unwrap();

        let http = reqwest::blocking::Client::new();
        let mut data = open_source(path.to_str().unwrap(), &http).unwrap();
        let mut buf = Vec::new();
        data.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"abc");
    }
}
