use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One audio file's known state, read from its tags at scan time.
///
/// Text fields that are missing from the file read as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRecord {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub release_date: String,
    pub genre: String,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    /// Seconds since the Unix epoch; used as file-system ordering proxy.
    pub created: f64,
    /// First embedded picture, if any.
    pub art: Option<Vec<u8>>,
}

impl TrackRecord {
    /// Album key used for grouping, `None` when the album tag is blank.
    pub fn album_key(&self) -> Option<&str> {
        let album = self.album.trim();
        (!album.is_empty()).then_some(album)
    }
}

/// Records sharing one album, keyed by the trimmed album name.
///
/// Within a group, records keep the order they were scanned in.
pub type AlbumGroups = BTreeMap<String, Vec<TrackRecord>>;

/// Title derived from a file name, without extension.
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
