//! Tag read/write facade.
//!
//! Components talk to audio files only through [`TagStore`], so the decision
//! logic can run against the `lofty`-backed store in production and an
//! in-memory store in tests.

use std::path::Path;

use crate::library::TrackRecord;

mod error;
mod lofty_store;
#[cfg(test)]
pub mod memory;

pub use error::TagError;
pub use lofty_store::LoftyTagStore;

/// Fields to write to a file. Unset fields are left as they are on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    /// Replaces every front-cover picture with this image.
    pub art: Option<Vec<u8>>,
}

impl TagUpdate {
    pub fn art(bytes: Vec<u8>) -> Self {
        Self {
            art: Some(bytes),
            ..Self::default()
        }
    }

    pub fn album(name: impl Into<String>) -> Self {
        Self {
            album: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn track_number(n: u32) -> Self {
        Self {
            track_number: Some(n),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub trait TagStore {
    /// Read one file's tags, first picture and creation timestamp.
    fn read(&self, path: &Path) -> Result<TrackRecord, TagError>;

    /// Extract the first embedded picture without reading anything else.
    fn read_art(&self, path: &Path) -> Result<Option<Vec<u8>>, TagError>;

    /// Persist the set fields of `update` to `path`.
    fn write(&self, path: &Path, update: &TagUpdate) -> Result<(), TagError>;
}
