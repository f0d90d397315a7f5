//! Splitting comma-joined artist tags into lead artist + album artist.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::library::scan_records;
use crate::tags::{TagError, TagStore, TagUpdate};

#[derive(Debug, Default)]
pub struct SplitReport {
    pub updated: Vec<PathBuf>,
    pub failed: Vec<TagError>,
}

/// Split `"Lead, Feat A, Feat B"` into the lead artist and the album artist
/// with the featured names appended.
///
/// Returns `None` when the artist tag holds a single name.
pub fn split_contributors(artist: &str, album_artist: &str) -> Option<(String, String)> {
    if !artist.contains(',') {
        return None;
    }
    let mut names = artist.split(',').map(str::trim);
    let lead = names.next()?.to_string();
    let rest = names.filter(|n| !n.is_empty()).collect::<Vec<_>>().join(", ");

    let album_artist = album_artist.trim();
    let album_artist = match (album_artist.is_empty(), rest.is_empty()) {
        (_, true) => album_artist.to_string(),
        (true, false) => rest,
        (false, false) => format!("{album_artist}, {rest}"),
    };
    Some((lead, album_artist))
}

pub struct ArtistSplitter<'a, S: TagStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TagStore + ?Sized> ArtistSplitter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn split_folder(&self, dir: &Path, library: &LibrarySettings) -> SplitReport {
        let mut report = SplitReport::default();

        for record in scan_records(dir, library, self.store) {
            let Some((lead, album_artist)) = split_contributors(&record.artist, &record.album_artist) else {
                continue;
            };
            let update = TagUpdate {
                artist: Some(lead),
                album_artist: (album_artist != record.album_artist).then_some(album_artist),
                ..TagUpdate::default()
            };
            match self.store.write(&record.path, &update) {
                Ok(()) => {
                    debug!("Split artists in {}", record.path.display());
                    report.updated.push(record.path);
                }
                Err(err) => {
                    warn!("Could not split artists: {err}");
                    report.failed.push(err);
                }
            }
        }

        info!(
            "Split contributing artists in {} file(s), {} failed",
            report.updated.len(),
            report.failed.len()
        );
        report
    }
}
