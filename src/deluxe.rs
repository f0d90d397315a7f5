//! Folding standard albums into their special editions, then renumbering.
//!
//! Three passes over one folder, with nothing persisted between runs:
//!
//! 1. discovery: every album name containing a special-edition keyword maps
//!    its base name (text before the first `" ("`) to the full name;
//! 2. rewrite: files tagged with a base name are retagged with the full name;
//! 3. renumber: each album's files get track numbers 1..N by creation time.
//!
//! When several full names share one base name, the last one scanned wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{DeluxeSettings, LibrarySettings};
use crate::library::{TrackRecord, scan_records};
use crate::tags::{TagError, TagStore, TagUpdate};

/// Base album name -> special-edition album name.
pub type DeluxeMapping = BTreeMap<String, String>;

/// Album name -> `(path, creation timestamp)` in scan order.
pub type AlbumTimeline = BTreeMap<String, Vec<(PathBuf, f64)>>;

#[derive(Debug, Default)]
pub struct MergeReport {
    pub mapping: DeluxeMapping,
    /// Files whose album tag was moved onto a special edition.
    pub renamed: Vec<PathBuf>,
    /// Files that received a new track number.
    pub renumbered: Vec<PathBuf>,
    pub failed: Vec<TagError>,
}

/// Text before the first `" ("`, trimmed.
pub fn base_name(album: &str) -> &str {
    album
        .find(" (")
        .map_or(album, |idx| &album[..idx])
        .trim()
}

pub struct DeluxeMerger<'a, S: TagStore + ?Sized> {
    store: &'a S,
    keywords: Vec<String>,
}

impl<'a, S: TagStore + ?Sized> DeluxeMerger<'a, S> {
    pub fn new(store: &'a S, settings: &DeluxeSettings) -> Self {
        let keywords = settings
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { store, keywords }
    }

    pub fn is_special_edition(&self, album: &str) -> bool {
        let album = album.to_lowercase();
        self.keywords.iter().any(|k| album.contains(k.as_str()))
    }

    /// Build the base -> full mapping from the album tags of `records`.
    pub fn discover(&self, records: &[TrackRecord]) -> DeluxeMapping {
        let mut mapping = DeluxeMapping::new();
        for record in records {
            let album = record.album.trim();
            if album.is_empty() || !self.is_special_edition(album) {
                continue;
            }
            let base = base_name(album);
            if let Some(previous) = mapping.insert(base.to_string(), album.to_string()) {
                if previous != album {
                    debug!("'{base}' remapped from '{previous}' to '{album}'");
                }
            }
        }
        mapping
    }

    /// Retag base-album files with their special-edition name and collect
    /// every file's creation time under its (possibly new) album.
    ///
    /// A file whose retag fails is left out of the timeline.
    pub fn rewrite(&self, records: Vec<TrackRecord>, mapping: &DeluxeMapping, report: &mut MergeReport) -> AlbumTimeline {
        let mut timeline = AlbumTimeline::new();

        for record in records {
            // Untagged files form their own "" album and are numbered too.
            let mut album = record.album.trim().to_string();

            if let Some(full) = mapping.get(&album).filter(|full| **full != album) {
                match self.store.write(&record.path, &TagUpdate::album(full.clone())) {
                    Ok(()) => {
                        info!("Moved {} from '{album}' to '{full}'", record.path.display());
                        report.renamed.push(record.path.clone());
                        album = full.clone();
                    }
                    Err(err) => {
                        warn!("Could not update album: {err}");
                        report.failed.push(err);
                        continue;
                    }
                }
            }

            timeline
                .entry(album)
                .or_default()
                .push((record.path, record.created));
        }

        timeline
    }

    /// Number each album's files 1..N by creation time, overwriting any
    /// existing track number. Ties keep timeline (scan) order.
    pub fn renumber(&self, timeline: AlbumTimeline, report: &mut MergeReport) {
        for (album, mut tracks) in timeline {
            tracks.sort_by(|a, b| a.1.total_cmp(&b.1));
            for (index, (path, _)) in tracks.into_iter().enumerate() {
                let number = index as u32 + 1;
                match self.store.write(&path, &TagUpdate::track_number(number)) {
                    Ok(()) => {
                        debug!("Track {number} of '{album}': {}", path.display());
                        report.renumbered.push(path);
                    }
                    Err(err) => {
                        warn!("Could not update track number: {err}");
                        report.failed.push(err);
                    }
                }
            }
        }
    }

    /// Run discovery, rewrite and renumber over `dir`.
    pub fn merge_folder(&self, dir: &Path, library: &LibrarySettings) -> MergeReport {
        let records = scan_records(dir, library, self.store);
        let mapping = self.discover(&records);

        let mut report = MergeReport::default();
        let timeline = self.rewrite(records, &mapping, &mut report);
        self.renumber(timeline, &mut report);
        report.mapping = mapping;

        info!(
            "Album metadata and track numbering update complete: {} moved, {} renumbered, {} failed",
            report.renamed.len(),
            report.renumbered.len(),
            report.failed.len()
        );
        report
    }
}
