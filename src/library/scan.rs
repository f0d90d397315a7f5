use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::tags::TagStore;

use super::model::{AlbumGroups, TrackRecord};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files under `dir`.
///
/// Entries are sorted by file name at every directory level, so the listing
/// order is stable across platforms and runs.
pub fn list_audio_files(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable directory entry: {err}");
                None
            }
        })
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file() && (settings.include_hidden || !is_hidden(path)) && is_audio_file(path, settings)
        })
        .collect()
}

/// Read every audio file under `dir`, skipping (and logging) unreadable ones.
pub fn scan_records<S: TagStore + ?Sized>(
    dir: &Path,
    settings: &LibrarySettings,
    store: &S,
) -> Vec<TrackRecord> {
    read_records(&list_audio_files(dir, settings), store)
}

/// Read the given files in order, skipping (and logging) unreadable ones.
pub fn read_records<S: TagStore + ?Sized>(paths: &[PathBuf], store: &S) -> Vec<TrackRecord> {
    paths
        .iter()
        .filter_map(|path| match store.read(path) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                None
            }
        })
        .collect()
}

/// Group records by album, dropping records whose album tag is blank.
pub fn group_by_album(records: Vec<TrackRecord>) -> AlbumGroups {
    let mut groups = AlbumGroups::new();
    for record in records {
        let Some(key) = record.album_key() else {
            debug!("{} has no album tag; not grouped", record.path.display());
            continue;
        };
        groups.entry(key.to_string()).or_default().push(record);
    }
    groups
}
