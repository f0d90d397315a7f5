//! Album-art consistency across the tracks of one album.
//!
//! Each art-bearing file is fingerprinted and the fingerprint shared by the
//! most files becomes canonical. Files without art are never touched.
//!
//! First-file tie-break: when two or more fingerprints share the maximum
//! count, the canonical art is re-extracted from the first file in the
//! caller's order, even if that file's art was not among the leaders and
//! even if it changed since the scan. Only if that re-extraction yields no
//! art does the first tied leader (in caller order) win instead.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::art::ArtFingerprint;
use crate::config::LibrarySettings;
use crate::library::{group_by_album, scan_records};
use crate::tags::{TagError, TagStore, TagUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalSource {
    /// One fingerprint had strictly the most files.
    Majority,
    /// Tie resolved by re-extracting the first file's art.
    FirstFileTieBreak,
    /// Tie, but the first file had no art; first tied leader used.
    TiedLeaderFallback,
}

#[derive(Debug)]
pub struct AlbumArtReport {
    pub canonical: ArtFingerprint,
    pub source: CanonicalSource,
    pub rewritten: Vec<PathBuf>,
    pub failed: Vec<TagError>,
}

#[derive(Debug)]
pub enum AlbumArtOutcome {
    /// No file in the album carried art.
    NoArt,
    Reconciled(AlbumArtReport),
}

struct ArtGroup<'p> {
    fingerprint: ArtFingerprint,
    bytes: Vec<u8>,
    members: Vec<&'p Path>,
}

pub struct ArtReconciler<'a, S: TagStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TagStore + ?Sized> ArtReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn extract(&self, path: &Path) -> Option<Vec<u8>> {
        match self.store.read_art(path) {
            Ok(art) => art.filter(|bytes| !bytes.is_empty()),
            Err(err) => {
                debug!("Treating {} as art-less: {err}", path.display());
                None
            }
        }
    }

    fn group<'p>(&self, files: &'p [PathBuf]) -> Vec<ArtGroup<'p>> {
        let mut groups: Vec<ArtGroup<'p>> = Vec::new();
        for path in files.iter().map(PathBuf::as_path) {
            let Some(bytes) = self.extract(path) else {
                continue;
            };
            let fingerprint = ArtFingerprint::of(&bytes);
            match groups.iter_mut().find(|g| g.fingerprint == fingerprint) {
                Some(group) => group.members.push(path),
                None => groups.push(ArtGroup {
                    fingerprint,
                    bytes,
                    members: vec![path],
                }),
            }
        }
        groups
    }

    fn choose_canonical(
        &self,
        files: &[PathBuf],
        groups: &[ArtGroup<'_>],
    ) -> Option<(ArtFingerprint, Vec<u8>, CanonicalSource)> {
        let max = groups.iter().map(|g| g.members.len()).max()?;
        let mut leaders = groups.iter().filter(|g| g.members.len() == max);
        let first_leader = leaders.next()?;

        if leaders.next().is_none() {
            return Some((
                first_leader.fingerprint.clone(),
                first_leader.bytes.clone(),
                CanonicalSource::Majority,
            ));
        }

        // Tie: the first file's freshly extracted art wins, not its scanned hash.
        if let Some(bytes) = files.first().and_then(|first| self.extract(first)) {
            let fingerprint = ArtFingerprint::of(&bytes);
            debug!("Art tie at {max} file(s); using first file's art {}", fingerprint.short());
            return Some((fingerprint, bytes, CanonicalSource::FirstFileTieBreak));
        }

        warn!(
            "Art tie at {max} file(s) and the first file has no art; using {}",
            first_leader.fingerprint.short()
        );
        Some((
            first_leader.fingerprint.clone(),
            first_leader.bytes.clone(),
            CanonicalSource::TiedLeaderFallback,
        ))
    }

    /// Make every art-bearing file in `files` carry the album's canonical art.
    ///
    /// `files` order matters only for the first-file tie-break.
    pub fn reconcile_album(&self, files: &[PathBuf]) -> AlbumArtOutcome {
        let groups = self.group(files);
        let Some((canonical, bytes, source)) = self.choose_canonical(files, &groups) else {
            info!("No album art found in this album");
            return AlbumArtOutcome::NoArt;
        };

        let mut rewritten = Vec::new();
        let mut failed = Vec::new();
        let update = TagUpdate::art(bytes);

        for group in groups.iter().filter(|g| g.fingerprint != canonical) {
            for path in &group.members {
                match self.store.write(path, &update) {
                    Ok(()) => {
                        debug!("Replaced art {} in {}", group.fingerprint.short(), path.display());
                        rewritten.push(path.to_path_buf());
                    }
                    Err(err) => {
                        warn!("Could not update art: {err}");
                        failed.push(err);
                    }
                }
            }
        }

        AlbumArtOutcome::Reconciled(AlbumArtReport {
            canonical,
            source,
            rewritten,
            failed,
        })
    }

    /// Reconcile every album found under `dir`, in album-name order.
    pub fn reconcile_folder(&self, dir: &Path, library: &LibrarySettings) -> Vec<(String, AlbumArtOutcome)> {
        let albums = group_by_album(scan_records(dir, library, self.store));
        info!("Found {} album(s) in {}", albums.len(), dir.display());

        albums
            .into_iter()
            .map(|(album, records)| {
                info!("Processing album: {album}");
                let files: Vec<PathBuf> = records.into_iter().map(|r| r.path).collect();
                let outcome = self.reconcile_album(&files);
                (album, outcome)
            })
            .collect()
    }
}
