//! Metadata donors for freshly downloaded files.
//!
//! A donor is an existing file that was most likely created in the same
//! download burst as the new file, so its album-level tags (and art) can be
//! copied over.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::art::is_valid_cover;
use crate::confidence::{ConfidenceScorer, Observation};
use crate::config::{LibrarySettings, MatchSettings};
use crate::library::{TrackRecord, list_audio_files, title_from_path};
use crate::tags::{TagError, TagStore, TagUpdate};

/// How the donor's track number is adjusted for the new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The new file follows the donor.
    #[default]
    Increment,
    /// The new file precedes the donor.
    Decrement,
}

impl Direction {
    /// Adjust `track` (missing counts as 0). A result of 0 means "no number".
    pub fn apply(self, track: Option<u32>) -> Option<u32> {
        let base = track.unwrap_or(0);
        let adjusted = match self {
            Direction::Increment => base.saturating_add(1),
            Direction::Decrement => base.saturating_sub(1),
        };
        (adjusted > 0).then_some(adjusted)
    }
}

/// The chosen donor, as read when it was scored.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorMatch {
    pub record: TrackRecord,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    /// Tags copied from this donor.
    Donor(DonorMatch),
    /// No candidate qualified; placeholder metadata was applied.
    NoDonor,
}

fn is_same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub struct DonorMatcher<'a, S: TagStore + ?Sized> {
    store: &'a S,
    scorer: ConfidenceScorer,
    matching: MatchSettings,
    library: LibrarySettings,
}

impl<'a, S: TagStore + ?Sized> DonorMatcher<'a, S> {
    pub fn new(store: &'a S, matching: &MatchSettings, library: &LibrarySettings) -> Self {
        Self {
            store,
            scorer: ConfidenceScorer::new(matching),
            matching: matching.clone(),
            library: library.clone(),
        }
    }

    /// Score one candidate, returning 0 for anything that must not donate.
    ///
    /// A candidate carrying the new file's own title is another copy of the
    /// same song, and one titled with the unknown-title placeholder carries
    /// nothing worth copying; neither qualifies.
    fn qualify(&self, new_file: &TrackRecord, candidate: &TrackRecord) -> f64 {
        if candidate.title.trim() == self.matching.unknown_title {
            return 0.0;
        }
        let score = self.scorer.score(
            &Observation::from(candidate),
            &Observation::from(new_file),
            &new_file.title,
        );
        if score <= 0.0 {
            return 0.0;
        }
        if !candidate.art.as_deref().is_some_and(is_valid_cover) {
            debug!(
                "{} scored {score:.3} but has no usable art",
                candidate.path.display()
            );
            return 0.0;
        }
        score
    }

    /// Pick the highest-scoring donor for `new_file` among `pool`.
    ///
    /// The new file itself is never a candidate. Unreadable candidates are
    /// skipped. On equal scores the earlier candidate in `pool` wins.
    pub fn find_donor(&self, new_file: &TrackRecord, pool: &[PathBuf]) -> Option<DonorMatch> {
        let mut best: Option<DonorMatch> = None;

        for path in pool {
            if is_same_path(path, &new_file.path) {
                continue;
            }
            let candidate = match self.store.read(path) {
                Ok(record) => record,
                Err(err) => {
                    warn!("Skipping donor candidate: {err}");
                    continue;
                }
            };

            let score = self.qualify(new_file, &candidate);
            if score <= 0.0 {
                continue;
            }
            debug!("Donor candidate {} scored {score:.3}", path.display());
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(DonorMatch {
                    record: candidate,
                    score,
                });
            }
        }

        best
    }

    /// Fields copied from `donor` onto the file at `new_path`.
    fn donor_update(&self, new_path: &Path, donor: &TrackRecord, direction: Direction) -> TagUpdate {
        TagUpdate {
            title: Some(title_from_path(new_path)),
            artist: non_empty(&donor.artist),
            album: non_empty(&donor.album),
            album_artist: non_empty(&donor.album_artist),
            release_date: non_empty(&donor.release_date),
            genre: non_empty(&donor.genre),
            track_number: direction.apply(donor.track_number),
            disc_number: donor.disc_number,
            art: donor.art.clone(),
        }
    }

    /// Placeholders for the fields the new file is missing.
    fn placeholder_update(&self, new_file: &TrackRecord) -> TagUpdate {
        let mut update = TagUpdate::default();
        if new_file.title.trim().is_empty() {
            update.title = Some(title_from_path(&new_file.path));
        }
        if new_file.artist.trim().is_empty() {
            update.artist = Some(self.matching.unknown_artist.clone());
        }
        if new_file.album.trim().is_empty() {
            update.album = Some(self.matching.unknown_album.clone());
        }
        update
    }

    /// Find a donor for `new_path` in `folder` and copy its metadata over.
    ///
    /// Without a donor, only blank title/artist/album fields are filled with
    /// placeholders.
    pub fn fill_from_donor(
        &self,
        new_path: &Path,
        folder: &Path,
        direction: Direction,
    ) -> Result<FillOutcome, TagError> {
        let new_file = self.store.read(new_path)?;
        let pool = list_audio_files(folder, &self.library);

        let Some(found) = self.find_donor(&new_file, &pool) else {
            info!(
                "No donor found for {}; applying default metadata",
                new_path.display()
            );
            let update = self.placeholder_update(&new_file);
            self.store.write(new_path, &update)?;
            return Ok(FillOutcome::NoDonor);
        };

        info!(
            "Using {} (score {:.3}) as metadata donor for {}",
            found.record.path.display(),
            found.score,
            new_path.display()
        );
        self.store
            .write(new_path, &self.donor_update(new_path, &found.record, direction))?;
        Ok(FillOutcome::Donor(found))
    }
}
