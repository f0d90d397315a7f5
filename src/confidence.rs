//! Confidence that two files came out of the same download event.
//!
//! The score is `time_factor * metadata_factor`:
//!
//! - files created more than the window apart (60 s by default) score 0, a
//!   hard cutoff rather than a penalty;
//! - inside the window the time factor decays linearly from 1.0 to a floor
//!   of 0.01, so any in-window pair still orders above "no match";
//! - an exact album match multiplies by 1.5 and an exact artist match by 1.2,
//!   giving a maximum of 1.8.
//!
//! Thin metadata (placeholder album or artist on either side, or a candidate
//! title equal to the caller's empty-title sentinel) always scores 0.

use crate::config::MatchSettings;
use crate::library::TrackRecord;

pub const ALBUM_MATCH_FACTOR: f64 = 1.5;
pub const ARTIST_MATCH_FACTOR: f64 = 1.2;
pub const TIME_FACTOR_FLOOR: f64 = 0.01;

/// The parts of a track the scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub timestamp: f64,
    pub album: &'a str,
    pub artist: &'a str,
    pub title: &'a str,
}

impl<'a> From<&'a TrackRecord> for Observation<'a> {
    fn from(record: &'a TrackRecord) -> Self {
        Self {
            timestamp: record.created,
            album: &record.album,
            artist: &record.artist,
            title: &record.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    unknown_album: String,
    unknown_artist: String,
    window_secs: f64,
}

impl ConfidenceScorer {
    pub fn new(settings: &MatchSettings) -> Self {
        Self {
            unknown_album: settings.unknown_album.clone(),
            unknown_artist: settings.unknown_artist.clone(),
            window_secs: settings.window_secs,
        }
    }

    fn is_placeholder(value: &str, sentinel: &str) -> bool {
        let value = value.trim();
        value.is_empty() || value == sentinel
    }

    fn too_thin(&self, candidate: &Observation<'_>, reference: &Observation<'_>, empty_title: &str) -> bool {
        Self::is_placeholder(candidate.album, &self.unknown_album)
            || Self::is_placeholder(reference.album, &self.unknown_album)
            || Self::is_placeholder(candidate.artist, &self.unknown_artist)
            || Self::is_placeholder(reference.artist, &self.unknown_artist)
            || candidate.title == empty_title
    }

    /// Score `candidate` against `reference`. Pure; never panics on NaN input
    /// (a NaN time difference scores 0).
    pub fn score(&self, candidate: &Observation<'_>, reference: &Observation<'_>, empty_title: &str) -> f64 {
        if self.too_thin(candidate, reference, empty_title) {
            return 0.0;
        }

        let time_diff = (candidate.timestamp - reference.timestamp).abs();
        if !(time_diff <= self.window_secs) {
            return 0.0;
        }
        let time_factor = (1.0 - time_diff.min(self.window_secs) / self.window_secs).max(TIME_FACTOR_FLOOR);

        let mut metadata_factor = 1.0;
        if candidate.album == reference.album {
            metadata_factor *= ALBUM_MATCH_FACTOR;
        }
        if candidate.artist == reference.artist {
            metadata_factor *= ARTIST_MATCH_FACTOR;
        }

        time_factor * metadata_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs<'a>(timestamp: f64, album: &'a str, artist: &'a str, title: &'a str) -> Observation<'a> {
        Observation {
            timestamp,
            album,
            artist,
            title,
        }
    }

    fn scorer() -> ConfidenceScorer {
        ConfidenceScorer::new(&MatchSettings::default())
    }

    const EMPTY: &str = "Unknown Title";

    #[test]
    fn beyond_one_minute_always_scores_zero() {
        let s = scorer();
        let reference = obs(1_000.0, "Album", "Artist", "New");
        for dt in [60.001, 61.0, 120.0, 86_400.0] {
            assert_eq!(s.score(&obs(1_000.0 + dt, "Album", "Artist", "Old"), &reference, EMPTY), 0.0);
            assert_eq!(s.score(&obs(1_000.0 - dt, "Album", "Artist", "Old"), &reference, EMPTY), 0.0);
        }
    }

    #[test]
    fn same_instant_with_matching_album_and_artist_is_maximum() {
        let score = scorer().score(
            &obs(50.0, "Album", "Artist", "Old"),
            &obs(50.0, "Album", "Artist", "New"),
            EMPTY,
        );
        assert!((score - 1.8).abs() < 1e-12, "{score}");
        assert!((ALBUM_MATCH_FACTOR * ARTIST_MATCH_FACTOR - 1.8).abs() < 1e-12);
    }

    #[test]
    fn factors_compound_multiplicatively() {
        let s = scorer();
        let reference = obs(0.0, "Album", "Artist", "New");
        let album_only = s.score(&obs(0.0, "Album", "Other", "Old"), &reference, EMPTY);
        let artist_only = s.score(&obs(0.0, "Other", "Artist", "Old"), &reference, EMPTY);
        let neither = s.score(&obs(0.0, "Other", "Other", "Old"), &reference, EMPTY);
        assert!((album_only - 1.5).abs() < 1e-12);
        assert!((artist_only - 1.2).abs() < 1e-12);
        assert!((neither - 1.0).abs() < 1e-12);
    }

    #[test]
    fn album_and_artist_matching_is_case_sensitive() {
        let score = scorer().score(
            &obs(0.0, "album", "artist", "Old"),
            &obs(0.0, "Album", "Artist", "New"),
            EMPTY,
        );
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn score_is_non_increasing_inside_the_window() {
        let s = scorer();
        let reference = obs(0.0, "Album", "Artist", "New");
        let mut previous = f64::INFINITY;
        for step in 0..=240 {
            let dt = step as f64 * 0.25;
            let score = s.score(&obs(dt, "Album", "Artist", "Old"), &reference, EMPTY);
            assert!(score <= previous, "score rose at dt={dt}");
            assert!(score > 0.0, "in-window score must stay positive at dt={dt}");
            previous = score;
        }
    }

    #[test]
    fn window_boundary_hits_the_floor() {
        let score = scorer().score(
            &obs(60.0, "X", "Y", "Old"),
            &obs(0.0, "A", "B", "New"),
            EMPTY,
        );
        assert!((score - TIME_FACTOR_FLOOR).abs() < 1e-12);
    }

    #[test]
    fn placeholders_on_either_side_score_zero() {
        let s = scorer();
        let good = obs(0.0, "Album", "Artist", "Old");
        for thin in [
            obs(0.0, "Unknown Album", "Artist", "Old"),
            obs(0.0, "Album", "Unknown Artist", "Old"),
            obs(0.0, "", "Artist", "Old"),
            obs(0.0, "Album", "   ", "Old"),
        ] {
            assert_eq!(s.score(&thin, &good, EMPTY), 0.0);
            assert_eq!(s.score(&good, &thin, EMPTY), 0.0);
        }
    }

    #[test]
    fn candidate_title_equal_to_empty_sentinel_scores_zero() {
        let s = scorer();
        let reference = obs(0.0, "Album", "Artist", "New");
        assert_eq!(s.score(&obs(0.0, "Album", "Artist", EMPTY), &reference, EMPTY), 0.0);
        assert_eq!(s.score(&obs(0.0, "Album", "Artist", "Song"), &reference, "Song"), 0.0);
    }

    #[test]
    fn nan_timestamps_score_zero() {
        let score = scorer().score(
            &obs(f64::NAN, "Album", "Artist", "Old"),
            &obs(0.0, "Album", "Artist", "New"),
            EMPTY,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn observation_reads_record_fields() {
        let record = TrackRecord {
            album: "A".into(),
            artist: "B".into(),
            title: "C".into(),
            created: 12.5,
            ..TrackRecord::default()
        };
        let o = Observation::from(&record);
        assert_eq!((o.album, o.artist, o.title, o.timestamp), ("A", "B", "C", 12.5));
    }
}
