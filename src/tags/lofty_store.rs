use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::UNIX_EPOCH;

use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::picture::{Picture, PictureType};
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use log::debug;

use super::{TagError, TagStore, TagUpdate};
use crate::library::TrackRecord;

/// [`TagStore`] backed by `lofty`, writing into each file's primary tag type.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    pub fn new() -> Self {
        Self
    }
}

fn parse_options(read_cover_art: bool, parsing_mode: ParsingMode) -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .read_cover_art(read_cover_art)
        .parsing_mode(parsing_mode)
}

fn read_tagged_file(path: &Path, read_cover_art: bool) -> Result<TaggedFile, TagError> {
    let probe = Probe::open(path).map_err(|e| TagError::read(path, e))?;
    match probe
        .options(parse_options(read_cover_art, ParsingMode::BestAttempt))
        .read()
    {
        Ok(tagged_file) => Ok(tagged_file),
        Err(primary_error) => {
            debug!(
                "Best-attempt parse failed for {}, retrying relaxed: {}",
                path.display(),
                primary_error
            );
            Probe::open(path)
                .map_err(|e| TagError::read(path, e))?
                .options(parse_options(read_cover_art, ParsingMode::Relaxed))
                .read()
                .map_err(|e| TagError::read(path, e))
        }
    }
}

/// Cover bytes of a tag: the front cover if present, else its first picture.
fn cover_of(tag: &Tag) -> Option<&Picture> {
    tag.pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| tag.pictures().first())
}

fn first_picture(tagged_file: &TaggedFile) -> Option<Vec<u8>> {
    tagged_file
        .primary_tag()
        .into_iter()
        .chain(tagged_file.tags())
        .find_map(cover_of)
        .map(|picture| picture.data().to_vec())
}

/// Drop every embedded picture, whatever its type.
fn clear_pictures(tag: &mut Tag) {
    let mut kinds: Vec<PictureType> = tag.pictures().iter().map(|p| p.pic_type()).collect();
    kinds.dedup();
    for kind in kinds {
        tag.remove_picture_type(kind);
    }
}

fn trimmed(value: Option<impl AsRef<str>>) -> String {
    value
        .map(|v| v.as_ref().trim().to_string())
        .unwrap_or_default()
}

fn creation_timestamp(path: &Path) -> Result<f64, TagError> {
    let io_err = |source| TagError::Io {
        path: path.to_path_buf(),
        source,
    };
    let meta = fs::metadata(path).map_err(io_err)?;
    // Birth time is not available on every filesystem.
    let time = meta.created().or_else(|_| meta.modified()).map_err(io_err)?;
    Ok(time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0))
}

fn front_cover(path: &Path, bytes: &[u8]) -> Result<Picture, TagError> {
    let mut cursor = Cursor::new(bytes);
    let detected = Picture::from_reader(&mut cursor)
        .map_err(|e| TagError::write(path, format!("unrecognized cover image: {e}")))?;

    let mut builder = Picture::unchecked(bytes.to_vec()).pic_type(PictureType::CoverFront);
    if let Some(mime) = detected.mime_type() {
        builder = builder.mime_type(mime.clone());
    }
    Ok(builder.build())
}

fn apply_update(tag: &mut Tag, update: &TagUpdate, picture: Option<Picture>) {
    if let Some(v) = &update.title {
        tag.set_title(v.clone());
    }
    if let Some(v) = &update.artist {
        tag.set_artist(v.clone());
    }
    if let Some(v) = &update.album {
        tag.set_album(v.clone());
    }
    if let Some(v) = &update.album_artist {
        tag.insert_text(ItemKey::AlbumArtist, v.clone());
    }
    if let Some(v) = &update.release_date {
        tag.insert_text(ItemKey::RecordingDate, v.clone());
    }
    if let Some(v) = &update.genre {
        tag.set_genre(v.clone());
    }
    if let Some(n) = update.track_number {
        tag.set_track(n);
    }
    if let Some(n) = update.disc_number {
        tag.set_disk(n);
    }
    if let Some(picture) = picture {
        clear_pictures(tag);
        tag.push_picture(picture);
    }
}

impl TagStore for LoftyTagStore {
    fn read(&self, path: &Path) -> Result<TrackRecord, TagError> {
        let tagged_file = read_tagged_file(path, true)?;
        let created = creation_timestamp(path)?;
        let art = first_picture(&tagged_file);

        let mut record = TrackRecord {
            path: path.to_path_buf(),
            created,
            art,
            ..TrackRecord::default()
        };

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            debug!("{} carries no tag; reading as empty", path.display());
            return Ok(record);
        };

        record.title = trimmed(tag.title());
        record.artist = trimmed(tag.artist());
        record.album = trimmed(tag.album());
        record.album_artist = trimmed(tag.get_string(ItemKey::AlbumArtist));
        record.release_date = trimmed(
            tag.get_string(ItemKey::RecordingDate)
                .or_else(|| tag.get_string(ItemKey::Year)),
        );
        record.genre = trimmed(tag.genre());
        record.track_number = tag.track().filter(|n| *n > 0);
        record.disc_number = tag.disk().filter(|n| *n > 0);

        Ok(record)
    }

    fn read_art(&self, path: &Path) -> Result<Option<Vec<u8>>, TagError> {
        let tagged_file = read_tagged_file(path, true)?;
        Ok(first_picture(&tagged_file))
    }

    fn write(&self, path: &Path, update: &TagUpdate) -> Result<(), TagError> {
        if update.is_empty() {
            return Ok(());
        }

        let picture = update
            .art
            .as_deref()
            .map(|bytes| front_cover(path, bytes))
            .transpose()?;

        // Cover art must be read so existing pictures survive the round-trip.
        let mut tagged_file = read_tagged_file(path, true)?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| TagError::Unsupported {
                path: path.to_path_buf(),
                reason: format!("file does not support {tag_type:?} tags"),
            })?;

        apply_update(tag, update, picture);

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::write(path, e))
    }
}
