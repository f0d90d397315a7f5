//! In-memory [`TagStore`] for exercising passes without real audio files.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use super::{TagError, TagStore, TagUpdate};
use crate::library::TrackRecord;

#[derive(Default)]
pub struct MemoryTagStore {
    records: RefCell<HashMap<PathBuf, TrackRecord>>,
    scripted_art: RefCell<HashMap<PathBuf, VecDeque<Option<Vec<u8>>>>>,
    failing_reads: RefCell<HashSet<PathBuf>>,
    failing_writes: RefCell<HashSet<PathBuf>>,
    writes: RefCell<Vec<(PathBuf, TagUpdate)>>,
    reads: RefCell<HashMap<PathBuf, usize>>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: TrackRecord) {
        self.records.borrow_mut().insert(record.path.clone(), record);
    }

    pub fn record(&self, path: &Path) -> Option<TrackRecord> {
        self.records.borrow().get(path).cloned()
    }

    pub fn fail_reads(&self, path: &Path) {
        self.failing_reads.borrow_mut().insert(path.to_path_buf());
    }

    pub fn fail_writes(&self, path: &Path) {
        self.failing_writes.borrow_mut().insert(path.to_path_buf());
    }

    /// Successive `read_art` calls for `path` return these values in order;
    /// the last one repeats. A write that sets art ends the script.
    pub fn script_art(&self, path: &Path, reads: Vec<Option<Vec<u8>>>) {
        self.scripted_art
            .borrow_mut()
            .insert(path.to_path_buf(), reads.into());
    }

    /// Number of full `read` calls made for `path`.
    pub fn reads_of(&self, path: &Path) -> usize {
        self.reads.borrow().get(path).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> Vec<(PathBuf, TagUpdate)> {
        self.writes.borrow().clone()
    }

    pub fn writes_to(&self, path: &Path) -> Vec<TagUpdate> {
        self.writes
            .borrow()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, u)| u.clone())
            .collect()
    }
}

fn apply(record: &mut TrackRecord, update: &TagUpdate) {
    let set = |field: &mut String, value: &Option<String>| {
        if let Some(v) = value {
            *field = v.clone();
        }
    };
    set(&mut record.title, &update.title);
    set(&mut record.artist, &update.artist);
    set(&mut record.album, &update.album);
    set(&mut record.album_artist, &update.album_artist);
    set(&mut record.release_date, &update.release_date);
    set(&mut record.genre, &update.genre);
    if update.track_number.is_some() {
        record.track_number = update.track_number;
    }
    if update.disc_number.is_some() {
        record.disc_number = update.disc_number;
    }
    if update.art.is_some() {
        record.art = update.art.clone();
    }
}

impl TagStore for MemoryTagStore {
    fn read(&self, path: &Path) -> Result<TrackRecord, TagError> {
        *self.reads.borrow_mut().entry(path.to_path_buf()).or_default() += 1;
        if self.failing_reads.borrow().contains(path) {
            return Err(TagError::read(path, "scripted read failure"));
        }
        self.record(path)
            .ok_or_else(|| TagError::read(path, "no such file"))
    }

    fn read_art(&self, path: &Path) -> Result<Option<Vec<u8>>, TagError> {
        if self.failing_reads.borrow().contains(path) {
            return Err(TagError::read(path, "scripted read failure"));
        }
        if let Some(script) = self.scripted_art.borrow_mut().get_mut(path) {
            let next = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            if let Some(art) = next {
                return Ok(art);
            }
        }
        self.record(path)
            .map(|record| record.art)
            .ok_or_else(|| TagError::read(path, "no such file"))
    }

    fn write(&self, path: &Path, update: &TagUpdate) -> Result<(), TagError> {
        if self.failing_writes.borrow().contains(path) {
            return Err(TagError::write(path, "scripted write failure"));
        }
        let mut records = self.records.borrow_mut();
        let record = records
            .get_mut(path)
            .ok_or_else(|| TagError::write(path, "no such file"))?;
        apply(record, update);
        if update.art.is_some() {
            self.scripted_art.borrow_mut().remove(path);
        }
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), update.clone()));
        Ok(())
    }
}
