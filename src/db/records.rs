use crate::db::file;
use crate::db::models::{BusinessCardRecord, CardFields};
use crate::error::CardError;
use crate::types::Session;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Business-card records held in memory and written through to a JSON file.
///
/// Ids are `max(existing) + 1`, or `1` when empty, computed over the
/// in-memory set at the time of `add`. The set is loaded from disk on
/// `open`, so a restart resumes from the persisted maximum.
pub struct RecordStore {
    path: PathBuf,
    records: Vec<BusinessCardRecord>,
}

impl RecordStore {
    /// Open the store at `path`. An unreadable file is logged and the store
    /// starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = Self::load(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to load business cards; starting empty");
            Vec::new()
        });
        info!(path = %path.display(), count = records.len(), "record store opened");
        Self { path, records }
    }

    /// Read every record from `path`. Empty when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Vec<BusinessCardRecord>, CardError> {
        Ok(file::read_json(path)?.unwrap_or_default())
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append a record and persist the whole collection before returning.
    /// On a failed write the record is dropped again and the error returned.
    pub fn add(
        &mut self,
        owner: &str,
        fields: CardFields,
        image_path: String,
    ) -> Result<BusinessCardRecord, CardError> {
        let record = BusinessCardRecord {
            id: self.next_id(),
            owner: owner.to_string(),
            fields,
            image_path,
        };
        self.records.push(record.clone());

        if let Err(e) = file::write_json(&self.path, &self.records) {
            self.records.pop();
            return Err(e);
        }
        info!(id = record.id, owner = %record.owner, "business card saved");
        Ok(record)
    }

    /// Remove the backing file and forget every record. Returns `false` when
    /// there was no file to remove.
    pub fn delete_all(&mut self) -> Result<bool, CardError> {
        let removed = file::remove(&self.path)?;
        self.records.clear();
        if removed {
            info!(path = %self.path.display(), "business cards deleted");
        } else {
            warn!(path = %self.path.display(), "business cards file does not exist");
        }
        Ok(removed)
    }

    pub fn records(&self) -> &[BusinessCardRecord] {
        &self.records
    }

    pub fn visible_to<'a>(
        &'a self,
        session: &'a Session,
    ) -> impl Iterator<Item = &'a BusinessCardRecord> + 'a {
        self.records.iter().filter(move |r| session.can_view(r))
    }

    pub fn get_visible(&self, id: u64, session: &Session) -> Option<&BusinessCardRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .filter(|r| session.can_view(r))
    }
}
