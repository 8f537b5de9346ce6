//! Persisted milestone high-water mark.
//!
//! A view-count milestone is notified at most once ever, so the highest
//! notified threshold is stored as a scalar that only moves up.

use std::fs;
use std::io::ErrorKind;

use crate::error::StoreError;
use crate::history::HistoryStore;

const MILESTONE_FILE: &str = "last_milestone.json";

impl HistoryStore {
    /// The highest milestone already notified; 0 when none has been.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on read failure, [`StoreError::Json`] when
    /// the file is corrupt.
    pub fn last_milestone_notified(&self) -> Result<u64, StoreError> {
        match fs::read_to_string(self.dir().join(MILESTONE_FILE)) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    /// Advance the high-water mark. Writes below the current mark are
    /// ignored, keeping the mark monotonic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on write failure.
    pub fn record_milestone(&self, milestone: u64) -> Result<(), StoreError> {
        if milestone <= self.last_milestone_notified()? {
            return Ok(());
        }
        fs::write(
            self.dir().join(MILESTONE_FILE),
            serde_json::to_string(&milestone)?,
        )?;
        Ok(())
    }
}
